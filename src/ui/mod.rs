// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events; // Lecture des événements clavier + application à App
pub mod home;   // Rendu de l'écran de valorisation
pub mod chart;  // Rendu du graphique ligne

// Re-exports pour simplifier les imports
pub use events::{handle_event, Event, EventHandler};
pub use home::render;
