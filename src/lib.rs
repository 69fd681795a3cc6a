// ============================================================================
// FairValue - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // Client du service d'analyse
pub mod app;     // État de l'écran
pub mod config;  // Arguments CLI / variables d'environnement
pub mod error;   // Erreurs du client d'analyse
pub mod models;  // Structures de données (valorisation, graphique)
pub mod ui;      // Interface utilisateur
pub mod worker;  // Worker thread pour les appels HTTP
