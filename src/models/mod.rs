// ============================================================================
// Module : models
// ============================================================================
// Structures de données reçues du service d'analyse
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public
// - "pub use" : re-export pour raccourcir les imports
// ============================================================================

pub mod chart_data; // Payload du graphique (opaque) + vue graphique ligne
pub mod valuation;  // Résumé de valorisation (fair value, croissance)

// Au lieu de : use fairvalue::models::valuation::Valuation;
// On peut faire : use fairvalue::models::Valuation;
pub use chart_data::{ChartData, LineChartView, LineSeries};
pub use valuation::Valuation;
