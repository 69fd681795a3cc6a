// ============================================================================
// Module : api
// ============================================================================
// Client du service d'analyse (POST /api/analyze)
// ============================================================================

pub mod analyze; // Client HTTP + trait AnalysisService

// Re-export des éléments principaux
pub use analyze::{AnalysisClient, AnalysisResponse, AnalysisService, ANALYZE_PATH};
