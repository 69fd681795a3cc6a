//! Erreurs du client d'analyse

use thiserror::Error;

/// Échec d'une requête vers le service d'analyse
///
/// Toutes les variantes prennent le même chemin côté application :
/// loggées, puis ignorées (l'état affiché ne change pas).
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// URL de base invalide (configuration)
    #[error("URL du service invalide : {0}")]
    InvalidUrl(String),

    /// Erreur réseau ou de transport (connexion, timeout, lecture du body)
    #[error("échec de la requête HTTP : {0}")]
    Network(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("le service d'analyse a retourné HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Body JSON illisible ou de forme inattendue
    #[error("réponse d'analyse invalide : {0}")]
    Payload(#[from] serde_json::Error),
}

/// Alias pour les opérations du client d'analyse
pub type Result<T> = std::result::Result<T, AnalyzeError>;
