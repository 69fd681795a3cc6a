// ============================================================================
// Configuration
// ============================================================================
// Arguments CLI, chacun avec un fallback sur une variable d'environnement
//
// CONCEPT RUST : clap derive
// - #[derive(Parser)] génère le parsing à partir de la struct
// - env = "..." : la variable d'environnement sert de valeur par défaut
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

/// URL du service d'analyse par défaut
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Valorisation d'actions dans le terminal
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fairvalue",
    version,
    about = "AI-Powered Stock Valuation (TUI)",
    long_about = None
)]
pub struct Config {
    /// URL de base du service d'analyse (le chemin /api/analyze est ajouté)
    #[arg(long, env = "FAIRVALUE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Timeout du transport HTTP, en secondes (aucun par défaut)
    #[arg(long, env = "FAIRVALUE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Répertoire des fichiers de logs
    #[arg(long, env = "FAIRVALUE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Ticker pré-rempli au démarrage
    #[arg(short, long)]
    pub ticker: Option<String>,
}

impl Config {
    /// Vérifie la cohérence de la configuration
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("URL du service invalide : {}", self.api_url))?;

        if self.timeout_secs == Some(0) {
            bail!("--timeout-secs doit être supérieur à 0");
        }
        Ok(())
    }

    /// Timeout du transport, None si non configuré
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Répertoire de logs effectif
    ///
    /// Ordre : --log-dir, puis ~/.local/share/fairvalue/logs (Linux),
    /// puis ./logs si le répertoire utilisateur est introuvable
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("fairvalue").join("logs"))
                .unwrap_or_else(|| PathBuf::from("./logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "fairvalue",
            "--api-url",
            "http://analysis.internal:9000",
            "--timeout-secs",
            "15",
            "--log-dir",
            "/tmp/fv-logs",
            "-t",
            "aapl",
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://analysis.internal:9000");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/fv-logs"));
        assert_eq!(config.ticker.as_deref(), Some("aapl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = Config::try_parse_from(["fairvalue", "--api-url", "nope"]).unwrap();
        assert!(bad_url.validate().is_err());

        let zero = Config::try_parse_from([
            "fairvalue",
            "--api-url",
            DEFAULT_API_URL,
            "--timeout-secs",
            "0",
        ])
        .unwrap();
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_timeout_must_be_a_number() {
        let result = Config::try_parse_from(["fairvalue", "--timeout-secs", "soon"]);
        assert!(result.is_err());
    }
}
