// ============================================================================
// API Client : service d'analyse
// ============================================================================
// Envoie un ticker à POST /api/analyze et récupère graphique + valorisation
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : l'appel HTTP est le seul point de suspension
// 2. Traits async (async_trait) : seam mockable entre worker et réseau
// 3. Serde : sérialisation du body, désérialisation de la réponse
// 4. Erreurs typées (thiserror) : Network / Status / Payload
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::error::{AnalyzeError, Result};
use crate::models::{ChartData, Valuation};

/// Chemin fixe du service d'analyse
pub const ANALYZE_PATH: &str = "/api/analyze";

// ============================================================================
// Structures du contrat wire
// ============================================================================

/// Body de la requête : `{ "ticker": "AAPL" }`
#[derive(Debug, Serialize)]
struct AnalyzeRequestBody<'a> {
    ticker: &'a str,
}

/// Réponse du service d'analyse
///
/// CONCEPT RUST : Option + #[serde(default)]
/// - Champ absent ou `null` : None
/// - Les panneaux correspondants ne sont alors pas affichés
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Payload du graphique, transmis tel quel au rendu
    #[serde(default)]
    pub chart_data: Option<ChartData>,

    /// Résumé de valorisation
    #[serde(default)]
    pub valuation: Option<Valuation>,
}

// ============================================================================
// Trait AnalysisService
// ============================================================================
// CONCEPT RUST : Trait comme point de découplage
// - Le worker ne connaît que ce trait
// - En production : AnalysisClient (reqwest)
// - En test : MockAnalysisService (mockall)
// ============================================================================

/// Service capable de produire une analyse pour un ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyse un ticker (une requête par appel, pas de retry)
    async fn analyze(&self, ticker: &str) -> Result<AnalysisResponse>;
}

/// Client HTTP du service d'analyse
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AnalysisClient {
    /// Crée un client pointant sur `<base_url>/api/analyze`
    ///
    /// # Arguments
    /// * `base_url` - URL du service (ex: "http://localhost:8000")
    /// * `timeout` - Timeout du transport, aucun si None
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint_url(base_url)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("fairvalue/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!(endpoint = %endpoint, ?timeout, "Analysis client created");
        Ok(Self { http, endpoint })
    }

    /// URL complète du endpoint d'analyse
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec le ticker
    /// - Tous les logs de la requête portent ce contexte
    #[instrument(skip(self))]
    async fn analyze(&self, ticker: &str) -> Result<AnalysisResponse> {
        debug!(endpoint = %self.endpoint, "Sending analysis request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&AnalyzeRequestBody { ticker })
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Analysis service returned error status");
            return Err(AnalyzeError::Status(status));
        }

        // Lit le body puis le parse séparément : une erreur de forme
        // devient Payload, pas Network
        let body = response.bytes().await?;
        let analysis: AnalysisResponse = serde_json::from_slice(&body)?;

        info!(
            bytes = body.len(),
            has_chart = analysis.chart_data.is_some(),
            has_valuation = analysis.valuation.is_some(),
            "Analysis received"
        );
        Ok(analysis)
    }
}

/// Construit l'URL du endpoint à partir de l'URL de base
fn endpoint_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url)
        .map_err(|e| AnalyzeError::InvalidUrl(format!("{base_url} ({e})")))?;

    if base.cannot_be_a_base() {
        return Err(AnalyzeError::InvalidUrl(base_url.to_string()));
    }

    base.join(ANALYZE_PATH)
        .map_err(|e| AnalyzeError::InvalidUrl(format!("{base_url} ({e})")))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Sert une seule réponse HTTP brute et rend la requête reçue
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request_complete(&request) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    /// Vrai quand les headers et tout le body annoncé ont été reçus
    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };

        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        buf.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_endpoint_url() {
        let client = AnalysisClient::new("http://localhost:8000", None).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8000/api/analyze");

        let client = AnalysisClient::new("https://example.com/ignored/", None).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://example.com/api/analyze");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AnalysisClient::new("not a url", None);
        assert!(matches!(result, Err(AnalyzeError::InvalidUrl(_))));

        let result = AnalysisClient::new("mailto:someone@example.com", None);
        assert!(matches!(result, Err(AnalyzeError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let body = r#"{"chartData":{"labels":["d1"],"datasets":[]},"valuation":{"fairValue":150.0,"growthRate":12}}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let client = AnalysisClient::new(&base_url, None).unwrap();
        let analysis = client.analyze("AAPL").await.unwrap();

        let valuation = analysis.valuation.unwrap();
        assert_eq!(valuation.fair_value, 150.0);
        assert_eq!(valuation.growth_rate, 12.0);
        assert_eq!(
            analysis.chart_data.unwrap().as_value(),
            &serde_json::json!({"labels": ["d1"], "datasets": []})
        );

        // Vérifie la forme de la requête envoyée
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/analyze HTTP/1.1"));
        assert!(request.ends_with(r#"{"ticker":"AAPL"}"#));
    }

    #[tokio::test]
    async fn test_analyze_missing_fields_are_none() {
        let (base_url, server) = serve_once("200 OK", r#"{"chartData":null}"#).await;

        let client = AnalysisClient::new(&base_url, None).unwrap();
        let analysis = client.analyze("MSFT").await.unwrap();

        assert_eq!(analysis, AnalysisResponse::default());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_analyze_error_status() {
        let (base_url, server) =
            serve_once("404 Not Found", r#"{"detail":"Earnings data not found"}"#).await;

        let client = AnalysisClient::new(&base_url, None).unwrap();
        let result = client.analyze("ZZZZ").await;

        match result {
            Err(AnalyzeError::Status(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected a status error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_analyze_malformed_payload() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"valuation":{"fairValue":"oops"}}"#).await;

        let client = AnalysisClient::new(&base_url, None).unwrap();
        let result = client.analyze("AAPL").await;

        assert!(matches!(result, Err(AnalyzeError::Payload(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_analyze_connection_refused() {
        // Réserve un port puis le libère : plus personne n'écoute dessus
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = AnalysisClient::new(&base_url, None).unwrap();
        let result = client.analyze("AAPL").await;

        assert!(matches!(result, Err(AnalyzeError::Network(_))));
    }
}
