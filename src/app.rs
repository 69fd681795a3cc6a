// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'écran de valorisation
//
// CONCEPTS RUST :
// 1. State Management : tout l'état de l'écran dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Option<T> : chart_data / valuation absents tant qu'aucune réponse n'est arrivée
//
// PATTERN : "Application State"
// - Le rendu lit depuis App (&App), sans effet de bord
// - Toutes les modifications passent par les méthodes de App
// - App appartient à la boucle d'événements, jamais partagé entre threads
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::api::AnalysisResponse;
use crate::models::{ChartData, Valuation};

/// Requête d'analyse à envoyer au worker
///
/// CONCEPT : Génération de requête
/// - Chaque déclenchement incrémente le compteur
/// - Une réponse dont la génération n'est plus la dernière est ignorée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Identifiant croissant de la requête
    pub generation: u64,

    /// Ticker tel que stocké (déjà en majuscules)
    pub ticker: String,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Ticker saisi, toujours normalisé en majuscules
    /// (privé : seul set_ticker() peut l'écrire)
    ticker: String,

    /// Données du graphique de la dernière analyse réussie
    pub chart_data: Option<ChartData>,

    /// Valorisation de la dernière analyse réussie
    pub valuation: Option<Valuation>,

    /// Vrai entre le déclenchement et le règlement de la requête
    pub loading: bool,

    /// Génération de la dernière requête envoyée
    pub generation: u64,

    /// Heure de la dernière analyse réussie
    pub fetched_at: Option<DateTime<Local>>,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de ESC : confirm_quit = true
    /// - Deuxième pression de ESC : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,
}

impl App {
    /// Crée une App vide : pas de ticker, pas de données, pas de chargement
    pub fn new() -> Self {
        Self {
            running: true,
            ticker: String::new(),
            chart_data: None,
            valuation: None,
            loading: false,
            generation: 0,
            fetched_at: None,
            confirm_quit: false,
        }
    }

    /// Crée une App avec un ticker pré-rempli (normalisé comme une saisie)
    pub fn with_ticker(ticker: &str) -> Self {
        let mut app = Self::new();
        app.set_ticker(ticker);
        app
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Saisie du ticker
    // ========================================================================

    /// Ticker courant
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Remplace la valeur du champ : stockée en majuscules, sans autre validation
    pub fn set_ticker(&mut self, raw: &str) {
        self.ticker = raw.to_uppercase();
    }

    /// Ajoute un caractère saisi
    pub fn append_char(&mut self, c: char) {
        let mut value = self.ticker.clone();
        value.push(c);
        self.set_ticker(&value);
    }

    /// Ajoute un texte collé (les retours à la ligne sont retirés)
    pub fn append_str(&mut self, text: &str) {
        let mut value = self.ticker.clone();
        value.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
        self.set_ticker(&value);
    }

    /// Supprime le dernier caractère
    pub fn backspace(&mut self) {
        let mut value = self.ticker.clone();
        value.pop();
        self.set_ticker(&value);
    }

    /// Vide le champ
    pub fn clear_ticker(&mut self) {
        self.set_ticker("");
    }

    // ========================================================================
    // Déclenchement et règlement de la requête
    // ========================================================================

    /// Vérifie si des données sont en cours de chargement
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Le bouton est désactivé pendant le chargement
    pub fn is_trigger_enabled(&self) -> bool {
        !self.loading
    }

    /// Déclenche une analyse pour le ticker courant
    ///
    /// CONCEPT RUST : Option comme résultat d'une commande
    /// - None : rien à faire (ticker vide ou requête déjà en vol), état inchangé
    /// - Some(request) : loading passe à true, l'appelant envoie la requête au worker
    pub fn fetch_data(&mut self) -> Option<AnalyzeRequest> {
        if self.ticker.trim().is_empty() {
            debug!("Empty ticker, ignoring trigger");
            return None;
        }

        if self.loading {
            debug!(generation = self.generation, "Request already in flight, ignoring trigger");
            return None;
        }

        self.loading = true;
        self.generation += 1;
        info!(ticker = %self.ticker, generation = self.generation, "Analysis requested");

        Some(AnalyzeRequest {
            generation: self.generation,
            ticker: self.ticker.clone(),
        })
    }

    /// Applique une réponse réussie
    ///
    /// Les champs sont stockés tels quels (un champ absent efface le panneau).
    /// Retourne false si la réponse est périmée et a été ignorée.
    pub fn settle_success(&mut self, generation: u64, response: AnalysisResponse) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.chart_data = response.chart_data;
        self.valuation = response.valuation;
        self.fetched_at = Some(Local::now());
        self.loading = false;
        true
    }

    /// Applique un échec : seules les données précédentes restent affichées
    ///
    /// Retourne false si l'échec concerne une requête périmée.
    pub fn settle_failure(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.loading = false;
        true
    }

    /// Vrai si la génération est celle de la dernière requête envoyée
    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            warn!(
                generation,
                current = self.generation,
                "Discarding outcome of a stale request"
            );
            return false;
        }
        true
    }

    // ========================================================================
    // Quit confirmation
    // ========================================================================

    /// Demande la confirmation de quitter (première pression de ESC)
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// Convention Rust : si new() ne prend pas de paramètres, implémenter Default
impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(fair_value: f64, growth_rate: f64) -> AnalysisResponse {
        AnalysisResponse {
            chart_data: Some(ChartData::new(json!({"labels": ["d1"], "datasets": []}))),
            valuation: Some(Valuation::new(fair_value, growth_rate)),
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.ticker(), "");
        assert!(app.chart_data.is_none());
        assert!(app.valuation.is_none());
        assert!(!app.is_loading());
        assert!(app.is_trigger_enabled());
    }

    #[test]
    fn test_ticker_is_uppercased() {
        let mut app = App::new();
        for input in ["aapl", "Brk.b", "bTc-usd", "  spaced  ", "ß", ""] {
            app.set_ticker(input);
            assert_eq!(app.ticker(), input.to_uppercase());
        }
    }

    #[test]
    fn test_typing_normalizes_each_change() {
        let mut app = App::new();
        for c in "aapl".chars() {
            app.append_char(c);
        }
        assert_eq!(app.ticker(), "AAPL");

        app.backspace();
        assert_eq!(app.ticker(), "AAP");

        app.append_str("l\n");
        assert_eq!(app.ticker(), "AAPL");

        app.clear_ticker();
        assert_eq!(app.ticker(), "");
    }

    #[test]
    fn test_with_ticker_normalizes() {
        assert_eq!(App::with_ticker("msft").ticker(), "MSFT");
    }

    #[test]
    fn test_empty_or_blank_ticker_is_noop() {
        for blank in ["", " ", "\t  "] {
            let mut app = App::with_ticker(blank);
            assert_eq!(app.fetch_data(), None);
            assert!(!app.is_loading());
            assert_eq!(app.generation, 0);
            assert!(app.chart_data.is_none());
            assert!(app.valuation.is_none());
        }
    }

    #[test]
    fn test_fetch_data_sets_loading() {
        let mut app = App::with_ticker("aapl");

        let request = app.fetch_data().unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.generation, 1);
        assert!(app.is_loading());
        assert!(!app.is_trigger_enabled());
    }

    #[test]
    fn test_trigger_is_disabled_while_loading() {
        let mut app = App::with_ticker("AAPL");
        app.fetch_data().unwrap();

        assert_eq!(app.fetch_data(), None);
        assert_eq!(app.generation, 1);
        assert!(app.is_loading());
    }

    #[test]
    fn test_success_stores_payload() {
        let mut app = App::with_ticker("aapl");
        let request = app.fetch_data().unwrap();

        assert!(app.settle_success(request.generation, response(150.0, 12.0)));
        assert!(!app.is_loading());
        assert!(app.is_trigger_enabled());
        assert!(app.chart_data.is_some());
        assert!(app.fetched_at.is_some());

        let valuation = app.valuation.as_ref().unwrap();
        assert_eq!(valuation.intrinsic_value_line(), "Intrinsic Value: $150.00");
        assert_eq!(valuation.expected_growth_line(), "Expected Growth: 12% per year");
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut app = App::with_ticker("AAPL");

        // Premier échec : rien n'est affiché
        let first = app.fetch_data().unwrap();
        assert!(app.settle_failure(first.generation));
        assert!(!app.is_loading());
        assert!(app.chart_data.is_none());
        assert!(app.valuation.is_none());

        // Succès puis échec : les données du succès restent
        let second = app.fetch_data().unwrap();
        app.settle_success(second.generation, response(10.0, 1.0));
        let third = app.fetch_data().unwrap();
        assert!(app.settle_failure(third.generation));

        assert!(!app.is_loading());
        assert_eq!(app.valuation, Some(Valuation::new(10.0, 1.0)));
        assert!(app.chart_data.is_some());
    }

    #[test]
    fn test_repeated_requests_overwrite() {
        let mut app = App::with_ticker("AAPL");

        let first = app.fetch_data().unwrap();
        app.settle_success(first.generation, response(1.0, 1.0));
        let second = app.fetch_data().unwrap();
        app.settle_success(second.generation, response(2.0, 2.0));

        assert_eq!(app.valuation, Some(Valuation::new(2.0, 2.0)));
    }

    #[test]
    fn test_missing_fields_clear_panels() {
        let mut app = App::with_ticker("AAPL");
        let first = app.fetch_data().unwrap();
        app.settle_success(first.generation, response(1.0, 1.0));

        let second = app.fetch_data().unwrap();
        app.settle_success(second.generation, AnalysisResponse::default());

        assert!(app.chart_data.is_none());
        assert!(app.valuation.is_none());
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let mut app = App::with_ticker("AAPL");
        let request = app.fetch_data().unwrap();

        assert!(!app.settle_success(request.generation + 1, response(9.0, 9.0)));
        assert!(!app.settle_failure(request.generation + 1));
        assert!(app.is_loading());
        assert!(app.valuation.is_none());
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = App::new();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }
}
