// ============================================================================
// Structure : Valuation
// ============================================================================
// Résumé de valorisation retourné par le service d'analyse
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : "fairValue" (JSON) -> fair_value (Rust)
// 2. Option<String> : champ facultatif, absent de certaines réponses
// 3. Display de f64 : affiche 12.0 comme "12" et 7.5 comme "7.5"
// 4. rust_decimal : arrondi d'une égalité exacte vers le haut (1.125 -> 1.13)
// ============================================================================

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Valorisation d'un ticker calculée par le service externe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    /// Valeur intrinsèque estimée (en dollars)
    pub fair_value: f64,

    /// Croissance annuelle attendue, en pourcentage (ex: 12.0 pour 12%)
    pub growth_rate: f64,

    /// Résumé stratégique optionnel (texte libre fourni par le service)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl Valuation {
    /// Crée une valorisation sans résumé stratégique
    pub fn new(fair_value: f64, growth_rate: f64) -> Self {
        Self {
            fair_value,
            growth_rate,
            strategy: None,
        }
    }

    /// Valeur intrinsèque formatée : `$` + exactement deux décimales
    ///
    /// CONCEPT : la valeur binaire exacte est arrondie, égalité loin de zéro
    /// - 1.125 est exact en f64 : "$1.13" (format! donnerait "$1.12")
    /// - 1.005 vaut en réalité 1.00499... : "$1.00"
    ///
    /// # Exemple
    /// ```
    /// use fairvalue::models::Valuation;
    /// assert_eq!(Valuation::new(123.456, 7.0).fair_value_display(), "$123.46");
    /// ```
    pub fn fair_value_display(&self) -> String {
        match Decimal::from_f64_retain(self.fair_value) {
            Some(exact) => {
                let rounded =
                    exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                format!("${:.2}", rounded)
            }
            // NaN, infini ou hors de la plage de Decimal
            None => format!("${:.2}", self.fair_value),
        }
    }

    /// Croissance formatée : nombre brut + "% per year"
    ///
    /// -0.0 s'affiche "0", pas "-0".
    pub fn growth_display(&self) -> String {
        let growth = if self.growth_rate == 0.0 { 0.0 } else { self.growth_rate };
        format!("{}% per year", growth)
    }

    /// Ligne complète "Intrinsic Value: $..."
    pub fn intrinsic_value_line(&self) -> String {
        format!("Intrinsic Value: {}", self.fair_value_display())
    }

    /// Ligne complète "Expected Growth: ...% per year"
    pub fn expected_growth_line(&self) -> String {
        format!("Expected Growth: {}", self.growth_display())
    }

    /// Résumé stratégique s'il est présent et non vide
    pub fn strategy_summary(&self) -> Option<&str> {
        self.strategy
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
