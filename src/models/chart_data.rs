// ============================================================================
// Structure : ChartData
// ============================================================================
// Série de données du graphique, telle que retournée par le service d'analyse
//
// CONCEPTS RUST :
// 1. Newtype pattern : ChartData enveloppe un serde_json::Value
// 2. #[serde(transparent)] : (dé)sérialise exactement comme la valeur interne
// 3. Vue typée à la demande : line_chart() interprète le JSON sans le modifier
//
// Le contenu appartient au service : on le stocke tel quel. Seul le rendu
// l'interprète comme un graphique ligne (labels + datasets).
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Données du graphique, opaques à ce niveau
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartData(Value);

/// Une série du graphique ligne (ex: "Stock Price", "EPS Trend")
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Nom de la série
    pub label: String,

    /// Points (x = position dans la série, y = valeur)
    pub points: Vec<(f64, f64)>,

    /// Couleur demandée par le service (ex: "blue", "#00ff00")
    pub color: Option<String>,
}

/// Vue "graphique ligne" d'un ChartData
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChartView {
    /// Labels de l'axe X (dates le plus souvent)
    pub labels: Vec<String>,

    /// Séries avec au moins un point
    pub series: Vec<LineSeries>,
}

impl ChartData {
    /// Enveloppe une valeur JSON brute
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Accès à la valeur brute, non modifiée
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Interprète le payload comme un graphique ligne
    ///
    /// CONCEPT RUST : Option chaining
    /// - Chaque champ absent ou mal typé est simplement ignoré
    /// - Un point null ou non numérique est sauté mais garde sa position en X
    pub fn line_chart(&self) -> LineChartView {
        let labels = self
            .0
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| labels.iter().map(label_text).collect())
            .unwrap_or_default();

        let series = self
            .0
            .get("datasets")
            .and_then(Value::as_array)
            .map(|datasets| datasets.iter().filter_map(parse_series).collect())
            .unwrap_or_default();

        LineChartView { labels, series }
    }
}

impl LineChartView {
    /// Nombre de positions sur l'axe X (labels ou plus longue série)
    pub fn x_len(&self) -> usize {
        let longest = self
            .series
            .iter()
            .filter_map(|s| s.points.last())
            .map(|&(x, _)| x as usize + 1)
            .max()
            .unwrap_or(0);
        longest.max(self.labels.len())
    }

    /// Bornes (min, max) de toutes les valeurs Y, None si aucune série
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|&(_, y)| y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((min, max)) => Some((min.min(y), max.max(y))),
            })
    }

    /// Vrai si aucune série n'a de point
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Texte d'un label (les labels non textuels sont affichés en JSON)
fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extrait une série d'un dataset, None si elle n'a aucun point exploitable
fn parse_series(dataset: &Value) -> Option<LineSeries> {
    let points: Vec<(f64, f64)> = dataset
        .get("data")?
        .as_array()?
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_f64().map(|y| (i as f64, y)))
        .collect();

    if points.is_empty() {
        return None;
    }

    let label = dataset
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or("Series")
        .to_string();

    let color = dataset
        .get("borderColor")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(LineSeries {
        label,
        points,
        color,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ChartData {
        ChartData::new(json!({
            "labels": ["2024-01-01", "2024-01-02", "2024-01-03"],
            "datasets": [
                {
                    "label": "Stock Price",
                    "data": [10.0, 12.5, 11.0],
                    "borderColor": "blue",
                    "fill": false
                },
                {"label": "EPS Trend", "data": [1.2, null, 1.4, 1.5], "borderColor": "green"}
            ]
        }))
    }

    #[test]
    fn test_payload_is_kept_verbatim() {
        let raw = json!({"labels": [], "datasets": [], "extra": {"nested": true}});
        let chart: ChartData = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(chart.as_value(), &raw);
        assert_eq!(serde_json::to_value(&chart).unwrap(), raw);
    }

    #[test]
    fn test_line_chart_view() {
        let view = sample().line_chart();

        assert_eq!(view.labels.len(), 3);
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[0].label, "Stock Price");
        assert_eq!(view.series[0].color.as_deref(), Some("blue"));
        assert_eq!(view.series[0].points, vec![(0.0, 10.0), (1.0, 12.5), (2.0, 11.0)]);

        // Le point null est sauté mais les suivants gardent leur position
        assert_eq!(view.series[1].points, vec![(0.0, 1.2), (2.0, 1.4), (3.0, 1.5)]);
    }

    #[test]
    fn test_x_len_and_bounds() {
        let view = sample().line_chart();

        // La série EPS a 4 positions, plus que les 3 labels
        assert_eq!(view.x_len(), 4);
        assert_eq!(view.y_bounds(), Some((1.2, 12.5)));
    }

    #[test]
    fn test_unknown_shape_gives_empty_view() {
        let view = ChartData::new(json!("not a chart")).line_chart();

        assert!(view.is_empty());
        assert!(view.labels.is_empty());
        assert_eq!(view.y_bounds(), None);
        assert_eq!(view.x_len(), 0);
    }

    #[test]
    fn test_dataset_without_points_is_skipped() {
        let chart = ChartData::new(json!({
            "datasets": [{"label": "Empty", "data": []}, {"data": [3]}]
        }));
        let view = chart.line_chart();

        assert_eq!(view.series.len(), 1);
        assert_eq!(view.series[0].label, "Series");
    }
}
