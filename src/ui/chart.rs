// ============================================================================
// Chart - Panneau "EPS vs Price Chart"
// ============================================================================
// Affiche le payload graphique du service sous forme de graphique ligne
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne multi-séries
// 2. Dataset : une série par dataset du payload
// 3. Axis : bornes calculées sur toutes les séries
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{ChartData, LineChartView};

/// Titre du panneau graphique
pub const CHART_TITLE: &str = "EPS vs Price Chart";

/// Couleurs utilisées quand le dataset n'en précise pas (ou une inconnue)
const FALLBACK_COLORS: [Color; 4] = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta];

/// Dessine le panneau graphique
pub fn render_chart(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", CHART_TITLE),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let view = chart.line_chart();

    // Payload d'une forme que l'on ne sait pas tracer : le panneau reste visible
    let Some((min_y, max_y)) = view.y_bounds() else {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Aucune série à afficher",
            Style::default().fg(Color::Gray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    // Ajoute une marge de 5% pour que le graphique respire
    let margin = ((max_y - min_y) * 0.05).max(0.5);
    let y_min = min_y - margin;
    let y_max = max_y + margin;
    let x_max = view.x_len().saturating_sub(1).max(1) as f64;

    let datasets: Vec<Dataset> = view
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            Dataset::default()
                .name(series.label.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(series.color.as_deref(), i)))
                .data(&series.points)
        })
        .collect();

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, x_max])
        .labels(x_labels(&view));

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.2}", y_min)),
            Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.2}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Labels de l'axe X : premier et dernier label du payload
fn x_labels(view: &LineChartView) -> Vec<Span<'static>> {
    match (view.labels.first(), view.labels.last()) {
        (Some(first), Some(last)) if view.labels.len() > 1 => {
            vec![Span::raw(first.clone()), Span::raw(last.clone())]
        }
        (Some(only), _) => vec![Span::raw(only.clone())],
        _ => Vec::new(),
    }
}

/// Couleur d'une série : celle du payload si ratatui la connaît
///
/// CONCEPT RUST : FromStr
/// - "blue", "green", "#00ff00" sont parsés par ratatui::style::Color
fn series_color(requested: Option<&str>, index: usize) -> Color {
    requested
        .and_then(|name| name.parse::<Color>().ok())
        .unwrap_or(FALLBACK_COLORS[index % FALLBACK_COLORS.len()])
}
