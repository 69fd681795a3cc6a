// ============================================================================
// Home - Rendu de l'écran de valorisation
// ============================================================================
// Dessine l'écran unique : titre, champ ticker, bouton, graphique, résumé
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage vertical, construit selon les données présentes
// 3. Paragraph / Block / Span : composition du texte
//
// Le rendu est une fonction pure de &App : aucune modification d'état ici.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::Valuation;
use crate::ui::chart;

/// Titre de l'application
pub const TITLE: &str = "AI-Powered Stock Valuation";

/// Texte affiché quand le champ est vide
pub const PLACEHOLDER: &str = "Enter Stock Ticker (e.g., AAPL)";

/// Label du bouton au repos
pub const IDLE_LABEL: &str = "Get Valuation";

/// Label du bouton pendant une requête
pub const BUSY_LABEL: &str = "Analyzing...";

/// Titre du panneau de valorisation
pub const SUMMARY_TITLE: &str = "Valuation Summary";

/// Label courant du bouton
pub fn trigger_label(app: &App) -> &'static str {
    if app.is_loading() {
        BUSY_LABEL
    } else {
        IDLE_LABEL
    }
}

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application (lecture seule)
pub fn render(frame: &mut Frame, app: &App) {
    // CONCEPT : Layout conditionnel
    // - Les panneaux graphique et résumé n'existent que si les données existent
    let mut constraints = vec![
        Constraint::Length(3), // Titre
        Constraint::Length(3), // Champ ticker
        Constraint::Length(3), // Bouton
    ];
    if app.chart_data.is_some() {
        constraints.push(Constraint::Min(8));
    }
    if let Some(valuation) = &app.valuation {
        constraints.push(Constraint::Length(summary_height(valuation, app.fetched_at.is_some())));
    }
    constraints.push(Constraint::Min(0)); // Espace libre
    constraints.push(Constraint::Length(3)); // Footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size())
        .to_vec();

    render_header(frame, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_trigger(frame, app, chunks[2]);

    let mut next = 3;
    if let Some(chart_data) = &app.chart_data {
        chart::render_chart(frame, chart_data, chunks[next]);
        next += 1;
    }
    if let Some(valuation) = &app.valuation {
        render_summary(frame, app, valuation, chunks[next]);
    }

    render_footer(frame, app, chunks[chunks.len() - 1]);
}

/// Dessine le header avec le titre
fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le champ de saisie (placeholder grisé si vide)
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Ticker ");
    let cursor = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::SLOW_BLINK);

    let line = if app.ticker().is_empty() {
        Line::from(vec![
            Span::styled("█", cursor),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                app.ticker(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("█", cursor),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Dessine le bouton : bleu si actif, grisé pendant le chargement
fn render_trigger(frame: &mut Frame, app: &App, area: Rect) {
    let (border, label_style) = if app.is_trigger_enabled() {
        (
            Style::default().fg(Color::Blue),
            Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )
    };

    let label = format!(" {} ", trigger_label(app));
    let paragraph = Paragraph::new(Line::from(Span::styled(label, label_style)))
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Hauteur du panneau résumé (bordures comprises)
fn summary_height(valuation: &Valuation, has_timestamp: bool) -> u16 {
    let mut lines = 2; // Intrinsic Value + Expected Growth
    if valuation.strategy_summary().is_some() {
        lines += 3; // ligne vide + texte (peut tenir sur deux lignes)
    }
    if has_timestamp {
        lines += 1;
    }
    lines + 2
}

/// Dessine le panneau "Valuation Summary"
fn render_summary(frame: &mut Frame, app: &App, valuation: &Valuation, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", SUMMARY_TITLE),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut text = vec![
        Line::from(vec![
            Span::styled("Intrinsic Value:", bold),
            Span::raw(" "),
            Span::styled(valuation.fair_value_display(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Expected Growth:", bold),
            Span::raw(" "),
            Span::raw(valuation.growth_display()),
        ]),
    ];

    if let Some(strategy) = valuation.strategy_summary() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            strategy.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    if let Some(fetched_at) = app.fetched_at {
        text.push(Line::from(Span::styled(
            format!("Mis à jour à {}", fetched_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key),
            Span::styled(
                "[ESC]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                key,
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[Enter]", key),
            Span::raw(" Valoriser  "),
            Span::styled("[Ctrl+U]", key),
            Span::raw(" Effacer  "),
            Span::styled("[ESC]", key),
            Span::raw(" Quitter"),
        ])
    };

    let paragraph = Paragraph::new(shortcuts)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
