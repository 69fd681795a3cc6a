// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements clavier / paste et les applique à l'état App
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching avec guards : router chaque touche
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use tracing::{debug, info};

use crate::app::{AnalyzeRequest, App};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Texte collé (bracketed paste)
    Paste(String),

    /// Tick régulier (pas d'événement pendant le poll)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick de 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Paste(text) => Ok(Event::Paste(text)),

                // Resize, mouse, focus : un simple redraw suffit
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : identifier les touches
// ============================================================================

/// ESC : demande (puis confirme) la sortie
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Ctrl+C : sortie immédiate
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    } else {
        false
    }
}

/// Entrée : déclenche la valorisation
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Backspace)
    } else {
        false
    }
}

/// Ctrl+U : vide le champ (comme dans un shell)
pub fn is_clear_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('u') | KeyCode::Char('U'))
    } else {
        false
    }
}

/// Extrait le caractère saisi (texte libre, raccourcis Ctrl/Alt exclus)
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Application d'un événement à l'état
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Retourne la requête à envoyer au worker quand Entrée déclenche une analyse.
pub fn handle_event(app: &mut App, event: Event) -> Option<AnalyzeRequest> {
    match event {
        Event::Key(_) if is_interrupt_event(&event) => {
            info!("User interrupted (Ctrl+C)");
            app.quit();
            None
        }

        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
            None
        }

        Event::Key(_) if is_enter_event(&event) => {
            app.cancel_quit();
            app.fetch_data()
        }

        Event::Key(_) if is_backspace_event(&event) => {
            app.cancel_quit();
            app.backspace();
            None
        }

        Event::Key(_) if is_clear_event(&event) => {
            app.cancel_quit();
            debug!("User cleared ticker input");
            app.clear_ticker();
            None
        }

        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
            None
        }

        Event::Paste(ref text) => {
            app.cancel_quit();
            app.append_str(text);
            None
        }

        Event::Tick => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
