// ============================================================================
// FairValue - Valorisation d'actions dans le terminal
// ============================================================================
// Saisie d'un ticker, appel au service d'analyse, affichage du graphique
// et du résumé de valorisation
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread : l'appel HTTP ne bloque jamais l'UI
// 4. Restauration du terminal, même en cas d'erreur
// ============================================================================

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use fairvalue::api::AnalysisClient;
use fairvalue::app::App;
use fairvalue::config::Config;
use fairvalue::ui::{handle_event, render, EventHandler};
use fairvalue::worker::{drain_outcomes, spawn_worker, WorkerHandle};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `<log_dir>/fairvalue.log.<date>`.
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/fairvalue/logs/fairvalue.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=fairvalue=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "fairvalue.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: fairvalue::api::analyze)
                .with_thread_ids(true) // Distingue UI et worker
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour fairvalue et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairvalue=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    // Si le logging échoue, on continue quand même sans logs
    init_logging(&config.log_dir()).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, timeout = ?config.timeout(), "FairValue starting up");

    let client = AnalysisClient::new(&config.api_url, config.timeout())
        .context("Échec de la création du client d'analyse")?;
    let worker = spawn_worker(client)?;

    let mut app = config
        .ticker
        .as_deref()
        .map(App::with_ticker)
        .unwrap_or_default();

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &worker);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    // Pas de cancellation : si une requête est en vol, on n'attend pas son règlement
    if app.is_loading() {
        info!("Request still in flight at exit, not waiting for the worker");
    } else if let Err(e) = worker.shutdown() {
        error!(error = ?e, "Worker did not stop cleanly");
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface (render)
//   2. Traiter un événement (input), envoyer la requête éventuelle
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// App appartient à cette boucle : le worker ne reçoit que des requêtes
/// et ne renvoie que des résultats.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    worker: &WorkerHandle,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS
        drain_outcomes(app, worker);

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                if let Some(request) = handle_event(app, event) {
                    let generation = request.generation;
                    if !worker.submit(request) {
                        // Worker mort : on règle tout de suite comme un échec
                        app.settle_failure(generation);
                    }
                }
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// - Bracketed paste : un collage arrive comme un seul événement
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;

    terminal.show_cursor()?;

    Ok(())
}
