// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui exécute les requêtes d'analyse
// - Reçoit des WorkerCommand via un channel (commands)
// - Renvoie des WorkerOutcome via un autre channel (outcomes)
// - L'UI ne bloque jamais pendant l'appel HTTP
// ============================================================================

use std::cell::Cell;
use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::api::{AnalysisResponse, AnalysisService};
use crate::app::{AnalyzeRequest, App};

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Analyser un ticker
    Analyze(AnalyzeRequest),
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
pub enum WorkerOutcome {
    /// Réponse du service reçue et décodée
    Analyzed {
        generation: u64,
        ticker: String,
        response: AnalysisResponse,
    },

    /// Échec de la requête (réseau, statut HTTP, payload)
    Failed {
        generation: u64,
        ticker: String,
        error: String,
    },
}

impl WorkerOutcome {
    /// Génération de la requête d'origine
    pub fn generation(&self) -> u64 {
        match self {
            WorkerOutcome::Analyzed { generation, .. }
            | WorkerOutcome::Failed { generation, .. } => *generation,
        }
    }
}

/// Poignée sur le worker : envoi de commandes, lecture des résultats
pub struct WorkerHandle {
    commands: mpsc::Sender<WorkerCommand>,
    outcomes: mpsc::Receiver<WorkerOutcome>,
    thread: JoinHandle<()>,
    disconnected: Cell<bool>,
}

/// Le worker thread s'est arrêté : plus aucun résultat n'arrivera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerDisconnected;

/// Démarre le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - Le runtime tokio est créé avant le spawn : une erreur remonte à l'appelant
/// - std::thread::spawn() : crée un thread OS qui possède le runtime
/// - block_on() bloque le worker (pas l'UI) pendant l'appel
pub fn spawn_worker<S>(service: S) -> Result<WorkerHandle>
where
    S: AnalysisService + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio du worker")?;

    let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<WorkerOutcome>();

    let thread = std::thread::Builder::new()
        .name("analysis-worker".to_string())
        .spawn(move || {
            // Boucle de traitement : se termine quand le Sender est fermé
            while let Ok(command) = command_rx.recv() {
                debug!(?command, "Worker received command");

                let outcome = match command {
                    WorkerCommand::Analyze(request) => {
                        runtime.block_on(run_analysis(&service, request))
                    }
                };

                if outcome_tx.send(outcome).is_err() {
                    info!("Outcome receiver dropped, worker exiting");
                    return;
                }
            }
            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du worker thread")?;

    Ok(WorkerHandle {
        commands: command_tx,
        outcomes: outcome_rx,
        thread,
        disconnected: Cell::new(false),
    })
}

/// Exécute une requête et la transforme en WorkerOutcome
///
/// Toutes les erreurs finissent ici : loggées puis renvoyées comme Failed.
async fn run_analysis<S: AnalysisService>(service: &S, request: AnalyzeRequest) -> WorkerOutcome {
    let AnalyzeRequest { generation, ticker } = request;

    match service.analyze(&ticker).await {
        Ok(response) => {
            info!(ticker = %ticker, generation, "Analysis succeeded");
            WorkerOutcome::Analyzed {
                generation,
                ticker,
                response,
            }
        }
        Err(e) => {
            error!(ticker = %ticker, generation, error = %e, "Error fetching data");
            WorkerOutcome::Failed {
                generation,
                ticker,
                error: e.to_string(),
            }
        }
    }
}

/// Applique un résultat du worker à l'état
///
/// Un échec ne change que `loading` : rien n'est montré à l'utilisateur.
pub fn apply_outcome(app: &mut App, outcome: WorkerOutcome) {
    match outcome {
        WorkerOutcome::Analyzed {
            generation,
            ticker,
            response,
        } => {
            if app.settle_success(generation, response) {
                debug!(ticker = %ticker, generation, "Analysis applied");
            }
        }
        WorkerOutcome::Failed {
            generation,
            ticker,
            error,
        } => {
            if app.settle_failure(generation) {
                debug!(
                    ticker = %ticker,
                    generation,
                    error = %error,
                    "Failure applied, previous data kept"
                );
            }
        }
    }
}

/// Applique tous les résultats disponibles
///
/// Si le worker est mort, la requête en vol ne se réglera jamais : elle est
/// réglée ici comme un échec pour réactiver le bouton.
pub fn drain_outcomes(app: &mut App, worker: &WorkerHandle) {
    loop {
        match worker.try_recv() {
            Ok(Some(outcome)) => apply_outcome(app, outcome),
            Ok(None) => return,
            Err(WorkerDisconnected) => {
                if app.is_loading() {
                    app.settle_failure(app.generation);
                }
                return;
            }
        }
    }
}

impl WorkerHandle {
    /// Envoie une requête au worker
    ///
    /// Retourne false si le worker est arrêté.
    pub fn submit(&self, request: AnalyzeRequest) -> bool {
        match self.commands.send(WorkerCommand::Analyze(request)) {
            Ok(()) => true,
            Err(e) => {
                error!(command = ?e.0, "Worker thread disconnected, command dropped");
                false
            }
        }
    }

    /// Lit un résultat sans bloquer
    ///
    /// CONCEPT : Non-blocking receive avec try_recv
    /// - Empty : pas de résultat, c'est normal
    /// - Disconnected : worker mort, loggé une seule fois
    pub fn try_recv(&self) -> std::result::Result<Option<WorkerOutcome>, WorkerDisconnected> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                if !self.disconnected.replace(true) {
                    error!("Worker thread disconnected!");
                }
                Err(WorkerDisconnected)
            }
        }
    }

    /// Attend un résultat au plus `timeout`
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<WorkerOutcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }

    /// Ferme le channel de commandes et attend la fin du worker
    ///
    /// Si une requête est encore en vol, on attend son règlement.
    pub fn shutdown(self) -> Result<()> {
        let WorkerHandle {
            commands, thread, ..
        } = self;
        drop(commands);

        thread
            .join()
            .map_err(|_| anyhow::anyhow!("Le worker thread a paniqué"))
    }
}

// ============================================================================
// Tests
// ============================================================================
