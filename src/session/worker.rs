use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use log::{info, trace, warn};

use crate::error::{Error, Result};
use crate::fractal::{GridParams, ResultMap};
use crate::render::sample_grid_cancellable;

/// Message envoyé du thread de rendu vers le propriétaire du worker.
pub enum RenderMessage {
    Complete {
        generation: u64,
        map: ResultMap,
        elapsed: Duration,
    },
    Failed {
        generation: u64,
        error: Error,
    },
    Cancelled {
        generation: u64,
    },
}

/// Grille terminée, transférée au demandeur.
#[derive(Debug)]
pub struct CompletedRender {
    pub generation: u64,
    pub params: GridParams,
    pub map: ResultMap,
    pub elapsed: Duration,
}

/// Calcule des grilles en arrière-plan ; une nouvelle requête annule la précédente.
///
/// Chaque requête a son propre flag d'annulation et son propre channel :
/// remplacer le receiver suffit à ignorer les résultats périmés.
pub struct GridWorker {
    label: &'static str,
    generation: u64,
    cancel: Arc<AtomicBool>,
    receiver: Option<mpsc::Receiver<RenderMessage>>,
    pending: Option<GridParams>,
}

impl GridWorker {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            generation: 0,
            cancel: Arc::new(AtomicBool::new(false)),
            receiver: None,
            pending: None,
        }
    }

    /// Lance le calcul de `params` et renvoie son numéro de génération.
    pub fn submit(&mut self, params: GridParams) -> u64 {
        // Annuler tout rendu en cours
        self.cancel.store(true, Ordering::Relaxed);
        if self.receiver.is_some() {
            trace!("{}: génération {} remplacée", self.label, self.generation);
        }

        self.cancel = Arc::new(AtomicBool::new(false));
        self.generation += 1;

        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);
        self.pending = Some(params.clone());

        let generation = self.generation;
        let cancel = Arc::clone(&self.cancel);
        thread::spawn(move || {
            let started = Instant::now();
            let message = match sample_grid_cancellable(&params, &cancel) {
                Ok(Some(map)) => RenderMessage::Complete {
                    generation,
                    map,
                    elapsed: started.elapsed(),
                },
                Ok(None) => RenderMessage::Cancelled { generation },
                Err(error) => RenderMessage::Failed { generation, error },
            };
            // le receiver a pu être remplacé entre-temps
            let _ = sender.send(message);
        });

        generation
    }

    /// Annule le rendu en cours sans en lancer de nouveau.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_busy(&self) -> bool {
        self.receiver.is_some()
    }

    /// Dernière génération soumise.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Récupère le résultat courant s'il est prêt, sans bloquer.
    pub fn poll(&mut self) -> Option<Result<CompletedRender>> {
        let received = self.receiver.as_ref()?.try_recv();
        let message = match received {
            Ok(message) => message,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => return self.abandoned(),
        };
        self.settle(message)
    }

    /// Bloque jusqu'à ce que la génération courante se termine.
    ///
    /// Renvoie `None` si rien n'est en cours ou si le rendu a été annulé.
    pub fn wait(&mut self) -> Option<Result<CompletedRender>> {
        let received = self.receiver.as_ref()?.recv();
        let message = match received {
            Ok(message) => message,
            Err(mpsc::RecvError) => return self.abandoned(),
        };
        self.settle(message)
    }

    fn settle(&mut self, message: RenderMessage) -> Option<Result<CompletedRender>> {
        self.receiver = None;
        let params = self.pending.take()?;
        match message {
            RenderMessage::Complete { generation, map, elapsed } => {
                info!(
                    "{}: génération {} prête en {:.1} ms",
                    self.label,
                    generation,
                    elapsed.as_secs_f64() * 1000.0
                );
                Some(Ok(CompletedRender {
                    generation,
                    params,
                    map,
                    elapsed,
                }))
            }
            RenderMessage::Failed { generation, error } => {
                warn!("{}: génération {} en échec: {}", self.label, generation, error);
                Some(Err(error))
            }
            RenderMessage::Cancelled { generation } => {
                trace!("{}: génération {} annulée", self.label, generation);
                None
            }
        }
    }

    /// Le thread de rendu s'est arrêté sans répondre (panic).
    fn abandoned(&mut self) -> Option<Result<CompletedRender>> {
        warn!("{}: génération {} interrompue sans résultat", self.label, self.generation);
        self.receiver = None;
        self.pending = None;
        None
    }
}

impl Drop for GridWorker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
