//! # Analysis Worker
//!
//! Runs [`render`] on a dedicated thread so a caller polling for UI updates
//! never computes on its own thread.
//!
//! ## Threading
//! - Every request carries a full `(EngineState, MagnitudeSpectrum)`
//!   snapshot, so a frame never mixes selections from two moments
//! - Results come back over a crossbeam channel, tagged with the request id
//! - A separate bounded channel carries the shutdown signal

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::engine::{EngineState, Frame, render};
use crate::error::EngineError;
use crate::spectrum::MagnitudeSpectrum;

/// One analysis job.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub id: u64,
    pub state: EngineState,
    pub spectrum: MagnitudeSpectrum,
}

/// The frame computed for a request.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub id: u64,
    pub frame: Frame,
}

/// Handle to the analysis thread. Dropping it stops and joins the thread.
#[derive(Debug)]
pub struct AnalysisWorker {
    request_tx: Option<Sender<AnalysisRequest>>,
    result_rx: Receiver<AnalysisResult>,
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
    next_id: u64,
}

impl AnalysisWorker {
    /// Spawns the analysis thread.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<AnalysisRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<AnalysisResult>();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);

        let thread_handle = thread::spawn(move || {
            log::info!("[WORKER] Analysis thread started");
            loop {
                crossbeam_channel::select! {
                    recv(request_rx) -> msg => match msg {
                        Ok(request) => {
                            let frame = render(&request.state, &request.spectrum);
                            if result_tx.send(AnalysisResult { id: request.id, frame }).is_err() {
                                log::warn!("[WORKER] Result receiver dropped");
                                break;
                            }
                        }
                        Err(_) => {
                            log::debug!("[WORKER] Request channel closed");
                            break;
                        }
                    },
                    recv(shutdown_rx) -> _ => {
                        log::debug!("[WORKER] Received shutdown signal");
                        break;
                    },
                }
            }
            log::info!("[WORKER] Analysis thread finished");
        });

        Self {
            request_tx: Some(request_tx),
            result_rx,
            shutdown_tx,
            thread_handle: Some(thread_handle),
            next_id: 0,
        }
    }

    /// Queues a snapshot for analysis and returns its request id.
    pub fn submit(&mut self, state: EngineState, spectrum: MagnitudeSpectrum) -> Result<u64, EngineError> {
        let id = self.next_id;
        let sender = self.request_tx.as_ref().ok_or(EngineError::WorkerClosed)?;
        sender
            .send(AnalysisRequest { id, state, spectrum })
            .map_err(|_| EngineError::WorkerClosed)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Takes every finished result without blocking.
    pub fn drain(&self) -> Vec<AnalysisResult> {
        self.result_rx.try_iter().collect()
    }

    /// Takes the most recent finished result, discarding older ones.
    pub fn latest(&self) -> Option<AnalysisResult> {
        self.result_rx.try_iter().last()
    }

    /// Blocks until the next result arrives.
    pub fn recv(&self) -> Result<AnalysisResult, EngineError> {
        self.result_rx.recv().map_err(|_| EngineError::WorkerClosed)
    }

    /// Stops the thread and waits for it to exit. Requests still queued
    /// may be dropped; finished results stay readable.
    pub fn shutdown(&mut self) {
        // Closing the request channel also ends the loop.
        self.request_tx = None;
        let _ = self.shutdown_tx.try_send(());
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::warn!("[WORKER] Analysis thread panicked");
            }
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
