// crates/quickcut-media/src/worker.rs
//
// ExportWorker: owns the result channel and the per-job cancel flags.
// All public API the host calls lives here.
//
// One job = one thread = one fresh engine instance from the factory.
// Progress percentages from the engine are normalized to a monotone
// non-decreasing 0..=100 stream that terminates in 100 (success) or stops
// at the abort. Cancellation surfaces as `Error { msg: "cancelled" }` —
// the host treats that sentinel as an aborted state distinct from a real
// failure, keeping the cancel path identical to the error path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use crate::engine::EngineFactory;
use crate::export::{Container, ExportSpec};

/// Sentinel error message for a user-initiated abort.
pub const CANCELLED: &str = "cancelled";

/// Results sent from export job threads to the host.
#[derive(Debug, Clone)]
pub enum ExportResult {
    /// Integer percentage, 0..=100, monotone non-decreasing per job.
    Progress { job_id: Uuid, percent: u8 },
    /// The encoded byte buffer, ready to hand back as a download.
    Done { job_id: Uuid, container: Container, data: Vec<u8> },
    Error { job_id: Uuid, msg: String },
}

pub struct ExportWorker {
    /// Result channel: progress, done, error for every job.
    pub rx:   Receiver<ExportResult>,
    tx:       Sender<ExportResult>,
    factory:  Arc<dyn EngineFactory>,
    shutdown: Arc<AtomicBool>,
    /// Per-job cancel flags keyed by job_id so cancellation is targeted.
    /// Entries are inserted by start_export and removed when the job
    /// thread exits.
    cancels:  Arc<Mutex<HashMap<Uuid, Arc<AtomicBool>>>>,
}

impl ExportWorker {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        let (tx, rx) = bounded(512);
        Self {
            rx,
            tx,
            factory,
            shutdown: Arc::new(AtomicBool::new(false)),
            cancels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawn a background thread to run `spec` on a fresh engine.
    ///
    /// Only one export runs at a time from the host's perspective (the
    /// staging tracks a single job id), but each job carries its own
    /// cancel flag so concurrent jobs would also work.
    pub fn start_export(&self, spec: ExportSpec) {
        let job_id = spec.job_id;
        let cancel = Arc::new(AtomicBool::new(false));
        let tx = self.tx.clone();
        let sd = Arc::clone(&self.shutdown);
        let factory = Arc::clone(&self.factory);

        // Register the cancel flag before spawning — avoids a window where
        // cancel_export is called before the thread has inserted it.
        if let Ok(mut cancels) = self.cancels.lock() {
            cancels.insert(job_id, Arc::clone(&cancel));
        }

        let cancels_ref = Arc::clone(&self.cancels);
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                let _ = tx.send(ExportResult::Error {
                    job_id,
                    msg: "worker shutting down".into(),
                });
                return;
            }

            run_job(spec, factory.as_ref(), &cancel, &tx);

            // Drop the cancel flag once the job is over so the map doesn't
            // grow over a long session of short exports.
            if let Ok(mut cancels) = cancels_ref.lock() {
                cancels.remove(&job_id);
            }
        });
    }

    /// Signal the job identified by `job_id` to abort. The engine observes
    /// its cancel flag, progress stops, and `Error { msg: "cancelled" }`
    /// arrives on the result channel. The engine instance is discarded;
    /// the next start_export gets a fresh one from the factory.
    pub fn cancel_export(&self, job_id: Uuid) {
        if let Ok(cancels) = self.cancels.lock() {
            if let Some(flag) = cancels.get(&job_id) {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Ok(cancels) = self.cancels.lock() {
            for flag in cancels.values() {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Run one job on a fresh engine and send its results.
fn run_job(
    spec: ExportSpec,
    factory: &dyn EngineFactory,
    cancel: &Arc<AtomicBool>,
    tx: &Sender<ExportResult>,
) {
    let job_id = spec.job_id;
    let container = spec.container;
    let mut engine = factory.create();

    // Highest percentage sent so far; engines are free to report somewhat
    // jittery numbers and the host still sees a clean monotone stream.
    let mut last_sent: i16 = -1;

    let outcome = {
        let mut emit = |percent: u8| {
            if cancel.load(Ordering::Relaxed) {
                return; // progress stops after an abort
            }
            let percent = percent.min(100);
            if i16::from(percent) <= last_sent {
                return;
            }
            last_sent = i16::from(percent);
            let _ = tx.send(ExportResult::Progress { job_id, percent });
        };
        emit(0);
        engine.run(&spec, cancel, &mut emit)
    };

    match outcome {
        Ok(data) => {
            if cancel.load(Ordering::Relaxed) {
                // Abort raced with completion — report the abort; the
                // output buffer is discarded with the engine instance.
                let _ = tx.send(ExportResult::Error { job_id, msg: CANCELLED.into() });
                return;
            }
            if last_sent < 100 {
                let _ = tx.send(ExportResult::Progress { job_id, percent: 100 });
            }
            let _ = tx.send(ExportResult::Done { job_id, container, data });
        }
        Err(e) => {
            let msg = if cancel.load(Ordering::Relaxed) {
                CANCELLED.to_string()
            } else {
                e.to_string()
            };
            eprintln!("[export] job {job_id}: {msg}");
            let _ = tx.send(ExportResult::Error { job_id, msg });
        }
    }
}
