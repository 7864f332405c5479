// crates/quickcut-media/src/engine.rs
//
// The black-box transcoding collaborator. Internal behavior is explicitly
// out of scope — these traits pin down only the contract:
//
//   · progress is reported as integer percentages; the worker normalizes
//     the stream to monotone non-decreasing 0..=100
//   · the result is the encoded byte buffer for the spec's container, or
//     an error with a human-readable message
//   · abort: once `cancel` is observed the engine returns
//     `Err("cancelled")`, progress stops, and the instance is DISCARDED —
//     the factory builds a fresh one for the next job, never reuses.

use std::sync::atomic::AtomicBool;

use anyhow::Result;

use crate::export::ExportSpec;

pub trait TranscodeEngine: Send {
    /// Run one job to completion. Blocking — the worker gives every job
    /// its own thread. Implementations check `cancel` between work units
    /// and call `progress` with percentages as they go.
    fn run(
        &mut self,
        spec: &ExportSpec,
        cancel: &AtomicBool,
        progress: &mut dyn FnMut(u8),
    ) -> Result<Vec<u8>>;
}

/// Builds one engine instance per job — the fresh-instance semantics after
/// an abort come for free because nothing is ever reused.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Box<dyn TranscodeEngine>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Box<dyn TranscodeEngine> + Send + Sync,
{
    fn create(&self) -> Box<dyn TranscodeEngine> {
        self()
    }
}
