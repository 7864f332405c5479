// crates/quickcut-media/src/lib.rs
//
// The transcoding-collaborator boundary. The engine itself is a black box
// behind the TranscodeEngine trait — only the request/response contract is
// in scope here. No timeline dependency beyond the core data model;
// communicates with the host via channels only.

pub mod engine;
pub mod export;
pub mod staging;
pub mod worker;

// Re-export the main public API so host imports are simple.
pub use engine::{EngineFactory, TranscodeEngine};
pub use export::{Container, ExportSpec, QualityPreset, TargetResolution};
pub use staging::{ExportStaging, StagingStatus};
pub use worker::{ExportResult, ExportWorker, CANCELLED};
