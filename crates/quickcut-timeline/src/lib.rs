// crates/quickcut-timeline/src/lib.rs
//
// The editor core: per-clip drag/trim/volume state machines, the session
// that owns clip representations, and the playback sync bridge.
//
// No presentation dependency — the host supplies a TrackSurface (live
// layout numbers) and a SelectionLock (drag-time text-selection
// suppression) and renders as a pure function of the session's geometry.

pub mod interaction;
pub mod session;
pub mod surface;
pub mod sync;

// Re-export the main public API so host imports are simple.
pub use interaction::{ClipController, HitRegion, PointerPos, MIN_WIDTH_PX};
pub use session::{TimelineSession, TimesChangedFn};
pub use surface::{ClipGeometry, FixedSurface, NoopSelectionLock, SelectionLock, TrackSurface};
pub use sync::{MediaTransport, PlaybackSyncBridge, SEEK_STEP_SECS};
