// crates/quickcut-timeline/src/sync.rs
//
// PlaybackSyncBridge: keeps the scrub control, the time readout and the
// media transport's playback position mutually consistent.
//
// Ownership rules:
//   · The transport owns the playback position. The scrub control and the
//     readout are read-only reflections of it — EXCEPT while a user scrub
//     drag is in progress, when the scrub control is the temporary source
//     of truth and live playback updates are ignored.
//   · The bridge only mirrors play/pause state, it never owns playback.

use quickcut_core::helpers::time::format_time;

/// Seek step for the rewind/forward transport buttons, in seconds.
pub const SEEK_STEP_SECS: f64 = 5.0;

/// The media element surface the bridge synchronizes against.
pub trait MediaTransport {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, t: f64);
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
}

pub struct PlaybackSyncBridge {
    /// True between scrub drag-start and drag-end/cancel/leave. While set,
    /// "time advanced" events do not touch the scrub display — otherwise
    /// the drag handle visually fights continuous playback updates.
    scrub_owns_truth: bool,
    /// Displayed scrub position, seconds.
    scrub_value: f64,
    /// Formatted `m:ss` readout.
    readout: String,
}

impl PlaybackSyncBridge {
    pub fn new() -> Self {
        Self {
            scrub_owns_truth: false,
            scrub_value:      0.0,
            readout:          format_time(0.0),
        }
    }

    /// Displayed scrub position (what the scrub control should render).
    pub fn scrub_value(&self) -> f64 {
        self.scrub_value
    }

    /// Formatted current-time readout.
    pub fn readout(&self) -> &str {
        &self.readout
    }

    pub fn scrub_drag_in_progress(&self) -> bool {
        self.scrub_owns_truth
    }

    /// A "time advanced" event from the transport. Mirrors into the scrub
    /// display and the readout unless a scrub drag owns the truth.
    pub fn on_time_advanced(&mut self, transport: &dyn MediaTransport) {
        if self.scrub_owns_truth {
            return;
        }
        self.scrub_value = transport.current_time();
        self.readout = format_time(self.scrub_value);
    }

    /// User pressed down on the scrub control.
    pub fn scrub_drag_started(&mut self) {
        self.scrub_owns_truth = true;
    }

    /// Scrub control moved while dragging. Updates the preview (scrub
    /// display + readout) only — the media position is untouched until
    /// release.
    pub fn scrub_input(&mut self, value: f64) {
        self.scrub_value = value;
        self.readout = format_time(value);
    }

    /// Scrub release: commit the previewed value to the transport's actual
    /// position and hand truth back to playback.
    pub fn scrub_released(&mut self, transport: &mut dyn MediaTransport) {
        transport.set_current_time(self.scrub_value);
        self.scrub_owns_truth = false;
    }

    /// Scrub pointer-cancel / pointer-leave: abandon the drag without
    /// committing. The next playback event resumes mirroring.
    pub fn scrub_cancelled(&mut self) {
        self.scrub_owns_truth = false;
    }

    /// Step back `SEEK_STEP_SECS`, clamped to 0.
    pub fn rewind(&self, transport: &mut dyn MediaTransport) {
        let t = (transport.current_time() - SEEK_STEP_SECS).max(0.0);
        transport.set_current_time(t);
    }

    /// Step forward `SEEK_STEP_SECS`, clamped to the media duration.
    pub fn forward(&self, transport: &mut dyn MediaTransport) {
        let t = (transport.current_time() + SEEK_STEP_SECS).min(transport.duration());
        transport.set_current_time(t);
    }

    /// Simple play/pause toggle against the transport's own state.
    pub fn toggle_play(&self, transport: &mut dyn MediaTransport) {
        if transport.is_paused() {
            transport.play();
        } else {
            transport.pause();
        }
    }

    /// Mirrored play state, for the play/pause affordance.
    pub fn is_playing(&self, transport: &dyn MediaTransport) -> bool {
        !transport.is_paused()
    }
}

impl Default for PlaybackSyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
