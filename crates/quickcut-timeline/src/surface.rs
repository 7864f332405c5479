// crates/quickcut-timeline/src/surface.rs
//
// The presentation abstraction. The original tool kept clip geometry in
// DOM inline styles and parsed it back out; here geometry is plain data
// owned by the session, and the visual layer renders as a pure function of
// it.

/// Pixel geometry of one clip's representation inside its track lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipGeometry {
    /// Left edge offset from the track's left edge, in pixels.
    pub left: f64,
    /// Clip body width in pixels. Never below
    /// [`MIN_WIDTH_PX`](crate::interaction::MIN_WIDTH_PX) after a gesture.
    pub width: f64,
    /// Volume knob offset from the clip's top edge, in pixels.
    /// 0 = full volume, clip height = silent.
    pub knob_top: f64,
}

impl ClipGeometry {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Live layout numbers for a track lane.
///
/// Implementations must return the CURRENT values on every call — the
/// surface can resize between (and during) gestures, so callers never
/// cache either number. A width of 0 means layout hasn't completed yet;
/// geometry math then degrades to a safe divisor and recovers once real
/// numbers arrive.
pub trait TrackSurface {
    fn track_width(&self) -> f64;
    fn clip_height(&self) -> f64;
}

/// Fixed-size surface for headless hosts and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedSurface {
    pub width:  f64,
    pub height: f64,
}

impl TrackSurface for FixedSurface {
    fn track_width(&self) -> f64 {
        self.width
    }

    fn clip_height(&self) -> f64 {
        self.height
    }
}

/// Scoped "text selection suppressed" handle. The original disables text
/// selection on the whole document for the duration of any drag so the
/// gesture doesn't leave selection artifacts.
///
/// `acquire` is called on every drag-state entry and `release` on every
/// pointer-up, pointer-cancel and pointer-leave — those can race, so
/// `release` must be unconditional and idempotent.
pub trait SelectionLock {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// Lock for hosts with nothing to suppress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSelectionLock;

impl SelectionLock for NoopSelectionLock {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}
