// crates/quickcut-core/src/helpers/geometry.rs
//
// The time↔pixel coordinate mapper shared by the session and the
// interaction controller.
//
// Both functions are pure and side-effect free apart from a recoverable
// diagnostic on a degenerate track width. Callers pass the CURRENT track
// width on every call — the presentation surface may resize between
// gestures, so nothing here is ever cached.

use crate::quickcut_log;

/// Fallback divisor when the media duration or track width is unknown or
/// degenerate. Results are visually meaningless in that state but the math
/// never divides by zero; the condition resolves once layout/metadata
/// arrives.
const SAFE_DIVISOR: f64 = 1.0;

/// Map a media time (seconds) to a pixel offset inside the track.
///
/// `duration <= 0` (metadata not loaded yet) is treated as `1`; callers
/// must not rely on output precision in that degenerate case.
///
/// ```
/// use quickcut_core::helpers::geometry::time_to_pixels;
/// let px = time_to_pixels(50.0, 100.0, 1000.0);
/// assert!((px - 500.0).abs() < 1e-9);
/// ```
pub fn time_to_pixels(t: f64, duration: f64, track_width: f64) -> f64 {
    let d = if duration > 0.0 { duration } else { SAFE_DIVISOR };
    (t / d) * track_width
}

/// Map a pixel offset inside the track back to a media time (seconds).
///
/// `track_width <= 0` (control not laid out yet) is treated as `1` and
/// logged as a recoverable diagnostic — never fatal.
///
/// Round-trips with [`time_to_pixels`] within 1e-6 relative error for any
/// `duration > 0`, `track_width > 0`:
///
/// ```
/// use quickcut_core::helpers::geometry::{pixels_to_time, time_to_pixels};
/// let t = 37.25;
/// let back = pixels_to_time(time_to_pixels(t, 90.0, 640.0), 90.0, 640.0);
/// assert!((back - t).abs() / t < 1e-6);
/// ```
pub fn pixels_to_time(px: f64, duration: f64, track_width: f64) -> f64 {
    let w = if track_width > 0.0 {
        track_width
    } else {
        quickcut_log!("[geometry] degenerate track width {track_width}, using 1");
        SAFE_DIVISOR
    };
    (px / w) * duration
}
