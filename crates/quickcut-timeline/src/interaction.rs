// crates/quickcut-timeline/src/interaction.rs
//
// Per-clip pointer-drag state machine: move, left-trim, right-trim and
// volume-knob adjustment. One controller per clip representation; the
// session fans global pointer events out to every controller in creation
// order, every time.
//
// The original kept four module-level booleans (isDraggingClip,
// isResizingLeft, …) read by one document-level listener. Here each clip
// owns an explicit enum state with the gesture's anchors baked into the
// active variant, which gives the same fan-out behavior without the flag
// sprawl.

use crate::surface::{ClipGeometry, TrackSurface};

/// Minimum clip width in pixels. Prevents zero/negative-duration clips: at
/// any track width the corresponding minimum duration is
/// `MIN_WIDTH_PX / track_width * media_duration`.
pub const MIN_WIDTH_PX: f64 = 20.0;

/// Pointer position in the host's coordinate space. Only deltas against
/// the gesture anchor are ever used, so the absolute origin is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

/// Where a pointer-down landed on a clip's representation. Hit testing is
/// the host's job — it knows where the handles and the knob are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Body,
    LeftHandle,
    RightHandle,
    VolumeKnob,
}

/// Active drag session. The anchors and pre-drag geometry live inside the
/// variant, so they exist exactly as long as the gesture does.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Move {
        anchor_x:   f64,
        start_left: f64,
    },
    TrimLeft {
        anchor_x:    f64,
        start_left:  f64,
        start_width: f64,
    },
    TrimRight {
        anchor_x:    f64,
        start_width: f64,
    },
    AdjustVolume {
        anchor_y:       f64,
        start_knob_top: f64,
    },
}

/// Clamp with the original's operand order: `min(max, max(min, v))`.
/// When the range is inverted the upper bound wins — never a panic, unlike
/// `f64::clamp`.
fn clamp(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}

/// Track width with the degenerate-layout fallback. Zero width means the
/// control hasn't been laid out yet; results are visually meaningless but
/// the math stays finite until layout completes.
fn safe_track_width(surface: &dyn TrackSurface) -> f64 {
    let w = surface.track_width();
    if w > 0.0 {
        w
    } else {
        1.0
    }
}

pub struct ClipController {
    state: DragState,
}

impl ClipController {
    pub fn new() -> Self {
        Self { state: DragState::Idle }
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Enter a drag state. Ignored while a gesture is already active — a
    /// second pointer-down can only arrive after a missed release, and the
    /// running gesture's anchors must not be re-seeded mid-flight.
    pub fn on_pointer_down(&mut self, region: HitRegion, pos: PointerPos, geo: &ClipGeometry) {
        if self.is_active() {
            return;
        }
        self.state = match region {
            HitRegion::Body => DragState::Move {
                anchor_x:   pos.x,
                start_left: geo.left,
            },
            HitRegion::LeftHandle => DragState::TrimLeft {
                anchor_x:    pos.x,
                start_left:  geo.left,
                start_width: geo.width,
            },
            HitRegion::RightHandle => DragState::TrimRight {
                anchor_x:    pos.x,
                start_width: geo.width,
            },
            HitRegion::VolumeKnob => DragState::AdjustVolume {
                anchor_y:       pos.y,
                start_knob_top: geo.knob_top,
            },
        };
    }

    /// Apply a pointer move to the clip's geometry. Returns true when the
    /// geometry was recomputed so the caller can re-derive clip data and
    /// notify — on EVERY move, not only on release.
    pub fn on_pointer_move(
        &mut self,
        pos: PointerPos,
        geo: &mut ClipGeometry,
        surface: &dyn TrackSurface,
    ) -> bool {
        match self.state {
            DragState::Idle => false,

            DragState::Move { anchor_x, start_left } => {
                let track_width = safe_track_width(surface);
                let delta = pos.x - anchor_x;
                geo.left = clamp(start_left + delta, 0.0, track_width - geo.width);
                true
            }

            DragState::TrimLeft { anchor_x, start_left, start_width } => {
                let delta = pos.x - anchor_x;
                let mut new_left = start_left + delta;
                let mut new_width = start_width - delta;

                // Past the track's left edge: absorb the overflow into the
                // width so the right edge stays fixed.
                if new_left < 0.0 {
                    new_width += new_left;
                    new_left = 0.0;
                }
                // Crossing the right handle: clamp the LEFT edge, never
                // swap handles. The right edge stays where it was.
                if new_width < MIN_WIDTH_PX {
                    new_width = MIN_WIDTH_PX;
                    new_left = start_left + (start_width - MIN_WIDTH_PX);
                }

                geo.left = new_left;
                geo.width = new_width;
                true
            }

            DragState::TrimRight { anchor_x, start_width } => {
                let track_width = safe_track_width(surface);
                let delta = pos.x - anchor_x;
                let mut new_width = start_width + delta;

                let max_width = track_width - geo.left;
                if new_width < MIN_WIDTH_PX {
                    new_width = MIN_WIDTH_PX;
                }
                if new_width > max_width {
                    new_width = max_width;
                }

                geo.width = new_width;
                true
            }

            DragState::AdjustVolume { anchor_y, start_knob_top } => {
                let delta = pos.y - anchor_y;
                geo.knob_top = clamp(start_knob_top + delta, 0.0, surface.clip_height());
                true
            }
        }
    }

    /// Exit to Idle. Covers pointer-up, pointer-cancel and pointer-leave —
    /// geometry stays at the last committed step, no rollback. Returns
    /// whether a gesture was active.
    pub fn on_pointer_release(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = DragState::Idle;
        was_active
    }
}

impl Default for ClipController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FixedSurface;

    const SURFACE: FixedSurface = FixedSurface { width: 1000.0, height: 60.0 };

    fn geo(left: f64, width: f64) -> ClipGeometry {
        ClipGeometry { left, width, knob_top: 0.0 }
    }

    fn down_at(region: HitRegion, x: f64, y: f64, g: &ClipGeometry) -> ClipController {
        let mut c = ClipController::new();
        c.on_pointer_down(region, PointerPos { x, y }, g);
        c
    }

    #[test]
    fn move_keeps_width_and_clamps_to_track() {
        let mut g = geo(100.0, 200.0);
        let mut c = down_at(HitRegion::Body, 500.0, 0.0, &g);

        assert!(c.on_pointer_move(PointerPos { x: 550.0, y: 0.0 }, &mut g, &SURFACE));
        assert_eq!(g.left, 150.0);
        assert_eq!(g.width, 200.0);

        // Far left and far right both pin to the track bounds.
        c.on_pointer_move(PointerPos { x: -900.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.left, 0.0);
        c.on_pointer_move(PointerPos { x: 9000.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.left, 800.0);
        assert_eq!(g.width, 200.0);
    }

    #[test]
    fn trim_left_moves_left_edge_only() {
        let mut g = geo(100.0, 300.0);
        let mut c = down_at(HitRegion::LeftHandle, 100.0, 0.0, &g);

        c.on_pointer_move(PointerPos { x: 150.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.left, 150.0);
        assert_eq!(g.width, 250.0);
        assert_eq!(g.right(), 400.0); // right edge fixed
    }

    #[test]
    fn trim_left_past_track_start_keeps_right_edge_fixed() {
        let mut g = geo(100.0, 300.0);
        let mut c = down_at(HitRegion::LeftHandle, 100.0, 0.0, &g);

        c.on_pointer_move(PointerPos { x: -60.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.left, 0.0);
        assert_eq!(g.width, 400.0);
        assert_eq!(g.right(), 400.0);
    }

    #[test]
    fn trim_left_crossing_right_handle_clamps_instead_of_swapping() {
        let mut g = geo(100.0, 300.0);
        let mut c = down_at(HitRegion::LeftHandle, 100.0, 0.0, &g);

        // Drag the left handle way past the right edge.
        c.on_pointer_move(PointerPos { x: 900.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.width, MIN_WIDTH_PX);
        assert_eq!(g.left, 100.0 + 300.0 - MIN_WIDTH_PX);
        assert_eq!(g.right(), 400.0);
    }

    #[test]
    fn trim_right_pins_at_min_width() {
        let mut g = geo(0.0, 1000.0);
        let mut c = down_at(HitRegion::RightHandle, 1000.0, 0.0, &g);

        // Collapse the clip well below MIN_WIDTH_PX.
        c.on_pointer_move(PointerPos { x: -50.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.width, MIN_WIDTH_PX);
        assert_eq!(g.left, 0.0);
    }

    #[test]
    fn trim_right_clamps_to_track_end() {
        let mut g = geo(600.0, 200.0);
        let mut c = down_at(HitRegion::RightHandle, 800.0, 0.0, &g);

        c.on_pointer_move(PointerPos { x: 2000.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.width, 400.0); // 1000 - 600
    }

    #[test]
    fn every_intermediate_trim_step_respects_min_width() {
        let mut g = geo(0.0, 500.0);
        let mut c = down_at(HitRegion::RightHandle, 500.0, 0.0, &g);

        for x in (-100..=500).step_by(25) {
            c.on_pointer_move(PointerPos { x: x as f64, y: 0.0 }, &mut g, &SURFACE);
            assert!(g.width >= MIN_WIDTH_PX, "width {} below minimum", g.width);
        }
    }

    #[test]
    fn volume_knob_clamps_to_clip_height() {
        let mut g = geo(0.0, 500.0);
        let mut c = down_at(HitRegion::VolumeKnob, 0.0, 10.0, &g);

        c.on_pointer_move(PointerPos { x: 0.0, y: 40.0 }, &mut g, &SURFACE);
        assert_eq!(g.knob_top, 30.0);
        c.on_pointer_move(PointerPos { x: 0.0, y: 500.0 }, &mut g, &SURFACE);
        assert_eq!(g.knob_top, SURFACE.height);
        c.on_pointer_move(PointerPos { x: 0.0, y: -500.0 }, &mut g, &SURFACE);
        assert_eq!(g.knob_top, 0.0);
    }

    #[test]
    fn release_returns_to_idle_and_moves_are_ignored() {
        let mut g = geo(100.0, 200.0);
        let mut c = down_at(HitRegion::Body, 0.0, 0.0, &g);
        assert!(c.is_active());
        assert!(c.on_pointer_release());
        assert!(!c.is_active());
        assert!(!c.on_pointer_move(PointerPos { x: 50.0, y: 0.0 }, &mut g, &SURFACE));
        assert_eq!(g.left, 100.0);
        // A second release is a no-op.
        assert!(!c.on_pointer_release());
    }

    #[test]
    fn pointer_down_while_active_keeps_running_gesture() {
        let mut g = geo(100.0, 200.0);
        let mut c = down_at(HitRegion::Body, 0.0, 0.0, &g);
        c.on_pointer_down(HitRegion::RightHandle, PointerPos { x: 300.0, y: 0.0 }, &g);
        c.on_pointer_move(PointerPos { x: 10.0, y: 0.0 }, &mut g, &SURFACE);
        assert_eq!(g.left, 110.0); // still the Move gesture
        assert_eq!(g.width, 200.0);
    }

    #[test]
    fn zero_track_width_never_panics() {
        let degenerate = FixedSurface { width: 0.0, height: 0.0 };
        let mut g = geo(0.0, 200.0);
        let mut c = down_at(HitRegion::Body, 0.0, 0.0, &g);
        c.on_pointer_move(PointerPos { x: 50.0, y: 0.0 }, &mut g, &degenerate);
        assert!(g.left.is_finite());

        let mut c = down_at(HitRegion::RightHandle, 0.0, 0.0, &g);
        c.on_pointer_move(PointerPos { x: 50.0, y: 0.0 }, &mut g, &degenerate);
        assert!(g.width.is_finite());
    }
}
