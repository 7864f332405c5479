// crates/quickcut-timeline/src/session.rs
//
// TimelineSession: owns the clip list and one representation (geometry +
// controller) per clip, arena-style. Constructed per media-load, torn down
// explicitly with destroy() — never rebuilt incrementally. Loading new
// media means destroy-all then build() again.
//
// Data flow per gesture step:
//   pointer event → controller mutates pixel geometry
//   → clip data re-derived from geometry via the coordinate mapper
//   → on_times_changed(kind, index, start, end, volume) fired.
//
// The callback is fired on EVERY committed geometry→data step, not only on
// release; consumers treat each call as the authoritative latest state.

use quickcut_core::clip::{Clip, TrackKind};
use quickcut_core::helpers::geometry::{pixels_to_time, time_to_pixels};

use crate::interaction::{ClipController, HitRegion, PointerPos};
use crate::surface::{ClipGeometry, SelectionLock, TrackSurface};

/// `(kind, clip_index, start_time, end_time, volume)` — fired
/// synchronously after every committed geometry→data update.
pub type TimesChangedFn = Box<dyn FnMut(TrackKind, usize, f64, f64, f64)>;

struct ClipEntry {
    clip:       Clip,
    geometry:   ClipGeometry,
    controller: ClipController,
}

pub struct TimelineSession {
    /// Creation order. Pointer fan-out and notifications iterate this
    /// order every time so multi-clip updates inside one event are stable.
    clips:            Vec<ClipEntry>,
    media_duration:   f64,
    surface:          Box<dyn TrackSurface>,
    lock:             Box<dyn SelectionLock>,
    on_times_changed: Option<TimesChangedFn>,
}

impl TimelineSession {
    pub fn new(
        media_duration: f64,
        surface: Box<dyn TrackSurface>,
        lock: Box<dyn SelectionLock>,
    ) -> Self {
        Self {
            clips: Vec::new(),
            media_duration,
            surface,
            lock,
            on_times_changed: None,
        }
    }

    pub fn set_on_times_changed(&mut self, cb: TimesChangedFn) {
        self.on_times_changed = Some(cb);
    }

    pub fn media_duration(&self) -> f64 {
        self.media_duration
    }

    /// Number of live representations. Always equals the input clip count
    /// after `build()`.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index).map(|e| &e.clip)
    }

    pub fn geometry(&self, index: usize) -> Option<&ClipGeometry> {
        self.clips.get(index).map(|e| &e.geometry)
    }

    /// Build representations for `clips`. Idempotent: always clears prior
    /// representations first, so calling it twice never leaves orphans.
    pub fn build(&mut self, clips: Vec<Clip>) {
        self.destroy();
        for clip in clips {
            self.add_clip(clip);
        }
    }

    /// Attach one more clip (an additional media asset dropped on a
    /// track). Returns its index. Representation geometry is derived from
    /// the clip data immediately.
    pub fn add_clip(&mut self, clip: Clip) -> usize {
        let index = self.clips.len();
        self.clips.push(ClipEntry {
            clip,
            geometry: ClipGeometry { left: 0.0, width: 0.0, knob_top: 0.0 },
            controller: ClipController::new(),
        });
        self.update_geometry_from_data(index);
        index
    }

    /// Remove all representations and release the selection lock. Safe to
    /// call when nothing was built, and safe to call twice.
    pub fn destroy(&mut self) {
        self.clips.clear();
        self.lock.release();
    }

    /// Representation ⇐ data. Used after programmatic data changes (initial
    /// load, input-field edits).
    pub fn update_geometry_from_data(&mut self, index: usize) {
        let Some(entry) = self.clips.get_mut(index) else {
            return;
        };
        let track_width = self.surface.track_width();
        let clip_height = self.surface.clip_height();
        let d = self.media_duration;

        let left = time_to_pixels(entry.clip.start_time, d, track_width);
        let right = time_to_pixels(entry.clip.end_time, d, track_width);
        entry.geometry.left = left;
        entry.geometry.width = right - left;
        entry.geometry.knob_top = clip_height * (1.0 - entry.clip.volume.clamp(0.0, 1.0));
    }

    /// Data ⇐ representation. Used after every user gesture step; fires
    /// the change notification. Idempotent: with unchanged geometry the
    /// derived data is identical on every call.
    pub fn update_data_from_geometry(&mut self, index: usize) {
        let Self { clips, surface, media_duration, on_times_changed, .. } = self;
        let Some(entry) = clips.get_mut(index) else {
            return;
        };
        sync_clip_from_geometry(&mut entry.clip, &entry.geometry, surface.as_ref(), *media_duration);
        if let Some(cb) = on_times_changed.as_mut() {
            let c = &entry.clip;
            cb(c.kind, index, c.start_time, c.end_time, c.volume);
        }
    }

    /// Programmatic time update from the input-field boundary. Invalid
    /// ranges (`end <= start` after clamping) are REJECTED here — repair
    /// only applies to in-flight gestures. Returns whether the update was
    /// applied. Does not fire the change notification: the values came
    /// from the consumer in the first place.
    pub fn set_clip_times(&mut self, index: usize, start: f64, end: f64) -> bool {
        let d = self.media_duration;
        let start = start.clamp(0.0, d.max(0.0));
        let end = end.clamp(0.0, d.max(0.0));
        if end <= start {
            return false;
        }
        let Some(entry) = self.clips.get_mut(index) else {
            return false;
        };
        entry.clip.start_time = start;
        entry.clip.end_time = end;
        self.update_geometry_from_data(index);
        true
    }

    /// Programmatic volume update (e.g. initial full-volume placement).
    /// Clamped to [0, 1]; updates the knob geometry and notifies.
    pub fn set_clip_volume(&mut self, index: usize, volume: f64) {
        let clip_height = self.surface.clip_height();
        let Some(entry) = self.clips.get_mut(index) else {
            return;
        };
        entry.clip.volume = volume.clamp(0.0, 1.0);
        entry.geometry.knob_top = clip_height * (1.0 - entry.clip.volume);

        if let Some(cb) = self.on_times_changed.as_mut() {
            let c = &entry.clip;
            cb(c.kind, index, c.start_time, c.end_time, c.volume);
        }
    }

    /// Pointer-down on one clip's representation. Suppresses text
    /// selection for the duration of the gesture.
    pub fn pointer_down(&mut self, index: usize, region: HitRegion, pos: PointerPos) {
        let Some(entry) = self.clips.get_mut(index) else {
            return;
        };
        entry.controller.on_pointer_down(region, pos, &entry.geometry);
        if entry.controller.is_active() {
            self.lock.acquire();
        }
    }

    /// Global pointer-move: fan out to every clip's state machine in
    /// creation order. Each clip whose geometry changed gets its data
    /// re-derived and the notification fired before the next clip is
    /// processed — read geometry, compute data, notify, in that order,
    /// within one handler invocation.
    pub fn pointer_move(&mut self, pos: PointerPos) {
        let Self { clips, surface, media_duration, on_times_changed, .. } = self;
        for (index, entry) in clips.iter_mut().enumerate() {
            let changed =
                entry.controller.on_pointer_move(pos, &mut entry.geometry, surface.as_ref());
            if !changed {
                continue;
            }
            sync_clip_from_geometry(
                &mut entry.clip,
                &entry.geometry,
                surface.as_ref(),
                *media_duration,
            );
            if let Some(cb) = on_times_changed.as_mut() {
                let c = &entry.clip;
                cb(c.kind, index, c.start_time, c.end_time, c.volume);
            }
        }
    }

    /// Global pointer-up / pointer-cancel / pointer-leave: end every
    /// active gesture and restore text selection unconditionally — the
    /// three triggers can race and the release must win every time.
    pub fn pointer_release(&mut self) {
        for entry in &mut self.clips {
            entry.controller.on_pointer_release();
        }
        self.lock.release();
    }
}

/// Re-derive clip data from pixel geometry. Pure in the sense that equal
/// inputs always produce equal clip values, which is what makes
/// `update_data_from_geometry` idempotent.
fn sync_clip_from_geometry(
    clip: &mut Clip,
    geo: &ClipGeometry,
    surface: &dyn TrackSurface,
    media_duration: f64,
) {
    clip.start_time = pixels_to_time(geo.left, media_duration, surface.track_width());
    clip.end_time = pixels_to_time(geo.right(), media_duration, surface.track_width());

    let clip_height = surface.clip_height();
    let h = if clip_height > 0.0 { clip_height } else { 1.0 };
    // Inverted: knob at the top = full volume.
    clip.volume = 1.0 - geo.knob_top / h;

    clip.sanitize(media_duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FixedSurface;
    use quickcut_core::clip::MIN_DURATION_EPSILON;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Selection lock that records its balance so tests can assert the
    /// acquire/release discipline.
    struct CountingLock(Rc<RefCell<(u32, u32)>>);

    impl SelectionLock for CountingLock {
        fn acquire(&mut self) {
            self.0.borrow_mut().0 += 1;
        }
        fn release(&mut self) {
            self.0.borrow_mut().1 += 1;
        }
    }

    type Notification = (TrackKind, usize, f64, f64, f64);

    fn session_with_log(
        duration: f64,
        width: f64,
        height: f64,
    ) -> (TimelineSession, Rc<RefCell<Vec<Notification>>>) {
        let surface = FixedSurface { width, height };
        let mut s = TimelineSession::new(
            duration,
            Box::new(surface),
            Box::new(crate::surface::NoopSelectionLock),
        );
        let log: Rc<RefCell<Vec<Notification>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        s.set_on_times_changed(Box::new(move |kind, idx, start, end, vol| {
            sink.borrow_mut().push((kind, idx, start, end, vol));
        }));
        (s, log)
    }

    fn default_video_session() -> (TimelineSession, Rc<RefCell<Vec<Notification>>>) {
        let (mut s, log) = session_with_log(100.0, 1000.0, 60.0);
        s.build(vec![Clip::full_duration(TrackKind::Video, 100.0)]);
        (s, log)
    }

    #[test]
    fn build_derives_geometry_from_data() {
        let (s, _) = default_video_session();
        let g = s.geometry(0).unwrap();
        assert_eq!(g.left, 0.0);
        assert_eq!(g.width, 1000.0);
        assert_eq!(g.knob_top, 0.0); // volume 1.0 → knob at top
    }

    #[test]
    fn rebuild_never_leaves_orphan_representations() {
        let (mut s, _) = default_video_session();
        assert_eq!(s.len(), 1);

        let clips = vec![
            Clip::full_duration(TrackKind::Video, 100.0),
            Clip::full_duration(TrackKind::Audio, 100.0),
            Clip::full_duration(TrackKind::Audio, 100.0),
        ];
        s.build(clips);
        assert_eq!(s.len(), 3);

        s.build(vec![Clip::full_duration(TrackKind::Video, 100.0)]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn destroy_is_safe_when_nothing_was_built() {
        let (mut s, _) = session_with_log(100.0, 1000.0, 60.0);
        s.destroy();
        s.destroy();
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn right_handle_drag_to_500px_yields_end_time_50() {
        // Media 100 s, track 1000 px, default clip [0, 100]. Dragging the
        // right handle so its pixel position lands at 500 px.
        let (mut s, _) = default_video_session();
        s.pointer_down(0, HitRegion::RightHandle, PointerPos { x: 1000.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 500.0, y: 0.0 });
        s.pointer_release();

        let c = s.clip(0).unwrap();
        assert_eq!(c.start_time, 0.0);
        assert!((c.end_time - 50.0).abs() < 0.1, "end_time = {}", c.end_time);
    }

    #[test]
    fn drag_steps_keep_start_strictly_before_end() {
        let (mut s, _) = default_video_session();
        s.pointer_down(0, HitRegion::LeftHandle, PointerPos { x: 0.0, y: 0.0 });
        for x in (0..=1200).step_by(50) {
            s.pointer_move(PointerPos { x: x as f64, y: 0.0 });
            let c = s.clip(0).unwrap();
            assert!(c.start_time < c.end_time, "collapsed at x={x}");
        }
        // Far past the right handle: clamped at end − min duration, never
        // swapped.
        let c = s.clip(0).unwrap();
        assert!((c.end_time - 100.0).abs() < 1e-6);
        assert!(c.start_time < c.end_time);
    }

    #[test]
    fn notification_fires_on_every_move_step() {
        let (mut s, log) = default_video_session();
        s.pointer_down(0, HitRegion::RightHandle, PointerPos { x: 1000.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 800.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 600.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 400.0, y: 0.0 });

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        let ends: Vec<f64> = log.iter().map(|n| n.3).collect();
        assert!((ends[0] - 80.0).abs() < 0.1);
        assert!((ends[1] - 60.0).abs() < 0.1);
        assert!((ends[2] - 40.0).abs() < 0.1);
        // Track kind and index ride along on every call.
        assert_eq!(log[0].0, TrackKind::Video);
        assert_eq!(log[0].1, 0);
    }

    #[test]
    fn volume_knob_maps_inverted_and_monotonic() {
        let (mut s, log) = default_video_session();
        s.pointer_down(0, HitRegion::VolumeKnob, PointerPos { x: 0.0, y: 0.0 });

        // Knob offsets 0 → volume 1.0, clip_height → 0.0, monotone between.
        let mut last = f64::INFINITY;
        for y in [0.0, 15.0, 30.0, 45.0, 60.0] {
            s.pointer_move(PointerPos { x: 0.0, y });
            let v = s.clip(0).unwrap().volume;
            assert!(v <= last, "volume not monotone at y={y}");
            last = v;
        }
        assert_eq!(s.clip(0).unwrap().volume, 0.0);

        // First step kept full volume, times untouched throughout.
        let log = log.borrow();
        assert_eq!(log[0].4, 1.0);
        assert!(log.iter().all(|n| n.2 == 0.0 && (n.3 - 100.0).abs() < 1e-6));
    }

    #[test]
    fn update_data_from_geometry_is_idempotent() {
        let (mut s, log) = default_video_session();
        s.pointer_down(0, HitRegion::RightHandle, PointerPos { x: 1000.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 730.0, y: 0.0 });
        s.pointer_release();

        s.update_data_from_geometry(0);
        let first = s.clip(0).unwrap().clone();
        s.update_data_from_geometry(0);
        let second = s.clip(0).unwrap().clone();

        assert_eq!(first.start_time, second.start_time);
        assert_eq!(first.end_time, second.end_time);
        assert_eq!(first.volume, second.volume);

        // Both calls notified with identical values.
        let log = log.borrow();
        let n = log.len();
        assert_eq!(log[n - 1], log[n - 2]);
    }

    #[test]
    fn set_clip_times_rejects_invalid_ranges() {
        let (mut s, _) = default_video_session();
        assert!(!s.set_clip_times(0, 50.0, 50.0));
        assert!(!s.set_clip_times(0, 80.0, 20.0));
        // Both ends clamp past duration to the same point → reject.
        assert!(!s.set_clip_times(0, 150.0, 200.0));
        // Unchanged.
        assert_eq!(s.clip(0).unwrap().end_time, 100.0);

        assert!(s.set_clip_times(0, 10.0, 60.0));
        let g = s.geometry(0).unwrap();
        assert!((g.left - 100.0).abs() < 1e-9);
        assert!((g.width - 500.0).abs() < 1e-9);
    }

    #[test]
    fn set_clip_volume_updates_knob_and_notifies() {
        let (mut s, log) = default_video_session();
        s.set_clip_volume(0, 0.25);
        assert!((s.geometry(0).unwrap().knob_top - 45.0).abs() < 1e-9);
        let log = log.borrow();
        assert_eq!(log.last().unwrap().4, 0.25);
    }

    #[test]
    fn fan_out_processes_clips_in_creation_order() {
        let (mut s, log) = session_with_log(100.0, 1000.0, 60.0);
        let mut a = Clip::full_duration(TrackKind::Video, 100.0);
        a.end_time = 40.0;
        let mut b = Clip::full_duration(TrackKind::Audio, 100.0);
        b.start_time = 50.0;
        s.build(vec![a, b]);

        // Two simultaneously active state machines (pointer-captured on
        // both before any release).
        s.pointer_down(0, HitRegion::Body, PointerPos { x: 0.0, y: 0.0 });
        s.pointer_down(1, HitRegion::Body, PointerPos { x: 0.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 30.0, y: 0.0 });

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].1, 0);
        assert_eq!(log[1].1, 1);
    }

    #[test]
    fn selection_lock_acquired_on_entry_released_on_any_exit() {
        let balance = Rc::new(RefCell::new((0u32, 0u32)));
        let mut s = TimelineSession::new(
            100.0,
            Box::new(FixedSurface { width: 1000.0, height: 60.0 }),
            Box::new(CountingLock(Rc::clone(&balance))),
        );
        s.build(vec![Clip::full_duration(TrackKind::Video, 100.0)]);

        s.pointer_down(0, HitRegion::Body, PointerPos { x: 0.0, y: 0.0 });
        assert_eq!(balance.borrow().0, 1);

        // Up, cancel and leave can all arrive; every one releases.
        s.pointer_release();
        s.pointer_release();
        assert!(balance.borrow().1 >= 2);

        // Pointer-down missing any hit region target acquires nothing new.
        s.pointer_move(PointerPos { x: 10.0, y: 0.0 });
        assert_eq!(balance.borrow().0, 1);
    }

    #[test]
    fn collapsed_geometry_is_repaired_with_epsilon() {
        // Geometry entirely past the media end collapses both times onto
        // the duration; the repair reopens the range instead of rejecting.
        let surface = FixedSurface { width: 1000.0, height: 60.0 };
        let mut clip = Clip::full_duration(TrackKind::Video, 100.0);
        let geo = ClipGeometry { left: 1100.0, width: 50.0, knob_top: 0.0 };
        sync_clip_from_geometry(&mut clip, &geo, &surface, 100.0);

        assert!(clip.start_time < clip.end_time);
        assert!(clip.end_time <= 100.0);
        assert!((clip.end_time - clip.start_time - MIN_DURATION_EPSILON).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_session_never_crashes() {
        let (mut s, _) = session_with_log(0.0, 1000.0, 60.0);
        s.build(vec![Clip::full_duration(TrackKind::Video, 0.0)]);
        s.pointer_down(0, HitRegion::RightHandle, PointerPos { x: 0.0, y: 0.0 });
        s.pointer_move(PointerPos { x: 300.0, y: 0.0 });
        let c = s.clip(0).unwrap();
        assert!(c.start_time.is_finite() && c.end_time.is_finite());
        assert!(c.start_time < c.end_time);
    }
}
