// crates/quickcut-core/src/clip.rs
//
// The clip/track data model. Geometry is NOT stored here — pixel geometry
// lives in the session's representations (quickcut-timeline::surface) and
// this data is re-derived from it after every committed gesture step.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repair duration for a collapsed `end_time <= start_time` range after a
/// data update: the range is forced back open to this many seconds rather
/// than the update being rejected.
pub const MIN_DURATION_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which lane a clip belongs to. The simplest session holds exactly one
/// video clip; audio clips are zero-or-more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

/// One trimmable, volume-controllable segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub id:         ClipId,
    pub kind:       TrackKind,
    /// Seconds into the media. Invariant after any committed update:
    /// `0 <= start_time < end_time <= media duration`.
    pub start_time: f64,
    pub end_time:   f64,
    /// Linear gain in [0, 1]. 1.0 = full volume.
    pub volume:     f64,
}

impl Clip {
    /// The default full-duration clip created when media is loaded.
    pub fn full_duration(kind: TrackKind, media_duration: f64) -> Self {
        Self {
            id:         ClipId::new(),
            kind,
            start_time: 0.0,
            end_time:   media_duration.max(MIN_DURATION_EPSILON),
            volume:     1.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Clamp times into `[0, media_duration]` and repair a collapsed range
    /// by reopening it to `MIN_DURATION_EPSILON` seconds. Repair is the
    /// policy for mid-gesture degenerate ranges — rejection only happens at
    /// the input-field boundary, never here.
    pub fn sanitize(&mut self, media_duration: f64) {
        let dur = media_duration.max(MIN_DURATION_EPSILON);
        self.start_time = self.start_time.clamp(0.0, dur);
        self.end_time = self.end_time.clamp(0.0, dur);
        if self.end_time <= self.start_time {
            self.end_time = (self.start_time + MIN_DURATION_EPSILON).min(dur);
            self.start_time = (self.end_time - MIN_DURATION_EPSILON).max(0.0);
        }
        self.volume = self.volume.clamp(0.0, 1.0);
    }
}

/// A lane of clips of one kind, rendered left-to-right by `start_time`.
/// Overlap between clips on the same track is permitted — layered audio is
/// legal — and no ripple adjustment is ever applied to neighbours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub kind:  TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self { kind, clips: Vec::new() }
    }

    /// Indices of `clips` ordered by start time, for left-to-right render.
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.clips.len()).collect();
        order.sort_by(|&a, &b| {
            self.clips[a]
                .start_time
                .partial_cmp(&self.clips[b].start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_repairs_collapsed_range() {
        let mut c = Clip::full_duration(TrackKind::Video, 100.0);
        c.start_time = 40.0;
        c.end_time = 40.0;
        c.sanitize(100.0);
        assert!(c.start_time < c.end_time);
        assert!((c.end_time - c.start_time - MIN_DURATION_EPSILON).abs() < 1e-9);
    }

    #[test]
    fn sanitize_repairs_collapse_at_media_end() {
        let mut c = Clip::full_duration(TrackKind::Video, 100.0);
        c.start_time = 100.0;
        c.end_time = 100.0;
        c.sanitize(100.0);
        assert!(c.start_time < c.end_time);
        assert!(c.end_time <= 100.0);
    }

    #[test]
    fn sanitize_clamps_volume() {
        let mut c = Clip::full_duration(TrackKind::Audio, 10.0);
        c.volume = 1.7;
        c.sanitize(10.0);
        assert_eq!(c.volume, 1.0);
    }

    #[test]
    fn render_order_sorts_by_start_time() {
        let mut track = Track::new(TrackKind::Audio);
        let mut a = Clip::full_duration(TrackKind::Audio, 100.0);
        a.start_time = 30.0;
        a.end_time = 60.0;
        let mut b = Clip::full_duration(TrackKind::Audio, 100.0);
        b.start_time = 5.0;
        b.end_time = 20.0;
        track.clips.push(a);
        track.clips.push(b);
        assert_eq!(track.render_order(), vec![1, 0]);
    }

    #[test]
    fn overlapping_clips_are_not_rejected() {
        // Overlap is intentionally permitted; render_order must still work.
        let mut track = Track::new(TrackKind::Audio);
        for start in [0.0, 5.0, 3.0] {
            let mut c = Clip::full_duration(TrackKind::Audio, 100.0);
            c.start_time = start;
            c.end_time = start + 10.0;
            track.clips.push(c);
        }
        assert_eq!(track.render_order(), vec![0, 2, 1]);
    }
}
