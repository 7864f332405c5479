// crates/quickcut-media/src/staging.rs
//
// ExportStaging: the mutable parameter set an export is built from.
//
// The timeline pushes authoritative (start, end, volume) values into it on
// every edit; the host pushes user choices (resolution, quality, mute,
// container) directly into the public fields. build_spec snapshots the
// whole set into an immutable ExportSpec, and handle_result drives the
// Ready/Processing lifecycle — every terminal result, success, failure or
// abort, returns the staging to Ready so the next export can start.

use std::path::PathBuf;

use anyhow::{bail, Result};
use uuid::Uuid;

use crate::export::{Container, ExportSpec, QualityPreset, TargetResolution};
use crate::worker::{ExportResult, CANCELLED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingStatus {
    /// Idle; a new export may be started.
    Ready,
    /// An export is running; its results are matched by job id.
    Processing { job_id: Uuid },
}

pub struct ExportStaging {
    source:         PathBuf,
    media_duration: f64,

    // Latest values pushed by the timeline. Each push replaces the
    // previous one wholesale.
    start_seconds: f64,
    end_seconds:   f64,
    clip_volume:   f64,

    // User-facing export choices, set directly by the host.
    pub muted:         bool,
    pub audio_bitrate: String,
    pub resolution:    TargetResolution,
    pub quality:       QualityPreset,
    pub container:     Container,

    status:       StagingStatus,
    progress:     u8,
    last_error:   Option<String>,
}

impl ExportStaging {
    pub fn new(source: PathBuf, media_duration: f64) -> Self {
        Self {
            source,
            media_duration,
            start_seconds: 0.0,
            end_seconds: media_duration,
            clip_volume: 1.0,
            muted: false,
            audio_bitrate: "128k".into(),
            resolution: TargetResolution::Original,
            quality: QualityPreset { preset: "fast".into(), crf: 23 },
            container: Container::Mp4,
            status: StagingStatus::Ready,
            progress: 0,
            last_error: None,
        }
    }

    /// Timeline edit callback. Signature matches the session's
    /// times-changed notification; the latest call wins.
    pub fn times_changed(
        &mut self,
        _kind: quickcut_core::clip::TrackKind,
        _index: usize,
        start: f64,
        end: f64,
        volume: f64,
    ) {
        self.start_seconds = start;
        self.end_seconds = end;
        self.clip_volume = volume;
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }

    /// Audio is dropped when the user asked for mute OR the clip volume
    /// sits at zero — an all-silent track is exported as no track.
    pub fn effective_mute(&self) -> bool {
        self.muted || self.clip_volume <= 0.0
    }

    pub fn status(&self) -> StagingStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Message from the last failed or aborted export, cleared when the
    /// next one starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn was_cancelled(&self) -> bool {
        self.last_error.as_deref() == Some(CANCELLED)
    }

    /// The job id to pass to `cancel_export`, if an export is running.
    pub fn active_job(&self) -> Option<Uuid> {
        match self.status {
            StagingStatus::Processing { job_id } => Some(job_id),
            StagingStatus::Ready => None,
        }
    }

    /// Snapshot the staged parameters into a spec for the worker. The
    /// range is validated here, at the boundary, so the error message can
    /// go straight to the user.
    pub fn build_spec(&self) -> Result<ExportSpec> {
        if let StagingStatus::Processing { .. } = self.status {
            bail!("an export is already in progress");
        }
        let spec = ExportSpec {
            job_id:        Uuid::new_v4(),
            source:        self.source.clone(),
            start_seconds: self.start_seconds,
            end_seconds:   self.end_seconds,
            resolution:    self.resolution,
            quality:       self.quality.clone(),
            muted:         self.effective_mute(),
            audio_bitrate: self.audio_bitrate.clone(),
            container:     self.container,
        };
        spec.validate(self.media_duration)?;
        Ok(spec)
    }

    /// Mark the export started. Call with the job id of the spec just
    /// handed to the worker.
    pub fn begin(&mut self, job_id: Uuid) {
        self.status = StagingStatus::Processing { job_id };
        self.progress = 0;
        self.last_error = None;
    }

    /// Feed a worker result through the staging. Results for other jobs
    /// (a stale thread finishing after a cancel) are ignored.
    pub fn handle_result(&mut self, result: &ExportResult) {
        let StagingStatus::Processing { job_id: active } = self.status else {
            return;
        };
        match result {
            ExportResult::Progress { job_id, percent } if *job_id == active => {
                self.progress = *percent;
            }
            ExportResult::Done { job_id, .. } if *job_id == active => {
                self.progress = 100;
                self.status = StagingStatus::Ready;
            }
            ExportResult::Error { job_id, msg } if *job_id == active => {
                self.last_error = Some(msg.clone());
                self.status = StagingStatus::Ready;
            }
            _ => {}
        }
    }
}
