// crates/quickcut-media/src/export.rs
//
// ExportSpec: the complete job description handed to the transcoding
// collaborator, plus the wire forms it travels in:
//   · resolution — `"original"` or `"<w>:<h>"`
//   · quality    — `"<preset>-<crf>"` (e.g. `"fast-23"`)
//
// `engine_args()` is the canonical argument list an ffmpeg-style engine
// consumes. The engine's internals stay out of scope; the args and the
// validation here ARE the contract.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output container handed back to the host as a downloadable buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    Mp4,
    Webm,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Container::Mp4 => "video/mp4",
            Container::Webm => "video/webm",
        }
    }
}

/// Target output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetResolution {
    /// Keep the source resolution — no scale filter is emitted.
    Original,
    Scaled { width: u32, height: u32 },
}

impl TargetResolution {
    /// Parse the wire form: `"original"` or `"<w>:<h>"`. Anything else
    /// (including `WxH` with an `x` separator) is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        if s == "original" {
            return Some(Self::Original);
        }
        let (w, h) = s.split_once(':')?;
        let width: u32 = w.parse().ok()?;
        let height: u32 = h.parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::Scaled { width, height })
    }

    /// The scale filter argument, when one applies.
    pub fn scale_filter(self) -> Option<String> {
        match self {
            Self::Original => None,
            Self::Scaled { width, height } => Some(format!("scale={width}:{height}")),
        }
    }
}

/// Encoder preset + constant rate factor, parsed from `"<preset>-<crf>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityPreset {
    pub preset: String,
    pub crf:    u8,
}

impl QualityPreset {
    /// Parse e.g. `"fast-23"` or `"veryslow-18"`. The CRF is the part
    /// after the LAST dash so preset names containing dashes stay intact.
    pub fn parse(s: &str) -> Option<Self> {
        let (preset, crf) = s.rsplit_once('-')?;
        if preset.is_empty() {
            return None;
        }
        let crf: u8 = crf.parse().ok()?;
        Some(Self { preset: preset.to_string(), crf })
    }
}

/// Complete description of one export job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSpec {
    /// Unique identifier used in all progress / done / error results.
    pub job_id:        Uuid,
    /// The source media the cut is taken from.
    pub source:        PathBuf,
    /// Trim range, seconds. `0 <= start < end <= media duration`.
    pub start_seconds: f64,
    pub end_seconds:   f64,
    pub resolution:    TargetResolution,
    pub quality:       QualityPreset,
    /// Drop the audio stream entirely.
    pub muted:         bool,
    /// Forwarded verbatim to the encoder (e.g. `"128k"`); ignored when
    /// `muted`.
    pub audio_bitrate: String,
    pub container:     Container,
}

impl ExportSpec {
    pub fn clip_duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Validate the trim range at the input boundary, BEFORE the job is
    /// handed to the collaborator. Errors carry the human-readable message
    /// shown to the user.
    pub fn validate(&self, media_duration: f64) -> Result<()> {
        if !self.start_seconds.is_finite() || !self.end_seconds.is_finite() {
            bail!("start and end times must be numbers");
        }
        if self.start_seconds < 0.0
            || self.start_seconds >= self.end_seconds
            || self.end_seconds > media_duration
        {
            bail!("start and end times must satisfy start < end and lie within the video length");
        }
        Ok(())
    }

    /// The ffmpeg-style argument list for this job. Output file name is
    /// `output.<ext>` in the engine's scratch space.
    pub fn engine_args(&self) -> Vec<String> {
        let mut args = vec![
            "-ss".to_string(),
            self.start_seconds.to_string(),
            "-t".to_string(),
            self.clip_duration().to_string(),
            "-i".to_string(),
            "input.mp4".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            self.quality.preset.clone(),
            "-crf".to_string(),
            self.quality.crf.to_string(),
        ];

        if let Some(filter) = self.resolution.scale_filter() {
            args.push("-vf".to_string());
            args.push(filter);
        }

        if self.muted {
            args.push("-an".to_string());
        } else {
            args.push("-c:a".to_string());
            args.push("aac".to_string());
            args.push("-b:a".to_string());
            args.push(self.audio_bitrate.clone());
        }

        args.push(format!("output.{}", self.container.extension()));
        args
    }
}
