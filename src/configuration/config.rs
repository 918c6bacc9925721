//! Configuration types for loading a playback run from YAML.
//!
//! A run consists of:
//!
//! - [`SequenceConfig`] – how many steps to play and at what rates
//! - [`SceneConfig`]    – fixed axis bounds, marker size, camera angles
//! - [`InputConfig`]    – where the per-step records live and how they are named
//! - [`OutputConfig`]   – where the animated image goes and its resolution
//! - [`PlaybackConfig`] – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! playback:
//!   num_steps: 1000
//!   interframe_interval_ms: 10   # advisory display delay
//!   export_fps: 100              # frame rate of the exported gif, at most 100
//!
//! scene:
//!   axis_bounds: 20.0            # cube is [-20, 20] on every axis
//!   marker_size: 0.08            # optional
//!   elevation_deg: 30.0          # optional
//!   azimuth_deg: -60.0           # optional
//!
//! input:
//!   base_location: files
//!   file_pattern: "positions_{step}.csv"   # optional
//!   delimiter: ","                         # optional
//!
//! output:
//!   location: files/simul_3D.gif
//!   width: 480                   # optional
//!   height: 480                  # optional
//!   marker_px: 1                 # optional
//! ```
//!
//! Paths have no defaults; they always come from the file.

use std::path::PathBuf;

use serde::Deserialize;

use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::playback::loader::{DEFAULT_FILE_PATTERN, STEP_PLACEHOLDER};
use crate::visualization::export::MAX_EXPORT_FPS;

/// Sequence length and timing
#[derive(Deserialize, Debug, Clone)]
pub struct SequenceConfig {
    pub num_steps: usize, // steps 0..num_steps are played, must match the records on disk
    #[serde(default = "default_interval_ms")]
    pub interframe_interval_ms: u64, // target delay between displayed frames, not a real-time contract
    pub export_fps: u32, // frame rate written into the artifact
}

/// Fixed scene layout
#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
    pub axis_bounds: f64, // half extent of the display cube
    #[serde(default = "default_marker_size")]
    pub marker_size: f64, // sphere radius in the viewer, world units
    #[serde(default = "default_elevation")]
    pub elevation_deg: f64, // camera elevation above the xy plane
    #[serde(default = "default_azimuth")]
    pub azimuth_deg: f64, // camera azimuth around z
}

/// Where snapshots are read from
#[derive(Deserialize, Debug, Clone)]
pub struct InputConfig {
    pub base_location: PathBuf,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String, // must contain `{step}`
    #[serde(default = "default_delimiter")]
    pub delimiter: String, // single ascii character
}

/// Where the exported sequence goes
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    pub location: PathBuf,
    #[serde(default = "default_frame_size")]
    pub width: u32,
    #[serde(default = "default_frame_size")]
    pub height: u32,
    #[serde(default = "default_marker_px")]
    pub marker_px: u32, // marker half-width in exported pixels, 0 = single pixel
}

/// Top-level configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct PlaybackConfig {
    pub playback: SequenceConfig,
    pub scene: SceneConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

fn default_interval_ms() -> u64 {
    10
}

fn default_marker_size() -> f64 {
    0.08
}

// matplotlib's default 3d view
fn default_elevation() -> f64 {
    30.0
}

fn default_azimuth() -> f64 {
    -60.0
}

fn default_file_pattern() -> String {
    DEFAULT_FILE_PATTERN.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_frame_size() -> u32 {
    480
}

fn default_marker_px() -> u32 {
    1
}

impl PlaybackConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(s: &str) -> PlaybackResult<Self> {
        serde_yaml::from_str(s).map_err(|e| PlaybackError::InvalidConfig(e.to_string()))
    }

    /// Reject values the loader, camera or encoder cannot work with
    pub fn validate(&self) -> PlaybackResult<()> {
        let invalid = |msg: String| Err(PlaybackError::InvalidConfig(msg));

        let b = self.scene.axis_bounds;
        if !b.is_finite() || b <= 0.0 {
            return invalid(format!("scene.axis_bounds must be positive, got {b}"));
        }
        let m = self.scene.marker_size;
        if !m.is_finite() || m <= 0.0 {
            return invalid(format!("scene.marker_size must be positive, got {m}"));
        }
        if !self.scene.elevation_deg.is_finite() || !self.scene.azimuth_deg.is_finite() {
            return invalid("scene camera angles must be finite".to_string());
        }
        let fps = self.playback.export_fps;
        if fps == 0 || fps > MAX_EXPORT_FPS {
            // gif delays are whole centiseconds
            return invalid(format!("playback.export_fps must be 1..={MAX_EXPORT_FPS}, got {fps}"));
        }
        if !self.input.file_pattern.contains(STEP_PLACEHOLDER) {
            return invalid(format!(
                "input.file_pattern `{}` has no `{STEP_PLACEHOLDER}` placeholder",
                self.input.file_pattern
            ));
        }
        let d = &self.input.delimiter;
        if d.len() != 1 || !d.is_ascii() {
            return invalid(format!("input.delimiter must be one ascii character, got `{d}`"));
        }
        let (w, h) = (self.output.width, self.output.height);
        if w == 0 || h == 0 || w > u16::MAX as u32 || h > u16::MAX as u32 {
            return invalid(format!("output size must be 1..={} on each side, got {w}x{h}", u16::MAX));
        }

        Ok(())
    }
}
