//! Mutable view state owned by the playback driver.
//!
//! - [`Bounds`]     – fixed symmetric cube the scene is drawn in
//! - [`PointStyle`] – marker size and colours
//! - [`SceneState`] – the points currently on screen and the step they belong to

use crate::configuration::config::SceneConfig;
use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::playback::snapshot::{NVec3, PointCloud};

/// Symmetric cubic extent `[-half_extent, half_extent]` on every axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub half_extent: f64,
}

impl Bounds {
    pub fn new(half_extent: f64) -> Self {
        Self { half_extent }
    }

    pub fn contains(&self, p: &NVec3) -> bool {
        p.iter().all(|c| c.abs() <= self.half_extent)
    }

    /// The eight cube corners, index bits 0/1/2 select the sign of x/y/z
    pub fn corners(&self) -> [NVec3; 8] {
        let h = self.half_extent;
        let mut out = [NVec3::zeros(); 8];
        for (i, c) in out.iter_mut().enumerate() {
            let sign = |bit: usize| if i & (1 << bit) != 0 { h } else { -h };
            *c = NVec3::new(sign(0), sign(1), sign(2));
        }
        out
    }

    /// Pairs of corner indices forming the 12 cube edges
    pub fn edges() -> [(usize, usize); 12] {
        [
            (0, 1), (2, 3), (4, 5), (6, 7), // along x
            (0, 2), (1, 3), (4, 6), (5, 7), // along y
            (0, 4), (1, 5), (2, 6), (3, 7), // along z
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub marker_size: f64,       // marker radius in world units (viewer)
    pub marker_color: [u8; 3],  // srgb
    pub background: [u8; 3],    // srgb
}

impl Default for PointStyle {
    // small white markers on black
    fn default() -> Self {
        Self {
            marker_size: 0.08,
            marker_color: [255, 255, 255],
            background: [0, 0, 0],
        }
    }
}

impl From<&SceneConfig> for PointStyle {
    fn from(cfg: &SceneConfig) -> Self {
        Self {
            marker_size: cfg.marker_size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneState {
    bounds: Bounds,
    style: PointStyle,
    current_points: PointCloud,
    frame_index: Option<usize>,     // step on screen, None before the first frame
    particle_count: Option<usize>,  // P, fixed by the first frame after a clear
    revision: u64,                  // bumped on every change, polled by the viewer
}

impl SceneState {
    pub fn new(bounds: Bounds, style: PointStyle) -> Self {
        Self {
            bounds,
            style,
            current_points: PointCloud::empty(),
            frame_index: None,
            particle_count: None,
            revision: 0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn style(&self) -> PointStyle {
        self.style
    }

    pub fn current_points(&self) -> &PointCloud {
        &self.current_points
    }

    pub fn frame_index(&self) -> Option<usize> {
        self.frame_index
    }

    pub fn particle_count(&self) -> Option<usize> {
        self.particle_count
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop everything on screen and forget the established particle count
    pub fn clear(&mut self) {
        self.current_points = PointCloud::empty();
        self.frame_index = None;
        self.particle_count = None;
        self.revision += 1;
    }

    /// Replace the displayed points wholesale with the cloud for `step`.
    /// On a count mismatch the scene is left as it was.
    pub fn set_points(&mut self, step: usize, points: PointCloud) -> PlaybackResult<()> {
        if let Some(expected) = self.particle_count {
            if points.len() != expected {
                return Err(PlaybackError::ShapeMismatch {
                    step,
                    expected,
                    found: points.len(),
                });
            }
        }

        self.particle_count = Some(points.len());
        self.current_points = points;
        self.frame_index = Some(step);
        self.revision += 1;
        Ok(())
    }
}
