//! Fixed camera shared by the interactive viewer and the frame exporter
//!
//! The camera sits on a sphere around the origin, placed by elevation and
//! azimuth like a matplotlib 3D axes, with +Z pointing up. Nothing moves it
//! after construction.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3, Vector4};

use crate::playback::snapshot::NVec3;

/// Eye distance as a multiple of the scene half extent
const DISTANCE_FACTOR: f64 = 4.0;

/// Vertical field of view, wide enough to fit the bounds cube at `DISTANCE_FACTOR`
const FOVY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCamera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fovy: f64,  // radians
    pub znear: f64,
    pub zfar: f64,
}

impl FixedCamera {
    /// Camera looking at the origin from `elevation_deg` above the xy plane and
    /// `azimuth_deg` around z, far enough out to see a cube of `half_extent`
    pub fn orbit(half_extent: f64, elevation_deg: f64, azimuth_deg: f64) -> Self {
        let distance = DISTANCE_FACTOR * half_extent;
        let (elev, azim) = (elevation_deg.to_radians(), azimuth_deg.to_radians());

        let eye = Point3::new(
            distance * elev.cos() * azim.cos(),
            distance * elev.cos() * azim.sin(),
            distance * elev.sin(),
        );

        Self {
            eye,
            target: Point3::origin(),
            up: Vector3::z(),
            fovy: FOVY,
            znear: 0.05 * distance,
            zfar: 4.0 * distance,
        }
    }

    /// Combined projection * view matrix for a surface of the given aspect ratio
    pub fn view_projection(&self, aspect: f64) -> Matrix4<f64> {
        let view = Isometry3::look_at_rh(&self.eye, &self.target, &self.up);
        let proj = Perspective3::new(aspect, self.fovy, self.znear, self.zfar);
        proj.as_matrix() * view.to_homogeneous()
    }

    /// Normalized device coordinates of `p` under `view_proj`, or `None` when
    /// the point is behind the camera or outside the depth range
    pub fn to_ndc(view_proj: &Matrix4<f64>, p: &NVec3) -> Option<NVec3> {
        let clip = view_proj * Vector4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }
        Some(ndc)
    }
}
