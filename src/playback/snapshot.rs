//! Per-step particle positions.
//!
//! A `PointCloud` keeps the three coordinate columns side by side, index-aligned:
//! `x[i]`, `y[i]` and `z[i]` all belong to particle `i`. A `Snapshot` tags a
//! cloud with the step it was read for.

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f64>, // X column
    pub y: Vec<f64>, // Y column
    pub z: Vec<f64>, // Z column
}

impl PointCloud {
    /// Cloud with zero particles, the "nothing drawn yet" state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from individual positions, keeping their order
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut cloud = Self::empty();
        for p in points {
            cloud.push(p[0], p[1], p[2]);
        }
        cloud
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate positions as vectors, in record order
    pub fn points(&self) -> impl Iterator<Item = NVec3> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.z.iter())
            .map(|((x, y), z)| NVec3::new(*x, *y, *z))
    }

    /// Split into the three parallel columns `(X, Y, Z)`
    pub fn into_columns(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.x, self.y, self.z)
    }
}

/// Positions of every particle at one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: usize,        // timestep ordinal, also the record identity
    pub points: PointCloud, // one entry per particle
}

impl Snapshot {
    pub fn new(step: usize, points: PointCloud) -> Self {
        Self { step, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
