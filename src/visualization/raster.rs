//! Software rasterizer for exported frames
//!
//! Projects each frame through the [`FixedCamera`] onto an RGBA image: the
//! background fill, the bounds cube as thin grey edges, then one square marker
//! per particle. Particles outside the bounds are clipped, the same way the
//! viewer's axes clip them.

use image::{Rgba, RgbaImage};
use nalgebra::Matrix4;

use crate::configuration::config::PlaybackConfig;
use crate::playback::scene::{Bounds, PointStyle};
use crate::playback::snapshot::{NVec3, PointCloud};
use crate::visualization::camera::FixedCamera;

const EDGE_COLOR: [u8; 3] = [70, 70, 70];

#[derive(Debug, Clone)]
pub struct FrameRasterizer {
    width: u32,
    height: u32,
    marker_px: u32, // half-width of a marker square
    bounds: Bounds,
    style: PointStyle,
    view_proj: Matrix4<f64>,
}

impl FrameRasterizer {
    pub fn new(
        width: u32,
        height: u32,
        marker_px: u32,
        bounds: Bounds,
        style: PointStyle,
        camera: &FixedCamera,
    ) -> Self {
        let aspect = width as f64 / height.max(1) as f64;
        Self {
            width,
            height,
            marker_px,
            bounds,
            style,
            view_proj: camera.view_projection(aspect),
        }
    }

    pub fn from_config(cfg: &PlaybackConfig) -> Self {
        let bounds = Bounds::new(cfg.scene.axis_bounds);
        let camera = FixedCamera::orbit(
            cfg.scene.axis_bounds,
            cfg.scene.elevation_deg,
            cfg.scene.azimuth_deg,
        );
        Self::new(
            cfg.output.width,
            cfg.output.height,
            cfg.output.marker_px,
            bounds,
            PointStyle::from(&cfg.scene),
            &camera,
        )
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel position of a world point, `None` if it falls off the image
    /// or behind the camera
    pub fn project(&self, p: &NVec3) -> Option<(i64, i64)> {
        let ndc = FixedCamera::to_ndc(&self.view_proj, p)?;
        let px = ((ndc.x + 1.0) * 0.5 * self.width as f64).floor() as i64;
        let py = ((1.0 - ndc.y) * 0.5 * self.height as f64).floor() as i64;
        if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
            return None;
        }
        Some((px, py))
    }

    /// Draw one frame
    pub fn render(&self, points: &PointCloud) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.width, self.height, rgba(self.style.background));

        self.draw_bounds(&mut img);

        let marker = rgba(self.style.marker_color);
        for p in points.points() {
            if !self.bounds.contains(&p) {
                continue;
            }
            if let Some((px, py)) = self.project(&p) {
                self.stamp(&mut img, px, py, marker);
            }
        }

        img
    }

    fn stamp(&self, img: &mut RgbaImage, cx: i64, cy: i64, color: Rgba<u8>) {
        let r = self.marker_px as i64;
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                self.put(img, x, y, color);
            }
        }
    }

    fn put(&self, img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }

    fn draw_bounds(&self, img: &mut RgbaImage) {
        let corners = self.bounds.corners();
        let color = rgba(EDGE_COLOR);

        for (a, b) in Bounds::edges() {
            let (Some(pa), Some(pb)) = (
                FixedCamera::to_ndc(&self.view_proj, &corners[a]),
                FixedCamera::to_ndc(&self.view_proj, &corners[b]),
            ) else {
                continue;
            };
            let (x0, y0) = self.ndc_to_pixel(&pa);
            let (x1, y1) = self.ndc_to_pixel(&pb);

            // dda, unclipped pixels are dropped by `put`
            let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i64;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = (x0 + t * (x1 - x0)).floor() as i64;
                let y = (y0 + t * (y1 - y0)).floor() as i64;
                self.put(img, x, y, color);
            }
        }
    }

    fn ndc_to_pixel(&self, ndc: &NVec3) -> (f64, f64) {
        (
            (ndc.x + 1.0) * 0.5 * self.width as f64,
            (1.0 - ndc.y) * 0.5 * self.height as f64,
        )
    }
}

fn rgba(c: [u8; 3]) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}
