//! Animated GIF export of the rendered frame sequence
//!
//! Frames are rasterized and encoded one at a time as they are submitted, so
//! only the encoder's working buffers are held in memory. The output loops
//! forever at the configured frame rate.
//!
//! GIF stores frame delays in whole centiseconds, so rates are limited to
//! 1..=100 fps and the delay is rounded to the nearest centisecond.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gif::{Encoder, Repeat};

use crate::playback::driver::{FrameExporter, RenderedFrame};
use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::visualization::raster::FrameRasterizer;

/// Quantizer speed, 1 (best) to 30 (fastest); frames are mostly black and white
const ENCODER_SPEED: i32 = 10;

/// Highest frame rate a centisecond delay can express
pub const MAX_EXPORT_FPS: u32 = 100;

/// Per-frame delay in centiseconds for `fps`, rounded to nearest
pub fn frame_delay_cs(fps: u32) -> u16 {
    (100.0 / fps.max(1) as f64).round().max(1.0) as u16
}

pub struct GifExporter {
    path: PathBuf,
    target: String,
    encoder: Option<Encoder<BufWriter<File>>>, // None once finalized
    rasterizer: FrameRasterizer,
    width: u16,
    height: u16,
    delay_cs: u16,
    frames: usize,
}

impl GifExporter {
    /// Create (or truncate) the artifact at `path` and write the gif header
    pub fn create(path: &Path, fps: u32, rasterizer: FrameRasterizer) -> PlaybackResult<Self> {
        let target = path.display().to_string();
        let fail = |reason: String| PlaybackError::ExportFailure {
            target: target.clone(),
            reason,
        };

        if fps == 0 || fps > MAX_EXPORT_FPS {
            return Err(fail(format!("frame rate must be 1..={MAX_EXPORT_FPS} fps, got {fps}")));
        }

        let (w, h) = rasterizer.dimensions();
        let (Ok(width), Ok(height)) = (u16::try_from(w), u16::try_from(h)) else {
            return Err(fail(format!("{w}x{h} exceeds the gif size limit")));
        };

        let file = File::create(path).map_err(|e| fail(e.to_string()))?;
        let mut encoder = Encoder::new(BufWriter::new(file), width, height, &[])
            .map_err(|e| fail(e.to_string()))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| fail(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            target,
            encoder: Some(encoder),
            rasterizer,
            width,
            height,
            delay_cs: frame_delay_cs(fps),
            frames: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, reason: impl ToString) -> PlaybackError {
        PlaybackError::ExportFailure {
            target: self.target.clone(),
            reason: reason.to_string(),
        }
    }
}

impl FrameExporter for GifExporter {
    fn submit_frame(&mut self, frame: &RenderedFrame) -> PlaybackResult<()> {
        let mut rgba = self.rasterizer.render(&frame.points).into_raw();
        let mut gif_frame =
            gif::Frame::from_rgba_speed(self.width, self.height, &mut rgba, ENCODER_SPEED);
        gif_frame.delay = self.delay_cs;

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(self.failure("encoder already finalized"));
        };
        if let Err(e) = encoder.write_frame(&gif_frame) {
            return Err(self.failure(format!("step {}: {e}", frame.step)));
        }

        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> PlaybackResult<()> {
        let Some(encoder) = self.encoder.take() else {
            return Err(self.failure("encoder already finalized"));
        };

        // trailer, then everything still buffered; either can hit a full disk
        let mut writer = encoder
            .into_inner()
            .map_err(|e| self.failure(format!("writing trailer: {e}")))?;
        writer
            .flush()
            .map_err(|e| self.failure(format!("flushing: {e}")))?;

        if self.frames == 0 {
            log::warn!("{} holds no frames", self.target);
        }
        log::info!("wrote {} frames to {}", self.frames, self.target);
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn name(&self) -> &str {
        &self.target
    }
}
