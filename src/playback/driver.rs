//! Frame-synchronous playback driver.
//!
//! `Playback` owns the scene and pulls one snapshot from its loader per
//! frame advance, in strictly increasing step order. Every rendered frame is
//! recorded so the whole sequence can be streamed to a [`FrameExporter`] once
//! display is over.
//!
//! Phases:
//! - `Ready`     – constructed, nothing drawn
//! - `Rendering` – `init` ran; `next` is the step the next advance renders
//! - `Terminal`  – every step rendered (or `num_steps == 0`)
//! - `Exported`  – the artifact was written

use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::playback::loader::SnapshotLoader;
use crate::playback::scene::SceneState;
use crate::playback::snapshot::PointCloud;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Ready,
    Rendering { next: usize },
    Terminal,
    Exported,
}

/// A frame as it was put on screen
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub step: usize,
    pub points: PointCloud,
}

/// Destination for the rendered frame sequence (an animated image, a counter in tests, ...)
pub trait FrameExporter {
    /// Encode one frame; frames arrive in step order
    fn submit_frame(&mut self, frame: &RenderedFrame) -> PlaybackResult<()>;

    /// Flush and close the artifact
    fn finalize(&mut self) -> PlaybackResult<()>;

    /// Frames submitted so far
    fn frame_count(&self) -> usize;

    /// Human readable target, used in logs and errors
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub frames: usize,
    pub target: String,
}

pub struct Playback {
    loader: Box<dyn SnapshotLoader>,
    scene: SceneState,
    num_steps: usize,
    phase: PlaybackPhase,
    frames: Vec<RenderedFrame>,
}

impl Playback {
    pub fn new(loader: Box<dyn SnapshotLoader>, scene: SceneState, num_steps: usize) -> Self {
        Self {
            loader,
            scene,
            num_steps,
            phase: PlaybackPhase::Ready,
            frames: Vec::with_capacity(num_steps),
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    /// Steps rendered so far, in the order they were rendered
    pub fn visited(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.step).collect()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Terminal | PlaybackPhase::Exported)
    }

    /// Clear the scene to the empty baseline and rewind to step 0
    pub fn init(&mut self) {
        self.scene.clear();
        self.frames.clear();
        self.phase = if self.num_steps == 0 {
            log::warn!("playback has no steps; nothing will be rendered");
            PlaybackPhase::Terminal
        } else {
            PlaybackPhase::Rendering { next: 0 }
        };
    }

    /// Render the next step. Returns the step drawn, or `None` once the
    /// sequence is over. A failed load or update leaves the phase untouched.
    pub fn advance(&mut self) -> PlaybackResult<Option<usize>> {
        if self.phase == PlaybackPhase::Ready {
            self.init();
        }

        let step = match self.phase {
            PlaybackPhase::Rendering { next } => next,
            _ => return Ok(None),
        };

        let snapshot = self.loader.load(step)?;
        self.scene.set_points(step, snapshot.points)?;
        self.frames.push(RenderedFrame {
            step,
            points: self.scene.current_points().clone(),
        });
        log::debug!("rendered step {step}/{}", self.num_steps);

        self.phase = if step + 1 < self.num_steps {
            PlaybackPhase::Rendering { next: step + 1 }
        } else {
            PlaybackPhase::Terminal
        };

        Ok(Some(step))
    }

    /// Advance until every step has been rendered
    pub fn run_to_end(&mut self) -> PlaybackResult<()> {
        while self.advance()?.is_some() {}
        Ok(())
    }

    /// Stream every frame, in step order, to `exporter` and finalize it.
    /// Steps not yet rendered (e.g. the viewer was closed early) are rendered first.
    pub fn export(&mut self, exporter: &mut dyn FrameExporter) -> PlaybackResult<ExportSummary> {
        if self.phase == PlaybackPhase::Exported {
            return Err(PlaybackError::ExportFailure {
                target: exporter.name().to_string(),
                reason: "sequence was already exported".to_string(),
            });
        }

        if !self.is_finished() {
            log::info!(
                "rendering remaining {} steps before export",
                self.num_steps - self.frames.len()
            );
            self.run_to_end()?;
        }

        log::info!("exporting {} frames to {}", self.frames.len(), exporter.name());
        for frame in &self.frames {
            exporter.submit_frame(frame)?;
        }
        exporter.finalize()?;
        self.phase = PlaybackPhase::Exported;

        Ok(ExportSummary {
            frames: exporter.frame_count(),
            target: exporter.name().to_string(),
        })
    }
}
