//! Wires a validated configuration into one playback run:
//! loader -> playback driver -> (viewer) -> gif export

use crate::configuration::config::PlaybackConfig;
use crate::playback::driver::{ExportSummary, Playback};
use crate::playback::error::PlaybackResult;
use crate::playback::loader::CsvSnapshotLoader;
use crate::playback::scene::{Bounds, PointStyle, SceneState};
use crate::visualization::export::GifExporter;
use crate::visualization::raster::FrameRasterizer;
use crate::visualization::viewer::{present, ViewerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Interactive, // open a window, then export
    Headless,    // export only
}

/// Build the playback described by `cfg`, already initialized
pub fn build_playback(cfg: &PlaybackConfig) -> Playback {
    let loader = CsvSnapshotLoader::from_config(&cfg.input);
    let scene = SceneState::new(
        Bounds::new(cfg.scene.axis_bounds),
        PointStyle::from(&cfg.scene),
    );

    let mut playback = Playback::new(Box::new(loader), scene, cfg.playback.num_steps);
    playback.init();
    playback
}

pub fn run(cfg: &PlaybackConfig, mode: DisplayMode) -> PlaybackResult<ExportSummary> {
    cfg.validate()?;

    log::info!(
        "playing {} steps from {} ({:?})",
        cfg.playback.num_steps,
        cfg.input.base_location.display(),
        mode
    );

    let mut playback = build_playback(cfg);
    if mode == DisplayMode::Interactive {
        playback = present(playback, &ViewerSettings::from_config(cfg))?;
    }

    let mut exporter = GifExporter::create(
        &cfg.output.location,
        cfg.playback.export_fps,
        FrameRasterizer::from_config(cfg),
    )?;
    let summary = playback.export(&mut exporter)?;

    log::info!("done: {} frames at {} fps in {}", summary.frames, cfg.playback.export_fps, summary.target);
    Ok(summary)
}
