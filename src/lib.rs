pub mod configuration;
pub mod playback;
pub mod visualization;
pub mod app;

pub use playback::error::{PlaybackError, PlaybackResult};
pub use playback::snapshot::{NVec3, PointCloud, Snapshot};
pub use playback::loader::{CsvSnapshotLoader, SnapshotLoader};
pub use playback::scene::{Bounds, PointStyle, SceneState};
pub use playback::driver::{ExportSummary, FrameExporter, Playback, PlaybackPhase, RenderedFrame};

pub use configuration::config::{PlaybackConfig, SequenceConfig, SceneConfig, InputConfig, OutputConfig};

pub use visualization::{camera::FixedCamera, raster::FrameRasterizer};
pub use visualization::export::{frame_delay_cs, GifExporter, MAX_EXPORT_FPS};
pub use visualization::viewer::{present, PlaybackTicker, TickOutcome, ViewerSettings};

pub use app::{run, build_playback, DisplayMode};
