//! Snapshot loading from per-step delimited text records.
//!
//! The producer writes one file per step under a base directory, named by a
//! pattern such as `positions_{step}.csv`. Each file has a header row and one
//! row per particle; the `X`, `Y` and `Z` columns are found by name so column
//! order and any extra columns (ids, masses) do not matter.
//!
//! Loading is stateless: no cache, no retry. Reading the same step twice on
//! unchanged storage gives the same cloud.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::configuration::config::InputConfig;
use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::playback::snapshot::{PointCloud, Snapshot};

/// Placeholder replaced by the decimal step index in a file pattern
pub const STEP_PLACEHOLDER: &str = "{step}";

/// Naming convention used by the simulator's position dumps
pub const DEFAULT_FILE_PATTERN: &str = "positions_{step}.csv";

const REQUIRED_COLUMNS: [&str; 3] = ["X", "Y", "Z"];

/// Source of snapshots, pulled one step at a time by the playback driver
pub trait SnapshotLoader: Send + Sync {
    fn load(&self, step: usize) -> PlaybackResult<Snapshot>;
}

/// One particle row; unknown columns are ignored by serde
#[derive(Deserialize, Debug)]
struct PositionRow {
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Z")]
    z: f64,
}

#[derive(Debug, Clone)]
pub struct CsvSnapshotLoader {
    base: PathBuf,   // directory holding the step records
    pattern: String, // file name with a `{step}` placeholder
    delimiter: u8,   // field separator
}

impl CsvSnapshotLoader {
    pub fn new(base: impl Into<PathBuf>, pattern: impl Into<String>, delimiter: u8) -> Self {
        Self {
            base: base.into(),
            pattern: pattern.into(),
            delimiter,
        }
    }

    /// Comma separated records named `positions_{step}.csv` under `base`
    pub fn with_defaults(base: impl Into<PathBuf>) -> Self {
        Self::new(base, DEFAULT_FILE_PATTERN, b',')
    }

    /// Assumes the config already passed `PlaybackConfig::validate`
    pub fn from_config(cfg: &InputConfig) -> Self {
        let delimiter = cfg.delimiter.bytes().next().unwrap_or(b',');
        Self::new(&cfg.base_location, cfg.file_pattern.clone(), delimiter)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Storage location of the record for `step`
    pub fn record_path(&self, step: usize) -> PathBuf {
        let file_name = self.pattern.replace(STEP_PLACEHOLDER, &step.to_string());
        self.base.join(file_name)
    }

    fn read_cloud(&self, step: usize, path: &Path, file: File) -> PlaybackResult<PointCloud> {
        let malformed = |reason: String| PlaybackError::MalformedRecord {
            step,
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        // Check the header up front so a missing column is reported as such,
        // even when the record has no rows
        let headers = reader.headers().map_err(|e| malformed(e.to_string()))?;
        for name in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == name) {
                return Err(malformed(format!("missing column `{name}`")));
            }
        }

        let mut cloud = PointCloud::empty();
        for (row, result) in reader.deserialize::<PositionRow>().enumerate() {
            let p = result.map_err(|e| malformed(format!("row {}: {e}", row + 1)))?;
            cloud.push(p.x, p.y, p.z);
        }

        if cloud.is_empty() {
            return Err(malformed("record holds no particles".to_string()));
        }

        Ok(cloud)
    }
}

impl SnapshotLoader for CsvSnapshotLoader {
    fn load(&self, step: usize) -> PlaybackResult<Snapshot> {
        let path = self.record_path(step);

        let file = File::open(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PlaybackError::NotFound {
                step,
                path: path.clone(),
            },
            _ => PlaybackError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let points = self.read_cloud(step, &path, file)?;
        log::debug!("loaded step {step}: {} particles from {}", points.len(), path.display());

        Ok(Snapshot::new(step, points))
    }
}
