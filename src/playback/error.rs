//! Error types for snapshot playback.
//!
//! Every fallible operation in the crate returns `PlaybackResult<T>`.
//! None of these are recovered locally: they propagate to `main` and end the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No record exists for the requested step.
    #[error("no record for step {step} at {}", path.display())]
    NotFound { step: usize, path: PathBuf },

    /// The record exists but does not hold usable `X`, `Y`, `Z` columns.
    #[error("malformed record for step {step} at {}: {reason}", path.display())]
    MalformedRecord {
        step: usize,
        path: PathBuf,
        reason: String,
    },

    /// Particle count differs from the one established by the first rendered snapshot.
    #[error("step {step} holds {found} particles, expected {expected}")]
    ShapeMismatch {
        step: usize,
        expected: usize,
        found: usize,
    },

    /// The video artifact could not be written or finalized.
    #[error("export to {target} failed: {reason}")]
    ExportFailure { target: String, reason: String },

    /// I/O failure other than a missing record.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The interactive viewer stopped without handing the playback back.
    #[error("viewer error: {0}")]
    Viewer(String),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;
