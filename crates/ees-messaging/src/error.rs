use std::path::PathBuf;

use ees_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zone {zone:?} has geometry {found:?} but a Polygon was expected")]
    UnsupportedGeometry { zone: String, found: String },

    #[error("zone {zone:?} polygon has {vertices} vertices, at least 3 are required")]
    DegeneratePolygon { zone: String, vertices: usize },

    #[error("zone {zone:?} has malformed coordinates: {reason}")]
    Coordinates { zone: String, reason: String },

    #[error("message #{index} has an invalid broadcast time: {source}")]
    BroadcastTime {
        index:  usize,
        #[source]
        source: CoreError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not load {}: {source}", path.display())]
    Load {
        path:   PathBuf,
        #[source]
        source: Box<MessagingError>,
    },
}

impl MessagingError {
    /// Wrap `self` as a load failure of the source at `path`.
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        MessagingError::Load { path: path.into(), source: Box::new(self) }
    }
}

pub type MessagingResult<T> = Result<T, MessagingError>;
