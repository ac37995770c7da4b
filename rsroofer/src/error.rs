//! Error types for rsroofer

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading, reconstruction and export
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("LAS error: {0}")]
    Las(#[from] las::Error),

    #[error("Failed to parse WKT: {0}")]
    WktParse(String),

    #[error("The WKT geometry is not a Polygon, it is a {found}")]
    NotAPolygon { found: String },

    #[error("Polygon has no exterior ring")]
    EmptyPolygon,

    #[error("Point {index} has {dims} coordinate(s), at least 2 are required")]
    MalformedPoint { index: usize, dims: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Reconstruction failed: {0}")]
    Reconstruction(String),

    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for rsroofer operations
pub type Result<T> = std::result::Result<T, Error>;
