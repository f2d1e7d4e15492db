//! Error types for cartopress

use thiserror::Error;

/// Main error type for cartopress operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Curve fit failed to converge after {iterations} iterations")]
    FitDiverged { iterations: usize },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for cartopress operations
pub type Result<T> = std::result::Result<T, Error>;
