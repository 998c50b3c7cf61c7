//! Error types for the fusion engine.

use aqi::AqiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    /// Sub-index calculation failed (unknown pollutant or invalid
    /// concentration).
    #[error(transparent)]
    Aqi(#[from] AqiError),

    /// No pollutant resolved into a sub-index.
    #[error("insufficient data: no pollutant resolved into a sub-index")]
    InsufficientData,

    #[error("invalid search radius: {0} km")]
    InvalidRadius(f64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FusionError>;
