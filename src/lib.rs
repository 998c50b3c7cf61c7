//! AQI fusion engine
//!
//! Combines ground station and satellite readings into a single Air Quality
//! Index. For every pollutant the nearest ground stations are averaged with
//! inverse-distance weights (the satellite estimate is the fallback), the
//! result is converted into a sub-index with the EPA breakpoint tables from
//! the [`aqi`] crate, and the highest sub-index becomes the AQI.
//!
//! Everything here is synchronous and free of I/O. Fetching readings is
//! up to the caller.

pub mod config;
pub mod error;
pub mod metadata;
pub mod outcome;
pub mod reading;
pub mod resolver;
pub mod synthesizer;

pub use aqi::{Category, NegativePolicy, Pollutant, SubIndexResult};
pub use config::{FusionConfig, RadiusExpansion};
pub use error::{FusionError, Result};
pub use metadata::FusionMeta;
pub use outcome::{AqiSummary, Coordinate, FusionOutcome, PollutantLevels};
pub use reading::{PollutantReading, Source};
pub use resolver::{resolve_concentration, resolve_concentration_with, Resolution};
pub use synthesizer::{
    group_by_pollutant, synthesize, synthesize_air_quality, FusionEngine, ReadingsByPollutant,
};
