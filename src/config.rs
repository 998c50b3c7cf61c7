//! Fusion configuration
//!
//! Every field has a default, so callers can hand over a partial JSON
//! document and only override what they need.

use aqi::NegativePolicy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MAX_STATIONS: usize = 3;
pub const DEFAULT_EPSILON_KM: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FusionConfig {
    /// Nearest ground readings kept per pollutant.
    pub max_stations: usize,
    /// Added to every distance before inverting, so co-located stations
    /// don't divide by zero.
    pub epsilon_km: f64,
    pub negative_policy: NegativePolicy,
    /// Widen the radius when nothing on the ground is in reach. Off unless
    /// set.
    pub expansion: Option<RadiusExpansion>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            max_stations: DEFAULT_MAX_STATIONS,
            epsilon_km: DEFAULT_EPSILON_KM,
            negative_policy: NegativePolicy::Clamp,
            expansion: None,
        }
    }
}

impl FusionConfig {
    /// Default config with radius expansion enabled.
    pub fn adaptive() -> Self {
        Self {
            expansion: Some(RadiusExpansion::default()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Label reported in `fusion.weighting`.
    pub fn weighting_label(&self) -> String {
        format!("distance-inverse top-{}", self.max_stations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadiusExpansion {
    pub max_expansions: u32,
    pub factor: f64,
    pub ceiling_km: f64,
}

impl Default for RadiusExpansion {
    fn default() -> Self {
        Self {
            max_expansions: 3,
            factor: 2.0,
            ceiling_km: 200.0,
        }
    }
}

impl RadiusExpansion {
    /// The next radius to try, or `None` once the ceiling is reached.
    pub fn next_radius(&self, radius_km: f64) -> Option<f64> {
        let next = (radius_km * self.factor).min(self.ceiling_km);
        (next > radius_km).then_some(next)
    }
}
