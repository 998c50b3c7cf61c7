//! Pollutant readings
//!
//! A [`PollutantReading`] is one measurement handed over by a data-fetch
//! collaborator (a ground station network or a satellite product). The
//! engine consumes readings by value and never mutates them.

use aqi::Pollutant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    GroundStation,
    Satellite,
}

/// A single measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    /// µg/m³ for particulates, ppb for gases.
    pub concentration: f64,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    /// Distance from the target coordinate. Ground readings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl PollutantReading {
    /// A point measurement from a ground station `distance_km` away from the
    /// target coordinate.
    pub fn ground(
        pollutant: Pollutant,
        concentration: f64,
        station_id: impl Into<String>,
        distance_km: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pollutant,
            concentration,
            source: Source::GroundStation,
            station_id: Some(station_id.into()),
            distance_km: Some(distance_km),
            observed_at,
        }
    }

    /// A satellite estimate for the target coordinate.
    pub fn satellite(pollutant: Pollutant, concentration: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            pollutant,
            concentration,
            source: Source::Satellite,
            station_id: None,
            distance_km: None,
            observed_at,
        }
    }

    pub fn is_ground(&self) -> bool {
        self.source == Source::GroundStation
    }

    /// Distance used for ranking. A ground reading without a distance is
    /// treated as co-located with the target.
    pub fn effective_distance_km(&self) -> f64 {
        self.distance_km.unwrap_or(0.0)
    }
}
