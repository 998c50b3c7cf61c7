//! Fusion outcome and its JSON contract
//!
//! The serialized shape (`pollutants`, `aqi.value`, `aqi.dominant`,
//! `aqi.category`, `aqi.subindices`, `fusion.*`) is what the dashboard
//! components read, so field names must not change.
//!
//! Reading is lenient so payloads from the older backend still parse: null
//! or unknown pollutant keys are dropped, timestamps may lack an offset
//! (read as UTC) and sub-indices may be fractional (rounded).

use std::collections::BTreeMap;
use std::ops::Index;

use aqi::{Category, Pollutant, SubIndexResult};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::metadata::FusionMeta;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiSummary {
    pub value: u32,
    pub dominant: Option<Pollutant>,
    pub category: Category,
    #[serde(deserialize_with = "rounded_subindices")]
    pub subindices: BTreeMap<Pollutant, u32>,
}

const AEROSOL_INDEX_KEY: &str = "aerosolIndex";

/// Concentrations keyed by pollutant, plus the satellite aerosol index
/// when one was reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollutantLevels {
    #[serde(flatten)]
    concentrations: BTreeMap<Pollutant, f64>,
    #[serde(rename = "aerosolIndex", skip_serializing_if = "Option::is_none")]
    pub aerosol_index: Option<f64>,
}

impl PollutantLevels {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.concentrations.get(&pollutant).copied()
    }

    pub fn insert(&mut self, pollutant: Pollutant, concentration: f64) -> Option<f64> {
        self.concentrations.insert(pollutant, concentration)
    }

    pub fn len(&self) -> usize {
        self.concentrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentrations.is_empty()
    }

    /// Concentrations in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.concentrations.iter().map(|(&p, &c)| (p, c))
    }
}

impl Index<&Pollutant> for PollutantLevels {
    type Output = f64;

    fn index(&self, pollutant: &Pollutant) -> &f64 {
        &self.concentrations[pollutant]
    }
}

impl<'de> Deserialize<'de> for PollutantLevels {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;

        let mut levels = PollutantLevels::default();
        for (key, value) in raw {
            if key == AEROSOL_INDEX_KEY {
                levels.aerosol_index = value;
                continue;
            }
            match (Pollutant::from_key(&key), value) {
                (Some(pollutant), Some(concentration)) => {
                    levels.insert(pollutant, concentration);
                }
                (Some(_), None) => {}
                (None, _) => debug!(%key, "skipping unknown pollutant key"),
            }
        }
        Ok(levels)
    }
}

fn rounded_subindices<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<Pollutant, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<Pollutant, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(pollutant, value)| (pollutant, value.round().max(0.0) as u32))
        .collect())
}

fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{}`", raw)))
}

/// RFC 3339, or an ISO 8601 date-time without offset taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Newest observation that fed a resolved concentration.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Resolved concentration per pollutant, including pollutants that
    /// have no breakpoint table.
    pub pollutants: PollutantLevels,
    pub aqi: AqiSummary,
    pub fusion: FusionMeta,
}

impl FusionOutcome {
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.location = Some(Coordinate { lat, lon });
        self
    }

    pub fn aqi(&self) -> u32 {
        self.aqi.value
    }

    pub fn dominant_pollutant(&self) -> Option<Pollutant> {
        self.aqi.dominant
    }

    pub fn category(&self) -> Category {
        self.aqi.category
    }

    /// Sub-index of `pollutant` with the concentration it came from.
    pub fn sub_index(&self, pollutant: Pollutant) -> Option<SubIndexResult> {
        let value = *self.aqi.subindices.get(&pollutant)?;
        let source_concentration = self.pollutants.get(pollutant)?;
        Some(SubIndexResult {
            pollutant,
            value,
            source_concentration,
        })
    }

    pub fn sub_indices(&self) -> impl Iterator<Item = SubIndexResult> + '_ {
        self.aqi
            .subindices
            .keys()
            .filter_map(move |p| self.sub_index(*p))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
