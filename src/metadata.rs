//! Fusion metadata
//!
//! Provenance block reported next to the AQI so callers can tell how much
//! ground truth went into it.

use aqi::Pollutant;
use serde::{Deserialize, Serialize};

use crate::resolver::Resolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionMeta {
    /// Most stations any single pollutant was weighted over.
    pub stations_used: usize,
    pub radius_used_km: f64,
    pub weighting: String,
    /// Pollutants resolved through ground weighting, in priority order.
    pub pollutants_weighted: Vec<Pollutant>,
    /// Resolution calls made, including the ones that came back unavailable.
    pub attempts: u32,
}

/// Collects resolution outcomes over one fusion call.
#[derive(Debug, Default)]
pub struct FusionMetaBuilder {
    stations_used: usize,
    pollutants_weighted: Vec<Pollutant>,
    attempts: u32,
}

impl FusionMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pollutant: Pollutant, resolution: &Resolution) {
        self.attempts += 1;
        if resolution.is_weighted() {
            self.stations_used = self.stations_used.max(resolution.stations_used());
            if !self.pollutants_weighted.contains(&pollutant) {
                self.pollutants_weighted.push(pollutant);
            }
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn finish(mut self, radius_used_km: f64, weighting: String) -> FusionMeta {
        self.pollutants_weighted.sort();
        FusionMeta {
            stations_used: self.stations_used,
            radius_used_km,
            weighting,
            pollutants_weighted: self.pollutants_weighted,
            attempts: self.attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_counts_every_attempt() {
        let at = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let mut builder = FusionMetaBuilder::new();

        builder.record(
            Pollutant::No2,
            &Resolution::Ground {
                concentration: 15.2,
                stations_used: 2,
                observed_at: at,
            },
        );
        builder.record(
            Pollutant::Pm25,
            &Resolution::Ground {
                concentration: 12.3,
                stations_used: 3,
                observed_at: at,
            },
        );
        builder.record(
            Pollutant::Hcho,
            &Resolution::Satellite {
                concentration: 2.1,
                observed_at: at,
            },
        );
        builder.record(Pollutant::O3, &Resolution::Unavailable);

        let meta = builder.finish(10.0, "distance-inverse top-3".to_string());
        assert_eq!(
            meta,
            FusionMeta {
                stations_used: 3,
                radius_used_km: 10.0,
                weighting: "distance-inverse top-3".to_string(),
                pollutants_weighted: vec![Pollutant::Pm25, Pollutant::No2],
                attempts: 4,
            }
        );
    }

    #[test]
    fn test_json_field_names() {
        let meta = FusionMeta {
            stations_used: 1,
            radius_used_km: 20.0,
            weighting: "distance-inverse top-3".to_string(),
            pollutants_weighted: vec![Pollutant::Pm25],
            attempts: 2,
        };
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["stationsUsed"], 1);
        assert_eq!(json["radiusUsedKm"], 20.0);
        assert_eq!(json["pollutantsWeighted"][0], "pm25");
        assert_eq!(json["attempts"], 2);
    }
}
