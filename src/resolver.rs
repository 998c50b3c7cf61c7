//! Source fusion resolver
//!
//! Picks one representative concentration for a pollutant out of the
//! candidate readings. Ground stations take precedence over the satellite
//! estimate: the nearest stations inside the search radius are combined
//! with inverse-distance weights, and the satellite value is only used when
//! no station is in reach.

use aqi::Pollutant;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::FusionConfig;
use crate::reading::PollutantReading;

/// Outcome of resolving one pollutant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Distance-weighted average over the nearest ground stations.
    Ground {
        concentration: f64,
        stations_used: usize,
        observed_at: DateTime<Utc>,
    },
    /// No station in reach; satellite estimate used as is.
    Satellite {
        concentration: f64,
        observed_at: DateTime<Utc>,
    },
    /// Nothing to go on. The pollutant is left out of the aggregate.
    Unavailable,
}

impl Resolution {
    pub fn concentration(&self) -> Option<f64> {
        match *self {
            Resolution::Ground { concentration, .. }
            | Resolution::Satellite { concentration, .. } => Some(concentration),
            Resolution::Unavailable => None,
        }
    }

    pub fn stations_used(&self) -> usize {
        match *self {
            Resolution::Ground { stations_used, .. } => stations_used,
            _ => 0,
        }
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        match *self {
            Resolution::Ground { observed_at, .. } | Resolution::Satellite { observed_at, .. } => {
                Some(observed_at)
            }
            Resolution::Unavailable => None,
        }
    }

    /// Whether the concentration went through ground weighting.
    pub fn is_weighted(&self) -> bool {
        matches!(self, Resolution::Ground { .. })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Resolution::Unavailable)
    }
}

/// Resolves `pollutant` with the default weighting (nearest 3 stations,
/// epsilon 0.1 km).
///
/// Readings for other pollutants are ignored, so the full reading set may
/// be passed in.
pub fn resolve_concentration(
    pollutant: Pollutant,
    readings: &[PollutantReading],
    radius_km: f64,
) -> Resolution {
    resolve_concentration_with(&FusionConfig::default(), pollutant, readings, radius_km)
}

pub fn resolve_concentration_with(
    config: &FusionConfig,
    pollutant: Pollutant,
    readings: &[PollutantReading],
    radius_km: f64,
) -> Resolution {
    let (mut ground, satellite): (Vec<&PollutantReading>, Vec<&PollutantReading>) = readings
        .iter()
        .filter(|r| r.pollutant == pollutant)
        .filter(|r| {
            let finite = r.concentration.is_finite();
            if !finite {
                debug!(%pollutant, station = ?r.station_id, "skipping non-finite concentration");
            }
            finite
        })
        .partition(|r| r.is_ground());

    ground.retain(|r| in_reach(r, radius_km));

    if !ground.is_empty() {
        // sort_by is stable, so equal distances keep their input order
        ground.sort_by(|a, b| a.effective_distance_km().total_cmp(&b.effective_distance_km()));
        ground.truncate(config.max_stations.max(1));

        let epsilon = config.epsilon_km.max(f64::EPSILON);
        let weights: Vec<f64> = ground
            .iter()
            .map(|r| 1.0 / (r.effective_distance_km() + epsilon))
            .collect();
        let total: f64 = weights.iter().sum();
        let concentration: f64 = ground
            .iter()
            .zip(&weights)
            .map(|(r, w)| r.concentration * (w / total))
            .sum();
        let observed_at = ground
            .iter()
            .map(|r| r.observed_at)
            .max()
            .unwrap_or_else(|| ground[0].observed_at);

        debug!(
            %pollutant,
            stations = ground.len(),
            concentration,
            "resolved from ground stations"
        );
        return Resolution::Ground {
            concentration,
            stations_used: ground.len(),
            observed_at,
        };
    }

    // Newest estimate wins; the first one on ties
    let newest = satellite
        .into_iter()
        .reduce(|best, r| if r.observed_at > best.observed_at { r } else { best });

    match newest {
        Some(reading) => {
            debug!(%pollutant, concentration = reading.concentration, "resolved from satellite");
            Resolution::Satellite {
                concentration: reading.concentration,
                observed_at: reading.observed_at,
            }
        }
        None => {
            debug!(%pollutant, radius_km, "no readings in reach");
            Resolution::Unavailable
        }
    }
}

fn in_reach(reading: &PollutantReading, radius_km: f64) -> bool {
    if let Some(d) = reading.distance_km {
        if !d.is_finite() || d < 0.0 {
            debug!(station = ?reading.station_id, distance_km = d, "discarding bad distance");
            return false;
        }
    }
    reading.effective_distance_km() <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap()
    }

    fn ground(pollutant: Pollutant, value: f64, id: &str, distance: f64) -> PollutantReading {
        PollutantReading::ground(pollutant, value, id, distance, at())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_single_station_is_identity() {
        let readings = [ground(Pollutant::Pm25, 17.3, "a", 4.2)];
        let resolution = resolve_concentration(Pollutant::Pm25, &readings, 10.0);

        assert_eq!(resolution.concentration(), Some(17.3));
        assert_eq!(resolution.stations_used(), 1);
        assert!(resolution.is_weighted());
    }

    #[test]
    fn test_two_stations_lean_toward_nearest() {
        let readings = [
            ground(Pollutant::Pm25, 80.0, "near", 2.0),
            ground(Pollutant::Pm25, 20.0, "far", 8.0),
        ];
        let resolution = resolve_concentration(Pollutant::Pm25, &readings, 10.0);

        // (80 / 2.1 + 20 / 8.1) / (1 / 2.1 + 1 / 8.1) = 690 / 10.2
        assert_close(resolution.concentration().unwrap(), 690.0 / 10.2);
        assert_eq!(resolution.stations_used(), 2);
    }

    #[test]
    fn test_only_nearest_three_count() {
        let readings = [
            ground(Pollutant::No2, 1000.0, "far", 9.0),
            ground(Pollutant::No2, 10.0, "a", 1.0),
            ground(Pollutant::No2, 10.0, "b", 2.0),
            ground(Pollutant::No2, 10.0, "c", 3.0),
        ];
        let resolution = resolve_concentration(Pollutant::No2, &readings, 10.0);

        assert_close(resolution.concentration().unwrap(), 10.0);
        assert_eq!(resolution.stations_used(), 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let readings = [
            ground(Pollutant::O3, 30.0, "a", 1.0),
            ground(Pollutant::O3, 40.0, "b", 1.0),
            ground(Pollutant::O3, 50.0, "c", 1.0),
            ground(Pollutant::O3, 60.0, "d", 1.0),
        ];
        let resolution = resolve_concentration(Pollutant::O3, &readings, 10.0);

        assert_close(resolution.concentration().unwrap(), 40.0);
    }

    #[test]
    fn test_radius_filters_before_ranking() {
        let sat_at = at() + Duration::minutes(5);
        let readings = [
            ground(Pollutant::No2, 80.0, "far", 12.0),
            PollutantReading::satellite(Pollutant::No2, 30.0, sat_at),
        ];
        let resolution = resolve_concentration(Pollutant::No2, &readings, 10.0);

        assert_eq!(
            resolution,
            Resolution::Satellite {
                concentration: 30.0,
                observed_at: sat_at,
            }
        );
        assert_eq!(resolution.stations_used(), 0);
    }

    #[test]
    fn test_ground_overrides_satellite() {
        let readings = [
            PollutantReading::satellite(Pollutant::No2, 30.0, at()),
            ground(Pollutant::No2, 12.0, "a", 3.0),
        ];
        let resolution = resolve_concentration(Pollutant::No2, &readings, 10.0);

        assert_eq!(resolution.concentration(), Some(12.0));
    }

    #[test]
    fn test_newest_satellite_wins() {
        let readings = [
            PollutantReading::satellite(Pollutant::Hcho, 1.0, at()),
            PollutantReading::satellite(Pollutant::Hcho, 2.0, at() + Duration::hours(1)),
            PollutantReading::satellite(Pollutant::Hcho, 3.0, at() + Duration::hours(1)),
        ];
        let resolution = resolve_concentration(Pollutant::Hcho, &readings, 10.0);

        assert_eq!(resolution.concentration(), Some(2.0));
    }

    #[test]
    fn test_nothing_is_unavailable() {
        assert_eq!(
            resolve_concentration(Pollutant::Pm25, &[], 10.0),
            Resolution::Unavailable
        );

        // readings for other pollutants don't count
        let readings = [ground(Pollutant::O3, 40.0, "a", 1.0)];
        let resolution = resolve_concentration(Pollutant::Pm25, &readings, 10.0);
        assert!(!resolution.is_available());
        assert_eq!(resolution.concentration(), None);
    }

    #[test]
    fn test_co_located_stations() {
        let readings = [
            ground(Pollutant::Pm25, 10.0, "a", 0.0),
            ground(Pollutant::Pm25, 20.0, "b", 0.0),
        ];
        let resolution = resolve_concentration(Pollutant::Pm25, &readings, 10.0);

        assert_close(resolution.concentration().unwrap(), 15.0);
    }

    #[test]
    fn test_bad_readings_are_skipped() {
        let readings = [
            ground(Pollutant::Pm25, f64::NAN, "nan", 1.0),
            ground(Pollutant::Pm25, 50.0, "negative-distance", -1.0),
            ground(Pollutant::Pm25, 9.0, "ok", 5.0),
        ];
        let resolution = resolve_concentration(Pollutant::Pm25, &readings, 10.0);

        assert_eq!(resolution.concentration(), Some(9.0));
        assert_eq!(resolution.stations_used(), 1);
    }

    #[test]
    fn test_observed_at_is_newest_station() {
        let later = at() + Duration::minutes(30);
        let readings = [
            ground(Pollutant::O3, 40.0, "a", 1.0),
            PollutantReading::ground(Pollutant::O3, 42.0, "b", 2.0, later),
        ];
        let resolution = resolve_concentration(Pollutant::O3, &readings, 10.0);

        assert_eq!(resolution.observed_at(), Some(later));
    }

    #[test]
    fn test_configured_station_limit() {
        let config = FusionConfig {
            max_stations: 1,
            ..FusionConfig::default()
        };
        let readings = [
            ground(Pollutant::Pm25, 10.0, "a", 1.0),
            ground(Pollutant::Pm25, 90.0, "b", 2.0),
        ];
        let resolution = resolve_concentration_with(&config, Pollutant::Pm25, &readings, 10.0);

        assert_eq!(resolution.concentration(), Some(10.0));
        assert_eq!(resolution.stations_used(), 1);
    }
}
