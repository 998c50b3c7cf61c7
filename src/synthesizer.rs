//! AQI synthesizer
//!
//! Runs the resolver over every pollutant in a reading set, turns the
//! resolved concentrations into sub-indices and reports the maximum as the
//! AQI, following the EPA convention.

use std::collections::BTreeMap;

use aqi::{compute_sub_index_with, Category, Pollutant};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::FusionConfig;
use crate::error::{FusionError, Result};
use crate::metadata::FusionMetaBuilder;
use crate::outcome::{AqiSummary, FusionOutcome, PollutantLevels};
use crate::reading::PollutantReading;
use crate::resolver::{resolve_concentration_with, Resolution};

/// Readings grouped by pollutant, in priority order.
pub type ReadingsByPollutant = BTreeMap<Pollutant, Vec<PollutantReading>>;

/// Groups readings by pollutant, keeping their relative order within each
/// group.
pub fn group_by_pollutant<I>(readings: I) -> ReadingsByPollutant
where
    I: IntoIterator<Item = PollutantReading>,
{
    let mut groups = ReadingsByPollutant::new();
    for reading in readings {
        groups.entry(reading.pollutant).or_default().push(reading);
    }
    groups
}

/// Fusion entry points bound to one [`FusionConfig`].
///
/// Holds no state besides the config, so one engine can serve any number
/// of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        pollutant: Pollutant,
        readings: &[PollutantReading],
        radius_km: f64,
    ) -> Resolution {
        resolve_concentration_with(&self.config, pollutant, readings, radius_km)
    }

    /// Groups `readings` and synthesizes them.
    pub fn synthesize_air_quality<I>(&self, readings: I, radius_km: f64) -> Result<FusionOutcome>
    where
        I: IntoIterator<Item = PollutantReading>,
    {
        self.synthesize(&group_by_pollutant(readings), radius_km)
    }

    /// Produces the fused AQI for readings already grouped by pollutant.
    ///
    /// # Errors
    ///
    /// * [`FusionError::InvalidRadius`] if `radius_km` is not a positive
    ///   finite number.
    /// * [`FusionError::InsufficientData`] if no pollutant resolves into a
    ///   sub-index.
    /// * [`FusionError::Aqi`] if a resolved concentration is rejected by the
    ///   configured negative policy.
    pub fn synthesize(
        &self,
        readings: &ReadingsByPollutant,
        radius_km: f64,
    ) -> Result<FusionOutcome> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(FusionError::InvalidRadius(radius_km));
        }

        let mut meta = FusionMetaBuilder::new();
        let mut radius = radius_km;
        let mut expansions = 0;
        let mut resolutions = self.resolve_all(readings, radius, &mut meta);

        if let Some(expansion) = self.config.expansion {
            while expansions < expansion.max_expansions
                && !resolutions.values().any(Resolution::is_weighted)
            {
                let Some(next) = expansion.next_radius(radius) else {
                    break;
                };
                debug!(
                    from_km = radius,
                    to_km = next,
                    "no ground stations in reach, widening radius"
                );
                radius = next;
                expansions += 1;
                resolutions = self.resolve_all(readings, radius, &mut meta);
            }
        }

        let mut pollutants = PollutantLevels::default();
        let mut subindices = BTreeMap::new();
        let mut timestamp: Option<DateTime<Utc>> = None;

        for (&pollutant, resolution) in &resolutions {
            let Some(concentration) = resolution.concentration() else {
                continue;
            };
            pollutants.insert(pollutant, concentration);
            timestamp = timestamp.max(resolution.observed_at());

            if !pollutant.has_breakpoints() {
                debug!(%pollutant, concentration, "reported without a sub-index");
                continue;
            }
            let value =
                compute_sub_index_with(pollutant, concentration, self.config.negative_policy)?;
            subindices.insert(pollutant, value);
        }

        // BTreeMap iterates in priority order, so keeping only strictly
        // greater values resolves ties in favour of the earlier pollutant
        let (dominant, value) = subindices
            .iter()
            .fold(None, |best: Option<(Pollutant, u32)>, (&p, &v)| match best {
                Some((_, best_value)) if best_value >= v => best,
                _ => Some((p, v)),
            })
            .ok_or(FusionError::InsufficientData)?;

        let category = Category::from_aqi(value);
        debug!(aqi = value, %dominant, %category, attempts = meta.attempts(), "synthesized AQI");

        Ok(FusionOutcome {
            location: None,
            timestamp,
            pollutants,
            aqi: AqiSummary {
                value,
                dominant: Some(dominant),
                category,
                subindices,
            },
            fusion: meta.finish(radius, self.config.weighting_label()),
        })
    }

    fn resolve_all(
        &self,
        readings: &ReadingsByPollutant,
        radius_km: f64,
        meta: &mut FusionMetaBuilder,
    ) -> BTreeMap<Pollutant, Resolution> {
        readings
            .iter()
            .map(|(&pollutant, group)| {
                let resolution = self.resolve(pollutant, group, radius_km);
                meta.record(pollutant, &resolution);
                (pollutant, resolution)
            })
            .collect()
    }
}

/// [`FusionEngine::synthesize`] with the default config.
pub fn synthesize(readings: &ReadingsByPollutant, radius_km: f64) -> Result<FusionOutcome> {
    FusionEngine::default().synthesize(readings, radius_km)
}

/// Fuses a flat reading set into one AQI with the default config.
///
/// # Examples
///
/// ```
/// use aqi::{Category, Pollutant};
/// use aqi_fusion::{synthesize_air_quality, PollutantReading};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let readings = vec![
///     PollutantReading::ground(Pollutant::Pm25, 12.3, "station-1", 0.0, now),
///     PollutantReading::satellite(Pollutant::No2, 30.0, now),
/// ];
///
/// let outcome = synthesize_air_quality(readings, 10.0).unwrap();
/// assert_eq!(outcome.aqi.value, 51);
/// assert_eq!(outcome.aqi.dominant, Some(Pollutant::Pm25));
/// assert_eq!(outcome.aqi.category, Category::Moderate);
/// ```
pub fn synthesize_air_quality<I>(readings: I, radius_km: f64) -> Result<FusionOutcome>
where
    I: IntoIterator<Item = PollutantReading>,
{
    FusionEngine::default().synthesize_air_quality(readings, radius_km)
}
