//! Breakpoint tables
//!
//! One table per pollutant, following the EPA technical assistance document:
//! https://document.airnow.gov/
//! technical-assistance-document-for-the-reporting-of-daily-air-quailty.pdf
//!
//! Published tables leave small concentration gaps between tiers (for
//! example PM2.5 12.0 -> 12.1). The calculator assigns a gap value to the
//! upper tier.

use crate::{AqiError, Pollutant};

/// A concentration range mapped linearly onto an index range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointTier {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: u16,
    pub i_high: u16,
}

impl BreakpointTier {
    const fn new(c_low: f64, c_high: f64, i_low: u16, i_high: u16) -> Self {
        Self {
            c_low,
            c_high,
            i_low,
            i_high,
        }
    }

    /// Slope of the tier in index points per concentration unit.
    pub fn slope(&self) -> f64 {
        (self.i_high - self.i_low) as f64 / (self.c_high - self.c_low)
    }

    /// Linear interpolation formula transcribed from EPA documentation
    /// I = ((Ihigh - Ilow) / (Chigh - Clow)) * (C - Clow) + Ilow
    ///
    /// Not clamped to the tier, so values above `c_high` extrapolate.
    pub fn interpolate(&self, concentration: f64) -> f64 {
        self.slope() * (concentration - self.c_low) + self.i_low as f64
    }

    /// Whether `concentration` lies within the tier, bounds included.
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.c_low && concentration <= self.c_high
    }
}

// PM2.5 24-hour, µg/m³
const PM25: [BreakpointTier; 7] = [
    BreakpointTier::new(0.0, 12.0, 0, 50),      // Good
    BreakpointTier::new(12.1, 35.4, 51, 100),   // Moderate
    BreakpointTier::new(35.5, 55.4, 101, 150),  // Unhealthy for Sensitive Groups
    BreakpointTier::new(55.5, 150.4, 151, 200), // Unhealthy
    BreakpointTier::new(150.5, 250.4, 201, 300), // Very Unhealthy
    BreakpointTier::new(250.5, 350.4, 301, 400), // Hazardous
    BreakpointTier::new(350.5, 500.4, 401, 500), // Hazardous
];

// O3 8-hour, ppb. EPA stops the 8-hour table at 200 ppb.
const O3: [BreakpointTier; 5] = [
    BreakpointTier::new(0.0, 54.0, 0, 50),
    BreakpointTier::new(55.0, 70.0, 51, 100),
    BreakpointTier::new(71.0, 85.0, 101, 150),
    BreakpointTier::new(86.0, 105.0, 151, 200),
    BreakpointTier::new(106.0, 200.0, 201, 300),
];

// NO2 1-hour, ppb
const NO2: [BreakpointTier; 5] = [
    BreakpointTier::new(0.0, 53.0, 0, 50),
    BreakpointTier::new(54.0, 100.0, 51, 100),
    BreakpointTier::new(101.0, 360.0, 101, 150),
    BreakpointTier::new(361.0, 649.0, 151, 200),
    BreakpointTier::new(650.0, 1249.0, 201, 300),
];

// PM10 24-hour, µg/m³
const PM10: [BreakpointTier; 7] = [
    BreakpointTier::new(0.0, 54.0, 0, 50),
    BreakpointTier::new(55.0, 154.0, 51, 100),
    BreakpointTier::new(155.0, 254.0, 101, 150),
    BreakpointTier::new(255.0, 354.0, 151, 200),
    BreakpointTier::new(355.0, 424.0, 201, 300),
    BreakpointTier::new(425.0, 504.0, 301, 400),
    BreakpointTier::new(505.0, 604.0, 401, 500),
];

// SO2 1-hour, ppb
const SO2: [BreakpointTier; 7] = [
    BreakpointTier::new(0.0, 35.0, 0, 50),
    BreakpointTier::new(36.0, 75.0, 51, 100),
    BreakpointTier::new(76.0, 185.0, 101, 150),
    BreakpointTier::new(186.0, 304.0, 151, 200),
    BreakpointTier::new(305.0, 604.0, 201, 300),
    BreakpointTier::new(605.0, 804.0, 301, 400),
    BreakpointTier::new(805.0, 1004.0, 401, 500),
];

// CO 8-hour, in ppb so every gas shares one unit (EPA publishes ppm)
const CO: [BreakpointTier; 7] = [
    BreakpointTier::new(0.0, 4400.0, 0, 50),
    BreakpointTier::new(4500.0, 9400.0, 51, 100),
    BreakpointTier::new(9500.0, 12400.0, 101, 150),
    BreakpointTier::new(12500.0, 15400.0, 151, 200),
    BreakpointTier::new(15500.0, 30400.0, 201, 300),
    BreakpointTier::new(30500.0, 40400.0, 301, 400),
    BreakpointTier::new(40500.0, 50400.0, 401, 500),
];

/// Returns the ordered breakpoint tiers for `pollutant`.
///
/// # Returns
///
/// The tiers in ascending concentration order, or
/// [`AqiError::UnknownPollutant`] if the pollutant has no table.
///
/// # Examples
///
/// ```
/// use aqi::{tiers_for, AqiError, Pollutant};
///
/// let tiers = tiers_for(Pollutant::Pm25).unwrap();
/// assert_eq!(tiers[0].c_high, 12.0);
///
/// assert_eq!(
///     tiers_for(Pollutant::Hcho),
///     Err(AqiError::UnknownPollutant(Pollutant::Hcho))
/// );
/// ```
pub fn tiers_for(pollutant: Pollutant) -> Result<&'static [BreakpointTier], AqiError> {
    match pollutant {
        Pollutant::Pm25 => Ok(&PM25),
        Pollutant::O3 => Ok(&O3),
        Pollutant::No2 => Ok(&NO2),
        Pollutant::Pm10 => Ok(&PM10),
        Pollutant::So2 => Ok(&SO2),
        Pollutant::Co => Ok(&CO),
        Pollutant::Hcho => Err(AqiError::UnknownPollutant(pollutant)),
    }
}

impl Pollutant {
    /// Whether a breakpoint table exists, i.e. whether the pollutant can
    /// contribute a sub-index.
    pub fn has_breakpoints(self) -> bool {
        tiers_for(self).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_ordered_and_chained() {
        for pollutant in Pollutant::ALL.into_iter().filter(|p| p.has_breakpoints()) {
            let tiers = tiers_for(pollutant).unwrap();

            assert_eq!(tiers[0].c_low, 0.0, "{} must start at 0", pollutant);
            assert_eq!(tiers[0].i_low, 0, "{} must start at index 0", pollutant);

            for tier in tiers {
                assert!(tier.c_low < tier.c_high, "{}: {:?}", pollutant, tier);
                assert!(tier.i_low < tier.i_high, "{}: {:?}", pollutant, tier);
            }

            for pair in tiers.windows(2) {
                assert!(pair[0].c_high < pair[1].c_low, "{}: overlap", pollutant);
                assert_eq!(pair[0].i_high + 1, pair[1].i_low, "{}: index gap", pollutant);
            }
        }
    }

    #[test]
    fn test_hcho_has_no_table() {
        assert!(!Pollutant::Hcho.has_breakpoints());
        assert!(Pollutant::Pm25.has_breakpoints());
        assert!(Pollutant::Co.has_breakpoints());
    }

    #[test]
    fn test_tier_contains_bounds() {
        let tier = tiers_for(Pollutant::Pm25).unwrap()[1];
        assert!(tier.contains(12.1));
        assert!(tier.contains(35.4));
        assert!(!tier.contains(12.05));
        assert!(!tier.contains(35.45));
    }

    #[test]
    fn test_interpolate_extrapolates() {
        let top = tiers_for(Pollutant::Pm25).unwrap()[6];
        assert_eq!(top.interpolate(top.c_low), 401.0);
        assert!(top.interpolate(top.c_high * 2.0) > 500.0);
    }
}
