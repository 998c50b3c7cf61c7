//! AQI library
//!
//! This library provides supporting functionality for AQI calculations and
//! translations to EPA specified AQI categories and color ranges. It holds
//! the breakpoint tables for every indexed pollutant and converts a single
//! concentration into its sub-index. It supports both std and no_std
//! environments, but is best used on systems with hardware floating point
//! support.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

mod breakpoints;
mod pollutant;

pub use breakpoints::{tiers_for, BreakpointTier};
pub use pollutant::Pollutant;

/// Errors raised while computing a sub-index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AqiError {
    /// No breakpoint table is configured for the pollutant.
    UnknownPollutant(Pollutant),
    /// The concentration is not finite, or negative under
    /// [`NegativePolicy::Strict`].
    InvalidConcentration(f64),
}

impl fmt::Display for AqiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AqiError::UnknownPollutant(p) => write!(f, "no breakpoint table for {}", p),
            AqiError::InvalidConcentration(c) => write!(f, "invalid concentration: {}", c),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AqiError {}

/// How negative concentrations (sensor noise) are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NegativePolicy {
    /// Treat the concentration as 0.
    #[default]
    Clamp,
    /// Fail with [`AqiError::InvalidConcentration`].
    Strict,
}

/// EPA AQI category bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Good,
    Moderate,
    #[cfg_attr(feature = "serde", serde(rename = "Unhealthy for Sensitive Groups"))]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[cfg_attr(feature = "serde", serde(rename = "Very Unhealthy"))]
    VeryUnhealthy,
    Hazardous,
}

impl Category {
    /// Maps an AQI value onto its band.
    ///
    /// ```
    /// use aqi::Category;
    ///
    /// assert_eq!(Category::from_aqi(50), Category::Good);
    /// assert_eq!(Category::from_aqi(51), Category::Moderate);
    /// assert_eq!(Category::from_aqi(812), Category::Hazardous);
    /// ```
    pub fn from_aqi(aqi: u32) -> Category {
        match aqi {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthyForSensitiveGroups,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Category::Good => Color::Green,
            Category::Moderate => Color::Yellow,
            Category::UnhealthyForSensitiveGroups => Color::Orange,
            Category::Unhealthy => Color::Red,
            Category::VeryUnhealthy => Color::Purple,
            Category::Hazardous => Color::Maroon,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Color enum provides colors corresponding to EPA AQI levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

impl Color {
    /// Official AirNow RGB value for the color.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Green => (0, 228, 0),
            Color::Yellow => (255, 255, 0),
            Color::Orange => (255, 126, 0),
            Color::Red => (255, 0, 0),
            Color::Purple => (143, 63, 151),
            Color::Maroon => (126, 0, 35),
        }
    }
}

/// Provides a Color enum variant value based on the
/// specified AQI value. Uses the ranges provided by the
/// EPA for mapping AQI to color.
///
/// # Examples
///
/// ```
/// use aqi::{get_aqi_color, Color};
///
/// assert_eq!(get_aqi_color(42), Color::Green);
/// assert_eq!(get_aqi_color(175), Color::Red);
/// ```
pub fn get_aqi_color(aqi: u32) -> Color {
    Category::from_aqi(aqi).color()
}

/// The sub-index of one pollutant together with the concentration it was
/// computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubIndexResult {
    pub pollutant: Pollutant,
    pub value: u32,
    pub source_concentration: f64,
}

/// Calculate the sub-index for `concentration` of `pollutant`, clamping
/// negative concentrations to 0.
///
/// # Arguments
///
/// * `pollutant` - Pollutant the concentration was measured for
/// * `concentration` - Concentration in the unit given by [`Pollutant::unit`]
///
/// # Returns
///
/// The sub-index, calculated using breakpoints and a formula provided
/// by the EPA. These values may be confirmed using the calculator at
/// https://www.airnow.gov/aqi/aqi-calculator-concentration/
///
/// # Examples
///
/// ```
/// use aqi::{compute_sub_index, Pollutant};
///
/// assert_eq!(compute_sub_index(Pollutant::Pm25, 45.0), Ok(124));
/// assert_eq!(compute_sub_index(Pollutant::Pm25, 6.0), Ok(25));
/// assert_eq!(compute_sub_index(Pollutant::Pm25, -3.0), Ok(0));
/// ```
pub fn compute_sub_index(pollutant: Pollutant, concentration: f64) -> Result<u32, AqiError> {
    compute_sub_index_with(pollutant, concentration, NegativePolicy::Clamp)
}

/// Calculate the sub-index with an explicit [`NegativePolicy`].
///
/// The tier is the first one whose upper concentration bound is at or
/// above `concentration`, so a value exactly on `c_high` stays in that
/// tier. Values in the gap below the next tier's `c_low` take that tier's
/// `i_low`. Values above the last tier extrapolate along its slope and
/// are not capped at 500.
pub fn compute_sub_index_with(
    pollutant: Pollutant,
    concentration: f64,
    policy: NegativePolicy,
) -> Result<u32, AqiError> {
    let tiers = tiers_for(pollutant)?;

    if !concentration.is_finite() {
        return Err(AqiError::InvalidConcentration(concentration));
    }
    let concentration = if concentration < 0.0 {
        match policy {
            NegativePolicy::Clamp => 0.0,
            NegativePolicy::Strict => return Err(AqiError::InvalidConcentration(concentration)),
        }
    } else {
        concentration
    };

    let index = match tiers.iter().find(|t| concentration <= t.c_high) {
        Some(tier) if tier.contains(concentration) => tier.interpolate(concentration),
        // gap below this tier's c_low
        Some(tier) => tier.i_low as f64,
        None => tiers
            .last()
            .ok_or(AqiError::UnknownPollutant(pollutant))?
            .interpolate(concentration),
    };

    Ok(libm::round(index) as u32)
}

/// Like [`compute_sub_index_with`], keeping the pollutant and concentration
/// alongside the value.
pub fn sub_index(
    pollutant: Pollutant,
    concentration: f64,
    policy: NegativePolicy,
) -> Result<SubIndexResult, AqiError> {
    let value = compute_sub_index_with(pollutant, concentration, policy)?;
    Ok(SubIndexResult {
        pollutant,
        value,
        source_concentration: concentration,
    })
}
