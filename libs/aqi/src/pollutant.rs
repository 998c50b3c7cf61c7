//! Pollutant identifiers
//!
//! The declaration order of [`Pollutant`] doubles as the priority used to
//! break ties between equal sub-indices: particulates first, then ozone,
//! then nitrogen dioxide, then everything else.

use core::fmt;

/// Pollutants reported by ground stations and satellite products.
///
/// Particulates are measured in µg/m³, gases in ppb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Pollutant {
    Pm25,
    O3,
    No2,
    Pm10,
    So2,
    Co,
    Hcho,
}

impl Pollutant {
    /// Every pollutant, in tie-break priority order.
    pub const ALL: [Pollutant; 7] = [
        Pollutant::Pm25,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::Hcho,
    ];

    /// Short key used in JSON payloads (`pm25`, `o3`, ...).
    pub const fn key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::Pm10 => "pm10",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
            Pollutant::Hcho => "hcho",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::Hcho => "HCHO",
        }
    }

    /// Concentration unit the breakpoint tables expect.
    pub const fn unit(self) -> &'static str {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 => "µg/m³",
            _ => "ppb",
        }
    }

    /// Looks a pollutant up by its JSON key or its label.
    ///
    /// ```
    /// use aqi::Pollutant;
    ///
    /// assert_eq!(Pollutant::from_key("pm25"), Some(Pollutant::Pm25));
    /// assert_eq!(Pollutant::from_key("PM2.5"), Some(Pollutant::Pm25));
    /// assert_eq!(Pollutant::from_key("radon"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Pollutant> {
        Pollutant::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(key) || p.label().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Pollutant::Pm25 < Pollutant::O3);
        assert!(Pollutant::O3 < Pollutant::No2);
        assert!(Pollutant::No2 < Pollutant::Pm10);
        assert!(Pollutant::Co < Pollutant::Hcho);
    }

    #[test]
    fn test_keys_round_trip() {
        for p in Pollutant::ALL {
            assert_eq!(Pollutant::from_key(p.key()), Some(p));
            assert_eq!(Pollutant::from_key(p.label()), Some(p));
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(Pollutant::Pm25.unit(), "µg/m³");
        assert_eq!(Pollutant::Pm10.unit(), "µg/m³");
        assert_eq!(Pollutant::Co.unit(), "ppb");
        assert_eq!(Pollutant::No2.unit(), "ppb");
    }
}
