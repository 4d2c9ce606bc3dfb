//! Air-quality models: AQI ordinal and pollutant concentrations

use crate::error::SkycastError;
use serde::{Deserialize, Serialize};

/// Air Quality Index level, ordinal 1 (best) to 5 (worst)
///
/// The upstream provider reports this as a bare integer. The mapping to
/// labels is explicit and validated here; out-of-range ordinals take the
/// `InvalidResponse` path instead of relying on array-bounds behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    /// Parse the provider's 1-based ordinal
    pub fn from_ordinal(ordinal: i64) -> Result<Self, SkycastError> {
        match ordinal {
            1 => Ok(Self::Good),
            2 => Ok(Self::Fair),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::Poor),
            5 => Ok(Self::VeryPoor),
            other => Err(SkycastError::invalid_response(format!(
                "AQI ordinal out of range 1-5: {other}"
            ))),
        }
    }

    /// The 1-based ordinal as reported by the provider
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Fair => 2,
            Self::Moderate => 3,
            Self::Poor => 4,
            Self::VeryPoor => 5,
        }
    }

    /// Short tier label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// Display color for the tier
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "#00e400",
            Self::Fair => "#ffff00",
            Self::Moderate => "#ff7e00",
            Self::Poor => "#ff0000",
            Self::VeryPoor => "#8f3f97",
        }
    }

    /// One-line health advice for the tier
    #[must_use]
    pub fn health_summary(self) -> &'static str {
        match self {
            Self::Good => "Local air quality is: Excellent. Breathe deep!",
            Self::Fair => "Local air quality is: Good. Enjoy the outdoors!",
            Self::Moderate => "Local air quality is: Moderate. Sensitive groups take caution.",
            Self::Poor => "Local air quality is: Poor. Limit outdoor activity.",
            Self::VeryPoor => "Local air quality is: Unhealthy. Stay indoors if possible.",
        }
    }
}

/// Pollutants tracked on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    No2,
    O3,
    Co,
    So2,
}

impl Pollutant {
    /// All tracked pollutants
    #[must_use]
    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Pm2_5,
            Pollutant::Pm10,
            Pollutant::No2,
            Pollutant::O3,
            Pollutant::Co,
            Pollutant::So2,
        ]
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pm2_5 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::No2 => "NO₂",
            Self::O3 => "O₃",
            Self::Co => "CO",
            Self::So2 => "SO₂",
        }
    }

    /// Severity thresholds in µg/m³, from best to worst band
    #[must_use]
    pub fn thresholds(self) -> [f64; 4] {
        match self {
            Self::Pm2_5 => [12.0, 35.0, 55.0, 150.0],
            Self::Pm10 => [54.0, 154.0, 254.0, 354.0],
            Self::No2 => [53.0, 100.0, 360.0, 649.0],
            Self::O3 => [70.0, 120.0, 180.0, 240.0],
            Self::Co => [4.4, 9.4, 12.4, 15.4],
            Self::So2 => [35.0, 75.0, 185.0, 304.0],
        }
    }

    /// Severity color for a concentration of this pollutant
    #[must_use]
    pub fn severity_color(self, concentration: f64) -> &'static str {
        const COLORS: [&str; 5] = ["#00e400", "#ffff00", "#ff7e00", "#ff0000", "#99004c"];
        let thresholds = self.thresholds();
        let band = thresholds
            .iter()
            .position(|limit| concentration <= *limit)
            .unwrap_or(4);
        COLORS[band]
    }
}

/// Raw pollutant concentrations in µg/m³
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct PollutantConcentrations {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
}

impl PollutantConcentrations {
    /// Concentration for one pollutant
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
        }
    }

    /// The pollutant with the highest concentration
    #[must_use]
    pub fn worst(&self) -> (Pollutant, f64) {
        let mut worst = (Pollutant::Pm2_5, self.pm2_5);
        for pollutant in Pollutant::all() {
            let value = self.get(*pollutant);
            if value > worst.1 {
                worst = (*pollutant, value);
            }
        }
        worst
    }
}

/// Air-quality reading for one coordinate pair
///
/// `level` is `None` when the provider reported an out-of-range ordinal;
/// the label is cosmetic, so the refresh degrades instead of aborting.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct AirQuality {
    /// Validated AQI tier
    pub level: Option<AqiLevel>,
    /// Raw pollutant concentrations
    pub components: PollutantConcentrations,
}

impl AirQuality {
    /// Tier label, substituting a safe default for invalid upstream data
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.level {
            Some(level) => level.label(),
            None => "Unavailable",
        }
    }

    /// Health advice line, substituting a safe default for invalid data
    #[must_use]
    pub fn health_summary(&self) -> &'static str {
        match self.level {
            Some(level) => level.health_summary(),
            None => "Air quality info unavailable.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, AqiLevel::Good)]
    #[case(2, AqiLevel::Fair)]
    #[case(3, AqiLevel::Moderate)]
    #[case(4, AqiLevel::Poor)]
    #[case(5, AqiLevel::VeryPoor)]
    fn test_aqi_from_ordinal(#[case] ordinal: i64, #[case] expected: AqiLevel) {
        assert_eq!(AqiLevel::from_ordinal(ordinal).unwrap(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn test_aqi_out_of_range_is_invalid_response(#[case] ordinal: i64) {
        let err = AqiLevel::from_ordinal(ordinal).unwrap_err();
        assert!(matches!(err, SkycastError::InvalidResponse { .. }));
    }

    #[test]
    fn test_moderate_tier_display() {
        let level = AqiLevel::Moderate;
        assert_eq!(level.ordinal(), 3);
        assert_eq!(level.label(), "Moderate");
        assert_eq!(level.color(), "#ff7e00");
        assert!(level.health_summary().contains("Moderate"));
    }

    #[test]
    fn test_worst_pollutant_picks_highest_concentration() {
        let components = PollutantConcentrations {
            pm2_5: 40.0,
            pm10: 20.0,
            no2: 10.0,
            o3: 5.0,
            co: 1.0,
            so2: 1.0,
        };
        let (pollutant, value) = components.worst();
        assert_eq!(pollutant, Pollutant::Pm2_5);
        assert_eq!(value, 40.0);
        assert_eq!(pollutant.label(), "PM2.5");
    }

    #[test]
    fn test_severity_color_bands() {
        assert_eq!(Pollutant::Pm2_5.severity_color(10.0), "#00e400");
        assert_eq!(Pollutant::Pm2_5.severity_color(40.0), "#ff7e00");
        assert_eq!(Pollutant::Pm2_5.severity_color(200.0), "#99004c");
    }

    #[test]
    fn test_invalid_level_degrades_to_placeholder() {
        let air = AirQuality {
            level: None,
            components: PollutantConcentrations::default(),
        };
        assert_eq!(air.label(), "Unavailable");
        assert_eq!(air.health_summary(), "Air quality info unavailable.");
    }
}
