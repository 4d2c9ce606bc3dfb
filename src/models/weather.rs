//! Weather snapshot models and display helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display unit for temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Imperial display (the canonical unit queried from the provider)
    #[default]
    Fahrenheit,
    /// Metric display, converted locally
    Celsius,
}

impl UnitSystem {
    /// The other unit
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Fahrenheit => UnitSystem::Celsius,
            UnitSystem::Celsius => UnitSystem::Fahrenheit,
        }
    }

    /// Display symbol, e.g. "°F"
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            UnitSystem::Fahrenheit => "°F",
            UnitSystem::Celsius => "°C",
        }
    }
}

/// A temperature reading with both display units precomputed
///
/// The provider is always queried in imperial units; the Celsius value
/// is derived locally at construction time and cached alongside the
/// canonical reading, so toggling display units never triggers a
/// re-fetch or a re-conversion.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Temperature {
    fahrenheit: f64,
    celsius: f64,
}

impl Temperature {
    /// Build from the canonical imperial reading
    #[must_use]
    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Self {
            fahrenheit,
            celsius: (fahrenheit - 32.0) * 5.0 / 9.0,
        }
    }

    /// Raw value in the requested unit
    #[must_use]
    pub fn in_unit(&self, unit: UnitSystem) -> f64 {
        match unit {
            UnitSystem::Fahrenheit => self.fahrenheit,
            UnitSystem::Celsius => self.celsius,
        }
    }

    /// Rounded value in the requested unit, as shown on the dashboard
    #[must_use]
    pub fn rounded(&self, unit: UnitSystem) -> i64 {
        self.in_unit(unit).round() as i64
    }
}

/// Current conditions for one observation instant
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentConditions {
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
    /// Air temperature
    pub temperature: Temperature,
    /// Apparent temperature
    pub feels_like: Temperature,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Wind gust speed in mph, when reported
    pub wind_gust: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: u16,
    /// UV index
    pub uv_index: f64,
    /// Visibility in meters
    pub visibility: u32,
    /// Dew point
    pub dew_point: Temperature,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// Precipitation rate in mm/h (rain or snow), when falling
    pub precipitation_rate: Option<f64>,
    /// Sunrise instant
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset instant
    pub sunset: Option<DateTime<Utc>>,
    /// Provider icon code, e.g. "10d"
    pub icon: String,
    /// Human-readable description of conditions
    pub description: String,
    /// Condition group name, e.g. "Rain"
    pub group: String,
}

impl CurrentConditions {
    /// Daylight length, when both solar events are known
    #[must_use]
    pub fn day_length(&self) -> Option<chrono::Duration> {
        match (self.sunrise, self.sunset) {
            (Some(rise), Some(set)) if set > rise => Some(set - rise),
            _ => None,
        }
    }
}

/// Hourly forecast entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HourPoint {
    /// Forecast instant
    pub time: DateTime<Utc>,
    /// Forecast temperature
    pub temperature: Temperature,
    /// Provider icon code
    pub icon: String,
    /// Condition group name
    pub group: String,
}

/// Daily forecast entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DayPoint {
    /// Forecast day (midday instant from the provider)
    pub date: DateTime<Utc>,
    /// Daily high
    pub high: Temperature,
    /// Daily low
    pub low: Temperature,
    /// Human-readable description
    pub description: String,
    /// Provider icon code
    pub icon: String,
    /// Precipitation probability percentage (0-100)
    pub precipitation_chance: u8,
    /// Sunrise instant
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset instant
    pub sunset: Option<DateTime<Utc>>,
    /// Moonrise instant
    pub moonrise: Option<DateTime<Utc>>,
    /// Moonset instant
    pub moonset: Option<DateTime<Utc>>,
    /// Moon phase in [0, 1], 0/1 = new moon, 0.5 = full moon
    pub moon_phase: Option<f64>,
}

/// Active weather alert
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Alert {
    /// Alert event name, e.g. "Wind Advisory"
    pub event: String,
    /// Long-form description
    pub description: String,
    /// Alert start instant
    pub start: DateTime<Utc>,
    /// Alert end instant
    pub end: Option<DateTime<Utc>>,
    /// Issuing authority
    pub sender: Option<String>,
}

/// Complete forecast bundle for one coordinate pair
///
/// Immutable once fetched; a refresh replaces the whole snapshot, it is
/// never partially merged with an older one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSnapshot {
    /// Current conditions
    pub current: CurrentConditions,
    /// Hourly points, chronological and forward-looking
    pub hourly: Vec<HourPoint>,
    /// Daily points, chronological
    pub daily: Vec<DayPoint>,
    /// Active alerts, possibly empty
    pub alerts: Vec<Alert>,
    /// When this snapshot was retrieved
    pub fetched_at: DateTime<Utc>,
}

/// Convert wind direction in degrees to a 16-point compass label
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = ((f64::from(degrees) / 22.5).round() as usize) % 16;
    DIRECTIONS[index]
}

/// Name a lunar phase fraction in [0, 1]
#[must_use]
pub fn moon_phase_name(phase: f64) -> &'static str {
    if phase <= 0.0 || phase >= 1.0 {
        "New Moon"
    } else if phase < 0.25 {
        "Waxing Crescent"
    } else if phase == 0.25 {
        "First Quarter"
    } else if phase < 0.5 {
        "Waxing Gibbous"
    } else if phase == 0.5 {
        "Full Moon"
    } else if phase < 0.75 {
        "Waning Gibbous"
    } else if phase == 0.75 {
        "Last Quarter"
    } else {
        "Waning Crescent"
    }
}

/// Format a duration as "Xh Ym"
#[must_use]
pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_temperature_conversion_is_cached_locally() {
        let temp = Temperature::from_fahrenheit(72.0);
        assert_eq!(temp.rounded(UnitSystem::Fahrenheit), 72);
        assert_eq!(temp.rounded(UnitSystem::Celsius), 22);
    }

    #[test]
    fn test_temperature_freezing_point() {
        let temp = Temperature::from_fahrenheit(32.0);
        assert_eq!(temp.rounded(UnitSystem::Celsius), 0);
    }

    #[test]
    fn test_unit_toggle_round_trips() {
        let unit = UnitSystem::Fahrenheit;
        assert_eq!(unit.toggled(), UnitSystem::Celsius);
        assert_eq!(unit.toggled().toggled(), UnitSystem::Fahrenheit);
        assert_eq!(UnitSystem::Celsius.symbol(), "°C");
    }

    #[test]
    fn test_wind_direction_to_cardinal() {
        assert_eq!(wind_direction_to_cardinal(0), "N");
        assert_eq!(wind_direction_to_cardinal(90), "E");
        assert_eq!(wind_direction_to_cardinal(180), "S");
        assert_eq!(wind_direction_to_cardinal(270), "W");
        assert_eq!(wind_direction_to_cardinal(202), "SSW");
        assert_eq!(wind_direction_to_cardinal(360), "N");
    }

    #[test]
    fn test_moon_phase_names() {
        assert_eq!(moon_phase_name(0.0), "New Moon");
        assert_eq!(moon_phase_name(0.1), "Waxing Crescent");
        assert_eq!(moon_phase_name(0.25), "First Quarter");
        assert_eq!(moon_phase_name(0.5), "Full Moon");
        assert_eq!(moon_phase_name(0.75), "Last Quarter");
        assert_eq!(moon_phase_name(0.9), "Waning Crescent");
        assert_eq!(moon_phase_name(1.0), "New Moon");
    }

    #[test]
    fn test_day_length() {
        let rise = Utc.with_ymd_and_hms(2026, 6, 21, 5, 11, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2026, 6, 21, 21, 10, 0).unwrap();
        let current = CurrentConditions {
            observed_at: rise,
            temperature: Temperature::from_fahrenheit(70.0),
            feels_like: Temperature::from_fahrenheit(70.0),
            humidity: 50,
            pressure: 1013,
            wind_speed: 5.0,
            wind_gust: None,
            wind_direction: 180,
            uv_index: 4.0,
            visibility: 10_000,
            dew_point: Temperature::from_fahrenheit(50.0),
            cloud_cover: 10,
            precipitation_rate: None,
            sunrise: Some(rise),
            sunset: Some(set),
            icon: "01d".to_string(),
            description: "clear sky".to_string(),
            group: "Clear".to_string(),
        };

        let length = current.day_length().expect("both solar events known");
        assert_eq!(format_duration(length), "15h 59m");
    }
}
