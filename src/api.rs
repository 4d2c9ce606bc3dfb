//! Weather API client for OpenWeatherMap integration
//!
//! This module provides HTTP client functionality for retrieving
//! geocoding, forecast and air-pollution data from OpenWeatherMap, plus
//! ambient IP geolocation. Every upstream call is a single attempt with
//! a bounded timeout; a transient failure surfaces immediately as an
//! error and the caller decides whether to re-trigger.

use crate::config::SkycastConfig;
use crate::error::SkycastError;
use crate::models::{
    AirQuality, Alert, AqiLevel, Coordinates, CurrentConditions, DayPoint, HourPoint, PlaceName,
    Temperature, WeatherSnapshot,
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Weather API client for OpenWeatherMap
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    /// API configuration
    config: SkycastConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: SkycastConfig) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.provider.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> crate::Result<&str> {
        self.config
            .provider
            .api_key
            .as_deref()
            .ok_or_else(|| SkycastError::config("No weather API key configured"))
    }

    /// Geocode a free-text place name
    ///
    /// Returns candidates in provider confidence order; the first match
    /// is the one callers should use.
    #[instrument(skip(self))]
    pub async fn geocode_city(&self, name: &str) -> crate::Result<Vec<GeocodingMatch>> {
        info!("Geocoding city name: '{}'", name);

        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=5&appid={}",
            self.config.provider.api_base_url,
            urlencoding::encode(name),
            self.api_key()?
        );

        let entries: Vec<openweather::GeoDirectEntry> = self.get_json(&url).await?;

        if entries.is_empty() {
            warn!("No geocoding results for '{}'", name);
        } else {
            debug!(
                "Geocoding results: {:?}",
                entries
                    .iter()
                    .map(|e| format!("{} ({:.4}, {:.4})", e.name, e.lat, e.lon))
                    .collect::<Vec<_>>()
            );
        }

        Ok(entries.into_iter().map(GeocodingMatch::from).collect())
    }

    /// Geocode a 5-digit US postal code
    #[instrument(skip(self))]
    pub async fn geocode_zip(&self, zip: &str) -> crate::Result<GeocodingMatch> {
        info!("Geocoding zip code: '{}'", zip);

        let url = format!(
            "{}/geo/1.0/zip?zip={},US&appid={}",
            self.config.provider.api_base_url,
            urlencoding::encode(zip),
            self.api_key()?
        );

        let entry: openweather::GeoZipEntry = self.get_json(&url).await.map_err(|e| match e {
            // The zip endpoint reports unknown codes as HTTP 404.
            SkycastError::NotFound { .. } => {
                SkycastError::not_found("Zipcode not found. Please try again.")
            }
            other => other,
        })?;

        Ok(GeocodingMatch {
            name: entry.name.unwrap_or_else(|| zip.to_string()),
            coordinates: Coordinates::new(entry.lat, entry.lon),
            region: None,
            country: entry.country.unwrap_or_default(),
        })
    }

    /// Reverse geocode coordinates into candidate place names
    #[instrument(skip(self), fields(coords = %coords))]
    pub async fn reverse_geocode(&self, coords: Coordinates) -> crate::Result<Vec<GeocodingMatch>> {
        debug!("Reverse geocoding {}", coords);

        let url = format!(
            "{}/geo/1.0/reverse?lat={}&lon={}&limit=2&appid={}",
            self.config.provider.api_base_url,
            coords.latitude,
            coords.longitude,
            self.api_key()?
        );

        let entries: Vec<openweather::GeoDirectEntry> = self.get_json(&url).await?;
        Ok(entries.into_iter().map(GeocodingMatch::from).collect())
    }

    /// Fetch the forecast bundle for a coordinate pair
    ///
    /// The provider is always queried in imperial units; metric display
    /// values are derived locally.
    #[instrument(skip(self), fields(coords = %coords))]
    pub async fn forecast(&self, coords: Coordinates) -> crate::Result<WeatherSnapshot> {
        info!("Fetching forecast bundle for {}", coords);

        let url = format!(
            "{}/data/3.0/onecall?lat={}&lon={}&units=imperial&appid={}",
            self.config.provider.api_base_url,
            coords.latitude,
            coords.longitude,
            self.api_key()?
        );

        let response: openweather::OneCallResponse = self.get_json(&url).await?;
        let snapshot = WeatherSnapshot::from_one_call(response, Utc::now());

        info!(
            "Forecast bundle: {} hourly points, {} daily points, {} alerts",
            snapshot.hourly.len(),
            snapshot.daily.len(),
            snapshot.alerts.len()
        );

        Ok(snapshot)
    }

    /// Fetch the current air-quality reading for a coordinate pair
    #[instrument(skip(self), fields(coords = %coords))]
    pub async fn air_quality(&self, coords: Coordinates) -> crate::Result<AirQuality> {
        info!("Fetching air quality for {}", coords);

        let url = format!(
            "{}/data/2.5/air_pollution?lat={}&lon={}&appid={}",
            self.config.provider.api_base_url,
            coords.latitude,
            coords.longitude,
            self.api_key()?
        );

        let response: openweather::AirPollutionResponse = self.get_json(&url).await?;
        AirQuality::from_pollution(response)
    }

    /// Resolve the caller's approximate location from its network address
    ///
    /// Returns the coordinate pair reported by the IP geolocation
    /// endpoint; callers fall back to configured coordinates on failure.
    #[instrument(skip(self))]
    pub async fn ambient_location(&self) -> crate::Result<Coordinates> {
        debug!("Requesting ambient IP geolocation");

        let response: openweather::IpLocateResponse =
            self.get_json(&self.config.provider.geolocate_url).await?;

        let coords = parse_coordinate_pair(&response.loc)?;
        info!("Ambient location resolved to {}", coords);
        Ok(coords)
    }

    /// Issue one GET request and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> crate::Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SkycastError::unreachable(format!("Request timed out: {e}"))
            } else {
                SkycastError::unreachable(format!("Network error: {e}"))
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SkycastError::not_found(
                "No results found. Please try again.",
            ));
        }
        if !status.is_success() {
            return Err(SkycastError::unreachable(format!(
                "Request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SkycastError::invalid_response(format!("Failed to decode response: {e}")))
    }
}

/// One geocoding candidate from the provider
#[derive(Debug, Clone)]
pub struct GeocodingMatch {
    /// Location name
    pub name: String,
    /// Resolved coordinates
    pub coordinates: Coordinates,
    /// State / region code, when reported
    pub region: Option<String>,
    /// Country code
    pub country: String,
}

impl GeocodingMatch {
    /// Convert into a display place name
    #[must_use]
    pub fn place_name(&self) -> PlaceName {
        PlaceName::new(self.name.clone(), self.region.clone(), self.country.clone())
    }
}

impl From<openweather::GeoDirectEntry> for GeocodingMatch {
    fn from(entry: openweather::GeoDirectEntry) -> Self {
        Self {
            name: entry.name,
            coordinates: Coordinates::new(entry.lat, entry.lon),
            region: entry.state,
            country: entry.country.unwrap_or_default(),
        }
    }
}

/// Parsed location request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// No query given: infer from the network address
    Ambient,
    /// Exact 5-digit US postal code
    PostalCode(String),
    /// Free-text place name
    Name(String),
}

impl LocationQuery {
    /// Classify a search string
    ///
    /// Empty input fails before any network call. An exact 5-digit
    /// numeric string routes to the postal-code lookup; every other
    /// non-empty string is treated as a place name.
    pub fn parse(input: &str) -> crate::Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(SkycastError::not_found(
                "Please enter a city name or zip code.",
            ));
        }

        if input.len() == 5 && input.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self::PostalCode(input.to_string()));
        }

        Ok(Self::Name(input.to_string()))
    }
}

/// Parse a "lat,lon" pair as reported by the IP geolocation endpoint
fn parse_coordinate_pair(input: &str) -> crate::Result<Coordinates> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();

    if parts.len() != 2 {
        return Err(SkycastError::invalid_response(format!(
            "Coordinates must be in 'lat,lon' format, got: {input}"
        )));
    }

    let lat = parts[0].parse::<f64>().map_err(|_| {
        SkycastError::invalid_response(format!("Invalid latitude: {}", parts[0]))
    })?;
    let lon = parts[1].parse::<f64>().map_err(|_| {
        SkycastError::invalid_response(format!("Invalid longitude: {}", parts[1]))
    })?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(SkycastError::invalid_response(format!(
            "Latitude must be between -90 and 90, got: {lat}"
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(SkycastError::invalid_response(format!(
            "Longitude must be between -180 and 180, got: {lon}"
        )));
    }

    Ok(Coordinates::new(lat, lon))
}

fn utc_from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

// Convert OpenWeatherMap responses into internal models
impl WeatherSnapshot {
    /// Build a snapshot from a One Call response
    fn from_one_call(response: openweather::OneCallResponse, fetched_at: DateTime<Utc>) -> Self {
        let current = CurrentConditions::from_current(response.current);

        let hourly = response
            .hourly
            .into_iter()
            .map(|hour| {
                let condition = openweather::primary_condition(&hour.weather);
                HourPoint {
                    time: utc_from_epoch(hour.dt).unwrap_or(fetched_at),
                    temperature: Temperature::from_fahrenheit(hour.temp),
                    icon: condition.icon,
                    group: condition.main,
                }
            })
            .collect();

        let daily = response
            .daily
            .into_iter()
            .map(|day| {
                let condition = openweather::primary_condition(&day.weather);
                DayPoint {
                    date: utc_from_epoch(day.dt).unwrap_or(fetched_at),
                    high: Temperature::from_fahrenheit(day.temp.max),
                    low: Temperature::from_fahrenheit(day.temp.min),
                    description: condition.description,
                    icon: condition.icon,
                    precipitation_chance: (day.pop.unwrap_or(0.0).clamp(0.0, 1.0) * 100.0).round()
                        as u8,
                    sunrise: day.sunrise.and_then(utc_from_epoch),
                    sunset: day.sunset.and_then(utc_from_epoch),
                    moonrise: day.moonrise.and_then(utc_from_epoch),
                    moonset: day.moonset.and_then(utc_from_epoch),
                    moon_phase: day.moon_phase,
                }
            })
            .collect();

        let alerts = response
            .alerts
            .into_iter()
            .map(|alert| Alert {
                event: alert.event,
                description: alert.description,
                start: utc_from_epoch(alert.start).unwrap_or(fetched_at),
                end: alert.end.and_then(utc_from_epoch),
                sender: alert.sender_name,
            })
            .collect();

        Self {
            current,
            hourly,
            daily,
            alerts,
            fetched_at,
        }
    }
}

impl CurrentConditions {
    fn from_current(current: openweather::CurrentData) -> Self {
        let condition = openweather::primary_condition(&current.weather);

        // Rain takes precedence when both accumulations are reported.
        let precipitation_rate = current
            .rain
            .and_then(|p| p.one_hour)
            .or_else(|| current.snow.and_then(|p| p.one_hour));

        Self {
            observed_at: utc_from_epoch(current.dt).unwrap_or_else(Utc::now),
            temperature: Temperature::from_fahrenheit(current.temp),
            feels_like: Temperature::from_fahrenheit(current.feels_like),
            humidity: current.humidity,
            pressure: current.pressure,
            wind_speed: current.wind_speed,
            wind_gust: current.wind_gust,
            wind_direction: current.wind_deg,
            uv_index: current.uvi,
            visibility: current.visibility,
            dew_point: Temperature::from_fahrenheit(current.dew_point),
            cloud_cover: current.clouds,
            precipitation_rate,
            sunrise: current.sunrise.and_then(utc_from_epoch),
            sunset: current.sunset.and_then(utc_from_epoch),
            icon: condition.icon,
            description: condition.description,
            group: condition.main,
        }
    }
}

impl AirQuality {
    /// Build a reading from an air-pollution response
    ///
    /// The AQI ordinal is cosmetic, so an out-of-range value degrades
    /// to an unavailable label; a response without any reading at all
    /// is malformed and fails the call.
    fn from_pollution(response: openweather::AirPollutionResponse) -> crate::Result<Self> {
        let entry = response.list.into_iter().next().ok_or_else(|| {
            SkycastError::invalid_response("Air pollution response contained no readings")
        })?;

        let level = match AqiLevel::from_ordinal(entry.main.aqi) {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Substituting unavailable AQI label: {}", e);
                None
            }
        };

        Ok(Self {
            level,
            components: entry.components,
        })
    }
}

/// OpenWeatherMap wire types
pub(crate) mod openweather {
    use crate::models::PollutantConcentrations;
    use serde::Deserialize;

    /// One candidate from the direct or reverse geocoding endpoints
    #[derive(Debug, Deserialize)]
    pub struct GeoDirectEntry {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
        pub state: Option<String>,
    }

    /// Response from the zip geocoding endpoint
    #[derive(Debug, Deserialize)]
    pub struct GeoZipEntry {
        pub name: Option<String>,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
    }

    /// One Call forecast bundle
    #[derive(Debug, Deserialize)]
    pub struct OneCallResponse {
        pub current: CurrentData,
        #[serde(default)]
        pub hourly: Vec<HourData>,
        #[serde(default)]
        pub daily: Vec<DayData>,
        #[serde(default)]
        pub alerts: Vec<AlertData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        pub dt: i64,
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
        pub pressure: u32,
        pub wind_speed: f64,
        pub wind_gust: Option<f64>,
        #[serde(default)]
        pub wind_deg: u16,
        #[serde(default)]
        pub uvi: f64,
        #[serde(default)]
        pub visibility: u32,
        pub dew_point: f64,
        #[serde(default)]
        pub clouds: u8,
        pub rain: Option<PrecipitationData>,
        pub snow: Option<PrecipitationData>,
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    /// Accumulated precipitation over the trailing hour, in mm
    #[derive(Debug, Deserialize, Clone, Copy)]
    pub struct PrecipitationData {
        #[serde(rename = "1h")]
        pub one_hour: Option<f64>,
    }

    #[derive(Debug, Deserialize, Clone)]
    pub struct ConditionData {
        pub main: String,
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourData {
        pub dt: i64,
        pub temp: f64,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DayData {
        pub dt: i64,
        pub temp: DayTemperature,
        pub pop: Option<f64>,
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
        pub moonrise: Option<i64>,
        pub moonset: Option<i64>,
        pub moon_phase: Option<f64>,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DayTemperature {
        pub min: f64,
        pub max: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertData {
        pub sender_name: Option<String>,
        pub event: String,
        pub description: String,
        pub start: i64,
        pub end: Option<i64>,
    }

    /// Air pollution response
    #[derive(Debug, Deserialize)]
    pub struct AirPollutionResponse {
        #[serde(default)]
        pub list: Vec<AirEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirEntry {
        pub main: AirMain,
        pub components: PollutantConcentrations,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirMain {
        pub aqi: i64,
    }

    /// Ambient IP geolocation response, `loc` is "lat,lon"
    #[derive(Debug, Deserialize)]
    pub struct IpLocateResponse {
        pub loc: String,
    }

    /// The primary (first) condition entry, with a usable default when
    /// the provider omits the array
    pub fn primary_condition(weather: &[ConditionData]) -> ConditionData {
        weather.first().cloned().unwrap_or(ConditionData {
            main: "Unknown".to_string(),
            description: "Unknown".to_string(),
            icon: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitSystem;

    #[test]
    fn test_query_routing() {
        assert_eq!(
            LocationQuery::parse("98101").unwrap(),
            LocationQuery::PostalCode("98101".to_string())
        );
        assert_eq!(
            LocationQuery::parse("Seattle").unwrap(),
            LocationQuery::Name("Seattle".to_string())
        );
        assert_eq!(
            LocationQuery::parse("  Seattle  ").unwrap(),
            LocationQuery::Name("Seattle".to_string())
        );
    }

    #[test]
    fn test_empty_query_fails_before_any_network_call() {
        let err = LocationQuery::parse("").unwrap_err();
        assert!(matches!(err, SkycastError::NotFound { .. }));

        let err = LocationQuery::parse("   ").unwrap_err();
        assert!(matches!(err, SkycastError::NotFound { .. }));
    }

    #[test]
    fn test_near_zip_strings_route_to_name_lookup() {
        // Only exact 5-digit numeric strings count as postal codes.
        for input in ["9810", "981011", "9810a", "98101-1234"] {
            assert!(matches!(
                LocationQuery::parse(input).unwrap(),
                LocationQuery::Name(_)
            ));
        }
    }

    #[test]
    fn test_parse_coordinate_pair() {
        let coords = parse_coordinate_pair("47.1830439,-122.4716864").unwrap();
        assert!((coords.latitude - 47.183_043_9).abs() < 1e-9);
        assert!((coords.longitude + 122.471_686_4).abs() < 1e-9);
    }

    #[test]
    fn test_parse_coordinate_pair_rejects_garbage() {
        assert!(parse_coordinate_pair("not-coordinates").is_err());
        assert!(parse_coordinate_pair("91.0,0.0").is_err());
        assert!(parse_coordinate_pair("0.0,181.0").is_err());
        assert!(parse_coordinate_pair("1.0").is_err());
    }

    #[test]
    fn test_snapshot_from_one_call() {
        let body = r#"{
            "current": {
                "dt": 1754400000,
                "sunrise": 1754380000,
                "sunset": 1754432000,
                "temp": 72.0,
                "feels_like": 70.5,
                "pressure": 1016,
                "humidity": 55,
                "dew_point": 55.2,
                "uvi": 6.2,
                "clouds": 20,
                "visibility": 10000,
                "wind_speed": 8.5,
                "wind_deg": 200,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "rain": {"1h": 0.4}
            },
            "hourly": [
                {"dt": 1754403600, "temp": 71.0, "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]}
            ],
            "daily": [
                {"dt": 1754420400, "temp": {"min": 58.0, "max": 75.0}, "pop": 0.35,
                 "sunrise": 1754380000, "sunset": 1754432000,
                 "moonrise": 1754410000, "moonset": 1754450000, "moon_phase": 0.5,
                 "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]}
            ],
            "alerts": [
                {"sender_name": "NWS Seattle", "event": "Wind Advisory", "description": "Gusty winds expected.", "start": 1754400000, "end": 1754450000}
            ]
        }"#;

        let response: openweather::OneCallResponse = serde_json::from_str(body).unwrap();
        let snapshot = WeatherSnapshot::from_one_call(response, Utc::now());

        assert_eq!(snapshot.current.temperature.rounded(UnitSystem::Fahrenheit), 72);
        assert_eq!(snapshot.current.temperature.rounded(UnitSystem::Celsius), 22);
        assert_eq!(snapshot.current.icon, "10d");
        assert_eq!(snapshot.current.precipitation_rate, Some(0.4));
        assert_eq!(snapshot.hourly.len(), 1);
        assert_eq!(snapshot.daily.len(), 1);
        assert_eq!(snapshot.daily[0].precipitation_chance, 35);
        assert_eq!(snapshot.alerts.len(), 1);
        assert_eq!(snapshot.alerts[0].event, "Wind Advisory");
    }

    #[test]
    fn test_missing_condition_array_degrades_to_unknown() {
        let body = r#"{
            "current": {
                "dt": 1754400000,
                "temp": 60.0, "feels_like": 60.0, "pressure": 1010, "humidity": 70,
                "dew_point": 50.0, "wind_speed": 3.0
            }
        }"#;

        let response: openweather::OneCallResponse = serde_json::from_str(body).unwrap();
        let snapshot = WeatherSnapshot::from_one_call(response, Utc::now());
        assert_eq!(snapshot.current.group, "Unknown");
        assert!(snapshot.current.icon.is_empty());
    }

    #[test]
    fn test_air_quality_from_pollution() {
        let body = r#"{
            "list": [{
                "main": {"aqi": 3},
                "components": {"co": 1.0, "no": 0.1, "no2": 10.0, "o3": 5.0, "so2": 1.0, "pm2_5": 40.0, "pm10": 20.0, "nh3": 0.2}
            }]
        }"#;

        let response: openweather::AirPollutionResponse = serde_json::from_str(body).unwrap();
        let air = AirQuality::from_pollution(response).unwrap();
        assert_eq!(air.level, Some(AqiLevel::Moderate));
        assert_eq!(air.components.pm2_5, 40.0);
    }

    #[test]
    fn test_air_quality_out_of_range_aqi_degrades() {
        let body = r#"{"list": [{"main": {"aqi": 9}, "components": {"pm2_5": 1.0}}]}"#;
        let response: openweather::AirPollutionResponse = serde_json::from_str(body).unwrap();
        let air = AirQuality::from_pollution(response).unwrap();
        assert_eq!(air.level, None);
        assert_eq!(air.label(), "Unavailable");
    }

    #[test]
    fn test_air_quality_empty_list_is_invalid_response() {
        let body = r#"{"list": []}"#;
        let response: openweather::AirPollutionResponse = serde_json::from_str(body).unwrap();
        let err = AirQuality::from_pollution(response).unwrap_err();
        assert!(matches!(err, SkycastError::InvalidResponse { .. }));
    }
}
