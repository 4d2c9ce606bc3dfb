//! Location models: coordinates, quantized cache keys and place names

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
///
/// Immutable once resolved for a lookup; a fresh pair is produced per
/// refresh cycle and replaced wholesale, never mutated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format coordinates as a short display string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Quantize to a cache key
    ///
    /// Coordinates are rounded to four decimal places and scaled to
    /// integers so float noise from different resolution paths cannot
    /// split cache entries for the same place.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            lat_e4: (self.latitude * 10_000.0).round() as i64,
            lon_e4: (self.longitude * 10_000.0).round() as i64,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Cache identity for a coordinate pair
///
/// The requested unit system would conceptually belong in this key as
/// well, but the provider is always queried in imperial units and
/// conversions happen locally, so the coordinate pair is sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
}

/// Human-readable place name from reverse geocoding
///
/// Cosmetic only: "Unknown" is a valid terminal value, not an error,
/// and must never block a refresh cycle.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlaceName {
    /// City or locality name
    pub city: String,
    /// State / region code, when the provider reports one
    pub region: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
}

impl PlaceName {
    /// Create a place name
    #[must_use]
    pub fn new(city: String, region: Option<String>, country: String) -> Self {
        Self {
            city,
            region,
            country,
        }
    }

    /// Placeholder value for failed or empty reverse lookups
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            city: "Unknown".to_string(),
            region: None,
            country: String::new(),
        }
    }

    /// Whether this is the placeholder value
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.city == "Unknown" && self.region.is_none() && self.country.is_empty()
    }
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.region {
            Some(region) if !region.is_empty() => write!(f, "{}, {}", self.city, region),
            _ => write!(f, "{}", self.city),
        }
    }
}
