//! Data models for the skycast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates, cache keys and place names
//! - Weather: Forecast snapshot, temperatures and measurements
//! - Air: Air-quality index and pollutant concentrations

pub mod air;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use air::{AirQuality, AqiLevel, Pollutant, PollutantConcentrations};
pub use location::{CacheKey, Coordinates, PlaceName};
pub use weather::{
    Alert, CurrentConditions, DayPoint, HourPoint, Temperature, UnitSystem, WeatherSnapshot,
    format_duration, moon_phase_name, wind_direction_to_cardinal,
};
