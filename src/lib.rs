//! `skycast` - immersive weather dashboard core
//!
//! This library provides the data pipeline behind a weather dashboard:
//! location resolution (free text, postal code or ambient network
//! location), forecast and air-quality retrieval, a session-lived TTL
//! result cache, and the mapping from provider condition codes to the
//! visual scene state the presentation layer applies.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod presenter;
pub mod scene;

// Re-export core types for public API
pub use api::{GeocodingMatch, LocationQuery, WeatherApiClient};
pub use app::{DashboardState, RefreshOutcome, SearchDebouncer, WeatherApp, WeatherBundle};
pub use cache::ResultCache;
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use location_resolver::LocationResolver;
pub use models::{AirQuality, AqiLevel, Coordinates, PlaceName, UnitSystem, WeatherSnapshot};
pub use scene::{IconCode, LightningSchedule, VisualState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
