//! Location resolution
//!
//! Turns a parsed search query (place name, 5-digit postal code, or
//! ambient network location) into a coordinate pair, and coordinates
//! back into a human-readable place name.

use crate::api::{LocationQuery, WeatherApiClient};
use crate::error::SkycastError;
use crate::models::{Coordinates, PlaceName};
use tracing::{debug, warn};

/// Service for resolving location queries
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a query into coordinates
    ///
    /// Failure reasons are deliberately distinct: an unknown zip code,
    /// an unknown city, and an unreachable geocoder each surface their
    /// own message and must not be collapsed by callers.
    pub async fn resolve(
        client: &WeatherApiClient,
        fallback: Coordinates,
        query: LocationQuery,
    ) -> crate::Result<Coordinates> {
        debug!("Resolving location query: {:?}", query);

        let coords = match query {
            LocationQuery::Ambient => Self::resolve_ambient(client, fallback).await,
            LocationQuery::PostalCode(zip) => client.geocode_zip(&zip).await?.coordinates,
            LocationQuery::Name(name) => Self::resolve_name(client, &name).await?,
        };

        debug!("Resolved to {}", coords);
        Ok(coords)
    }

    /// Resolve a place name via geocoding, selecting the first
    /// (highest-confidence) match
    async fn resolve_name(client: &WeatherApiClient, name: &str) -> crate::Result<Coordinates> {
        let matches = client.geocode_city(name).await?;

        match matches.into_iter().next() {
            Some(best) => Ok(best.coordinates),
            None => Err(SkycastError::not_found(
                "City not found. Please try again.",
            )),
        }
    }

    /// Resolve the ambient network location, falling back to the
    /// configured coordinates when the endpoint cannot be reached
    async fn resolve_ambient(client: &WeatherApiClient, fallback: Coordinates) -> Coordinates {
        match client.ambient_location().await {
            Ok(coords) => coords,
            Err(e) => {
                warn!("Ambient geolocation failed ({}), using fallback location", e);
                fallback
            }
        }
    }

    /// Reverse geocode coordinates into a place name
    ///
    /// Tolerant by contract: the name is cosmetic, so every failure
    /// path substitutes the "Unknown" placeholder instead of blocking
    /// the rest of the refresh cycle.
    pub async fn reverse_name(client: &WeatherApiClient, coords: Coordinates) -> PlaceName {
        match client.reverse_geocode(coords).await {
            Ok(matches) => match matches.into_iter().next() {
                Some(best) => best.place_name(),
                None => {
                    debug!("No reverse geocoding results for {}", coords);
                    PlaceName::unknown()
                }
            },
            Err(e) => {
                debug!("Reverse geocoding failed for {}: {}", coords, e);
                PlaceName::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkycastConfig;

    fn unreachable_client() -> WeatherApiClient {
        let mut config = SkycastConfig::default();
        config.provider.api_key = Some("test-api-key".to_string());
        // Nothing listens on port 1; requests fail fast.
        config.provider.api_base_url = "http://127.0.0.1:1".to_string();
        config.provider.geolocate_url = "http://127.0.0.1:1/json".to_string();
        WeatherApiClient::new(config).expect("client builds")
    }

    #[tokio::test]
    async fn test_ambient_failure_uses_configured_fallback() {
        let client = unreachable_client();
        let fallback = Coordinates::new(47.2529, -122.4443);

        let coords = LocationResolver::resolve(&client, fallback, LocationQuery::Ambient)
            .await
            .expect("ambient resolution degrades, never fails");
        assert_eq!(coords, fallback);
    }

    #[tokio::test]
    async fn test_unreachable_geocoder_surfaces_error() {
        let client = unreachable_client();
        let fallback = Coordinates::new(0.0, 0.0);

        let err = LocationResolver::resolve(
            &client,
            fallback,
            LocationQuery::Name("Seattle".to_string()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SkycastError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn test_reverse_name_never_fails() {
        let client = unreachable_client();
        let place =
            LocationResolver::reverse_name(&client, Coordinates::new(47.6062, -122.3321)).await;
        assert!(place.is_unknown());
    }
}
