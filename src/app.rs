//! Application orchestration: the refresh cycle
//!
//! One refresh cycle covers the forecast bundle, the air-quality bundle
//! and the reverse place name for a single coordinate pair. The
//! UI-visible commit happens only after every upstream call in the
//! cycle has resolved; a failed cycle leaves previously committed data
//! completely untouched. Rapidly triggered cycles are ordered by a
//! monotonically increasing sequence number so a stale response can
//! never overwrite a newer commit.

use crate::api::{LocationQuery, WeatherApiClient};
use crate::cache::ResultCache;
use crate::config::SkycastConfig;
use crate::location_resolver::LocationResolver;
use crate::models::{AirQuality, Coordinates, PlaceName, UnitSystem, WeatherSnapshot};
use crate::scene::{IconCode, VisualState};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Payload memoized per quantized coordinate key
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    /// Forecast snapshot
    pub snapshot: WeatherSnapshot,
    /// Air-quality reading
    pub air: AirQuality,
}

/// Committed dashboard state for one refresh cycle
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Coordinates this state was fetched for
    pub coordinates: Coordinates,
    /// Display place name ("Unknown" when reverse lookup degraded)
    pub place: PlaceName,
    /// Forecast snapshot
    pub snapshot: WeatherSnapshot,
    /// Air-quality reading
    pub air: AirQuality,
    /// Scene parameters derived from the current conditions
    pub visuals: VisualState,
}

/// Result of a completed refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cycle's data was committed and is now visible
    Committed,
    /// A newer cycle committed first; this response was discarded
    Superseded,
}

/// The weather application core
pub struct WeatherApp {
    client: WeatherApiClient,
    cache: ResultCache<WeatherBundle>,
    config: SkycastConfig,
    display_unit: UnitSystem,
    next_seq: u64,
    committed_seq: u64,
    state: Option<DashboardState>,
}

impl WeatherApp {
    /// Create the application from configuration
    pub fn new(config: SkycastConfig) -> crate::Result<Self> {
        let client = WeatherApiClient::new(config.clone())?;
        Ok(Self {
            client,
            cache: ResultCache::new(),
            config,
            display_unit: UnitSystem::Fahrenheit,
            next_seq: 0,
            committed_seq: 0,
            state: None,
        })
    }

    /// The last committed state, if any cycle has completed
    #[must_use]
    pub fn state(&self) -> Option<&DashboardState> {
        self.state.as_ref()
    }

    /// The active display unit
    #[must_use]
    pub fn display_unit(&self) -> UnitSystem {
        self.display_unit
    }

    /// Flip the display unit
    ///
    /// Conversions were computed and cached at fetch time, so this
    /// never triggers a re-fetch.
    pub fn toggle_units(&mut self) -> UnitSystem {
        self.display_unit = self.display_unit.toggled();
        self.display_unit
    }

    /// Resolve a search string and run a refresh cycle for it
    pub async fn search(&mut self, input: &str) -> crate::Result<RefreshOutcome> {
        let query = LocationQuery::parse(input)?;
        let coords = LocationResolver::resolve(
            &self.client,
            self.config.fallback_coordinates(),
            query,
        )
        .await?;
        self.refresh(coords).await
    }

    /// Run a refresh cycle for the ambient network location
    pub async fn locate(&mut self) -> crate::Result<RefreshOutcome> {
        let coords = LocationResolver::resolve(
            &self.client,
            self.config.fallback_coordinates(),
            LocationQuery::Ambient,
        )
        .await?;
        self.refresh(coords).await
    }

    /// Run one refresh cycle for a coordinate pair
    pub async fn refresh(&mut self, coords: Coordinates) -> crate::Result<RefreshOutcome> {
        let seq = self.begin_cycle();
        debug!("Refresh cycle {} started for {}", seq, coords);

        let bundle = self.fetch_bundle(coords).await?;

        // Cosmetic; degrades to "Unknown" rather than failing the cycle.
        let place = LocationResolver::reverse_name(&self.client, coords).await;

        Ok(self.commit(seq, coords, place, bundle))
    }

    /// Keep refreshing the last committed coordinates on the configured
    /// interval, invoking `render` after each commit
    ///
    /// A failed cycle is reported once and leaves displayed data
    /// untouched; the loop keeps going.
    pub async fn watch<F>(&mut self, mut render: F) -> crate::Result<()>
    where
        F: FnMut(&DashboardState, UnitSystem),
    {
        let mut interval = tokio::time::interval(self.config.update_interval());
        // The first tick completes immediately; the initial refresh
        // already rendered.
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(coords) = self.state.as_ref().map(|s| s.coordinates) else {
                continue;
            };

            match self.refresh(coords).await {
                Ok(RefreshOutcome::Committed) => {
                    if let Some(state) = self.state() {
                        render(state, self.display_unit);
                    }
                }
                Ok(RefreshOutcome::Superseded) => {}
                Err(e) => {
                    warn!("Auto-refresh failed: {}", e.user_message());
                }
            }
        }
    }

    fn begin_cycle(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Fetch the forecast and air-quality bundle, consulting the cache
    /// first and memoizing a successful upstream fetch
    async fn fetch_bundle(&self, coords: Coordinates) -> crate::Result<WeatherBundle> {
        let key = coords.cache_key();
        let ttl = self.config.cache_ttl();

        if let Some(bundle) = self.cache.get(&key, ttl) {
            debug!("Serving {} from cache", coords);
            return Ok(bundle);
        }

        let snapshot = self.client.forecast(coords).await?;
        let air = self.client.air_quality(coords).await?;

        let bundle = WeatherBundle { snapshot, air };
        self.cache.put(key, bundle.clone());
        Ok(bundle)
    }

    /// Commit a completed cycle unless a newer one already committed
    fn commit(
        &mut self,
        seq: u64,
        coords: Coordinates,
        place: PlaceName,
        bundle: WeatherBundle,
    ) -> RefreshOutcome {
        if seq <= self.committed_seq {
            warn!(
                "Discarding stale refresh {} (latest committed: {})",
                seq, self.committed_seq
            );
            return RefreshOutcome::Superseded;
        }

        let current = &bundle.snapshot.current;
        let visuals = VisualState::classify(IconCode::from_code(&current.icon), current.wind_speed);

        info!(
            "Refresh cycle {} committed: {} ({}), {}",
            seq, place, coords, current.description
        );

        self.committed_seq = seq;
        self.state = Some(DashboardState {
            coordinates: coords,
            place,
            snapshot: bundle.snapshot,
            air: bundle.air,
            visuals,
        });

        RefreshOutcome::Committed
    }
}

/// Restartable delay for search-as-you-type
///
/// Every new keystroke replaces the pending timer, so only the final
/// pending search fires; an explicit search cancels the pending timer
/// outright.
pub struct SearchDebouncer {
    delay: Duration,
    min_chars: usize,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Create a debouncer with the given delay and minimum query length
    #[must_use]
    pub fn new(delay: Duration, min_chars: usize) -> Self {
        Self {
            delay,
            min_chars,
            pending: None,
        }
    }

    /// Schedule `action` to run after the delay, replacing any pending
    /// schedule
    ///
    /// Queries shorter than the minimum length cancel the pending
    /// schedule without starting a new one.
    pub fn schedule<F, Fut>(&mut self, query: &str, action: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let query = query.trim().to_string();
        if query.chars().count() < self.min_chars {
            return;
        }

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(query).await;
        }));
    }

    /// Cancel any pending schedule
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CurrentConditions, PollutantConcentrations, Temperature,
    };
    use crate::models::AqiLevel;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_app() -> WeatherApp {
        let mut config = SkycastConfig::default();
        config.provider.api_key = Some("test-api-key".to_string());
        config.provider.api_base_url = "http://127.0.0.1:1".to_string();
        config.provider.geolocate_url = "http://127.0.0.1:1/json".to_string();
        WeatherApp::new(config).expect("app builds")
    }

    fn sample_bundle(icon: &str, temp_f: f64) -> WeatherBundle {
        WeatherBundle {
            snapshot: WeatherSnapshot {
                current: CurrentConditions {
                    observed_at: Utc::now(),
                    temperature: Temperature::from_fahrenheit(temp_f),
                    feels_like: Temperature::from_fahrenheit(temp_f),
                    humidity: 50,
                    pressure: 1013,
                    wind_speed: 8.0,
                    wind_gust: None,
                    wind_direction: 180,
                    uv_index: 3.0,
                    visibility: 10_000,
                    dew_point: Temperature::from_fahrenheit(45.0),
                    cloud_cover: 20,
                    precipitation_rate: None,
                    sunrise: None,
                    sunset: None,
                    icon: icon.to_string(),
                    description: "test conditions".to_string(),
                    group: "Test".to_string(),
                },
                hourly: Vec::new(),
                daily: Vec::new(),
                alerts: Vec::new(),
                fetched_at: Utc::now(),
            },
            air: AirQuality {
                level: Some(AqiLevel::Good),
                components: PollutantConcentrations::default(),
            },
        }
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut app = test_app();
        let coords = Coordinates::new(47.6062, -122.3321);

        // Two cycles in flight; the later one resolves first.
        let older = app.begin_cycle();
        let newer = app.begin_cycle();

        let outcome = app.commit(newer, coords, PlaceName::unknown(), sample_bundle("01d", 75.0));
        assert_eq!(outcome, RefreshOutcome::Committed);

        let outcome = app.commit(older, coords, PlaceName::unknown(), sample_bundle("10d", 40.0));
        assert_eq!(outcome, RefreshOutcome::Superseded);

        // The newer commit won and was not overwritten.
        let state = app.state().expect("committed state");
        assert_eq!(state.snapshot.current.icon, "01d");
        assert_eq!(
            state.snapshot.current.temperature.rounded(UnitSystem::Fahrenheit),
            75
        );
    }

    #[test]
    fn test_commit_derives_visual_state() {
        let mut app = test_app();
        let coords = Coordinates::new(47.6062, -122.3321);
        let seq = app.begin_cycle();

        app.commit(seq, coords, PlaceName::unknown(), sample_bundle("11n", 60.0));

        let state = app.state().expect("committed state");
        assert!(state.visuals.lightning);
        assert!(state.visuals.moon_visible);
    }

    #[test]
    fn test_toggle_units_needs_no_refetch() {
        let mut app = test_app();
        assert_eq!(app.display_unit(), UnitSystem::Fahrenheit);
        assert_eq!(app.toggle_units(), UnitSystem::Celsius);
        assert_eq!(app.toggle_units(), UnitSystem::Fahrenheit);
    }

    #[test]
    fn test_empty_search_fails_without_network() {
        let mut app = test_app();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let err = runtime.block_on(app.search("")).unwrap_err();
        assert!(matches!(err, crate::SkycastError::NotFound { .. }));
        assert!(app.state().is_none());
    }

    #[tokio::test]
    async fn test_debouncer_only_final_schedule_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(30), 2);

        for query in ["se", "sea", "seat"] {
            let fired = Arc::clone(&fired);
            debouncer.schedule(query, move |q| async move {
                assert_eq!(q, "seat");
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_debouncer_explicit_cancel() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(30), 2);

        {
            let fired = Arc::clone(&fired);
            debouncer.schedule("seattle", move |_| async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_debouncer_ignores_short_queries() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(10), 2);

        {
            let fired = Arc::clone(&fired);
            debouncer.schedule("s", move |_| async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
