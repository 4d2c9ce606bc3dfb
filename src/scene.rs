//! Condition-to-visual-state mapping
//!
//! Maps the provider's enumerated icon codes to the scene parameters
//! the presentation layer applies: sky gradient, cloud opacity and
//! filter, particle emission rates, fog/lightning overlays and
//! celestial visibility. The mapping is a single explicit lookup table
//! so adding a weather condition is a data change, not a code change.

use rand::RngExt;
use std::time::Duration;

/// Provider icon code: condition plus day/night variant
///
/// A closed set; anything outside it parses to `Unknown`, which maps to
/// the documented default scene rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconCode {
    ClearDay,
    ClearNight,
    FewCloudsDay,
    FewCloudsNight,
    ScatteredCloudsDay,
    ScatteredCloudsNight,
    BrokenCloudsDay,
    BrokenCloudsNight,
    ShowerRainDay,
    ShowerRainNight,
    RainDay,
    RainNight,
    ThunderstormDay,
    ThunderstormNight,
    SnowDay,
    SnowNight,
    MistDay,
    MistNight,
    Unknown,
}

impl IconCode {
    /// All known codes, in provider order
    #[must_use]
    pub const fn known() -> &'static [IconCode] {
        use IconCode::*;
        &[
            ClearDay,
            ClearNight,
            FewCloudsDay,
            FewCloudsNight,
            ScatteredCloudsDay,
            ScatteredCloudsNight,
            BrokenCloudsDay,
            BrokenCloudsNight,
            ShowerRainDay,
            ShowerRainNight,
            RainDay,
            RainNight,
            ThunderstormDay,
            ThunderstormNight,
            SnowDay,
            SnowNight,
            MistDay,
            MistNight,
        ]
    }

    /// Parse a provider code string such as "10d"
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" => Self::ClearDay,
            "01n" => Self::ClearNight,
            "02d" => Self::FewCloudsDay,
            "02n" => Self::FewCloudsNight,
            "03d" => Self::ScatteredCloudsDay,
            "03n" => Self::ScatteredCloudsNight,
            "04d" => Self::BrokenCloudsDay,
            "04n" => Self::BrokenCloudsNight,
            "09d" => Self::ShowerRainDay,
            "09n" => Self::ShowerRainNight,
            "10d" => Self::RainDay,
            "10n" => Self::RainNight,
            "11d" => Self::ThunderstormDay,
            "11n" => Self::ThunderstormNight,
            "13d" => Self::SnowDay,
            "13n" => Self::SnowNight,
            "50d" => Self::MistDay,
            "50n" => Self::MistNight,
            _ => Self::Unknown,
        }
    }

    /// Whether this is a nighttime variant (the provider suffix convention)
    #[must_use]
    pub fn is_night(self) -> bool {
        matches!(
            self,
            Self::ClearNight
                | Self::FewCloudsNight
                | Self::ScatteredCloudsNight
                | Self::BrokenCloudsNight
                | Self::ShowerRainNight
                | Self::RainNight
                | Self::ThunderstormNight
                | Self::SnowNight
                | Self::MistNight
        )
    }

    /// Rain family: shower and steady rain variants
    #[must_use]
    pub fn is_rain_family(self) -> bool {
        matches!(
            self,
            Self::ShowerRainDay | Self::ShowerRainNight | Self::RainDay | Self::RainNight
        )
    }

    /// Snow family
    #[must_use]
    pub fn is_snow_family(self) -> bool {
        matches!(self, Self::SnowDay | Self::SnowNight)
    }

    /// Mist/fog family
    #[must_use]
    pub fn is_fog_family(self) -> bool {
        matches!(self, Self::MistDay | Self::MistNight)
    }

    /// Thunderstorm family
    #[must_use]
    pub fn is_thunder_family(self) -> bool {
        matches!(self, Self::ThunderstormDay | Self::ThunderstormNight)
    }
}

/// Three-stop sky gradient, top to horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyGradient {
    pub top: &'static str,
    pub mid: &'static str,
    pub bottom: &'static str,
}

/// Sun rendering parameters for a daytime code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunAppearance {
    pub opacity: f32,
    pub filter: &'static str,
}

/// One row of the condition lookup table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEntry {
    pub icon: IconCode,
    pub sky: SkyGradient,
    pub cloud_opacity: f32,
    pub cloud_filter: &'static str,
    pub sun: Option<SunAppearance>,
}

const fn gradient(top: &'static str, mid: &'static str, bottom: &'static str) -> SkyGradient {
    SkyGradient { top, mid, bottom }
}

/// Scene parameters per icon code
static SCENE_TABLE: [SceneEntry; 18] = [
    SceneEntry {
        icon: IconCode::ClearDay,
        sky: gradient("#87CEEB", "#98D8E8", "#B0E0E6"),
        cloud_opacity: 0.0,
        cloud_filter: "none",
        sun: Some(SunAppearance {
            opacity: 1.0,
            filter: "none",
        }),
    },
    SceneEntry {
        icon: IconCode::ClearNight,
        sky: gradient("#0F0F23", "#1a1a2e", "#16213e"),
        cloud_opacity: 0.0,
        cloud_filter: "none",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::FewCloudsDay,
        sky: gradient("#87CEEB", "#A4D3E8", "#C0E6F0"),
        cloud_opacity: 0.3,
        cloud_filter: "brightness(1.2) contrast(0.9)",
        sun: Some(SunAppearance {
            opacity: 0.9,
            filter: "brightness(0.9)",
        }),
    },
    SceneEntry {
        icon: IconCode::FewCloudsNight,
        sky: gradient("#1a1a2e", "#2d2d54", "#3e3e6b"),
        cloud_opacity: 0.4,
        cloud_filter: "brightness(0.6) contrast(1.1)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::ScatteredCloudsDay,
        sky: gradient("#B0C4DE", "#D3D3D3", "#E0E0E0"),
        cloud_opacity: 0.6,
        cloud_filter: "brightness(0.9) contrast(1.0)",
        sun: Some(SunAppearance {
            opacity: 0.7,
            filter: "brightness(0.7) contrast(0.9)",
        }),
    },
    SceneEntry {
        icon: IconCode::ScatteredCloudsNight,
        sky: gradient("#2F2F2F", "#404040", "#525252"),
        cloud_opacity: 0.7,
        cloud_filter: "brightness(0.4) contrast(1.2)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::BrokenCloudsDay,
        sky: gradient("#708090", "#A9A9A9", "#C0C0C0"),
        cloud_opacity: 0.8,
        cloud_filter: "brightness(0.7) contrast(1.1)",
        sun: Some(SunAppearance {
            opacity: 0.5,
            filter: "brightness(0.5) contrast(0.8)",
        }),
    },
    SceneEntry {
        icon: IconCode::BrokenCloudsNight,
        sky: gradient("#1C1C1C", "#2E2E2E", "#3F3F3F"),
        cloud_opacity: 0.9,
        cloud_filter: "brightness(0.3) contrast(1.3)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::ShowerRainDay,
        sky: gradient("#4682B4", "#5F9EA0", "#708090"),
        cloud_opacity: 0.9,
        cloud_filter: "brightness(0.5) contrast(1.3) saturate(0.8)",
        sun: Some(SunAppearance {
            opacity: 0.4,
            filter: "brightness(0.4) contrast(0.9)",
        }),
    },
    SceneEntry {
        icon: IconCode::ShowerRainNight,
        sky: gradient("#191970", "#2F4F4F", "#36454F"),
        cloud_opacity: 0.95,
        cloud_filter: "brightness(0.2) contrast(1.4) saturate(0.7)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::RainDay,
        sky: gradient("#4169E1", "#6495ED", "#87CEEB"),
        cloud_opacity: 0.85,
        cloud_filter: "brightness(0.6) contrast(1.2) saturate(0.9)",
        sun: Some(SunAppearance {
            opacity: 0.3,
            filter: "brightness(0.3) contrast(0.8)",
        }),
    },
    SceneEntry {
        icon: IconCode::RainNight,
        sky: gradient("#0B0B2F", "#1E1E3F", "#2F2F4F"),
        cloud_opacity: 0.9,
        cloud_filter: "brightness(0.25) contrast(1.3) saturate(0.8)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::ThunderstormDay,
        sky: gradient("#2F4F4F", "#696969", "#808080"),
        cloud_opacity: 1.0,
        cloud_filter: "brightness(0.3) contrast(1.5) saturate(0.6)",
        sun: Some(SunAppearance {
            opacity: 0.2,
            filter: "brightness(0.2) contrast(1.2)",
        }),
    },
    SceneEntry {
        icon: IconCode::ThunderstormNight,
        sky: gradient("#000000", "#1a1a1a", "#2d2d2d"),
        cloud_opacity: 1.0,
        cloud_filter: "brightness(0.1) contrast(1.6) saturate(0.5)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::SnowDay,
        sky: gradient("#F0F8FF", "#E6E6FA", "#F5F5F5"),
        cloud_opacity: 0.5,
        cloud_filter: "brightness(1.4) contrast(0.8) saturate(0.3)",
        sun: Some(SunAppearance {
            opacity: 0.8,
            filter: "brightness(1.2) contrast(0.7)",
        }),
    },
    SceneEntry {
        icon: IconCode::SnowNight,
        sky: gradient("#2F2F2F", "#4A4A4A", "#6B6B6B"),
        cloud_opacity: 0.6,
        cloud_filter: "brightness(0.8) contrast(1.0) saturate(0.4)",
        sun: None,
    },
    SceneEntry {
        icon: IconCode::MistDay,
        sky: gradient("#C0C0C0", "#D3D3D3", "#E0E0E0"),
        cloud_opacity: 0.8,
        cloud_filter: "brightness(0.8) contrast(0.7) blur(2px)",
        sun: Some(SunAppearance {
            opacity: 0.4,
            filter: "brightness(0.4) blur(2px)",
        }),
    },
    SceneEntry {
        icon: IconCode::MistNight,
        sky: gradient("#2F2F2F", "#3F3F3F", "#4F4F4F"),
        cloud_opacity: 0.9,
        cloud_filter: "brightness(0.4) contrast(0.9) blur(3px)",
        sun: None,
    },
];

/// Default scene for unrecognized codes: the clear-day gradient with
/// half-opacity dimmed clouds and no sun
static DEFAULT_SCENE: SceneEntry = SceneEntry {
    icon: IconCode::Unknown,
    sky: gradient("#87CEEB", "#98D8E8", "#B0E0E6"),
    cloud_opacity: 0.5,
    cloud_filter: "brightness(0.8)",
    sun: None,
};

fn scene_entry(icon: IconCode) -> &'static SceneEntry {
    SCENE_TABLE
        .iter()
        .find(|entry| entry.icon == icon)
        .unwrap_or(&DEFAULT_SCENE)
}

/// Particle emission counts per spawn pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleRates {
    pub rain: u32,
    pub snow: u32,
    pub leaf: u32,
}

/// Complete visual parameters for one condition
///
/// Derived and stateless: recomputed on every condition change, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub sky: SkyGradient,
    pub cloud_opacity: f32,
    pub cloud_filter: &'static str,
    pub particles: ParticleRates,
    pub fog: bool,
    pub lightning: bool,
    pub sun_visible: bool,
    pub sun_opacity: f32,
    pub sun_filter: &'static str,
    pub moon_visible: bool,
}

impl VisualState {
    /// Derive the visual state for an icon code and wind speed
    ///
    /// Pure, deterministic and total over the icon-code domain.
    #[must_use]
    pub fn classify(icon: IconCode, wind_speed: f64) -> Self {
        let entry = scene_entry(icon);
        let wind = wind_speed.max(0.0);

        let particles = ParticleRates {
            rain: if icon.is_rain_family() {
                (wind * 3.0).floor().min(40.0) as u32
            } else {
                0
            },
            snow: if icon.is_snow_family() {
                (wind * 1.5).floor().min(25.0) as u32
            } else {
                0
            },
            leaf: if wind > 10.0 {
                (wind / 2.0).floor().min(15.0) as u32
            } else {
                0
            },
        };

        Self {
            sky: entry.sky,
            cloud_opacity: entry.cloud_opacity,
            cloud_filter: entry.cloud_filter,
            particles,
            fog: icon.is_fog_family(),
            lightning: icon.is_thunder_family(),
            sun_visible: entry.sun.is_some(),
            sun_opacity: entry.sun.map_or(0.0, |s| s.opacity),
            sun_filter: entry.sun.map_or("none", |s| s.filter),
            moon_visible: icon.is_night(),
        }
    }
}

/// Timing plan for a burst of lightning flashes
///
/// Randomized presentation effect, generated separately from the pure
/// classification: 2-5 flashes with successive offsets 1-4 seconds
/// apart.
#[derive(Debug, Clone)]
pub struct LightningSchedule {
    /// Offsets from now at which a flash fires, ascending
    pub flash_offsets: Vec<Duration>,
}

impl LightningSchedule {
    /// Generate a new randomized schedule
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let flashes = rng.random_range(2..=5);

        let mut offsets = Vec::with_capacity(flashes);
        let mut delay = Duration::ZERO;
        for _ in 0..flashes {
            delay += Duration::from_millis(rng.random_range(1_000..=4_000));
            offsets.push(delay);
        }

        Self {
            flash_offsets: offsets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_classify_is_total_over_known_codes() {
        for icon in IconCode::known() {
            let state = VisualState::classify(*icon, 12.0);
            assert!((0.0..=1.0).contains(&state.cloud_opacity), "{icon:?}");
            if state.sun_visible {
                assert!((0.0..=1.0).contains(&state.sun_opacity), "{icon:?}");
            }
        }
    }

    #[test]
    fn test_unknown_code_maps_to_documented_default() {
        let icon = IconCode::from_code("99x");
        assert_eq!(icon, IconCode::Unknown);

        let state = VisualState::classify(icon, 5.0);
        assert_eq!(state.cloud_opacity, 0.5);
        assert_eq!(state.cloud_filter, "brightness(0.8)");
        assert!(!state.sun_visible);
        assert!(!state.moon_visible);
        assert!(!state.fog);
        assert!(!state.lightning);
    }

    #[rstest]
    #[case("01d", IconCode::ClearDay)]
    #[case("10n", IconCode::RainNight)]
    #[case("11d", IconCode::ThunderstormDay)]
    #[case("13n", IconCode::SnowNight)]
    #[case("50d", IconCode::MistDay)]
    fn test_icon_code_parse(#[case] code: &str, #[case] expected: IconCode) {
        assert_eq!(IconCode::from_code(code), expected);
    }

    #[test]
    fn test_rain_rate_monotonic_up_to_cap() {
        let mut last = 0;
        for wind in 0..30 {
            let state = VisualState::classify(IconCode::RainDay, f64::from(wind));
            assert!(state.particles.rain >= last);
            assert!(state.particles.rain <= 40);
            last = state.particles.rain;
        }
        // Cap reached and held.
        assert_eq!(
            VisualState::classify(IconCode::RainDay, 100.0).particles.rain,
            40
        );
    }

    #[rstest]
    #[case(IconCode::ClearDay)]
    #[case(IconCode::SnowDay)]
    #[case(IconCode::ThunderstormNight)]
    #[case(IconCode::MistDay)]
    #[case(IconCode::Unknown)]
    fn test_rain_rate_zero_for_non_rain_codes(#[case] icon: IconCode) {
        for wind in [0.0, 5.0, 20.0, 100.0] {
            assert_eq!(VisualState::classify(icon, wind).particles.rain, 0);
        }
    }

    #[test]
    fn test_snow_rate_scales_and_caps() {
        assert_eq!(
            VisualState::classify(IconCode::SnowDay, 4.0).particles.snow,
            6
        );
        assert_eq!(
            VisualState::classify(IconCode::SnowNight, 100.0).particles.snow,
            25
        );
        assert_eq!(
            VisualState::classify(IconCode::RainDay, 10.0).particles.snow,
            0
        );
    }

    #[test]
    fn test_leaf_rate_requires_wind_over_threshold() {
        // Independent of precipitation family.
        assert_eq!(
            VisualState::classify(IconCode::ClearDay, 10.0).particles.leaf,
            0
        );
        assert_eq!(
            VisualState::classify(IconCode::ClearDay, 11.0).particles.leaf,
            5
        );
        assert_eq!(
            VisualState::classify(IconCode::RainNight, 100.0).particles.leaf,
            15
        );
    }

    #[test]
    fn test_negative_wind_is_clamped() {
        let state = VisualState::classify(IconCode::RainDay, -3.0);
        assert_eq!(state.particles.rain, 0);
        assert_eq!(state.particles.leaf, 0);
    }

    #[test]
    fn test_overlays_follow_condition_families() {
        assert!(VisualState::classify(IconCode::MistNight, 0.0).fog);
        assert!(!VisualState::classify(IconCode::RainDay, 0.0).fog);
        assert!(VisualState::classify(IconCode::ThunderstormDay, 0.0).lightning);
        assert!(!VisualState::classify(IconCode::SnowDay, 0.0).lightning);
    }

    #[test]
    fn test_celestial_visibility() {
        let day = VisualState::classify(IconCode::ClearDay, 0.0);
        assert!(day.sun_visible);
        assert!(!day.moon_visible);
        assert_eq!(day.sun_opacity, 1.0);

        let night = VisualState::classify(IconCode::ClearNight, 0.0);
        assert!(!night.sun_visible);
        assert!(night.moon_visible);

        let storm_day = VisualState::classify(IconCode::ThunderstormDay, 0.0);
        assert!(storm_day.sun_visible);
        assert_eq!(storm_day.sun_opacity, 0.2);
    }

    #[test]
    fn test_lightning_schedule_bounds() {
        for _ in 0..50 {
            let schedule = LightningSchedule::generate();
            let count = schedule.flash_offsets.len();
            assert!((2..=5).contains(&count));

            let mut previous = Duration::ZERO;
            for offset in &schedule.flash_offsets {
                let gap = *offset - previous;
                assert!(gap >= Duration::from_millis(1_000));
                assert!(gap <= Duration::from_millis(4_000));
                previous = *offset;
            }
        }
    }
}
