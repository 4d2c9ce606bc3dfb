//! Dashboard derivations: environmental tiers and advisories
//!
//! Pure helpers the presenter consumes. Each tier is an explicit
//! mapping from a measured value to a label, display color and one
//! line of advice.

use crate::models::{AirQuality, CurrentConditions, Pollutant};

/// UV index tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvTier {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvTier {
    /// Classify a UV index reading
    #[must_use]
    pub fn from_index(uv_index: f64) -> Self {
        if uv_index <= 2.0 {
            Self::Low
        } else if uv_index <= 5.0 {
            Self::Moderate
        } else if uv_index <= 7.0 {
            Self::High
        } else if uv_index <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#3EA72D",
            Self::Moderate => "#FFF300",
            Self::High => "#F18B00",
            Self::VeryHigh => "#E53210",
            Self::Extreme => "#B567A4",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Low => "Safe to be outside.",
            Self::Moderate => "Wear sunglasses if staying out.",
            Self::High => "Use SPF 30+, seek shade.",
            Self::VeryHigh => "Cover up and avoid peak sun.",
            Self::Extreme => "Avoid going out unless essential.",
        }
    }
}

/// Visibility tier, classified from kilometers of visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTier {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl VisibilityTier {
    /// Classify a visibility distance in kilometers
    #[must_use]
    pub fn from_km(km: f64) -> Self {
        if km >= 10.0 {
            Self::Excellent
        } else if km >= 6.0 {
            Self::Good
        } else if km >= 3.0 {
            Self::Moderate
        } else if km >= 1.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#00e400",
            Self::Good => "#ffff00",
            Self::Moderate => "#ff7e00",
            Self::Poor => "#ff0000",
            Self::VeryPoor => "#99004c",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Clear and open views.",
            Self::Good => "Slight haze possible.",
            Self::Moderate => "Some fog or pollution present.",
            Self::Poor => "Visibility limited. Drive carefully.",
            Self::VeryPoor => "Heavy fog/smog. Avoid travel if possible.",
        }
    }
}

/// Combined environmental summary block
#[derive(Debug, Clone)]
pub struct EnvironmentalSummary {
    /// Health advice line for the AQI tier
    pub air_quality: &'static str,
    /// Pollutant with the highest concentration
    pub primary_concern: Pollutant,
    /// Concentration of the primary concern, µg/m³
    pub primary_concentration: f64,
    /// UV tier for the current index
    pub uv: UvTier,
    /// Visibility tier for the current distance
    pub visibility: VisibilityTier,
}

impl EnvironmentalSummary {
    /// Derive the summary from current conditions and air quality
    #[must_use]
    pub fn build(current: &CurrentConditions, air: &AirQuality) -> Self {
        let (primary_concern, primary_concentration) = air.components.worst();
        Self {
            air_quality: air.health_summary(),
            primary_concern,
            primary_concentration,
            uv: UvTier::from_index(current.uv_index),
            visibility: VisibilityTier::from_km(f64::from(current.visibility) / 1000.0),
        }
    }
}

/// Road hazard advisories derived from current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadHazard {
    Ice,
    ExtremeCold,
    HighWind,
    LowVisibility,
    HeavyRain,
}

impl RoadHazard {
    /// Advisory text
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Ice => "Ice Warning: Roads may be slippery!",
            Self::ExtremeCold => "Extreme Cold: Drive cautiously!",
            Self::HighWind => "High Wind Warning: Keep both hands on the wheel!",
            Self::LowVisibility => "Low Visibility: Use fog lights & slow down!",
            Self::HeavyRain => "Heavy Rain: Risk of hydroplaning!",
        }
    }

    /// Evaluate all hazards for the current conditions
    #[must_use]
    pub fn evaluate(current: &CurrentConditions) -> Vec<RoadHazard> {
        use crate::models::UnitSystem;

        let mut hazards = Vec::new();
        let temp_f = current.temperature.in_unit(UnitSystem::Fahrenheit);
        let precipitation = current.precipitation_rate.unwrap_or(0.0);

        if temp_f <= 32.0 && precipitation > 0.0 {
            hazards.push(Self::Ice);
        }
        if temp_f < 20.0 {
            hazards.push(Self::ExtremeCold);
        }
        if current.wind_speed > 40.0 {
            hazards.push(Self::HighWind);
        }
        if current.visibility < 500 {
            hazards.push(Self::LowVisibility);
        }
        if precipitation > 0.5 {
            hazards.push(Self::HeavyRain);
        }

        hazards
    }
}
