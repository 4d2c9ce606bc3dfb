//! Terminal presentation of the committed dashboard state
//!
//! Presentation glue only: takes finished data structures from the
//! core and formats them. Nothing here feeds back into the pipeline.

use crate::app::DashboardState;
use crate::dashboard::{EnvironmentalSummary, RoadHazard};
use crate::models::{UnitSystem, format_duration, moon_phase_name, wind_direction_to_cardinal};
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;

const HOURLY_SHOWN: usize = 12;
const DAILY_SHOWN: usize = 7;

fn local_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}

fn local_day(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%a").to_string()
}

/// Render the dashboard as text
#[must_use]
pub fn render(state: &DashboardState, unit: UnitSystem) -> String {
    let mut out = String::new();
    let current = &state.snapshot.current;
    let symbol = unit.symbol();

    let _ = writeln!(out, "{} {}", state.place, state.coordinates);
    let _ = writeln!(
        out,
        "{}{}  (feels like {}{})  {}",
        current.temperature.rounded(unit),
        symbol,
        current.feels_like.rounded(unit),
        symbol,
        current.description
    );
    let _ = writeln!(
        out,
        "Humidity {}%  Pressure {} hPa  Clouds {}%  Dew point {}{}",
        current.humidity,
        current.pressure,
        current.cloud_cover,
        current.dew_point.rounded(unit),
        symbol
    );

    let gust = current
        .wind_gust
        .map_or("n/a".to_string(), |g| format!("{} mph", g.round()));
    let _ = writeln!(
        out,
        "Wind {} mph {} ({}°)  Gust {}",
        current.wind_speed.round(),
        wind_direction_to_cardinal(current.wind_direction),
        current.wind_direction,
        gust
    );

    let summary = EnvironmentalSummary::build(current, &state.air);
    let _ = writeln!(
        out,
        "UV {} ({}) - {}",
        current.uv_index.round(),
        summary.uv.label(),
        summary.uv.message()
    );
    let _ = writeln!(
        out,
        "Visibility {:.1} km ({}) - {}",
        f64::from(current.visibility) / 1000.0,
        summary.visibility.label(),
        summary.visibility.message()
    );

    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        let _ = write!(
            out,
            "Sunrise {}  Sunset {}",
            local_time(sunrise),
            local_time(sunset)
        );
        if let Some(length) = current.day_length() {
            let _ = write!(out, "  Day length {}", format_duration(length));
        }
        let _ = writeln!(out);
    }

    if !state.snapshot.hourly.is_empty() {
        let _ = writeln!(out, "\nNext hours:");
        for hour in state.snapshot.hourly.iter().take(HOURLY_SHOWN) {
            let _ = writeln!(
                out,
                "  {}  {}{}  {}",
                local_time(hour.time),
                hour.temperature.rounded(unit),
                symbol,
                hour.group
            );
        }
    }

    if !state.snapshot.daily.is_empty() {
        let _ = writeln!(out, "\nDaily forecast:");
        for day in state.snapshot.daily.iter().take(DAILY_SHOWN) {
            let _ = writeln!(
                out,
                "  {}  {}{} / {}{}  {}% precip  {}",
                local_day(day.date),
                day.low.rounded(unit),
                symbol,
                day.high.rounded(unit),
                symbol,
                day.precipitation_chance,
                day.description
            );
        }
        if let Some(today) = state.snapshot.daily.first() {
            if let Some(phase) = today.moon_phase {
                let _ = writeln!(out, "  Moon: {}", moon_phase_name(phase));
            }
        }
    }

    let _ = writeln!(out, "\nAir quality: {}", state.air.label());
    let _ = writeln!(out, "  {}", summary.air_quality);
    let _ = writeln!(
        out,
        "  Primary concern: {} ({} \u{b5}g/m\u{b3})",
        summary.primary_concern.label(),
        summary.primary_concentration
    );
    let components = &state.air.components;
    let _ = writeln!(
        out,
        "  PM2.5 {}  PM10 {}  NO\u{2082} {}  O\u{2083} {}  CO {}  SO\u{2082} {}",
        components.pm2_5, components.pm10, components.no2, components.o3, components.co,
        components.so2
    );

    if !state.snapshot.alerts.is_empty() {
        let _ = writeln!(out, "\nAlerts:");
        for alert in &state.snapshot.alerts {
            let _ = writeln!(out, "  ⚠ {} (from {})", alert.event, local_time(alert.start));
        }
    }

    let hazards = RoadHazard::evaluate(current);
    if !hazards.is_empty() {
        let _ = writeln!(out, "\nRoad hazards:");
        for hazard in hazards {
            let _ = writeln!(out, "  {}", hazard.message());
        }
    }

    let visuals = &state.visuals;
    let _ = writeln!(
        out,
        "\nScene: sky {} → {}, clouds {:.0}%{}{}, rain/snow/leaf {}/{}/{}, {}",
        visuals.sky.top,
        visuals.sky.bottom,
        visuals.cloud_opacity * 100.0,
        if visuals.fog { ", fog" } else { "" },
        if visuals.lightning { ", lightning" } else { "" },
        visuals.particles.rain,
        visuals.particles.snow,
        visuals.particles.leaf,
        if visuals.moon_visible { "moon out" } else if visuals.sun_visible { "sun out" } else { "overcast" }
    );

    out
}

/// Render and print to stdout
pub fn print_dashboard(state: &DashboardState, unit: UnitSystem) {
    print!("{}", render(state, unit));
}
