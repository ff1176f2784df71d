//! Human-readable rendering of NWS forecasts and alerts.

use crate::nws::{AlertFeature, ForecastPeriod};

/// Only the next few periods are shown.
pub const FORECAST_PERIOD_LIMIT: usize = 5;

/// Placed between consecutive periods or alerts.
pub const SEPARATOR: &str = "\n---\n";

pub const NO_FORECAST_PERIODS: &str = "No forecast periods available.";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";

/// A missing temperature renders as 0.
pub fn format_period(period: &ForecastPeriod) -> String {
    format!(
        "\n{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}\n",
        period.name,
        period.temperature.unwrap_or_default(),
        period.temperature_unit,
        period.wind_speed,
        period.wind_direction,
        period.detailed_forecast,
    )
}

/// Render up to [`FORECAST_PERIOD_LIMIT`] periods.
pub fn format_forecast(periods: &[ForecastPeriod]) -> String {
    if periods.is_empty() {
        return NO_FORECAST_PERIODS.to_string();
    }

    periods
        .iter()
        .take(FORECAST_PERIOD_LIMIT)
        .map(format_period)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;
    format!(
        "\nEvent: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}\n",
        or_default(&props.event, "Unknown"),
        or_default(&props.area_desc, "Unknown"),
        or_default(&props.severity, "Unknown"),
        or_default(&props.description, "No description available"),
        or_default(&props.instruction, "No specific instructions provided"),
    )
}

/// Render every alert.
pub fn format_alerts(features: &[AlertFeature]) -> String {
    if features.is_empty() {
        return NO_ACTIVE_ALERTS.to_string();
    }

    features
        .iter()
        .map(format_alert)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

// Empty strings count as missing.
fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}
