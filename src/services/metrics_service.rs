use tracing::debug;

use crate::models::{
    DayMetric, ForecastPoint, LastKnown, MetricsSummary, PredictionResult, PriceRange, PricePoint,
    Trend,
};
use crate::services::date_normalizer::normalize_date;

/// Forecast days shown as individual rows.
pub const MAX_DAY_ROWS: usize = 5;

/// Derive per-day changes and aggregates from a forecast.
///
/// Day 1 is measured against `last_known_price`, every later day against
/// the previous forecast day. Returns `None` when there is no forecast or no
/// usable anchor price (absent, zero or non-finite). Values are not rounded.
pub fn compute_metrics(
    forecast: &[ForecastPoint],
    last_known_price: Option<f64>,
) -> Option<MetricsSummary> {
    let last_known_price = last_known_price.filter(|p| p.is_finite() && *p != 0.0)?;
    let last_forecast = forecast.last()?;

    let mut per_day = Vec::with_capacity(forecast.len().min(MAX_DAY_ROWS));
    let mut previous = last_known_price;
    for point in forecast.iter().take(MAX_DAY_ROWS) {
        let delta = point.predicted_price - previous;
        per_day.push(DayMetric {
            day: point.day,
            date: point.date.clone(),
            predicted_price: point.predicted_price,
            previous_price: previous,
            delta,
            percentage: percentage_change(delta, previous),
            trend: if delta >= 0.0 { Trend::Up } else { Trend::Down },
        });
        previous = point.predicted_price;
    }

    let range = forecast.iter().fold(
        PriceRange { min: f64::INFINITY, max: f64::NEG_INFINITY },
        |acc, p| PriceRange {
            min: acc.min.min(p.predicted_price),
            max: acc.max.max(p.predicted_price),
        },
    );

    let aggregate_change_percent =
        (last_forecast.predicted_price - last_known_price) / last_known_price * 100.0;

    debug!(
        "Metrics over {} forecast days: range {:.2}-{:.2}, expected change {:.2}%",
        forecast.len(),
        range.min,
        range.max,
        aggregate_change_percent
    );

    Some(MetricsSummary {
        per_day,
        range,
        aggregate_change_percent,
        last_known_price,
        horizon: forecast.len(),
    })
}

fn percentage_change(delta: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some(delta / baseline * 100.0)
    }
}

/// Anchor price for the forecast: the service's `last_known_price`, else the
/// final historical close.
pub fn resolve_last_known(
    prediction: Option<&PredictionResult>,
    historical: &[PricePoint],
) -> Option<LastKnown> {
    let last_close = historical.last();

    let price = prediction
        .and_then(|p| p.last_known_price)
        .filter(|p| *p != 0.0)
        .or_else(|| last_close.map(|p| p.close))?;

    let date = prediction
        .and_then(|p| p.last_known_date.as_deref())
        .filter(|d| !d.is_empty())
        .or_else(|| last_close.map(|p| p.date.as_str()))
        .map(normalize_date);

    Some(LastKnown { price, date })
}
