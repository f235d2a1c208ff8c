use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{AlignedSeries, ForecastPoint, PricePoint};
use crate::services::date_normalizer::normalize_date;

/// Merge history, the current trading day and the forecast onto one label axis.
///
/// The historical point dated `today` (if any) is lifted out of the
/// historical series into its own slot, so the three value arrays never
/// overlap: `historical` fills the past, `today` the single boundary index,
/// `predicted` everything after it. Input order is preserved; no sorting or
/// cross-boundary deduplication happens here.
pub fn align(
    historical: &[PricePoint],
    forecast: &[ForecastPoint],
    today: NaiveDate,
) -> AlignedSeries {
    let today_label = today.format("%Y-%m-%d").to_string();

    let mut past: Vec<(String, f64)> = Vec::with_capacity(historical.len());
    let mut today_point: Option<(String, f64)> = None;

    for point in historical {
        let date = normalize_date(&point.date);
        if date == today_label {
            if today_point.is_some() {
                warn!("Multiple historical points dated {}, keeping the last one", today_label);
            }
            today_point = Some((date, point.close));
        } else {
            past.push((date, point.close));
        }
    }

    let boundary = past.len() + usize::from(today_point.is_some());
    let total = boundary + forecast.len();

    let mut labels = Vec::with_capacity(total);
    labels.extend(past.iter().map(|(date, _)| date.clone()));
    if let Some((date, _)) = &today_point {
        labels.push(date.clone());
    }
    labels.extend(forecast.iter().map(|p| normalize_date(&p.date)));

    if boundary > 0 {
        if let Some(first_forecast) = labels.get(boundary) {
            let last_known = &labels[boundary - 1];
            if first_forecast <= last_known {
                warn!(
                    "Forecast starts at {} which does not follow last history label {}",
                    first_forecast, last_known
                );
            }
        }
    }

    let mut historical_values: Vec<Option<f64>> =
        past.iter().map(|(_, close)| Some(*close)).collect();
    historical_values.resize(total, None);

    let mut today_values = vec![None; total];
    let today_index = today_point.as_ref().map(|(_, close)| {
        let index = past.len();
        today_values[index] = Some(*close);
        index
    });

    let mut predicted = vec![None; boundary];
    predicted.extend(forecast.iter().map(|p| Some(p.predicted_price)));

    debug!(
        "Aligned {} past, {} today, {} forecast points",
        past.len(),
        usize::from(today_index.is_some()),
        forecast.len()
    );

    AlignedSeries {
        labels,
        historical: historical_values,
        today: today_values,
        predicted,
        today_index,
    }
}
