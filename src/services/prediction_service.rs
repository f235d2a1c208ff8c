use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::errors::{AppError, EmptySource};
use crate::external::stock_api::StockDataApi;
use crate::models::{Notice, PipelineSnapshot, PredictionResult, PricePoint, RequestStatus};
use crate::services::metrics_service::{compute_metrics, resolve_last_known};
use crate::services::series_aligner;

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 5;

/// Source of the current calendar date used to isolate today's trading day.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Debug, Clone)]
pub enum PredictionOutcome {
    Published(Arc<PipelineSnapshot>),
    /// A newer invocation was issued before this one resolved; its result was dropped.
    Superseded { sequence: u64 },
}

/// Checks user input and returns the normalized `(ticker, days)` pair.
pub fn validate_request(ticker: &str, days: i64) -> Result<(String, u32), AppError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(AppError::Validation("Please enter a stock symbol".to_string()));
    }

    if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
        return Err(days_out_of_range());
    }

    Ok((ticker.to_uppercase(), days as u32))
}

/// Error for a horizon outside the accepted range, or one that is not an integer at all.
pub fn days_out_of_range() -> AppError {
    AppError::Validation(format!("Days must be between {} and {}", MIN_DAYS, MAX_DAYS))
}

/// Runs fetch cycles against the data service and owns the published snapshot.
///
/// Each call to [`run_prediction`](Self::run_prediction) takes a sequence
/// token. Results are published only while their token is still the latest,
/// so an older request resolving late can never overwrite a newer one.
pub struct PredictionOrchestrator {
    api: Arc<dyn StockDataApi>,
    clock: Clock,
    sequence: AtomicU64,
    snapshot: RwLock<Arc<PipelineSnapshot>>,
}

impl PredictionOrchestrator {
    pub fn new(api: Arc<dyn StockDataApi>) -> Self {
        Self::with_clock(api, Arc::new(|| Utc::now().date_naive()))
    }

    pub fn with_clock(api: Arc<dyn StockDataApi>, clock: Clock) -> Self {
        Self {
            api,
            clock,
            sequence: AtomicU64::new(0),
            snapshot: RwLock::new(Arc::new(PipelineSnapshot::default())),
        }
    }

    pub fn snapshot(&self) -> Arc<PipelineSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Moves a settled snapshot back to `Idle`, keeping its artifacts.
    ///
    /// `Success` and `Error` are not left on their own. They stay published
    /// until this is called, and a new [`run_prediction`](Self::run_prediction)
    /// is accepted from either of them without it.
    pub fn acknowledge(&self) -> Arc<PipelineSnapshot> {
        let mut guard = self.snapshot.write();
        if matches!(guard.status, RequestStatus::Success | RequestStatus::Error) {
            let mut next = (**guard).clone();
            next.status = RequestStatus::Idle;
            next.notice = None;
            *guard = Arc::new(next);
        }
        guard.clone()
    }

    pub async fn run_prediction(
        &self,
        ticker: &str,
        days: i64,
    ) -> Result<PredictionOutcome, AppError> {
        let (ticker, days) = match validate_request(ticker, days) {
            Ok(valid) => valid,
            Err(err) => return Err(self.reject_input(err)),
        };

        let sequence = self.begin(&ticker);
        info!("Prediction cycle #{} started for {} ({} days)", sequence, ticker, days);

        match self.fetch(&ticker, days).await {
            Ok((historical, prediction)) => {
                let snapshot =
                    self.build_success(sequence, ticker.clone(), days, historical, prediction);
                match self.publish(sequence, snapshot) {
                    Some(published) => {
                        info!("Prediction cycle #{} published for {}", sequence, ticker);
                        Ok(PredictionOutcome::Published(published))
                    }
                    None => Ok(PredictionOutcome::Superseded { sequence }),
                }
            }
            Err(err) => {
                let failed = PipelineSnapshot::failed(sequence, err.user_message());
                if self.publish(sequence, failed).is_none() {
                    return Ok(PredictionOutcome::Superseded { sequence });
                }
                warn!(
                    "Prediction cycle #{} for {} failed ({}): {}",
                    sequence,
                    ticker,
                    err.kind(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Fails a request whose input never reached validation as a typed pair.
    ///
    /// Takes a sequence token and publishes an emptied `Error` snapshot, the
    /// same as a request rejected by [`validate_request`].
    pub fn reject_input(&self, err: AppError) -> AppError {
        let sequence = self.reject(&err);
        warn!("Prediction request #{} rejected: {}", sequence, err);
        err
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Loading entry. Previous artifacts stay visible until the cycle settles.
    fn begin(&self, ticker: &str) -> u64 {
        let mut guard = self.snapshot.write();
        let sequence = self.next_sequence();

        let mut next = (**guard).clone();
        next.sequence = sequence;
        next.status = RequestStatus::Loading;
        next.notice = Some(Notice::loading(format!("Fetching data for {}...", ticker)));
        *guard = Arc::new(next);

        sequence
    }

    fn reject(&self, err: &AppError) -> u64 {
        let mut guard = self.snapshot.write();
        let sequence = self.next_sequence();
        *guard = Arc::new(PipelineSnapshot::failed(sequence, err.user_message()));
        sequence
    }

    fn publish(&self, sequence: u64, snapshot: PipelineSnapshot) -> Option<Arc<PipelineSnapshot>> {
        let mut guard = self.snapshot.write();
        let latest = self.sequence.load(Ordering::SeqCst);
        if latest != sequence {
            debug!("Discarding stale result of cycle #{} (latest is #{})", sequence, latest);
            return None;
        }

        let snapshot = Arc::new(snapshot);
        *guard = Arc::clone(&snapshot);
        Some(snapshot)
    }

    async fn fetch(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<(Vec<PricePoint>, PredictionResult), AppError> {
        let (historical, prediction) = tokio::try_join!(
            self.api.fetch_historical(ticker),
            self.api.fetch_prediction(ticker, days),
        )?;

        if historical.is_empty() {
            return Err(AppError::EmptyResult(EmptySource::Historical));
        }
        if prediction.forecast.is_empty() {
            return Err(AppError::EmptyResult(EmptySource::Forecast));
        }

        Ok((historical, prediction))
    }

    fn build_success(
        &self,
        sequence: u64,
        ticker: String,
        days: u32,
        historical: Vec<PricePoint>,
        prediction: PredictionResult,
    ) -> PipelineSnapshot {
        let today = (self.clock)();
        let chart = series_aligner::align(&historical, &prediction.forecast, today);
        let last_known = resolve_last_known(Some(&prediction), &historical);
        let metrics = compute_metrics(&prediction.forecast, last_known.as_ref().map(|l| l.price));
        let notice = Notice::success(format!("Successfully loaded predictions for {}!", ticker));

        PipelineSnapshot {
            sequence,
            status: RequestStatus::Success,
            ticker: Some(ticker),
            days: Some(days),
            forecast: prediction.forecast.clone(),
            historical,
            prediction: Some(prediction),
            last_known,
            chart: Some(chart),
            metrics,
            notice: Some(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_is_trimmed_and_uppercased() {
        assert_eq!(validate_request("  aapl ", 3).unwrap(), ("AAPL".to_string(), 3));
    }

    #[test]
    fn test_blank_ticker_rejected() {
        let err = validate_request("   ", 3).unwrap_err();
        assert_eq!(err.user_message(), "Please enter a stock symbol");
    }

    #[test]
    fn test_days_bounds() {
        assert!(validate_request("AAPL", 1).is_ok());
        assert!(validate_request("AAPL", 5).is_ok());
        for days in [0, -1, 6, 7] {
            let err = validate_request("AAPL", days).unwrap_err();
            assert_eq!(err.user_message(), "Days must be between 1 and 5");
        }
    }

    #[test]
    fn test_days_out_of_range_message() {
        assert_eq!(days_out_of_range().user_message(), "Days must be between 1 and 5");
        assert_eq!(days_out_of_range().kind(), "validation");
    }
}
