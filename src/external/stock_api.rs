use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PredictionResult, PricePoint};

#[derive(Debug, Error)]
pub enum StockApiError {
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with an explicit `error` field.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("decode error: {0}")]
    Decode(String),
}

/// Upstream contract of the StockVision data service.
#[async_trait]
pub trait StockDataApi: Send + Sync {
    /// `GET /historical?ticker=`. A missing `prices` array yields an empty vector.
    async fn fetch_historical(&self, ticker: &str) -> Result<Vec<PricePoint>, StockApiError>;

    /// `GET /predict?ticker=&days=`. A missing `forecast` array yields an empty vector.
    async fn fetch_prediction(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<PredictionResult, StockApiError>;
}
