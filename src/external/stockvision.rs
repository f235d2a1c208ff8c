use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::external::stock_api::{StockApiError, StockDataApi};
use crate::models::{ForecastPoint, PredictionResult, PricePoint};

pub struct StockVisionClient {
    client: reqwest::Client,
    base_url: String,
}

impl StockVisionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, StockApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StockApiError::Network(e.to_string()))?;

        Ok(Self::with_client(client, config.base_url.as_str()))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, StockApiError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| StockApiError::Network(e.to_string()))?;

        // Status is not checked: the service reports failures in the body.
        debug!("{} answered with HTTP {}", path, resp.status());

        let body: Value = resp
            .json()
            .await
            .map_err(|e| StockApiError::Decode(e.to_string()))?;

        if let Some(err) = body.get("error").filter(|v| is_truthy(v)) {
            return Err(StockApiError::Upstream(error_text(err)));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    prices: Option<Vec<PricePoint>>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    forecast: Option<Vec<ForecastPoint>>,
    #[serde(default)]
    last_known_price: Option<f64>,
    #[serde(default)]
    last_known_date: Option<String>,
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    days: Option<u32>,
}

#[async_trait]
impl StockDataApi for StockVisionClient {
    async fn fetch_historical(&self, ticker: &str) -> Result<Vec<PricePoint>, StockApiError> {
        let body = self.get_json("/historical", &[("ticker", ticker)]).await?;

        let parsed: HistoricalResponse = serde_json::from_value(body)
            .map_err(|e| StockApiError::Decode(e.to_string()))?;

        Ok(parsed.prices.unwrap_or_default())
    }

    async fn fetch_prediction(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<PredictionResult, StockApiError> {
        let days = days.to_string();
        let body = self
            .get_json("/predict", &[("ticker", ticker), ("days", days.as_str())])
            .await?;

        let parsed: PredictResponse = serde_json::from_value(body)
            .map_err(|e| StockApiError::Decode(e.to_string()))?;

        Ok(PredictionResult {
            forecast: parsed.forecast.unwrap_or_default(),
            last_known_price: parsed.last_known_price,
            last_known_date: parsed.last_known_date,
            ticker: parsed.ticker,
            days: parsed.days,
        })
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
