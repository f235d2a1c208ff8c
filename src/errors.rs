use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::external::stock_api::StockApiError;

/// Which upstream payload came back without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySource {
    Historical,
    Forecast,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Empty result: no {0:?} data returned")]
    EmptyResult(EmptySource),
}

impl AppError {
    /// Text shown to the user for a failed cycle.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::EmptyResult(EmptySource::Forecast) => {
                "Failed to generate predictions".to_string()
            }
            AppError::EmptyResult(EmptySource::Historical)
            | AppError::Network(_)
            | AppError::Upstream(_) => "Please enter a valid stock symbol".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Network(_) => "network",
            AppError::Upstream(_) => "upstream",
            AppError::EmptyResult(_) => "empty_result",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyResult(_) => StatusCode::NOT_FOUND,
            AppError::Network(_) | AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.user_message(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

impl From<StockApiError> for AppError {
    fn from(value: StockApiError) -> Self {
        match value {
            StockApiError::Upstream(msg) => AppError::Upstream(msg),
            StockApiError::Network(msg) => AppError::Network(msg),
            StockApiError::Decode(msg) => {
                AppError::Network(format!("undecodable response: {}", msg))
            }
        }
    }
}
