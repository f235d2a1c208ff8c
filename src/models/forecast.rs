use serde::{Deserialize, Serialize};

/// Single step of the forecast horizon returned by `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub day: u32,
    pub date: String,
    pub predicted_price: f64,
}

impl ForecastPoint {
    pub fn new(day: u32, date: impl Into<String>, predicted_price: f64) -> Self {
        Self {
            day,
            date: date.into(),
            predicted_price,
        }
    }
}

/// Response envelope of the prediction service.
///
/// `ticker` and `days` are echoed back by the service but are not
/// required by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

/// Last actual close the forecast is anchored on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastKnown {
    pub price: f64,
    pub date: Option<String>,
}
