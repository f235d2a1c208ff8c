use serde::{Deserialize, Serialize};

// One historical trading day as served by `/historical`.
// `date` is kept raw; see services::date_normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close,
        }
    }
}
