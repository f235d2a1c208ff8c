use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

/// Change of one forecast day against its baseline price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMetric {
    pub day: u32,
    pub date: String,
    pub predicted_price: f64,
    pub previous_price: f64,
    pub delta: f64,
    /// `None` when the baseline is zero.
    pub percentage: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub per_day: Vec<DayMetric>,
    pub range: PriceRange,
    pub aggregate_change_percent: f64,
    pub last_known_price: f64,
    pub horizon: usize,
}
