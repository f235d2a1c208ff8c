use serde::{Deserialize, Serialize};

use super::{AlignedSeries, ForecastPoint, LastKnown, MetricsSummary, PredictionResult, PricePoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Loading,
    Success,
    Error,
}

/// User-visible notification attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn loading(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Loading, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Everything a presentation layer needs, published as one immutable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub sequence: u64,
    pub status: RequestStatus,
    pub ticker: Option<String>,
    pub days: Option<u32>,
    pub historical: Vec<PricePoint>,
    pub forecast: Vec<ForecastPoint>,
    pub prediction: Option<PredictionResult>,
    pub last_known: Option<LastKnown>,
    pub chart: Option<AlignedSeries>,
    pub metrics: Option<MetricsSummary>,
    pub notice: Option<Notice>,
}

impl PipelineSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// Error snapshot: every artifact cleared.
    pub fn failed(sequence: u64, message: impl Into<String>) -> Self {
        Self {
            sequence,
            status: RequestStatus::Error,
            notice: Some(Notice::error(message)),
            ..Self::default()
        }
    }
}
