mod price_point;
mod forecast;
mod chart;
mod metrics;
mod snapshot;

pub use price_point::PricePoint;
pub use forecast::{ForecastPoint, LastKnown, PredictionResult};
pub use chart::AlignedSeries;
pub use metrics::{DayMetric, MetricsSummary, PriceRange, Trend};
pub use snapshot::{Notice, NoticeLevel, PipelineSnapshot, RequestStatus};
