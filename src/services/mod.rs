pub mod date_normalizer;
pub mod metrics_service;
pub mod prediction_service;
pub mod series_aligner;
