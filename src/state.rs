use std::sync::Arc;

use crate::services::prediction_service::PredictionOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PredictionOrchestrator>,
}
