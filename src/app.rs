use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::routes::{health, predictions};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/predictions", predictions::router())
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::external::stock_api::{StockApiError, StockDataApi};
    use crate::models::{ForecastPoint, PredictionResult, PricePoint};
    use crate::services::prediction_service::PredictionOrchestrator;

    struct FixedApi;

    #[async_trait]
    impl StockDataApi for FixedApi {
        async fn fetch_historical(&self, ticker: &str) -> Result<Vec<PricePoint>, StockApiError> {
            if ticker == "NOPE" {
                return Err(StockApiError::Upstream("No data found for ticker".into()));
            }
            Ok(vec![
                PricePoint::new("2024-11-21", 101.0),
                PricePoint::new("2024-11-22", 102.0),
            ])
        }

        async fn fetch_prediction(
            &self,
            _ticker: &str,
            days: u32,
        ) -> Result<PredictionResult, StockApiError> {
            Ok(PredictionResult {
                forecast: (1..=days)
                    .map(|d| ForecastPoint::new(d, format!("2024-11-2{}", 2 + d), 102.0 + d as f64))
                    .collect(),
                last_known_price: Some(102.0),
                last_known_date: Some("2024-11-22".into()),
                ..Default::default()
            })
        }
    }

    fn setup_test_app() -> Router {
        let clock = Arc::new(|| NaiveDate::from_ymd_opt(2024, 11, 22).unwrap());
        let orchestrator = PredictionOrchestrator::with_clock(Arc::new(FixedApi), clock);
        create_app(AppState { orchestrator: Arc::new(orchestrator) })
    }

    fn post_prediction(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_test_app();
        let response = app.clone().oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["pipeline"], "idle");
        assert_eq!(body["sequence"], 0);

        app.clone()
            .oneshot(post_prediction(json!({"ticker": "AAPL", "days": 1})))
            .await
            .unwrap();
        let body = body_json(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["pipeline"], "success");
        assert_eq!(body["sequence"], 1);
    }

    #[tokio::test]
    async fn test_prediction_returns_render_ready_snapshot() {
        let response = setup_test_app()
            .oneshot(post_prediction(json!({"ticker": "aapl", "days": 2})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["chart"]["labels"].as_array().unwrap().len(), 4);
        assert_eq!(body["chart"]["today_index"], 1);
        assert_eq!(body["chart"]["historical"][1], Value::Null);
        assert_eq!(body["metrics"]["per_day"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let response = setup_test_app()
            .oneshot(post_prediction(json!({"ticker": "AAPL", "days": 7})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Days must be between 1 and 5");
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_malformed_days_fail_validation_and_clear_latest() {
        for body in [
            json!({"ticker": "AAPL", "days": 2.5}),
            json!({"ticker": "AAPL"}),
            json!({"ticker": "AAPL", "days": "3"}),
            json!({"ticker": "AAPL", "days": null}),
        ] {
            let app = setup_test_app();
            let ok = app
                .clone()
                .oneshot(post_prediction(json!({"ticker": "AAPL", "days": 2})))
                .await
                .unwrap();
            assert_eq!(ok.status(), StatusCode::OK);

            let response = app.clone().oneshot(post_prediction(body.clone())).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
            let error = body_json(response).await;
            assert_eq!(error["error"], "Days must be between 1 and 5");
            assert_eq!(error["kind"], "validation");

            let latest = app.oneshot(get("/api/predictions/latest")).await.unwrap();
            let latest = body_json(latest).await;
            assert_eq!(latest["status"], "error");
            assert_eq!(latest["sequence"], 2);
            assert_eq!(latest["metrics"], Value::Null);
            assert_eq!(latest["chart"], Value::Null);
            assert_eq!(latest["notice"]["message"], "Days must be between 1 and 5");
        }
    }

    #[tokio::test]
    async fn test_missing_ticker_is_reported_before_malformed_days() {
        let response = setup_test_app()
            .oneshot(post_prediction(json!({"days": "3"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a stock symbol");
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_non_string_ticker_is_blank() {
        let response = setup_test_app()
            .oneshot(post_prediction(json!({"ticker": 42, "days": 3})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Please enter a stock symbol");
    }

    #[tokio::test]
    async fn test_unreadable_body_fails_validation_and_clears_latest() {
        let app = setup_test_app();
        app.clone()
            .oneshot(post_prediction(json!({"ticker": "AAPL", "days": 2})))
            .await
            .unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"ticker\": "))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid prediction request");

        let latest = body_json(app.oneshot(get("/api/predictions/latest")).await.unwrap()).await;
        assert_eq!(latest["status"], "error");
        assert_eq!(latest["metrics"], Value::Null);
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_gateway_and_clears_latest() {
        let app = setup_test_app();

        let response = app
            .clone()
            .oneshot(post_prediction(json!({"ticker": "NOPE", "days": 3})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(app.oneshot(get("/api/predictions/latest")).await.unwrap()).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["historical"].as_array().unwrap().len(), 0);
        assert_eq!(body["metrics"], Value::Null);
        assert_eq!(body["notice"]["message"], "Please enter a valid stock symbol");
    }

    #[tokio::test]
    async fn test_acknowledge_returns_to_idle() {
        let app = setup_test_app();
        app.clone()
            .oneshot(post_prediction(json!({"ticker": "MSFT", "days": 1})))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predictions/acknowledge")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "idle");
        assert_eq!(body["notice"], Value::Null);
        assert_eq!(body["ticker"], "MSFT");
    }
}
