//! # REST Routes
//!
//! Router construction.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::routing::{get, put};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the API router with CORS and request tracing.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/trades",
            get(handlers::list_trades).post(handlers::create_trade),
        )
        .route("/api/trades/{id}", get(handlers::get_trade))
        .route(
            "/api/trades/{id}/status",
            put(handlers::update_trade_status),
        )
        .route("/api/trades/{id}/history", get(handlers::trade_history))
        .route("/api/risk-metrics", get(handlers::risk_metrics))
        .route(
            "/api/risk-parameters",
            get(handlers::get_risk_parameters).put(handlers::update_risk_parameters),
        )
        .route(
            "/api/risk-parameters/history",
            get(handlers::risk_parameter_history),
        )
        .route("/api/breaches", get(handlers::breaches))
        .route("/api/alerts", get(handlers::recent_alerts))
        .route("/api/settlement-fails", get(handlers::settlement_fails))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{AlertDispatcher, DispatcherConfig, RiskEngine};
    use crate::domain::entities::{RiskLimits, RiskParameters};
    use crate::domain::services::ThresholdPolicy;
    use crate::infrastructure::notifications::LogNotifier;
    use crate::infrastructure::persistence::InMemoryTradeStore;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use tower::ServiceExt;

    fn router() -> Router {
        let limits = RiskLimits::new(
            150,
            Decimal::new(1_000_000, 0),
            Decimal::new(2_000_000, 0),
        )
        .unwrap();
        let engine = RiskEngine::new(
            Arc::new(InMemoryTradeStore::new()),
            ThresholdPolicy::new(RiskParameters::initial("default", limits)),
            AlertDispatcher::new(
                Arc::new(LogNotifier),
                DispatcherConfig::default().with_recipients(vec!["risk@example.com".to_string()]),
            ),
        );
        create_router(Arc::new(AppState::new(Arc::new(engine))))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn trade_json(id: u64, quantity: u64, price: &str, counterparty: &str) -> Value {
        json!({
            "id": id,
            "buy_sell_indicator": "BUY",
            "quantity": quantity,
            "price": price,
            "counterparty_name": counterparty,
            "counterparty_dtc_number": "0005",
            "cusip": "037833100",
            "trade_date": "2024-03-01",
            "settlement_date": "2024-03-05"
        })
    }

    fn decimal(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    async fn seeded() -> Router {
        let router = router();
        for body in [
            trade_json(1, 100, "50.25", "Party A"),
            trade_json(2, 50, "20000", "Party B"),
        ] {
            let (status, _) = send(&router, Method::POST, "/api/trades", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        router
    }

    mod trades {
        use super::*;

        #[tokio::test]
        async fn create_and_fetch() {
            let router = seeded().await;

            let (status, body) = send(&router, Method::GET, "/api/trades/2", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["counterparty_name"], "Party B");
            assert_eq!(body["settlement_status"], "PENDING");
            assert_eq!(decimal(&body["notional"]), Decimal::new(1_000_000, 0));
        }

        #[tokio::test]
        async fn duplicate_id_conflicts() {
            let router = seeded().await;
            let (status, body) = send(
                &router,
                Method::POST,
                "/api/trades",
                Some(trade_json(1, 1, "1", "Party C")),
            )
            .await;
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body["error"], "CONFLICT");
        }

        #[tokio::test]
        async fn invalid_trade_is_bad_request() {
            let router = router();
            let (status, body) = send(
                &router,
                Method::POST,
                "/api/trades",
                Some(trade_json(1, 10, "10", "  ")),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "BAD_REQUEST");
        }

        #[tokio::test]
        async fn unrepresentable_notional_is_bad_request() {
            let router = router();
            let (status, body) = send(
                &router,
                Method::POST,
                "/api/trades",
                Some(trade_json(1, 2, "79228162514264337593543950335", "Party A")),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "BAD_REQUEST");
            assert!(
                body["message"]
                    .as_str()
                    .unwrap()
                    .contains("not representable")
            );

            let (_, body) = send(&router, Method::GET, "/api/trades", None).await;
            assert!(body.as_array().unwrap().is_empty());
        }

        #[tokio::test]
        async fn malformed_body_is_bad_request() {
            let router = router();
            let (status, body) = send(
                &router,
                Method::POST,
                "/api/trades",
                Some(json!({"id": "x"})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "BAD_REQUEST");
        }

        #[tokio::test]
        async fn unknown_trade_is_not_found() {
            let router = router();
            let (status, body) = send(&router, Method::GET, "/api/trades/42", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "NOT_FOUND");
        }

        #[tokio::test]
        async fn non_numeric_id_is_bad_request() {
            let router = router();
            let (status, _) = send(&router, Method::GET, "/api/trades/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn filter_by_status() {
            let router = seeded().await;
            send(
                &router,
                Method::PUT,
                "/api/trades/1/status",
                Some(json!({"status": "SETTLED"})),
            )
            .await;

            let (status, body) =
                send(&router, Method::GET, "/api/trades?status=PENDING", None).await;
            assert_eq!(status, StatusCode::OK);
            let trades = body.as_array().unwrap();
            assert_eq!(trades.len(), 1);
            assert_eq!(trades[0]["id"], 2);

            let (status, _) = send(&router, Method::GET, "/api/trades?status=LOST", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    mod status {
        use super::*;

        #[tokio::test]
        async fn settle_then_reject_second_transition() {
            let router = seeded().await;

            let (status, body) = send(
                &router,
                Method::PUT,
                "/api/trades/1/status",
                Some(json!({"status": "SETTLED"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["from"], "PENDING");
            assert_eq!(body["to"], "SETTLED");

            let (status, _) = send(
                &router,
                Method::PUT,
                "/api/trades/1/status",
                Some(json!({"status": "FAILED"})),
            )
            .await;
            assert_eq!(status, StatusCode::CONFLICT);

            let (status, body) =
                send(&router, Method::GET, "/api/trades/1/history", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body.as_array().unwrap().len(), 1);
        }

        #[tokio::test]
        async fn unknown_status_is_bad_request() {
            let router = seeded().await;
            let (status, _) = send(
                &router,
                Method::PUT,
                "/api/trades/1/status",
                Some(json!({"status": "MAYBE"})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    mod risk {
        use super::*;

        #[tokio::test]
        async fn metrics_use_legacy_keys() {
            let router = seeded().await;
            let (status, body) = send(&router, Method::GET, "/api/risk-metrics", None).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["total_unsettled_trades"], 2);
            assert_eq!(
                decimal(&body["counterparty_exposure"]["Party A"]),
                Decimal::new(5025, 0)
            );
            assert_eq!(
                decimal(&body["largest_unsettled_trade"]),
                Decimal::new(1_000_000, 0)
            );
            assert_eq!(body["largest_unsettled_trade_id"], 2);
            assert_eq!(body["top_unsettled_trades"][0]["id"], 2);
        }

        #[tokio::test]
        async fn saturated_exposure_is_reported_and_breached() {
            let router = router();
            for id in 1..=3 {
                let (status, _) = send(
                    &router,
                    Method::POST,
                    "/api/trades",
                    Some(trade_json(id, 1, "30000000000000000000000000000", "Party Y")),
                )
                .await;
                assert_eq!(status, StatusCode::CREATED);
            }

            let (status, body) = send(&router, Method::GET, "/api/risk-metrics", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                decimal(&body["counterparty_exposure"]["Party Y"]),
                Decimal::MAX
            );

            let (status, body) = send(&router, Method::GET, "/api/breaches", None).await;
            assert_eq!(status, StatusCode::OK);
            let breaches = body["breaches"].as_array().unwrap();
            assert!(breaches.iter().any(|b| {
                b["kind"] == "EXPOSURE_BREACH" && b["counterparty"] == "Party Y"
            }));
        }

        #[tokio::test]
        async fn empty_book_reports_zero() {
            let router = router();
            let (_, body) = send(&router, Method::GET, "/api/risk-metrics", None).await;
            assert_eq!(body["total_unsettled_trades"], 0);
            assert_eq!(decimal(&body["largest_unsettled_trade"]), Decimal::ZERO);
            assert!(body["largest_unsettled_trade_id"].is_null());
        }

        #[tokio::test]
        async fn lowering_limits_surfaces_breaches() {
            let router = seeded().await;

            let (_, body) = send(&router, Method::GET, "/api/breaches", None).await;
            assert!(body["breaches"].as_array().unwrap().is_empty());

            let (status, body) = send(
                &router,
                Method::PUT,
                "/api/risk-parameters",
                Some(json!({
                    "max_unsettled_trades": 150,
                    "max_counterparty_exposure": "500000",
                    "max_single_trade_value": "750000"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["version"], 2);

            let (_, body) = send(&router, Method::GET, "/api/breaches", None).await;
            assert_eq!(body["parameters_version"], 2);
            assert_eq!(body["breaches"].as_array().unwrap().len(), 2);

            let (_, body) =
                send(&router, Method::GET, "/api/risk-parameters/history", None).await;
            let history = body.as_array().unwrap();
            assert_eq!(history.len(), 2);
            assert_eq!(history[0]["version"], 1);
        }

        #[tokio::test]
        async fn invalid_limits_rejected() {
            let router = router();
            let (status, _) = send(
                &router,
                Method::PUT,
                "/api/risk-parameters",
                Some(json!({
                    "max_unsettled_trades": 0,
                    "max_counterparty_exposure": "1",
                    "max_single_trade_value": "1"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let (_, body) = send(&router, Method::GET, "/api/risk-parameters", None).await;
            assert_eq!(body["version"], 1);
        }
    }

    mod reports {
        use super::*;

        #[tokio::test]
        async fn settlement_fails_as_of_date() {
            let router = seeded().await;
            send(
                &router,
                Method::PUT,
                "/api/trades/2/status",
                Some(json!({"status": "FAILED"})),
            )
            .await;

            let (status, body) = send(
                &router,
                Method::GET,
                "/api/settlement-fails?as_of=2024-03-08",
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let fails = body.as_array().unwrap();
            assert_eq!(fails.len(), 2);
            assert_eq!(fails[0]["fail_days"], 3);

            let (status, _) = send(
                &router,
                Method::GET,
                "/api/settlement-fails?as_of=yesterday",
                None,
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn health_and_alerts() {
            let router = seeded().await;
            let (status, body) = send(&router, Method::GET, "/api/health", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");
            assert_eq!(body["trades"], 2);

            let (status, body) = send(&router, Method::GET, "/api/alerts", None).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.as_array().unwrap().is_empty());
        }
    }
}
