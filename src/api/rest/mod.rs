//! # REST API
//!
//! JSON endpoints over the settlement risk engine, served with axum.
//!
//! # Endpoints
//!
//! ## Trades
//! - `GET /api/trades` - List trades, filtered by `status` and `counterparty`
//! - `POST /api/trades` - Book a new trade
//! - `GET /api/trades/{id}` - Get trade by ID
//! - `PUT /api/trades/{id}/status` - Apply a settlement status transition
//! - `GET /api/trades/{id}/history` - Status change history
//!
//! ## Risk
//! - `GET /api/risk-metrics` - Unsettled exposure metrics
//! - `GET /api/risk-parameters` - Active risk parameters
//! - `PUT /api/risk-parameters` - Activate new limits
//! - `GET /api/risk-parameters/history` - Every activated parameter version
//! - `GET /api/breaches` - Evaluate the book against the active limits
//! - `GET /api/alerts` - Recently dispatched alerts
//! - `GET /api/settlement-fails` - Aged settlement fails, `as_of` a date
//!
//! ## Health
//! - `GET /api/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use settlement_risk::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let router = create_router(Arc::new(AppState::new(engine)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, ApiResult, AppState, BreachesResponse, CreateTradeRequest, ErrorResponse,
    FailsQuery, HealthResponse, RiskMetricsResponse, TradeQuery, TradeResponse,
    UpdateRiskParametersRequest, UpdateStatusRequest,
};
pub use routes::create_router;
