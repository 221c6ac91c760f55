//! # REST Handlers
//!
//! Request handlers, DTOs and error mapping for the REST API.
//!
//! Handlers are thin: they parse input, call the [`RiskEngine`] and shape
//! the response. Decimal amounts are serialized as strings to keep them
//! exact.

use crate::application::error::ApplicationError;
use crate::application::services::{AlertRecord, RiskEngine, RiskView, TradeFilter};
use crate::domain::entities::{RiskLimits, RiskParameters, Trade, TradeBuilder};
use crate::domain::errors::DomainError;
use crate::domain::events::{BreachEvent, SettlementStatusChanged};
use crate::domain::services::{SettlementFail, SideSummary};
use crate::domain::value_objects::{OrderSide, SettlementStatus, TradeId, Timestamp};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Number of largest unsettled trades listed with the risk metrics.
pub const TOP_UNSETTLED_TRADES: usize = 5;

// ============================================================================
// State
// ============================================================================

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The risk engine.
    pub engine: Arc<RiskEngine>,
}

impl AppState {
    /// Creates handler state around `engine`.
    #[must_use]
    pub fn new(engine: Arc<RiskEngine>) -> Self {
        Self { engine }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// REST API error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request conflicts with current state (409).
    #[error("{0}")]
    Conflict(String),

    /// Malformed or invalid request (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else if err.is_conflict() {
            Self::Conflict(err.to_string())
        } else if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            tracing::error!(error = %err, "request failed");
            Self::Internal("internal server error".to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApplicationError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

fn parse_trade_id(raw: &str) -> ApiResult<TradeId> {
    raw.parse::<TradeId>()
        .map_err(|_| ApiError::bad_request(format!("invalid trade id: {raw}")))
}

fn parse_status(raw: &str) -> ApiResult<SettlementStatus> {
    raw.parse::<SettlementStatus>()
        .map_err(|e| ApiError::bad_request(e.to_string()))
}

// ============================================================================
// DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Number of booked trades.
    pub trades: usize,
    /// Active risk parameter version.
    pub parameters_version: u64,
}

/// Trade list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeQuery {
    /// Settlement status.
    pub status: Option<String>,
    /// Counterparty name.
    pub counterparty: Option<String>,
}

/// Trade with derived amounts.
#[derive(Debug, Clone, Serialize)]
pub struct TradeResponse {
    /// The trade record.
    #[serde(flatten)]
    pub trade: Trade,
    /// `quantity × price`.
    pub notional: Decimal,
    /// Cash amount at settlement.
    pub net_money: Decimal,
}

impl TryFrom<Trade> for TradeResponse {
    type Error = ApiError;

    fn try_from(trade: Trade) -> Result<Self, Self::Error> {
        let notional = trade.notional().map_err(DomainError::from)?;
        let net_money = trade.net_money().map_err(DomainError::from)?;
        Ok(Self {
            trade,
            notional,
            net_money,
        })
    }
}

fn trade_responses(trades: Vec<Trade>) -> ApiResult<Vec<TradeResponse>> {
    trades.into_iter().map(TradeResponse::try_from).collect()
}

/// New trade request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTradeRequest {
    /// Trade identifier.
    pub id: u64,
    /// `BUY` or `SELL`.
    pub buy_sell_indicator: OrderSide,
    /// Quantity.
    pub quantity: Decimal,
    /// Price.
    pub price: Decimal,
    /// Counterparty name.
    pub counterparty_name: String,
    /// Counterparty DTC number.
    #[serde(default)]
    pub counterparty_dtc_number: String,
    /// Product type.
    #[serde(default)]
    pub product_type: String,
    /// CUSIP.
    #[serde(default)]
    pub cusip: String,
    /// ISIN.
    #[serde(default)]
    pub isin: String,
    /// Trade date; today when absent.
    pub trade_date: Option<NaiveDate>,
    /// Settlement date; the trade date when absent.
    pub settlement_date: Option<NaiveDate>,
    /// Account number.
    #[serde(default)]
    pub account_number: String,
    /// Currency; `USD` when absent.
    pub currency: Option<String>,
    /// Accrued interest.
    #[serde(default)]
    pub accrued_interest: Decimal,
    /// Fees.
    #[serde(default)]
    pub fees: Decimal,
    /// Settlement location.
    #[serde(default)]
    pub settlement_location: String,
}

impl CreateTradeRequest {
    fn into_trade(self) -> ApiResult<Trade> {
        let trade_date = self.trade_date.unwrap_or_else(|| Timestamp::now().date());
        let settlement_date = self.settlement_date.unwrap_or(trade_date);

        let mut builder = TradeBuilder::new(
            TradeId::new(self.id),
            self.buy_sell_indicator,
            self.quantity,
            self.price,
        )
        .counterparty(self.counterparty_dtc_number, self.counterparty_name)
        .dates(trade_date, settlement_date)
        .product_type(self.product_type)
        .security(self.cusip, self.isin)
        .account_number(self.account_number)
        .accrued_interest(self.accrued_interest)
        .fees(self.fees)
        .settlement_location(self.settlement_location);
        if let Some(currency) = self.currency {
            builder = builder.currency(currency);
        }

        Ok(builder.try_build()?)
    }
}

/// Status update request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status (`SETTLED`, `FAILED`, `CANCELLED`).
    pub status: String,
}

/// Risk metrics response.
#[derive(Debug, Clone, Serialize)]
pub struct RiskMetricsResponse {
    /// Number of unsettled trades.
    pub total_unsettled_trades: u64,
    /// Counterparty name → unsettled exposure.
    pub counterparty_exposure: BTreeMap<String, Decimal>,
    /// Notional of the largest unsettled trade.
    pub largest_unsettled_trade: Decimal,
    /// Id of the largest unsettled trade.
    pub largest_unsettled_trade_id: Option<TradeId>,
    /// Total unsettled notional.
    pub total_unsettled_notional: Decimal,
    /// Unsettled buys.
    pub buy: SideSummary,
    /// Unsettled sells.
    pub sell: SideSummary,
    /// Counterparty name → unsettled trade count.
    pub counterparty_trade_counts: BTreeMap<String, u64>,
    /// Largest unsettled trades, largest first.
    pub top_unsettled_trades: Vec<TradeResponse>,
    /// Computation time.
    pub computed_at: Timestamp,
}

/// Risk parameter replacement request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRiskParametersRequest {
    /// Maximum number of unsettled trades.
    pub max_unsettled_trades: u64,
    /// Maximum unsettled exposure to one counterparty.
    pub max_counterparty_exposure: Decimal,
    /// Maximum notional of a single unsettled trade.
    pub max_single_trade_value: Decimal,
}

/// Breach evaluation response.
#[derive(Debug, Clone, Serialize)]
pub struct BreachesResponse {
    /// Parameter version evaluated against.
    pub parameters_version: u64,
    /// Metrics computation time.
    pub computed_at: Timestamp,
    /// Detected breaches.
    pub breaches: Vec<BreachEvent>,
}

/// Settlement fails query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailsQuery {
    /// Report date; today when absent.
    pub as_of: Option<NaiveDate>,
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        trades: state.engine.trade_count(),
        parameters_version: state.engine.parameters().version(),
    })
}

/// `GET /api/trades`
pub async fn list_trades(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TradeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TradeResponse>>> {
    let Query(query) = query?;
    let filter = TradeFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        counterparty: query.counterparty,
    };
    Ok(Json(trade_responses(state.engine.trades(&filter))?))
}

/// `POST /api/trades`
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTradeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TradeResponse>)> {
    let Json(request) = payload?;
    let trade = state.engine.book_trade(request.into_trade()?)?;
    Ok((StatusCode::CREATED, Json(TradeResponse::try_from(trade)?)))
}

/// `GET /api/trades/{id}`
pub async fn get_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TradeResponse>> {
    let trade = state.engine.trade(parse_trade_id(&id)?)?;
    Ok(Json(TradeResponse::try_from(trade)?))
}

/// `PUT /api/trades/{id}/status`
pub async fn update_trade_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<SettlementStatusChanged>> {
    let Json(request) = payload?;
    let id = parse_trade_id(&id)?;
    let status = parse_status(&request.status)?;
    Ok(Json(state.engine.update_status(id, status)?))
}

/// `GET /api/trades/{id}/history`
pub async fn trade_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SettlementStatusChanged>>> {
    Ok(Json(state.engine.history(parse_trade_id(&id)?)?))
}

/// `GET /api/risk-metrics`
pub async fn risk_metrics(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RiskMetricsResponse>> {
    let RiskView {
        metrics,
        top_unsettled,
    } = state.engine.risk_view(TOP_UNSETTLED_TRADES)?;

    Ok(Json(RiskMetricsResponse {
        total_unsettled_trades: metrics.unsettled_count,
        counterparty_exposure: metrics.counterparty_exposure,
        largest_unsettled_trade: metrics.largest_unsettled_trade,
        largest_unsettled_trade_id: metrics.largest_unsettled_trade_id,
        total_unsettled_notional: metrics.total_unsettled_notional,
        buy: metrics.buy,
        sell: metrics.sell,
        counterparty_trade_counts: metrics.counterparty_trade_counts,
        top_unsettled_trades: trade_responses(top_unsettled)?,
        computed_at: metrics.computed_at,
    }))
}

/// `GET /api/risk-parameters`
pub async fn get_risk_parameters(State(state): State<Arc<AppState>>) -> Json<RiskParameters> {
    Json(state.engine.parameters().as_ref().clone())
}

/// `GET /api/risk-parameters/history`
pub async fn risk_parameter_history(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RiskParameters>> {
    Json(
        state
            .engine
            .parameter_history()
            .iter()
            .map(|p| p.as_ref().clone())
            .collect(),
    )
}

/// `PUT /api/risk-parameters`
pub async fn update_risk_parameters(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateRiskParametersRequest>, JsonRejection>,
) -> ApiResult<Json<RiskParameters>> {
    let Json(request) = payload?;
    let limits = RiskLimits::new(
        request.max_unsettled_trades,
        request.max_counterparty_exposure,
        request.max_single_trade_value,
    )?;

    let params = state.engine.replace_parameters(limits);
    Ok(Json(params.as_ref().clone()))
}

/// `GET /api/breaches`
pub async fn breaches(State(state): State<Arc<AppState>>) -> ApiResult<Json<BreachesResponse>> {
    let evaluation = state.engine.evaluate()?;
    Ok(Json(BreachesResponse {
        parameters_version: evaluation.parameters.version(),
        computed_at: evaluation.metrics.computed_at,
        breaches: evaluation.breaches,
    }))
}

/// `GET /api/alerts`
pub async fn recent_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<AlertRecord>> {
    Json(state.engine.recent_alerts())
}

/// `GET /api/settlement-fails`
pub async fn settlement_fails(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FailsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SettlementFail>>> {
    let Query(query) = query?;
    let as_of = query.as_of.unwrap_or_else(|| Timestamp::now().date());
    Ok(Json(state.engine.settlement_fails(as_of)?))
}
