use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use market_registry::error::AppError;
use market_registry::registry::{
    LogEntry, MarketRecord, MarketStatus, MarketSubmission, NewUser, RegistrySnapshot, Role, User,
    VendorRecord, VendorStatus, VendorSubmission,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Status change request. The actor's role travels in the body; the original
/// client knows the logged-in role and there is no session layer.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketStatusRequest {
    pub(crate) role: Role,
    pub(crate) status: MarketStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorStatusRequest {
    pub(crate) role: Role,
    pub(crate) status: VendorStatus,
    #[serde(default)]
    pub(crate) stall_no: Option<String>,
}

pub(crate) fn registry_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/markets", get(list_markets).post(create_market))
        .route("/api/markets/:id/status", patch(market_status))
        .route("/api/vendors", get(list_vendors).post(create_vendor))
        .route("/api/vendors/:id/status", patch(vendor_status))
        .route("/api/users", get(list_users))
        .route("/api/logs", get(list_logs))
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.registry.login(&payload.email, &payload.password)?;
    Ok(Json(user))
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    let user = state.registry.register_user(payload)?;
    Ok(Json(user))
}

pub(crate) async fn list_markets(
    State(state): State<AppState>,
) -> Result<Json<Vec<MarketRecord>>, AppError> {
    Ok(Json(state.registry.markets()?))
}

pub(crate) async fn create_market(
    State(state): State<AppState>,
    Json(submission): Json<MarketSubmission>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state.registry.register_market(submission)?;
    Ok(Json(json!({ "ref_no": record.ref_no })))
}

pub(crate) async fn market_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MarketStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .registry
        .market_transition(payload.role, id, payload.status)?;
    Ok(Json(json!({ "success": true })))
}

pub(crate) async fn list_vendors(
    State(state): State<AppState>,
) -> Result<Json<Vec<VendorRecord>>, AppError> {
    Ok(Json(state.registry.vendors()?))
}

pub(crate) async fn create_vendor(
    State(state): State<AppState>,
    Json(submission): Json<VendorSubmission>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state.registry.register_vendor(submission)?;
    Ok(Json(json!({ "ref_no": record.ref_no })))
}

pub(crate) async fn vendor_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<VendorStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.registry.vendor_transition(
        payload.role,
        id,
        payload.status,
        payload.stall_no.as_deref(),
    )?;
    Ok(Json(json!({ "success": true })))
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.registry.users()?))
}

pub(crate) async fn list_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    Ok(Json(state.registry.logs()?))
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<RegistrySnapshot>, AppError> {
    Ok(Json(state.registry.dashboard()?))
}
