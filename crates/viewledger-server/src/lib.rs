use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use viewledger_core::domain::inputs::{Caller, ViewUpdate};
use viewledger_core::domain::records::TrackingRecord;
use viewledger_core::payout::cpm::cpm_payout;
use viewledger_core::tracking::error::TrackingError;
use viewledger_core::tracking::service::TrackingService;

pub mod store;

/// Header the upstream auth layer uses to forward the caller's identity.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TrackingService>,
}

/// Wire envelope: errors travel as structured results, never as panics or
/// bare status codes, so callers can render them directly.
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_status(err: &TrackingError) -> StatusCode {
    match err {
        TrackingError::CampaignNotFound(_) | TrackingError::RecordNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        TrackingError::NotOwningBrand(_) => StatusCode::FORBIDDEN,
        TrackingError::UnsupportedPaymentModel(_)
        | TrackingError::NegativeViews
        | TrackingError::AlreadyApproved(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrackingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(|user_id| Caller { user_id })
}

async fn update_views(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ViewUpdate>,
) -> (StatusCode, Json<ApiResponse<TrackingRecord>>) {
    if caller_from_headers(&headers).is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err("not authenticated")),
        );
    }
    match state.service.update_views(update).await {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record))),
        Err(err) => (error_status(&err), Json(ApiResponse::err(err.to_string()))),
    }
}

async fn approve_payout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tracking_id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse<TrackingRecord>>) {
    let Some(caller) = caller_from_headers(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::err("not authenticated")),
        );
    };
    match state.service.approve_payout(&caller, tracking_id).await {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record))),
        Err(err) => (error_status(&err), Json(ApiResponse::err(err.to_string()))),
    }
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    views: i64,
    cpm_rate: Decimal,
    max_views: i64,
}

#[derive(Debug, Serialize)]
struct PreviewPayout {
    payout: Decimal,
}

/// Non-persisting payout preview ("you would earn $X").
async fn payout_preview(
    Query(params): Query<PreviewParams>,
) -> (StatusCode, Json<ApiResponse<PreviewPayout>>) {
    let payout = cpm_payout(params.views, params.cpm_rate, params.max_views);
    (StatusCode::OK, Json(ApiResponse::ok(PreviewPayout { payout })))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/view-tracking", post(update_views))
        .route("/view-tracking/:id/approve", post(approve_payout))
        .route("/payout-preview", get(payout_preview))
        .with_state(state)
}
