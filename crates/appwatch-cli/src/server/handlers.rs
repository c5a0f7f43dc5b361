//! Request handlers.

use appwatch_core::AdhocRequest;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{AppState, error::ApiError};

/// `POST /api/check-update`
///
/// An unreadable body is treated as an empty one, so the caller gets the
/// same "appId is required" answer as for a missing field.
#[instrument(skip_all)]
pub async fn check_update(
    State(state): State<AppState>,
    payload: Result<Json<AdhocRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = payload.map_or_else(
        |rejection| {
            debug!(reason = %rejection, "Unreadable request body");
            AdhocRequest::default()
        },
        |Json(req)| req,
    );

    let summary = state.adhoc.check_and_notify(&request).await?;
    Ok(Json(json!({
        "success": true,
        "data": summary,
        "message": "Update checked and notification sent",
    })))
}

/// `POST /api/check-updates`
#[instrument(skip_all)]
pub async fn check_updates(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tracker = state.tracker.as_ref().ok_or(ApiError::TrackingDisabled)?;
    let report = tracker.run().await.map_err(ApiError::Tracking)?;
    Ok(Json(json!({
        "success": true,
        "checked": report.checked,
        "updates": report.updates,
    })))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// Any method other than the one a route accepts.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
