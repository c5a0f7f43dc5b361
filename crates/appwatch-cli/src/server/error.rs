//! Mapping of check failures onto HTTP responses.

use appwatch_core::CheckError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Body returned for any failed persistent check. The cause is logged.
pub const TRACKING_FAILED: &str = "Failed to check for updates";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Ad-hoc check failure; the message is returned to the caller.
    #[error(transparent)]
    Adhoc(#[from] CheckError),

    #[error("Persistent check failed: {0}")]
    Tracking(#[source] CheckError),

    #[error("Persistent check is not configured")]
    TrackingDisabled,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Adhoc(CheckError::Missing(_)) => StatusCode::BAD_REQUEST,
            Self::Adhoc(CheckError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Adhoc(_) | Self::Tracking(_) | Self::TrackingDisabled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Tracking(_) | Self::TrackingDisabled => {
                error!(error = %self, "Error checking updates");
                TRACKING_FAILED.to_string()
            }
            Self::Adhoc(e) if status.is_server_error() => {
                error!(error = %e, "Error in check-update");
                let text = e.to_string();
                if text.is_empty() {
                    "Internal server error".to_string()
                } else {
                    text
                }
            }
            _ => {
                warn!(status = status.as_u16(), error = %self, "Request rejected");
                self.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_lookup_statuses() {
        assert_eq!(
            ApiError::from(CheckError::Missing("appId")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CheckError::NotFound {
                app_id: "1".into()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::TrackingDisabled.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(
            ApiError::from(CheckError::Missing("webhookUrl")).to_string(),
            "webhookUrl is required"
        );
        assert_eq!(ApiError::MethodNotAllowed.to_string(), "Method not allowed");
    }
}
