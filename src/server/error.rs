//! Response envelope and the mapping from pipeline errors to HTTP statuses.

use crate::error::EnhanceError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{success, data?, error?}`, shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be parsed.
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Pipeline(#[from] EnhanceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(e) => match e {
                EnhanceError::Validation(_) | EnhanceError::InvalidUrl { .. } => {
                    StatusCode::BAD_REQUEST
                }
                EnhanceError::FetchFailed { .. } | EnhanceError::InsufficientContent { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                EnhanceError::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                EnhanceError::ProviderError { .. } => StatusCode::BAD_GATEWAY,
                EnhanceError::RenderFailed(_)
                | EnhanceError::OutputWriteFailed { .. }
                | EnhanceError::InvalidConfig(_)
                | EnhanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_family() {
        let cases = [
            (EnhanceError::Validation("x".into()), 400),
            (EnhanceError::InvalidUrl { input: "x".into() }, 400),
            (
                EnhanceError::InsufficientContent {
                    url: "u".into(),
                    chars: 1,
                    min: 100,
                },
                422,
            ),
            (
                EnhanceError::ProviderUnavailable {
                    provider: "OpenAI".into(),
                    hint: "h".into(),
                },
                503,
            ),
            (
                EnhanceError::ProviderError {
                    provider: "OpenAI".into(),
                    message: "m".into(),
                },
                502,
            ),
            (EnhanceError::RenderFailed("r".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(err).status().as_u16(), code);
        }
    }

    #[test]
    fn envelope_omits_absent_fields() {
        let ok = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 42}));

        let fail = serde_json::to_value(ApiResponse::failure("nope")).unwrap();
        assert_eq!(fail, serde_json::json!({"success": false, "error": "nope"}));
    }
}
