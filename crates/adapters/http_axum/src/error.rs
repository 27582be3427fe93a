//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sitehub_domain::error::{SiteError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

/// Maps [`SiteError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SiteError);

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SiteError::Validation(err) => {
                tracing::debug!(error = %err, "rejected request");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            SiteError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SiteError::Forbidden(err) => {
                tracing::warn!(error = %err, "forbidden request");
                (StatusCode::FORBIDDEN, err.to_string())
            }
            SiteError::Upstream(err) => {
                tracing::warn!(error = %err, "upstream error");
                (StatusCode::BAD_GATEWAY, "upstream service unavailable".to_string())
            }
            SiteError::Storage(err) | SiteError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Parse a path identifier, reporting a malformed one as a validation error.
pub(crate) fn parse_id<T: std::str::FromStr>(kind: &'static str, raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(ValidationError::invalid(kind, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use sitehub_domain::error::{ForbiddenError, NotFoundError};

    async fn render(err: SiteError) -> (StatusCode, serde_json::Value) {
        let response = ApiError::from(err).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn should_return_bad_request_when_validation_fails() {
        let (status, body) = render(ValidationError::InvalidAdminCode.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid admin code");
    }

    #[tokio::test]
    async fn should_return_not_found_with_reason() {
        let err = NotFoundError {
            entity: "Message",
            id: "42".to_string(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Message not found: 42");
    }

    #[tokio::test]
    async fn should_return_forbidden_when_chat_is_muted() {
        let (status, body) = render(ForbiddenError::ChatMuted.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Chat is muted by admin");
    }

    #[tokio::test]
    async fn should_hide_storage_details() {
        let (status, body) = render(SiteError::Storage("disk full".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn should_return_bad_gateway_when_upstream_fails() {
        let (status, _) = render(SiteError::Upstream("timeout".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn should_reject_malformed_identifier() {
        let result: Result<sitehub_domain::id::NoteId, _> = parse_id("note id", "not-a-uuid");
        assert!(result.is_err());
    }
}
