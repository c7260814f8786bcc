use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use haven_auth::AuthError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("backend request failed: {0}")]
    Backend(String),
}

impl AdminError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to return to the caller.
    fn client_message(&self) -> String {
        match self {
            Self::Backend(_) => "backend request failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for AdminError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotAuthenticated | AuthError::SessionExpired => {
                Self::Unauthorized("invalid or expired access token".into())
            }
            AuthError::InvalidCredentials(message) | AuthError::Rejected(message) => {
                Self::Validation(message)
            }
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AdminError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "admin request failed");
        } else {
            tracing::debug!(error = %self, %status, "admin request refused");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(
            AdminError::from(AuthError::NotAuthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminError::from(AuthError::Rejected("email exists".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AdminError::from(AuthError::Backend("HTTP 500".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn backend_details_are_not_returned() {
        let error = AdminError::Backend("HTTP 500: stack trace".into());
        assert_eq!(error.client_message(), "backend request failed");
    }
}
