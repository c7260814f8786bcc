use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated; run `haven auth login`")]
    NotAuthenticated,

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("session expired; run `haven auth login` again")]
    SessionExpired,

    /// The backend understood the request and refused it (HTTP 4xx).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Transport failure, 5xx, or an unparseable response.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("token store error: {0}")]
    TokenStore(String),

    #[error("handoff store error: {0}")]
    HandoffStore(String),

    #[error("{0}")]
    Other(String),
}
