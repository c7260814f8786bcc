//! # haven-admin
//!
//! HTTP endpoints that need the backend's service credential: creating a
//! member in the caller's organization and resetting a member's password.
//!
//! Every request is authorized here, server side. The client's role guard
//! only hides the admin screens; these handlers are what actually refuse
//! non-admins and cross-tenant targets.

pub mod backend;
pub mod error;
mod handlers;
pub mod state;

use axum::Router;
use axum::routing::post;

pub use backend::AdminBackend;
pub use error::AdminError;
pub use handlers::{CreateUserRequest, CreatedUser, ResetPasswordRequest};
pub use state::AdminState;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/api/admin/users", post(handlers::create_user))
        .route(
            "/api/admin/users/{id}/password",
            post(handlers::reset_password),
        )
        .with_state(state)
}

/// Bind `addr` and serve the admin API until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: AdminState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "admin API listening");
    axum::serve(listener, router(state)).await
}
