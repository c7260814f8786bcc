use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use haven_core::{Profile, Role};
use serde::{Deserialize, Serialize};

use crate::{AdminError, AdminState, MIN_PASSWORD_LEN};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub organization_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// The authenticated admin making the request.
struct Caller {
    user_id: String,
    organization_id: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AdminError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AdminError::Unauthorized("missing bearer token".into()))
}

async fn require_admin(state: &AdminState, headers: &HeaderMap) -> Result<Caller, AdminError> {
    let token = bearer_token(headers)?;
    let identity = state.backend.caller(token).await?;

    let profile = state.backend.profile(&identity.user_id).await?;
    match profile {
        Some(Profile {
            organization_id: Some(organization_id),
            role: Some(Role::Admin),
            ..
        }) => Ok(Caller {
            user_id: identity.user_id,
            organization_id,
        }),
        _ => {
            tracing::warn!(user_id = %identity.user_id, "admin endpoint called by non-admin");
            Err(AdminError::Forbidden("admin role required".into()))
        }
    }
}

fn validate_password(password: &str) -> Result<(), AdminError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_new_user(request: &CreateUserRequest) -> Result<(), AdminError> {
    if request.email.trim().is_empty() {
        return Err(AdminError::Validation("email is required".into()));
    }
    if request.role == Role::Unknown {
        return Err(AdminError::Validation(
            "role must be admin or volunteer".into(),
        ));
    }
    validate_password(&request.password)
}

pub(crate) async fn create_user(
    State(state): State<AdminState>,
    headers: HeaderMap,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUser>), AdminError> {
    let caller = require_admin(&state, &headers).await?;
    let Json(request) = body?;
    validate_new_user(&request)?;

    let email = request.email.trim();
    let identity = state.backend.create_user(email, &request.password).await?;

    let profile = Profile {
        id: identity.user_id.clone(),
        organization_id: Some(caller.organization_id.clone()),
        full_name: request
            .full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        role: Some(request.role),
    };
    if let Err(error) = state.backend.save_profile(&profile).await {
        // An account without a profile cannot sign in usefully; undo it.
        if let Err(rollback) = state.backend.delete_user(&identity.user_id).await {
            tracing::error!(
                user_id = %identity.user_id,
                error = %rollback,
                "failed to roll back new account"
            );
        }
        return Err(error.into());
    }

    tracing::info!(
        admin = %caller.user_id,
        user_id = %identity.user_id,
        org_id = %caller.organization_id,
        role = %request.role,
        "member created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            id: identity.user_id,
            email: identity.email.unwrap_or_else(|| email.to_string()),
            role: request.role,
            organization_id: caller.organization_id,
        }),
    ))
}

pub(crate) async fn reset_password(
    State(state): State<AdminState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<StatusCode, AdminError> {
    let caller = require_admin(&state, &headers).await?;
    let Json(request) = body?;
    validate_password(&request.password)?;

    let target = state.backend.profile(&user_id).await?;
    let same_tenant = target
        .as_ref()
        .and_then(|profile| profile.organization_id.as_deref())
        == Some(caller.organization_id.as_str());
    if !same_tenant {
        tracing::warn!(
            admin = %caller.user_id,
            target = %user_id,
            "password reset outside caller's organization"
        );
        return Err(AdminError::Forbidden(
            "user is not a member of your organization".into(),
        ));
    }

    state
        .backend
        .update_password(&user_id, &request.password)
        .await?;
    tracing::info!(admin = %caller.user_id, target = %user_id, "password reset");
    Ok(StatusCode::NO_CONTENT)
}
