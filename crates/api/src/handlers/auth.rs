//! Login and invitation-based registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use veritas_core::error::CoreError;
use veritas_db::models::user::{CreateUser, UserResponse};
use veritas_db::repositories::{InvitationRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Exchange email and password for a JWT access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    // Same rejection for a wrong password and an unknown email, so the
    // endpoint does not leak which addresses are registered.
    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            user: user.into(),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: String,
    pub name: String,
    pub password: String,
}

/// POST /api/v1/auth/register
///
/// Complete a signup using the token from an invitation email. The
/// invitation fixes the email address and the starting role.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let invitation = InvitationRepo::find_waiting_by_token(&state.pool, &input.token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invitation token is invalid or already used".into(),
            ))
        })?;

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: invitation.email.clone(),
            name: input.name,
            password_hash,
            role: invitation.user_role.clone(),
        },
    )
    .await?;
    InvitationRepo::mark_used(&state.pool, invitation.id).await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered from invitation");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthResponse {
                token,
                user: user.into(),
            },
        }),
    ))
}
