//! Admin-issued signup invitations.
//!
//! Creating an invitation inserts the row and sends the email inside
//! one logical step: if the email cannot be delivered, the row is
//! rolled back so the admin can retry without hitting the unique
//! constraint on the address.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use veritas_core::error::CoreError;
use veritas_core::roles::UserRole;
use veritas_db::repositories::InvitationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    /// Starting role for the invited user; defaults to fact checker.
    pub user_role: Option<String>,
}

/// POST /api/v1/invitations
///
/// Invite a new reviewer by email. Admin only.
pub async fn create_invitation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInvitationRequest>,
) -> AppResult<impl IntoResponse> {
    let role = match &input.user_role {
        Some(raw) => UserRole::parse(raw).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("unknown role '{raw}'")))
        })?,
        None => UserRole::FactChecker,
    };
    if !role.is_promotable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "users cannot be invited as '{}'",
            role.as_str()
        ))));
    }

    let token = Uuid::new_v4().to_string();

    let mut tx = state.pool.begin().await?;
    let invitation = InvitationRepo::create(&mut tx, &input.email, &token, role.as_str()).await?;

    match &state.email {
        Some(mailer) => {
            if let Err(error) = mailer.send_invitation(&input.email, &token).await {
                tx.rollback().await?;
                tracing::error!(email = input.email.as_str(), %error, "Invitation email failed");
                return Err(AppError::InternalError(
                    "Invitation email could not be delivered".into(),
                ));
            }
            InvitationRepo::mark_sent(&mut tx, invitation.id, chrono::Utc::now().date_naive())
                .await?;
        }
        None => {
            tracing::warn!(
                email = input.email.as_str(),
                "Email delivery not configured, invitation stored unsent"
            );
        }
    }
    tx.commit().await?;

    tracing::info!(
        invitation_id = %invitation.id,
        admin_id = %admin.user_id,
        role = role.as_str(),
        "Invitation created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// GET /api/v1/invitations
///
/// List all invitations, newest first. Admin only.
pub async fn list_invitations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let invitations = InvitationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: invitations }))
}
