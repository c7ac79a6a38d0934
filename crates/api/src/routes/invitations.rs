//! Invitation routes mounted at `/invitations`. Admin only.
//!
//! ```text
//! POST / -> create_invitation
//! GET  / -> list_invitations
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::invitations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(invitations::list_invitations).post(invitations::create_invitation),
    )
}
