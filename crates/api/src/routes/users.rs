//! User routes mounted at `/users`.
//!
//! ```text
//! GET   /me        -> me
//! PATCH /me        -> update_me
//! GET   /          -> list_users (admin)
//! PATCH /{id}/role -> promote_user (admin)
//! ```

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me).patch(users::update_me))
        .route("/", get(users::list_users))
        .route("/{id}/role", patch(users::promote_user))
}
