//! Authentication routes mounted at `/auth`.
//!
//! ```text
//! POST /login      -> login
//! POST /register   -> register (invitation token)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
}
