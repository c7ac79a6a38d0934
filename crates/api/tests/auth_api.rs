//! HTTP-level integration tests for login, registration and RBAC.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth};
use sqlx::PgPool;
use veritas_api::auth::password::hash_password;
use veritas_db::models::user::CreateUser;
use veritas_db::repositories::{InvitationRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a test user directly in the database and return the row plus
/// the plaintext password used.
async fn create_test_user(
    pool: &PgPool,
    email: &str,
    role: &str,
) -> (veritas_db::models::user::User, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap().to_string(),
            password_hash: hashed,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    (user, password.to_string())
}

/// Log in via the API and return the access token.
async fn login(app: axum::Router, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_returns_token_and_user(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "checker@test.com", "fact_checker").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "checker@test.com", "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["role"], "fact_checker");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_wrong_password(pool: PgPool) {
    create_test_user(&pool, "checker@test.com", "fact_checker").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "checker@test.com", "password": "nope-nope-nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_deactivated_account(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "gone@test.com", "fact_checker").await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "gone@test.com", "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Registration from invitation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_consumes_invitation(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    InvitationRepo::create(&mut tx, "new@test.com", "tok-abc", "expert")
        .await
        .unwrap();
    tx.commit().await.unwrap();
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        serde_json::json!({
            "token": "tok-abc",
            "name": "New Expert",
            "password": "a-long-enough-password"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["email"], "new@test.com");
    assert_eq!(body["data"]["user"]["role"], "expert");

    // Replays of the same token must fail.
    let replay = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "token": "tok-abc",
            "name": "Impostor",
            "password": "another-long-password"
        }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_weak_password(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    InvitationRepo::create(&mut tx, "new@test.com", "tok-abc", "fact_checker")
        .await
        .unwrap();
    tx.commit().await.unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({ "token": "tok-abc", "name": "N", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_the_calling_user(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "me@test.com", "expert").await;
    let app = common::build_test_app(pool);

    let token = login(app.clone(), "me@test.com", &password).await;
    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], serde_json::json!(user.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_reject_non_admins(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "checker@test.com", "fact_checker").await;
    let app = common::build_test_app(pool);

    let token = login(app.clone(), "checker@test.com", &password).await;
    let response = post_json_auth(
        app,
        "/api/v1/invitations",
        &token,
        serde_json::json!({ "email": "x@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
