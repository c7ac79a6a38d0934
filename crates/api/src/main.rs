use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veritas_api::config::ServerConfig;
use veritas_api::router::build_app_router;
use veritas_api::state::AppState;
use veritas_api::storage::ScreenshotStorage;
use veritas_events::{default_routes, EmailConfig, EmailDelivery, EventDispatcher};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veritas_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = veritas_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    veritas_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    veritas_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Email ---
    let email = EmailConfig::from_env().map(|cfg| Arc::new(EmailDelivery::new(cfg)));
    if email.is_none() {
        tracing::warn!("SMTP_HOST not set, email notifications disabled");
    }

    // --- Event dispatcher ---
    // Fails fast on an incomplete routing table.
    let dispatcher = Arc::new(
        EventDispatcher::new(default_routes(email.clone()))
            .expect("Event dispatcher wiring is incomplete"),
    );
    tracing::info!("Event dispatcher wired");

    // --- Screenshot storage ---
    let storage = ScreenshotStorage::from_env().await.map(Arc::new);
    if storage.is_none() {
        tracing::warn!("SCREENSHOT_BUCKET not set, screenshot uploads disabled");
    }

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
        email,
        storage,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
