use std::net::SocketAddr;

use enroll::app;
use enroll::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "enroll=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    // Probe the database once so a dead MongoDB is visible at startup;
    // requests keep answering 500 until it comes back.
    match state.store.ping().await {
        Ok(()) => tracing::info!(db = %state.config.mongodb_db, "connected to MongoDB"),
        Err(e) => tracing::warn!(error = %e, "MongoDB unreachable at startup; continuing"),
    }

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    let app = app::build_app(state);
    app::serve(app, addr).await
}
