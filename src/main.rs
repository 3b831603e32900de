mod admin;
mod app;
mod auth;
mod config;
mod errors;
mod extract;
mod foods;
mod meals;
mod nutrition;
mod plans;
mod state;
mod store;
mod users;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutritrack=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;

    if app_state.config.seed_catalog {
        let added = foods::services::seed_catalog(app_state.store.as_ref()).await?;
        info!(added, "catalog seed check done");
    }

    app::serve(app::build_app(app_state)).await
}
