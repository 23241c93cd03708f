mod chart;
mod config;
mod errors;
mod graphql;
mod profile;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::graphql::GraphqlClient;
use crate::profile::normalize::NormalizeOptions;
use crate::profile::source::GraphqlProfileSource;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profile card v{}", env!("CARGO_PKG_VERSION"));

    let client = GraphqlClient::new(config.graphql_uri.clone())?;
    info!("GraphQL client initialized (endpoint: {})", client.endpoint());

    let query_settings = config.query_settings();
    info!(
        "Comparing monthly hours {} vs {}; top projects {}..{}",
        query_settings.current_year,
        query_settings.prior_year,
        query_settings.top_projects_window.from,
        query_settings.top_projects_window.to
    );

    let source = Arc::new(GraphqlProfileSource::new(
        client,
        config.refresh_token.clone(),
        &query_settings,
    ));

    let state = AppState {
        source,
        query_settings,
        normalize_options: NormalizeOptions {
            fallback_phone: config.fallback_phone.clone(),
        },
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
