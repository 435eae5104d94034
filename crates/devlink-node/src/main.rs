//! Devlink Node - developer network API server.

use anyhow::Context;
use clap::Parser;
use devlink_accounts::TokenIssuer;
use devlink_node::api::{create_router, AppState};
use devlink_node::config::{CliArgs, NodeConfig};
use devlink_node::observability::init_logging;
use devlink_node::persistence::Persistence;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = NodeConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.apply_overrides(&args);

    init_logging(&config.log_level, config.log_format).context("initializing logging")?;
    config.finalize(args.dev)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Devlink node");
    tracing::info!(
        api_addr = %config.api_addr,
        data_dir = %config.data_dir.display(),
        persist = config.persist,
        cors = config.cors,
        "Node configuration"
    );

    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl_secs);
    tracing::debug!(token_ttl_secs = tokens.ttl_secs(), "Token issuer ready");
    let mut state = AppState::new(tokens);

    if config.persist {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("creating {}", config.data_dir.display()))?;
        state = state.with_persistence(Persistence::new(&config.data_dir));
        let loaded = state.load_snapshot().context("loading snapshot")?;
        if !loaded {
            tracing::info!("No snapshot found, starting empty");
        }
    }

    let accounts = state.accounts.stats();
    let social = state.social.stats();
    tracing::info!(
        users = accounts.users,
        profiles = social.profiles,
        posts = social.posts,
        comments = social.comments,
        "Stores ready"
    );

    let mut app = create_router(state.clone());
    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(config.api_addr)
        .await
        .with_context(|| format!("binding {}", config.api_addr))?;
    tracing::info!(addr = %config.api_addr, "Node is ready. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    state.flush().await.context("flushing snapshot")?;
    tracing::info!("Devlink node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Shutdown signal received");
}
