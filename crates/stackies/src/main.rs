mod app;
mod config;
mod handlers;
mod middleware;
mod models;
mod state;
mod storage;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use listenfd::ListenFd;
use stackies_auth::{AuthConfig, CodeExchanger, JwksCache, JwtVerifier};
use stackies_core::storage::ExperienceRepository;
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{app::create_app, config::Config, state::AppState, storage::InMemoryRepository};

/// Stackies - Keep track of the experiences on your stack
#[derive(Parser, Debug)]
#[command(name = "stackies")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8080", env = "PORT")]
    port: u16,

    /// Keep experiences in memory instead of Postgres
    #[arg(long, env = "IN_MEMORY")]
    in_memory: bool,

    /// Log line format
    #[arg(long, default_value = "pretty", env = "LOG_FORMAT", value_parser = ["pretty", "json"])]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_format);

    let config = Config::from_env();
    let auth_config = AuthConfig::from_env().context("invalid auth configuration")?;

    let repository = init_repository(&cli, &config).await?;
    let mut state = AppState::new(repository);

    let refresh_task = match &auth_config.jwt {
        Some(jwt) => {
            let cache = Arc::new(
                JwksCache::connect(jwt)
                    .await
                    .with_context(|| format!("failed to fetch JWKS from {}", jwt.jwks_url))?,
            );
            tracing::info!(
                url = %jwt.jwks_url,
                keys = cache.key_ids().await.len(),
                "Bearer verification enabled"
            );
            state = state.with_verifier(JwtVerifier::new(cache.clone()));
            Some(cache.spawn_refresh(jwt.refresh_interval))
        }
        None => {
            tracing::warn!("No JWKS_URL or ISSUER_URL set, /experiences is unauthenticated");
            None
        }
    };

    if let Some(oauth) = &auth_config.oauth {
        tracing::info!(
            authorize_url = %oauth.authorize_url,
            redirect_url = %oauth.redirect_url,
            "OAuth2 callback enabled"
        );
        state = state.with_exchanger(CodeExchanger::new(oauth));
    }

    if let Some(body_dump) = config.body_dump.clone() {
        tracing::debug!(
            max_body_size = body_dump.max_body_size,
            exclude = ?body_dump.exclude_urls,
            "Body dump enabled"
        );
        state = state.with_body_dump(body_dump);
    }

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(refresh_task))
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stackies=debug,stackies_auth=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Picks the storage backend.
///
/// Postgres unless `--in-memory` is set or the binary was built without the
/// `postgres` feature.
async fn init_repository(cli: &Cli, config: &Config) -> Result<Arc<dyn ExperienceRepository>> {
    if cli.in_memory {
        tracing::info!("Using in-memory storage");
        return Ok(Arc::new(InMemoryRepository::new()));
    }

    #[cfg(feature = "postgres")]
    {
        let repository = storage::PostgresRepository::connect(&config.database)
            .await
            .with_context(|| {
                format!(
                    "failed to connect to {}",
                    config.database.display_url()
                )
            })?;
        return Ok(Arc::new(repository));
    }

    #[cfg(not(feature = "postgres"))]
    {
        tracing::warn!(
            database = %config.database.display_url(),
            "Built without the postgres feature, using in-memory storage"
        );
        return Ok(Arc::new(InMemoryRepository::new()));
    }
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and stop the JWKS refresh.
async fn shutdown_signal(refresh_task: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    if let Some(task) = refresh_task {
        task.abort();
    }
}
