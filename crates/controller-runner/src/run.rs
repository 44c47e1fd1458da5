//! Composition root `run()` (§4.7, §9): wires the concrete adapters to
//! the composition's `AppState`, binds the HTTP server, and drives
//! graceful shutdown. Mirrors the teacher's `run/server.rs` — same
//! `CancellationToken` + ctrl_c/SIGTERM pattern, same CORS posture.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gns3_controller_adapters::{create_routes, ComputeHttpClientFactory, FsArchiveStore, FsProjectStore, NullDriverFactory};
use gns3_controller_composition::{AppConfig, AppState};

use crate::cli::Cli;

fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("received Ctrl+C, initiating graceful shutdown"),
            _ = terminate => tracing::info!("received SIGTERM, initiating graceful shutdown"),
        }

        cancel_token.cancel();
    });
}

fn apply_cli_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if cli.local {
        config.host = "127.0.0.1".to_string();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(certfile) = &cli.certfile {
        config.certfile = Some(certfile.clone());
    }
    if let Some(certkey) = &cli.certkey {
        config.certkey = Some(certkey.clone());
    }
    config
}

fn write_pid_file(path: &str) -> Result<()> {
    std::fs::write(path, std::process::id().to_string()).with_context(|| format!("failed to write pid file at {path}"))
}

pub async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "gns3_controller=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(log_path) = &cli.log {
        tracing::warn!(path = %log_path, "--log given; this binary logs to stderr only, redirect it at the process level");
    }
    if cli.daemon {
        tracing::warn!("--daemon given; daemonization is left to the process supervisor, continuing in the foreground");
    }
    if cli.ssl && cli.certfile.is_none() {
        tracing::warn!("--ssl given without --certfile; TLS termination is not performed by this binary");
    }

    tracing::info!("starting gns3-controller");

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let config = apply_cli_overrides(AppConfig::from_env().context("failed to load configuration")?, &cli);
    tracing::info!(host = %config.host, port = config.port, data_dir = %config.data_dir, "configuration loaded");

    std::fs::create_dir_all(&config.data_dir).with_context(|| format!("failed to create data directory {}", config.data_dir))?;

    let client_factory = Arc::new(ComputeHttpClientFactory);
    let driver_factory = Arc::new(NullDriverFactory);
    let project_store = Arc::new(FsProjectStore::new(config.data_dir.clone()));
    let archive_store = Arc::new(FsArchiveStore::new(config.data_dir.clone()));

    let host = config.host.clone();
    let port = config.port;
    let pid_path = cli.pid.clone();

    let cors_layer = if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        tracing::warn!("CORS configured to allow ANY origin - this is insecure for production!");
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<_> = config.cors_allowed_origins.iter().filter_map(|origin| origin.parse().ok()).collect();
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS configured for explicit origins");
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    };

    let state = AppState::new(config, client_factory, driver_factory, project_store, archive_store);

    let app = Router::new()
        .route("/", get(|| async { "GNS3 controller core" }))
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state.clone());

    let addr: SocketAddr = format!("{host}:{port}").parse().context("invalid host/port combination")?;
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    if let Some(path) = &pid_path {
        write_pid_file(path)?;
    }

    let shutdown_token = cancel_token.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_token.cancelled().await;
        tracing::info!("HTTP server received shutdown signal");
    });

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    state.core.shutdown().await;

    if let Some(path) = &pid_path {
        let _ = std::fs::remove_file(path);
    }

    tracing::info!("gns3-controller shutdown complete");
    Ok(())
}
