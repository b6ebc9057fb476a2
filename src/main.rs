//! Swaprec HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use swaprec::catalog::CandidateStore;
use swaprec::config::Config;
use swaprec::embedding::TextEmbedder;
use swaprec::gateway::{HandlerState, create_router_with_state};
use swaprec::index::{QdrantIndex, seed_from_store};
use swaprec::oracle::{GenaiOracle, OracleConfig};
use swaprec::registry::SessionRegistry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗██╗    ██╗ █████╗ ██████╗ ██████╗ ███████╗ ██████╗
██╔════╝██║    ██║██╔══██╗██╔══██╗██╔══██╗██╔════╝██╔════╝
███████╗██║ █╗ ██║███████║██████╔╝██████╔╝█████╗  ██║
╚════██║██║███╗██║██╔══██║██╔═══╝ ██╔══██╗██╔══╝  ██║
███████║╚███╔███╔╝██║  ██║██║     ██║  ██║███████╗╚██████╗
╚══════╝ ╚══╝╚══╝ ╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝╚══════╝ ╚═════╝

        SWAP. RANK. SERVE.
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Swaprec starting"
    );

    let store = Arc::new(CandidateStore::load_json(&config.dataset_path)?);
    tracing::info!(
        groups = store.len(),
        dataset = %config.dataset_path.display(),
        "Replacement dataset loaded"
    );

    let embedder = TextEmbedder::default();
    let index =
        QdrantIndex::connect(&config.qdrant_url, config.collection.clone(), embedder).await?;

    if let Err(e) = seed_from_store(&index, &store).await {
        tracing::warn!(
            error = %e,
            "Index seeding failed; retrieval backfill may be degraded"
        );
    }

    if config.mock_oracle {
        tracing::warn!("Mock oracle enabled - selections are served locally");
    }
    let oracle = GenaiOracle::new(
        OracleConfig::new(config.oracle_model.clone()).mock_provider(config.mock_oracle),
    );

    let registry = SessionRegistry::with_limits(
        store,
        config.session_policy(),
        config.session_capacity,
        config.session_idle(),
    );

    let state = HandlerState::new(
        registry,
        Arc::new(index),
        Arc::new(oracle),
        config.mock_oracle,
    );

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Swaprec shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SWAPREC_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
