//! Internship recommender HTTP server entrypoint.
//!
//! `--vectorize` embeds the posting catalog and writes the vectors file instead of serving.
//! `--health-check` probes a running server and exits with 0 or 1.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use recommender::catalog::{Catalog, vectorize_catalog_file};
use recommender::config::Config;
use recommender::embedding::{Reranker, SentenceEmbedder};
use recommender::gateway::{HandlerState, create_router_with_state};
use recommender::recommend::Recommender;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    if std::env::args().any(|arg| arg == "--vectorize") {
        return run_vectorize(config).await;
    }

    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        catalog = %config.catalog_path.display(),
        vectors = %config.vectors_path.display(),
        "Internship recommender starting"
    );

    let recommender = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || build_recommender(&config)).await??
    };

    let state = HandlerState::new(Arc::new(recommender));
    let app = create_router_with_state(state, &config.cors_origins);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Internship recommender shutdown complete");
    Ok(())
}

/// Loads the catalog and both models. Blocking.
fn build_recommender(config: &Config) -> anyhow::Result<Recommender> {
    let catalog = Catalog::load(&config.catalog_path, &config.vectors_path)
        .context("failed to load posting catalog")?;

    if config.embedding_model_path.is_none() {
        tracing::warn!("No RECOMMENDER_EMBEDDING_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = SentenceEmbedder::load(config.sentence_config())?;

    if config.reranker_path.is_none() {
        tracing::warn!("No RECOMMENDER_RERANKER_PATH configured, running reranker in stub mode");
    }
    let reranker = Reranker::load(config.reranker_config())?;

    let recommender = Recommender::new(
        Arc::new(catalog),
        Arc::new(embedder),
        Arc::new(reranker),
        config.recommender_config(),
    )?;
    Ok(recommender)
}

async fn run_vectorize(config: Config) -> anyhow::Result<()> {
    config.validate_for_vectorize()?;

    let written = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
        let embedder = SentenceEmbedder::load(config.sentence_config())?;
        let written =
            vectorize_catalog_file(&config.catalog_path, &config.vectors_path, &embedder)?;
        Ok(written)
    })
    .await??;

    tracing::info!(postings = written, "Vectorization complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("RECOMMENDER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
