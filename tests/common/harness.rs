//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use recommender::catalog::{Catalog, Posting, vectorize_catalog_file};
use recommender::embedding::{Reranker, SentenceEmbedder};
use recommender::gateway::{HandlerState, create_router_with_state};
use recommender::recommend::{Recommender, RecommenderConfig, SharedRelevanceModel};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::sample_postings;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub struct TestServerConfig {
    pub port: u16,
    pub postings: Vec<Posting>,
    pub recommender: RecommenderConfig,
    /// Defaults to the stub cross-encoder.
    pub relevance: Option<SharedRelevanceModel>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            postings: sample_postings(),
            recommender: RecommenderConfig::default(),
            relevance: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub catalog_path: PathBuf,
    pub vectors_path: PathBuf,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server over a temporary catalog, with stub models.
///
/// The catalog JSON is written to a temp dir and vectorized with the stub embedder
/// through the same offline path the binary uses (`--vectorize`), then loaded back
/// with [`Catalog::load`].
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let temp_dir = TempDir::new()?;
    let catalog_path = temp_dir.path().join("internships.json");
    let vectors_path = temp_dir.path().join("internships.npy");

    let json = serde_json::to_string(&config.postings)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    std::fs::write(&catalog_path, json)?;

    let embedder = SentenceEmbedder::stub()
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    vectorize_catalog_file(&catalog_path, &vectors_path, &embedder)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let catalog = Catalog::load(&catalog_path, &vectors_path)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let relevance = match config.relevance {
        Some(relevance) => relevance,
        None => Arc::new(
            Reranker::stub().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?,
        ),
    };

    let recommender = Recommender::new(
        Arc::new(catalog),
        Arc::new(embedder),
        relevance,
        config.recommender,
    )
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let state = HandlerState::new(Arc::new(recommender));
    let app = create_router_with_state(state, &[TEST_ORIGIN.to_string()]);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        catalog_path,
        vectors_path,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir: temp_dir,
    })
}
