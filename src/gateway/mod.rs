//! HTTP gateway (Axum) for the recommendation pipeline.
//!
//! Routes:
//! - `POST /recommend` and `POST /recommend/`: rank postings for a resume.
//! - `GET /healthz`: liveness.
//! - `GET /ready`: component status.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{RecommendQuery, recommend_handler};
pub use state::HandlerState;

pub const RECOMMENDER_STATUS_HEADER: &str = "X-Recommender-Status";
pub const RECOMMENDER_STATUS_HEALTHY: &str = "healthy";
pub const RECOMMENDER_STATUS_READY: &str = "ready";
pub const RECOMMENDER_STATUS_NOT_READY: &str = "not_ready";
pub const RECOMMENDER_STATUS_RERANKED: &str = "reranked";
pub const RECOMMENDER_STATUS_COARSE: &str = "coarse";

pub fn create_router_with_state(state: HandlerState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/recommend", post(recommend_handler))
        .route("/recommend/", post(recommend_handler))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured origins. Methods and headers mirror the request.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub catalog: &'static str,
    pub postings: usize,
    pub embedding_dim: usize,
    pub embedder_mode: &'static str,
    pub reranker_mode: &'static str,
    pub rerank_enabled: bool,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RECOMMENDER_STATUS_HEADER,
        HeaderValue::from_static(RECOMMENDER_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready once the catalog holds at least one posting.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let recommender = &state.recommender;
    let catalog = recommender.catalog();

    let catalog_status = if catalog.is_empty() {
        "empty"
    } else {
        RECOMMENDER_STATUS_READY
    };

    let components = ComponentStatus {
        http: RECOMMENDER_STATUS_READY,
        catalog: catalog_status,
        postings: catalog.len(),
        embedding_dim: recommender.embedder().embedding_dim(),
        embedder_mode: if recommender.embedder().is_stub() {
            "stub"
        } else {
            "real"
        },
        reranker_mode: if recommender.relevance_model().is_stub() {
            "stub"
        } else {
            "real"
        },
        rerank_enabled: recommender.config().rerank,
    };

    let is_ready = components.catalog == RECOMMENDER_STATUS_READY;
    let (status_code, status_msg, header) = if is_ready {
        (StatusCode::OK, "ok", RECOMMENDER_STATUS_READY)
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "pending",
            RECOMMENDER_STATUS_NOT_READY,
        )
    };

    let mut headers = HeaderMap::new();
    headers.insert(RECOMMENDER_STATUS_HEADER, HeaderValue::from_static(header));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
