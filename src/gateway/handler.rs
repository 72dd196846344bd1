use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use super::error::GatewayError;
use super::state::HandlerState;
use super::{RECOMMENDER_STATUS_COARSE, RECOMMENDER_STATUS_HEADER, RECOMMENDER_STATUS_RERANKED};
use crate::resume::Resume;
use crate::scoring::top_k_count;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    /// Overrides the shortlist size (K).
    pub count: Option<i64>,
}

/// `POST /recommend`: ranks the catalog against the resume in the body.
#[instrument(skip(state, query, payload), fields(count = tracing::field::Empty))]
pub async fn recommend_handler(
    State(state): State<HandlerState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
    payload: Result<Json<Resume>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Query(query) = query.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let Json(resume) = payload.map_err(|e| GatewayError::Validation(e.body_text()))?;

    if let Some(count) = query.count {
        tracing::Span::current().record("count", count);
        top_k_count(count).map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
    }

    debug!(
        skills_len = resume.skills.len(),
        experience_len = resume.experience.len(),
        "Processing recommendation request"
    );

    let recommender = state.recommender.clone();
    let reranked = recommender.config().rerank;
    let recommendations =
        tokio::task::spawn_blocking(move || recommender.recommend(&resume, query.count))
            .await
            .map_err(|e| {
                error!(error = %e, "Scoring task panicked or was cancelled");
                GatewayError::InternalError(format!("scoring task failed: {e}"))
            })??;

    info!(
        returned = recommendations.len(),
        reranked, "Recommendation served"
    );

    let status = if reranked {
        RECOMMENDER_STATUS_RERANKED
    } else {
        RECOMMENDER_STATUS_COARSE
    };
    let mut headers = HeaderMap::new();
    headers.insert(RECOMMENDER_STATUS_HEADER, HeaderValue::from_static(status));

    Ok((StatusCode::OK, headers, Json(recommendations)).into_response())
}
