use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use super::error::GatewayError;
use super::payload::{HealthResponse, RecommendRequest, RecommendResponse};
use super::state::AppState;
use super::{REQUEST_ID_HEADER, STATUS_HEADER};

#[instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let (status, tag) = if state.is_ready() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading")
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(tag));
    (
        status,
        headers,
        Json(HealthResponse {
            status: tag.to_string(),
        }),
    )
        .into_response()
}

#[instrument(skip(state, request), fields(request_id = tracing::field::Empty))]
pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Response, GatewayError> {
    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", tracing::field::display(&request_id));

    let query = request.query.trim();
    if query.is_empty() {
        return Err(GatewayError::InvalidRequest("query must not be empty".to_string()));
    }

    let recommender = state
        .recommender()
        .ok_or_else(|| GatewayError::NotReady("recommender is still loading".to_string()))?;

    let recommendation = recommender.recommend(query).await;
    info!(
        results = recommendation.records.len(),
        reranker = recommendation.rerank.as_str(),
        hybrid = recommendation.retrieval.is_hybrid(),
        "Recommendation served"
    );

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("ok"));
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    Ok((
        StatusCode::OK,
        headers,
        Json(RecommendResponse {
            recommended_assessments: recommendation.records,
        }),
    )
        .into_response())
}
