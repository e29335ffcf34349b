//! HTTP surface (Axum): readiness and recommendation endpoints.
//!
//! Owns no ranking logic; every request is handed to [`crate::engine::Recommender`].

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{health_handler, recommend_handler};
pub use payload::{HealthResponse, RecommendRequest, RecommendResponse};
pub use state::AppState;

pub const STATUS_HEADER: &str = "x-recommender-status";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/recommend", post(recommend_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
