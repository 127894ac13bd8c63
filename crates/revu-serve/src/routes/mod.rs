pub mod dashboard;
pub mod error;
pub mod events;
pub mod prompts;
pub mod repos;
pub mod reviews;

use crate::middleware::correlation::correlation_middleware;
use crate::{openapi, AppState};
use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(reviews::router(state.clone()))
        .merge(repos::router(state.clone()))
        .merge(prompts::router(state.clone()))
        .merge(dashboard::router(state.clone()))
        .merge(events::router(state.clone()))
        .merge(openapi::router())
        .route_layer(middleware::from_fn(correlation_middleware));

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}
