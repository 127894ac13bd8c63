use crate::middleware::correlation::CorrelationId;
use crate::routes::error::map_error;
use crate::{build_hub, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use revu_core::analysis::StubAnalysisBackend;
use revu_core::types::io::{CreateReviewInput, ReviewFilter};
use revu_core::types::ReviewId;
use revu_events::EventSource;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reviews", post(submit_review).get(list_reviews))
        .route("/reviews/{id}", get(get_review).delete(delete_review))
        .route("/reviews/{id}/analyze", post(analyze_review))
        .route("/reviews/{id}/retry", post(retry_review))
        .with_state(state)
}

fn parse_review_id(id: String, correlation_id: Option<String>) -> Result<ReviewId, Response> {
    ReviewId::new(id).map_err(|err| {
        map_error(
            &revu_core::RevuError::Review(revu_core::error::ReviewError::InvalidInput {
                message: err.to_string(),
            }),
            correlation_id,
        )
        .into_response()
    })
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewInput,
    responses((status = 200, body = revu_core::types::review::CodeReview))
)]
pub(crate) async fn submit_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<CreateReviewInput>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.reviews().submit(&ctx, input) {
        Ok(review) => Json(review).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewFilter),
    responses((status = 200, body = Vec<revu_core::types::review::CodeReview>))
)]
pub(crate) async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    match hub.reviews().list(filter) {
        Ok(reviews) => Json(reviews).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses((status = 200, body = revu_core::types::review::CodeReview))
)]
pub(crate) async fn get_review(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let review_id = match parse_review_id(id, None) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match hub.reviews().get(&review_id) {
        Ok(review) => Json(review).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses((status = 204))
)]
pub(crate) async fn delete_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let review_id = match parse_review_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.reviews().delete(&ctx, &review_id) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/analyze",
    params(("id" = String, Path, description = "Review ID")),
    responses((status = 200, body = revu_core::types::review::CodeReview))
)]
pub(crate) async fn analyze_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let review_id = match parse_review_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    let backend = StubAnalysisBackend;
    match hub.reviews().analyze(&ctx, &review_id, &backend) {
        Ok(review) => Json(review).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/retry",
    params(("id" = String, Path, description = "Review ID")),
    responses((status = 200, body = revu_core::types::review::CodeReview))
)]
pub(crate) async fn retry_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let review_id = match parse_review_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.reviews().retry(&ctx, &review_id) {
        Ok(review) => Json(review).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}
