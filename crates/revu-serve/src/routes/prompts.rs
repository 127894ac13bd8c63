use crate::middleware::correlation::CorrelationId;
use crate::routes::error::map_error;
use crate::{build_hub, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use revu_core::types::io::{CreatePromptInput, UpdatePromptInput};
use revu_core::types::PromptId;
use revu_events::EventSource;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/prompts", post(create_prompt).get(list_prompts))
        .route(
            "/prompts/{id}",
            get(get_prompt).put(update_prompt).delete(delete_prompt),
        )
        .with_state(state)
}

fn parse_prompt_id(id: String, correlation_id: Option<String>) -> Result<PromptId, Response> {
    PromptId::new(id).map_err(|err| {
        map_error(
            &revu_core::RevuError::Prompt(revu_core::error::PromptError::InvalidInput {
                message: err.to_string(),
            }),
            correlation_id,
        )
        .into_response()
    })
}

#[utoipa::path(
    post,
    path = "/api/prompts",
    request_body = CreatePromptInput,
    responses((status = 200, body = revu_core::types::prompt::ReviewPrompt))
)]
pub(crate) async fn create_prompt(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<CreatePromptInput>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.prompts().create(&ctx, input) {
        Ok(prompt) => Json(prompt).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/prompts",
    responses((status = 200, body = Vec<revu_core::types::prompt::ReviewPrompt>))
)]
pub(crate) async fn list_prompts(State(state): State<AppState>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    match hub.prompts().list() {
        Ok(prompts) => Json(prompts).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/prompts/{id}",
    params(("id" = String, Path, description = "Prompt ID")),
    responses((status = 200, body = revu_core::types::prompt::ReviewPrompt))
)]
pub(crate) async fn get_prompt(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let prompt_id = match parse_prompt_id(id, None) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match hub.prompts().get(&prompt_id) {
        Ok(prompt) => Json(prompt).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/prompts/{id}",
    request_body = UpdatePromptInput,
    params(("id" = String, Path, description = "Prompt ID")),
    responses((status = 200, body = revu_core::types::prompt::ReviewPrompt))
)]
pub(crate) async fn update_prompt(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePromptInput>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let prompt_id = match parse_prompt_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.prompts().update(&ctx, &prompt_id, input) {
        Ok(prompt) => Json(prompt).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/prompts/{id}",
    params(("id" = String, Path, description = "Prompt ID")),
    responses((status = 204))
)]
pub(crate) async fn delete_prompt(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let prompt_id = match parse_prompt_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.prompts().delete(&ctx, &prompt_id) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}
