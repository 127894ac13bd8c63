use crate::middleware::correlation::CorrelationId;
use crate::routes::error::map_error;
use crate::{build_hub, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use revu_core::types::io::RegisterRepoInput;
use revu_core::types::RepoId;
use revu_events::EventSource;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/repos", post(register_repo).get(list_repos))
        .route("/repos/{id}", get(get_repo).delete(unregister_repo))
        .with_state(state)
}

fn parse_repo_id(id: String, correlation_id: Option<String>) -> Result<RepoId, Response> {
    RepoId::new(id).map_err(|err| {
        map_error(
            &revu_core::RevuError::Repo(revu_core::error::RepoError::InvalidInput {
                message: err.to_string(),
            }),
            correlation_id,
        )
        .into_response()
    })
}

#[utoipa::path(
    post,
    path = "/api/repos",
    request_body = RegisterRepoInput,
    responses((status = 200, body = revu_core::types::repo::Repo))
)]
pub(crate) async fn register_repo(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<RegisterRepoInput>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.repos().register(&ctx, input) {
        Ok(repo) => Json(repo).into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/repos",
    responses((status = 200, body = Vec<revu_core::types::repo::Repo>))
)]
pub(crate) async fn list_repos(State(state): State<AppState>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    match hub.repos().list() {
        Ok(repos) => Json(repos).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/repos/{id}",
    params(("id" = String, Path, description = "Repository ID")),
    responses((status = 200, body = revu_core::types::repo::Repo))
)]
pub(crate) async fn get_repo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let repo_id = match parse_repo_id(id, None) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match hub.repos().get(&repo_id) {
        Ok(repo) => Json(repo).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/repos/{id}",
    params(("id" = String, Path, description = "Repository ID")),
    responses((status = 204))
)]
pub(crate) async fn unregister_repo(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let repo_id = match parse_repo_id(id, Some(correlation.0.clone())) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let ctx = revu_core::RequestContext::new(EventSource::Api, Some(correlation.0));
    match hub.repos().unregister(&ctx, &repo_id) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(&err, ctx.correlation_id).into_response(),
    }
}
