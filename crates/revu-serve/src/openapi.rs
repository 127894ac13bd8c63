use utoipa::OpenApi;

use crate::routes::dashboard::{OverviewQuery, RankingQuery, TrendsQuery};
use crate::routes::events::EventsQuery;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use revu_core::types::enums::{IssueKind, RepoProvider, ReviewStatus, TrendPeriod};
use revu_core::types::ids::{PromptId, RepoId, ReviewId};
use revu_core::types::io::{
    CreatePromptInput, CreateReviewInput, RegisterRepoInput, ReviewFilter, UpdatePromptInput,
};
use revu_core::types::metrics::{
    DashboardOverview, DeveloperRanking, RepositoryRanking, TrendPoint,
};
use revu_core::types::prompt::ReviewPrompt;
use revu_core::types::repo::Repo;
use revu_core::types::review::{AnalysisResult, CodeReview, Issue};
use revu_events::{EventRecord, EventSource};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::reviews::submit_review,
        crate::routes::reviews::list_reviews,
        crate::routes::reviews::get_review,
        crate::routes::reviews::delete_review,
        crate::routes::reviews::analyze_review,
        crate::routes::reviews::retry_review,
        crate::routes::repos::register_repo,
        crate::routes::repos::list_repos,
        crate::routes::repos::get_repo,
        crate::routes::repos::unregister_repo,
        crate::routes::prompts::create_prompt,
        crate::routes::prompts::list_prompts,
        crate::routes::prompts::get_prompt,
        crate::routes::prompts::update_prompt,
        crate::routes::prompts::delete_prompt,
        crate::routes::dashboard::overview,
        crate::routes::dashboard::repository_ranking,
        crate::routes::dashboard::developer_ranking,
        crate::routes::dashboard::trends,
        crate::routes::events::list_events,
        crate::routes::events::subscribe,
        crate::routes::events::stream
    ),
    components(schemas(
        CodeReview,
        AnalysisResult,
        Issue,
        CreateReviewInput,
        ReviewFilter,
        Repo,
        RegisterRepoInput,
        ReviewPrompt,
        CreatePromptInput,
        UpdatePromptInput,
        DashboardOverview,
        RepositoryRanking,
        DeveloperRanking,
        TrendPoint,
        OverviewQuery,
        RankingQuery,
        TrendsQuery,
        EventRecord,
        EventsQuery,
        ReviewId,
        RepoId,
        PromptId,
        ReviewStatus,
        IssueKind,
        RepoProvider,
        TrendPeriod,
        EventSource
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> impl IntoResponse {
    let html = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Revu API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
      window.ui = SwaggerUIBundle({ url: '/api/openapi.json', dom_id: '#swagger-ui' });
    </script>
  </body>
</html>
"#;
    axum::response::Html(html)
}
