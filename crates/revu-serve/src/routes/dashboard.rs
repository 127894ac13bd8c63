use crate::routes::error::map_error;
use crate::{build_hub, AppState};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use revu_core::types::enums::TrendPeriod;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_WINDOW_DAYS: u32 = 30;
const DEFAULT_RANKING_LIMIT: usize = 10;

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct OverviewQuery {
    days: Option<u32>,
}

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct RankingQuery {
    days: Option<u32>,
    limit: Option<usize>,
}

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct TrendsQuery {
    days: Option<u32>,
    period: Option<TrendPeriod>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard/overview", get(overview))
        .route("/dashboard/repositories", get(repository_ranking))
        .route("/dashboard/developers", get(developer_ranking))
        .route("/dashboard/trends", get(trends))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    params(OverviewQuery),
    responses((status = 200, body = revu_core::types::metrics::DashboardOverview))
)]
pub(crate) async fn overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    match hub.metrics().overview(days) {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/repositories",
    params(RankingQuery),
    responses((status = 200, body = Vec<revu_core::types::metrics::RepositoryRanking>))
)]
pub(crate) async fn repository_ranking(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_LIMIT);
    match hub.metrics().repository_ranking(days, limit) {
        Ok(ranking) => Json(ranking).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/developers",
    params(RankingQuery),
    responses((status = 200, body = Vec<revu_core::types::metrics::DeveloperRanking>))
)]
pub(crate) async fn developer_ranking(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_LIMIT);
    match hub.metrics().developer_ranking(days, limit) {
        Ok(ranking) => Json(ranking).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/trends",
    params(TrendsQuery),
    responses((status = 200, body = Vec<revu_core::types::metrics::TrendPoint>))
)]
pub(crate) async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let period = query.period.unwrap_or(TrendPeriod::Daily);
    match hub.metrics().trends(days, period) {
        Ok(points) => Json(points).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}
