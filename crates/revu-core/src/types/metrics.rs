use crate::types::ids::RepoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard headline numbers over a trailing window. Always recomputed
/// from the review records, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardOverview {
    pub total_reviews: u64,
    pub active_repositories: u64,
    pub average_quality_score: f64,
    pub critical_issues: u64,
    pub completion_rate: f64,
    pub window_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryRanking {
    pub repo_id: RepoId,
    pub average_score: f64,
    pub total_reviews: u64,
    pub critical_issues: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeveloperRanking {
    pub developer: String,
    pub average_score: f64,
    pub total_reviews: u64,
    pub critical_issues: u64,
    /// Average score in the recent half of the window minus the earlier
    /// half; 0 when either half has no completed reviews.
    pub improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub average_score: f64,
    pub issue_count: u64,
    pub review_count: u64,
}
