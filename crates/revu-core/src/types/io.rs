use crate::types::enums::{RepoProvider, ReviewStatus};
use crate::types::ids::{PromptId, RepoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewInput {
    pub repo_id: RepoId,
    pub branch: String,
    pub developer: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub file_content: Option<String>,
    pub commit_sha: Option<String>,
    pub prompt_id: Option<PromptId>,
    /// Provider model requested for the analysis, e.g. `gpt-4o`.
    pub model_id: Option<String>,
}

/// Conjunction of optional criteria; an absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct ReviewFilter {
    pub repo_id: Option<RepoId>,
    pub status: Option<ReviewStatus>,
    pub developer: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring over file name, branch and developer.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisterRepoInput {
    pub name: String,
    pub url: String,
    pub provider: RepoProvider,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatePromptInput {
    pub name: String,
    pub content: String,
    pub language: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePromptInput {
    pub name: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub active: Option<bool>,
}
