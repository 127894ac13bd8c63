use crate::types::enums::{IssueKind, ReviewStatus};
use crate::types::ids::{PromptId, RepoId, ReviewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One file or commit submitted for analysis. `analysis_result` is present
/// iff the review is Completed; `error_message` iff it is Failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CodeReview {
    pub id: ReviewId,
    pub repo_id: RepoId,
    pub branch: String,
    pub developer: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub file_content: Option<String>,
    pub commit_sha: Option<String>,
    pub status: ReviewStatus,
    pub prompt_id: Option<PromptId>,
    pub model_id: Option<String>,
    pub analysis_result: Option<AnalysisResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CodeReview {
    pub fn is_completed(&self) -> bool {
        self.status == ReviewStatus::Completed
    }

    pub fn critical_issue_count(&self) -> usize {
        self.analysis_result
            .as_ref()
            .map(|result| {
                result
                    .issues
                    .iter()
                    .filter(|issue| issue.kind == IssueKind::Critical)
                    .count()
            })
            .unwrap_or(0)
    }
}

/// Immutable once attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub quality_score: u8,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub raw_review: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub line: Option<u32>,
    /// 1..=10. Conventionally Critical >= 8, Warning 4..=7, Info 1..=3,
    /// but treated as a hint rather than derived from `kind`.
    pub severity: u8,
}
