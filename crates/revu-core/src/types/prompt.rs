use crate::types::ids::PromptId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored analysis prompt template. The analysis backend receives the
/// content of the prompt referenced by `CodeReview::prompt_id`, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewPrompt {
    pub id: PromptId,
    pub name: String,
    pub content: String,
    pub language: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
