use crate::types::ids::{PromptId, RepoId, ReviewId};
use crate::types::prompt::ReviewPrompt;
use crate::types::repo::Repo;
use crate::types::review::CodeReview;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "payload")]
pub enum EventBody {
    ReviewSubmitted { review: CodeReview },
    ReviewStarted { review: CodeReview },
    ReviewCompleted { review: CodeReview },
    ReviewFailed { review: CodeReview, error: String },
    ReviewRetried { review: CodeReview },
    ReviewDeleted { review_id: ReviewId },

    RepoRegistered { repo: Repo },
    RepoUnregistered { repo_id: RepoId },

    PromptCreated { prompt: ReviewPrompt },
    PromptUpdated { prompt: ReviewPrompt },
    PromptDeleted { prompt_id: PromptId },
}
