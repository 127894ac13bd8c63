pub mod enums;
pub mod event;
pub mod ids;
pub mod io;
pub mod metrics;
pub mod prompt;
pub mod repo;
pub mod review;

pub use enums::{IssueKind, RepoProvider, ReviewStatus, TrendPeriod};
pub use event::EventBody;
pub use ids::{IdError, PromptId, RepoId, ReviewId};
pub use io::{
    CreatePromptInput, CreateReviewInput, RegisterRepoInput, ReviewFilter, UpdatePromptInput,
};
pub use metrics::{DashboardOverview, DeveloperRanking, RepositoryRanking, TrendPoint};
pub use prompt::ReviewPrompt;
pub use repo::Repo;
pub use review::{AnalysisResult, CodeReview, Issue};
