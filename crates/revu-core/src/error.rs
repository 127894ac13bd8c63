use crate::types::enums::ReviewStatus;
use crate::types::ids::{PromptId, RepoId, ReviewId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("review not found: {id}")]
    NotFound { id: ReviewId },

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("repository not found: {id}")]
    RepoNotFound { id: RepoId },

    #[error("repository already registered: {name}")]
    RepoExists { name: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("prompt not found: {id}")]
    PromptNotFound { id: PromptId },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("analysis provider returned an empty response")]
    EmptyResponse,

    #[error("analysis timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("analysis failed: {message}")]
    Internal { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// Top-level error for callers that work across domains, such as the
/// serve layer. Domain code keeps the narrower enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevuError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("internal error: {message}")]
    Internal { message: String },
}
