use axum::http::StatusCode;
use axum::Json;
use revu_core::error::{
    AnalysisError, EventError, PromptError, RepoError, ReviewError, RevuError,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
    pub correlation_id: Option<String>,
}

pub fn map_error(
    err: &RevuError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, message) = match err {
        RevuError::Review(review) => map_review_error(review),
        RevuError::Repo(repo) => map_repo_error(repo),
        RevuError::Prompt(prompt) => map_prompt_error(prompt),
        RevuError::Analysis(analysis) => map_analysis_error(analysis),
        RevuError::Event(event) => map_event_error(event),
        RevuError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            message.clone(),
        ),
    };

    (
        status,
        Json(ErrorEnvelope {
            code,
            message,
            correlation_id,
        }),
    )
}

fn map_review_error(err: &ReviewError) -> (StatusCode, &'static str, String) {
    match err {
        ReviewError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        ReviewError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, "invalid_state", err.to_string())
        }
        ReviewError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        ReviewError::Conflict { .. } => (StatusCode::CONFLICT, "conflict", err.to_string()),
    }
}

fn map_repo_error(err: &RepoError) -> (StatusCode, &'static str, String) {
    match err {
        RepoError::RepoNotFound { .. } => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        RepoError::RepoExists { .. } => (StatusCode::CONFLICT, "conflict", err.to_string()),
        RepoError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
    }
}

fn map_prompt_error(err: &PromptError) -> (StatusCode, &'static str, String) {
    match err {
        PromptError::PromptNotFound { .. } => {
            (StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        PromptError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
    }
}

fn map_analysis_error(err: &AnalysisError) -> (StatusCode, &'static str, String) {
    match err {
        AnalysisError::ProviderUnavailable { .. } | AnalysisError::EmptyResponse => (
            StatusCode::SERVICE_UNAVAILABLE,
            "provider_unavailable",
            err.to_string(),
        ),
        AnalysisError::Timeout { .. } => {
            (StatusCode::GATEWAY_TIMEOUT, "timeout", err.to_string())
        }
        AnalysisError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            err.to_string(),
        ),
    }
}

fn map_event_error(err: &EventError) -> (StatusCode, &'static str, String) {
    match err {
        EventError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
    }
}
