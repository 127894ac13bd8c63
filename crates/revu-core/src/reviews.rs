use crate::error::ReviewError;
use crate::types::review::AnalysisResult;
use crate::types::{CodeReview, CreateReviewInput, ReviewFilter, ReviewId, ReviewStatus};

pub trait ReviewRepository {
    fn create(&self, input: CreateReviewInput) -> Result<CodeReview, ReviewError>;
    fn get(&self, id: &ReviewId) -> Result<Option<CodeReview>, ReviewError>;
    fn list(&self, filter: ReviewFilter) -> Result<Vec<CodeReview>, ReviewError>;

    /// Moves a review along the lifecycle graph. Validates the edge and
    /// keeps `analysis_result`, `error_message` and `completed_at`
    /// consistent with the target status.
    fn update_status(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
        analysis: Option<AnalysisResult>,
        error_message: Option<String>,
    ) -> Result<CodeReview, ReviewError>;

    /// Returns whether a row was actually removed; deleting an absent id
    /// is not an error.
    fn delete(&self, id: &ReviewId) -> Result<bool, ReviewError>;
}
