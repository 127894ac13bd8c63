use crate::error::ReviewError;
use crate::types::enums::ReviewStatus;

/// Validates a review lifecycle edge. The graph is intentionally sparse:
/// `Completed` is terminal, and a review may only be re-queued from
/// `Failed`. Self-transitions are rejected like any other missing edge.
pub fn validate_review_status_transition(
    from: ReviewStatus,
    to: ReviewStatus,
) -> Result<(), ReviewError> {
    use ReviewStatus::{Completed, Failed, InProgress, Pending};

    let allowed = matches!(
        (from, to),
        (Pending, InProgress)
            | (Pending, Failed)
            | (InProgress, Completed)
            | (InProgress, Failed)
            | (Failed, Pending)
    );

    if allowed {
        Ok(())
    } else {
        Err(ReviewError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_lifecycle_edges() {
        let edges = [
            (ReviewStatus::Pending, ReviewStatus::InProgress),
            (ReviewStatus::Pending, ReviewStatus::Failed),
            (ReviewStatus::InProgress, ReviewStatus::Completed),
            (ReviewStatus::InProgress, ReviewStatus::Failed),
            (ReviewStatus::Failed, ReviewStatus::Pending),
        ];
        for (from, to) in edges {
            assert!(validate_review_status_transition(from, to).is_ok());
        }
    }

    #[test]
    fn completed_is_terminal() {
        for to in [
            ReviewStatus::Pending,
            ReviewStatus::InProgress,
            ReviewStatus::Completed,
            ReviewStatus::Failed,
        ] {
            assert!(matches!(
                validate_review_status_transition(ReviewStatus::Completed, to),
                Err(ReviewError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn rejects_self_transitions() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::InProgress,
            ReviewStatus::Failed,
        ] {
            assert!(validate_review_status_transition(status, status).is_err());
        }
    }

    #[test]
    fn rejects_skipping_in_progress() {
        assert_eq!(
            validate_review_status_transition(ReviewStatus::Pending, ReviewStatus::Completed),
            Err(ReviewError::InvalidTransition {
                from: ReviewStatus::Pending,
                to: ReviewStatus::Completed,
            })
        );
    }
}
