use revu_core::error::{ReviewError, RevuError};
use revu_core::store::Store;
use rusqlite::Connection;

use crate::event_repo::EventRepo;
use crate::prompt_repo::PromptRepo;
use crate::repo_repo::RepoRepo;
use crate::review_repo::ReviewRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for DbStore {
    type Reviews<'a>
        = ReviewRepo<'a>
    where
        Self: 'a;
    type Repos<'a>
        = RepoRepo<'a>
    where
        Self: 'a;
    type Prompts<'a>
        = PromptRepo<'a>
    where
        Self: 'a;
    type Events<'a>
        = EventRepo<'a>
    where
        Self: 'a;

    fn reviews(&self) -> Self::Reviews<'_> {
        ReviewRepo::new(&self.conn)
    }

    fn repos(&self) -> Self::Repos<'_> {
        RepoRepo::new(&self.conn)
    }

    fn prompts(&self) -> Self::Prompts<'_> {
        PromptRepo::new(&self.conn)
    }

    fn events(&self) -> Self::Events<'_> {
        EventRepo::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, RevuError>
    where
        F: FnOnce(&Self) -> Result<T, RevuError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE").map_err(|err| {
            RevuError::Review(ReviewError::InvalidInput {
                message: err.to_string(),
            })
        })?;
        let result = f(self);
        match result {
            Ok(value) => {
                self.conn.execute_batch("COMMIT").map_err(|err| {
                    RevuError::Review(ReviewError::InvalidInput {
                        message: err.to_string(),
                    })
                })?;
                Ok(value)
            }
            Err(err) => {
                self.conn
                    .execute_batch("ROLLBACK")
                    .map_err(|rollback_err| {
                        RevuError::Review(ReviewError::InvalidInput {
                            message: rollback_err.to_string(),
                        })
                    })?;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use revu_core::analysis::{AnalysisBackend, AnalysisRequest};
    use revu_core::error::{AnalysisError, RepoError, ReviewError};
    use revu_core::types::enums::{RepoProvider, ReviewStatus};
    use revu_core::types::io::{
        CreatePromptInput, CreateReviewInput, RegisterRepoInput, ReviewFilter, UpdatePromptInput,
    };
    use revu_core::types::repo::Repo;
    use revu_core::types::review::CodeReview;
    use revu_core::{Hub, RequestContext};
    use revu_events::{EventBus, EventSource};
    use std::sync::Mutex;

    struct CannedBackend {
        text: String,
    }

    impl AnalysisBackend for CannedBackend {
        fn analyze(&self, _request: &AnalysisRequest) -> Result<String, AnalysisError> {
            Ok(self.text.clone())
        }
    }

    struct FailingBackend;

    impl AnalysisBackend for FailingBackend {
        fn analyze(&self, _request: &AnalysisRequest) -> Result<String, AnalysisError> {
            Err(AnalysisError::ProviderUnavailable {
                message: "provider offline".to_string(),
            })
        }
    }

    struct RecordingBackend {
        seen: Mutex<Vec<AnalysisRequest>>,
    }

    impl AnalysisBackend for RecordingBackend {
        fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok("Código correto.".to_string())
        }
    }

    fn setup_hub() -> Hub<DbStore> {
        let conn = with_test_db().unwrap();
        Hub::new(DbStore::new(conn), EventBus::new(64))
    }

    fn ctx() -> RequestContext {
        RequestContext::new(EventSource::Api, Some("test".to_string()))
    }

    fn register_repo(hub: &Hub<DbStore>) -> Repo {
        hub.repos()
            .register(
                &ctx(),
                RegisterRepoInput {
                    name: "payments".to_string(),
                    url: "https://github.com/acme/payments".to_string(),
                    provider: RepoProvider::GitHub,
                    default_branch: None,
                },
            )
            .unwrap()
    }

    fn submit_review(hub: &Hub<DbStore>, repo: &Repo) -> CodeReview {
        hub.reviews()
            .submit(
                &ctx(),
                CreateReviewInput {
                    repo_id: repo.id.clone(),
                    branch: "main".to_string(),
                    developer: "ana".to_string(),
                    file_name: "ContaService.java".to_string(),
                    file_path: Some("src/main/java/ContaService.java".to_string()),
                    file_content: Some("class ContaService {}".to_string()),
                    commit_sha: None,
                    prompt_id: None,
                    model_id: None,
                },
            )
            .unwrap()
    }

    #[test]
    fn analyze_completes_a_pending_review() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = submit_review(&hub, &repo);
        assert_eq!(review.status, ReviewStatus::Pending);

        let backend = CannedBackend {
            text: "Código bem estruturado e adequado, sem problema grave.".to_string(),
        };
        let completed = hub.reviews().analyze(&ctx(), &review.id, &backend).unwrap();

        assert_eq!(completed.status, ReviewStatus::Completed);
        assert!(completed.completed_at.is_some());
        let analysis = completed.analysis_result.unwrap();
        // base 75 + "bem estruturado" + "adequado" - "problema"
        assert_eq!(analysis.quality_score, 77);
        assert!(completed.error_message.is_none());
    }

    #[test]
    fn backend_failure_marks_the_review_failed() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = submit_review(&hub, &repo);

        let failed = hub
            .reviews()
            .analyze(&ctx(), &review.id, &FailingBackend)
            .unwrap();
        assert_eq!(failed.status, ReviewStatus::Failed);
        assert!(failed.error_message.unwrap().contains("provider offline"));
        assert!(failed.analysis_result.is_none());
    }

    #[test]
    fn retry_requeues_a_failed_review_exactly_once() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = submit_review(&hub, &repo);

        let failed = hub
            .reviews()
            .analyze(&ctx(), &review.id, &FailingBackend)
            .unwrap();
        assert_eq!(failed.status, ReviewStatus::Failed);

        let retried = hub.reviews().retry(&ctx(), &review.id).unwrap();
        assert_eq!(retried.status, ReviewStatus::Pending);
        assert!(retried.error_message.is_none());

        // A second retry finds the review already Pending.
        let second = hub.reviews().retry(&ctx(), &review.id);
        assert!(matches!(
            second,
            Err(RevuError::Review(ReviewError::InvalidTransition {
                from: ReviewStatus::Pending,
                to: ReviewStatus::Pending,
            }))
        ));
    }

    #[test]
    fn completed_reviews_cannot_move_again() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = submit_review(&hub, &repo);
        let backend = CannedBackend {
            text: "Tudo correto.".to_string(),
        };
        hub.reviews().analyze(&ctx(), &review.id, &backend).unwrap();

        let result = hub.reviews().retry(&ctx(), &review.id);
        assert!(matches!(
            result,
            Err(RevuError::Review(ReviewError::InvalidTransition { .. }))
        ));
    }

    #[test]
    fn delete_is_idempotent_and_emits_once() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = submit_review(&hub, &repo);

        let before = hub.events().list(None, None).unwrap().len();
        hub.reviews().delete(&ctx(), &review.id).unwrap();
        hub.reviews().delete(&ctx(), &review.id).unwrap();
        let events = hub.events().list(None, None).unwrap();

        // Exactly one ReviewDeleted event for the two calls.
        assert_eq!(events.len(), before + 1);
        assert!(matches!(
            hub.reviews().get(&review.id),
            Err(RevuError::Review(ReviewError::NotFound { .. }))
        ));
    }

    #[test]
    fn submit_rejects_unknown_repo_and_rolls_back() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        hub.repos().unregister(&ctx(), &repo.id).unwrap();

        let result = hub.reviews().submit(
            &ctx(),
            CreateReviewInput {
                repo_id: repo.id.clone(),
                branch: "main".to_string(),
                developer: "ana".to_string(),
                file_name: "Main.java".to_string(),
                file_path: None,
                file_content: None,
                commit_sha: None,
                prompt_id: None,
                model_id: None,
            },
        );
        assert!(result.is_err());
        assert!(hub.reviews().list(ReviewFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn events_are_sequenced_in_commit_order() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        submit_review(&hub, &repo);
        submit_review(&hub, &repo);

        let events = hub.events().list(None, None).unwrap();
        assert!(events.len() >= 3);
        for pair in events.windows(2) {
            assert!(pair[0].seq < pair[1].seq);
        }

        let tail = hub.events().list(Some(events[0].seq), None).unwrap();
        assert_eq!(tail.len(), events.len() - 1);
    }

    #[test]
    fn overview_agrees_with_the_review_list() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let first = submit_review(&hub, &repo);
        submit_review(&hub, &repo);

        let backend = CannedBackend {
            text: "Código de boa qualidade, bem estruturado.".to_string(),
        };
        hub.reviews().analyze(&ctx(), &first.id, &backend).unwrap();

        let overview = hub.metrics().overview(30).unwrap();
        let listed = hub.reviews().list(ReviewFilter::default()).unwrap();
        assert_eq!(overview.total_reviews, listed.len() as u64);
        assert_eq!(overview.active_repositories, 1);
        assert_eq!(overview.completion_rate, 0.5);
        assert_eq!(overview.average_quality_score, 85.0);
    }

    #[test]
    fn duplicate_repo_name_is_a_conflict() {
        let hub = setup_hub();
        register_repo(&hub);

        let second = hub.repos().register(
            &ctx(),
            RegisterRepoInput {
                name: "payments".to_string(),
                url: "https://dev.azure.com/acme/payments".to_string(),
                provider: RepoProvider::AzureDevOps,
                default_branch: None,
            },
        );
        assert!(matches!(
            second,
            Err(RevuError::Repo(RepoError::RepoExists { name })) if name == "payments"
        ));

        assert_eq!(hub.repos().list().unwrap().len(), 1);
    }

    #[test]
    fn prompt_update_bumps_updated_at() {
        let hub = setup_hub();
        let created = hub
            .prompts()
            .create(
                &ctx(),
                CreatePromptInput {
                    name: "java-review".to_string(),
                    content: "Revise o código Java a seguir.".to_string(),
                    language: Some("java".to_string()),
                    active: None,
                },
            )
            .unwrap();

        let updated = hub
            .prompts()
            .update(
                &ctx(),
                &created.id,
                UpdatePromptInput {
                    name: None,
                    content: Some("Revise o código Java com foco em segurança.".to_string()),
                    language: None,
                    active: Some(false),
                },
            )
            .unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.name, created.name);
        assert!(!updated.active);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn requested_model_reaches_the_backend() {
        let hub = setup_hub();
        let repo = register_repo(&hub);
        let review = hub
            .reviews()
            .submit(
                &ctx(),
                CreateReviewInput {
                    repo_id: repo.id.clone(),
                    branch: "main".to_string(),
                    developer: "ana".to_string(),
                    file_name: "ContaService.java".to_string(),
                    file_path: None,
                    file_content: Some("class ContaService {}".to_string()),
                    commit_sha: None,
                    prompt_id: None,
                    model_id: Some("gpt-4o".to_string()),
                },
            )
            .unwrap();
        assert_eq!(review.model_id.as_deref(), Some("gpt-4o"));

        let backend = RecordingBackend {
            seen: Mutex::new(Vec::new()),
        };
        let completed = hub.reviews().analyze(&ctx(), &review.id, &backend).unwrap();
        assert_eq!(completed.status, ReviewStatus::Completed);
        assert_eq!(completed.model_id.as_deref(), Some("gpt-4o"));

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model_id.as_deref(), Some("gpt-4o"));
    }
}
