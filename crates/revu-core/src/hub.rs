use crate::analysis::{AnalysisBackend, AnalysisRequest};
use crate::error::{AnalysisError, PromptError, RepoError, ReviewError, RevuError};
use crate::events::EventRepository;
use crate::extract::{self, ExtractionContext};
use crate::metrics;
use crate::prompts::PromptRepository;
use crate::repos::RepoRepository;
use crate::reviews::ReviewRepository;
use crate::store::Store;
use crate::types::event::EventBody;
use crate::types::metrics::{DashboardOverview, DeveloperRanking, RepositoryRanking, TrendPoint};
use crate::types::{
    CodeReview, CreatePromptInput, CreateReviewInput, PromptId, RegisterRepoInput, Repo, RepoId,
    ReviewFilter, ReviewId, ReviewPrompt, ReviewStatus, TrendPeriod, UpdatePromptInput,
};
use chrono::{Duration, Utc};
use revu_events::{EventBus, EventRecord, EventSource};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub source: EventSource,
    pub correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(source: EventSource, correlation_id: Option<String>) -> Self {
        Self {
            source,
            correlation_id,
        }
    }
}

pub struct Hub<S: Store> {
    store: S,
    event_bus: EventBus,
}

impl<S: Store> Hub<S> {
    pub fn new(store: S, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    pub fn reviews(&self) -> ReviewsApi<'_, S> {
        ReviewsApi { core: self }
    }

    pub fn repos(&self) -> ReposApi<'_, S> {
        ReposApi { core: self }
    }

    pub fn prompts(&self) -> PromptsApi<'_, S> {
        PromptsApi { core: self }
    }

    pub fn metrics(&self) -> MetricsApi<'_, S> {
        MetricsApi { core: self }
    }

    pub fn events(&self) -> EventsApi<'_, S> {
        EventsApi { core: self }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs `f` in one transaction, appends the events it returns, then
    /// publishes them on the bus after commit. Events from rolled-back
    /// transactions are never observable.
    fn with_events<T, F>(&self, ctx: &RequestContext, f: F) -> Result<T, RevuError>
    where
        F: FnOnce(&S) -> Result<(T, Vec<EventBody>), RevuError>,
    {
        let (value, records) = self.store.with_tx(|store| {
            let (value, bodies) = f(store)?;
            let mut records = Vec::new();
            for body in bodies {
                let record = EventRecord::draft(ctx.source, ctx.correlation_id.clone(), &body)
                    .map_err(|err| RevuError::Internal {
                        message: err.to_string(),
                    })?;
                let record = store.events().append(record)?;
                records.push(record);
            }
            Ok((value, records))
        })?;
        for record in records {
            self.event_bus.publish(record);
        }
        Ok(value)
    }
}

pub struct ReviewsApi<'a, S: Store> {
    core: &'a Hub<S>,
}

impl<'a, S: Store> ReviewsApi<'a, S> {
    pub fn submit(
        &self,
        ctx: &RequestContext,
        input: CreateReviewInput,
    ) -> Result<CodeReview, RevuError> {
        validate_submission(&input)?;
        self.core.with_events(ctx, |store| {
            if store.repos().get(&input.repo_id)?.is_none() {
                return Err(RevuError::Repo(RepoError::RepoNotFound {
                    id: input.repo_id.clone(),
                }));
            }
            if let Some(prompt_id) = &input.prompt_id {
                if store.prompts().get(prompt_id)?.is_none() {
                    return Err(RevuError::Prompt(PromptError::PromptNotFound {
                        id: prompt_id.clone(),
                    }));
                }
            }
            let review = store.reviews().create(input.clone())?;
            Ok((
                review.clone(),
                vec![EventBody::ReviewSubmitted { review }],
            ))
        })
    }

    pub fn get(&self, id: &ReviewId) -> Result<CodeReview, RevuError> {
        let review = self.core.store.reviews().get(id)?;
        review.ok_or_else(|| RevuError::Review(ReviewError::NotFound { id: id.clone() }))
    }

    pub fn list(&self, filter: ReviewFilter) -> Result<Vec<CodeReview>, RevuError> {
        self.core
            .store
            .reviews()
            .list(filter)
            .map_err(RevuError::from)
    }

    /// Idempotent: deleting an id that no longer exists succeeds without
    /// emitting an event.
    pub fn delete(&self, ctx: &RequestContext, id: &ReviewId) -> Result<(), RevuError> {
        self.core.with_events(ctx, |store| {
            let removed = store.reviews().delete(id)?;
            let bodies = if removed {
                vec![EventBody::ReviewDeleted {
                    review_id: id.clone(),
                }]
            } else {
                Vec::new()
            };
            Ok(((), bodies))
        })
    }

    pub fn start(&self, ctx: &RequestContext, id: &ReviewId) -> Result<CodeReview, RevuError> {
        self.core.with_events(ctx, |store| {
            let review = store
                .reviews()
                .update_status(id, ReviewStatus::InProgress, None, None)?;
            Ok((review.clone(), vec![EventBody::ReviewStarted { review }]))
        })
    }

    /// Completes an in-progress review from the backend's raw text. The
    /// structured result is computed here so callers can never attach an
    /// analysis that disagrees with the text it came from.
    pub fn complete(
        &self,
        ctx: &RequestContext,
        id: &ReviewId,
        raw_text: &str,
    ) -> Result<CodeReview, RevuError> {
        if raw_text.trim().is_empty() {
            return Err(RevuError::Review(ReviewError::InvalidInput {
                message: "raw analysis text must not be empty".to_string(),
            }));
        }
        self.core.with_events(ctx, |store| {
            let current = store
                .reviews()
                .get(id)?
                .ok_or_else(|| ReviewError::NotFound { id: id.clone() })?;
            let analysis = extract::extract(
                raw_text,
                &ExtractionContext {
                    file_name: current.file_name.clone(),
                    model_id: current.model_id.clone(),
                },
            );
            let review =
                store
                    .reviews()
                    .update_status(id, ReviewStatus::Completed, Some(analysis), None)?;
            Ok((review.clone(), vec![EventBody::ReviewCompleted { review }]))
        })
    }

    pub fn fail(
        &self,
        ctx: &RequestContext,
        id: &ReviewId,
        error: String,
    ) -> Result<CodeReview, RevuError> {
        self.core.with_events(ctx, |store| {
            let review =
                store
                    .reviews()
                    .update_status(id, ReviewStatus::Failed, None, Some(error.clone()))?;
            Ok((
                review.clone(),
                vec![EventBody::ReviewFailed { review, error }],
            ))
        })
    }

    /// Re-queues a failed review. Racing retries are serialized by the
    /// store transaction; the loser sees a Pending review and gets
    /// `InvalidTransition`.
    pub fn retry(&self, ctx: &RequestContext, id: &ReviewId) -> Result<CodeReview, RevuError> {
        self.core.with_events(ctx, |store| {
            let review = store
                .reviews()
                .update_status(id, ReviewStatus::Pending, None, None)?;
            Ok((review.clone(), vec![EventBody::ReviewRetried { review }]))
        })
    }

    /// Drives one review through the whole pipeline: mark it in
    /// progress, obtain raw text from the backend, extract the
    /// structured result and complete. A backend failure (or an empty
    /// response) marks the review Failed with the error recorded in
    /// `error_message`; it is never returned as an error from here.
    pub fn analyze(
        &self,
        ctx: &RequestContext,
        id: &ReviewId,
        backend: &dyn AnalysisBackend,
    ) -> Result<CodeReview, RevuError> {
        let review = self.start(ctx, id)?;

        let prompt = match &review.prompt_id {
            Some(prompt_id) => self
                .core
                .store
                .prompts()
                .get(prompt_id)?
                .map(|p| p.content),
            None => None,
        };
        let request = AnalysisRequest {
            file_name: review.file_name.clone(),
            code: review.file_content.clone().unwrap_or_default(),
            prompt,
            model_id: review.model_id.clone(),
        };

        match backend.analyze(&request) {
            Ok(raw) if raw.trim().is_empty() => {
                self.fail(ctx, id, AnalysisError::EmptyResponse.to_string())
            }
            Ok(raw) => self.complete(ctx, id, &raw),
            Err(err) => self.fail(ctx, id, err.to_string()),
        }
    }
}

pub struct ReposApi<'a, S: Store> {
    core: &'a Hub<S>,
}

impl<'a, S: Store> ReposApi<'a, S> {
    pub fn register(
        &self,
        ctx: &RequestContext,
        input: RegisterRepoInput,
    ) -> Result<Repo, RevuError> {
        if input.name.trim().is_empty() {
            return Err(RevuError::Repo(RepoError::InvalidInput {
                message: "name must not be empty".to_string(),
            }));
        }
        if input.url.trim().is_empty() {
            return Err(RevuError::Repo(RepoError::InvalidInput {
                message: "url must not be empty".to_string(),
            }));
        }
        self.core.with_events(ctx, |store| {
            let repo = store.repos().register(input.clone())?;
            Ok((repo.clone(), vec![EventBody::RepoRegistered { repo }]))
        })
    }

    pub fn get(&self, id: &RepoId) -> Result<Repo, RevuError> {
        let repo = self.core.store.repos().get(id)?;
        repo.ok_or_else(|| RevuError::Repo(RepoError::RepoNotFound { id: id.clone() }))
    }

    pub fn list(&self) -> Result<Vec<Repo>, RevuError> {
        self.core.store.repos().list().map_err(RevuError::from)
    }

    pub fn unregister(&self, ctx: &RequestContext, id: &RepoId) -> Result<(), RevuError> {
        self.core.with_events(ctx, |store| {
            store.repos().unregister(id)?;
            Ok((
                (),
                vec![EventBody::RepoUnregistered {
                    repo_id: id.clone(),
                }],
            ))
        })
    }
}

pub struct PromptsApi<'a, S: Store> {
    core: &'a Hub<S>,
}

impl<'a, S: Store> PromptsApi<'a, S> {
    pub fn create(
        &self,
        ctx: &RequestContext,
        input: CreatePromptInput,
    ) -> Result<ReviewPrompt, RevuError> {
        if input.name.trim().is_empty() || input.content.trim().is_empty() {
            return Err(RevuError::Prompt(PromptError::InvalidInput {
                message: "name and content must not be empty".to_string(),
            }));
        }
        self.core.with_events(ctx, |store| {
            let prompt = store.prompts().create(input.clone())?;
            Ok((prompt.clone(), vec![EventBody::PromptCreated { prompt }]))
        })
    }

    pub fn get(&self, id: &PromptId) -> Result<ReviewPrompt, RevuError> {
        let prompt = self.core.store.prompts().get(id)?;
        prompt.ok_or_else(|| RevuError::Prompt(PromptError::PromptNotFound { id: id.clone() }))
    }

    pub fn list(&self) -> Result<Vec<ReviewPrompt>, RevuError> {
        self.core.store.prompts().list().map_err(RevuError::from)
    }

    pub fn update(
        &self,
        ctx: &RequestContext,
        id: &PromptId,
        input: UpdatePromptInput,
    ) -> Result<ReviewPrompt, RevuError> {
        self.core.with_events(ctx, |store| {
            let prompt = store.prompts().update(id, input.clone())?;
            Ok((prompt.clone(), vec![EventBody::PromptUpdated { prompt }]))
        })
    }

    pub fn delete(&self, ctx: &RequestContext, id: &PromptId) -> Result<(), RevuError> {
        self.core.with_events(ctx, |store| {
            store.prompts().delete(id)?;
            Ok((
                (),
                vec![EventBody::PromptDeleted {
                    prompt_id: id.clone(),
                }],
            ))
        })
    }
}

pub struct MetricsApi<'a, S: Store> {
    core: &'a Hub<S>,
}

impl<'a, S: Store> MetricsApi<'a, S> {
    pub fn overview(&self, window_days: u32) -> Result<DashboardOverview, RevuError> {
        let reviews = self.window(window_days)?;
        Ok(metrics::overview(&reviews, window_days))
    }

    pub fn repository_ranking(
        &self,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<RepositoryRanking>, RevuError> {
        let reviews = self.window(window_days)?;
        Ok(metrics::repository_ranking(&reviews, limit))
    }

    pub fn developer_ranking(
        &self,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<DeveloperRanking>, RevuError> {
        let reviews = self.window(window_days)?;
        Ok(metrics::developer_ranking(
            &reviews,
            window_days,
            Utc::now(),
            limit,
        ))
    }

    pub fn trends(
        &self,
        window_days: u32,
        period: TrendPeriod,
    ) -> Result<Vec<TrendPoint>, RevuError> {
        let reviews = self.window(window_days)?;
        Ok(metrics::trends(&reviews, period))
    }

    /// Aggregates always read through the same list path the review API
    /// uses, so they cannot disagree with the records themselves.
    fn window(&self, window_days: u32) -> Result<Vec<CodeReview>, RevuError> {
        let filter = ReviewFilter {
            created_after: Some(Utc::now() - Duration::days(i64::from(window_days))),
            ..ReviewFilter::default()
        };
        self.core
            .store
            .reviews()
            .list(filter)
            .map_err(RevuError::from)
    }
}

pub struct EventsApi<'a, S: Store> {
    core: &'a Hub<S>,
}

impl<'a, S: Store> EventsApi<'a, S> {
    pub fn list(
        &self,
        after: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<EventRecord>, RevuError> {
        self.core.store.events().list(after, limit)
    }
}

fn validate_submission(input: &CreateReviewInput) -> Result<(), RevuError> {
    for (field, value) in [
        ("branch", &input.branch),
        ("developer", &input.developer),
        ("file_name", &input.file_name),
    ] {
        if value.trim().is_empty() {
            return Err(RevuError::Review(ReviewError::InvalidInput {
                message: format!("{field} must not be empty"),
            }));
        }
    }
    Ok(())
}
