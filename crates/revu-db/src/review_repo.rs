use crate::util::{enum_text, json_text, parse_enum, parse_json, parse_timestamp, timestamp};
use revu_core::error::ReviewError;
use revu_core::reviews::ReviewRepository;
use revu_core::types::enums::ReviewStatus;
use revu_core::types::ids::ReviewId;
use revu_core::types::io::{CreateReviewInput, ReviewFilter};
use revu_core::types::review::{AnalysisResult, CodeReview};
use revu_core::validation::validate_review_status_transition;
use rusqlite::Connection;

const REVIEW_COLUMNS: &str = "id, repo_id, branch, developer, file_name, file_path, file_content, commit_sha, status, prompt_id, model_id, analysis_json, error_message, created_at, updated_at, completed_at";

pub struct ReviewRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> ReviewRepository for ReviewRepo<'a> {
    fn create(&self, input: CreateReviewInput) -> Result<CodeReview, ReviewError> {
        let now = chrono::Utc::now();
        let review = CodeReview {
            id: ReviewId::generate(),
            repo_id: input.repo_id,
            branch: input.branch,
            developer: input.developer,
            file_name: input.file_name,
            file_path: input.file_path,
            file_content: input.file_content,
            commit_sha: input.commit_sha,
            status: ReviewStatus::Pending,
            prompt_id: input.prompt_id,
            model_id: input.model_id,
            analysis_result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let sql = "INSERT INTO reviews (id, repo_id, branch, developer, file_name, file_path, file_content, commit_sha, status, prompt_id, model_id, analysis_json, error_message, created_at, updated_at, completed_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";
        let params = (
            review.id.as_str(),
            review.repo_id.as_str(),
            review.branch.clone(),
            review.developer.clone(),
            review.file_name.clone(),
            review.file_path.clone(),
            review.file_content.clone(),
            review.commit_sha.clone(),
            enum_text(&review.status).map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?,
            review.prompt_id.as_ref().map(|id| id.as_str().to_string()),
            review.model_id.clone(),
            None::<String>,
            None::<String>,
            timestamp(&review.created_at),
            timestamp(&review.updated_at),
            None::<String>,
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;

        Ok(review)
    }

    fn get(&self, id: &ReviewId) -> Result<Option<CodeReview>, ReviewError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1");
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt
            .query([id.as_str()])
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;
        let Some(row) = rows.next().map_err(|err| ReviewError::InvalidInput {
            message: err.to_string(),
        })?
        else {
            return Ok(None);
        };
        map_review_row(row).map(Some)
    }

    fn list(&self, filter: ReviewFilter) -> Result<Vec<CodeReview>, ReviewError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC");
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt.query([]).map_err(|err| ReviewError::InvalidInput {
            message: err.to_string(),
        })?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next().map_err(|err| ReviewError::InvalidInput {
            message: err.to_string(),
        })? {
            let review = map_review_row(row)?;
            if matches_filter(&review, &filter) {
                reviews.push(review);
            }
        }
        Ok(reviews)
    }

    fn update_status(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
        analysis: Option<AnalysisResult>,
        error_message: Option<String>,
    ) -> Result<CodeReview, ReviewError> {
        let mut review = self.get(id)?.ok_or(ReviewError::NotFound { id: id.clone() })?;
        validate_review_status_transition(review.status, status)?;

        let now = chrono::Utc::now();
        review.status = status;
        review.updated_at = now;
        match status {
            ReviewStatus::Completed => {
                let Some(analysis) = analysis else {
                    return Err(ReviewError::InvalidInput {
                        message: "completing a review requires an analysis result".to_string(),
                    });
                };
                review.analysis_result = Some(analysis);
                review.error_message = None;
                review.completed_at = Some(now);
            }
            ReviewStatus::Failed => {
                let Some(error_message) = error_message else {
                    return Err(ReviewError::InvalidInput {
                        message: "failing a review requires an error message".to_string(),
                    });
                };
                review.analysis_result = None;
                review.error_message = Some(error_message);
                review.completed_at = None;
            }
            ReviewStatus::Pending | ReviewStatus::InProgress => {
                review.analysis_result = None;
                review.error_message = None;
                review.completed_at = None;
            }
        }

        let sql = "UPDATE reviews SET status = ?1, analysis_json = ?2, error_message = ?3, updated_at = ?4, completed_at = ?5 WHERE id = ?6";
        let analysis_json = match &review.analysis_result {
            Some(analysis) => {
                Some(json_text(analysis).map_err(|err| ReviewError::InvalidInput {
                    message: err.to_string(),
                })?)
            }
            None => None,
        };
        let params = (
            enum_text(&review.status).map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?,
            analysis_json,
            review.error_message.clone(),
            timestamp(&review.updated_at),
            review.completed_at.map(|value| timestamp(&value)),
            review.id.as_str(),
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;

        Ok(review)
    }

    fn delete(&self, id: &ReviewId) -> Result<bool, ReviewError> {
        let removed = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1", [id.as_str()])
            .map_err(|err| ReviewError::InvalidInput {
                message: err.to_string(),
            })?;
        Ok(removed > 0)
    }
}

fn matches_filter(review: &CodeReview, filter: &ReviewFilter) -> bool {
    if let Some(repo_id) = &filter.repo_id {
        if &review.repo_id != repo_id {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if review.status != status {
            return false;
        }
    }
    if let Some(developer) = &filter.developer {
        if &review.developer != developer {
            return false;
        }
    }
    if let Some(after) = filter.created_after {
        if review.created_at < after {
            return false;
        }
    }
    if let Some(before) = filter.created_before {
        if review.created_at >= before {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let haystack = [&review.file_name, &review.branch, &review.developer];
        if !haystack
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    true
}

fn map_review_row(row: &rusqlite::Row<'_>) -> Result<CodeReview, ReviewError> {
    let invalid = |err: &dyn std::fmt::Display| ReviewError::InvalidInput {
        message: err.to_string(),
    };

    let id: String = row.get(0).map_err(|err| invalid(&err))?;
    let repo_id: String = row.get(1).map_err(|err| invalid(&err))?;
    let branch: String = row.get(2).map_err(|err| invalid(&err))?;
    let developer: String = row.get(3).map_err(|err| invalid(&err))?;
    let file_name: String = row.get(4).map_err(|err| invalid(&err))?;
    let file_path: Option<String> = row.get(5).map_err(|err| invalid(&err))?;
    let file_content: Option<String> = row.get(6).map_err(|err| invalid(&err))?;
    let commit_sha: Option<String> = row.get(7).map_err(|err| invalid(&err))?;
    let status: String = row.get(8).map_err(|err| invalid(&err))?;
    let prompt_id: Option<String> = row.get(9).map_err(|err| invalid(&err))?;
    let model_id: Option<String> = row.get(10).map_err(|err| invalid(&err))?;
    let analysis_json: Option<String> = row.get(11).map_err(|err| invalid(&err))?;
    let error_message: Option<String> = row.get(12).map_err(|err| invalid(&err))?;
    let created_at: String = row.get(13).map_err(|err| invalid(&err))?;
    let updated_at: String = row.get(14).map_err(|err| invalid(&err))?;
    let completed_at: Option<String> = row.get(15).map_err(|err| invalid(&err))?;

    Ok(CodeReview {
        id: id.parse().map_err(|err| invalid(&err))?,
        repo_id: repo_id.parse().map_err(|err| invalid(&err))?,
        branch,
        developer,
        file_name,
        file_path,
        file_content,
        commit_sha,
        status: parse_enum("status", &status).map_err(|err| invalid(&err))?,
        prompt_id: prompt_id
            .map(|value| value.parse())
            .transpose()
            .map_err(|err| invalid(&err))?,
        model_id,
        analysis_result: analysis_json
            .map(|value| parse_json("analysis_json", &value))
            .transpose()
            .map_err(|err| invalid(&err))?,
        error_message,
        created_at: parse_timestamp("created_at", &created_at).map_err(|err| invalid(&err))?,
        updated_at: parse_timestamp("updated_at", &updated_at).map_err(|err| invalid(&err))?,
        completed_at: completed_at
            .map(|value| parse_timestamp("completed_at", &value))
            .transpose()
            .map_err(|err| invalid(&err))?,
    })
}
