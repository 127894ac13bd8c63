use crate::util::{parse_timestamp, timestamp};
use revu_core::error::PromptError;
use revu_core::prompts::PromptRepository;
use revu_core::types::ids::PromptId;
use revu_core::types::io::{CreatePromptInput, UpdatePromptInput};
use revu_core::types::prompt::ReviewPrompt;
use rusqlite::Connection;

pub struct PromptRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> PromptRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> PromptRepository for PromptRepo<'a> {
    fn create(&self, input: CreatePromptInput) -> Result<ReviewPrompt, PromptError> {
        let now = chrono::Utc::now();
        let prompt = ReviewPrompt {
            id: PromptId::generate(),
            name: input.name,
            content: input.content,
            language: input.language,
            active: input.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let sql = "INSERT INTO prompts (id, name, content, language, active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
        let params = (
            prompt.id.as_str(),
            prompt.name.clone(),
            prompt.content.clone(),
            prompt.language.clone(),
            i64::from(prompt.active),
            timestamp(&prompt.created_at),
            timestamp(&prompt.updated_at),
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;

        Ok(prompt)
    }

    fn get(&self, id: &PromptId) -> Result<Option<ReviewPrompt>, PromptError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, content, language, active, created_at, updated_at FROM prompts WHERE id = ?1")
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt
            .query([id.as_str()])
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;
        let Some(row) = rows.next().map_err(|err| PromptError::InvalidInput {
            message: err.to_string(),
        })?
        else {
            return Ok(None);
        };
        map_prompt_row(row).map(Some)
    }

    fn list(&self) -> Result<Vec<ReviewPrompt>, PromptError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, content, language, active, created_at, updated_at FROM prompts ORDER BY name ASC")
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt.query([]).map_err(|err| PromptError::InvalidInput {
            message: err.to_string(),
        })?;
        let mut prompts = Vec::new();
        while let Some(row) = rows.next().map_err(|err| PromptError::InvalidInput {
            message: err.to_string(),
        })? {
            prompts.push(map_prompt_row(row)?);
        }
        Ok(prompts)
    }

    fn update(
        &self,
        id: &PromptId,
        input: UpdatePromptInput,
    ) -> Result<ReviewPrompt, PromptError> {
        let mut prompt = self
            .get(id)?
            .ok_or(PromptError::PromptNotFound { id: id.clone() })?;
        if let Some(name) = input.name {
            prompt.name = name;
        }
        if let Some(content) = input.content {
            prompt.content = content;
        }
        if let Some(language) = input.language {
            prompt.language = Some(language);
        }
        if let Some(active) = input.active {
            prompt.active = active;
        }
        prompt.updated_at = chrono::Utc::now();

        let sql = "UPDATE prompts SET name = ?1, content = ?2, language = ?3, active = ?4, updated_at = ?5 WHERE id = ?6";
        let params = (
            prompt.name.clone(),
            prompt.content.clone(),
            prompt.language.clone(),
            i64::from(prompt.active),
            timestamp(&prompt.updated_at),
            prompt.id.as_str(),
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;

        Ok(prompt)
    }

    fn delete(&self, id: &PromptId) -> Result<(), PromptError> {
        let removed = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", [id.as_str()])
            .map_err(|err| PromptError::InvalidInput {
                message: err.to_string(),
            })?;
        if removed == 0 {
            return Err(PromptError::PromptNotFound { id: id.clone() });
        }
        Ok(())
    }
}

fn map_prompt_row(row: &rusqlite::Row<'_>) -> Result<ReviewPrompt, PromptError> {
    let invalid = |err: &dyn std::fmt::Display| PromptError::InvalidInput {
        message: err.to_string(),
    };

    let id: String = row.get(0).map_err(|err| invalid(&err))?;
    let name: String = row.get(1).map_err(|err| invalid(&err))?;
    let content: String = row.get(2).map_err(|err| invalid(&err))?;
    let language: Option<String> = row.get(3).map_err(|err| invalid(&err))?;
    let active: i64 = row.get(4).map_err(|err| invalid(&err))?;
    let created_at: String = row.get(5).map_err(|err| invalid(&err))?;
    let updated_at: String = row.get(6).map_err(|err| invalid(&err))?;

    Ok(ReviewPrompt {
        id: id.parse().map_err(|err| invalid(&err))?,
        name,
        content,
        language,
        active: active != 0,
        created_at: parse_timestamp("created_at", &created_at).map_err(|err| invalid(&err))?,
        updated_at: parse_timestamp("updated_at", &updated_at).map_err(|err| invalid(&err))?,
    })
}
