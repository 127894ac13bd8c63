use crate::util::{enum_text, parse_enum, parse_timestamp, timestamp};
use revu_core::error::RepoError;
use revu_core::repos::RepoRepository;
use revu_core::types::ids::RepoId;
use revu_core::types::io::RegisterRepoInput;
use revu_core::types::repo::Repo;
use rusqlite::Connection;

const DEFAULT_BRANCH: &str = "main";

pub struct RepoRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> RepoRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> RepoRepository for RepoRepo<'a> {
    fn register(&self, input: RegisterRepoInput) -> Result<Repo, RepoError> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM repos WHERE name = ?1")
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        let existing: i64 = stmt
            .query_row([input.name.as_str()], |row| row.get(0))
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        if existing > 0 {
            return Err(RepoError::RepoExists { name: input.name });
        }

        let now = chrono::Utc::now();
        let repo = Repo {
            id: RepoId::generate(),
            name: input.name,
            url: input.url,
            provider: input.provider,
            default_branch: input
                .default_branch
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            created_at: now,
            updated_at: now,
        };

        let sql = "INSERT INTO repos (id, name, url, provider, default_branch, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
        let params = (
            repo.id.as_str(),
            repo.name.clone(),
            repo.url.clone(),
            enum_text(&repo.provider).map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?,
            repo.default_branch.clone(),
            timestamp(&repo.created_at),
            timestamp(&repo.updated_at),
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;

        Ok(repo)
    }

    fn get(&self, id: &RepoId) -> Result<Option<Repo>, RepoError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, url, provider, default_branch, created_at, updated_at FROM repos WHERE id = ?1")
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt
            .query([id.as_str()])
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        let Some(row) = rows.next().map_err(|err| RepoError::InvalidInput {
            message: err.to_string(),
        })?
        else {
            return Ok(None);
        };
        map_repo_row(row).map(Some)
    }

    fn list(&self) -> Result<Vec<Repo>, RepoError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, url, provider, default_branch, created_at, updated_at FROM repos ORDER BY name ASC")
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        let mut rows = stmt.query([]).map_err(|err| RepoError::InvalidInput {
            message: err.to_string(),
        })?;
        let mut repos = Vec::new();
        while let Some(row) = rows.next().map_err(|err| RepoError::InvalidInput {
            message: err.to_string(),
        })? {
            repos.push(map_repo_row(row)?);
        }
        Ok(repos)
    }

    fn unregister(&self, id: &RepoId) -> Result<(), RepoError> {
        let removed = self
            .conn
            .execute("DELETE FROM repos WHERE id = ?1", [id.as_str()])
            .map_err(|err| RepoError::InvalidInput {
                message: err.to_string(),
            })?;
        if removed == 0 {
            return Err(RepoError::RepoNotFound { id: id.clone() });
        }
        Ok(())
    }
}

fn map_repo_row(row: &rusqlite::Row<'_>) -> Result<Repo, RepoError> {
    let invalid = |err: &dyn std::fmt::Display| RepoError::InvalidInput {
        message: err.to_string(),
    };

    let id: String = row.get(0).map_err(|err| invalid(&err))?;
    let name: String = row.get(1).map_err(|err| invalid(&err))?;
    let url: String = row.get(2).map_err(|err| invalid(&err))?;
    let provider: String = row.get(3).map_err(|err| invalid(&err))?;
    let default_branch: String = row.get(4).map_err(|err| invalid(&err))?;
    let created_at: String = row.get(5).map_err(|err| invalid(&err))?;
    let updated_at: String = row.get(6).map_err(|err| invalid(&err))?;

    Ok(Repo {
        id: id.parse().map_err(|err| invalid(&err))?,
        name,
        url,
        provider: parse_enum("provider", &provider).map_err(|err| invalid(&err))?,
        default_branch,
        created_at: parse_timestamp("created_at", &created_at).map_err(|err| invalid(&err))?,
        updated_at: parse_timestamp("updated_at", &updated_at).map_err(|err| invalid(&err))?,
    })
}
