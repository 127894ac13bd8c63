use crate::error::RepoError;
use crate::types::{RegisterRepoInput, Repo, RepoId};

pub trait RepoRepository {
    fn register(&self, input: RegisterRepoInput) -> Result<Repo, RepoError>;
    fn get(&self, id: &RepoId) -> Result<Option<Repo>, RepoError>;
    fn list(&self) -> Result<Vec<Repo>, RepoError>;
    fn unregister(&self, id: &RepoId) -> Result<(), RepoError>;
}
