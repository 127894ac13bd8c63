pub mod event_repo;
pub mod prompt_repo;
pub mod repo_repo;
pub mod review_repo;
pub mod schema;
pub mod store;
pub mod util;

pub use crate::schema::{migrate, open, open_and_migrate, with_test_db};
pub use crate::store::DbStore;
