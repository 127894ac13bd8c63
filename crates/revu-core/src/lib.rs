pub mod analysis;
pub mod error;
pub mod events;
pub mod extract;
pub mod hub;
pub mod metrics;
pub mod prompts;
pub mod repos;
pub mod reviews;
pub mod store;
pub mod validation;

pub mod types;

pub use crate::error::RevuError;
pub use crate::hub::{Hub, RequestContext};
pub use crate::store::Store;
