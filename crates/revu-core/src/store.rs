use crate::events::EventRepository;
use crate::prompts::PromptRepository;
use crate::repos::RepoRepository;
use crate::reviews::ReviewRepository;
use crate::RevuError;

pub trait Store {
    type Reviews<'a>: ReviewRepository
    where
        Self: 'a;
    type Repos<'a>: RepoRepository
    where
        Self: 'a;
    type Prompts<'a>: PromptRepository
    where
        Self: 'a;
    type Events<'a>: EventRepository
    where
        Self: 'a;

    fn reviews(&self) -> Self::Reviews<'_>;
    fn repos(&self) -> Self::Repos<'_>;
    fn prompts(&self) -> Self::Prompts<'_>;
    fn events(&self) -> Self::Events<'_>;

    fn with_tx<F, T>(&self, f: F) -> Result<T, RevuError>
    where
        F: FnOnce(&Self) -> Result<T, RevuError>;
}
