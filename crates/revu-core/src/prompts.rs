use crate::error::PromptError;
use crate::types::{CreatePromptInput, PromptId, ReviewPrompt, UpdatePromptInput};

pub trait PromptRepository {
    fn create(&self, input: CreatePromptInput) -> Result<ReviewPrompt, PromptError>;
    fn get(&self, id: &PromptId) -> Result<Option<ReviewPrompt>, PromptError>;
    fn list(&self) -> Result<Vec<ReviewPrompt>, PromptError>;
    fn update(&self, id: &PromptId, input: UpdatePromptInput)
        -> Result<ReviewPrompt, PromptError>;
    fn delete(&self, id: &PromptId) -> Result<(), PromptError>;
}
