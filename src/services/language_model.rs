use async_trait::async_trait;

use crate::domain::conversation::{Conversation, ModelReply};
use crate::error::AppResult;

/// The language-model provider. Given the session so far (latest user turn
/// included), produce the model's next move under the intake policy.
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn next_turn(&self, conversation: &Conversation) -> AppResult<ModelReply>;
}
