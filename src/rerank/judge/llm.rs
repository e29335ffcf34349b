use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::RelevanceJudge;
use super::prompt::JudgePrompt;
use crate::rerank::error::JudgeError;

/// Chat-model judge through `genai` (provider picked from the model name).
pub struct GenaiJudge {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiJudge")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiJudge {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

fn classify(message: String) -> JudgeError {
    let lower = message.to_lowercase();
    if lower.contains("429") || lower.contains("quota") || lower.contains("resource_exhausted") {
        JudgeError::Quota { message }
    } else {
        JudgeError::Request { message }
    }
}

#[async_trait]
impl RelevanceJudge for GenaiJudge {
    fn name(&self) -> &str {
        &self.model
    }

    async fn judge(&self, prompt: &JudgePrompt) -> Result<String, JudgeError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system()),
            ChatMessage::user(prompt.user()),
        ]);
        let options = ChatOptions::default().with_temperature(0.0);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| classify(e.to_string()))?;

        let text = response
            .first_text()
            .ok_or_else(|| JudgeError::MalformedResponse {
                reason: "empty reply".to_string(),
            })?;
        debug!(model = %self.model, chars = text.len(), "Judge replied");
        Ok(text.to_string())
    }
}
