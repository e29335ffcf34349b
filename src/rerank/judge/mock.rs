use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::RelevanceJudge;
use super::prompt::JudgePrompt;
use crate::rerank::error::JudgeError;

/// Scripted judge for tests.
pub struct MockJudge {
    reply: Result<String, JudgeError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<JudgePrompt>>,
}

impl MockJudge {
    /// Replies with `text` verbatim.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Ok(text.into()))
    }

    /// Replies with a JSON array of `urls`.
    pub fn ranking<S: AsRef<str>>(urls: &[S]) -> Self {
        let list: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();
        Self::replying(serde_json::json!(list).to_string())
    }

    pub fn failing(error: JudgeError) -> Self {
        Self::new(Err(error))
    }

    fn new(reply: Result<String, JudgeError>) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Sleeps before replying (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<JudgePrompt> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl RelevanceJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, prompt: &JudgePrompt) -> Result<String, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}
