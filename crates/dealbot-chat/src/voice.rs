//! Speech-to-text capability.
//!
//! Recognition is platform specific, so the controller only sees the
//! [`SpeechRecognizer`] trait. A controller built without one reports
//! [`ChatError::VoiceUnavailable`].

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ChatError;

/// Captures one utterance and returns its transcript.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once in the given BCP-47 language (e.g. `en-US`).
    async fn recognize(&self, language: &str) -> Result<String, ChatError>;
}

/// Replays a fixed list of outcomes, one per call.
///
/// Used by the terminal front-end to stand in for a microphone (each
/// transcript is typed) and by tests.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    outcomes: Mutex<VecDeque<Result<String, ChatError>>>,
}

impl ScriptedRecognizer {
    pub fn new(outcomes: impl IntoIterator<Item = Result<String, ChatError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// Queue another outcome.
    pub fn push(&self, outcome: Result<String, ChatError>) {
        if let Ok(mut queue) = self.outcomes.lock() {
            queue.push_back(outcome);
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(&self, _language: &str) -> Result<String, ChatError> {
        let mut queue = self
            .outcomes
            .lock()
            .map_err(|e| ChatError::Voice(e.to_string()))?;
        queue
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Voice("no-speech".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_outcomes_in_order() {
        let recognizer = ScriptedRecognizer::new(vec![
            Ok("iphone 13".to_string()),
            Err(ChatError::Voice("aborted".to_string())),
        ]);

        assert_eq!(recognizer.recognize("en-US").await.unwrap(), "iphone 13");
        assert!(matches!(
            recognizer.recognize("en-US").await,
            Err(ChatError::Voice(msg)) if msg == "aborted"
        ));
    }

    #[tokio::test]
    async fn test_exhausted_script_reports_no_speech() {
        let recognizer = ScriptedRecognizer::default();
        recognizer.push(Ok("pixel".to_string()));

        assert_eq!(recognizer.recognize("en-IN").await.unwrap(), "pixel");
        assert!(matches!(
            recognizer.recognize("en-IN").await,
            Err(ChatError::Voice(_))
        ));
    }
}
