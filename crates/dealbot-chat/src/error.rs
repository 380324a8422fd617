//! Error types for the chat client.

/// Errors from the chat controller, provider client, and voice capability.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider payload: {0}")]
    Payload(String),
    #[error("voice recognition not supported")]
    VoiceUnavailable,
    #[error("voice error: {0}")]
    Voice(String),
}

impl ChatError {
    /// Whether this error came from the search round trip (as opposed to
    /// input validation or voice capture).
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_) | ChatError::Status(_) | ChatError::Payload(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(256).to_string(),
            "message exceeds maximum length of 256 characters"
        );
        assert_eq!(
            ChatError::Transport("connection refused".to_string()).to_string(),
            "transport error: connection refused"
        );
        assert_eq!(
            ChatError::Status(502).to_string(),
            "provider returned status 502"
        );
        assert_eq!(
            ChatError::Payload("expected array".to_string()).to_string(),
            "malformed provider payload: expected array"
        );
        assert_eq!(
            ChatError::VoiceUnavailable.to_string(),
            "voice recognition not supported"
        );
        assert_eq!(
            ChatError::Voice("no-speech".to_string()).to_string(),
            "voice error: no-speech"
        );
    }

    #[test]
    fn test_provider_failure_classification() {
        assert!(ChatError::Transport(String::new()).is_provider_failure());
        assert!(ChatError::Status(500).is_provider_failure());
        assert!(ChatError::Payload(String::new()).is_provider_failure());

        assert!(!ChatError::EmptyMessage.is_provider_failure());
        assert!(!ChatError::MessageTooLong(1).is_provider_failure());
        assert!(!ChatError::VoiceUnavailable.is_provider_failure());
        assert!(!ChatError::Voice(String::new()).is_provider_failure());
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::Status(404));
        assert!(dbg.contains("Status"));
        assert!(dbg.contains("404"));
    }
}
