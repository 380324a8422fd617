//! Conversation store: the append-only chat log and its persistence.
//!
//! The whole log is serialized as one JSON array under a single key and
//! rewritten after every append. Loading falls back to a two-message seed
//! when the key is absent or its content does not parse.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use dealbot_core::types::ChatMessage;
use dealbot_storage::KeyValueStore;

/// Opening prompt of a fresh conversation.
pub const SEED_PROMPT: &str = "Find best deal for iPhone 13";
/// Opening reply of a fresh conversation.
pub const SEED_REPLY: &str = "🛒 Amazon: ₹55,000 | Flipkart: ₹54,200";

const EVENT_CAPACITY: usize = 256;

/// The default conversation shown when nothing usable is persisted.
pub fn seed_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user(SEED_PROMPT),
        ChatMessage::bot_text(SEED_REPLY),
    ]
}

/// In-memory chat log mirrored to a key-value store.
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    events: broadcast::Sender<ChatMessage>,
}

impl ConversationStore {
    /// Read the persisted log under `key`, seeding defaults if it is absent,
    /// unreadable or corrupt.
    pub fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let messages = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
                Ok(messages) => {
                    debug!(key = %key, count = messages.len(), "Conversation log loaded");
                    messages
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Persisted conversation is corrupt, seeding defaults");
                    seed_messages()
                }
            },
            Ok(None) => {
                debug!(key = %key, "No persisted conversation, seeding defaults");
                seed_messages()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read conversation, seeding defaults");
                seed_messages()
            }
        };

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages,
            storage,
            key,
            events,
        }
    }

    /// Add one entry to the end of the log and persist the full snapshot.
    pub fn append(&mut self, message: ChatMessage) {
        self.extend(std::iter::once(message));
    }

    /// Add several entries in order with a single snapshot write.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        let start = self.messages.len();
        self.messages.extend(messages);
        if self.messages.len() == start {
            return;
        }
        self.persist();
        for message in &self.messages[start..] {
            // No receivers is fine.
            let _ = self.events.send(message.clone());
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Receive every entry appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }

    /// The log exactly as it is written to storage.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.messages)
    }

    /// Best effort: a failed write is logged and the in-memory log stays
    /// authoritative.
    fn persist(&self) {
        let snapshot = match self.snapshot() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize conversation");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &snapshot) {
            warn!(key = %self.key, error = %e, "Failed to persist conversation");
        }
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("key", &self.key)
            .field("len", &self.messages.len())
            .finish()
    }
}
