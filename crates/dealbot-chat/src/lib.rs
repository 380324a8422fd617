//! Chat client core for dealbot.
//!
//! Holds the conversation log and its persistence, the derived product
//! view, the search request lifecycle, and the provider and speech
//! capabilities it drives.

pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod voice;

pub use error::ChatError;
pub use lifecycle::{
    ChatController, Completion, LifecycleState, PendingSearch, FETCH_FAILED_TEXT, NO_RESULTS_TEXT,
};
pub use pipeline::{derive_products, parse_price};
pub use provider::{HttpSearchProvider, SearchProvider};
pub use store::{seed_messages, ConversationStore, SEED_PROMPT, SEED_REPLY};
pub use voice::{ScriptedRecognizer, SpeechRecognizer};
