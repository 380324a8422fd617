//! Request lifecycle: input → provider round trip → conversation log.
//!
//! [`ChatController`] is the single owner of the conversation store and the
//! view state. A search is split into [`ChatController::submit`], which
//! records the user message and hands back a [`PendingSearch`] ticket, and
//! [`ChatController::complete`], which applies the provider outcome. Each
//! submit bumps a generation counter and only the ticket carrying the latest
//! generation is applied, so overlapping requests resolve in submission
//! order.

use std::sync::Arc;

use tracing::{debug, info, warn};

use dealbot_core::types::{ChatMessage, PlatformFilter, Product, SortBy, MAX_QUERY_LENGTH};

use crate::error::ChatError;
use crate::pipeline::derive_products;
use crate::provider::SearchProvider;
use crate::store::ConversationStore;
use crate::voice::SpeechRecognizer;

/// Bot reply when the provider returns an empty list.
pub const NO_RESULTS_TEXT: &str = "🔍 No products found.";
/// Bot reply when the provider call fails for any reason.
pub const FETCH_FAILED_TEXT: &str = "🔍 Unable to fetch results.";

const DEFAULT_LANGUAGE: &str = "en-US";

/// Whether a search is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Pending,
}

/// Ticket for a submitted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub generation: u64,
    pub query: String,
}

/// What [`ChatController::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// This many product messages were appended.
    Products(usize),
    NoResults,
    Failed,
    /// The ticket was superseded or already completed; nothing changed.
    Stale,
}

pub struct ChatController {
    store: ConversationStore,
    provider: Arc<dyn SearchProvider>,
    voice: Option<Arc<dyn SpeechRecognizer>>,
    language: String,
    filter: PlatformFilter,
    sort: SortBy,
    input: String,
    loading: bool,
    listening: bool,
    generation: u64,
}

impl ChatController {
    /// Controller with no speech capability.
    pub fn new(store: ConversationStore, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            store,
            provider,
            voice: None,
            language: DEFAULT_LANGUAGE.to_string(),
            filter: PlatformFilter::default(),
            sort: SortBy::default(),
            input: String::new(),
            loading: false,
            listening: false,
            generation: 0,
        }
    }

    /// Attach a speech recognizer listening in `language`.
    pub fn with_voice(
        mut self,
        recognizer: Arc<dyn SpeechRecognizer>,
        language: impl Into<String>,
    ) -> Self {
        self.voice = Some(recognizer);
        self.language = language.into();
        self
    }

    // ---- input ----

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Start a search from the current input.
    ///
    /// Appends the user message, clears the input and enters Pending. A
    /// blank or over-long input is rejected and leaves everything untouched.
    /// Submitting while Pending is allowed; the earlier ticket goes stale.
    pub fn submit(&mut self) -> Result<PendingSearch, ChatError> {
        let query = self.input.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if query.chars().count() > MAX_QUERY_LENGTH {
            return Err(ChatError::MessageTooLong(MAX_QUERY_LENGTH));
        }
        let query = query.to_string();

        if self.loading {
            debug!(superseded = self.generation, "Submitting over a pending search");
        }

        self.store.append(ChatMessage::user(query.clone()));
        self.input.clear();
        self.loading = true;
        self.generation += 1;

        info!(generation = self.generation, query = %query, "Search submitted");
        Ok(PendingSearch {
            generation: self.generation,
            query,
        })
    }

    /// Apply the provider outcome for `ticket`.
    ///
    /// Messages are appended before `loading` is cleared. Outcomes for
    /// superseded or already completed tickets are dropped.
    pub fn complete(
        &mut self,
        ticket: &PendingSearch,
        outcome: Result<Vec<Product>, ChatError>,
    ) -> Completion {
        if ticket.generation != self.generation || !self.loading {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                loading = self.loading,
                "Discarding stale search result"
            );
            return Completion::Stale;
        }

        let completion = match outcome {
            Ok(products) if products.is_empty() => {
                self.store.append(ChatMessage::bot_text(NO_RESULTS_TEXT));
                Completion::NoResults
            }
            Ok(products) => {
                let count = products.len();
                self.store
                    .extend(products.into_iter().map(ChatMessage::bot_product));
                Completion::Products(count)
            }
            Err(e) => {
                warn!(query = %ticket.query, error = %e, "Search failed");
                self.store.append(ChatMessage::bot_text(FETCH_FAILED_TEXT));
                Completion::Failed
            }
        };

        self.loading = false;
        debug!(generation = ticket.generation, ?completion, "Search completed");
        completion
    }

    /// Submit the current input and wait for the provider.
    pub async fn send(&mut self) -> Result<Completion, ChatError> {
        let ticket = self.submit()?;
        let outcome = self.provider.search(&ticket.query).await;
        Ok(self.complete(&ticket, outcome))
    }

    /// Handle to the provider, for front-ends that run searches themselves.
    pub fn provider(&self) -> Arc<dyn SearchProvider> {
        Arc::clone(&self.provider)
    }

    // ---- voice ----

    pub fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    /// Enter the listening state. Fails without a speech capability.
    pub fn start_listening(&mut self) -> Result<(), ChatError> {
        if self.voice.is_none() {
            self.listening = false;
            return Err(ChatError::VoiceUnavailable);
        }
        self.listening = true;
        Ok(())
    }

    /// A transcript arrived: fill the input and submit it.
    pub fn voice_result(&mut self, transcript: &str) -> Result<PendingSearch, ChatError> {
        self.listening = false;
        self.input = transcript.to_string();
        self.submit()
    }

    /// Recognition failed: reset the flag, nothing else.
    pub fn voice_error(&mut self, error: &ChatError) {
        warn!(error = %error, "Voice recognition failed");
        self.listening = false;
    }

    /// Capture one utterance and run it through the search lifecycle.
    pub async fn send_voice(&mut self) -> Result<Completion, ChatError> {
        self.start_listening()?;
        let Some(recognizer) = self.voice.clone() else {
            return Err(ChatError::VoiceUnavailable);
        };

        let transcript = match recognizer.recognize(&self.language).await {
            Ok(t) => t,
            Err(e) => {
                self.voice_error(&e);
                return Err(e);
            }
        };
        debug!(transcript = %transcript, "Voice transcript received");

        let ticket = self.voice_result(&transcript)?;
        let outcome = self.provider.search(&ticket.query).await;
        Ok(self.complete(&ticket, outcome))
    }

    // ---- view state ----

    pub fn set_filter(&mut self, filter: PlatformFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortBy) {
        self.sort = sort;
    }

    pub fn filter(&self) -> PlatformFilter {
        self.filter
    }

    pub fn sort(&self) -> SortBy {
        self.sort
    }

    /// The derived product view for the current log and view state.
    pub fn products(&self) -> Vec<&Product> {
        derive_products(self.store.messages(), self.filter, self.sort)
    }

    // ---- status ----

    pub fn state(&self) -> LifecycleState {
        if self.loading {
            LifecycleState::Pending
        } else {
            LifecycleState::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("store", &self.store)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("loading", &self.loading)
            .field("listening", &self.listening)
            .field("generation", &self.generation)
            .field("voice", &self.voice.is_some())
            .finish()
    }
}
