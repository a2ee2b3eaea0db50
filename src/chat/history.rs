//! The history panel's chat list and stored-transcript retrieval.

use crate::api::{ChatId, ChatSummary, StoredTranscript};
use crate::backend::Backend;
use crate::chat::transcript::ChatMessage;
use crate::error::Result;
use crate::session::Session;
use std::fmt;
use std::sync::Arc;

/// Lists a user's past chats and rehydrates stored transcripts.
pub struct HistoryStore {
    backend: Arc<dyn Backend>,
    cached: Option<Vec<ChatSummary>>,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Create a store over the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            cached: None,
        }
    }

    /// The chat list for the history panel.
    ///
    /// Fetched lazily on the first open and cached for the life of the store;
    /// sending new messages does not invalidate it. A session with no
    /// resolved user id yields an empty list without backend traffic. A
    /// failed fetch is returned to the caller, leaves nothing cached, and a
    /// later open fetches again.
    pub async fn list(&mut self, session: &Session) -> Result<&[ChatSummary]> {
        if self.cached.is_none() {
            let Some(user_id) = session.user_id() else {
                tracing::debug!("history list skipped: no resolved user id");
                return Ok(&[]);
            };
            let chats = self.backend.chats_for_user(user_id).await?;
            tracing::info!(user_id = %user_id, chats = chats.len(), "fetched chat history list");
            self.cached = Some(chats);
        }
        Ok(self.cached.as_deref().unwrap_or(&[]))
    }

    /// Rehydrate a stored transcript.
    ///
    /// The two-collection storage format keeps user turns and model turns in
    /// separate lists: every sent entry comes back tagged as a user turn,
    /// every received entry as a model turn of unknown origin, sent block
    /// first. A failure leaves the live transcript untouched because nothing
    /// is replaced until this returns.
    pub async fn fetch_transcript(&self, chat_id: ChatId) -> Result<Vec<ChatMessage>> {
        let stored = self.backend.chat_transcript(chat_id).await?;
        Ok(reconstruct(stored))
    }
}

fn reconstruct(stored: StoredTranscript) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(stored.messages_sent.len() + stored.messages_received.len());
    messages.extend(stored.messages_sent.into_iter().map(ChatMessage::user));
    messages.extend(stored.messages_received.into_iter().map(ChatMessage::bot));
    messages
}
