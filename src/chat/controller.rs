//! The message-exchange turn machine.
//!
//! One turn runs `idle → user turn recorded → awaiting model replies →
//! settled`. The user's message lands in the transcript before any network
//! traffic starts, so the view never appears to swallow input, and the
//! composing indicator stays up for exactly the life of the attempt.

use crate::api::{ChatId, UserId};
use crate::backend::Backend;
use crate::chat::transcript::ChatMessage;
use crate::session::Session;
use std::fmt;
use std::sync::Arc;

/// Placeholder when BioMistral produced nothing.
pub const BIOMISTRAL_FALLBACK: &str = "No response from BioMistral.";

/// Placeholder when Meditron produced nothing.
pub const MEDITRON_FALLBACK: &str = "No response from Meditron.";

/// How a send call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A precondition failed; nothing was recorded or sent.
    Ignored,
    /// Both network effects succeeded and the paired replies were appended.
    Completed,
    /// A network effect failed; the user turn stays, no replies appended.
    Failed,
}

/// A recorded user turn whose network effects have not run yet.
///
/// Produced by [`MessageExchangeController::begin_turn`] and consumed by
/// [`MessageExchangeController::settle_turn`]; the composing indicator stays
/// raised until the turn is settled.
#[must_use = "a begun turn must be settled or the composing indicator stays raised"]
#[derive(Debug)]
pub struct PendingTurn {
    chat_id: ChatId,
    sender_id: UserId,
    text: String,
}

/// Owns the live transcript and drives message exchange against the backend.
pub struct MessageExchangeController {
    backend: Arc<dyn Backend>,
    chat_id: Option<ChatId>,
    transcript: Vec<ChatMessage>,
    composing: bool,
}

impl fmt::Debug for MessageExchangeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageExchangeController")
            .field("chat_id", &self.chat_id)
            .field("transcript_len", &self.transcript.len())
            .field("composing", &self.composing)
            .finish_non_exhaustive()
    }
}

impl MessageExchangeController {
    /// Create a controller with an empty transcript and no chat.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            chat_id: None,
            transcript: Vec::new(),
            composing: false,
        }
    }

    /// Adopt the chat id produced by resolution.
    pub fn adopt_chat(&mut self, chat_id: ChatId) {
        self.chat_id = Some(chat_id);
    }

    /// The active chat id, once resolved or restored.
    #[must_use]
    pub fn chat_id(&self) -> Option<ChatId> {
        self.chat_id
    }

    /// The live transcript, in insertion order.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Whether a turn is in flight.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Record the user's turn and raise the composing indicator.
    ///
    /// Preconditions, each a silent no-op when violated: non-empty trimmed
    /// input, a resolved chat id, a resolved user id, and no turn already in
    /// flight. On success the trimmed message is already in the transcript
    /// when this returns, before any network effect runs.
    pub fn begin_turn(&mut self, session: &Session, input: &str) -> Option<PendingTurn> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        let Some(chat_id) = self.chat_id else {
            tracing::debug!("send skipped: no resolved chat id");
            return None;
        };
        let Some(sender_id) = session.user_id() else {
            tracing::debug!("send skipped: no resolved user id");
            return None;
        };
        if self.composing {
            tracing::debug!(chat_id = %chat_id, "send skipped: turn already in flight");
            return None;
        }

        self.transcript.push(ChatMessage::user(text));
        self.composing = true;
        Some(PendingTurn {
            chat_id,
            sender_id,
            text: text.to_owned(),
        })
    }

    /// Run the turn's network effects and settle it.
    ///
    /// Persistence and the joint reply request run sequentially; a failure at
    /// either is logged, appends nothing, and still clears the composing
    /// indicator, whose lifetime is tied to completion of the attempt rather
    /// than its success.
    pub async fn settle_turn(&mut self, turn: PendingTurn) -> SendOutcome {
        let outcome = self.exchange(&turn).await;
        self.composing = false;
        outcome
    }

    /// Record and settle one turn.
    pub async fn send(&mut self, session: &Session, input: &str) -> SendOutcome {
        let Some(turn) = self.begin_turn(session, input) else {
            return SendOutcome::Ignored;
        };
        self.settle_turn(turn).await
    }

    /// Replace the live transcript with a restored one and adopt its chat.
    pub fn restore(&mut self, chat_id: ChatId, messages: Vec<ChatMessage>) {
        tracing::info!(chat_id = %chat_id, messages = messages.len(), "transcript restored");
        self.transcript = messages;
        self.chat_id = Some(chat_id);
    }

    async fn exchange(&mut self, turn: &PendingTurn) -> SendOutcome {
        if let Err(error) = self
            .backend
            .persist_message(turn.chat_id, &turn.text, turn.sender_id)
            .await
        {
            tracing::warn!(chat_id = %turn.chat_id, error = %error, "message persistence failed");
            return SendOutcome::Failed;
        }

        match self.backend.model_replies(turn.chat_id, &turn.text).await {
            Ok(replies) => {
                self.transcript.push(ChatMessage::biomistral(reply_or_fallback(
                    replies.biomistral,
                    BIOMISTRAL_FALLBACK,
                )));
                self.transcript.push(ChatMessage::meditron(reply_or_fallback(
                    replies.meditron,
                    MEDITRON_FALLBACK,
                )));
                SendOutcome::Completed
            }
            Err(error) => {
                tracing::warn!(chat_id = %turn.chat_id, error = %error, "model reply request failed");
                SendOutcome::Failed
            }
        }
    }
}

fn reply_or_fallback(reply: Option<String>, fallback: &str) -> String {
    match reply {
        Some(text) if !text.is_empty() => text,
        _ => fallback.to_owned(),
    }
}
