//! The conversational view's wiring point.
//!
//! `ChatShell` owns the session and the chat components, and runs them in the
//! activation order the view performs: guard check, user-id resolution, chat
//! resolution. Everything after activation goes through the shell so the
//! session context is threaded explicitly instead of read from ambient state.

use crate::api::{ChatId, ChatSummary};
use crate::backend::Backend;
use crate::chat::{ChatIdentityResolver, ChatMessage, HistoryStore, MessageExchangeController};
use crate::chat::controller::{PendingTurn, SendOutcome};
use crate::error::Result;
use crate::session::{GuardAction, LOGGED_OUT_NOTICE, Session, SessionGuard};
use std::fmt;
use std::sync::Arc;

/// Owns the session and drives the conversational components.
pub struct ChatShell {
    backend: Arc<dyn Backend>,
    session: Session,
    guard: SessionGuard,
    resolver: ChatIdentityResolver,
    history: HistoryStore,
    controller: MessageExchangeController,
}

impl fmt::Debug for ChatShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatShell")
            .field("session", &self.session)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl ChatShell {
    /// Create a shell for a logged-in session.
    pub fn new(backend: Arc<dyn Backend>, session: Session) -> Self {
        Self {
            guard: SessionGuard::new(Arc::clone(&backend)),
            resolver: ChatIdentityResolver::new(Arc::clone(&backend)),
            history: HistoryStore::new(Arc::clone(&backend)),
            controller: MessageExchangeController::new(Arc::clone(&backend)),
            backend,
            session,
        }
    }

    /// Run the view-entry sequence.
    ///
    /// Guard check first; a redirect ends activation. Then the user id behind
    /// the session's username is resolved; a failed lookup clears the session
    /// and redirects with no notice, as the view does. Finally the chat id is
    /// resolved or created; a failure there leaves sending disabled but keeps
    /// the user in the view.
    pub async fn activate(&mut self) -> GuardAction {
        let action = self.guard.check_on_entry(&mut self.session).await;
        if action != GuardAction::Proceed {
            return action;
        }

        match self
            .backend
            .user_id_for_username(self.session.username())
            .await
        {
            Ok(user_id) => self.session.adopt_user_id(user_id),
            Err(error) => {
                tracing::warn!(error = %error, "user id lookup failed; redirecting to login");
                self.session.clear();
                return GuardAction::RedirectToLogin { notice: None };
            }
        }

        if let Some(chat_id) = self.resolver.resolve(&self.session).await {
            self.controller.adopt_chat(chat_id);
        }
        GuardAction::Proceed
    }

    /// The session context, read-only.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The greeting line shown above the transcript.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("hello, {}!", self.session.username())
    }

    /// The live transcript, in insertion order.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        self.controller.transcript()
    }

    /// The active chat id, once resolved or restored.
    #[must_use]
    pub fn chat_id(&self) -> Option<ChatId> {
        self.controller.chat_id()
    }

    /// Whether a turn is in flight.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.controller.is_composing()
    }

    /// Record the user's turn; `None` when a precondition fails.
    pub fn begin_turn(&mut self, input: &str) -> Option<PendingTurn> {
        self.controller.begin_turn(&self.session, input)
    }

    /// Run a recorded turn's network effects.
    pub async fn settle_turn(&mut self, turn: PendingTurn) -> SendOutcome {
        self.controller.settle_turn(turn).await
    }

    /// Record and settle one turn.
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        self.controller.send(&self.session, input).await
    }

    /// The history panel's chat list, fetched lazily and cached.
    pub async fn open_history(&mut self) -> Result<&[ChatSummary]> {
        self.history.list(&self.session).await
    }

    /// Replace the live transcript with a stored chat and adopt its id.
    ///
    /// Fetch-then-replace: a failed fetch returns the error and leaves the
    /// live transcript and chat id untouched.
    pub async fn restore_chat(&mut self, chat_id: ChatId) -> Result<()> {
        let messages = self.history.fetch_transcript(chat_id).await?;
        self.controller.restore(chat_id, messages);
        Ok(())
    }

    /// Guard rule for backward navigation from the login page.
    pub async fn back_from_login(&mut self, referrer: &str) -> GuardAction {
        self.guard.back_navigation(referrer, &mut self.session).await
    }

    /// Best-effort logout dispatch on page unload.
    pub fn notify_unload(&self) -> tokio::task::JoinHandle<()> {
        self.guard.notify_unload()
    }

    /// Explicit logout: best-effort backend request, then clear and redirect.
    ///
    /// Unlike the back-navigation rule, the local session is cleared even
    /// when the request fails: the user asked to leave.
    pub async fn log_out(&mut self) -> GuardAction {
        if let Err(error) = self.backend.log_out().await {
            tracing::warn!(error = %error, "logout request failed");
        }
        self.session.clear();
        GuardAction::RedirectToLogin {
            notice: Some(LOGGED_OUT_NOTICE.to_owned()),
        }
    }
}
