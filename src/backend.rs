//! The transport seam.
//!
//! Every logical backend operation the client consumes is expressed on one
//! object-safe trait so the stateful components can hold an `Arc<dyn Backend>`
//! and tests can substitute a scripted in-memory implementation.

use crate::api::{
    AccountProfile, ChatId, ChatSummary, LoginResponse, ModelReplies, SessionCheck,
    StoredTranscript, UserId,
};
use crate::error::Result;

/// Backend operations consumed by the client core.
///
/// Session identity is carried by the transport (cookie jar), never by these
/// payloads; user and chat ids appear only for record correlation.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Check whether the server-side session is still live.
    async fn check_session(&self) -> Result<SessionCheck>;

    /// Resolve the user id behind a username.
    async fn user_id_for_username(&self, username: &str) -> Result<UserId>;

    /// Look up the user's chat id. `None` means the user owns no chat yet.
    async fn chat_id_for_user(&self, user_id: UserId) -> Result<Option<ChatId>>;

    /// Create a chat for a user and return its id.
    async fn create_chat(&self, user_id: UserId) -> Result<ChatId>;

    /// List the user's chats in backend order.
    async fn chats_for_user(&self, user_id: UserId) -> Result<Vec<ChatSummary>>;

    /// Fetch a chat's stored transcript in the two-collection format.
    async fn chat_transcript(&self, chat_id: ChatId) -> Result<StoredTranscript>;

    /// Persist one user message against a chat.
    async fn persist_message(&self, chat_id: ChatId, message: &str, sender_id: UserId)
    -> Result<()>;

    /// Request the joint comparative reply to one message.
    async fn model_replies(&self, chat_id: ChatId, message: &str) -> Result<ModelReplies>;

    /// Authenticate with a username-or-email and password.
    async fn log_in(&self, login: &str, pwd: &str) -> Result<LoginResponse>;

    /// Register a new account.
    async fn sign_up(&self, user: &str, email: &str, pwd: &str) -> Result<()>;

    /// End the server-side session.
    async fn log_out(&self) -> Result<()>;

    /// Fetch the profile record for a user.
    async fn account(&self, user_id: UserId) -> Result<AccountProfile>;

    /// Store an edited profile record.
    async fn update_account(&self, profile: &AccountProfile) -> Result<()>;
}
