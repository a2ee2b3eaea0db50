//! Wire types for the medbear backend.
//!
//! Field names follow the backend's JSON contract exactly; nothing here is
//! renamed for Rust taste. Identifiers are backend-issued integers wrapped in
//! newtypes so user and chat ids cannot be swapped by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved chat id meaning "user currently owns no chat".
const NO_CHAT: i64 = -1;

// =============================================================================
// Identifiers
// =============================================================================

/// Backend-issued user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw backend id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw id value.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend-issued chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Wrap a raw backend id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw id value.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Session Types
// =============================================================================

/// Response to the session check issued on view entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCheck {
    /// True when the server-side session has lapsed.
    pub expired: bool,
}

/// Request to look up the id behind a username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdRequest {
    /// The account's username.
    pub username: String,
}

/// Response carrying the id behind a username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdResponse {
    /// The account's user id.
    pub id: UserId,
}

// =============================================================================
// Chat Identity Types
// =============================================================================

/// Response to a chat-id lookup.
///
/// The backend answers `-1` for a user with no chat; that sentinel never
/// leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatIdResponse {
    /// The raw chat id, possibly the "no chat" sentinel.
    pub chat_id: i64,
}

impl ChatIdResponse {
    /// Decode the sentinel: `None` means the user owns no chat yet.
    #[must_use]
    pub fn existing(&self) -> Option<ChatId> {
        (self.chat_id != NO_CHAT).then(|| ChatId::new(self.chat_id))
    }
}

/// Request to create a chat for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    /// Owner of the new chat.
    pub user_id: UserId,
}

/// Response carrying a freshly created chat id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatResponse {
    /// The new chat's id.
    pub chat_id: ChatId,
}

// =============================================================================
// History Types
// =============================================================================

/// One entry in the history panel's chat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// The chat's id.
    pub chat_id: ChatId,
    /// Stored title, absent for untitled chats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChatSummary {
    /// Label shown in the history list: the stored title, or `Chat {n}`
    /// synthesized from the 1-based list position for untitled chats.
    #[must_use]
    pub fn display_label(&self, position: usize) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Chat {}", position + 1),
        }
    }
}

/// Response carrying a user's chat list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    /// Chats in backend order.
    pub chats: Vec<ChatSummary>,
}

/// A stored transcript in the two-collection format: user turns and model
/// turns live in separately ordered lists, with no interleaving and no record
/// of which model produced a received entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredTranscript {
    /// User turns, in stored order.
    #[serde(default)]
    pub messages_sent: Vec<String>,
    /// Model turns, in stored order.
    #[serde(default)]
    pub messages_received: Vec<String>,
}

// =============================================================================
// Message Exchange Types
// =============================================================================

/// Request to persist one user message against a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Target chat.
    pub chat_id: ChatId,
    /// The message text.
    pub message: String,
    /// The sending user.
    pub sender_id: UserId,
}

/// Request for comparative replies to one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRepliesRequest {
    /// Target chat.
    pub chat_id: ChatId,
    /// The message both models answer.
    pub message: String,
}

/// Joint response from both models. Either side may be absent or empty when
/// that model produced nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelReplies {
    /// BioMistral's answer.
    #[serde(default)]
    pub biomistral: Option<String>,
    /// Meditron's answer.
    #[serde(default)]
    pub meditron: Option<String>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Login request. The `login` field accepts a username or an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    /// Password.
    pub pwd: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Canonical username for the authenticated account.
    pub username: String,
}

/// Signup request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Desired username.
    pub user: String,
    /// Contact email.
    pub email: String,
    /// Password.
    pub pwd: String,
}

// =============================================================================
// Account Types
// =============================================================================

/// Request for a profile record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRequest {
    /// The account's user id.
    pub id: UserId,
}

/// The editable profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// The account's user id.
    pub id: UserId,
    /// Current username.
    pub username: String,
    /// Current email.
    pub email: String,
}
