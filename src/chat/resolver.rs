//! Resolution of the user's active chat identity.

use crate::api::ChatId;
use crate::backend::Backend;
use crate::session::Session;
use std::fmt;
use std::sync::Arc;

/// Obtains, or lazily creates, the single active chat id for a user.
pub struct ChatIdentityResolver {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for ChatIdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatIdentityResolver").finish_non_exhaustive()
    }
}

impl ChatIdentityResolver {
    /// Create a resolver over the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Resolve the chat id for the session's user.
    ///
    /// The create branch is taken only on the backend's explicit "no chat"
    /// answer, never speculatively, so a user who already owns a chat can
    /// never gain a second one through resolution. Any failure leaves the id
    /// unresolved; no retry is scheduled, the caller simply stays without a
    /// chat for this activation.
    pub async fn resolve(&self, session: &Session) -> Option<ChatId> {
        let Some(user_id) = session.user_id() else {
            tracing::debug!("chat resolution skipped: no resolved user id");
            return None;
        };

        match self.backend.chat_id_for_user(user_id).await {
            Ok(Some(chat_id)) => {
                tracing::info!(user_id = %user_id, chat_id = %chat_id, "resolved existing chat");
                Some(chat_id)
            }
            Ok(None) => match self.backend.create_chat(user_id).await {
                Ok(chat_id) => {
                    tracing::info!(user_id = %user_id, chat_id = %chat_id, "created chat");
                    Some(chat_id)
                }
                Err(error) => {
                    tracing::warn!(user_id = %user_id, error = %error, "chat creation failed");
                    None
                }
            },
            Err(error) => {
                tracing::warn!(user_id = %user_id, error = %error, "chat lookup failed");
                None
            }
        }
    }
}
