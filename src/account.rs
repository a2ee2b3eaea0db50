//! The collapsible account panel's profile fetch and edit flows.

use crate::api::AccountProfile;
use crate::auth::{validate_email, validate_username};
use crate::backend::Backend;
use crate::session::Session;
use std::fmt;
use std::sync::Arc;

/// Why a profile operation did not complete.
///
/// The display form of each variant is the message the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// No resolved user id to fetch or save against.
    #[error("Unable to load account information")]
    NoUserId,
    /// The profile fetch failed.
    #[error("Unable to load account information")]
    LoadFailed,
    /// Local validation rejected the edited username.
    #[error("Invalid username format")]
    InvalidUsername,
    /// Local validation rejected the edited email.
    #[error("Invalid email format")]
    InvalidEmail,
    /// The edit request failed.
    #[error("An error occurred while saving the information")]
    SaveFailed,
}

/// Fetches and edits the profile record behind the account panel.
pub struct AccountPanel {
    backend: Arc<dyn Backend>,
    profile: Option<AccountProfile>,
}

impl fmt::Debug for AccountPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountPanel")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl AccountPanel {
    /// Create a panel over the given backend, with no profile loaded.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            profile: None,
        }
    }

    /// The last loaded profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<&AccountProfile> {
        self.profile.as_ref()
    }

    /// Fetch the profile record. Re-fetched on every panel expand; a failure
    /// leaves any previously loaded profile in place.
    pub async fn load(&mut self, session: &Session) -> Result<&AccountProfile, AccountError> {
        let Some(user_id) = session.user_id() else {
            tracing::debug!("account load skipped: no resolved user id");
            return Err(AccountError::NoUserId);
        };

        match self.backend.account(user_id).await {
            Ok(profile) => Ok(&*self.profile.insert(profile)),
            Err(error) => {
                tracing::warn!(user_id = %user_id, error = %error, "account fetch failed");
                Err(AccountError::LoadFailed)
            }
        }
    }

    /// Validate and store an edited profile.
    ///
    /// On success the confirmed username flows back into the session so the
    /// greeting reflects it without a reload.
    pub async fn save(
        &mut self,
        session: &mut Session,
        username: &str,
        email: &str,
    ) -> Result<(), AccountError> {
        let Some(user_id) = session.user_id() else {
            return Err(AccountError::NoUserId);
        };
        if !validate_username(username) {
            return Err(AccountError::InvalidUsername);
        }
        if !validate_email(email) {
            return Err(AccountError::InvalidEmail);
        }

        let profile = AccountProfile {
            id: user_id,
            username: username.to_owned(),
            email: email.to_owned(),
        };
        match self.backend.update_account(&profile).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "account updated");
                session.rename(username);
                self.profile = Some(profile);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(user_id = %user_id, error = %error, "account update failed");
                Err(AccountError::SaveFailed)
            }
        }
    }
}
