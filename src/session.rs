//! Client-held session state and the entry guard around it.

use crate::api::UserId;
use crate::backend::Backend;
use std::fmt;
use std::sync::Arc;

/// Route of the login entry point, used as redirect target and for the
/// backward-navigation referrer check.
pub const LOGIN_ROUTE: &str = "/log-in";

/// Notice shown after a detected session expiry.
pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";

/// Notice shown after an explicit or implicit logout.
pub const LOGGED_OUT_NOTICE: &str = "You have been logged out.";

/// Notice shown when the conversational view is entered without a session.
pub const PLEASE_LOG_IN_NOTICE: &str = "Please log in.";

/// Client-held identity state.
///
/// Created on successful login, destroyed on logout or detected expiry, and
/// passed explicitly to every operation that needs identity. The user id is
/// resolved separately on view entry; a session without one is invalid for
/// all chat operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserId>,
    username: String,
    authenticated: bool,
}

impl Session {
    /// Session established by a successful login.
    pub fn logged_in(username: impl Into<String>) -> Self {
        Self {
            user_id: None,
            username: username.into(),
            authenticated: true,
        }
    }

    /// The resolved user id, if view entry has resolved one.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// The account's username. Empty for a cleared session.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether a login produced this session and it has not been cleared.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Record the user id resolved on view entry.
    pub fn adopt_user_id(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    /// Record the username confirmed by an account edit, so the greeting
    /// reflects it immediately.
    pub fn rename(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Destroy the session: every field returns to its logged-out state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of a guard check, interpreted by the embedding shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// The view may proceed.
    Proceed,
    /// Navigate to [`LOGIN_ROUTE`], optionally carrying a notice.
    RedirectToLogin {
        /// Human-readable reason shown on the login page.
        notice: Option<String>,
    },
}

impl GuardAction {
    fn redirect(notice: &str) -> Self {
        Self::RedirectToLogin {
            notice: Some(notice.to_owned()),
        }
    }
}

/// Gates entry to the conversational view and ends sessions that should not
/// continue: detected expiry, backward navigation from the login page, and
/// the best-effort logout on page unload.
pub struct SessionGuard {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}

impl SessionGuard {
    /// Create a guard over the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Session check issued on view entry.
    ///
    /// A session with no username redirects immediately, without backend
    /// traffic. A reported expiry clears the session and redirects with
    /// [`SESSION_EXPIRED_NOTICE`]. A failed check is logged and the view
    /// proceeds; the check fails open so a broken endpoint cannot lock the
    /// user out of the app.
    pub async fn check_on_entry(&self, session: &mut Session) -> GuardAction {
        if session.username().is_empty() {
            session.clear();
            return GuardAction::redirect(PLEASE_LOG_IN_NOTICE);
        }

        match self.backend.check_session().await {
            Ok(check) if check.expired => {
                tracing::info!(username = %session.username(), "session expired; redirecting to login");
                session.clear();
                GuardAction::redirect(SESSION_EXPIRED_NOTICE)
            }
            Ok(_) => GuardAction::Proceed,
            Err(error) => {
                tracing::warn!(error = %error, "session check failed; proceeding");
                GuardAction::Proceed
            }
        }
    }

    /// Implicit logout on backward navigation from the login page.
    ///
    /// Any other referrer proceeds untouched. When the logout request itself
    /// fails, the session is left intact, matching the view's observed
    /// behavior.
    pub async fn back_navigation(&self, referrer: &str, session: &mut Session) -> GuardAction {
        if !referrer.contains(LOGIN_ROUTE) {
            return GuardAction::Proceed;
        }

        match self.backend.log_out().await {
            Ok(()) => {
                tracing::info!("backward navigation from login; session ended");
                session.clear();
                GuardAction::redirect(LOGGED_OUT_NOTICE)
            }
            Err(error) => {
                tracing::warn!(error = %error, "logout on back navigation failed");
                GuardAction::Proceed
            }
        }
    }

    /// Best-effort logout notification on page unload.
    ///
    /// Fire-and-forget: the request runs on a spawned task, no response is
    /// awaited, nothing is retried, and delivery is not confirmed. The handle
    /// is returned for callers that want to observe the attempt.
    pub fn notify_unload(&self) -> tokio::task::JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(error) = backend.log_out().await {
                tracing::debug!(error = %error, "unload logout notification failed");
            }
        })
    }
}
