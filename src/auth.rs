//! Credential validation and the login/signup flows.
//!
//! Validation runs locally, before any request; an input that fails these
//! rules never reaches the network. The rules mirror what the signup form
//! promises on screen: usernames are 4 to 24 characters beginning with a
//! letter, passwords are 8 to 24 characters with one lowercase letter, one
//! uppercase letter, one digit, and one of `!@#$%`.

use crate::backend::Backend;
use crate::error::Error;
use crate::session::Session;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z][A-Za-z0-9_-]{3,23}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Whether a username satisfies the account rules.
#[must_use]
pub fn validate_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Whether an email address satisfies the account rules.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether a login field is acceptable: a valid username or a valid email.
#[must_use]
pub fn validate_login(login: &str) -> bool {
    validate_username(login) || validate_email(login)
}

/// Whether a password satisfies the account rules.
///
/// The class requirements are checked explicitly rather than with lookahead
/// patterns, which the `regex` crate does not support.
#[must_use]
pub fn validate_password(pwd: &str) -> bool {
    (8..=24).contains(&pwd.chars().count())
        && pwd.chars().any(|c| c.is_ascii_lowercase())
        && pwd.chars().any(|c| c.is_ascii_uppercase())
        && pwd.chars().any(|c| c.is_ascii_digit())
        && pwd.chars().any(|c| "!@#$%".contains(c))
}

/// Why a login or signup attempt did not produce a session.
///
/// The display form of each variant is the exact notice the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Local validation rejected the input; nothing was sent.
    #[error("Invalid input. Please check fields.")]
    InvalidInput,
    /// The backend rejected the credentials (401).
    #[error("Invalid username or password.")]
    BadCredentials,
    /// The backend reported the username or email as taken (409).
    #[error("Username or email already exists.")]
    AccountExists,
    /// No response was reachable.
    #[error("Network error. Please try again.")]
    Network,
    /// Any other login failure.
    #[error("Login failed.")]
    LoginFailed,
    /// Any other signup failure.
    #[error("Registration failed.")]
    RegistrationFailed,
}

/// Runs the login and signup flows that create a [`Session`].
pub struct Authenticator {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator over the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Authenticate and construct a session.
    ///
    /// The backend answers with the canonical username, which seeds the
    /// session; the user id is resolved separately on view entry. The session
    /// cookie lands in the transport's jar as a side effect of the request.
    pub async fn log_in(&self, login: &str, pwd: &str) -> Result<Session, AuthError> {
        if !validate_login(login) || !validate_password(pwd) {
            return Err(AuthError::InvalidInput);
        }

        match self.backend.log_in(login, pwd).await {
            Ok(response) => {
                tracing::info!(username = %response.username, "logged in");
                Ok(Session::logged_in(response.username))
            }
            Err(error) => {
                tracing::warn!(error = %error, "login failed");
                Err(match error {
                    Error::Api { status: 401, .. } => AuthError::BadCredentials,
                    Error::Http(_) => AuthError::Network,
                    _ => AuthError::LoginFailed,
                })
            }
        }
    }

    /// Register a new account. Does not log the user in.
    pub async fn sign_up(
        &self,
        user: &str,
        email: &str,
        pwd: &str,
        confirm_pwd: &str,
    ) -> Result<(), AuthError> {
        if !validate_username(user)
            || !validate_email(email)
            || !validate_password(pwd)
            || pwd != confirm_pwd
        {
            return Err(AuthError::InvalidInput);
        }

        match self.backend.sign_up(user, email, pwd).await {
            Ok(()) => {
                tracing::info!(username = %user, "account registered");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "signup failed");
                Err(match error {
                    Error::Api { status: 409, .. } => AuthError::AccountExists,
                    Error::Http(_) => AuthError::Network,
                    _ => AuthError::RegistrationFailed,
                })
            }
        }
    }
}
