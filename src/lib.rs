//! Client library for medbear, a two-model comparison chat assistant.
//!
//! Users authenticate, hold a persistent chat keyed by their account, and
//! receive two independently produced model replies per turn (one from
//! BioMistral, one from Meditron) displayed as a linked pair. This crate
//! owns the session lifecycle and message-exchange state machine; the
//! `medbear` binary is a thin readline loop over it.
//!
//! # Architecture
//!
//! - [`backend`] / [`http`]: the transport seam, an object-safe trait over
//!   every backend operation and its `reqwest` implementation (session
//!   identity rides the cookie jar)
//! - [`auth`]: credential validation and the login/signup flows
//! - [`session`]: the explicit session context and the entry guard around it
//! - [`chat`]: chat identity resolution, history retrieval, the
//!   message-exchange turn machine, and the display projection
//! - [`account`]: the profile fetch/edit panel
//! - [`shell`]: the activation-ordered wiring point the binary drives

pub mod account;
pub mod api;
pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::Backend;
pub use error::{Error, Result};
pub use http::HttpBackend;
pub use session::{GuardAction, Session, SessionGuard};
pub use shell::ChatShell;
