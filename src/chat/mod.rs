//! The conversational core: transcript model, chat identity, history
//! retrieval, the message-exchange turn machine, and display projection.

pub mod controller;
pub mod history;
pub mod render;
pub mod resolver;
pub mod transcript;

pub use controller::{MessageExchangeController, PendingTurn, SendOutcome};
pub use history::HistoryStore;
pub use render::{DisplayUnit, display_units};
pub use resolver::ChatIdentityResolver;
pub use transcript::{ChatMessage, Sender};
