//! The live transcript's message model.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
///
/// `Bot` is the coarse tag for restored model turns: the stored two-collection
/// format does not record which model produced a received entry, so restored
/// replies cannot carry a `BioMistral` or `Meditron` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    BioMistral,
    Meditron,
    Bot,
}

impl Sender {
    /// Display label, matching the conversational view's speaker line.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::BioMistral => "BioMistral",
            Self::Meditron => "Meditron",
            Self::Bot => "bot",
        }
    }
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the entry.
    pub sender: Sender,
    /// The entry text.
    pub text: String,
}

impl ChatMessage {
    /// Create a message.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    /// A user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// A BioMistral reply.
    pub fn biomistral(text: impl Into<String>) -> Self {
        Self::new(Sender::BioMistral, text)
    }

    /// A Meditron reply.
    pub fn meditron(text: impl Into<String>) -> Self {
        Self::new(Sender::Meditron, text)
    }

    /// A restored model turn of unknown origin.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}
