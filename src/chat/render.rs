//! Projection from the ordered transcript to renderable display units.

use crate::chat::transcript::{ChatMessage, Sender};

/// One renderable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUnit<'a> {
    /// A lone message: user turn, restored turn, or unpaired BioMistral reply.
    Single(&'a ChatMessage),
    /// A linked dual-model reply.
    Pair {
        /// BioMistral's side of the pair.
        biomistral: &'a ChatMessage,
        /// Meditron's side of the pair.
        meditron: &'a ChatMessage,
    },
}

/// Project the transcript into display units.
///
/// Left-to-right scan: a `BioMistral` message immediately followed by a
/// `Meditron` message becomes one [`DisplayUnit::Pair`] and the scan advances
/// past both. Any `Meditron` message the scan reaches is treated as already
/// consumed and emits nothing, so a standalone `Meditron` entry never renders.
/// Everything else becomes a [`DisplayUnit::Single`] in original order.
#[must_use]
pub fn display_units(messages: &[ChatMessage]) -> Vec<DisplayUnit<'_>> {
    let mut units = Vec::with_capacity(messages.len());
    let mut i = 0;
    while i < messages.len() {
        let msg = &messages[i];
        match msg.sender {
            Sender::BioMistral
                if messages.get(i + 1).is_some_and(|m| m.sender == Sender::Meditron) =>
            {
                units.push(DisplayUnit::Pair {
                    biomistral: msg,
                    meditron: &messages[i + 1],
                });
                i += 2;
            }
            Sender::Meditron => {
                i += 1;
            }
            _ => {
                units.push(DisplayUnit::Single(msg));
                i += 1;
            }
        }
    }
    units
}
