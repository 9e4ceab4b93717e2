//! The public move request and the per-player messages a `step` call returns.

use serde::{Deserialize, Serialize};

use crate::types::ToolKind;

/// A move submitted to `Controller::step`: "play the card at `card_index` from
/// the current player's hand, with `payload` describing where/how."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub card_index: usize,
    pub payload: MovePayload,
}

impl Move {
    pub fn road(card_index: usize, position: usize, rotate: bool) -> Self {
        Self {
            card_index,
            payload: MovePayload::Road { position, rotate },
        }
    }

    pub fn tool(card_index: usize, target: usize, tool: Option<ToolKind>) -> Self {
        Self {
            card_index,
            payload: MovePayload::Tool { target, tool },
        }
    }

    pub fn rocks(card_index: usize, position: usize) -> Self {
        Self {
            card_index,
            payload: MovePayload::Rocks { position },
        }
    }

    pub fn map(card_index: usize, position: usize) -> Self {
        Self {
            card_index,
            payload: MovePayload::Map { position },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePayload {
    Road { position: usize, rotate: bool },
    /// Break or repair; `tool` disambiguates the two dual-tool repair cards and
    /// is ignored (may be `None`) for single-tool cards.
    Tool {
        target: usize,
        tool: Option<ToolKind>,
    },
    Rocks { position: usize },
    Map { position: usize },
}

/// `return_msg` entry shape: `{msg_type, msg}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    IllegalPlay(String),
    Peek(i16),
    Info(String),
}

impl Message {
    pub fn empty_info() -> Self {
        Message::Info(String::new())
    }
}
