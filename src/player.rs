//! Player (C2): hand, role, and tool-break state.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::GameError;
use crate::types::ToolKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    /// `true` = good dwarf, `false` = bad (saboteur).
    pub role: bool,
    pub hand: Vec<Card>,
    /// Broken-tool flags indexed by `ToolKind::index()` (lamp, cart, pick).
    pub action_state: [bool; 3],
    pub point: u32,
}

impl Player {
    pub fn new(id: String) -> Self {
        Self {
            id,
            role: true,
            hand: Vec::new(),
            action_state: [false; 3],
            point: 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.action_state.iter().all(|broken| !broken)
    }

    pub fn is_broken(&self, tool: ToolKind) -> bool {
        self.action_state[tool.index()]
    }

    pub fn set_broken(&mut self, tool: ToolKind, broken: bool) {
        self.action_state[tool.index()] = broken;
    }

    /// `play_card(hand_index)`: removes and returns the card at `hand_index`.
    pub fn play_card(&mut self, hand_index: usize) -> Result<Card, GameError> {
        if hand_index >= self.hand.len() {
            return Err(GameError::InvalidHandIndex(hand_index));
        }
        Ok(self.hand.remove(hand_index))
    }
}
