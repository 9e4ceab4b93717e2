use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Per-player tool-break bit; index order also matches `Player::action_state`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ToolKind {
    Lamp,
    Cart,
    Pick,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Lamp, ToolKind::Cart, ToolKind::Pick];

    pub const fn index(self) -> usize {
        match self {
            ToolKind::Lamp => 0,
            ToolKind::Cart => 1,
            ToolKind::Pick => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RoadType {
    Start,
    Normal,
    End,
}

/// One of the four orthogonal sides of a board tile, matching the connection-mask
/// index order (middle, top, right, down, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Side {
    Top,
    Right,
    Down,
    Left,
}

impl Side {
    pub const fn index(self) -> usize {
        match self {
            Side::Top => 1,
            Side::Right => 2,
            Side::Down => 3,
            Side::Left => 4,
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Down,
            Side::Down => Side::Top,
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }
}
