#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod card;
pub mod codec;
pub mod error;
pub mod game;
pub mod player;
pub mod types;

pub use board::Board;
pub use card::{ActionCard, Card, RoadCard};
pub use codec::Snapshot;
pub use error::GameError;
pub use game::{Controller, ControllerBuilder, GameConfig, GamePhase, Message, Move, MovePayload};
pub use player::Player;
pub use types::{RoadType, ToolKind};
