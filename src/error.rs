use thiserror::Error;

/// Everything `Controller::step` (or a direct C5 legality check) can fail with.
///
/// All of these are recoverable: on `Err`, the played card is returned to the
/// mover's hand and only the mover's message slot is written. Nothing here is
/// raised as a panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("hand index {0} is out of range")]
    InvalidHandIndex(usize),
    #[error("illegal placement: {0}")]
    IllegalPlacement(&'static str),
    #[error("mover has a broken tool")]
    BrokenTool,
    #[error("invalid action target: {0}")]
    InvalidActionTarget(&'static str),
    #[error("step called after end_game")]
    EndGameReached,
    #[error("player index {0} is out of range")]
    InvalidPlayer(usize),
    #[error("move payload does not match the played card")]
    PayloadMismatch,
}
