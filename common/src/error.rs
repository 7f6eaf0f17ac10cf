use thiserror::Error;

use crate::games::tictactoe::{Player, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("grid size {0} is outside the supported range 3..=7")]
    InvalidGridSize(usize),

    #[error("game is already over")]
    GameOver,

    #[error("it is not the {0}'s turn")]
    NotYourTurn(Player),

    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    #[error("cell {0} is already marked")]
    CellOccupied(Position),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to deserialize config: {0}")]
    Parse(#[source] serde_yaml_ng::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    #[error("config validation error: {0}")]
    Invalid(String),
}
