mod board;
mod bot_controller;
mod game_state;
mod settings;
mod types;
mod win_detector;

pub use board::{Board, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use bot_controller::{
    DRAW, INEXACT, LOSE_BASE, MIN_DEPTH, Score, SearchEngine, TIME_PER_TURN, WIN_BASE,
};
pub use game_state::GameState;
pub use settings::GameSettings;
pub use types::{GameStatus, Mark, MoveComputed, Outcome, Player, Position, Sign, WinningLine};
pub use win_detector::{is_game_over, scan_for_winner, scan_outcome, winning_line_through};
