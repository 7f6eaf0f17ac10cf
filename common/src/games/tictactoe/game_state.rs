use crate::error::GameError;

use super::board::Board;
use super::settings::GameSettings;
use super::types::{GameStatus, Mark, Outcome, Player, Position, Sign, WinningLine};
use super::win_detector::{is_game_over, winning_line_through};

/// Invariant: exactly `move_count` cells of `board` are marked, and
/// `current_mover` is `None` exactly when the game has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    move_count: usize,
    current_mover: Option<Player>,
    winner: Option<Player>,
    settings: GameSettings,
    last_move: Option<Position>,
}

impl GameState {
    pub fn new(settings: GameSettings) -> Result<Self, GameError> {
        settings.validate()?;

        let current_mover = if settings.computer_first {
            Player::Computer
        } else {
            Player::Human
        };

        Ok(Self {
            board: Board::new(settings.grid_size),
            move_count: 0,
            current_mover: Some(current_mover),
            winner: None,
            settings,
            last_move: None,
        })
    }

    /// Builds a mid-game position; the board is assumed to hold no finished line.
    #[cfg(test)]
    pub(crate) fn from_board(board: Board, settings: GameSettings, current_mover: Player) -> Self {
        Self {
            move_count: board.occupied_count(),
            board,
            current_mover: Some(current_mover),
            winner: None,
            settings,
            last_move: None,
        }
    }

    /// True iff the human may play `pos` right now.
    pub fn is_legal(&self, pos: Position) -> bool {
        self.check_move(pos, Player::Human).is_ok()
    }

    pub fn check_move(&self, pos: Position, mover: Player) -> Result<(), GameError> {
        let current = self.current_mover.ok_or(GameError::GameOver)?;

        if current != mover {
            return Err(GameError::NotYourTurn(mover));
        }

        match self.board.get(pos) {
            None => Err(GameError::OutOfBounds(pos)),
            Some(Mark::Empty) => Ok(()),
            Some(_) => Err(GameError::CellOccupied(pos)),
        }
    }

    /// Rejects an illegal move without touching the state.
    pub fn apply_move(&mut self, pos: Position, mover: Player) -> Result<Outcome, GameError> {
        self.check_move(pos, mover)?;

        self.board.set(pos, mover.mark());
        self.move_count += 1;
        self.last_move = Some(pos);

        let outcome = is_game_over(&self.board, pos, self.move_count);
        if outcome.is_over() {
            self.winner = outcome.winner();
            self.current_mover = None;
        } else {
            self.current_mover = Some(mover.opponent());
        }

        Ok(outcome)
    }

    pub fn current_mover(&self) -> Option<Player> {
        self.current_mover
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn grid_size(&self) -> usize {
        self.board.size()
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn is_over(&self) -> bool {
        self.current_mover.is_none()
    }

    pub fn status(&self) -> GameStatus {
        match (self.current_mover, self.winner) {
            (Some(Player::Human), _) => GameStatus::HumanToMove,
            (Some(Player::Computer), _) => GameStatus::ComputerToMove,
            (None, Some(Player::Human)) => GameStatus::HumanWon,
            (None, Some(Player::Computer)) => GameStatus::ComputerWon,
            (None, None) => GameStatus::Draw,
        }
    }

    pub fn sign_of(&self, player: Player) -> Sign {
        let moved_first = (player == Player::Computer) == self.settings.computer_first;
        if moved_first { Sign::X } else { Sign::O }
    }

    pub fn sign_at(&self, pos: Position) -> Option<Sign> {
        self.board
            .get(pos)
            .and_then(Mark::owner)
            .map(|owner| self.sign_of(owner))
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winner?;
        winning_line_through(&self.board, self.last_move?)
    }
}
