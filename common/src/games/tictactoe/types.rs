use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }

    pub fn mark(self) -> Mark {
        match self {
            Player::Human => Mark::Human,
            Player::Computer => Mark::Computer,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Human => write!(f, "human"),
            Player::Computer => write!(f, "computer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    Empty,
    Human,
    Computer,
}

impl Mark {
    pub fn owner(self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::Human => Some(Player::Human),
            Mark::Computer => Some(Player::Computer),
        }
    }
}

/// Row-major, 0-indexed cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Display mark: whoever moved first plays X.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    X,
    O,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::X => write!(f, "X"),
            Sign::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    HumanToMove,
    ComputerToMove,
    HumanWon,
    ComputerWon,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub owner: Player,
    pub start: Position,
    pub end: Position,
}

impl WinningLine {
    pub fn new(owner: Player, start: Position, end: Position) -> Self {
        Self { owner, start, end }
    }
}

/// One-shot notification delivered when the computer's move has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveComputed {
    pub position: Position,
    pub sign: Sign,
}
