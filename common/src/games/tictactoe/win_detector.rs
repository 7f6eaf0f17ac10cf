use super::board::Board;
use super::types::{Outcome, Player, Position, WinningLine};

#[derive(Debug, Clone, Copy)]
enum Line {
    Row(usize),
    Column(usize),
    MainDiagonal,
    AntiDiagonal,
}

impl Line {
    fn cell(self, size: usize, i: usize) -> Position {
        match self {
            Line::Row(row) => Position::new(row, i),
            Line::Column(col) => Position::new(i, col),
            Line::MainDiagonal => Position::new(i, i),
            Line::AntiDiagonal => Position::new(i, size - 1 - i),
        }
    }

    fn owner(self, board: &Board) -> Option<Player> {
        let size = board.size();
        let first = self.cell(size, 0);
        let owner = board.at(first.row, first.col).owner()?;
        let mark = owner.mark();
        for i in 1..size {
            let pos = self.cell(size, i);
            if board.at(pos.row, pos.col) != mark {
                return None;
            }
        }
        Some(owner)
    }

    fn to_winning_line(self, owner: Player, size: usize) -> WinningLine {
        WinningLine::new(owner, self.cell(size, 0), self.cell(size, size - 1))
    }
}

/// The lines a move at `pos` can complete: its row, its column and each
/// diagonal it lies on.
fn lines_through(pos: Position, size: usize) -> impl Iterator<Item = Line> {
    let main = (pos.row == pos.col).then_some(Line::MainDiagonal);
    let anti = (pos.row + pos.col == size - 1).then_some(Line::AntiDiagonal);
    [Some(Line::Row(pos.row)), Some(Line::Column(pos.col)), main, anti]
        .into_iter()
        .flatten()
}

/// Decides whether the move at `last` ended the game. Only the lines through
/// `last` are inspected; a line can only become fully owned on the move that
/// completes it.
pub fn is_game_over(board: &Board, last: Position, moves_so_far: usize) -> Outcome {
    if let Some(line) = winning_line_through(board, last) {
        return Outcome::Won(line.owner);
    }

    let size = board.size();
    if moves_so_far == size * size {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

pub fn winning_line_through(board: &Board, last: Position) -> Option<WinningLine> {
    let size = board.size();
    lines_through(last, size)
        .find_map(|line| line.owner(board).map(|owner| line.to_winning_line(owner, size)))
}

/// Full-board scan over every row, column and both diagonals.
pub fn scan_for_winner(board: &Board) -> Option<WinningLine> {
    let size = board.size();
    let rows = (0..size).map(Line::Row);
    let columns = (0..size).map(Line::Column);
    rows.chain(columns)
        .chain([Line::MainDiagonal, Line::AntiDiagonal])
        .find_map(|line| line.owner(board).map(|owner| line.to_winning_line(owner, size)))
}

pub fn scan_outcome(board: &Board) -> Outcome {
    match scan_for_winner(board) {
        Some(line) => Outcome::Won(line.owner),
        None if board.is_full() => Outcome::Draw,
        None => Outcome::InProgress,
    }
}
