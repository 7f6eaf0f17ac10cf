use super::types::{Mark, Position};

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Mark>,
    size: usize,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Mark::Empty; size * size],
            size,
        }
    }

    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut board = Self::new(size);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let mark = match ch {
                    'H' => Mark::Human,
                    'C' => Mark::Computer,
                    _ => Mark::Empty,
                };
                board.set(Position::new(row, col), mark);
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn get(&self, pos: Position) -> Option<Mark> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(self.index(pos)).copied()
    }

    /// Panics on an out-of-range position; callers check bounds first.
    pub fn at(&self, row: usize, col: usize) -> Mark {
        self.cells[row * self.size + col]
    }

    pub(crate) fn set(&mut self, pos: Position, mark: Mark) {
        let index = self.index(pos);
        self.cells[index] = mark;
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(Mark::Empty)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Mark::Empty).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    pub fn center(&self) -> Position {
        let mid = (self.size - 1) / 2;
        Position::new(mid, mid)
    }

    /// Empty cells in row-major order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Mark::Empty)
            .map(|(index, _)| Position::new(index / self.size, index % self.size))
            .collect()
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }
}
