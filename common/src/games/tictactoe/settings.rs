use crate::error::GameError;

use super::board::{MAX_GRID_SIZE, MIN_GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub grid_size: usize,
    pub easy_mode: bool,
    pub computer_first: bool,
}

impl GameSettings {
    pub fn new(grid_size: usize, easy_mode: bool, computer_first: bool) -> Result<Self, GameError> {
        let settings = Self {
            grid_size,
            easy_mode,
            computer_first,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(GameError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: MIN_GRID_SIZE,
            easy_mode: false,
            computer_first: false,
        }
    }
}
