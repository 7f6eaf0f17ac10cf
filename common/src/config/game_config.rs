use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::games::tictactoe::{GameSettings, MAX_GRID_SIZE, MIN_GRID_SIZE, TIME_PER_TURN};

use super::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: usize,
    pub easy_mode: bool,
    pub computer_first: bool,
    pub time_per_turn_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: MIN_GRID_SIZE,
            easy_mode: false,
            computer_first: false,
            time_per_turn_ms: TIME_PER_TURN.as_millis() as u64,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "Grid size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size
            ));
        }
        if self.time_per_turn_ms == 0 {
            return Err("Time per turn must be positive".to_string());
        }
        Ok(())
    }
}

impl GameConfig {
    pub fn time_per_turn(&self) -> Duration {
        Duration::from_millis(self.time_per_turn_ms)
    }
}

impl TryFrom<&GameConfig> for GameSettings {
    type Error = GameError;

    fn try_from(config: &GameConfig) -> Result<Self, Self::Error> {
        GameSettings::new(config.grid_size, config.easy_mode, config.computer_first)
    }
}
