pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod logger;

pub use error::{ConfigError, GameError};
