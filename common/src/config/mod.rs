mod config_content_provider;
mod config_manager;
mod config_serializer;
mod game_config;
mod validate;

pub use config_content_provider::{ConfigContentProvider, FileContentConfigProvider};
pub use config_manager::ConfigManager;
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use game_config::GameConfig;
pub use validate::Validate;

#[cfg(test)]
pub(crate) use config_content_provider::MemoryContentProvider;
