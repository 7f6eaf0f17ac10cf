use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::ConfigError;

pub trait ConfigContentProvider {
    /// `Ok(None)` when there is nothing stored yet.
    fn get_config_content(&self) -> Result<Option<String>, ConfigError>;
    fn set_config_content(&self, content: &str) -> Result<(), ConfigError>;
}

pub struct FileContentConfigProvider {
    file_path: PathBuf,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, ConfigError> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigError::Read(err)),
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), ConfigError> {
        std::fs::write(&self.file_path, content).map_err(ConfigError::Write)
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryContentProvider {
    content: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryContentProvider {
    pub(crate) fn with_content(content: &str) -> Self {
        Self {
            content: std::sync::Mutex::new(Some(content.to_string())),
        }
    }

    pub(crate) fn content(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ConfigContentProvider for MemoryContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.content.lock().unwrap().clone())
    }

    fn set_config_content(&self, content: &str) -> Result<(), ConfigError> {
        *self.content.lock().unwrap() = Some(content.to_string());
        Ok(())
    }
}
