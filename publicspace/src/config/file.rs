//! Reading and writing `~/.publicspace/config.ini`.
//!
//! A missing file is not an error: the run falls back to
//! [`ConfigFile::default`]. Parsing lives in [`super::parser`] and the
//! commented INI output in [`super::writer`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

const CONFIG_DIR_NAME: &str = ".publicspace";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Cannot read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A key holds a value the classifier cannot use.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Cannot create configuration directory {}: {source}", path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigFile {
    /// Load `~/.publicspace/config.ini`, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load a configuration file, or defaults when `path` does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigFileError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        super::parser::parse_ini(&ini)
    }

    /// Write this configuration to `~/.publicspace/config.ini`.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Write this configuration to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigFileError::DirectoryError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, super::writer::to_config_string(self)).map_err(|source| {
            ConfigFileError::WriteError {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

/// `~/.publicspace`, or `./.publicspace` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::grid::DEFAULT_CELL_SIZE;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.grid.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(config.sources.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.sources.retry_delay_secs, DEFAULT_RETRY_DELAY_SECS);
        assert_eq!(config.sources.page_limit, 1000);
        assert!(config.batch.workers >= 1);
        assert!(config.logging.file.ends_with("publicspace.log"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_unreadable_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[grid\ncell_size = 10\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();

        assert!(matches!(err, ConfigFileError::ReadError { .. }));
        assert!(err.to_string().contains("config.ini"));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_file_path().ends_with(".publicspace/config.ini"));
    }
}
