//! User configuration.
//!
//! [`ConfigFile`] is read from `~/.publicspace/config.ini`; a missing file
//! means defaults. Every value can also be overridden on the command line.
//!
//! ```
//! use publicspace::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.grid.cell_size, 1000.0);
//! assert_eq!(config.sources.max_retries, 5);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{default_workers, num_cpus, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{BatchSettings, ConfigFile, GridSettings, LoggingSettings, SourcesSettings};
