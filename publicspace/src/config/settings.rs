//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::overlay::{SurfaceConfig, TileStrategy};
use crate::provider::RetryPolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tile grid settings
    pub grid: GridSettings,
    /// Source download settings
    pub sources: SourcesSettings,
    /// Batch driver settings
    pub batch: BatchSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile grid configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    /// Cell edge length in map units
    pub cell_size: f64,
    /// Tile processing strategy
    pub strategy: TileStrategy,
}

/// Source download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesSettings {
    /// OGC API Features endpoint for BGT
    pub bgt_url: String,
    /// OGC API Features endpoint for TOP10NL
    pub top10nl_url: String,
    /// Features requested per page
    pub page_limit: usize,
    /// Attempts per request
    pub max_retries: u32,
    /// Pause between attempts in seconds
    pub retry_delay_secs: u64,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Download data before classifying (batch mode)
    pub download: bool,
}

/// Batch driver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    /// Number of AOIs classified at the same time
    pub workers: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    /// Surface settings from the `[grid]` section.
    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            cell_size: self.grid.cell_size,
            strategy: self.grid.strategy,
        }
    }

    /// Retry policy from the `[sources]` section.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.sources.max_retries,
            delay: Duration::from_secs(self.sources.retry_delay_secs),
        }
    }
}
