//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::grid::DEFAULT_CELL_SIZE;
use crate::overlay::TileStrategy;
use crate::provider::{BGT_API_URL, DEFAULT_PAGE_LIMIT, DEFAULT_TIMEOUT_SECS, TOP10NL_API_URL};

/// Default attempts per download request.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default pause between download attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Default batch worker count: one per core.
pub fn default_workers() -> usize {
    num_cpus()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                cell_size: DEFAULT_CELL_SIZE,
                strategy: TileStrategy::Sequential,
            },
            sources: SourcesSettings {
                bgt_url: BGT_API_URL.to_string(),
                top10nl_url: TOP10NL_API_URL.to_string(),
                page_limit: DEFAULT_PAGE_LIMIT,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                download: true,
            },
            batch: BatchSettings {
                workers: default_workers(),
            },
            logging: LoggingSettings {
                file: config_directory().join(crate::logging::default_log_file()),
            },
        }
    }
}
