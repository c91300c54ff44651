//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let download = if config.sources.download {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[grid]
; Tile cell edge length in map units (metres in RD New, default: 1000)
; Smaller cells keep overlay operations small at the cost of more fragments
cell_size = {}
; Tile processing within one rule:
;   sequential - one cell after another (default)
;   parallel   - all cells of a rule at once on the thread pool
strategy = {}

[sources]
; OGC API Features endpoints
bgt_url = {}
top10nl_url = {}
; Features requested per page (default: 1000)
page_limit = {}
; Attempts per request before a layer is given up (default: 5)
max_retries = {}
; Seconds to wait between attempts (default: 60)
retry_delay_secs = {}
; HTTP request timeout in seconds (default: 60)
timeout_secs = {}
; Download source data before classifying in batch mode (default: true)
download = {}

[batch]
; Number of areas classified at the same time (default: number of CPU cores)
workers = {}

[logging]
; Log file path, cleared at the start of each run
file = {}
"#,
        config.grid.cell_size,
        config.grid.strategy,
        config.sources.bgt_url,
        config.sources.top10nl_url,
        config.sources.page_limit,
        config.sources.max_retries,
        config.sources.retry_delay_secs,
        config.sources.timeout_secs,
        download,
        config.batch.workers,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
