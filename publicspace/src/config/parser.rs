//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("cell_size") {
            let size: f64 = parse_number("grid", "cell_size", v, "must be a positive number")?;
            if !(size.is_finite() && size > 0.0) {
                return Err(invalid("grid", "cell_size", v, "must be a positive number"));
            }
            config.grid.cell_size = size;
        }
        if let Some(v) = section.get("strategy") {
            config.grid.strategy = v
                .parse()
                .map_err(|_| invalid("grid", "strategy", v, "must be 'sequential' or 'parallel'"))?;
        }
    }

    // [sources] section
    if let Some(section) = ini.section(Some("sources")) {
        if let Some(v) = section.get("bgt_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.sources.bgt_url = v.to_string();
            }
        }
        if let Some(v) = section.get("top10nl_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.sources.top10nl_url = v.to_string();
            }
        }
        if let Some(v) = section.get("page_limit") {
            config.sources.page_limit =
                parse_number("sources", "page_limit", v, "must be a positive integer")?;
            if config.sources.page_limit == 0 {
                return Err(invalid("sources", "page_limit", v, "must be a positive integer"));
            }
        }
        if let Some(v) = section.get("max_retries") {
            config.sources.max_retries =
                parse_number("sources", "max_retries", v, "must be a positive integer")?;
            if config.sources.max_retries == 0 {
                return Err(invalid("sources", "max_retries", v, "must be a positive integer"));
            }
        }
        if let Some(v) = section.get("retry_delay_secs") {
            config.sources.retry_delay_secs =
                parse_number("sources", "retry_delay_secs", v, "must be an integer (seconds)")?;
        }
        if let Some(v) = section.get("timeout_secs") {
            config.sources.timeout_secs =
                parse_number("sources", "timeout_secs", v, "must be a positive integer (seconds)")?;
        }
        if let Some(v) = section.get("download") {
            config.sources.download = parse_bool(v);
        }
    }

    // [batch] section
    if let Some(section) = ini.section(Some("batch")) {
        if let Some(v) = section.get("workers") {
            let workers: usize = parse_number("batch", "workers", v, "must be a positive integer")?;
            config.batch.workers = workers.max(1);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
