//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and classifier
//! construction shared by the `classify` and `batch` commands.

use crate::error::CliError;
use std::sync::Arc;
use tracing::info;
use publicspace::classify::Classifier;
use publicspace::config::ConfigFile;
use publicspace::log::TracingLogger;
use publicspace::logging::{init_logging, split_log_path, LoggingGuard};
use publicspace::overlay::{SurfaceConfig, TileStrategy};
use publicspace::provider::{OgcFeatureApi, ReqwestClient};
use publicspace::rules::RuleSet;
use publicspace::source::Dataset;

/// Command-line overrides for the tile grid settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceOverrides {
    pub cell_size: Option<f64>,
    pub parallel_tiles: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, true, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("publicspace v{}", publicspace::VERSION);
        info!("publicspace CLI: {} command", command);
        info!(log = %self.logging_guard.log_path().display(), "Logging to file");
    }

    /// Surface settings from config with command-line overrides applied.
    pub fn surface_config(&self, overrides: SurfaceOverrides) -> Result<SurfaceConfig, CliError> {
        let mut surface = self.config.surface_config();
        if let Some(cell_size) = overrides.cell_size {
            if !(cell_size.is_finite() && cell_size > 0.0) {
                return Err(CliError::InvalidArgument(format!(
                    "--cell-size must be a positive number, got {}",
                    cell_size
                )));
            }
            surface.cell_size = cell_size;
        }
        if overrides.parallel_tiles {
            surface.strategy = TileStrategy::Parallel;
        }
        info!(
            cell_size = surface.cell_size,
            strategy = %surface.strategy,
            "Tile grid settings"
        );
        Ok(surface)
    }

    /// Classifier with the default rules, logging through `tracing`.
    ///
    /// With `download` set, BGT (as of now) and TOP10NL are fetched from the
    /// configured OGC API endpoints before each AOI.
    pub fn create_classifier(
        &self,
        surface: SurfaceConfig,
        download: bool,
    ) -> Result<Classifier, CliError> {
        let mut classifier = Classifier::new(surface)
            .with_rules(
                RuleSet::default().with_logger(Arc::new(TracingLogger::for_component("rules"))),
            )
            .with_logger(Arc::new(TracingLogger::for_component("classify")));

        if download {
            let sources = &self.config.sources;
            let client = Arc::new(ReqwestClient::with_timeout(sources.timeout_secs)?);
            let retry = self.config.retry_policy();

            let bgt = OgcFeatureApi::new("BGT", &sources.bgt_url, client.clone())
                .with_page_limit(sources.page_limit)
                .with_retry(retry);
            let top10nl = OgcFeatureApi::new("TOP10NL", &sources.top10nl_url, client)
                .with_page_limit(sources.page_limit)
                .with_retry(retry);

            info!(bgt = %sources.bgt_url, top10nl = %sources.top10nl_url, "Downloads enabled");
            classifier = classifier
                .with_provider(Dataset::Bgt, Arc::new(bgt), true)
                .with_provider(Dataset::Top10nl, Arc::new(top10nl), false);
        }

        Ok(classifier)
    }
}
