//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for inspecting
//! and creating the configuration file.

use clap::Subcommand;
use publicspace::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(force),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Show the effective configuration.
fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    if path.exists() {
        println!("Configuration: {}", path.display());
    } else {
        println!("Configuration: {} (not found, using defaults)", path.display());
    }
    println!();
    println!("[grid]");
    println!("  cell_size = {}", config.grid.cell_size);
    println!("  strategy = {}", config.grid.strategy);
    println!();
    println!("[sources]");
    println!("  bgt_url = {}", config.sources.bgt_url);
    println!("  top10nl_url = {}", config.sources.top10nl_url);
    println!("  page_limit = {}", config.sources.page_limit);
    println!("  max_retries = {}", config.sources.max_retries);
    println!("  retry_delay_secs = {}", config.sources.retry_delay_secs);
    println!("  timeout_secs = {}", config.sources.timeout_secs);
    println!("  download = {}", config.sources.download);
    println!();
    println!("[batch]");
    println!("  workers = {}", config.batch.workers);
    println!();
    println!("[logging]");
    println!("  file = {}", config.logging.file.display());

    Ok(())
}

/// Write the default configuration file.
fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}
