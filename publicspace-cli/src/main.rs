//! publicspace CLI - Command-line interface
//!
//! This binary provides a command-line interface to the publicspace library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::batch::BatchArgs;
use commands::classify::ClassifyArgs;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "publicspace")]
#[command(version = publicspace::VERSION)]
#[command(about = "Classify land as public or private from BGT and TOP10NL", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one area from local BGT and TOP10NL data
    Classify(ClassifyArgs),

    /// Download and classify every area in an AOI file, then merge the results
    Batch(BatchArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Classify(args) => commands::classify::run(args, cli.debug),
        Commands::Batch(args) => commands::batch::run(args, cli.debug),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
