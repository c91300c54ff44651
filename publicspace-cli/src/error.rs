//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use publicspace::batch::BatchError;
use publicspace::classify::ClassifyError;
use publicspace::config::ConfigFileError;
use publicspace::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to create the download client
    Provider(ProviderError),
    /// Single AOI classification failed
    Classify(ClassifyError),
    /// Batch run failed
    Batch(BatchError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or recreate it with: publicspace config init",
                    publicspace::config::config_file_path().display()
                );
            }
            CliError::Batch(BatchError::ReadAoi(_)) | CliError::Batch(BatchError::NoAreas(_)) => {
                eprintln!();
                eprintln!("The AOI file must be a GeoJSON FeatureCollection of polygons");
                eprintln!("in the same coordinate system as the source data (EPSG:28992).");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Provider(e) => write!(f, "Failed to create download client: {}", e),
            CliError::Classify(e) => write!(f, "Classification failed: {}", e),
            CliError::Batch(e) => write!(f, "Batch failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Provider(e) => Some(e),
            CliError::Classify(e) => Some(e),
            CliError::Batch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<ClassifyError> for CliError {
    fn from(e: ClassifyError) -> Self {
        CliError::Classify(e)
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        CliError::Batch(e)
    }
}
