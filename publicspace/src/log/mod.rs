//! Logging abstraction layer.
//!
//! Library components log through the [`Logger`] trait rather than calling
//! `tracing` directly, so a run can be silenced or captured in tests.
//!
//! - `Logger` trait: The interface that components use for logging
//! - `TracingLogger`: Delegates to the `tracing` crate with a component field
//! - `NoOpLogger`: Discards everything
//! - `MemoryLogger`: Keeps messages in memory for assertions
//!
//! # Usage
//!
//! ```
//! use publicspace::log::{Logger, NoOpLogger};
//! use publicspace::{log_info, log_warn};
//! use std::sync::Arc;
//!
//! struct Step {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Step {
//!     fn run(&self, layer: &str, found: bool) {
//!         if found {
//!             log_info!(self.logger, "Processing {}", layer);
//!         } else {
//!             log_warn!(self.logger, "No {} found, skipping", layer);
//!         }
//!     }
//! }
//!
//! let step = Step { logger: Arc::new(NoOpLogger) };
//! step.run("pand", true);
//! ```

mod memory;
mod sinks;
mod r#trait;

pub use memory::MemoryLogger;
pub use r#trait::{LogLevel, Logger};
pub use sinks::{NoOpLogger, TracingLogger};
