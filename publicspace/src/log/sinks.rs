//! Logger implementations: discard, forward to `tracing`.

use std::fmt::Arguments;

use crate::log::{LogLevel, Logger};

/// A logger that discards all messages.
///
/// The default logger of a [`RuleSet`](crate::rules::RuleSet) and a
/// [`Classifier`](crate::classify::Classifier).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}

/// Forwards messages to `tracing`, tagged with the component that logged
/// them.
///
/// Messages end up wherever [`init_logging`](crate::logging::init_logging)
/// routed the subscriber, with a `component` field such as `rules` or
/// `classify`.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::for_component("publicspace")
    }
}

impl TracingLogger {
    pub fn for_component(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let component = self.component;
        match level {
            LogLevel::Trace => tracing::trace!(component, "{}", args),
            LogLevel::Debug => tracing::debug!(component, "{}", args),
            LogLevel::Info => tracing::info!(component, "{}", args),
            LogLevel::Warn => tracing::warn!(component, "{}", args),
            LogLevel::Error => tracing::error!(component, "{}", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{log_info, log_warn};

    #[test]
    fn test_loggers_as_trait_objects() {
        let loggers: Vec<Box<dyn Logger>> = vec![
            Box::new(NoOpLogger),
            Box::new(TracingLogger::for_component("rules")),
        ];
        // No subscriber installed: both must simply return
        for logger in &loggers {
            log_info!(logger, "Step {}: {}", 7, "wegdeel");
            log_warn!(logger, "no {} found", "scheiding");
        }
    }

    #[test]
    fn test_tracing_logger_component() {
        assert_eq!(TracingLogger::default().component(), "publicspace");
        assert_eq!(TracingLogger::for_component("batch").component(), "batch");
    }
}
