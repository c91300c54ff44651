//! Ordered rule execution.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::catalog::default_rules;
use super::rule::Rule;
use crate::log::{Logger, NoOpLogger};
use crate::overlay::{AddStats, ClassifiedSurface, OverlayError};
use crate::source::{SourceError, SourceSet};
use crate::{log_debug, log_info, log_warn};

/// Errors that abort a rule run.
#[derive(Debug, Error)]
pub enum RuleSetError {
    /// Reading the rule's layer failed
    #[error("Step {step}: failed to read layer '{layer}': {source}")]
    Source {
        step: usize,
        layer: String,
        #[source]
        source: SourceError,
    },

    /// Merging the rule's records into the surface failed
    #[error("Step {step}: overlay failed for layer '{layer}': {source}")]
    Overlay {
        step: usize,
        layer: String,
        #[source]
        source: OverlayError,
    },
}

/// Why a rule contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source has no such layer
    LayerAbsent,
    /// The layer exists but holds no records
    LayerEmpty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LayerAbsent => write!(f, "layer absent"),
            SkipReason::LayerEmpty => write!(f, "layer empty"),
        }
    }
}

/// What happened to one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleStatus {
    Applied { selected: usize, stats: AddStats },
    Skipped(SkipReason),
}

/// Outcome of one rule in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// 1-based position of the rule
    pub step: usize,
    pub description: String,
    pub status: RuleStatus,
}

/// Per-rule outcomes of a run, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<RuleOutcome>,
}

impl RunReport {
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RuleStatus::Applied { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.applied()
    }

    /// Total number of fragments appended by all rules.
    pub fn fragments(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                RuleStatus::Applied { stats, .. } => stats.appended,
                RuleStatus::Skipped(_) => 0,
            })
            .sum()
    }
}

/// An ordered list of rules.
///
/// The rule set only sequences: it looks up each rule's layer, selects the
/// matching records and passes them to [`ClassifiedSurface::add`]. Each rule
/// re-reads its layer, so a rule never sees the selection of another.
pub struct RuleSet {
    rules: Vec<Rule>,
    logger: Arc<dyn Logger>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order against `surface`.
    ///
    /// Absent and empty layers are skipped with a warning. The first source
    /// or overlay failure stops the run.
    pub fn apply(
        &self,
        sources: &SourceSet,
        surface: &mut ClassifiedSurface,
    ) -> Result<RunReport, RuleSetError> {
        let mut report = RunReport::default();

        for (position, rule) in self.rules.iter().enumerate() {
            let step = position + 1;
            log_info!(self.logger, "Step {}: {}", step, rule);

            let layer = sources
                .layer(rule.dataset, &rule.source_layer)
                .map_err(|source| RuleSetError::Source {
                    step,
                    layer: rule.source_layer.clone(),
                    source,
                })?;

            let status = match layer {
                None => {
                    log_warn!(
                        self.logger,
                        "Step {}: no {} {} found, skipping",
                        step,
                        rule.dataset,
                        rule.source_layer
                    );
                    RuleStatus::Skipped(SkipReason::LayerAbsent)
                }
                Some(layer) if layer.is_empty() => {
                    log_warn!(
                        self.logger,
                        "Step {}: {} {} is empty, skipping",
                        step,
                        rule.dataset,
                        rule.source_layer
                    );
                    RuleStatus::Skipped(SkipReason::LayerEmpty)
                }
                Some(layer) => {
                    let selected = rule.predicate.select(&layer.records);
                    let stats = surface.add(&selected, &rule.add_spec()).map_err(|source| {
                        RuleSetError::Overlay {
                            step,
                            layer: rule.source_layer.clone(),
                            source,
                        }
                    })?;
                    log_debug!(
                        self.logger,
                        "Step {}: selected {} of {} records, appended {} fragments",
                        step,
                        selected.len(),
                        layer.len(),
                        stats.appended
                    );
                    RuleStatus::Applied {
                        selected: selected.len(),
                        stats,
                    }
                }
            };

            report.outcomes.push(RuleOutcome {
                step,
                description: rule.to_string(),
                status,
            });
        }

        Ok(report)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("rules", &self.rules).finish()
    }
}
