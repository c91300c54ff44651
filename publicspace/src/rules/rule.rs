//! A single classification rule.

use std::fmt;

use super::catalog::SOURCE_ID_ATTRIBUTE;
use super::predicate::Predicate;
use crate::feature::Category;
use crate::overlay::AddSpec;
use crate::source::Dataset;

/// One ordered classification step.
///
/// A rule reads one layer of one dataset, selects records with its
/// [`Predicate`] and hands them to the surface with its category and reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub dataset: Dataset,
    /// Layer name looked up in the source
    pub source_layer: String,
    /// Layer name written to the output `layer` field
    pub output_layer: String,
    pub predicate: Predicate,
    pub category: Category,
    pub reason: String,
    pub source_id_attribute: String,
    pub source_category_attribute: Option<String>,
}

impl Rule {
    /// A rule selecting every record of `layer`.
    pub fn new(dataset: Dataset, layer: &str, category: Category, reason: impl Into<String>) -> Self {
        Self {
            dataset,
            source_layer: layer.to_string(),
            output_layer: layer.to_string(),
            predicate: Predicate::All,
            category,
            reason: reason.into(),
            source_id_attribute: SOURCE_ID_ATTRIBUTE.to_string(),
            source_category_attribute: None,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_output_layer(mut self, layer: &str) -> Self {
        self.output_layer = layer.to_string();
        self
    }

    pub fn with_source_category(mut self, attribute: &str) -> Self {
        self.source_category_attribute = Some(attribute.to_string());
        self
    }

    pub fn with_source_id_attribute(mut self, attribute: &str) -> Self {
        self.source_id_attribute = attribute.to_string();
        self
    }

    /// Provenance settings for the surface.
    pub fn add_spec(&self) -> AddSpec<'_> {
        AddSpec {
            source: self.dataset.id(),
            layer: &self.output_layer,
            source_id_attribute: &self.source_id_attribute,
            reason: &self.reason,
            category: self.category,
            source_category_attribute: self.source_category_attribute.as_deref(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) -> {}",
            self.dataset, self.source_layer, self.predicate, self.category
        )
    }
}
