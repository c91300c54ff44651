//! Classification rules and their orchestration.
//!
//! A [`Rule`] names a dataset layer, a [`Predicate`] over one attribute, the
//! resulting [`Category`](crate::feature::Category) and a reason text.
//! [`RuleSet::apply`] runs the rules in order against a
//! [`ClassifiedSurface`](crate::overlay::ClassifiedSurface); the order is the
//! only precedence mechanism, since the surface never gives claimed area
//! back.
//!
//! [`default_rules`] holds the seventeen rules of the public/private
//! classification.

mod catalog;
mod predicate;
mod rule;
mod ruleset;

pub use catalog::{
    default_rules, HARBOUR_FUNCTIONAL_AREAS, PRIVATE_FUNCTIONAL_AREAS, PUBLIC_ENGINEERING_WORKS,
    PUBLIC_VEGETATION, SOURCE_ID_ATTRIBUTE,
};
pub use predicate::Predicate;
pub use rule::Rule;
pub use ruleset::{RuleOutcome, RuleSet, RuleSetError, RuleStatus, RunReport, SkipReason};
