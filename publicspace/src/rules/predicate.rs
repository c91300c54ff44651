//! Attribute predicates for selecting records.

use std::fmt;

use crate::source::Record;

/// Selects the records of a layer a rule applies to.
///
/// A record without a value for the attribute (missing key or null) is
/// never `In` a set and never `Equals` a value, so it always matches the
/// negated form. Each predicate and its [`complement`](Predicate::complement)
/// therefore split a layer into two disjoint parts that together cover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every record
    All,
    /// Attribute value is one of `values`
    In { attribute: String, values: Vec<String> },
    /// Attribute value is missing or not one of `values`
    NotIn { attribute: String, values: Vec<String> },
    /// Attribute value equals `value`
    Equals { attribute: String, value: String },
    /// Attribute value is missing or differs from `value`
    NotEquals { attribute: String, value: String },
}

impl Predicate {
    pub fn is_in(attribute: &str, values: &[&str]) -> Self {
        Predicate::In {
            attribute: attribute.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn not_in(attribute: &str, values: &[&str]) -> Self {
        Predicate::NotIn {
            attribute: attribute.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn equals(attribute: &str, value: &str) -> Self {
        Predicate::Equals {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn not_equals(attribute: &str, value: &str) -> Self {
        Predicate::NotEquals {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::All => true,
            Predicate::In { attribute, values } => record
                .attribute(attribute)
                .is_some_and(|v| values.iter().any(|candidate| *candidate == v)),
            Predicate::NotIn { attribute, values } => !record
                .attribute(attribute)
                .is_some_and(|v| values.iter().any(|candidate| *candidate == v)),
            Predicate::Equals { attribute, value } => {
                record.attribute(attribute).is_some_and(|v| v == *value)
            }
            Predicate::NotEquals { attribute, value } => {
                record.attribute(attribute).map_or(true, |v| v != *value)
            }
        }
    }

    /// Records matching this predicate, in layer order.
    pub fn select(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// The negated predicate, `None` for [`Predicate::All`].
    pub fn complement(&self) -> Option<Predicate> {
        match self {
            Predicate::All => None,
            Predicate::In { attribute, values } => Some(Predicate::NotIn {
                attribute: attribute.clone(),
                values: values.clone(),
            }),
            Predicate::NotIn { attribute, values } => Some(Predicate::In {
                attribute: attribute.clone(),
                values: values.clone(),
            }),
            Predicate::Equals { attribute, value } => Some(Predicate::NotEquals {
                attribute: attribute.clone(),
                value: value.clone(),
            }),
            Predicate::NotEquals { attribute, value } => Some(Predicate::Equals {
                attribute: attribute.clone(),
                value: value.clone(),
            }),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "all"),
            Predicate::In { attribute, values } => {
                write!(f, "{} in {} values", attribute, values.len())
            }
            Predicate::NotIn { attribute, values } => {
                write!(f, "{} not in {} values", attribute, values.len())
            }
            Predicate::Equals { attribute, value } => write!(f, "{} = '{}'", attribute, value),
            Predicate::NotEquals { attribute, value } => write!(f, "{} != '{}'", attribute, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    fn record(value: Option<&str>) -> Record {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ]]);
        let record = Record::new(geometry, Map::new());
        match value {
            Some(v) => record.with_attribute("functie", v),
            None => record,
        }
    }

    #[test]
    fn test_equals_and_not_equals() {
        let p = Predicate::equals("functie", "spoorbaan");
        assert!(p.matches(&record(Some("spoorbaan"))));
        assert!(!p.matches(&record(Some("rijbaan lokale weg"))));
        assert!(!p.matches(&record(None)));

        let n = Predicate::not_equals("functie", "spoorbaan");
        assert!(!n.matches(&record(Some("spoorbaan"))));
        assert!(n.matches(&record(None)));
    }

    #[test]
    fn test_null_value_matches_negated_form() {
        let with_null = record(None).with_attribute("functie", Value::Null);
        assert!(!Predicate::is_in("functie", &["a"]).matches(&with_null));
        assert!(Predicate::not_in("functie", &["a"]).matches(&with_null));
    }

    #[test]
    fn test_complement_round_trip() {
        let p = Predicate::is_in("type", &["perron"]);
        assert_eq!(p.complement().unwrap().complement().unwrap(), p);
        assert_eq!(Predicate::All.complement(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Predicate::equals("fysiek_voorkomen", "erf").to_string(), "fysiek_voorkomen = 'erf'");
        assert_eq!(Predicate::All.to_string(), "all");
    }

    proptest! {
        #[test]
        fn prop_predicate_and_complement_partition(values in prop::collection::vec(prop::option::of("[a-c]"), 0..30)) {
            let records: Vec<Record> = values.iter().map(|v| record(v.as_deref())).collect();
            for predicate in [
                Predicate::is_in("functie", &["a", "b"]),
                Predicate::equals("functie", "c"),
            ] {
                let complement = predicate.complement().unwrap();
                for r in &records {
                    prop_assert!(predicate.matches(r) != complement.matches(r));
                }
                let selected = predicate.select(&records).len() + complement.select(&records).len();
                prop_assert_eq!(selected, records.len());
            }
        }
    }
}
