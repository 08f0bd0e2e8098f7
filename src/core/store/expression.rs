//! Scan filters and update expressions.
//!
//! These are the typed equivalents of a document store's filter and update
//! expressions: a scan filter is a conjunction of equality conditions and an
//! update expression is a list of `SET attribute = value` assignments.

use serde_json::Value;

use super::{PRIMARY_KEY, Record};

/// A single `attribute = value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub attribute: String,
    pub value: Value,
}

impl Condition {
    /// Check whether `record` satisfies this condition.
    ///
    /// A missing attribute never matches, not even a `null` value.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.attribute) == Some(&self.value)
    }
}

/// Conjunction of equality conditions. The empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFilter {
    conditions: Vec<Condition>,
}

impl ScanFilter {
    /// A filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an `attribute = value` condition.
    pub fn eq(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            attribute: attribute.into(),
            value: value.into(),
        });
        self
    }

    /// Check whether `record` satisfies every condition.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Ordered list of `SET` assignments applied to a single record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<(String, Value)>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `SET attribute = value` assignment.
    pub fn set(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push((attribute.into(), value.into()));
        self
    }

    /// Apply the assignments to `record` in order.
    ///
    /// Assignments to the key attribute are ignored; the key of a record is
    /// immutable.
    pub fn apply(&self, record: &mut Record) {
        for (attribute, value) in &self.assignments {
            if attribute == PRIMARY_KEY {
                continue;
            }
            record.insert(attribute.clone(), value.clone());
        }
    }

    /// Build the record an upsert creates when `key` does not exist yet.
    pub fn to_new_record(&self, key: &str) -> Record {
        let mut record = Record::new();
        record.insert(PRIMARY_KEY.to_string(), Value::String(key.to_string()));
        self.apply(&mut record);
        record
    }
}
