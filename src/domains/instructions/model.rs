//! Instruction record shape, defaults and value rules.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::store::Record;

/// Attribute names of a stored instruction record.
pub mod fields {
    pub const ID: &str = "id";
    pub const USER_ID: &str = "user_id";
    pub const CONTENT: &str = "content";
    pub const CATEGORY: &str = "category";
    pub const PRIORITY: &str = "priority";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// Instruction priority, always within `1..=5`.
///
/// Out-of-range values are not rejected: they are coerced to the default
/// priority (3), never clamped to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;
    pub const DEFAULT: Priority = Priority(3);

    /// Build a priority, replacing any value outside `1..=5` with the default.
    pub fn coerce(value: i64) -> Self {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Self(value as u8)
        } else {
            Self::DEFAULT
        }
    }

    /// Whether `value` is a priority that needs no coercion.
    pub fn is_valid(value: i64) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::coerce(value)
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        i64::from(priority.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RFC 3339 timestamps with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Timestamp for an update that happens at `now` to a record last updated at
/// `previous`.
///
/// The result is always strictly later than `previous`, even when the clock
/// has not advanced past it at millisecond precision.
pub fn next_update_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// A stored instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub id: String,
    pub user_id: String,
    pub content: String,
    /// Absent means uncategorized; absent is never written to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Instruction {
    /// Build a fresh instruction with a new id and both timestamps set to now.
    pub fn new(
        user_id: impl Into<String>,
        content: impl Into<String>,
        category: Option<String>,
        priority: Option<i64>,
    ) -> Self {
        let created_at = now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            content: content.into(),
            category,
            priority: priority.map(Priority::coerce).unwrap_or_default(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Encode as a store record.
    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(record) => Ok(record),
            other => Err(serde::ser::Error::custom(format!(
                "instruction encoded as {other}, expected an object"
            ))),
        }
    }

    /// Decode from a store record.
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(record))
    }
}

/// Input of the add operation.
#[derive(Debug, Clone, Default)]
pub struct NewInstruction {
    pub user_id: String,
    pub content: String,
    pub category: Option<String>,
    /// Requested priority; `None` means the default.
    pub priority: Option<i64>,
}

impl NewInstruction {
    pub fn new(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Partial update: only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionPatch {
    pub content: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i64>,
}

/// Result of listing an owner's instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionList {
    pub instructions: Vec<Instruction>,
    pub count: usize,
}

impl From<Vec<Instruction>> for InstructionList {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self {
            count: instructions.len(),
            instructions,
        }
    }
}

/// Confirmation returned by the delete operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteConfirmation {
    pub instruction_id: String,
    pub message: String,
}

impl DeleteConfirmation {
    pub fn new(instruction_id: impl Into<String>) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            message: "Instruction deleted successfully".to_string(),
        }
    }
}

/// Sort by descending priority. Equal priorities keep their input order.
pub fn sort_by_priority(instructions: &mut [Instruction]) {
    instructions.sort_by(|a, b| b.priority.cmp(&a.priority));
}
