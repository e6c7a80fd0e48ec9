//! To-do item type and its persisted record shape.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// Serializes to the persisted record shape
/// `{id, text, dueDate, isCompleted, timestamp}` with instants as epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    #[serde(default, with = "lenient_millis")]
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    /// Creation time; only used to break ordering ties.
    #[serde(with = "coerced_millis")]
    pub timestamp: DateTime<Utc>,
}

impl TodoItem {
    /// Build a new incomplete item. `text` must already be validated.
    pub(crate) fn new(text: String, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            due_date: due_date.map(to_millis),
            is_completed: false,
            timestamp: to_millis(now),
        }
    }

    /// Past due and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Drop sub-millisecond precision so values survive a persist/load cycle.
pub(crate) fn to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Trimmed text, or `None` when blank.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Epoch milliseconds from a JSON number or numeric string.
fn coerce_millis(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    use serde_json::Value;

    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    millis.and_then(DateTime::from_timestamp_millis)
}

/// Required epoch-millisecond field. Floats and numeric strings are
/// accepted; anything else fails the record.
mod coerced_millis {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::coerce_millis(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {value}")))
    }
}

/// Optional epoch-millisecond field that never fails the surrounding record.
///
/// Anything that is not a usable number becomes `None`.
mod lenient_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serializer.serialize_some(&instant.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        let parsed = super::coerce_millis(&value);
        if parsed.is_none() {
            tracing::warn!("Ignoring unreadable due date: {}", value);
        }
        Ok(parsed)
    }
}
