//! JSON encoding of the whole to-do collection.

use crate::error::{TodoError, TodoResult};
use crate::item::TodoItem;

/// Encode the collection as a JSON array of records, in storage order.
pub fn encode(items: &[TodoItem]) -> TodoResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a persisted payload.
///
/// An empty payload is an empty collection. A bad `dueDate` only clears that
/// item's due date; anything else that does not decode is fatal.
pub fn decode(payload: &str) -> TodoResult<Vec<TodoItem>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(payload).map_err(|e| TodoError::corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::list::TodoList;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_round_trip() {
        let mut list = TodoList::new();
        let a = list.add("a", Some(Utc.timestamp_millis_opt(42_000).unwrap())).unwrap();
        list.add("b", None).unwrap();
        list.toggle(&a.id);

        let payload = encode(list.items()).unwrap();
        let decoded = decode(&payload).unwrap();

        assert_eq!(decoded, list.items());
    }

    #[test]
    fn test_empty_payload() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("  \n").unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_bad_due_date_keeps_record() {
        let payload = r#"[
            {"id":"1","text":"a","dueDate":"soon","isCompleted":false,"timestamp":1000},
            {"id":"2","text":"b","dueDate":5000,"isCompleted":true,"timestamp":2000}
        ]"#;

        let items = decode(payload).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].due_date, None);
        assert_eq!(items[1].due_date.unwrap().timestamp_millis(), 5000);
        assert!(items[1].is_completed);
    }

    #[test]
    fn test_malformed_container_is_fatal() {
        assert!(matches!(decode("{not json"), Err(TodoError::Corrupt(_))));
        assert!(matches!(decode(r#"{"id":"1"}"#), Err(TodoError::Corrupt(_))));
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let payload = r#"[{"id":"1","dueDate":null,"isCompleted":false,"timestamp":1000}]"#;
        assert!(matches!(decode(payload), Err(TodoError::Corrupt(_))));
    }
}
