//! Interaction history domain models.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name the insertion timestamp is stored under.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One past question/answer interaction.
///
/// The record itself is opaque (question, answer, references, whatever the UI
/// chose to keep); the store only adds the insertion timestamp, which is
/// serialized alongside the record's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 UTC timestamp, e.g. `2025-03-14T09:26:53.589Z`.
    #[serde(default)]
    pub timestamp: String,
    #[serde(flatten)]
    pub record: Map<String, Value>,
}

impl HistoryEntry {
    /// Stamps `record` with the current time.
    pub fn new(record: Map<String, Value>) -> Self {
        Self::stamped_at(record, Utc::now())
    }

    /// Stamps `record` with the given time. A `timestamp` key supplied by the
    /// caller is dropped in favour of the stamp.
    pub fn stamped_at(mut record: Map<String, Value>, at: DateTime<Utc>) -> Self {
        record.remove(TIMESTAMP_FIELD);
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            record,
        }
    }

    /// Parses the stored timestamp.
    pub fn stamped_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn question(&self) -> Option<&str> {
        self.get("question").and_then(Value::as_str)
    }

    pub fn answer(&self) -> Option<&str> {
        self.get("answer").and_then(Value::as_str)
    }

    /// An entry with neither a timestamp nor any fields.
    ///
    /// Older releases seeded a fresh history with one such placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.timestamp.is_empty() && self.record.is_empty()
    }
}

/// Newest-first sequence of history entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from a persisted JSON value.
    ///
    /// Anything that is not an array yields an empty history; elements that
    /// are not objects and legacy empty placeholders are dropped.
    pub fn from_json(value: &Value) -> Self {
        let Value::Array(items) = value else {
            tracing::warn!("[History] Persisted history is not an array, ignoring");
            return Self::new();
        };

        let entries = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item.clone()) {
                Ok(entry) if entry.is_placeholder() => None,
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("[History] Skipping malformed entry: {}", e);
                    None
                }
            })
            .collect();

        Self { entries }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .filter_map(|entry| serde_json::to_value(entry).ok())
                .collect(),
        )
    }

    /// Inserts at the front; the newest entry is always at index 0.
    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    /// Removes the entry at `index`. Out-of-range indices remove nothing.
    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(question: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("question".to_string(), json!(question));
        map
    }

    #[test]
    fn test_stamped_at_formats_iso_millis() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let entry = HistoryEntry::stamped_at(record("q"), at);
        assert_eq!(entry.timestamp, "2025-03-14T09:26:53.000Z");
        assert_eq!(entry.stamped_time(), Some(at));
    }

    #[test]
    fn test_caller_timestamp_is_replaced() {
        let mut input = record("q");
        input.insert(TIMESTAMP_FIELD.to_string(), json!("1999-01-01"));

        let entry = HistoryEntry::new(input);

        assert_ne!(entry.timestamp, "1999-01-01");
        assert!(!entry.record.contains_key(TIMESTAMP_FIELD));
    }

    #[test]
    fn test_entry_serializes_flat() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let entry = HistoryEntry::stamped_at(record("What is CRISPR?"), at);

        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({"timestamp": "2025-01-02T03:04:05.000Z", "question": "What is CRISPR?"})
        );
    }

    #[test]
    fn test_prepend_and_remove() {
        let mut history = History::new();
        history.prepend(HistoryEntry::new(record("x")));
        history.prepend(HistoryEntry::new(record("y")));

        assert_eq!(history.get(0).and_then(HistoryEntry::question), Some("y"));
        assert!(history.remove(5).is_none());
        assert_eq!(history.len(), 2);

        let removed = history.remove(0).unwrap();
        assert_eq!(removed.question(), Some("y"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_from_json_drops_placeholder_and_garbage() {
        let history = History::from_json(&json!([
            {},
            {"timestamp": "2025-01-01T00:00:00.000Z", "question": "kept"},
            42
        ]));

        assert_eq!(history.len(), 1);
        assert_eq!(history.get(0).and_then(HistoryEntry::question), Some("kept"));
    }

    #[test]
    fn test_from_json_non_array_is_empty() {
        assert!(History::from_json(&json!({"question": "x"})).is_empty());
    }
}
