use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::workspace::WorkspaceError;

/// One data row keyed by the header row above it. Keys keep header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. A repeated key keeps its first position and
    /// takes the latest value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or an error when the column is absent or blank.
    pub fn require(&self, key: &str) -> Result<&str, WorkspaceError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(WorkspaceError::MissingField(key.to_string())),
        }
    }

    /// Value for `key`, or an empty string when absent.
    pub fn get_or_blank(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Turns a header row plus data rows into records. Each record carries every
/// header key; cells missing from a short row read as blank.
pub fn records_from_table(header: &[String], rows: &[Vec<String>]) -> Vec<Record> {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .fold(Record::new(), |mut record, (index, key)| {
                    let value = row.get(index).cloned().unwrap_or_default();
                    record.insert(key.clone(), value);
                    record
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_records_follow_header_positions() {
        let header = strings(&["File ID", "Student Email", "Instructor Email"]);
        let rows = vec![
            strings(&["F1", "s1@x.com", "i1@x.com"]),
            strings(&["F2", "s2@x.com", "i2@x.com"]),
        ];

        let records = records_from_table(&header, &rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("File ID"), Some("F2"));
        assert_eq!(records[1].get("Student Email"), Some("s2@x.com"));
        for record in &records {
            assert_eq!(record.iter().map(|(k, _)| k).collect::<Vec<_>>(), header);
        }
    }

    #[test]
    fn test_short_rows_are_padded_with_blanks() {
        let header = strings(&["File ID", "Student Email", "Instructor Email"]);
        let rows = vec![strings(&["F1"])];

        let records = records_from_table(&header, &rows);

        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0].get("Instructor Email"), Some(""));
        assert!(matches!(
            records[0].require("Instructor Email"),
            Err(WorkspaceError::MissingField(key)) if key == "Instructor Email"
        ));
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let header = strings(&["A"]);
        let rows = vec![strings(&["1", "2", "3"])];
        let records = records_from_table(&header, &rows);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), vec![("A", "1")]);
    }

    #[test]
    fn test_repeated_header_keeps_last_value() {
        let header = strings(&["Name", "Name"]);
        let rows = vec![strings(&["first", "second"])];
        let records = records_from_table(&header, &rows);
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[0].get("Name"), Some("second"));
    }

    #[test]
    fn test_record_serializes_as_ordered_object() {
        let mut record = Record::new();
        record.insert("b", "2");
        record.insert("a", "1");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
    }

    #[test]
    fn test_missing_key_lookups() {
        let record = Record::new();
        assert_eq!(record.get("File ID"), None);
        assert_eq!(record.get_or_blank("File ID"), "");
        assert!(record.require("File ID").is_err());
    }
}
