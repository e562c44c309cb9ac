//! Field records imported from the character-sheet backend.
//!
//! A sheet's `data.fields` is a flat list of named values produced by an
//! uncontrolled PDF-import pipeline. Names are only comparable after
//! whitespace normalization, values may be null, and duplicate names are
//! possible (last writer wins). Nothing here errors on malformed input;
//! the reconciliation rule throughout is "skip and continue".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One named value from the imported character-sheet schema.
///
/// The extra PDF-origin properties (`page`, `rect`, `label`,
/// `export_values`) are carried so the wire shape round-trips; the client
/// itself only reads `name`, `value` and `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub rect: Option<Vec<f64>>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub export_values: Option<Vec<String>>,
}

impl FieldRecord {
    /// A record as the client itself emits it on save.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            field_type: Some("Unknown".to_string()),
            page: None,
            rect: None,
            label: Some(String::new()),
            export_values: None,
        }
    }

    /// The value as a string, with null coalesced to empty.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is_checkbox(&self) -> bool {
        self.field_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
    }

    /// The string to show in a text widget for this record.
    ///
    /// Checkbox fields coerce their export value to a check mark so they
    /// survive being displayed in a plain input; everything else passes
    /// the raw value through. Persistence always uses the raw value.
    pub fn display_value(&self) -> String {
        if self.is_checkbox() {
            let v = self.value().to_ascii_lowercase();
            if v == "yes" || v == "on" || v == "true" {
                "\u{2714}".to_string()
            } else {
                String::new()
            }
        } else {
            self.value().to_string()
        }
    }
}

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lookup table from normalized field name to record.
///
/// Duplicate names resolve to the last record in iteration order.
#[derive(Debug, Default, Clone)]
pub struct FieldIndex {
    by_name: HashMap<String, FieldRecord>,
}

impl FieldIndex {
    pub fn build(fields: &[FieldRecord]) -> Self {
        let mut by_name = HashMap::new();
        for field in fields {
            let name = normalize_name(&field.name);
            if name.is_empty() {
                continue;
            }
            by_name.insert(name, field.clone());
        }
        Self { by_name }
    }

    /// Exact lookup on the normalized name, falling back to a
    /// case-insensitive scan (PDF exports disagree about casing).
    pub fn get(&self, name: &str) -> Option<&FieldRecord> {
        let wanted = normalize_name(name);
        if let Some(record) = self.by_name.get(&wanted) {
            return Some(record);
        }
        self.by_name
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&wanted))
            .map(|(_, record)| record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_collapses_whitespace() {
        assert_eq!(normalize_name("  Wpn   Name  2 "), "Wpn Name 2");
        assert_eq!(normalize_name("CharacterName"), "CharacterName");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_index_last_writer_wins() {
        let fields = vec![
            FieldRecord::new("AC", "12"),
            FieldRecord::new("AC ", "15"),
        ];
        let index = FieldIndex::build(&fields);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("AC").unwrap().value(), "15");
    }

    #[test]
    fn test_index_case_insensitive_fallback() {
        let index = FieldIndex::build(&[FieldRecord::new("HPMax", "42")]);
        assert_eq!(index.get("hpmax").unwrap().value(), "42");
        assert!(index.get("HPCurrent").is_none());
    }

    #[test]
    fn test_checkbox_display_coercion() {
        let mut field = FieldRecord::new("Inspiration", "Yes");
        field.field_type = Some("Checkbox".to_string());
        assert_eq!(field.display_value(), "\u{2714}");

        field.value = Some("Off".to_string());
        assert_eq!(field.display_value(), "");

        field.field_type = Some("Text".to_string());
        field.value = Some("Yes".to_string());
        assert_eq!(field.display_value(), "Yes");
    }

    #[test]
    fn test_null_value_tolerated() {
        let record: FieldRecord =
            serde_json::from_str(r#"{"name":"AC","value":null,"type":null}"#).unwrap();
        assert_eq!(record.value(), "");
    }

    #[test]
    fn test_wire_shape_round_trip() {
        let record = FieldRecord::new("Spells 101", "fire-bolt");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Unknown");
        assert!(json["page"].is_null());
        assert!(json["rect"].is_null());
        let back: FieldRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
