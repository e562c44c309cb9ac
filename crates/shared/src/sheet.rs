//! Sheet documents as the backend stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vellum_domain::FieldRecord;

/// The client-owned part of a sheet: the flat field list plus the
/// locally captured avatar image, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(rename = "avatarDataUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_data_url: Option<String>,
}

/// A persisted character sheet. Owned by the server; the client holds at
/// most one current sheet id at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDocument {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: SheetData,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One row of the sheet-picker list. Entries without an id are files the
/// server found on disk but has no database record for; they cannot be
/// opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for sheet create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data: SheetData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_data_camel_case_avatar_key() {
        let data = SheetData {
            fields: vec![FieldRecord::new("AC", "15")],
            avatar_data_url: Some("data:image/png;base64,AAAA".to_string()),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("avatarDataUrl").is_some());

        let back: SheetData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_document_tolerates_missing_metadata() {
        let doc: SheetDocument =
            serde_json::from_str(r#"{"id": 7, "name": "Mira", "data": {"fields": []}}"#).unwrap();
        assert_eq!(doc.id, 7);
        assert!(doc.created_at.is_none());
        assert!(doc.avatar_url.is_none());
    }

    #[test]
    fn test_summary_without_id() {
        let summary: SheetSummary =
            serde_json::from_str(r#"{"name": "orphan.pdf"}"#).unwrap();
        assert!(summary.id.is_none());
    }

    #[test]
    fn test_save_payload_omits_absent_name() {
        let payload = SavePayload {
            name: None,
            data: SheetData::default(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("name").is_none());
        assert!(json.get("data").is_some());
    }
}
