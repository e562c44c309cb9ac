//! Dice roll log entries.

use serde::{Deserialize, Serialize};

/// One logged dice roll, as shared through `/api/rolls/` and the rolls
/// feed. `ts` is epoch milliseconds, stamped by whoever created the
/// entry first (client on optimistic renders, server otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollEntry {
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub spell: String,
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub breakdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_shape_decodes() {
        let entry: RollEntry = serde_json::from_str(
            r#"{"ts": 1719000000000, "character": "Mira", "spell": "", "expr": "3d6+2", "total": 14, "breakdown": "4 + 3 + 5 + 2"}"#,
        )
        .unwrap();
        assert_eq!(entry.total, 14);
        assert_eq!(entry.expr, "3d6+2");
    }

    #[test]
    fn test_sparse_entry_defaults() {
        let entry: RollEntry = serde_json::from_str(r#"{"total": 9}"#).unwrap();
        assert_eq!(entry.total, 9);
        assert!(entry.character.is_empty());
        assert!(entry.ts.is_none());
    }
}
