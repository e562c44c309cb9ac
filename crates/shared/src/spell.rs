//! Spell catalog entries.

use serde::{Deserialize, Serialize};

/// One entry of the spell catalog list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellSummary {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<i32>,
}

/// Spell detail; `html` is pre-rendered by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDetail {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub html: String,
}
