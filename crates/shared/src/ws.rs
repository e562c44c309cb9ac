//! Tolerant decoding of the WebSocket feed envelopes.
//!
//! The rolls feed has spoken several dialects over time:
//!
//! - `{ "type": "roll", "item": {...} }`
//! - `{ "type": "roll.created", "item": {...} }`
//! - `{ "event": "roll", "item": {...} }`
//! - `{ "kind": "roll", "item": {...} }`
//! - `{ "data": { "item": {...} } }`
//! - a bare `{ "item": {...} }` whose item carries a `total`
//!
//! All are accepted; anything else is skipped. The art feed uses a
//! single `{type, item}` envelope with one legacy alias.

use serde_json::Value;

use crate::roll::RollEntry;

/// Decode one rolls-feed frame into a roll entry, if it is one.
pub fn decode_roll_event(text: &str) -> Option<RollEntry> {
    let msg: Value = serde_json::from_str(text).ok()?;

    let item = msg
        .get("item")
        .or_else(|| msg.get("data").and_then(|d| d.get("item")))?
        .clone();

    let marker = |key: &str| msg.get(key).and_then(Value::as_str);
    let is_roll_type = matches!(marker("type"), Some("roll") | Some("roll.created"))
        || marker("event") == Some("roll")
        || marker("kind") == Some("roll");

    if !is_roll_type && item.get("total").map_or(true, Value::is_null) {
        return None;
    }
    serde_json::from_value(item).ok()
}

/// What an art-feed event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtEventKind {
    Media,
    Article,
    LoreComment,
    LoreFolder,
    MediaFolder,
}

/// One decoded art-feed event. The item payload is kept raw; handlers
/// only ever need the comment's article id out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtEvent {
    pub kind: ArtEventKind,
    pub item: Value,
}

impl ArtEvent {
    /// Article id carried by a comment event.
    pub fn article_id(&self) -> Option<i64> {
        self.item.get("article_id").and_then(Value::as_i64)
    }
}

/// Decode one art-feed frame. Unknown types are skipped.
pub fn decode_art_event(text: &str) -> Option<ArtEvent> {
    let msg: Value = serde_json::from_str(text).ok()?;
    let kind = match msg.get("type").and_then(Value::as_str)? {
        "media" => ArtEventKind::Media,
        // "lore_topic" is the pre-rename alias for article events
        "article" | "lore_topic" => ArtEventKind::Article,
        "lore_comment" => ArtEventKind::LoreComment,
        "lore_folder" => ArtEventKind::LoreFolder,
        "media_folder" => ArtEventKind::MediaFolder,
        _ => return None,
    };
    Some(ArtEvent {
        kind,
        item: msg.get("item").cloned().unwrap_or(Value::Null),
    })
}
