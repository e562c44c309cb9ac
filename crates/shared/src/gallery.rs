//! Lore and media gallery records.

use serde::{Deserialize, Serialize};

/// A lore or media folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

/// A lore article. `ts` is epoch milliseconds; `gallery` holds the
/// illustration URLs attached to the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoreArticle {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub folder_id: Option<i64>,
}

impl LoreArticle {
    /// Card excerpt: the stored one, else the content truncated.
    pub fn card_excerpt(&self) -> String {
        if !self.excerpt.is_empty() {
            return self.excerpt.clone();
        }
        if self.content.is_empty() {
            return String::new();
        }
        let truncated: String = self.content.chars().take(140).collect();
        if self.content.chars().count() > 140 {
            format!("{truncated}\u{2026}")
        } else {
            truncated
        }
    }
}

/// A comment under a lore article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoreComment {
    pub id: i64,
    #[serde(default)]
    pub article_id: Option<i64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ts: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    #[serde(other)]
    Unknown,
}

/// One uploaded media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub kind: MediaKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub folder_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_lowercase() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id": 1, "kind": "audio", "url": "/media/theme.mp3"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, MediaKind::Audio);
    }

    #[test]
    fn test_unknown_media_kind_tolerated() {
        let item: MediaItem =
            serde_json::from_str(r#"{"id": 2, "kind": "hologram", "url": "/x"}"#).unwrap();
        assert_eq!(item.kind, MediaKind::Unknown);
    }

    #[test]
    fn test_card_excerpt_prefers_stored() {
        let mut article: LoreArticle =
            serde_json::from_str(r#"{"id": 1, "title": "T", "content": "body"}"#).unwrap();
        assert_eq!(article.card_excerpt(), "body");
        article.excerpt = "short".to_string();
        assert_eq!(article.card_excerpt(), "short");
    }

    #[test]
    fn test_card_excerpt_truncates_long_content() {
        let article = LoreArticle {
            id: 1,
            title: String::new(),
            excerpt: String::new(),
            content: "x".repeat(200),
            author: None,
            ts: None,
            cover_url: None,
            gallery: Vec::new(),
            folder_id: None,
        };
        let excerpt = article.card_excerpt();
        assert_eq!(excerpt.chars().count(), 141);
        assert!(excerpt.ends_with('\u{2026}'));
    }
}
