//! Outbound ports - object-safe boundaries implemented by adapters.
//!
//! Services depend on these traits behind `Arc<dyn ...>` so tests can
//! substitute fakes without any network or filesystem.

use serde_json::Value;
use thiserror::Error;

/// Errors crossing the HTTP boundary.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport failure (DNS, refused connection, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body was not the JSON we expected
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// A file picked by the user, ready to upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// One part of a multipart request body.
#[derive(Debug, Clone)]
pub enum UploadPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl UploadPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        UploadPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        UploadPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Object-safe HTTP boundary. Paths are relative to the configured base
/// URL; adapters attach the CSRF header on every mutating call.
#[async_trait::async_trait]
pub trait HttpPort: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str) -> Result<(), ApiError>;

    async fn post_multipart(&self, path: &str, parts: Vec<UploadPart>) -> Result<Value, ApiError>;

    async fn patch_multipart(&self, path: &str, parts: Vec<UploadPart>)
        -> Result<Value, ApiError>;
}

/// Persistent key-value storage (the desktop stand-in for localStorage).
pub trait StorageProvider: Send + Sync {
    fn save(&self, key: &str, value: &str);

    fn load(&self, key: &str) -> Option<String>;

    fn remove(&self, key: &str);
}

/// Random number generation abstraction
pub trait RandomProvider: Send + Sync {
    /// Generate a random i32 in `[min, max]` (inclusive)
    fn random_range(&self, min: i32, max: i32) -> i32;
}

/// Time operations abstraction
pub trait TimeProvider: Send + Sync {
    /// Current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// Storage key constants - the contract for what keys the client uses.
pub mod storage_keys {
    /// Versioned prefix for per-spell dice panel configuration.
    pub const SPELL_DICE_PREFIX: &str = "spell_dice_cfg_v2_";
    /// Pre-versioning prefix, still read for migration.
    pub const LEGACY_SPELL_DICE_PREFIX: &str = "spell_dice_cfg_";
    /// Last-active sheet tab.
    pub const ACTIVE_TAB: &str = "sheet_active_tab";
}
