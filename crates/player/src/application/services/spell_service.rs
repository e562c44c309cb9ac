//! Spell Service - on-demand spell detail.
//!
//! The UI keys each detail request with a fresh id and discards any
//! response whose id no longer matches the open panel (see
//! `ui::state`); this service only performs the fetch.

use std::fmt::Write as _;
use std::sync::Arc;

use vellum_shared::SpellDetail;

use crate::application::error::{parse_value, ServiceError};
use crate::ports::HttpPort;

#[derive(Clone)]
pub struct SpellService {
    api: Arc<dyn HttpPort>,
}

impl SpellService {
    pub fn new(api: Arc<dyn HttpPort>) -> Self {
        Self { api }
    }

    pub async fn detail(&self, slug: &str) -> Result<SpellDetail, ServiceError> {
        let path = format!("/api/spells/{}/", encode_slug(slug));
        parse_value(self.api.get_json(&path).await?)
    }
}

/// Percent-encode a slug for use as a path segment. Everything outside
/// the RFC 3986 unreserved set is escaped.
fn encode_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    for byte in slug.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use crate::ports::{ApiError, UploadPart};

    #[test]
    fn test_encode_slug_passthrough() {
        assert_eq!(encode_slug("fire-bolt"), "fire-bolt");
    }

    #[test]
    fn test_encode_slug_escapes() {
        assert_eq!(encode_slug("acid arrow"), "acid%20arrow");
        assert_eq!(encode_slug("a/b"), "a%2Fb");
    }

    struct FakeApi {
        paths: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl HttpPort for FakeApi {
        async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
            self.paths.lock().unwrap().push(path.to_string());
            Ok(json!({"slug": "fire-bolt", "name": "Fire Bolt", "html": "<p>1d10</p>"}))
        }

        async fn post_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!()
        }

        async fn patch_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!()
        }

        async fn delete(&self, _: &str) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn post_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!()
        }

        async fn patch_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_detail_path_and_parse() {
        let api = Arc::new(FakeApi {
            paths: Mutex::new(Vec::new()),
        });
        let service = SpellService::new(api.clone());
        let detail = service.detail("fire bolt").await.unwrap();
        assert_eq!(detail.html, "<p>1d10</p>");
        assert_eq!(
            api.paths.lock().unwrap().as_slice(),
            ["/api/spells/fire%20bolt/"]
        );
    }
}
