//! Reqwest adapter for the HTTP boundary.
//!
//! One client per process with a shared cookie store: the backend sets
//! the `csrftoken` cookie on the first GET, and every mutating request
//! echoes it back as `X-CSRFToken`.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::ports::{ApiError, HttpPort, UploadPart};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Default request timeout in milliseconds (2 minutes)
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

/// Get the request timeout from environment variable or use default
fn request_timeout_ms() -> u64 {
    std::env::var("VELLUM_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
}

pub struct HttpClient {
    base: Url,
    client: Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(std::time::Duration::from_millis(request_timeout_ms()))
            .build()?;
        Ok(Self { base, client, jar })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Network(format!("bad url {path}: {e}")))
    }

    /// The CSRF token the server set for this session, if any.
    fn csrf_token(&self) -> Option<String> {
        let cookies = self.jar.cookies(&self.base)?;
        parse_csrf_cookie(cookies.to_str().ok()?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.client.request(method.clone(), url);
        if method != Method::GET {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }
        builder
    }

    async fn execute_json(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn multipart_form(parts: Vec<UploadPart>) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                UploadPart::Text { name, value } => form.text(name, value),
                UploadPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    let part = match part.mime_str(&mime) {
                        Ok(part) => part,
                        Err(e) => {
                            tracing::warn!("bad mime type {mime}: {e}");
                            reqwest::multipart::Part::bytes(Vec::new())
                        }
                    };
                    form.part(name, part)
                }
            };
        }
        form
    }
}

/// Pick the csrf token out of a `Cookie` header value.
fn parse_csrf_cookie(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == CSRF_COOKIE).then(|| value.to_string())
    })
}

#[async_trait::async_trait]
impl HttpPort for HttpClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.execute_json(self.request(Method::GET, url)).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.execute_json(self.request(Method::POST, url).json(body))
            .await
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.execute_json(self.request(Method::PATCH, url).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn post_multipart(&self, path: &str, parts: Vec<UploadPart>) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let form = Self::multipart_form(parts);
        self.execute_json(self.request(Method::POST, url).multipart(form))
            .await
    }

    async fn patch_multipart(
        &self,
        path: &str,
        parts: Vec<UploadPart>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let form = Self::multipart_form(parts);
        self.execute_json(self.request(Method::PATCH, url).multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = HttpClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("/api/sheets/7/").unwrap().as_str(),
            "http://localhost:8000/api/sheets/7/"
        );
    }

    #[test]
    fn test_endpoint_keeps_query() {
        let client = HttpClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("/api/rolls/?limit=5").unwrap().as_str(),
            "http://localhost:8000/api/rolls/?limit=5"
        );
    }

    #[test]
    fn test_parse_csrf_cookie() {
        assert_eq!(
            parse_csrf_cookie("sessionid=abc; csrftoken=tok123"),
            Some("tok123".to_string())
        );
        assert_eq!(parse_csrf_cookie("sessionid=abc"), None);
        assert_eq!(parse_csrf_cookie(""), None);
    }
}
