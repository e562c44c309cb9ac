//! Infrastructure adapters: reqwest HTTP client, tungstenite feed
//! client, file-backed storage, and the desktop platform providers.

pub mod http;
pub mod platform;
pub mod storage;
pub mod ws;

pub use http::HttpClient;
pub use platform::Platform;
pub use storage::FileStorage;
pub use ws::FeedClient;
