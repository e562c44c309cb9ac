//! Vellum Player - desktop client for the character-sheet service.
//!
//! Layering follows the usual ports-and-adapters split:
//!
//! - [`ports`] defines the outbound boundaries (HTTP, storage, RNG,
//!   time) so services and UI stay testable.
//! - [`infrastructure`] holds the reqwest/tungstenite/file adapters.
//! - [`application`] holds services and the spell-catalog cache.
//! - [`ui`] is the Dioxus presentation layer.
//! - [`session`] carries the explicit per-surface context objects
//!   (current sheet id, current folder ids).

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod session;
pub mod ui;
