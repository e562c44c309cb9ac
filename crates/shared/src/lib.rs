//! Vellum Shared - types for talking to the character-sheet backend.
//!
//! Everything the REST API and the two WebSocket feeds exchange lives
//! here. The backend's payload shapes drifted across deployments (bare
//! arrays vs `{items}` vs `{results}` wrappers, several roll-event
//! envelopes), so decoding is deliberately tolerant: unknown shapes are
//! skipped, never an error.

pub mod gallery;
pub mod payload;
pub mod roll;
pub mod sheet;
pub mod spell;
pub mod ws;

pub use gallery::{Folder, LoreArticle, LoreComment, MediaItem, MediaKind};
pub use payload::unwrap_list;
pub use roll::RollEntry;
pub use sheet::{SavePayload, SheetData, SheetDocument, SheetSummary};
pub use spell::{SpellDetail, SpellSummary};
pub use ws::{decode_art_event, decode_roll_event, ArtEvent, ArtEventKind};
