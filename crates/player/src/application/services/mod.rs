//! Application services, one per backend surface.

pub mod gallery_service;
pub mod roll_service;
pub mod sheet_service;
pub mod spell_service;

pub use gallery_service::{ArticleDraft, GalleryService, MediaDraft};
pub use roll_service::{RollService, ROLL_HISTORY_LIMIT};
pub use sheet_service::SheetService;
pub use spell_service::SpellService;
