//! Dioxus presentation layer.

pub mod app;
pub mod components;
pub mod state;

use dioxus::prelude::*;

use vellum_shared::RollEntry;

use crate::application::services::{GalleryService, RollService, SheetService, SpellService};
use crate::application::SpellCatalog;
use crate::infrastructure::Platform;

pub use app::app;

/// Service bundle injected into the component tree via context.
#[derive(Clone)]
pub struct Services {
    pub sheets: SheetService,
    pub rolls: RollService,
    pub spells: SpellService,
    pub gallery: GalleryService,
    pub catalog: SpellCatalog,
    pub platform: Platform,
    /// Base URL for the WebSocket feeds, e.g. `ws://localhost:8000`.
    pub ws_base: String,
}

impl Services {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sheets: SheetService,
        rolls: RollService,
        spells: SpellService,
        gallery: GalleryService,
        catalog: SpellCatalog,
        platform: Platform,
        ws_base: String,
    ) -> Self {
        Self {
            sheets,
            rolls,
            spells,
            gallery,
            catalog,
            platform,
            ws_base,
        }
    }
}

/// One rendered row of the roll history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub entry: RollEntry,
    /// New arrivals highlight briefly.
    pub highlight: bool,
}

/// Signals shared across the component tree.
#[derive(Clone, Copy)]
pub struct AppState {
    pub form: Signal<Option<vellum_domain::FormModel>>,
    pub session: Signal<crate::session::SheetSession>,
    pub gallery_session: Signal<crate::session::GallerySession>,
    pub sheet_list: Signal<Vec<vellum_shared::SheetSummary>>,
    pub history: Signal<Vec<HistoryRow>>,
    /// Blocking user-facing notification, the alert() stand-in.
    pub notice: Signal<Option<String>>,
    /// Bumped by art-feed events to refresh gallery lists.
    pub gallery_tick: Signal<u32>,
    /// Bumped by comment events for the currently open article.
    pub comment_tick: Signal<u32>,
}
