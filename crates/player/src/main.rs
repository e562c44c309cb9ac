//! Vellum Player - composition root binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vellum_player::application::services::{
    GalleryService, RollService, SheetService, SpellService,
};
use vellum_player::application::SpellCatalog;
use vellum_player::infrastructure::{HttpClient, Platform};
use vellum_player::ports::HttpPort;
use vellum_player::ui::Services;

const PLAYER_CSS: &str = include_str!("../assets/player.css");

/// Derive the feed base from the HTTP base when no explicit WS URL is
/// configured: http -> ws, https -> wss.
fn ws_base_from_http(base_url: &str) -> String {
    if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base_url.to_string()
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vellum_player=debug,dioxus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vellum Player");

    let base_url =
        std::env::var("VELLUM_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let ws_base =
        std::env::var("VELLUM_WS_URL").unwrap_or_else(|_| ws_base_from_http(&base_url));

    let platform = Platform::desktop();

    let api: Arc<dyn HttpPort> = match HttpClient::new(&base_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("invalid base url {base_url}: {e}");
            std::process::exit(1);
        }
    };

    let services = Services::new(
        SheetService::new(api.clone()),
        RollService::new(api.clone(), platform.random.clone(), platform.time.clone()),
        SpellService::new(api.clone()),
        GalleryService::new(api.clone()),
        SpellCatalog::new(api.clone()),
        platform,
        ws_base,
    );

    let head = format!("<style>{PLAYER_CSS}</style>");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus_desktop::Config::new().with_custom_head(head))
        .with_context(services)
        .launch(vellum_player::ui::app);
}
