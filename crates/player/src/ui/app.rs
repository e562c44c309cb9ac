//! Application shell: toolbar, view switching, feed subscriptions.

use std::time::Duration;

use dioxus::prelude::*;
use tokio::sync::mpsc;

use vellum_shared::{decode_art_event, decode_roll_event, ArtEvent, ArtEventKind, RollEntry};

use crate::application::services::ROLL_HISTORY_LIMIT;
use crate::infrastructure::FeedClient;
use crate::ports::FileUpload;
use crate::session::{GallerySession, SheetSession};
use crate::ui::components::{DiceSidebar, GalleryView, SheetToolbar, SheetView};
use crate::ui::{AppState, HistoryRow, Services};

/// Which main surface is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Sheet,
    Gallery,
}

/// Prepend a roll to the shared history, newest first, enforcing the
/// cap. Highlighted rows fade after a second.
pub fn push_history(mut history: Signal<Vec<HistoryRow>>, entry: RollEntry, highlight: bool) {
    {
        let mut rows = history.write();
        rows.insert(0, HistoryRow { entry, highlight });
        rows.truncate(ROLL_HISTORY_LIMIT);
    }
    if highlight {
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            for row in history.write().iter_mut() {
                row.highlight = false;
            }
        });
    }
}

pub fn app() -> Element {
    let services = use_context::<Services>();

    let state = AppState {
        form: use_signal(|| None),
        session: use_signal(SheetSession::new),
        gallery_session: use_signal(GallerySession::new),
        sheet_list: use_signal(Vec::new),
        history: use_signal(Vec::new),
        notice: use_signal(|| None),
        gallery_tick: use_signal(|| 0),
        comment_tick: use_signal(|| 0),
    };
    use_context_provider(|| state);

    let avatar_upload: Signal<Option<FileUpload>> = use_signal(|| None);
    use_context_provider(|| avatar_upload);

    let mut view = use_signal(|| ActiveView::Sheet);

    // Initial data: sheet list and roll history.
    use_hook(|| {
        let services = services.clone();
        let mut sheet_list = state.sheet_list;
        let history = state.history;
        spawn(async move {
            if let Ok(sheets) = services.sheets.list().await {
                sheet_list.set(sheets);
            }
            for entry in services.rolls.history().await.into_iter().rev() {
                push_history(history, entry, false);
            }
        });
    });

    // Rolls feed: everyone's rolls land in the shared history.
    use_hook(|| {
        let url = format!("{}/ws/rolls", services.ws_base);
        let history = state.history;
        let (tx, mut rx) = mpsc::unbounded_channel::<RollEntry>();
        spawn(async move {
            while let Some(entry) = rx.recv().await {
                push_history(history, entry, true);
            }
        });
        spawn(async move {
            FeedClient::new(url)
                .run(move |frame| {
                    if let Some(entry) = decode_roll_event(&frame) {
                        let _ = tx.send(entry);
                    }
                })
                .await;
        });
    });

    // Art feed: refresh whichever gallery list the event touches.
    use_hook(|| {
        let url = format!("{}/ws/art", services.ws_base);
        let mut gallery_tick = state.gallery_tick;
        let mut comment_tick = state.comment_tick;
        let gallery_session = state.gallery_session;
        let (tx, mut rx) = mpsc::unbounded_channel::<ArtEvent>();
        spawn(async move {
            while let Some(event) = rx.recv().await {
                match event.kind {
                    ArtEventKind::LoreComment => {
                        let open = gallery_session.read().open_article;
                        if open.is_some() && event.article_id() == open {
                            comment_tick += 1;
                        }
                    }
                    _ => gallery_tick += 1,
                }
            }
        });
        spawn(async move {
            FeedClient::new(url)
                .run(move |frame| {
                    if let Some(event) = decode_art_event(&frame) {
                        let _ = tx.send(event);
                    }
                })
                .await;
        });
    });

    let notice = state.notice;
    let notice_banner = notice.read().clone().map(|message| {
        rsx! {
            div {
                class: "notice-banner",
                span { "{message}" }
                button {
                    onclick: {
                        let mut notice = notice;
                        move |_| notice.set(None)
                    },
                    "Dismiss"
                }
            }
        }
    });

    rsx! {
        div {
            class: "app-shell",
            header {
                class: "site-topbar",
                h1 { "Vellum" }
                nav {
                    class: "view-tabs",
                    button {
                        class: if *view.read() == ActiveView::Sheet { "tab-btn active" } else { "tab-btn" },
                        onclick: move |_| view.set(ActiveView::Sheet),
                        "Sheet"
                    }
                    button {
                        class: if *view.read() == ActiveView::Gallery { "tab-btn active" } else { "tab-btn" },
                        onclick: move |_| view.set(ActiveView::Gallery),
                        "Gallery"
                    }
                }
            }
            {notice_banner}
            match *view.read() {
                ActiveView::Sheet => rsx! {
                    div {
                        class: "sheet-layout",
                        main {
                            SheetToolbar {}
                            SheetView {}
                        }
                        aside {
                            class: "sidebar",
                            DiceSidebar {}
                        }
                    }
                },
                ActiveView::Gallery => rsx! {
                    GalleryView {}
                },
            }
        }
    }
}
