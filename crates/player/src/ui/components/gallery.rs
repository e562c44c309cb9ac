//! Lore and media galleries: folders, articles with comments, uploads.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use vellum_shared::{Folder, LoreArticle, LoreComment, MediaItem, MediaKind};

use crate::application::services::{ArticleDraft, MediaDraft};
use crate::ports::FileUpload;
use crate::ui::components::sheet_form::mime_for_image;
use crate::ui::{AppState, Services};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GalleryPane {
    Lore,
    Media,
}

fn format_ts(ts: Option<i64>) -> String {
    ts.and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn guess_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

async fn read_upload(file: dioxus::html::FileData) -> Option<FileUpload> {
    let name = file.name();
    match file.read_bytes().await {
        Ok(bytes) => Some(FileUpload {
            mime: guess_mime(&name).to_string(),
            file_name: name,
            bytes: bytes.to_vec(),
        }),
        Err(e) => {
            tracing::warn!("reading upload failed: {e}");
            None
        }
    }
}

#[component]
pub fn GalleryView() -> Element {
    let mut pane = use_signal(|| GalleryPane::Lore);

    rsx! {
        div {
            class: "gallery-view",
            nav {
                class: "view-tabs",
                button {
                    class: if *pane.read() == GalleryPane::Lore { "tab-btn active" } else { "tab-btn" },
                    onclick: move |_| pane.set(GalleryPane::Lore),
                    "Lore"
                }
                button {
                    class: if *pane.read() == GalleryPane::Media { "tab-btn active" } else { "tab-btn" },
                    onclick: move |_| pane.set(GalleryPane::Media),
                    "Media"
                }
            }
            match *pane.read() {
                GalleryPane::Lore => rsx! { LorePane {} },
                GalleryPane::Media => rsx! { MediaPane {} },
            }
        }
    }
}

#[component]
fn LorePane() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut folders = use_signal(Vec::<Folder>::new);
    let mut articles = use_signal(Vec::<LoreArticle>::new);
    let mut open_article = use_signal(|| None::<LoreArticle>);
    let mut comments = use_signal(Vec::<LoreComment>::new);
    let mut folder_title = use_signal(String::new);
    let mut comment_text = use_signal(String::new);

    // Reload lists on mount, on folder change, and on art-feed events.
    use_effect({
        let services = services.clone();
        move || {
            let _ = state.gallery_tick.read();
            let session = *state.gallery_session.read();
            let services = services.clone();
            spawn(async move {
                if let Ok(list) = services.gallery.lore_folders().await {
                    folders.set(list);
                }
                if let Ok(list) = services.gallery.articles(&session).await {
                    articles.set(list);
                }
            });
        }
    });

    // Comments follow the open article and its feed events.
    use_effect({
        let services = services.clone();
        move || {
            let _ = state.comment_tick.read();
            let open = state.gallery_session.read().open_article;
            let services = services.clone();
            spawn(async move {
                match open {
                    Some(id) => {
                        if let Ok(list) = services.gallery.comments(id).await {
                            comments.set(list);
                        }
                    }
                    None => comments.set(Vec::new()),
                }
            });
        }
    });

    let on_create_folder = {
        let services = services.clone();
        move |_| {
            let title = folder_title.read().trim().to_string();
            if title.is_empty() {
                let mut notice = state.notice;
                notice.set(Some("Enter a folder name".to_string()));
                return;
            }
            let services = services.clone();
            spawn(async move {
                match services.gallery.create_lore_folder(&title).await {
                    Ok(()) => {
                        folder_title.set(String::new());
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Creating the folder")));
                    }
                }
            });
        }
    };

    let on_open = {
        let services = services.clone();
        move |id: i64| {
            let services = services.clone();
            spawn(async move {
                match services.gallery.article(id).await {
                    Ok(article) => {
                        let mut session = state.gallery_session;
                        session.write().open_article = Some(article.id);
                        open_article.set(Some(article));
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Opening the article")));
                    }
                }
            });
        }
    };

    let on_delete_article = {
        let services = services.clone();
        move |id: i64| {
            let services = services.clone();
            spawn(async move {
                match services.gallery.delete_article(id).await {
                    Ok(()) => {
                        let mut session = state.gallery_session;
                        if session.read().open_article == Some(id) {
                            session.write().open_article = None;
                            open_article.set(None);
                        }
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Deleting the article")));
                    }
                }
            });
        }
    };

    let on_delete_folder = {
        let services = services.clone();
        move |id: i64| {
            let services = services.clone();
            spawn(async move {
                match services.gallery.delete_lore_folder(id).await {
                    Ok(()) => {
                        let mut session = state.gallery_session;
                        if session.read().lore_folder == Some(id) {
                            session.write().lore_folder = None;
                        }
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Deleting the folder")));
                    }
                }
            });
        }
    };

    let on_comment = {
        let services = services.clone();
        move |_| {
            let Some(article_id) = state.gallery_session.read().open_article else {
                return;
            };
            let content = comment_text.read().trim().to_string();
            if content.is_empty() {
                return;
            }
            let services = services.clone();
            let mut comment_tick = state.comment_tick;
            spawn(async move {
                match services.gallery.add_comment(article_id, &content).await {
                    Ok(()) => {
                        comment_text.set(String::new());
                        comment_tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Posting the comment")));
                    }
                }
            });
        }
    };

    let current_folder = state.gallery_session.read().lore_folder;

    let main_panel = match open_article.read().clone() {
        Some(article) => rsx! {
            ArticleView {
                article,
                comments: comments.read().clone(),
                comment_text,
                on_back: {
                    move |_| {
                        let mut session = state.gallery_session;
                        session.write().open_article = None;
                        open_article.set(None);
                    }
                },
                on_delete: on_delete_article.clone(),
                on_comment,
            }
        },
        None => rsx! {
            div {
                class: "articles",
                PublishArticleForm { folders: folders.read().clone() }
                {articles.read().iter().cloned().map(|article| {
                    let on_open = on_open.clone();
                    let on_delete_article = on_delete_article.clone();
                    let id = article.id;
                    let author = article.author.clone().unwrap_or_else(|| "anon".to_string());
                    let when = format_ts(article.ts);
                    let excerpt = article.card_excerpt();
                    let cover = article.cover_url.clone();
                    rsx! {
                        article {
                            key: "{id}",
                            class: "article-card",
                            {cover.map(|cover| rsx! {
                                img { class: "article-cover", src: "{cover}" }
                            })}
                            div {
                                class: "article-body",
                                h3 { class: "article-title", "{article.title}" }
                                div { class: "article-meta", "{author} \u{2022} {when}" }
                                p { class: "article-excerpt", "{excerpt}" }
                                div {
                                    class: "article-actions",
                                    button { class: "btn", onclick: move |_| on_open(id), "Read" }
                                    button {
                                        class: "btn danger",
                                        onclick: move |_| on_delete_article(id),
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                })}
            }
        },
    };

    rsx! {
        div {
            class: "lore-pane",
            aside {
                class: "folders",
                div {
                    class: if current_folder.is_none() { "folder-card active" } else { "folder-card" },
                    onclick: move |_| {
                        let mut session = state.gallery_session;
                        session.write().lore_folder = None;
                    },
                    "All articles"
                }
                {folders.read().iter().cloned().map(|folder| {
                    let on_delete_folder = on_delete_folder.clone();
                    let active = current_folder == Some(folder.id);
                    let id = folder.id;
                    rsx! {
                        div {
                            key: "{id}",
                            class: if active { "folder-card active" } else { "folder-card" },
                            onclick: move |_| {
                                let mut session = state.gallery_session;
                                session.write().lore_folder = Some(id);
                            },
                            span { "{folder.title}" }
                            button {
                                class: "btn danger",
                                title: "Delete folder",
                                onclick: move |evt| {
                                    evt.stop_propagation();
                                    on_delete_folder(id);
                                },
                                "\u{00d7}"
                            }
                        }
                    }
                })}
                div {
                    class: "folder-form",
                    input {
                        placeholder: "New folder",
                        value: "{folder_title.read()}",
                        oninput: move |evt| folder_title.set(evt.value()),
                    }
                    button { class: "btn", onclick: on_create_folder, "Create" }
                }
            }
            {main_panel}
        }
    }
}

#[component]
fn ArticleView(
    article: LoreArticle,
    comments: Vec<LoreComment>,
    comment_text: Signal<String>,
    on_back: EventHandler<()>,
    on_delete: EventHandler<i64>,
    on_comment: EventHandler<()>,
) -> Element {
    let author = article.author.clone().unwrap_or_else(|| "anon".to_string());
    let when = format_ts(article.ts);
    let id = article.id;
    let cover = article.cover_url.clone();
    let mut comment_text = comment_text;

    rsx! {
        div {
            class: "article-view",
            div {
                class: "article-actions",
                button { class: "btn", onclick: move |_| on_back.call(()), "Back to list" }
                button { class: "btn danger", onclick: move |_| on_delete.call(id), "Delete" }
            }
            {cover.map(|cover| rsx! {
                img { class: "article-cover", src: "{cover}" }
            })}
            h2 { "{article.title}" }
            div { class: "article-meta", "{author} \u{2022} {when}" }
            div {
                class: "article-content",
                {article.content.split("\n\n").map(|paragraph| rsx! {
                    p { "{paragraph.trim()}" }
                })}
            }
            div {
                class: "article-gallery",
                {article.gallery.iter().map(|url| rsx! {
                    img { key: "{url}", src: "{url}" }
                })}
            }
            h3 { "Comments" }
            div {
                class: "comment-list",
                if comments.is_empty() {
                    div { class: "muted", "No comments yet" }
                }
                {comments.iter().map(|comment| {
                    let author = comment.author.clone().unwrap_or_else(|| "anon".to_string());
                    let when = format_ts(comment.ts);
                    rsx! {
                        div {
                            key: "{comment.id}",
                            class: "comment-item",
                            div { class: "comment-meta", "{author} \u{2022} {when}" }
                            div { "{comment.content}" }
                        }
                    }
                })}
            }
            div {
                class: "comment-form",
                textarea {
                    placeholder: "Leave a comment",
                    value: "{comment_text.read()}",
                    oninput: move |evt| comment_text.set(evt.value()),
                }
                button { class: "btn primary", onclick: move |_| on_comment.call(()), "Send" }
            }
        }
    }
}

#[component]
fn PublishArticleForm(folders: Vec<Folder>) -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut title = use_signal(String::new);
    let mut content = use_signal(String::new);
    let mut folder_id = use_signal(|| None::<i64>);
    let mut cover = use_signal(|| None::<FileUpload>);
    let mut gallery = use_signal(Vec::<FileUpload>::new);

    let on_publish = {
        let services = services.clone();
        move |_| {
            let draft = ArticleDraft {
                title: title.read().trim().to_string(),
                content: content.read().clone(),
                folder_id: *folder_id.read(),
                cover: cover.read().clone(),
                gallery: gallery.read().clone(),
            };
            if draft.title.is_empty() {
                let mut notice = state.notice;
                notice.set(Some("Enter a title".to_string()));
                return;
            }
            let services = services.clone();
            spawn(async move {
                match services.gallery.publish_article(draft).await {
                    Ok(()) => {
                        title.set(String::new());
                        content.set(String::new());
                        cover.set(None);
                        gallery.set(Vec::new());
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Publishing the article")));
                    }
                }
            });
        }
    };

    rsx! {
        div {
            class: "card article-form",
            h3 { "Publish an article" }
            input {
                placeholder: "Title",
                value: "{title.read()}",
                oninput: move |evt| title.set(evt.value()),
            }
            textarea {
                placeholder: "Text",
                value: "{content.read()}",
                oninput: move |evt| content.set(evt.value()),
            }
            select {
                onchange: move |evt| folder_id.set(evt.value().parse().ok()),
                option { value: "", "No folder" }
                {folders.iter().map(|folder| rsx! {
                    option { key: "{folder.id}", value: "{folder.id}", "{folder.title}" }
                })}
            }
            label {
                class: "btn ghost",
                "Cover"
                input {
                    r#type: "file",
                    accept: "image/png,image/jpeg",
                    hidden: true,
                    onchange: move |evt: FormEvent| {
                        let Some(file) = evt.files().into_iter().next() else { return };
                        spawn(async move {
                            if mime_for_image(&file.name()).is_none() {
                                return;
                            }
                            if let Some(upload) = read_upload(file).await {
                                cover.set(Some(upload));
                            }
                        });
                    },
                }
            }
            label {
                class: "btn ghost",
                "Illustrations"
                input {
                    r#type: "file",
                    accept: "image/png,image/jpeg",
                    multiple: true,
                    hidden: true,
                    onchange: move |evt: FormEvent| {
                        let files = evt.files();
                        spawn(async move {
                            let mut uploads = Vec::new();
                            for file in files {
                                if let Some(upload) = read_upload(file).await {
                                    uploads.push(upload);
                                }
                            }
                            gallery.set(uploads);
                        });
                    },
                }
            }
            button { class: "btn primary", onclick: on_publish, "Publish" }
        }
    }
}

#[component]
fn MediaPane() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut folders = use_signal(Vec::<Folder>::new);
    let mut items = use_signal(Vec::<MediaItem>::new);
    let mut kind_filter = use_signal(String::new);
    let mut folder_title = use_signal(String::new);

    use_effect({
        let services = services.clone();
        move || {
            let _ = state.gallery_tick.read();
            let session = *state.gallery_session.read();
            let kind = kind_filter.read().clone();
            let services = services.clone();
            spawn(async move {
                if let Ok(list) = services.gallery.media_folders().await {
                    folders.set(list);
                }
                let kind = (!kind.is_empty()).then_some(kind);
                if let Ok(list) = services.gallery.media(&session, kind.as_deref()).await {
                    items.set(list);
                }
            });
        }
    });

    let on_create_folder = {
        let services = services.clone();
        move |_| {
            let title = folder_title.read().trim().to_string();
            if title.is_empty() {
                let mut notice = state.notice;
                notice.set(Some("Enter a folder name".to_string()));
                return;
            }
            let services = services.clone();
            spawn(async move {
                match services.gallery.create_media_folder(&title).await {
                    Ok(()) => {
                        folder_title.set(String::new());
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Creating the folder")));
                    }
                }
            });
        }
    };

    let on_delete_folder = {
        let services = services.clone();
        move |id: i64| {
            let services = services.clone();
            spawn(async move {
                match services.gallery.delete_media_folder(id).await {
                    Ok(()) => {
                        let mut session = state.gallery_session;
                        if session.read().media_folder == Some(id) {
                            session.write().media_folder = None;
                        }
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Deleting the folder")));
                    }
                }
            });
        }
    };

    let on_delete_media = {
        let services = services.clone();
        move |id: i64| {
            let services = services.clone();
            spawn(async move {
                match services.gallery.delete_media(id).await {
                    Ok(()) => {
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Deleting the media")));
                    }
                }
            });
        }
    };

    let current_folder = state.gallery_session.read().media_folder;

    rsx! {
        div {
            class: "media-pane",
            aside {
                class: "folders",
                div {
                    class: if current_folder.is_none() { "folder-card active" } else { "folder-card" },
                    onclick: move |_| {
                        let mut session = state.gallery_session;
                        session.write().media_folder = None;
                    },
                    "All media"
                }
                {folders.read().iter().cloned().map(|folder| {
                    let on_delete_folder = on_delete_folder.clone();
                    let active = current_folder == Some(folder.id);
                    let id = folder.id;
                    rsx! {
                        div {
                            key: "{id}",
                            class: if active { "folder-card active" } else { "folder-card" },
                            onclick: move |_| {
                                let mut session = state.gallery_session;
                                session.write().media_folder = Some(id);
                            },
                            span { "{folder.title}" }
                            button {
                                class: "btn danger",
                                title: "Delete folder",
                                onclick: move |evt| {
                                    evt.stop_propagation();
                                    on_delete_folder(id);
                                },
                                "\u{00d7}"
                            }
                        }
                    }
                })}
                div {
                    class: "folder-form",
                    input {
                        placeholder: "New folder",
                        value: "{folder_title.read()}",
                        oninput: move |evt| folder_title.set(evt.value()),
                    }
                    button { class: "btn", onclick: on_create_folder, "Create" }
                }
                div {
                    class: "field",
                    label { "Type" }
                    select {
                        onchange: move |evt| kind_filter.set(evt.value()),
                        option { value: "", "All" }
                        option { value: "image", "Images" }
                        option { value: "video", "Video" }
                        option { value: "audio", "Music" }
                    }
                }
            }
            div {
                class: "media-list",
                UploadMediaForm { folders: folders.read().clone() }
                {items.read().iter().cloned().map(|item| {
                    let on_delete_media = on_delete_media.clone();
                    let id = item.id;
                    let heading = if item.title.is_empty() {
                        format!("[{:?}]", item.kind).to_lowercase()
                    } else {
                        item.title.clone()
                    };
                    rsx! {
                        div {
                            key: "{id}",
                            class: "card media-card",
                            div {
                                class: "media-head",
                                h2 { "{heading}" }
                                button {
                                    class: "btn danger",
                                    onclick: move |_| on_delete_media(id),
                                    "Delete"
                                }
                            }
                            p { class: "muted", "{item.description}" }
                            match item.kind {
                                MediaKind::Image => rsx! { img { src: "{item.url}" } },
                                MediaKind::Video => rsx! { video { controls: true, src: "{item.url}" } },
                                MediaKind::Audio => rsx! { audio { controls: true, src: "{item.url}" } },
                                MediaKind::Unknown => rsx! { a { href: "{item.url}", "{item.url}" } },
                            }
                        }
                    }
                })}
            }
        }
    }
}

#[component]
fn UploadMediaForm(folders: Vec<Folder>) -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut kind = use_signal(|| "image".to_string());
    let mut folder_id = use_signal(|| None::<i64>);
    let mut file = use_signal(|| None::<FileUpload>);

    let on_upload = {
        let services = services.clone();
        move |_| {
            let Some(upload) = file.read().clone() else {
                let mut notice = state.notice;
                notice.set(Some("Pick a file to upload".to_string()));
                return;
            };
            let draft = MediaDraft {
                title: title.read().trim().to_string(),
                description: description.read().clone(),
                kind: kind.read().clone(),
                folder_id: *folder_id.read(),
                file: upload,
            };
            let services = services.clone();
            spawn(async move {
                match services.gallery.upload_media(draft).await {
                    Ok(()) => {
                        title.set(String::new());
                        description.set(String::new());
                        file.set(None);
                        let mut tick = state.gallery_tick;
                        tick += 1;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Uploading the media")));
                    }
                }
            });
        }
    };

    rsx! {
        div {
            class: "card media-form",
            h3 { "Upload media" }
            input {
                placeholder: "Title",
                value: "{title.read()}",
                oninput: move |evt| title.set(evt.value()),
            }
            input {
                placeholder: "Description",
                value: "{description.read()}",
                oninput: move |evt| description.set(evt.value()),
            }
            select {
                value: "{kind.read()}",
                onchange: move |evt| kind.set(evt.value()),
                option { value: "image", "Image" }
                option { value: "video", "Video" }
                option { value: "audio", "Audio" }
            }
            select {
                onchange: move |evt| folder_id.set(evt.value().parse().ok()),
                option { value: "", "No folder" }
                {folders.iter().map(|folder| rsx! {
                    option { key: "{folder.id}", value: "{folder.id}", "{folder.title}" }
                })}
            }
            label {
                class: "btn ghost",
                "Choose file"
                input {
                    r#type: "file",
                    hidden: true,
                    onchange: move |evt: FormEvent| {
                        let Some(picked) = evt.files().into_iter().next() else { return };
                        spawn(async move {
                            if let Some(upload) = read_upload(picked).await {
                                file.set(Some(upload));
                            }
                        });
                    },
                }
            }
            {file.read().as_ref().map(|upload| rsx! {
                span { class: "muted", "{upload.file_name}" }
            })}
            button { class: "btn primary", onclick: on_upload, "Upload" }
        }
    }
}
