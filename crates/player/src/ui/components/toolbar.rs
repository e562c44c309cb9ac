//! Sheet toolbar: picker, PDF import, save.

use dioxus::prelude::*;

use vellum_domain::FormModel;
use vellum_shared::{SheetData, SheetDocument};

use crate::ports::FileUpload;
use crate::ui::{AppState, Services};

fn apply_document(state: &AppState, document: &SheetDocument) {
    let mut form = state.form;
    form.set(Some(FormModel::build(
        &document.data.fields,
        document.data.avatar_data_url.clone(),
    )));
}

async fn refresh_sheet_list(services: &Services, state: &AppState) {
    if let Ok(sheets) = services.sheets.list().await {
        let mut sheet_list = state.sheet_list;
        sheet_list.set(sheets);
    }
}

#[component]
pub fn SheetToolbar() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();
    let avatar_upload = use_context::<Signal<Option<FileUpload>>>();

    let current_id = state.session.read().current_id();

    let on_pick = {
        let services = services.clone();
        move |evt: FormEvent| {
            let Ok(id) = evt.value().parse::<i64>() else {
                return;
            };
            let services = services.clone();
            let state = state;
            spawn(async move {
                let mut session = *state.session.read();
                match services.sheets.load(&mut session, id).await {
                    Ok(document) => {
                        let mut session_signal = state.session;
                        session_signal.set(session);
                        apply_document(&state, &document);
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Loading the sheet")));
                    }
                }
            });
        }
    };

    let on_import = {
        let services = services.clone();
        move |evt: FormEvent| {
            let Some(file) = evt.files().into_iter().next() else {
                return;
            };
            let services = services.clone();
            let state = state;
            spawn(async move {
                let name = file.name();
                let bytes = match file.read_bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(format!("Reading the PDF failed: {e}")));
                        return;
                    }
                };
                let mut session = *state.session.read();
                match services.sheets.import(&mut session, &name, bytes).await {
                    Ok(document) => {
                        let mut session_signal = state.session;
                        session_signal.set(session);
                        apply_document(&state, &document);
                        refresh_sheet_list(&services, &state).await;
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Importing the PDF")));
                    }
                }
            });
        }
    };

    let on_save = {
        let services = services.clone();
        move |_| {
            let Some(model) = state.form.read().clone() else {
                return;
            };
            let services = services.clone();
            let state = state;
            let mut avatar_upload = avatar_upload;
            spawn(async move {
                let data = SheetData {
                    fields: model.to_fields(),
                    avatar_data_url: model.avatar_data_url.clone(),
                };
                let avatar = avatar_upload.write().take();
                let mut session = *state.session.read();
                match services.sheets.save(&mut session, data, avatar).await {
                    Ok(document) => {
                        let mut session_signal = state.session;
                        session_signal.set(session);
                        // re-render from the server-confirmed document
                        apply_document(&state, &document);
                        refresh_sheet_list(&services, &state).await;
                        let mut notice = state.notice;
                        notice.set(Some("Saved!".to_string()));
                    }
                    Err(e) => {
                        let mut notice = state.notice;
                        notice.set(Some(e.user_message("Saving the sheet")));
                    }
                }
            });
        }
    };

    rsx! {
        div {
            class: "toolbar",
            select {
                class: "sheet-select",
                value: current_id.map(|id| id.to_string()).unwrap_or_default(),
                onchange: on_pick,
                option { value: "", "— pick a sheet —" }
                {state.sheet_list.read().iter().map(|sheet| {
                    let label = match sheet.created_at {
                        Some(created) => format!("{} — {}", sheet.name, created.format("%Y-%m-%d %H:%M")),
                        None => sheet.name.clone(),
                    };
                    match sheet.id {
                        Some(id) => rsx! {
                            option { key: "{id}", value: "{id}", "{label}" }
                        },
                        None => rsx! {
                            option { key: "{sheet.name}", value: "", disabled: true, "{label} — (not in DB)" }
                        },
                    }
                })}
            }
            label {
                class: "btn ghost",
                "Import PDF"
                input {
                    r#type: "file",
                    accept: ".pdf",
                    hidden: true,
                    onchange: on_import,
                }
            }
            button {
                class: "btn primary",
                onclick: on_save,
                "Save"
            }
        }
    }
}
