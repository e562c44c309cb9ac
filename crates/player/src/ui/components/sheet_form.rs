//! The editable sheet surface: section tabs, static sections, avatar
//! control, and the Magic section.

use base64::Engine as _;
use dioxus::prelude::*;

use vellum_domain::calc;
use vellum_domain::form::{FormField, LayoutHint};
use vellum_domain::FormModel;

use crate::ports::{storage_keys, FileUpload};
use crate::ui::components::MagicSection;
use crate::ui::{AppState, Services};

const MAGIC_TAB: &str = "magic";

/// Collapse a calculator expression typed into a numeric field.
pub(crate) fn apply_calc(mut form: Signal<Option<FormModel>>, name: &str) {
    let current = form
        .read()
        .as_ref()
        .and_then(|model| model.field_value(name).map(str::to_string));
    let Some(raw) = current else { return };
    let Ok(value) = calc::eval_expression(&raw) else {
        return;
    };
    if let Some(model) = form.write().as_mut() {
        model.set_field_value(name, &calc::format_result(value));
    }
}

fn layout_class(layout: LayoutHint) -> &'static str {
    match layout {
        LayoutHint::Three => "grid three",
        LayoutHint::Two => "grid two",
        LayoutHint::Four => "grid four",
        LayoutHint::Stack => "grid stack",
    }
}

pub(crate) fn mime_for_image(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        Some("image/png")
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some("image/jpeg")
    } else {
        None
    }
}

#[component]
pub fn SheetView() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut active_tab = use_signal(|| {
        services
            .platform
            .storage
            .load(storage_keys::ACTIVE_TAB)
            .unwrap_or_else(|| "core".to_string())
    });

    let form = state.form;
    let tabs: Vec<(String, String)> = {
        let form = form.read();
        let Some(model) = form.as_ref() else {
            return rsx! {
                div {
                    class: "empty-sheet muted",
                    "Pick a sheet from the list or import a PDF to start editing."
                }
            };
        };
        let mut tabs: Vec<(String, String)> = model
            .sections
            .iter()
            .map(|section| (section.id.clone(), section.title.clone()))
            .collect();
        tabs.push((MAGIC_TAB.to_string(), "Magic".to_string()));
        tabs
    };

    let storage = services.platform.storage.clone();

    rsx! {
        div {
            class: "sheet-view",
            nav {
                class: "sheet-tabs",
                {tabs.into_iter().map(|(id, title)| {
                    let storage = storage.clone();
                    let selected = *active_tab.read() == id;
                    let tab_id = id.clone();
                    rsx! {
                        button {
                            key: "{id}",
                            class: if selected { "tab-btn active" } else { "tab-btn" },
                            onclick: move |_| {
                                storage.save(storage_keys::ACTIVE_TAB, &tab_id);
                                active_tab.set(tab_id.clone());
                            },
                            "{title}"
                        }
                    }
                })}
            }
            if *active_tab.read() == MAGIC_TAB {
                MagicSection {}
            } else {
                StaticSection { section_id: active_tab.read().clone() }
            }
        }
    }
}

#[component]
fn StaticSection(section_id: String) -> Element {
    let state = use_context::<AppState>();
    let form = state.form;

    let section = {
        let form = form.read();
        form.as_ref()
            .and_then(|model| model.sections.iter().find(|s| s.id == section_id).cloned())
    };
    let Some(section) = section else {
        return rsx! {
            div { class: "muted", "Unknown section" }
        };
    };

    rsx! {
        section {
            class: "card sheet-section",
            id: "sec-{section.id}",
            h2 { "{section.title}" }
            div {
                class: layout_class(section.layout),
                {section.fields.iter().cloned().map(|field| match field {
                    FormField::Avatar => rsx! {
                        AvatarControl { key: "__avatar__" }
                    },
                    FormField::Text(text) => {
                        let name = text.name.clone();
                        rsx! {
                            FieldInput {
                                key: "{name}",
                                name: text.name,
                                label: text.label,
                                value: text.display,
                                long: text.long,
                                numeric: text.numeric,
                            }
                        }
                    }
                })}
            }
        }
    }
}

/// One labeled input bound to a field name. Numeric fields run the
/// calculator on Enter and on blur.
#[component]
pub fn FieldInput(name: String, label: String, value: String, long: bool, numeric: bool) -> Element {
    let state = use_context::<AppState>();
    let form = state.form;

    let oninput = {
        let name = name.clone();
        move |evt: FormEvent| {
            if let Some(model) = { form }.write().as_mut() {
                model.set_field_value(&name, &evt.value());
            }
        }
    };

    rsx! {
        div {
            class: "field",
            label { "{label}" }
            if long {
                textarea {
                    placeholder: "{label}",
                    value: "{value}",
                    oninput,
                }
            } else {
                input {
                    r#type: "text",
                    placeholder: "{label}",
                    title: if numeric { "Expressions allowed: 10+2*3, (40-5)/5. Press Enter to evaluate." } else { "" },
                    value: "{value}",
                    oninput,
                    onkeydown: {
                        let name = name.clone();
                        move |evt: KeyboardEvent| {
                            if numeric && evt.key() == Key::Enter {
                                apply_calc(form, &name);
                            }
                        }
                    },
                    onfocusout: {
                        let name = name.clone();
                        move |_| {
                            if numeric {
                                apply_calc(form, &name);
                            }
                        }
                    },
                }
            }
        }
    }
}

/// Image-upload + preview control. The picked file previews immediately
/// (data URL) and is uploaded with the next save.
#[component]
fn AvatarControl() -> Element {
    let state = use_context::<AppState>();
    let mut avatar_upload = use_context::<Signal<Option<FileUpload>>>();
    let form = state.form;

    let preview_style = form
        .read()
        .as_ref()
        .and_then(|model| model.avatar_data_url.clone())
        .map(|url| format!("background-image: url('{url}'); background-size: cover;"))
        .unwrap_or_default();

    let on_file = move |evt: FormEvent| {
        let Some(file) = evt.files().into_iter().next() else {
            return;
        };
        let mut form = form;
        let state = state;
        spawn(async move {
            let name = file.name();
            let Some(mime) = mime_for_image(&name) else {
                let mut notice = state.notice;
                notice.set(Some("PNG/JPG only".to_string()));
                return;
            };
            let bytes = match file.read_bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    let mut notice = state.notice;
                    notice.set(Some(format!("Reading the image failed: {e}")));
                    return;
                }
            };
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            if let Some(model) = form.write().as_mut() {
                model.avatar_data_url = Some(format!("data:{mime};base64,{encoded}"));
            }
            avatar_upload.set(Some(FileUpload {
                file_name: name,
                mime: mime.to_string(),
                bytes,
            }));
        });
    };

    rsx! {
        div {
            class: "field avatar",
            label { "Portrait" }
            div {
                class: "preview",
                style: "{preview_style}",
            }
            label {
                class: "btn ghost",
                "Choose file"
                input {
                    r#type: "file",
                    accept: "image/png,image/jpeg",
                    hidden: true,
                    onchange: on_file,
                }
            }
            small { "PNG/JPG" }
        }
    }
}
