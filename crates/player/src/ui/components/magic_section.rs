//! The Magic section: per-level slot inputs and spell lines.

use dioxus::prelude::*;

use crate::ui::components::sheet_form::FieldInput;
use crate::ui::components::SpellLine;
use crate::ui::AppState;

#[component]
pub fn MagicSection() -> Element {
    let state = use_context::<AppState>();
    let form = state.form;

    let (levels, unassigned) = {
        let form = form.read();
        let Some(model) = form.as_ref() else {
            return rsx! {
                div { class: "muted", "No sheet loaded" }
            };
        };
        (model.levels.clone(), model.unassigned.clone())
    };

    rsx! {
        section {
            class: "card sheet-section",
            id: "sec-magic",
            h2 { "Magic" }
            {levels.into_iter().map(|level_box| {
                let title = if level_box.level == 0 {
                    "Level 0 — Cantrips".to_string()
                } else {
                    format!("Level {}", level_box.level)
                };
                rsx! {
                    div {
                        key: "level-{level_box.level}",
                        class: "group-lvl",
                        div {
                            class: "level-head",
                            div { class: "lvl-title", "{title}" }
                        }
                        div {
                            class: "grid two",
                            {level_box.slots.map(|slots| rsx! {
                                FieldInput {
                                    name: slots.total.name.clone(),
                                    label: slots.total.label.clone(),
                                    value: slots.total.display.clone(),
                                    long: false,
                                    numeric: true,
                                }
                                FieldInput {
                                    name: slots.remaining.name.clone(),
                                    label: slots.remaining.label.clone(),
                                    value: slots.remaining.display.clone(),
                                    long: false,
                                    numeric: true,
                                }
                            })}
                        }
                        div {
                            class: "stack spellbox",
                            {level_box.lines.into_iter().map(|line| rsx! {
                                SpellLine {
                                    key: "{line.name}",
                                    name: line.name.clone(),
                                    value: line.value.clone(),
                                }
                            })}
                        }
                    }
                }
            })}
            if !unassigned.is_empty() {
                div {
                    class: "group-lvl",
                    div {
                        class: "level-head",
                        div { class: "lvl-title", "Unassigned spells" }
                    }
                    div {
                        class: "stack spellbox",
                        {unassigned.into_iter().map(|line| rsx! {
                            SpellLine {
                                key: "{line.name}",
                                name: line.name.clone(),
                                value: line.value.clone(),
                            }
                        })}
                    }
                }
            }
        }
    }
}
