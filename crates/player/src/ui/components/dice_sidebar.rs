//! Dice sidebar: long rest, the free roll panel, and the shared roll
//! history.

use dioxus::prelude::*;

use vellum_domain::{Die, RollSpec};

use crate::ui::app::push_history;
use crate::ui::components::{ability_modifier, ability_options};
use crate::ui::{AppState, Services};

#[component]
pub fn DiceSidebar() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut die = use_signal(|| "d20".to_string());
    let mut count = use_signal(|| 1u32);
    let mut ability = use_signal(String::new);

    let abilities = {
        let form = state.form;
        let form = form.read();
        ability_options(&form)
    };

    let on_long_rest = move |_| {
        let mut form = state.form;
        let mut applied = false;
        if let Some(model) = form.write().as_mut() {
            model.long_rest();
            applied = true;
        }
        if applied {
            let mut notice = state.notice;
            notice.set(Some(
                "Long rest: hit points and spell slots restored".to_string(),
            ));
        }
    };

    let on_roll = {
        let services = services.clone();
        move |_| {
            let (character, modifier) = {
                let form = state.form;
                let form = form.read();
                let character = form
                    .as_ref()
                    .map(|model| model.character_name())
                    .unwrap_or_else(|| "Unnamed".to_string());
                (character, ability_modifier(&form, &ability.read()))
            };

            let spec = RollSpec::new(Die::parse(&die.read()), *count.read(), modifier);
            let entry = services.rolls.compute(spec, &character, "");
            let rolls = services.rolls.clone();
            let history = state.history;
            spawn(async move {
                // render optimistically; a failed post stays local
                push_history(history, entry.clone(), true);
                rolls.submit(&entry).await;
            });
        }
    };

    rsx! {
        div {
            id: "diceSidebar",
            div {
                class: "long-rest-holder",
                button {
                    class: "btn",
                    onclick: on_long_rest,
                    "Long rest"
                }
            }
            div {
                class: "dice-panel",
                h3 { "Free roll" }
                div {
                    class: "dice-row",
                    div {
                        label { "Die" }
                        select {
                            value: "{die.read()}",
                            onchange: move |evt| die.set(evt.value()),
                            {Die::ALL.into_iter().map(|d| rsx! {
                                option { key: "{d.label()}", value: "{d.label()}", "{d.label()}" }
                            })}
                        }
                    }
                    div {
                        label { "Count" }
                        input {
                            r#type: "number",
                            min: "1",
                            step: "1",
                            title: "How many dice to roll (3 for 3d6)",
                            value: "{count.read()}",
                            oninput: move |evt| count.set(evt.value().parse().unwrap_or(1).max(1)),
                        }
                    }
                }
                div {
                    class: "dice-row",
                    div {
                        label { "Ability" }
                        select {
                            value: "{ability.read()}",
                            onchange: move |evt| ability.set(evt.value()),
                            option { value: "", "No ability" }
                            {abilities.into_iter().map(|(key, label)| rsx! {
                                option { key: "{key}", value: "{key}", "{label}" }
                            })}
                        }
                    }
                }
                div {
                    class: "dice-actions",
                    button {
                        class: "btn primary",
                        onclick: on_roll,
                        "Roll"
                    }
                }
            }
            h3 { "Roll history" }
            RollHistory {}
        }
    }
}

#[component]
fn RollHistory() -> Element {
    let state = use_context::<AppState>();
    let rows = state.history.read().clone();

    rsx! {
        div {
            class: "roll-history",
            if rows.is_empty() {
                div { class: "muted", "Nothing yet" }
            }
            {rows.into_iter().enumerate().map(|(index, row)| {
                let who = if row.entry.character.is_empty() {
                    "Unnamed".to_string()
                } else {
                    row.entry.character.clone()
                };
                let top = if row.entry.spell.is_empty() {
                    who
                } else {
                    format!("{who} \u{2014} {}", row.entry.spell)
                };
                rsx! {
                    div {
                        key: "{index}-{row.entry.total}",
                        class: if row.highlight { "roll-item highlight" } else { "roll-item" },
                        div { class: "meta", "{top}" }
                        div { class: "result", "{row.entry.expr} = {row.entry.total}" }
                        if !row.entry.breakdown.is_empty() {
                            div { class: "muted", "{row.entry.breakdown}" }
                        }
                    }
                }
            })}
        }
    }
}
