//! One spell-selection row: type-ahead combo, dice panel toggle, detail
//! toggle, clear.

use dioxus::prelude::*;
use uuid::Uuid;

use vellum_domain::{Die, RollSpec};
use vellum_shared::SpellSummary;

use crate::application::dice_config::{load_spell_config, save_spell_config};
use crate::ui::components::{ability_modifier, ability_options};
use crate::ui::app::push_history;
use crate::ui::state::{
    reduce, ComboState, DetailState, DicePanelState, SpellLineMsg, SpellLineState,
};
use crate::ui::{AppState, Services};

#[component]
pub fn SpellLine(name: String, value: String) -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let mut line = use_signal(|| SpellLineState::new(value.clone(), value.clone()));
    let mut options = use_signal(Vec::<SpellSummary>::new);

    // Re-seed the row whenever the bound field value changes from the
    // outside (a different sheet was loaded, or a save re-rendered the
    // form), then resolve the value against the catalog: a slug keeps
    // its canonical name in the visible input, a plain name gains its
    // slug in the hidden value.
    let mut synced_value = use_signal(|| None::<String>);
    if synced_value.read().as_deref() != Some(value.as_str()) {
        synced_value.set(Some(value.clone()));
        line.set(SpellLineState::new(value.clone(), value.clone()));

        let catalog = services.catalog.clone();
        let initial = value.clone();
        let field_name = name.clone();
        let form = state.form;
        spawn(async move {
            if initial.is_empty() {
                return;
            }
            if let Some(spell) = catalog.find_by_slug_or_name(&initial).await {
                {
                    let mut line = line.write();
                    line.slug = spell.slug.clone();
                    line.display = spell.name.clone();
                }
                if initial != spell.slug {
                    if let Some(model) = { form }.write().as_mut() {
                        model.set_spell_line_value(&field_name, &spell.slug);
                    }
                }
            }
        });
    }

    let refresh_options = {
        let catalog = services.catalog.clone();
        move |filter: String| {
            let catalog = catalog.clone();
            spawn(async move {
                options.set(catalog.filtered(&filter).await);
            });
        }
    };

    let open_combo = {
        let refresh_options = refresh_options.clone();
        move |filter: String| {
            reduce(&mut line.write(), SpellLineMsg::ComboOpened);
            refresh_options(filter);
        }
    };

    let on_pick = {
        let field_name = name.clone();
        move |spell: SpellSummary| {
            reduce(
                &mut line.write(),
                SpellLineMsg::SpellPicked {
                    slug: spell.slug.clone(),
                    name: spell.name.clone(),
                },
            );
            let form = state.form;
            if let Some(model) = { form }.write().as_mut() {
                model.set_spell_line_value(&field_name, &spell.slug);
            }
        }
    };

    let on_toggle_detail = {
        let spells = services.spells.clone();
        move |_| {
            let currently_open = !matches!(line.read().detail, DetailState::Closed);
            if currently_open {
                reduce(&mut line.write(), SpellLineMsg::DetailClosed);
                return;
            }
            let slug = line.read().slug.clone();
            let request_id = Uuid::new_v4();
            reduce(&mut line.write(), SpellLineMsg::DetailOpened { request_id });
            if slug.is_empty() {
                reduce(&mut line.write(), SpellLineMsg::DetailFailed { request_id });
                return;
            }
            let spells = spells.clone();
            spawn(async move {
                let msg = match spells.detail(&slug).await {
                    Ok(detail) => SpellLineMsg::DetailLoaded {
                        request_id,
                        html: detail.html,
                    },
                    Err(e) => {
                        tracing::warn!("spell detail fetch failed: {e}");
                        SpellLineMsg::DetailFailed { request_id }
                    }
                };
                reduce(&mut line.write(), msg);
            });
        }
    };

    let on_clear = {
        let field_name = name.clone();
        move |_| {
            reduce(&mut line.write(), SpellLineMsg::Cleared);
            let form = state.form;
            if let Some(model) = { form }.write().as_mut() {
                model.set_spell_line_value(&field_name, "");
            }
        }
    };

    let current = line.read().clone();
    let dice_open = current.dice == DicePanelState::Open;
    let detail_label = if matches!(current.detail, DetailState::Closed) {
        "Details"
    } else {
        "Hide"
    };

    rsx! {
        div {
            class: "spell-line",
            div {
                class: "combo",
                input {
                    class: "combo-input",
                    r#type: "text",
                    placeholder: "Pick a spell\u{2026}",
                    value: "{current.display}",
                    onfocus: {
                        let open_combo = open_combo.clone();
                        move |_| open_combo(line.read().display.clone())
                    },
                    oninput: {
                        let open_combo = open_combo.clone();
                        move |evt: FormEvent| {
                            line.write().display = evt.value();
                            open_combo(evt.value());
                        }
                    },
                    onfocusout: move |_| reduce(&mut line.write(), SpellLineMsg::ComboClosed),
                }
                if current.combo == ComboState::Open {
                    div {
                        class: "combo-list",
                        if options.read().is_empty() {
                            div { class: "combo-item muted", "Nothing found" }
                        }
                        {options.read().iter().cloned().map(|spell| {
                            let on_pick = on_pick.clone();
                            let slug = spell.slug.clone();
                            let display_name = spell.name.clone();
                            rsx! {
                                div {
                                    key: "{slug}",
                                    class: "combo-item",
                                    // keep focus in the input so the pick lands first
                                    onmousedown: |evt| evt.prevent_default(),
                                    onclick: move |_| on_pick(spell.clone()),
                                    "{display_name} "
                                    span { class: "muted", "{slug}" }
                                }
                            }
                        })}
                    }
                }
            }
            button {
                class: "btn success",
                onclick: move |_| reduce(&mut line.write(), SpellLineMsg::DiceToggled),
                if dice_open { "Hide" } else { "Use" }
            }
            button {
                class: "spell-more-btn",
                onclick: on_toggle_detail,
                "{detail_label}"
            }
            button {
                class: "spell-del-btn",
                onclick: on_clear,
                "Clear"
            }
            match &current.detail {
                DetailState::Closed => rsx! {},
                DetailState::Loading { .. } => rsx! {
                    div { class: "spell-detail show", em { "Loading\u{2026}" } }
                },
                DetailState::Shown { html } => rsx! {
                    div { class: "spell-detail show", dangerous_inner_html: "{html}" }
                },
                DetailState::Failed => rsx! {
                    div {
                        class: "spell-detail show",
                        em {
                            if current.slug.is_empty() {
                                "Pick a spell from the list first"
                            } else {
                                "Request failed"
                            }
                        }
                    }
                },
            }
            if dice_open {
                SpellDicePanel {
                    slug: current.slug.clone(),
                    spell_name: current.display.clone(),
                }
            }
        }
    }
}

/// The roll panel scoped to one spell. Restores the last-used die,
/// count and ability for this spell's slug and saves them on every roll.
#[component]
fn SpellDicePanel(slug: String, spell_name: String) -> Element {
    let services = use_context::<Services>();
    let state = use_context::<AppState>();

    let storage = services.platform.storage.clone();
    let mut config = use_signal({
        let storage = storage.clone();
        let slug = slug.clone();
        move || load_spell_config(storage.as_ref(), &slug)
    });

    // Picking a different spell while the panel is open swaps in that
    // spell's saved configuration.
    let mut synced_slug = use_signal(|| slug.clone());
    if *synced_slug.read() != slug {
        synced_slug.set(slug.clone());
        config.set(load_spell_config(storage.as_ref(), &slug));
    }

    let abilities = {
        let form = state.form;
        let form = form.read();
        ability_options(&form)
    };

    let on_roll = {
        let storage = storage.clone();
        let slug = slug.clone();
        let spell_name = spell_name.clone();
        move |_| {
            let cfg = config.read().clone();
            save_spell_config(storage.as_ref(), &slug, &cfg);

            let (character, modifier) = {
                let form = state.form;
                let form = form.read();
                let character = form
                    .as_ref()
                    .map(|model| model.character_name())
                    .unwrap_or_else(|| "Unnamed".to_string());
                (character, ability_modifier(&form, &cfg.ab_key))
            };

            let spec = RollSpec::new(Die::parse(&cfg.die_sides), cfg.count, modifier);
            let entry = services.rolls.compute(spec, &character, &spell_name);
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
            class: "dice-panel",
            h3 { "Roll: {spell_name}" }
            div {
                class: "dice-row",
                div {
                    label { "Die" }
                    select {
                        value: "{config.read().die_sides}",
                        onchange: move |evt| config.write().die_sides = evt.value(),
                        {Die::ALL.into_iter().map(|die| rsx! {
                            option { key: "{die.label()}", value: "{die.label()}", "{die.label()}" }
                        })}
                    }
                }
                div {
                    label { "Count" }
                    input {
                        r#type: "number",
                        min: "1",
                        step: "1",
                        value: "{config.read().count}",
                        oninput: move |evt| {
                            config.write().count = evt.value().parse().unwrap_or(1).max(1);
                        },
                    }
                }
            }
            div {
                class: "dice-row",
                div {
                    label { "Ability" }
                    select {
                        value: "{config.read().ab_key}",
                        onchange: move |evt| config.write().ab_key = evt.value(),
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
    }
}
