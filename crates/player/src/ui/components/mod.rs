//! UI components for the sheet editor and galleries.

use vellum_domain::abilities::{format_modifier, parse_modifier};
use vellum_domain::{Ability, FormModel};

pub mod dice_sidebar;
pub mod gallery;
pub mod magic_section;
pub mod sheet_form;
pub mod spell_line;
pub mod toolbar;

pub use dice_sidebar::DiceSidebar;
pub use gallery::GalleryView;
pub use magic_section::MagicSection;
pub use sheet_form::SheetView;
pub use spell_line::SpellLine;
pub use toolbar::SheetToolbar;

/// `(field key, "STR (+2)")` pairs for an ability select, with the
/// modifiers read from the current form.
pub(crate) fn ability_options(form: &Option<FormModel>) -> Vec<(String, String)> {
    Ability::ALL
        .into_iter()
        .map(|ability| {
            let modifier = form
                .as_ref()
                .and_then(|model| model.field_value(ability.field_name()))
                .map(parse_modifier)
                .unwrap_or(0);
            (
                ability.field_name().to_string(),
                format!("{} ({})", ability.field_name(), format_modifier(modifier)),
            )
        })
        .collect()
}

/// Ability modifier for a select value, 0 when nothing is picked.
pub(crate) fn ability_modifier(form: &Option<FormModel>, key: &str) -> i32 {
    Ability::parse(key)
        .and_then(|ability| {
            form.as_ref()
                .and_then(|model| model.field_value(ability.field_name()))
                .map(parse_modifier)
        })
        .unwrap_or(0)
}
