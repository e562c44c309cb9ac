//! The form model the renderer consumes.
//!
//! A sheet is displayed as a fixed set of titled sections (driven by the
//! static field-group configuration below) plus one Magic section derived
//! from the reconciled [`MagicModel`](crate::magic::MagicModel). The model
//! is a pure function of the field list: building it twice from the same
//! input yields the same widgets, which is what makes re-rendering after
//! a save idempotent.
//!
//! Serialization back to the flat field list is the inverse operation,
//! with one deliberate exception: spell lines whose value is empty after
//! trimming are dropped, so placeholder rows never pollute the document.

use crate::fields::{normalize_name, FieldIndex, FieldRecord};
use crate::magic::{slot_level_from_name, slot_names_for_level, MagicModel, SpellLineEntry};

/// Sentinel name for the image-upload control in the static config.
pub const AVATAR_FIELD: &str = "__AVATAR__";

/// Every level always exposes exactly this many spell-line widgets;
/// parsed entries first, placeholders after. Data beyond the cap is not
/// displayed.
pub const SPELL_LINES_PER_LEVEL: usize = 10;

/// Visual grouping hint for a section. Affects layout only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutHint {
    Three,
    Two,
    Four,
    Stack,
}

/// Static configuration for one titled section of the sheet.
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub layout: LayoutHint,
    /// `(field name, display label)` pairs, rendered in order.
    pub fields: &'static [(&'static str, &'static str)],
}

/// Field names that render as multi-line text regardless of group.
const LONG_TEXT_FIELDS: &[&str] = &[
    "ProficienciesLang",
    "Equipment",
    "Features and Traits",
    "AttacksSpellcasting",
    "Backstory",
    "Allies",
    "Feat+Traits",
    "Treasure",
    "PersonalityTraits",
    "Ideals",
    "Bonds",
    "Flaws",
];

/// Field names whose inputs accept arithmetic expressions (see
/// [`crate::calc`]).
const NUMERIC_FIELDS: &[&str] = &[
    "HPMax",
    "HPCurrent",
    "HPTemp",
    "AC",
    "Initiative",
    "Speed",
    "ProfBonus",
    "Passive",
    "HDTotal",
    "CP",
    "SP",
    "EP",
    "GP",
    "PP",
];

const FIELD_GROUPS: &[FieldGroup] = &[
    FieldGroup {
        id: "core",
        title: "Character",
        layout: LayoutHint::Three,
        fields: &[
            (AVATAR_FIELD, "Portrait"),
            ("CharacterName", "Character name"),
            ("ClassLevel", "Class & level"),
            ("Background", "Background"),
            ("PlayerName", "Player name"),
            ("Race", "Race"),
            ("Alignment", "Alignment"),
            ("XP", "Experience (XP)"),
            ("Age", "Age"),
            ("Height", "Height"),
            ("Weight", "Weight"),
            ("Eyes", "Eyes"),
            ("Skin", "Skin"),
            ("Hair", "Hair"),
        ],
    },
    FieldGroup {
        id: "combat",
        title: "Combat",
        layout: LayoutHint::Three,
        fields: &[
            ("AC", "Armor class"),
            ("Initiative", "Initiative"),
            ("Speed", "Speed"),
            ("HPMax", "Hit points (max)"),
            ("HPCurrent", "Hit points (current)"),
            ("HPTemp", "Temporary hit points"),
            ("HDTotal", "Hit dice (total)"),
            ("HD", "Hit dice (type)"),
            ("Passive", "Passive perception"),
            ("ProfBonus", "Proficiency bonus"),
            ("Inspiration", "Inspiration"),
        ],
    },
    FieldGroup {
        id: "abilities",
        title: "Ability scores",
        layout: LayoutHint::Four,
        fields: &[
            ("STR", "STR"),
            ("STRmod", "STR (score)"),
            ("DEX", "DEX"),
            ("DEXmod", "DEX (score)"),
            ("CON", "CON"),
            ("CONmod", "CON (score)"),
            ("INT", "INT"),
            ("INTmod", "INT (score)"),
            ("WIS", "WIS"),
            ("WISmod", "WIS (score)"),
            ("CHA", "CHA"),
            ("CHamod", "CHA (score)"),
        ],
    },
    FieldGroup {
        id: "saves",
        title: "Saving throws",
        layout: LayoutHint::Three,
        fields: &[
            ("ST Strength", "Strength"),
            ("ST Dexterity", "Dexterity"),
            ("ST Constitution", "Constitution"),
            ("ST Intelligence", "Intelligence"),
            ("ST Wisdom", "Wisdom"),
            ("ST Charisma", "Charisma"),
        ],
    },
    FieldGroup {
        id: "skills",
        title: "Skills",
        layout: LayoutHint::Three,
        fields: &[
            ("Acrobatics", "Acrobatics"),
            ("Animal", "Animal handling"),
            ("Arcana", "Arcana"),
            ("Athletics", "Athletics"),
            ("Deception", "Deception"),
            ("History", "History"),
            ("Insight", "Insight"),
            ("Intimidation", "Intimidation"),
            ("Investigation", "Investigation"),
            ("Medicine", "Medicine"),
            ("Nature", "Nature"),
            ("Perception", "Perception"),
            ("Performance", "Performance"),
            ("Persuasion", "Persuasion"),
            ("Religion", "Religion"),
            ("SleightofHand", "Sleight of hand"),
            ("Stealth", "Stealth"),
            ("Survival", "Survival"),
        ],
    },
    FieldGroup {
        id: "attacks",
        title: "Attacks & weaponry",
        layout: LayoutHint::Three,
        fields: &[
            ("Wpn Name", "Weapon #1 — name"),
            ("Wpn1 AtkBonus", "Attack bonus #1"),
            ("Wpn1 Damage", "Damage #1"),
            ("Wpn Name 2", "Weapon #2 — name"),
            ("Wpn2 AtkBonus", "Attack bonus #2"),
            ("Wpn2 Damage", "Damage #2"),
            ("Wpn Name 3", "Weapon #3 — name"),
            ("Wpn3 AtkBonus", "Attack bonus #3"),
            ("Wpn3 Damage", "Damage #3"),
            ("AttacksSpellcasting", "Attack & spellcasting notes"),
        ],
    },
    FieldGroup {
        id: "money",
        title: "Coin",
        layout: LayoutHint::Three,
        fields: &[
            ("CP", "Copper (cp)"),
            ("SP", "Silver (sp)"),
            ("EP", "Electrum (ep)"),
            ("GP", "Gold (gp)"),
            ("PP", "Platinum (pp)"),
        ],
    },
    FieldGroup {
        id: "personality",
        title: "Personality & features",
        layout: LayoutHint::Two,
        fields: &[
            ("PersonalityTraits", "Personality traits"),
            ("Ideals", "Ideals"),
            ("Bonds", "Bonds"),
            ("Flaws", "Flaws"),
            ("ProficienciesLang", "Proficiencies & languages"),
            ("Equipment", "Equipment"),
            ("Features and Traits", "Features & traits"),
        ],
    },
];

/// The static section configuration, in render order.
pub fn field_groups() -> &'static [FieldGroup] {
    FIELD_GROUPS
}

pub fn is_long_text_field(name: &str) -> bool {
    LONG_TEXT_FIELDS.contains(&name)
}

/// Whether the input for `name` accepts calculator expressions.
pub fn is_numeric_field(name: &str) -> bool {
    NUMERIC_FIELDS.contains(&name) || slot_level_from_name(name).is_some()
}

/// Name minted for a placeholder spell line at `level` / `index`.
pub fn synthetic_spell_name(level: usize, index: usize) -> String {
    format!("Spells {}", (level + 1) * 100 + (index + 1))
}

/// One editable text widget bound to a field name.
///
/// `value` is what gets persisted; `display` is what the input initially
/// shows (they differ only for checkbox-typed records, whose export value
/// is coerced to a check mark for display).
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub name: String,
    pub label: String,
    pub value: String,
    pub display: String,
    pub long: bool,
    pub numeric: bool,
}

impl TextField {
    fn from_config(name: &str, label: &str, index: &FieldIndex) -> Self {
        let record = index.get(name);
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: record.map(|r| r.value().to_string()).unwrap_or_default(),
            display: record.map(|r| r.display_value()).unwrap_or_default(),
            long: is_long_text_field(name),
            numeric: is_numeric_field(name),
        }
    }
}

/// One spell-selection row bound to a `Spells {id}` field.
///
/// `value` carries the canonical slug once the user picks from the
/// catalog, or whatever raw string the import produced before that.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellLineWidget {
    pub name: String,
    pub value: String,
}

/// The slot total/remaining inputs for one level.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInputs {
    pub total: TextField,
    pub remaining: TextField,
}

/// One level of the Magic section.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBox {
    pub level: usize,
    /// Absent only for level 0 (cantrips have no slots).
    pub slots: Option<SlotInputs>,
    pub lines: Vec<SpellLineWidget>,
}

/// A widget in a static section.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    /// The image-upload + preview control.
    Avatar,
    Text(TextField),
}

/// One titled static section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub layout: LayoutHint,
    pub fields: Vec<FormField>,
}

/// The full editable surface for one sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormModel {
    pub sections: Vec<Section>,
    pub levels: Vec<LevelBox>,
    pub unassigned: Vec<SpellLineWidget>,
    /// Imported fields with no widget of their own; re-emitted verbatim
    /// on save so nothing the PDF produced is lost.
    pub passthrough: Vec<FieldRecord>,
    pub avatar_data_url: Option<String>,
}

impl Default for LayoutHint {
    fn default() -> Self {
        LayoutHint::Three
    }
}

fn spell_lines(parsed: &[SpellLineEntry], level: usize) -> Vec<SpellLineWidget> {
    let mut lines: Vec<SpellLineWidget> = parsed
        .iter()
        .take(SPELL_LINES_PER_LEVEL)
        .map(|entry| SpellLineWidget {
            name: entry.name.clone(),
            value: entry.value.clone(),
        })
        .collect();
    for index in lines.len()..SPELL_LINES_PER_LEVEL {
        lines.push(SpellLineWidget {
            name: synthetic_spell_name(level, index),
            value: String::new(),
        });
    }
    lines
}

impl FormModel {
    /// Build the model from a sheet's flat field list.
    pub fn build(fields: &[FieldRecord], avatar_data_url: Option<String>) -> Self {
        let index = FieldIndex::build(fields);
        let magic = MagicModel::from_fields(fields);

        let sections = field_groups()
            .iter()
            .map(|group| Section {
                id: group.id.to_string(),
                title: group.title.to_string(),
                layout: group.layout,
                fields: group
                    .fields
                    .iter()
                    .map(|(name, label)| {
                        if *name == AVATAR_FIELD {
                            FormField::Avatar
                        } else {
                            FormField::Text(TextField::from_config(name, label, &index))
                        }
                    })
                    .collect(),
            })
            .collect();

        let levels = magic
            .levels
            .iter()
            .enumerate()
            .map(|(level, entry)| {
                let slots = (level >= 1).then(|| {
                    let (total_name, remaining_name) = slot_names_for_level(level);
                    SlotInputs {
                        total: TextField {
                            value: entry
                                .slots
                                .total
                                .as_ref()
                                .map(|s| s.value.clone())
                                .unwrap_or_default(),
                            display: entry
                                .slots
                                .total
                                .as_ref()
                                .map(|s| s.value.clone())
                                .unwrap_or_default(),
                            label: format!("Level {level} slots — total"),
                            numeric: true,
                            long: false,
                            name: total_name,
                        },
                        remaining: TextField {
                            value: entry
                                .slots
                                .remaining
                                .as_ref()
                                .map(|s| s.value.clone())
                                .unwrap_or_default(),
                            display: entry
                                .slots
                                .remaining
                                .as_ref()
                                .map(|s| s.value.clone())
                                .unwrap_or_default(),
                            label: format!("Level {level} slots — remaining"),
                            numeric: true,
                            long: false,
                            name: remaining_name,
                        },
                    }
                });
                LevelBox {
                    level,
                    slots,
                    lines: spell_lines(&entry.spells, level),
                }
            })
            .collect();

        let unassigned = magic
            .unassigned
            .iter()
            .map(|entry| SpellLineWidget {
                name: entry.name.clone(),
                value: entry.value.clone(),
            })
            .collect();

        let mut model = Self {
            sections,
            levels,
            unassigned,
            passthrough: Vec::new(),
            avatar_data_url,
        };
        model.passthrough = model.collect_passthrough(fields);
        model
    }

    /// Imported records that ended up with no widget: anything that is
    /// not a configured static field, not a slot input, and not a
    /// rendered spell line. Empty values are dropped the way unrendered
    /// inputs always were.
    fn collect_passthrough(&self, fields: &[FieldRecord]) -> Vec<FieldRecord> {
        let mut widget_names: Vec<String> = Vec::new();
        for section in &self.sections {
            for field in &section.fields {
                if let FormField::Text(text) = field {
                    widget_names.push(text.name.clone());
                }
            }
        }
        for level in &self.levels {
            if let Some(slots) = &level.slots {
                widget_names.push(slots.total.name.clone());
                widget_names.push(slots.remaining.name.clone());
            }
            for line in &level.lines {
                widget_names.push(line.name.clone());
            }
        }
        for line in &self.unassigned {
            widget_names.push(line.name.clone());
        }

        fields
            .iter()
            .filter(|field| {
                let name = normalize_name(&field.name);
                !name.is_empty()
                    && !field.value().trim().is_empty()
                    && !widget_names.iter().any(|w| w == &name)
            })
            .map(|field| {
                let mut record = field.clone();
                record.name = normalize_name(&record.name);
                record
            })
            .collect()
    }

    /// Serialize every widget back into the flat field list.
    ///
    /// Spell lines whose value trims to empty are skipped; everything
    /// else is emitted even when empty, mirroring the editable surface.
    pub fn to_fields(&self) -> Vec<FieldRecord> {
        let mut out = Vec::new();
        for section in &self.sections {
            for field in &section.fields {
                if let FormField::Text(text) = field {
                    out.push(FieldRecord::new(text.name.clone(), text.value.clone()));
                }
            }
        }
        for level in &self.levels {
            if let Some(slots) = &level.slots {
                out.push(FieldRecord::new(
                    slots.total.name.clone(),
                    slots.total.value.clone(),
                ));
                out.push(FieldRecord::new(
                    slots.remaining.name.clone(),
                    slots.remaining.value.clone(),
                ));
            }
            for line in &level.lines {
                if line.value.trim().is_empty() {
                    continue;
                }
                out.push(FieldRecord::new(line.name.clone(), line.value.clone()));
            }
        }
        for line in &self.unassigned {
            if line.value.trim().is_empty() {
                continue;
            }
            out.push(FieldRecord::new(line.name.clone(), line.value.clone()));
        }
        out.extend(self.passthrough.iter().cloned());
        out
    }

    /// Current value of a static or slot field, if the widget exists.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        for section in &self.sections {
            for field in &section.fields {
                if let FormField::Text(text) = field {
                    if text.name == name {
                        return Some(&text.value);
                    }
                }
            }
        }
        for level in &self.levels {
            if let Some(slots) = &level.slots {
                if slots.total.name == name {
                    return Some(&slots.total.value);
                }
                if slots.remaining.name == name {
                    return Some(&slots.remaining.value);
                }
            }
        }
        None
    }

    /// Overwrite a widget's value in place. Unknown names are ignored.
    pub fn set_field_value(&mut self, name: &str, value: &str) {
        for section in &mut self.sections {
            for field in &mut section.fields {
                if let FormField::Text(text) = field {
                    if text.name == name {
                        text.value = value.to_string();
                        text.display = value.to_string();
                        return;
                    }
                }
            }
        }
        for level in &mut self.levels {
            if let Some(slots) = &mut level.slots {
                if slots.total.name == name {
                    slots.total.value = value.to_string();
                    slots.total.display = value.to_string();
                    return;
                }
                if slots.remaining.name == name {
                    slots.remaining.value = value.to_string();
                    slots.remaining.display = value.to_string();
                    return;
                }
            }
        }
    }

    /// Overwrite a spell line's value (the slug, or empty to clear).
    /// Unknown names are ignored.
    pub fn set_spell_line_value(&mut self, name: &str, value: &str) {
        for level in &mut self.levels {
            for line in &mut level.lines {
                if line.name == name {
                    line.value = value.to_string();
                    return;
                }
            }
        }
        for line in &mut self.unassigned {
            if line.name == name {
                line.value = value.to_string();
                return;
            }
        }
    }

    /// The character's display name, defaulting to "Unnamed".
    pub fn character_name(&self) -> String {
        let name = self
            .field_value("CharacterName")
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            "Unnamed".to_string()
        } else {
            name.to_string()
        }
    }

    /// Long rest: hit points back to max, every level's remaining slots
    /// back to its total.
    pub fn long_rest(&mut self) {
        if let Some(max) = self.field_value("HPMax").and_then(|v| v.trim().parse::<i64>().ok()) {
            self.set_field_value("HPCurrent", &max.to_string());
        }
        for level in 1..self.levels.len() {
            let total = self.levels[level]
                .slots
                .as_ref()
                .and_then(|s| s.total.value.trim().parse::<i64>().ok());
            if let Some(total) = total {
                let (_, remaining_name) = slot_names_for_level(level);
                self.set_field_value(&remaining_name, &total.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Vec<FieldRecord> {
        vec![
            FieldRecord::new("CharacterName", "Mira Dawnweaver"),
            FieldRecord::new("HPMax", "38"),
            FieldRecord::new("HPCurrent", "12"),
            FieldRecord::new("SlotsTotal 19", "4"),
            FieldRecord::new("SlotsRemaining 19", "2"),
            FieldRecord::new("Spells 101", "fire-bolt"),
            FieldRecord::new("Spells 250", "magic-missile"),
            FieldRecord::new("Spells abc", "weird entry"),
            FieldRecord::new("CustomNote 7", "keep me"),
        ]
    }

    #[test]
    fn test_padding_invariant() {
        let model = FormModel::build(&sample_fields(), None);
        for level in &model.levels {
            assert_eq!(level.lines.len(), SPELL_LINES_PER_LEVEL, "level {}", level.level);
        }
        // parsed entries come first, placeholders after
        assert_eq!(model.levels[0].lines[0].value, "fire-bolt");
        assert_eq!(model.levels[1].lines[0].value, "magic-missile");
        assert!(model.levels[1].lines[1].value.is_empty());
    }

    #[test]
    fn test_padding_invariant_full_level() {
        let fields: Vec<FieldRecord> = (1..=12)
            .map(|i| FieldRecord::new(format!("Spells {}", 200 + i), format!("spell-{i}")))
            .collect();
        let model = FormModel::build(&fields, None);
        assert_eq!(model.levels[1].lines.len(), SPELL_LINES_PER_LEVEL);
    }

    #[test]
    fn test_synthetic_names() {
        assert_eq!(synthetic_spell_name(0, 0), "Spells 101");
        assert_eq!(synthetic_spell_name(1, 9), "Spells 210");
        assert_eq!(synthetic_spell_name(9, 3), "Spells 1004");
    }

    #[test]
    fn test_level_zero_has_no_slot_inputs() {
        let model = FormModel::build(&sample_fields(), None);
        assert!(model.levels[0].slots.is_none());
        for level in &model.levels[1..] {
            assert!(level.slots.is_some());
        }
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let fields = sample_fields();
        let model = FormModel::build(&fields, None);
        let out = model.to_fields();

        for original in &fields {
            if original.value().trim().is_empty() {
                continue;
            }
            let name = normalize_name(&original.name);
            let emitted = out
                .iter()
                .find(|f| f.name == name)
                .unwrap_or_else(|| panic!("field {name} lost on round trip"));
            assert_eq!(emitted.value(), original.value());
        }
    }

    #[test]
    fn test_round_trip_skips_empty_spell_lines() {
        let model = FormModel::build(&sample_fields(), None);
        let out = model.to_fields();
        assert!(out
            .iter()
            .filter(|f| f.name.starts_with("Spells "))
            .all(|f| !f.value().trim().is_empty()));
    }

    #[test]
    fn test_unmatched_field_passes_through() {
        let model = FormModel::build(&sample_fields(), None);
        assert_eq!(model.passthrough.len(), 1);
        assert_eq!(model.passthrough[0].name, "CustomNote 7");
        let out = model.to_fields();
        assert!(out.iter().any(|f| f.name == "CustomNote 7" && f.value() == "keep me"));
    }

    #[test]
    fn test_unassigned_spell_is_rendered_not_passed_through() {
        let model = FormModel::build(&sample_fields(), None);
        assert_eq!(model.unassigned.len(), 1);
        assert!(model.passthrough.iter().all(|f| f.name != "Spells abc"));
    }

    #[test]
    fn test_set_and_get_field_value() {
        let mut model = FormModel::build(&sample_fields(), None);
        assert_eq!(model.field_value("HPCurrent"), Some("12"));
        model.set_field_value("HPCurrent", "20");
        assert_eq!(model.field_value("HPCurrent"), Some("20"));
    }

    #[test]
    fn test_long_rest_restores_hp_and_slots() {
        let mut model = FormModel::build(&sample_fields(), None);
        model.long_rest();
        assert_eq!(model.field_value("HPCurrent"), Some("38"));
        assert_eq!(model.field_value("SlotsRemaining 19"), Some("4"));
        // levels with no slot data stay empty
        assert_eq!(model.field_value("SlotsRemaining 20"), Some(""));
    }

    #[test]
    fn test_set_spell_line_value() {
        let mut model = FormModel::build(&sample_fields(), None);
        model.set_spell_line_value("Spells 101", "guidance");
        assert_eq!(model.levels[0].lines[0].value, "guidance");
        model.set_spell_line_value("Spells abc", "");
        assert!(model.unassigned[0].value.is_empty());
    }

    #[test]
    fn test_character_name_default() {
        let model = FormModel::build(&[], None);
        assert_eq!(model.character_name(), "Unnamed");
        let named = FormModel::build(&[FieldRecord::new("CharacterName", "  Brill  ")], None);
        assert_eq!(named.character_name(), "Brill");
    }

    #[test]
    fn test_numeric_field_detection() {
        assert!(is_numeric_field("HPMax"));
        assert!(is_numeric_field("SlotsRemaining 23"));
        assert!(!is_numeric_field("CharacterName"));
        assert!(!is_numeric_field("SlotsTotal 28"));
    }
}
