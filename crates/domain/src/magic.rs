//! Reconciliation of the flat field list into the per-level magic model.
//!
//! The imported PDF schema encodes spell slots and known spells through
//! numeric field ids:
//!
//! - `SlotsTotal {N}` / `SlotsRemaining {N}` encode a slot level as
//!   `N - 18`, recognized only for levels 1..=9.
//! - `Spells {id}` is bucketed into a level via an explicit override
//!   table of observed irregular ids, else `clamp(id / 100 - 1, 0, 9)`.
//!
//! The model is a view: it is rebuilt from scratch on every load or save
//! and never persisted. Malformed names are skipped, never an error.

use crate::fields::{normalize_name, FieldRecord};

/// Number of spell levels in the model (cantrips at 0 through level 9).
pub const MAGIC_LEVELS: usize = 10;

/// Spell ids whose level does not follow the hundreds rule.
///
/// Observed corrections for the upstream PDF field-naming scheme; there
/// is no documented derivation, so this stays a literal table.
const EXPLICIT_SPELL_LEVELS: &[(u32, usize)] = &[
    (1014, 0),
    (1016, 0),
    (1017, 0),
    (1018, 0),
    (1015, 1),
    (1023, 1),
    (1024, 1),
    (1025, 1),
    (1026, 1),
    (1046, 2),
    (1034, 2),
    (1035, 2),
    (1048, 3),
    (1047, 3),
];

/// Slot level encoded in a `SlotsTotal {N}` / `SlotsRemaining {N}` name,
/// if the id maps into levels 1..=9.
pub fn slot_level_from_name(name: &str) -> Option<usize> {
    let id = name
        .strip_prefix("SlotsTotal ")
        .or_else(|| name.strip_prefix("SlotsRemaining "))?;
    let id: i64 = id.parse().ok()?;
    let level = id - 18;
    (1..=9).contains(&level).then_some(level as usize)
}

/// Field names carrying the slot pair for a level (`N = 18 + level`).
pub fn slot_names_for_level(level: usize) -> (String, String) {
    let id = 18 + level;
    (
        format!("SlotsTotal {id}"),
        format!("SlotsRemaining {id}"),
    )
}

/// Level for a `Spells {id}` field: explicit table first, then the
/// hundreds rule clamped into 0..=9.
pub fn infer_spell_level(id: u32) -> usize {
    if let Some((_, level)) = EXPLICIT_SPELL_LEVELS.iter().find(|(k, _)| *k == id) {
        return *level;
    }
    let level = (id / 100) as i64 - 1;
    level.clamp(0, 9) as usize
}

/// One named slot value (total or remaining) at a level.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotField {
    pub name: String,
    pub value: String,
}

/// The total/remaining pair for a level; either side may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotPair {
    pub total: Option<SlotField>,
    pub remaining: Option<SlotField>,
}

/// One known spell entry parsed from the field list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellLineEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagicLevel {
    pub slots: SlotPair,
    pub spells: Vec<SpellLineEntry>,
}

/// Derived per-level view of slots and spell lines, plus the entries
/// whose id could not be parsed at all.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicModel {
    pub levels: [MagicLevel; MAGIC_LEVELS],
    pub unassigned: Vec<SpellLineEntry>,
}

impl Default for MagicModel {
    fn default() -> Self {
        Self {
            levels: std::array::from_fn(|_| MagicLevel::default()),
            unassigned: Vec::new(),
        }
    }
}

impl MagicModel {
    /// Build the model from the flat field list.
    ///
    /// Fields that are neither slot nor spell entries are left alone;
    /// callers inject those into the matching widgets directly.
    pub fn from_fields(fields: &[FieldRecord]) -> Self {
        let mut model = Self::default();

        for field in fields {
            let name = normalize_name(&field.name);
            let value = field.value().to_string();

            if name.starts_with("SlotsTotal ") || name.starts_with("SlotsRemaining ") {
                if value.trim().is_empty() {
                    continue;
                }
                if let Some(level) = slot_level_from_name(&name) {
                    let slot = SlotField {
                        name: name.clone(),
                        value,
                    };
                    let pair = &mut model.levels[level].slots;
                    if name.starts_with("SlotsTotal ") {
                        pair.total = Some(slot);
                    } else {
                        pair.remaining = Some(slot);
                    }
                }
                continue;
            }

            if let Some(rest) = name.strip_prefix("Spells ") {
                let value = value.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                let entry = SpellLineEntry {
                    name: name.clone(),
                    value,
                };
                match rest.split(' ').next().and_then(|id| id.parse::<u32>().ok()) {
                    Some(id) => model.levels[infer_spell_level(id)].spells.push(entry),
                    None => model.unassigned.push(entry),
                }
            }
        }

        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(id: u32, value: &str) -> FieldRecord {
        FieldRecord::new(format!("Spells {id}"), value)
    }

    #[test]
    fn test_slot_level_inside_range() {
        assert_eq!(slot_level_from_name("SlotsTotal 19"), Some(1));
        assert_eq!(slot_level_from_name("SlotsRemaining 27"), Some(9));
    }

    #[test]
    fn test_slot_level_outside_range_ignored() {
        // N - 18 outside 1..=9 is not a slot field
        assert_eq!(slot_level_from_name("SlotsTotal 18"), None);
        assert_eq!(slot_level_from_name("SlotsTotal 28"), None);
        assert_eq!(slot_level_from_name("SlotsRemaining 5"), None);
        assert_eq!(slot_level_from_name("SlotsTotal x"), None);

        let model = MagicModel::from_fields(&[
            FieldRecord::new("SlotsTotal 28", "4"),
            FieldRecord::new("SlotsRemaining 17", "2"),
        ]);
        assert!(model.levels.iter().all(|l| l.slots == SlotPair::default()));
    }

    #[test]
    fn test_empty_slot_value_ignored() {
        let model = MagicModel::from_fields(&[FieldRecord::new("SlotsTotal 19", "   ")]);
        assert!(model.levels[1].slots.total.is_none());
    }

    #[test]
    fn test_slot_pair_assignment() {
        let model = MagicModel::from_fields(&[
            FieldRecord::new("SlotsTotal 20", "3"),
            FieldRecord::new("SlotsRemaining 20", "1"),
        ]);
        let pair = &model.levels[2].slots;
        assert_eq!(pair.total.as_ref().unwrap().value, "3");
        assert_eq!(pair.remaining.as_ref().unwrap().value, "1");
    }

    #[test]
    fn test_explicit_table_overrides_fallback() {
        // 1014 would be level 9 by the hundreds rule; the table says 0
        assert_eq!(infer_spell_level(1014), 0);
        assert_eq!(infer_spell_level(1026), 1);
        assert_eq!(infer_spell_level(1046), 2);
        assert_eq!(infer_spell_level(1048), 3);
    }

    #[test]
    fn test_fallback_hundreds_rule() {
        assert_eq!(infer_spell_level(250), 1);
        assert_eq!(infer_spell_level(950), 8);
        assert_eq!(infer_spell_level(50), 0);
        // clamped at the top
        assert_eq!(infer_spell_level(2500), 9);
    }

    #[test]
    fn test_spells_bucketed_by_level() {
        let model = MagicModel::from_fields(&[
            spell(101, "fire-bolt"),
            spell(250, "magic-missile"),
            spell(1014, "guidance"),
        ]);
        let names =
            |level: usize| -> Vec<&str> { model.levels[level].spells.iter().map(|s| s.value.as_str()).collect() };
        assert_eq!(names(0), vec!["fire-bolt", "guidance"]);
        assert_eq!(names(1), vec!["magic-missile"]);
    }

    #[test]
    fn test_unparseable_id_goes_unassigned() {
        let model = MagicModel::from_fields(&[FieldRecord::new("Spells abc", "mystery")]);
        assert_eq!(model.unassigned.len(), 1);
        assert_eq!(model.unassigned[0].name, "Spells abc");
        assert_eq!(model.unassigned[0].value, "mystery");
    }

    #[test]
    fn test_empty_spell_value_skipped() {
        let model = MagicModel::from_fields(&[spell(101, "  ")]);
        assert!(model.levels[0].spells.is_empty());
        assert!(model.unassigned.is_empty());
    }

    #[test]
    fn test_unrelated_fields_untouched() {
        let model = MagicModel::from_fields(&[
            FieldRecord::new("CharacterName", "Mira"),
            FieldRecord::new("AC", "15"),
        ]);
        assert_eq!(model, MagicModel::default());
    }
}
