//! Vellum Domain - pure data-transformation logic for the character sheet client.
//!
//! Everything in this crate is synchronous and free of I/O: field-record
//! normalization, reconciliation of the imported field schema into the
//! per-level magic model, the form model the renderer consumes, dice
//! arithmetic, and the numeric-field expression calculator. Network and
//! storage concerns live in `vellum-player`.

pub mod abilities;
pub mod calc;
pub mod dice;
pub mod fields;
pub mod form;
pub mod magic;

pub use abilities::{parse_modifier, Ability};
pub use dice::{Die, RollOutcome, RollSpec};
pub use fields::{normalize_name, FieldIndex, FieldRecord};
pub use form::{FieldGroup, FormModel, LayoutHint, SPELL_LINES_PER_LEVEL};
pub use magic::{MagicLevel, MagicModel, SpellLineEntry};
