//! Per-spell dice panel configuration.
//!
//! Reopening a spell's roll panel restores the last die/count/ability the
//! user picked for that spell. Configs live in local storage under the
//! versioned `spell_dice_cfg_v2_{slug}` key; the pre-versioning key is
//! still read and upgraded (its `die` field was a combined "2d8" string).

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::ports::{storage_keys, StorageProvider};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellDiceConfig {
    /// Die selector like "d8".
    pub die_sides: String,
    pub count: u32,
    /// Ability key like "WIS", or empty for a flat roll.
    pub ab_key: String,
}

impl Default for SpellDiceConfig {
    fn default() -> Self {
        Self {
            die_sides: "d20".to_string(),
            count: 1,
            ab_key: String::new(),
        }
    }
}

/// Legacy shape: `{die: "2d8", abKey: "WIS"}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyConfig {
    die: Option<String>,
    #[serde(default)]
    ab_key: String,
}

fn slug_key(slug: &str) -> String {
    let slug = if slug.is_empty() { "_unknown" } else { slug };
    format!("{}{slug}", storage_keys::SPELL_DICE_PREFIX)
}

fn legacy_slug_key(slug: &str) -> String {
    let slug = if slug.is_empty() { "_unknown" } else { slug };
    format!("{}{slug}", storage_keys::LEGACY_SPELL_DICE_PREFIX)
}

fn upgrade_legacy(raw: &str) -> Option<SpellDiceConfig> {
    let legacy: LegacyConfig = serde_json::from_str(raw).ok()?;
    let combined = legacy.die?;
    // "2d8" (or the Cyrillic "2к8" some saved configs carry)
    let re = Regex::new(r"(?i)^(\d+)[dк](\d+)$").ok()?;
    let config = match re.captures(combined.trim()) {
        Some(caps) => SpellDiceConfig {
            die_sides: format!("d{}", &caps[2]),
            count: caps[1].parse().unwrap_or(1),
            ab_key: legacy.ab_key,
        },
        None => SpellDiceConfig {
            ab_key: legacy.ab_key,
            ..SpellDiceConfig::default()
        },
    };
    Some(config)
}

/// Load the saved config for a spell, upgrading legacy entries.
pub fn load_spell_config(storage: &dyn StorageProvider, slug: &str) -> SpellDiceConfig {
    if let Some(raw) = storage.load(&slug_key(slug)) {
        if let Ok(config) = serde_json::from_str(&raw) {
            return config;
        }
    }
    if let Some(raw) = storage.load(&legacy_slug_key(slug)) {
        if let Some(config) = upgrade_legacy(&raw) {
            return config;
        }
    }
    SpellDiceConfig::default()
}

/// Persist the config under the versioned key.
pub fn save_spell_config(storage: &dyn StorageProvider, slug: &str, config: &SpellDiceConfig) {
    match serde_json::to_string(config) {
        Ok(raw) => storage.save(&slug_key(slug), &raw),
        Err(e) => tracing::warn!("failed to serialize dice config: {e}"),
    }
}
