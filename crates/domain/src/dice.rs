//! Dice arithmetic for ability-check-style rolls.
//!
//! A roll is `count` independent uniform draws over `[1, sides]`, summed,
//! plus an optional ability modifier. The RNG is injected via closure so
//! outcomes stay deterministic under test; `vellum-player` supplies a
//! `rand`-backed roller.

use std::fmt;

/// Die types offered by the roll panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl Die {
    pub const ALL: [Die; 6] = [Die::D4, Die::D6, Die::D8, Die::D10, Die::D12, Die::D20];

    pub fn sides(self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
        }
    }

    /// Parse a die selector like "d8" (whitespace and case tolerated).
    /// Anything unrecognized falls back to d20, the panel default.
    pub fn parse(raw: &str) -> Die {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let sides = compact
            .strip_prefix(['d', 'D'])
            .and_then(|rest| rest.parse::<u32>().ok());
        match sides {
            Some(4) => Die::D4,
            Some(6) => Die::D6,
            Some(8) => Die::D8,
            Some(10) => Die::D10,
            Some(12) => Die::D12,
            _ => Die::D20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Die::D4 => "d4",
            Die::D6 => "d6",
            Die::D8 => "d8",
            Die::D10 => "d10",
            Die::D12 => "d12",
            Die::D20 => "d20",
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A roll request: die type, how many, and the flat modifier to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSpec {
    pub die: Die,
    pub count: u32,
    pub modifier: i32,
}

impl RollSpec {
    /// Count is clamped to at least one die.
    pub fn new(die: Die, count: u32, modifier: i32) -> Self {
        Self {
            die,
            count: count.max(1),
            modifier,
        }
    }

    /// Display expression like "3d6+2" or "1d20-1".
    pub fn expr(&self) -> String {
        let base = format!("{}d{}", self.count, self.die.sides());
        if self.modifier > 0 {
            format!("{base}+{}", self.modifier)
        } else if self.modifier < 0 {
            format!("{base}{}", self.modifier)
        } else {
            base
        }
    }

    /// Roll using the injected die roller.
    ///
    /// `roll_die` receives the number of sides and must return a draw in
    /// `[1, sides]`.
    pub fn roll_with(&self, mut roll_die: impl FnMut(u32) -> u32) -> RollOutcome {
        let rolls: Vec<u32> = (0..self.count).map(|_| roll_die(self.die.sides())).collect();
        let total = rolls.iter().map(|r| *r as i64).sum::<i64>() + self.modifier as i64;
        let breakdown = format_breakdown(&rolls, self.modifier);
        RollOutcome {
            spec: *self,
            rolls,
            total,
            breakdown,
        }
    }
}

/// Result of one roll, with the human-readable breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct RollOutcome {
    pub spec: RollSpec,
    pub rolls: Vec<u32>,
    pub total: i64,
    pub breakdown: String,
}

/// Join the addends with " + " and append the modifier suffix.
///
/// Negative modifiers use a true minus sign (U+2212) in the suffix.
pub fn format_breakdown(rolls: &[u32], modifier: i32) -> String {
    let base = rolls
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" + ");
    if modifier == 0 {
        return base;
    }
    let sign = if modifier > 0 { '+' } else { '\u{2212}' };
    format!("{base} {sign} {}", modifier.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_die_variants() {
        assert_eq!(Die::parse("d8"), Die::D8);
        assert_eq!(Die::parse(" D12 "), Die::D12);
        assert_eq!(Die::parse("d 10"), Die::D10);
    }

    #[test]
    fn test_parse_die_fallback_is_d20() {
        assert_eq!(Die::parse("d7"), Die::D20);
        assert_eq!(Die::parse("nonsense"), Die::D20);
        assert_eq!(Die::parse(""), Die::D20);
    }

    #[test]
    fn test_count_clamped_to_one() {
        assert_eq!(RollSpec::new(Die::D6, 0, 0).count, 1);
    }

    #[test]
    fn test_expr_formatting() {
        assert_eq!(RollSpec::new(Die::D6, 3, 2).expr(), "3d6+2");
        assert_eq!(RollSpec::new(Die::D20, 1, -1).expr(), "1d20-1");
        assert_eq!(RollSpec::new(Die::D8, 2, 0).expr(), "2d8");
    }

    #[test]
    fn test_roll_total_in_range() {
        let spec = RollSpec::new(Die::D6, 3, 2);
        let mut seed = 0u32;
        for _ in 0..100 {
            let outcome = spec.roll_with(|sides| {
                seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
                seed % sides + 1
            });
            assert!((5..=20).contains(&outcome.total), "total {}", outcome.total);
        }
    }

    #[test]
    fn test_breakdown_addend_count() {
        let spec = RollSpec::new(Die::D6, 3, 2);
        let outcome = spec.roll_with(|_| 4);
        assert_eq!(outcome.breakdown, "4 + 4 + 4 + 2");
        assert_eq!(outcome.breakdown.split(" + ").count(), 4); // 3 addends + modifier suffix
        assert_eq!(outcome.total, 14);
    }

    #[test]
    fn test_breakdown_negative_modifier_uses_minus_sign() {
        assert_eq!(format_breakdown(&[3, 1], -2), "3 + 1 \u{2212} 2");
    }

    #[test]
    fn test_breakdown_no_modifier() {
        assert_eq!(format_breakdown(&[5], 0), "5");
    }
}
