//! Ability scores and modifier parsing.

use std::fmt;

/// The six ability scores, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// The field name carrying this ability's modifier on the sheet.
    pub fn field_name(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn parse(key: &str) -> Option<Ability> {
        Ability::ALL
            .into_iter()
            .find(|a| a.field_name().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Parse a modifier string like "+2", "-1" or "0" into an integer.
///
/// PDF exports use assorted Unicode dashes for negatives; all of them
/// normalize to a minus. Unparseable input is a 0 modifier, not an error.
pub fn parse_modifier(raw: &str) -> i32 {
    let s = raw
        .trim()
        .replace(['\u{2212}', '\u{2013}', '\u{2014}'], "-");
    if s.is_empty() {
        return 0;
    }

    // Leading signed integer; trailing garbage is ignored.
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(&s)),
    };
    let end = digits
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    digits[..end].parse::<i32>().map(|n| sign * n).unwrap_or(0)
}

/// Format a modifier with its sign, e.g. "+2" or "-1".
pub fn format_modifier(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_signed() {
        assert_eq!(parse_modifier("2"), 2);
        assert_eq!(parse_modifier("+3"), 3);
        assert_eq!(parse_modifier("-1"), -1);
        assert_eq!(parse_modifier("  0 "), 0);
    }

    #[test]
    fn test_parse_unicode_minus_variants() {
        assert_eq!(parse_modifier("\u{2212}2"), -2);
        assert_eq!(parse_modifier("\u{2013}4"), -4);
        assert_eq!(parse_modifier("\u{2014}1"), -1);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_modifier(""), 0);
        assert_eq!(parse_modifier("abc"), 0);
        assert_eq!(parse_modifier("--2"), 0);
    }

    #[test]
    fn test_parse_trailing_garbage_ignored() {
        assert_eq!(parse_modifier("3 (prof)"), 3);
    }

    #[test]
    fn test_ability_lookup() {
        assert_eq!(Ability::parse("wis"), Some(Ability::Wisdom));
        assert_eq!(Ability::parse("STR"), Some(Ability::Strength));
        assert_eq!(Ability::parse("LUCK"), None);
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(2), "+2");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-3), "-3");
    }
}
