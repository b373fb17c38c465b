//! Keys of an ordered mapping.
//!
//! A [`Key`] is either an integer or a string. Strings that spell a
//! canonical decimal integer (`"0"`, `"42"`, `"-7"`, but not `"07"` or
//! `"+1"`) are normalized to [`Key::Int`], so `"3"` and `3` address the
//! same slot and dotted path segments can address list positions.

use std::fmt;

use serde::{Serialize, Serializer};

/// Key of an entry in an [`Items`](crate::Items) mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer key (list positions and numeric keys).
    Int(i64),
    /// String key.
    Str(String),
}

impl Key {
    /// Returns `true` if this is an integer key.
    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    /// Returns the integer value, if this is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Str(_) => None,
        }
    }

    /// Returns `true` if this key is addressed by the given path segment.
    pub fn matches_segment(&self, segment: &str) -> bool {
        match self {
            Key::Str(s) => s == segment,
            Key::Int(n) => parse_canonical_int(segment) == Some(*n),
        }
    }
}

/// Parses strings such as `"12"` or `"-3"`; rejects `"012"`, `"+3"`, `"-0"`.
fn parse_canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s.starts_with('-') && digits == "0" {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        match parse_canonical_int(s) {
            Some(n) => Key::Int(n),
            None => Key::Str(s.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match parse_canonical_int(&s) {
            Some(n) => Key::Int(n),
            None => Key::Str(s),
        }
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::from(s.as_str())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n as i64)
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Int(n as i64)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::Int(n as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_normalize_to_int() {
        assert_eq!(Key::from("0"), Key::Int(0));
        assert_eq!(Key::from("42"), Key::Int(42));
        assert_eq!(Key::from("-7"), Key::Int(-7));
    }

    #[test]
    fn non_canonical_strings_stay_strings() {
        assert_eq!(Key::from("07"), Key::Str("07".into()));
        assert_eq!(Key::from("+1"), Key::Str("+1".into()));
        assert_eq!(Key::from("-0"), Key::Str("-0".into()));
        assert_eq!(Key::from("1.5"), Key::Str("1.5".into()));
        assert_eq!(Key::from(""), Key::Str(String::new()));
        assert_eq!(Key::from("99999999999999999999"), Key::Str("99999999999999999999".into()));
    }

    #[test]
    fn segment_matching() {
        assert!(Key::Int(2).matches_segment("2"));
        assert!(!Key::Int(2).matches_segment("02"));
        assert!(Key::Str("name".into()).matches_segment("name"));
        assert!(!Key::Str("name".into()).matches_segment("Name"));
    }

    #[test]
    fn display() {
        assert_eq!(Key::Int(5).to_string(), "5");
        assert_eq!(Key::Str("a".into()).to_string(), "a");
    }
}
