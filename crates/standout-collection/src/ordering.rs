//! Value comparison and sort collation.
//!
//! Provides the loose and strict comparison rules shared by query
//! operators and sorting, [`Dir`] for sort direction and [`Collation`]
//! for choosing how sort keys are compared.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::items::Items;
use crate::value::{Number, Value};

/// Loosely compares two values.
///
/// - null and booleans compare against the other side's truthiness
///   (null against a string compares as `""`)
/// - numbers compare numerically; a number against a numeric string
///   compares numerically, otherwise as strings
/// - two numeric strings compare numerically, other strings bytewise
/// - containers compare by length, then entry by entry; they sort after scalars
///
/// Returns `None` when the values cannot be ordered (NaN, or containers
/// whose keys differ).
pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), _) => Some(x.cmp(&b.is_truthy())),
        (_, Value::Bool(y)) => Some(a.is_truthy().cmp(y)),
        (Value::Null, Value::String(s)) => Some("".cmp(s.as_str())),
        (Value::String(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Null, _) => Some(false.cmp(&b.is_truthy())),
        (_, Value::Null) => Some(a.is_truthy().cmp(&false)),
        (Value::Number(x), Value::Number(y)) => x.compare(*y),
        (Value::Number(x), Value::String(s)) => number_against_string(*x, s),
        (Value::String(s), Value::Number(y)) => {
            number_against_string(*y, s).map(Ordering::reverse)
        }
        (Value::String(x), Value::String(y)) => match (Number::parse(x), Number::parse(y)) {
            (Some(nx), Some(ny)) => nx.compare(ny),
            _ => Some(x.cmp(y)),
        },
        _ => match (a.as_items(), b.as_items()) {
            (Some(x), Some(y)) => compare_items(x, y),
            (Some(_), None) => Some(Ordering::Greater),
            (None, Some(_)) => Some(Ordering::Less),
            (None, None) => None,
        },
    }
}

/// Loose equality (`==`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    loose_cmp(a, b) == Some(Ordering::Equal)
}

/// Strict equality (`===`): same kind and same value.
///
/// Integers and floats are different kinds. Containers must hold the
/// same keys in the same order with strictly equal values.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            x.is_integer() == y.is_integer() && x.compare(*y) == Some(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x == y,
        _ => match (a.as_items(), b.as_items()) {
            (Some(x), Some(y)) => {
                x.len() == y.len()
                    && x
                        .iter()
                        .zip(y.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && strict_eq(va, vb))
            }
            _ => false,
        },
    }
}

fn number_against_string(n: Number, s: &str) -> Option<Ordering> {
    match Number::parse(s) {
        Some(parsed) => n.compare(parsed),
        None => Some(n.to_string().as_str().cmp(s)),
    }
}

fn compare_items(a: &Items, b: &Items) -> Option<Ordering> {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        other => return Some(other),
    }
    for (key, va) in a.iter() {
        let vb = b.get(key)?;
        match loose_cmp(va, vb)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// `Equal` stays `Equal` in both directions, which keeps sorts stable.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How two sort keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collation {
    /// Loose comparison, as used by the `<`/`>` operators.
    #[default]
    Regular,
    /// Compare numeric readings; non-numeric values count as zero.
    Numeric,
    /// Compare string renderings bytewise.
    String,
    /// Compare lowercased string renderings.
    StringIgnoreCase,
    /// Natural order: digit runs compare by numeric value (`"a2" < "a10"`).
    Natural,
    /// Natural order on lowercased renderings.
    NaturalIgnoreCase,
}

impl Collation {
    /// Compares two values under this collation.
    ///
    /// Incomparable values (NaN, mismatched containers) compare equal.
    pub fn compare(self, a: &Value, b: &Value) -> Ordering {
        match self {
            Collation::Regular => loose_cmp(a, b).unwrap_or(Ordering::Equal),
            Collation::Numeric => {
                let x = a.to_number().map_or(0.0, Number::to_f64);
                let y = b.to_number().map_or(0.0, Number::to_f64);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            Collation::String => a.to_text().cmp(&b.to_text()),
            Collation::StringIgnoreCase => a
                .to_text()
                .to_lowercase()
                .cmp(&b.to_text().to_lowercase()),
            Collation::Natural => natural_cmp(&a.to_text(), &b.to_text()),
            Collation::NaturalIgnoreCase => natural_cmp(
                &a.to_text().to_lowercase(),
                &b.to_text().to_lowercase(),
            ),
        }
    }
}

/// Natural string ordering: runs of ASCII digits compare by numeric value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = digit_run(&mut left);
                let run_b = digit_run(&mut right);
                let ordering = compare_digit_runs(&run_a, &run_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
