//! Clause types for query predicates.
//!
//! A [`Clause`] pairs a dotted path with a [`Predicate`]. Every `where_*`
//! method on the eager and lazy collections builds one clause and keeps
//! the items it matches.

use deunicode::deunicode;
use regex::Regex;

use crate::error::Result;
use crate::op::Op;
use crate::ordering::{loose_eq, strict_eq};
use crate::path::{self, Lookup};
use crate::value::Value;

/// A single filter predicate bound to a path.
///
/// # Example
///
/// ```
/// use standout_collection::{Clause, Op, Value};
/// use serde_json::json;
///
/// let clause = Clause::compare("stock", Op::Gt, 0);
/// assert!(clause.matches(&Value::from(json!({"stock": 3}))));
/// assert!(!clause.matches(&Value::from(json!({"stock": 0}))));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// Dotted path to the compared value; empty for the item itself.
    pub path: String,
    /// The test applied to the resolved value.
    pub predicate: Predicate,
}

/// The test a [`Clause`] applies.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `resolved <op> value`. A missing path reads as null.
    Compare { op: Op, value: Value },
    /// `min <= resolved <= max`. Missing paths never match.
    Between { min: Value, max: Value },
    /// `resolved < min || resolved > max`. Missing paths never match.
    NotBetween { min: Value, max: Value },
    /// Membership in a set, loosely or strictly compared.
    In { set: Vec<Value>, strict: bool },
    /// Absence from a set, loosely or strictly compared.
    NotIn { set: Vec<Value>, strict: bool },
    /// Wildcard pattern match on string or number values.
    Like(LikePattern),
    /// Regular expression match on string or number values.
    Regex(Regex),
    /// Resolved value is null (or the path is missing).
    Null,
    /// Resolved value is not null.
    NotNull,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(path: impl Into<String>, predicate: Predicate) -> Self {
        Clause {
            path: path.into(),
            predicate,
        }
    }

    /// Shorthand for a [`Predicate::Compare`] clause.
    pub fn compare(path: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Clause::new(
            path,
            Predicate::Compare {
                op,
                value: value.into(),
            },
        )
    }

    /// Compare clause with the operator given by its symbol.
    pub fn op(path: impl Into<String>, symbol: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Clause::compare(path, Op::parse(symbol)?, value))
    }

    pub fn between(path: impl Into<String>, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Clause::new(
            path,
            Predicate::Between {
                min: min.into(),
                max: max.into(),
            },
        )
    }

    pub fn not_between(
        path: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Clause::new(
            path,
            Predicate::NotBetween {
                min: min.into(),
                max: max.into(),
            },
        )
    }

    pub fn is_in<I, V>(path: impl Into<String>, set: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set = set.into_iter().map(Into::into).collect();
        Clause::new(path, Predicate::In { set, strict })
    }

    pub fn not_in<I, V>(path: impl Into<String>, set: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set = set.into_iter().map(Into::into).collect();
        Clause::new(path, Predicate::NotIn { set, strict })
    }

    pub fn like(path: impl Into<String>, pattern: &str, strict: bool) -> Self {
        Clause::new(path, Predicate::Like(LikePattern::new(pattern, strict)))
    }

    /// Regex clause; fails if `pattern` does not compile.
    pub fn regex(path: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Clause::new(path, Predicate::Regex(Regex::new(pattern)?)))
    }

    pub fn null(path: impl Into<String>) -> Self {
        Clause::new(path, Predicate::Null)
    }

    pub fn not_null(path: impl Into<String>) -> Self {
        Clause::new(path, Predicate::NotNull)
    }

    /// Evaluates this clause against an item.
    pub fn matches(&self, item: &Value) -> bool {
        let lookup = path::resolve(item, &self.path);
        self.predicate.matches(lookup)
    }
}

impl Predicate {
    /// Evaluates the predicate against a resolved lookup.
    pub fn matches(&self, lookup: Lookup<'_>) -> bool {
        let null = Value::Null;
        let resolved = lookup.value().unwrap_or(&null);
        match self {
            Predicate::Compare { op, value } => op.eval(resolved, value),
            Predicate::Between { min, max } => {
                lookup.is_found()
                    && Op::Gte.eval(resolved, min)
                    && Op::Lte.eval(resolved, max)
            }
            Predicate::NotBetween { min, max } => {
                lookup.is_found() && (Op::Lt.eval(resolved, min) || Op::Gt.eval(resolved, max))
            }
            Predicate::In { set, strict } => contains(set, resolved, *strict),
            Predicate::NotIn { set, strict } => !contains(set, resolved, *strict),
            Predicate::Like(pattern) => pattern.matches(resolved),
            Predicate::Regex(regex) => match_text(resolved).is_some_and(|t| regex.is_match(&t)),
            Predicate::Null => resolved.is_null(),
            Predicate::NotNull => !resolved.is_null(),
        }
    }
}

fn contains(set: &[Value], value: &Value, strict: bool) -> bool {
    if strict {
        set.iter().any(|candidate| strict_eq(candidate, value))
    } else {
        set.iter().any(|candidate| loose_eq(candidate, value))
    }
}

/// Text form of values eligible for pattern matching: strings and numbers.
fn match_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// How a `like` pattern is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeShape {
    /// `%needle%`
    Contains,
    /// `needle%`
    StartsWith,
    /// `%needle`
    EndsWith,
    /// `needle`
    Exact,
}

/// A `%`-wildcard pattern, classified once when the clause is built.
///
/// Only a leading and a trailing `%` are wildcards. In non-strict mode
/// both sides are transliterated to ASCII and lowercased before testing,
/// so `"%cafe%"` matches `"Café"`.
///
/// ```
/// use standout_collection::{LikePattern, LikeShape, Value};
///
/// let pattern = LikePattern::new("D%", false);
/// assert_eq!(pattern.shape(), LikeShape::StartsWith);
/// assert!(pattern.matches(&Value::from("desk")));
/// assert!(!pattern.matches(&Value::from("chair")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    shape: LikeShape,
    needle: String,
    strict: bool,
}

impl LikePattern {
    /// Classifies `pattern` by its leading and trailing `%`.
    pub fn new(pattern: &str, strict: bool) -> Self {
        let (shape, needle) = match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
            (Some(rest), Some(_)) => {
                let needle = rest.strip_suffix('%').unwrap_or(rest);
                (LikeShape::Contains, needle)
            }
            (Some(rest), None) => (LikeShape::EndsWith, rest),
            (None, Some(rest)) => (LikeShape::StartsWith, rest),
            (None, None) => (LikeShape::Exact, pattern),
        };
        let needle = if strict {
            needle.to_string()
        } else {
            fold(needle)
        };
        LikePattern {
            shape,
            needle,
            strict,
        }
    }

    pub fn shape(&self) -> LikeShape {
        self.shape
    }

    /// The needle, already folded in non-strict mode.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Tests a value. Only strings and numbers can match.
    pub fn matches(&self, value: &Value) -> bool {
        let Some(text) = match_text(value) else {
            return false;
        };
        let haystack = if self.strict { text } else { fold(&text) };
        match self.shape {
            LikeShape::Contains => haystack.contains(&self.needle),
            LikeShape::StartsWith => haystack.starts_with(&self.needle),
            LikeShape::EndsWith => haystack.ends_with(&self.needle),
            LikeShape::Exact => haystack == self.needle,
        }
    }
}

/// Case- and accent-insensitive comparable form.
fn fold(text: &str) -> String {
    deunicode(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn compare_reads_missing_as_null() {
        let clause = Clause::compare("discount", Op::Eq, Value::Null);
        assert!(clause.matches(&item(json!({"price": 3}))));
        assert!(clause.matches(&item(json!({"discount": null}))));
        assert!(!clause.matches(&item(json!({"discount": 5}))));
    }

    #[test]
    fn compare_nested_path() {
        let clause = Clause::compare("dims.w", Op::Gte, 100);
        assert!(clause.matches(&item(json!({"dims": {"w": 120}}))));
        assert!(!clause.matches(&item(json!({"dims": {"w": 80}}))));
    }

    #[test]
    fn between_is_inclusive() {
        let clause = Clause::new(
            "n",
            Predicate::Between {
                min: Value::from(1),
                max: Value::from(3),
            },
        );
        assert!(clause.matches(&item(json!({"n": 1}))));
        assert!(clause.matches(&item(json!({"n": 3}))));
        assert!(!clause.matches(&item(json!({"n": 4}))));
    }

    #[test]
    fn between_excludes_missing_paths() {
        let between = Predicate::Between {
            min: Value::Null,
            max: Value::from(10),
        };
        let not_between = Predicate::NotBetween {
            min: Value::from(5),
            max: Value::from(10),
        };
        // null would satisfy the range; a missing path still must not
        assert!(!Clause::new("n", between.clone()).matches(&item(json!({}))));
        assert!(Clause::new("n", between).matches(&item(json!({"n": null}))));
        assert!(!Clause::new("n", not_between.clone()).matches(&item(json!({}))));
        assert!(Clause::new("n", not_between).matches(&item(json!({"n": 1}))));
    }

    #[test]
    fn in_loose_and_strict() {
        let loose = Predicate::In {
            set: vec![Value::from(1), Value::from(2)],
            strict: false,
        };
        let strict = Predicate::In {
            set: vec![Value::from(1), Value::from(2)],
            strict: true,
        };
        assert!(Clause::new("v", loose).matches(&item(json!({"v": "1"}))));
        assert!(!Clause::new("v", strict.clone()).matches(&item(json!({"v": "1"}))));
        assert!(Clause::new("v", strict).matches(&item(json!({"v": 2}))));
    }

    #[test]
    fn not_in() {
        let clause = Clause::new(
            "v",
            Predicate::NotIn {
                set: vec![Value::from("a")],
                strict: false,
            },
        );
        assert!(clause.matches(&item(json!({"v": "b"}))));
        assert!(!clause.matches(&item(json!({"v": "a"}))));
    }

    #[test]
    fn like_shapes() {
        assert_eq!(LikePattern::new("%x%", true).shape(), LikeShape::Contains);
        assert_eq!(LikePattern::new("x%", true).shape(), LikeShape::StartsWith);
        assert_eq!(LikePattern::new("%x", true).shape(), LikeShape::EndsWith);
        assert_eq!(LikePattern::new("x", true).shape(), LikeShape::Exact);
        assert_eq!(LikePattern::new("%x%", true).needle(), "x");
    }

    #[test]
    fn like_single_percent_matches_everything() {
        let pattern = LikePattern::new("%", true);
        assert_eq!(pattern.shape(), LikeShape::Contains);
        assert_eq!(pattern.needle(), "");
        assert!(pattern.matches(&Value::from("anything")));
        assert!(pattern.matches(&Value::from("")));
    }

    #[test]
    fn like_non_strict_folds_case_and_accents() {
        let pattern = LikePattern::new("%CAFE%", false);
        assert!(pattern.matches(&Value::from("Le Café")));
        let strict = LikePattern::new("%CAFE%", true);
        assert!(!strict.matches(&Value::from("Le Café")));
        assert!(strict.matches(&Value::from("CAFE!")));
    }

    #[test]
    fn like_only_strings_and_numbers() {
        let pattern = LikePattern::new("1%", false);
        assert!(pattern.matches(&Value::from(123)));
        assert!(!pattern.matches(&Value::from(true)));
        assert!(!pattern.matches(&Value::Null));
        assert!(!pattern.matches(&item(json!(["1"]))));
    }

    #[test]
    fn regex_predicate() {
        let clause = Clause::new("code", Predicate::Regex(Regex::new(r"^A\d+$").unwrap()));
        assert!(clause.matches(&item(json!({"code": "A12"}))));
        assert!(!clause.matches(&item(json!({"code": "B12"}))));
        assert!(!clause.matches(&item(json!({"code": null}))));
    }

    #[test]
    fn constructors_build_predicates() {
        assert!(matches!(
            Clause::op("a", "<>", 1).unwrap().predicate,
            Predicate::Compare { op: Op::Ne, .. }
        ));
        assert!(Clause::op("a", "~", 1).is_err());
        assert!(Clause::regex("a", "(").is_err());
        let clause = Clause::is_in("a", [1, 2], true);
        assert!(matches!(clause.predicate, Predicate::In { ref set, strict: true } if set.len() == 2));
        assert!(Clause::like("p", "d%", false).matches(&item(json!({"p": "Desk"}))));
    }

    #[test]
    fn null_predicates() {
        let null = Clause::new("x", Predicate::Null);
        let not_null = Clause::new("x", Predicate::NotNull);
        assert!(null.matches(&item(json!({}))));
        assert!(null.matches(&item(json!({"x": null}))));
        assert!(not_null.matches(&item(json!({"x": 0}))));
    }
}
