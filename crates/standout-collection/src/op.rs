//! Comparison operators for query clauses.
//!
//! The [`Op`] enum covers the relational operators accepted by
//! `where_op`. Operators are parsed from their symbolic form; anything
//! outside the supported set is rejected with
//! [`CollectionError::InvalidOperator`].

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{CollectionError, Result};
use crate::ordering::{loose_cmp, strict_eq};
use crate::value::Value;

/// Comparison operator for a query clause.
///
/// - **Loose equality**: `Eq` (`=`, `==`), `Ne` (`!=`, `<>`)
/// - **Strict equality**: `Identical` (`===`), `NotIdentical` (`!==`)
/// - **Ordering**: `Lt`, `Gt`, `Lte`, `Gte`
/// - **Three-way**: `Spaceship` (`<=>`), truthy when the operands differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Loosely equal.
    Eq,
    /// Loosely not equal.
    Ne,
    /// Same kind and value.
    Identical,
    /// Different kind or value.
    NotIdentical,
    /// Less than.
    Lt,
    /// Greater than.
    Gt,
    /// Less than or equal.
    Lte,
    /// Greater than or equal.
    Gte,
    /// Three-way comparison.
    Spaceship,
}

impl Op {
    /// Parses an operator symbol.
    ///
    /// ```
    /// use standout_collection::Op;
    ///
    /// assert_eq!(Op::parse("<>").unwrap(), Op::Ne);
    /// assert!(Op::parse("~=").is_err());
    /// ```
    pub fn parse(symbol: &str) -> Result<Op> {
        let op = match symbol {
            "=" | "==" => Op::Eq,
            "!=" | "<>" => Op::Ne,
            "===" => Op::Identical,
            "!==" => Op::NotIdentical,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::Lte,
            ">=" => Op::Gte,
            "<=>" => Op::Spaceship,
            other => return Err(CollectionError::InvalidOperator(other.to_string())),
        };
        Ok(op)
    }

    /// Evaluates `left <op> right`.
    ///
    /// Incomparable operands (NaN, mismatched containers) are unequal and
    /// unordered: `Eq` and the ordering operators are false, `Ne` and
    /// `Spaceship` are true.
    pub fn eval(self, left: &Value, right: &Value) -> bool {
        match self {
            Op::Identical => strict_eq(left, right),
            Op::NotIdentical => !strict_eq(left, right),
            _ => self.eval_ordering(loose_cmp(left, right)),
        }
    }

    /// Evaluates this operator against the result of a loose comparison.
    pub fn eval_ordering(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return matches!(self, Op::Ne | Op::NotIdentical | Op::Spaceship);
        };
        match self {
            Op::Eq | Op::Identical => ordering == Ordering::Equal,
            Op::Ne | Op::NotIdentical | Op::Spaceship => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }

    /// Returns the canonical symbol of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Identical => "===",
            Op::NotIdentical => "!==",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Lte => "<=",
            Op::Gte => ">=",
            Op::Spaceship => "<=>",
        }
    }
}

impl FromStr for Op {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self> {
        Op::parse(s)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares two values with an operator given by its symbol.
///
/// ```
/// use standout_collection::{compare, Value};
///
/// assert!(compare(&Value::from(3), "<", &Value::from("10")).unwrap());
/// assert!(!compare(&Value::from(1), "===", &Value::from("1")).unwrap());
/// ```
pub fn compare(left: &Value, op: &str, right: &Value) -> Result<bool> {
    Ok(Op::parse(op)?.eval(left, right))
}

/// Three-way loose comparison (`<=>`).
///
/// Incomparable operands order as `Greater`.
pub fn spaceship(left: &Value, right: &Value) -> Ordering {
    loose_cmp(left, right).unwrap_or(Ordering::Greater)
}
