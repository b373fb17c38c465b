//! Runtime values stored in collections.
//!
//! The [`Value`] enum is the dynamically typed payload of every collection
//! entry. Nested structure is expressed with [`Value::Map`] (a plain ordered
//! mapping) or [`Value::Collection`] (a nested collection); path resolution
//! treats both as containers.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::collection::Collection;
use crate::items::Items;
use crate::key::Key;

/// Dynamically typed collection value.
///
/// # Example
///
/// ```
/// use standout_collection::{Value, Number};
///
/// let v = Value::from(42);
/// assert_eq!(v.as_number(), Some(Number::I64(42)));
/// assert!(v.is_truthy());
/// assert!(!Value::from("0").is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Plain nested ordered mapping.
    Map(Items),
    /// Nested collection.
    Collection(Collection),
}

impl Value {
    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value can be descended into by a path.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Collection(_))
    }

    /// Truthiness: null, `false`, zero, `""`, `"0"` and empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.to_f64() != 0.0,
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::Map(items) => !items.is_empty(),
            Value::Collection(c) => !c.is_empty(),
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the entries of a `Map` or `Collection` value.
    pub fn as_items(&self) -> Option<&Items> {
        match self {
            Value::Map(items) => Some(items),
            Value::Collection(c) => Some(c.items()),
            _ => None,
        }
    }

    /// Numeric reading of this value: numbers, numeric strings and booleans.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => Number::parse(s),
            Value::Bool(b) => Some(Number::I64(*b as i64)),
            _ => None,
        }
    }

    /// String rendering used by string collation, `implode` and pattern matching.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Bool(false) => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Map(_) | Value::Collection(_) => "Array".to_string(),
        }
    }

    /// Type name used for strict comparisons and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_integer() => "int",
            Value::Number(_) => "float",
            Value::String(_) => "string",
            Value::Map(_) | Value::Collection(_) => "map",
        }
    }

    /// Converts nested collections into plain maps, recursively.
    pub fn into_plain(self) -> Value {
        match self {
            Value::Collection(c) => Value::Map(c.to_array()),
            Value::Map(items) => Value::Map(items.into_plain()),
            other => other,
        }
    }

    /// Key this value would take when used as a mapping key.
    ///
    /// Floats truncate, booleans become `0`/`1`, null becomes `""`.
    /// Containers have no key form.
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::Null => Some(Key::Str(String::new())),
            Value::Bool(b) => Some(Key::Int(*b as i64)),
            Value::Number(Number::F64(f)) => Some(Key::Int(f.trunc() as i64)),
            Value::Number(n) => Some(Key::from(n.to_string())),
            Value::String(s) => Some(Key::from(s.as_str())),
            Value::Map(_) | Value::Collection(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::I64(n)) => serializer.serialize_i64(*n),
            Value::Number(Number::U64(n)) => serializer.serialize_u64(*n),
            Value::Number(Number::F64(n)) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Map(items) => items.serialize(serializer),
            Value::Collection(c) => c.items().serialize(serializer),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to the appropriate common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for the integer variants.
    pub fn is_integer(self) -> bool {
        !matches!(self, Number::F64(_))
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Adds two numbers, staying integral while the sum fits in an `i64`.
    pub fn add(self, other: Number) -> Number {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => match a.checked_add(b) {
                Some(sum) => Number::I64(sum),
                None => Number::F64(a as f64 + b as f64),
            },
            _ => Number::F64(self.to_f64() + other.to_f64()),
        }
    }

    /// Parses a numeric string, allowing surrounding whitespace.
    pub fn parse(s: &str) -> Option<Number> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return Some(Number::U64(n));
        }
        // Rust accepts "inf" and "NaN"; numeric strings do not
        if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
            return None;
        }
        trimmed.parse::<f64>().ok().map(Number::F64)
    }

    fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(_) => None,
        }
    }
}

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u64).cmp(&b)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

// Conversions into Value

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i32, i64, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(n) => Value::Number(Number::I64(n)),
            Key::Str(s) => Value::String(s),
        }
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        Value::from(key.clone())
    }
}

impl From<Items> for Value {
    fn from(items: Items) -> Self {
        Value::Map(items)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Value::Collection(c)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Map(Items::from_values(values))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(values) => {
                Value::Map(Items::from_values(values.into_iter().map(Value::from)))
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
