//! What to read from an item: the item itself, a dotted path, or a callback.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::key::Key;
use crate::path::{self, Lookup};
use crate::value::Value;

/// Extractor applied to each `(value, key)` entry.
///
/// Strings convert into [`Criterion::Path`] (the empty string into
/// [`Criterion::Identity`]); use [`Criterion::by`] for callbacks.
///
/// ```
/// use standout_collection::{Criterion, Key, Value};
/// use serde_json::json;
///
/// let item = Value::from(json!({"price": {"net": 10}}));
/// let key = Key::Int(0);
///
/// let net = Criterion::from("price.net");
/// assert_eq!(net.extract(&item, &key).into_owned(), Value::from(10));
///
/// let doubled = Criterion::by(|v, _| {
///     Value::from(v.as_items().map_or(0, |items| items.len() * 2))
/// });
/// assert_eq!(doubled.extract(&item, &key).into_owned(), Value::from(2usize));
/// ```
#[derive(Clone, Default)]
pub enum Criterion {
    /// The item itself.
    #[default]
    Identity,
    /// A dotted path into the item.
    Path(String),
    /// A callback over the item and its key.
    Callback(Rc<dyn Fn(&Value, &Key) -> Value>),
}

impl Criterion {
    /// Wraps a callback.
    pub fn by<F>(f: F) -> Self
    where
        F: Fn(&Value, &Key) -> Value + 'static,
    {
        Criterion::Callback(Rc::new(f))
    }

    /// Looks the criterion up against an item.
    ///
    /// Callbacks always produce a value; only paths can be missing.
    pub fn lookup<'a>(&self, value: &'a Value, key: &Key) -> Option<Cow<'a, Value>> {
        match self {
            Criterion::Identity => Some(Cow::Borrowed(value)),
            Criterion::Path(p) => match path::resolve(value, p) {
                Lookup::Missing => None,
                found => found.value().map(Cow::Borrowed),
            },
            Criterion::Callback(f) => Some(Cow::Owned(f(value, key))),
        }
    }

    /// Extracts the criterion value, reading a missing path as null.
    pub fn extract<'a>(&self, value: &'a Value, key: &Key) -> Cow<'a, Value> {
        self.lookup(value, key).unwrap_or(Cow::Owned(Value::Null))
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Identity => f.write_str("Identity"),
            Criterion::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Criterion::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for Criterion {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            Criterion::Identity
        } else {
            Criterion::Path(path.to_string())
        }
    }
}

impl From<String> for Criterion {
    fn from(path: String) -> Self {
        if path.is_empty() {
            Criterion::Identity
        } else {
            Criterion::Path(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_borrows_item() {
        let item = Value::from(3);
        let extracted = Criterion::Identity.extract(&item, &Key::Int(0));
        assert!(matches!(extracted, Cow::Borrowed(_)));
        assert_eq!(*extracted, Value::from(3));
    }

    #[test]
    fn missing_path_reads_as_null() {
        let item = Value::from(json!({"a": 1}));
        let criterion = Criterion::from("b");
        assert!(criterion.lookup(&item, &Key::Int(0)).is_none());
        assert_eq!(*criterion.extract(&item, &Key::Int(0)), Value::Null);
    }

    #[test]
    fn callback_sees_key() {
        let item = Value::Null;
        let criterion = Criterion::by(|_, key| Value::from(key.to_string()));
        assert_eq!(
            *criterion.extract(&item, &Key::from("name")),
            Value::from("name")
        );
    }

    #[test]
    fn empty_string_is_identity() {
        assert!(matches!(Criterion::from(""), Criterion::Identity));
        assert!(matches!(Criterion::from("a.b"), Criterion::Path(_)));
    }
}
