//! Dotted path resolution into nested values.
//!
//! A path such as `"user.address.city"` is split on `.` into raw segments
//! (there is no escaping, so keys containing a literal dot cannot be
//! addressed). Resolution descends one segment per level through
//! [`Value::Map`] and [`Value::Collection`] containers.
//!
//! The outcome is reported through [`Lookup`] rather than a sentinel
//! value, so "not found" can never be confused with a found value that
//! happens to equal the input.
//!
//! # Partial matches
//!
//! When a segment matches but its value is a scalar while more segments
//! remain, resolution stops and returns that scalar as [`Lookup::Partial`].
//! Callers that read values treat a partial match as found.
//!
//! ```
//! use standout_collection::{path, Value};
//! use serde_json::json;
//!
//! let data = Value::from(json!({"user": {"name": "Ada", "age": 36}}));
//!
//! assert_eq!(path::resolve(&data, "user.name").value(), Some(&Value::from("Ada")));
//! assert!(path::resolve(&data, "user.email").is_missing());
//!
//! // "age" is a scalar, so ".years" is never looked at
//! let partial = path::resolve(&data, "user.age.years");
//! assert!(partial.is_partial());
//! assert_eq!(partial.value(), Some(&Value::from(36)));
//! ```

use crate::items::Items;
use crate::key::Key;
use crate::value::Value;

/// Result of resolving a path against a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Every segment matched.
    Found(&'a Value),
    /// A scalar was reached with segments left over; `depth` segments matched.
    Partial { value: &'a Value, depth: usize },
    /// Some segment did not exist at its level.
    Missing,
}

impl<'a> Lookup<'a> {
    /// The resolved value, treating partial matches as found.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) | Lookup::Partial { value, .. } => Some(value),
            Lookup::Missing => None,
        }
    }

    /// Returns `true` unless the path was missing.
    pub fn is_found(self) -> bool {
        !self.is_missing()
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Lookup::Missing)
    }

    pub fn is_partial(self) -> bool {
        matches!(self, Lookup::Partial { .. })
    }
}

/// Splits a path into its raw segments.
///
/// The empty path has no segments and addresses the target itself.
pub fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

/// Resolves `path` against `target`.
pub fn resolve<'a>(target: &'a Value, path: &str) -> Lookup<'a> {
    let segments = segments(path);
    if segments.is_empty() {
        return Lookup::Found(target);
    }
    match target.as_items() {
        Some(items) => walk(items, &segments),
        None => Lookup::Missing,
    }
}

/// Resolves `path` against the entries of a mapping.
///
/// The empty path addresses nothing, since there is no value to return.
pub fn resolve_in<'a>(items: &'a Items, path: &str) -> Lookup<'a> {
    let segments = segments(path);
    if segments.is_empty() {
        return Lookup::Missing;
    }
    walk(items, &segments)
}

fn walk<'a>(items: &'a Items, segments: &[&str]) -> Lookup<'a> {
    let mut current = items;
    for (depth, segment) in segments.iter().enumerate() {
        let Some(value) = current.get_segment(segment) else {
            return Lookup::Missing;
        };
        let remaining = segments.len() - depth - 1;
        if remaining == 0 {
            return Lookup::Found(value);
        }
        match value.as_items() {
            Some(next) => current = next,
            None => {
                return Lookup::Partial {
                    value,
                    depth: depth + 1,
                }
            }
        }
    }
    Lookup::Missing
}

/// Writes `value` at `path`, creating intermediate maps as needed.
///
/// Intermediate scalars in the way are replaced by maps. Nested
/// collections along the path are descended into and updated, and lose
/// any sort chain they carried.
pub fn put(items: &mut Items, path: &str, value: Value) {
    let segments = segments(path);
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = items;
    for segment in parents {
        let key = Key::from(*segment);
        if !current.get(&key).is_some_and(Value::is_container) {
            current.insert(key.clone(), Value::Map(Items::new()));
        }
        current = match current.get_mut(&key) {
            Some(Value::Map(next)) => next,
            Some(Value::Collection(next)) => next.items_for_insert(),
            _ => return,
        };
    }
    current.insert(Key::from(*last), value);
}

/// Removes the entry at `path`. Returns the removed value.
pub fn forget(items: &mut Items, path: &str) -> Option<Value> {
    let segments = segments(path);
    let (last, parents) = segments.split_last()?;
    let mut current = items;
    for segment in parents {
        current = match current.get_mut(&Key::from(*segment))? {
            Value::Map(next) => next,
            Value::Collection(next) => next.items_mut(),
            _ => return None,
        };
    }
    current.remove(&Key::from(*last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> Value {
        Value::from(json!({
            "name": "desk",
            "dims": {"w": 120, "h": 75},
            "tags": ["oak", "large"],
            "empty": null,
        }))
    }

    #[test]
    fn splits_on_dots() {
        assert_eq!(segments("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(segments("a"), vec!["a"]);
        assert!(segments("").is_empty());
        assert_eq!(segments("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn resolves_nested_keys() {
        let data = data();
        assert_eq!(resolve(&data, "dims.w"), Lookup::Found(&Value::from(120)));
        assert_eq!(resolve(&data, "name"), Lookup::Found(&Value::from("desk")));
    }

    #[test]
    fn resolves_list_positions() {
        let data = data();
        assert_eq!(resolve(&data, "tags.1").value(), Some(&Value::from("large")));
        assert!(resolve(&data, "tags.2").is_missing());
    }

    #[test]
    fn missing_segment_is_missing() {
        let data = data();
        assert!(resolve(&data, "price").is_missing());
        assert!(resolve(&data, "dims.d").is_missing());
    }

    #[test]
    fn found_null_is_not_missing() {
        let data = data();
        assert_eq!(resolve(&data, "empty"), Lookup::Found(&Value::Null));
    }

    #[test]
    fn partial_match_returns_scalar() {
        let data = data();
        let lookup = resolve(&data, "name.first.letter");
        assert_eq!(
            lookup,
            Lookup::Partial {
                value: &Value::from("desk"),
                depth: 1
            }
        );
        assert!(lookup.is_found());
        assert_eq!(lookup.value(), Some(&Value::from("desk")));
    }

    #[test]
    fn scalar_root_is_missing() {
        assert!(resolve(&Value::from(5), "a").is_missing());
    }

    #[test]
    fn empty_path_is_the_target() {
        let target = Value::from(5);
        assert_eq!(resolve(&target, ""), Lookup::Found(&target));
    }

    #[test]
    fn value_equal_to_input_is_found() {
        let inner = json!({"a": 1});
        let data = Value::from(json!({"self": inner.clone()}));
        let nested = Value::from(inner);
        // A found value equal to some other structure still reports found
        assert_eq!(resolve(&data, "self"), Lookup::Found(&nested));
    }

    #[test]
    fn put_creates_intermediate_maps() {
        let mut items = Items::new();
        put(&mut items, "a.b.c", Value::from(1));
        let root = Value::Map(items);
        assert_eq!(resolve(&root, "a.b.c").value(), Some(&Value::from(1)));
    }

    #[test]
    fn put_replaces_scalars_on_the_way() {
        let mut items = Items::new();
        items.insert(Key::from("a"), Value::from(1));
        put(&mut items, "a.b", Value::from(2));
        let root = Value::Map(items);
        assert_eq!(resolve(&root, "a.b").value(), Some(&Value::from(2)));
    }

    #[test]
    fn forget_removes_nested_entry() {
        let Value::Map(mut items) = data() else {
            unreachable!()
        };
        assert_eq!(forget(&mut items, "dims.w"), Some(Value::from(120)));
        assert_eq!(forget(&mut items, "dims.w"), None);
        assert_eq!(forget(&mut items, "name.x"), None);
        let root = Value::Map(items);
        assert!(resolve(&root, "dims.w").is_missing());
        assert!(resolve(&root, "dims.h").is_found());
    }
}
