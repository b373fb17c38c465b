//! Eager ordered collection.
//!
//! A [`Collection`] owns an [`Items`] mapping. Transformations return new
//! collections; the in-place operations (`push`, `pop`, `forget`, ...)
//! mutate the receiver and return it for chaining.
//!
//! A collection produced by `sort_by`/`then_by` also carries the sort
//! chain that produced it. Operations that insert entries drop the chain;
//! removals keep it since they cannot break the order.

mod aggregate;
mod query;

pub(crate) use aggregate::{avg_of, max_of, min_of, sum_of};

use serde::{Serialize, Serializer};

use crate::arr;
use crate::criterion::Criterion;
use crate::error::{CollectionError, Result};
use crate::items::Items;
use crate::key::Key;
use crate::lazy::LazyCollection;
use crate::ordering::{loose_eq, strict_eq};
use crate::path::{self, Lookup};
use crate::sort::SortKey;
use crate::source::Source;
use crate::value::Value;

/// Ordered key-value collection with chainable operations.
///
/// # Example
///
/// ```
/// use standout_collection::{Collection, Number};
/// use serde_json::json;
///
/// let products = Collection::new(json!([
///     {"name": "Desk", "price": 200},
///     {"name": "Chair", "price": 100},
///     {"name": "Lamp", "price": 40},
/// ]));
///
/// let names = products
///     .where_op("price", ">=", 100)
///     .unwrap()
///     .pluck("name", None);
///
/// assert_eq!(names.to_json().unwrap(), r#"["Desk","Chair"]"#);
/// assert_eq!(products.sum_by("price"), Number::I64(340));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Items,
    chain: Vec<SortKey>,
}

impl Collection {
    /// Builds a collection from any supported source.
    pub fn new(source: impl Into<Source>) -> Self {
        Collection::from_items(source.into().into_items())
    }

    pub fn empty() -> Self {
        Collection::default()
    }

    pub fn from_items(items: Items) -> Self {
        Collection {
            items,
            chain: Vec::new(),
        }
    }

    /// Builds a sorted collection that remembers the chain that ordered it.
    pub(crate) fn with_chain(items: Items, chain: Vec<SortKey>) -> Self {
        Collection { items, chain }
    }

    /// The values `1..=n` mapped through `f`, as a list.
    pub fn times(n: usize, f: impl FnMut(usize) -> Value) -> Self {
        Collection::from_items(Items::from_values((1..=n).map(f)))
    }

    /// The integers from `start` to `end` inclusive, counting down if `end < start`.
    pub fn range(start: i64, end: i64) -> Self {
        LazyCollection::range(start, end).collect()
    }

    pub(crate) fn chain(&self) -> &[SortKey] {
        &self.chain
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut Items {
        &mut self.items
    }

    /// Entries about to receive an insertion; the sort chain no longer holds.
    pub(crate) fn items_for_insert(&mut self) -> &mut Items {
        self.chain.clear();
        &mut self.items
    }

    pub fn into_items(self) -> Items {
        self.items
    }

    /// Lazy view over a snapshot of this collection.
    pub fn lazy(&self) -> LazyCollection {
        LazyCollection::from(self.clone())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Key, &Value)> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    fn derive(&self, items: Items) -> Collection {
        Collection::from_items(items)
    }

    // --- lookup ---

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.items.get(&key.into())
    }

    /// Value at `key`, or `default` when absent.
    pub fn get_or(&self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// Value at a dotted path. A partial match returns the value where
    /// the walk stopped.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.lookup(path).value()
    }

    /// Full resolution outcome for a dotted path.
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        path::resolve_in(&self.items, path)
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.items.contains_key(&key.into())
    }

    /// `true` if every key is present.
    pub fn has_all<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> bool {
        keys.into_iter().all(|k| self.has(k))
    }

    /// `true` if at least one key is present.
    pub fn has_any<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> bool {
        keys.into_iter().any(|k| self.has(k))
    }

    pub fn has_path(&self, path: &str) -> bool {
        !self.lookup(path).is_missing()
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first().map(|(_, v)| v)
    }

    pub fn first_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Option<&Value> {
        self.items.iter().find(|(k, v)| pred(v, k)).map(|(_, v)| v)
    }

    /// First matching value, or [`CollectionError::ItemNotFound`].
    ///
    /// A falsy match (`0`, `""`, null) is still a match.
    pub fn first_or_fail(&self, pred: impl FnMut(&Value, &Key) -> bool) -> Result<&Value> {
        self.first_where(pred).ok_or(CollectionError::ItemNotFound)
    }

    pub fn last(&self) -> Option<&Value> {
        self.items.last().map(|(_, v)| v)
    }

    pub fn last_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Option<&Value> {
        self.items.iter().rev().find(|(k, v)| pred(v, k)).map(|(_, v)| v)
    }

    /// Key of the first value equal to `needle`.
    pub fn search(&self, needle: &Value, strict: bool) -> Option<Key> {
        self.items
            .iter()
            .find(|(_, v)| {
                if strict {
                    strict_eq(v, needle)
                } else {
                    loose_eq(v, needle)
                }
            })
            .map(|(k, _)| k.clone())
    }

    pub fn contains(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        self.items.iter().any(|(k, v)| pred(v, k))
    }

    /// `true` if some value loosely equals `needle`.
    pub fn contains_value(&self, needle: impl Into<Value>) -> bool {
        self.search(&needle.into(), false).is_some()
    }

    pub fn contains_strict(&self, needle: impl Into<Value>) -> bool {
        self.search(&needle.into(), true).is_some()
    }

    pub fn every(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        self.items.iter().all(|(k, v)| pred(v, k))
    }

    // --- in-place ---

    fn touched(&mut self) -> &mut Self {
        self.chain.clear();
        self
    }

    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        self.items.insert(key.into(), value.into());
        self.touched()
    }

    /// Writes at a dotted path, creating intermediate maps.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        path::put(&mut self.items, path, value.into());
        self.touched()
    }

    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self.touched()
    }

    /// Adds a value at the front. Integer keys are renumbered.
    pub fn prepend(&mut self, value: impl Into<Value>) -> &mut Self {
        let mut out = Items::from_values([value.into()]);
        for (key, v) in std::mem::take(&mut self.items) {
            arr::merge_entry(&mut out, &key, v);
        }
        self.items = out;
        self.touched()
    }

    /// Adds a value at the front under `key`, replacing any entry there.
    pub fn prepend_with_key(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        self.items.prepend(key.into(), value.into());
        self.touched()
    }

    /// Inserts a value before `position`, renumbering integer keys.
    pub fn insert(&mut self, position: usize, value: impl Into<Value>) -> &mut Self {
        let offset = isize::try_from(position).unwrap_or(isize::MAX);
        self.splice(offset, Some(0), [value.into()]);
        self
    }

    /// Removes `offset..offset + length` and inserts `replacement` in its
    /// place. Integer keys are renumbered; the removed values are returned
    /// as a list.
    pub fn splice(
        &mut self,
        offset: isize,
        length: Option<isize>,
        replacement: impl IntoIterator<Item = Value>,
    ) -> Collection {
        let (start, end) = arr::slice_bounds(self.items.len(), offset, length);
        let mut head = std::mem::take(&mut self.items).into_entries();
        let tail = head.split_off(end);
        let removed = head.split_off(start);

        let mut out = Items::with_capacity(head.len() + tail.len());
        for (key, value) in head {
            arr::merge_entry(&mut out, &key, value);
        }
        for value in replacement {
            out.push(value);
        }
        for (key, value) in tail {
            arr::merge_entry(&mut out, &key, value);
        }
        self.items = out;
        self.touched();
        Collection::from_items(Items::from_values(removed.into_iter().map(|(_, v)| v)))
    }

    /// Removes and returns the last value.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop_last().map(|(_, v)| v)
    }

    /// Removes up to `count` values from the end, last first.
    pub fn pop_many(&mut self, count: usize) -> Collection {
        let popped = std::iter::from_fn(|| self.pop()).take(count);
        Collection::from_items(Items::from_values(popped))
    }

    /// Removes and returns the first value. Integer keys are renumbered.
    pub fn shift(&mut self) -> Option<Value> {
        let (_, value) = self.items.shift_first()?;
        self.items = arr::reindex(std::mem::take(&mut self.items));
        Some(value)
    }

    /// Removes up to `count` values from the front.
    pub fn shift_many(&mut self, count: usize) -> Collection {
        let mut shifted = Items::new();
        for _ in 0..count {
            match self.items.shift_first() {
                Some((_, value)) => {
                    shifted.push(value);
                }
                None => break,
            }
        }
        self.items = arr::reindex(std::mem::take(&mut self.items));
        Collection::from_items(shifted)
    }

    pub fn forget(&mut self, key: impl Into<Key>) -> &mut Self {
        self.items.remove(&key.into());
        self
    }

    pub fn forget_path(&mut self, path: &str) -> &mut Self {
        path::forget(&mut self.items, path);
        self
    }

    /// Removes the entry at `key` and returns its value.
    pub fn pull(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.items.remove(&key.into())
    }

    // --- transforms ---

    /// Maps every value, keeping keys.
    pub fn map(&self, mut f: impl FnMut(&Value, &Key) -> Value) -> Collection {
        self.derive(self.items.iter().map(|(k, v)| (k.clone(), f(v, k))).collect())
    }

    /// Maps every entry to a new `(key, value)` pair. Later duplicates win.
    pub fn map_with_keys(&self, mut f: impl FnMut(&Value, &Key) -> (Key, Value)) -> Collection {
        let mut out = Items::with_capacity(self.count());
        for (k, v) in self.items.iter() {
            let (key, value) = f(v, k);
            out.insert(key, value);
        }
        self.derive(out)
    }

    /// Keeps entries passing `pred`, with their keys.
    pub fn filter(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Collection {
        self.derive(
            self.items
                .iter()
                .filter(|(k, v)| pred(v, k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Keeps truthy values.
    pub fn filter_truthy(&self) -> Collection {
        self.filter(|v, _| v.is_truthy())
    }

    pub fn reject(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Collection {
        self.filter(move |v, k| !pred(v, k))
    }

    pub fn reduce<A>(&self, init: A, mut f: impl FnMut(A, &Value, &Key) -> A) -> A {
        self.items.iter().fold(init, |acc, (k, v)| f(acc, v, k))
    }

    /// Calls `f` for each entry until it returns `false`.
    pub fn each(&self, mut f: impl FnMut(&Value, &Key) -> bool) -> &Self {
        for (k, v) in self.items.iter() {
            if !f(v, k) {
                break;
            }
        }
        self
    }

    /// Keys as a list.
    pub fn keys(&self) -> Collection {
        self.derive(Items::from_values(self.items.keys().map(Value::from)))
    }

    /// Values as a list, keys discarded.
    pub fn values(&self) -> Collection {
        self.derive(Items::from_values(self.items.values().cloned()))
    }

    pub fn only<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> Collection {
        let wanted: Vec<Key> = keys.into_iter().map(Into::into).collect();
        self.filter(|_, k| wanted.contains(k))
    }

    pub fn except<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> Collection {
        let unwanted: Vec<Key> = keys.into_iter().map(Into::into).collect();
        self.filter(|_, k| !unwanted.contains(k))
    }

    /// First `limit` entries, or the last `-limit` when negative.
    pub fn take(&self, limit: isize) -> Collection {
        if limit < 0 {
            self.slice(limit, None)
        } else {
            self.slice(0, Some(limit))
        }
    }

    pub fn skip(&self, count: usize) -> Collection {
        self.slice(isize::try_from(count).unwrap_or(isize::MAX), None)
    }

    /// Entries in a window; see [`arr::slice_bounds`]. Keys are kept.
    pub fn slice(&self, offset: isize, length: Option<isize>) -> Collection {
        self.derive(arr::slice(&self.items, offset, length))
    }

    /// Same entries in reverse order, keys kept.
    pub fn reverse(&self) -> Collection {
        self.derive(
            self.items
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn merge(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::merge(&self.items, &other.into().into_items()))
    }

    pub fn merge_recursive(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::merge_recursive(&self.items, &other.into().into_items()))
    }

    pub fn replace(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::replace(&self.items, &other.into().into_items()))
    }

    pub fn replace_recursive(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::replace_recursive(&self.items, &other.into().into_items()))
    }

    /// Uses this collection's values as keys for `values`.
    pub fn combine(&self, values: impl Into<Source>) -> Collection {
        self.derive(arr::combine(&self.items, &values.into().into_items()))
    }

    pub fn pad(&self, size: isize, value: impl Into<Value>) -> Collection {
        self.derive(arr::pad(&self.items, size, &value.into()))
    }

    pub fn diff(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::diff(&self.items, &other.into().into_items()))
    }

    pub fn intersect(&self, other: impl Into<Source>) -> Collection {
        self.derive(arr::intersect(&self.items, &other.into().into_items()))
    }

    pub fn flip(&self) -> Collection {
        self.derive(arr::flip(&self.items))
    }

    pub fn flatten(&self, depth: Option<usize>) -> Collection {
        self.derive(arr::flatten(&self.items, depth))
    }

    pub fn collapse(&self) -> Collection {
        self.derive(arr::collapse(&self.items))
    }

    /// Drops values equal to an earlier one.
    pub fn unique(&self) -> Collection {
        self.unique_by(Criterion::Identity, false)
    }

    /// Keeps the first entry for each distinct extracted value, keys kept.
    pub fn unique_by(&self, criterion: impl Into<Criterion>, strict: bool) -> Collection {
        let criterion = criterion.into();
        let mut seen: Vec<Value> = Vec::new();
        self.filter(|v, k| {
            let id = criterion.extract(v, k).into_owned();
            let eq = if strict { strict_eq } else { loose_eq };
            if seen.iter().any(|s| eq(s, &id)) {
                false
            } else {
                seen.push(id);
                true
            }
        })
    }

    /// Splits into nested collections of at most `size` entries, keys kept.
    pub fn chunk(&self, size: usize) -> Collection {
        if size == 0 {
            return Collection::empty();
        }
        let mut chunks = Items::new();
        let mut current = Items::with_capacity(size);
        for (k, v) in self.items.iter() {
            current.insert(k.clone(), v.clone());
            if current.len() == size {
                let full = std::mem::replace(&mut current, Items::with_capacity(size));
                chunks.push(Value::Collection(Collection::from_items(full)));
            }
        }
        if !current.is_empty() {
            chunks.push(Value::Collection(Collection::from_items(current)));
        }
        self.derive(chunks)
    }

    /// Splits in one pass into `(passed, failed)`; each side keeps its
    /// keys and relative order.
    pub fn partition(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> (Collection, Collection) {
        let mut passed = Items::new();
        let mut failed = Items::new();
        for (k, v) in self.items.iter() {
            let side = if pred(v, k) { &mut passed } else { &mut failed };
            side.insert(k.clone(), v.clone());
        }
        (self.derive(passed), self.derive(failed))
    }

    /// Reads `value_path` from every item. With `key_path`, the result is
    /// keyed by the value found there.
    pub fn pluck(&self, value_path: &str, key_path: Option<&str>) -> Collection {
        let mut out = Items::with_capacity(self.count());
        for item in self.items.values() {
            let value = path::resolve(item, value_path)
                .value()
                .cloned()
                .unwrap_or_default();
            let key = key_path.and_then(|p| path::resolve(item, p).value()?.to_key());
            match key {
                Some(key) => {
                    out.insert(key, value);
                }
                None => {
                    out.push(value);
                }
            }
        }
        self.derive(out)
    }

    /// Re-keys entries by an extracted value; later duplicates win.
    pub fn key_by(&self, criterion: impl Into<Criterion>) -> Collection {
        let criterion = criterion.into();
        let mut out = Items::with_capacity(self.count());
        for (k, v) in self.items.iter() {
            if let Some(key) = criterion.extract(v, k).to_key() {
                out.insert(key, v.clone());
            }
        }
        self.derive(out)
    }

    /// Groups values into nested list collections keyed by an extracted value.
    pub fn group_by(&self, criterion: impl Into<Criterion>) -> Collection {
        let criterion = criterion.into();
        let mut groups = Items::new();
        for (k, v) in self.items.iter() {
            let Some(key) = criterion.extract(v, k).to_key() else {
                continue;
            };
            match groups.get_mut(&key) {
                Some(Value::Collection(group)) => {
                    group.push(v.clone());
                }
                _ => {
                    let group = Collection::from_items(Items::from_values([v.clone()]));
                    groups.insert(key, Value::Collection(group));
                }
            }
        }
        self.derive(groups)
    }

    /// Joins the string renderings of the values.
    pub fn implode(&self, glue: &str) -> String {
        self.implode_by(Criterion::Identity, glue)
    }

    pub fn implode_by(&self, criterion: impl Into<Criterion>, glue: &str) -> String {
        let criterion = criterion.into();
        self.items
            .iter()
            .map(|(k, v)| criterion.extract(v, k).to_text())
            .collect::<Vec<_>>()
            .join(glue)
    }

    // --- output ---

    /// Plain nested mapping with nested collections unwrapped.
    pub fn to_array(&self) -> Items {
        self.items.clone().into_plain()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl FromIterator<(Key, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Collection::from_items(iter.into_iter().collect())
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(json: serde_json::Value) -> Collection {
        Collection::new(json)
    }

    #[test]
    fn construction_from_shapes() {
        assert_eq!(Collection::new(vec![1, 2]).count(), 2);
        assert_eq!(Collection::new(Value::from("x")).count(), 1);
        assert!(Collection::new(Value::Null).is_empty());
        assert_eq!(Collection::times(3, |i| Value::from(i * 10)).to_json().unwrap(), "[10,20,30]");
        assert_eq!(Collection::range(3, 1).to_json().unwrap(), "[3,2,1]");
    }

    #[test]
    fn get_set_has() {
        let mut c = list(json!({"a": 1}));
        c.set("b", 2).set(5, "five");
        assert_eq!(c.get("b"), Some(&Value::from(2)));
        assert_eq!(c.get("5"), Some(&Value::from("five")));
        assert_eq!(c.get_or("z", 0), Value::from(0));
        assert!(c.has("a"));
        assert!(c.has_all(["a", "b"]));
        assert!(!c.has_all(["a", "z"]));
        assert!(c.has_any(["z", "b"]));
        assert!(!c.has_any(Vec::<&str>::new()));
    }

    #[test]
    fn dotted_paths() {
        let mut c = list(json!({"user": {"name": "ana", "tags": ["x", "y"]}}));
        assert_eq!(c.get_path("user.tags.1"), Some(&Value::from("y")));
        assert!(c.lookup("user.name.first").is_partial());
        assert!(!c.has_path("user.email"));
        c.set_path("user.email", "a@b.c").forget_path("user.tags");
        assert_eq!(c.to_json().unwrap(), r#"{"user":{"name":"ana","email":"a@b.c"}}"#);
    }

    #[test]
    fn push_pop_shift() {
        let mut c = list(json!([1, 2, 3]));
        c.push(4);
        assert_eq!(c.pop(), Some(Value::from(4)));
        assert_eq!(c.shift(), Some(Value::from(1)));
        assert_eq!(c.to_json().unwrap(), "[2,3]");
        c.prepend(0);
        assert_eq!(c.to_json().unwrap(), "[0,2,3]");
    }

    #[test]
    fn pop_and_shift_many_on_empty_are_empty() {
        let mut c = Collection::empty();
        assert!(c.pop_many(3).is_empty());
        assert!(c.shift_many(2).is_empty());
        assert_eq!(c.pop(), None);
        assert_eq!(c.shift(), None);
    }

    #[test]
    fn pop_and_shift_many() {
        let mut c = list(json!([1, 2, 3, 4, 5]));
        assert_eq!(c.pop_many(2).to_json().unwrap(), "[5,4]");
        assert_eq!(c.shift_many(2).to_json().unwrap(), "[1,2]");
        assert_eq!(c.to_json().unwrap(), "[3]");
    }

    #[test]
    fn shift_renumbers_integer_keys_only() {
        let mut c = list(json!({"4": "a", "k": "b", "9": "c"}));
        assert_eq!(c.shift(), Some(Value::from("a")));
        assert_eq!(c.to_json().unwrap(), r#"{"k":"b","0":"c"}"#);
        let mut c = list(json!({"7": 1, "8": 2, "9": 3}));
        c.shift_many(1);
        assert_eq!(c.to_json().unwrap(), "[2,3]");
    }

    #[test]
    fn slice_with_huge_length_runs_to_the_end() {
        let c = list(json!([1, 2, 3]));
        assert_eq!(c.slice(1, Some(isize::MAX)).to_json().unwrap(), r#"{"1":2,"2":3}"#);
        assert_eq!(c.slice(isize::MIN, Some(isize::MAX)).count(), 3);
    }

    #[test]
    fn prepend_with_key_moves_to_front() {
        let mut c = list(json!({"a": 1, "b": 2}));
        c.prepend_with_key("b", 3);
        assert_eq!(c.to_json().unwrap(), r#"{"b":3,"a":1}"#);
    }

    #[test]
    fn splice_and_insert() {
        let mut c = list(json!(["a", "b", "c", "d"]));
        let removed = c.splice(1, Some(2), [Value::from("x")]);
        assert_eq!(removed.to_json().unwrap(), r#"["b","c"]"#);
        assert_eq!(c.to_json().unwrap(), r#"["a","x","d"]"#);
        c.insert(0, "first");
        assert_eq!(c.to_json().unwrap(), r#"["first","a","x","d"]"#);
    }

    #[test]
    fn forget_and_pull() {
        let mut c = list(json!({"a": 1, "b": 2, "c": 3}));
        c.forget("a");
        assert_eq!(c.pull("b"), Some(Value::from(2)));
        assert_eq!(c.pull("b"), None);
        assert_eq!(c.to_json().unwrap(), r#"{"c":3}"#);
    }

    #[test]
    fn map_filter_reject_keep_keys() {
        let c = list(json!([1, 2, 3, 4]));
        let doubled = c.map(|v, _| Value::from(v.to_number().map_or(0.0, |n| n.to_f64()) * 2.0));
        assert_eq!(doubled.to_json().unwrap(), "[2.0,4.0,6.0,8.0]");
        let odd = c.reject(|v, _| v.to_number().is_some_and(|n| n.to_f64() % 2.0 == 0.0));
        assert_eq!(odd.to_json().unwrap(), r#"{"0":1,"2":3}"#);
        assert_eq!(list(json!([0, 1, "", "a", null])).filter_truthy().count(), 2);
    }

    #[test]
    fn reduce_and_each() {
        let c = list(json!([1, 2, 3]));
        let total = c.reduce(0.0, |acc, v, _| acc + v.to_number().map_or(0.0, |n| n.to_f64()));
        assert_eq!(total, 6.0);
        let mut seen = 0;
        c.each(|_, _| {
            seen += 1;
            seen < 2
        });
        assert_eq!(seen, 2);
    }

    #[test]
    fn first_last_and_fail() {
        let c = list(json!([0, 5, 10]));
        assert_eq!(c.first(), Some(&Value::from(0)));
        assert_eq!(c.last(), Some(&Value::from(10)));
        assert_eq!(c.first_or_fail(|v, _| !v.is_truthy()).unwrap(), &Value::from(0));
        assert!(matches!(
            c.first_or_fail(|v, _| v.is_null()),
            Err(CollectionError::ItemNotFound)
        ));
        assert_eq!(c.last_where(|v, _| v.is_truthy()), Some(&Value::from(10)));
    }

    #[test]
    fn search_contains_every() {
        let c = list(json!([1, "2", 3]));
        assert_eq!(c.search(&Value::from(2), false), Some(Key::Int(1)));
        assert_eq!(c.search(&Value::from(2), true), None);
        assert!(c.contains_value("3"));
        assert!(!c.contains_strict("3"));
        assert!(c.every(|v, _| v.to_number().is_some()));
    }

    #[test]
    fn keys_values_only_except() {
        let c = list(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(c.keys().to_json().unwrap(), r#"["a","b","c"]"#);
        assert_eq!(c.values().to_json().unwrap(), "[1,2,3]");
        assert_eq!(c.only(["a", "c"]).to_json().unwrap(), r#"{"a":1,"c":3}"#);
        assert_eq!(c.except(["a"]).to_json().unwrap(), r#"{"b":2,"c":3}"#);
    }

    #[test]
    fn take_skip_slice_reverse() {
        let c = list(json!([1, 2, 3, 4]));
        assert_eq!(c.take(2).to_json().unwrap(), "[1,2]");
        assert_eq!(c.take(-1).to_json().unwrap(), r#"{"3":4}"#);
        assert_eq!(c.skip(3).to_json().unwrap(), r#"{"3":4}"#);
        assert_eq!(c.reverse().values().to_json().unwrap(), "[4,3,2,1]");
        assert_eq!(c.reverse().keys().to_json().unwrap(), "[3,2,1,0]");
    }

    #[test]
    fn merge_family() {
        let c = list(json!({"a": 1, "b": {"x": 1}}));
        assert_eq!(
            c.merge(json!({"a": 2})).to_json().unwrap(),
            r#"{"a":2,"b":{"x":1}}"#
        );
        assert_eq!(
            c.replace_recursive(json!({"b": {"y": 2}})).to_json().unwrap(),
            r#"{"a":1,"b":{"x":1,"y":2}}"#
        );
        assert_eq!(
            c.merge_recursive(json!({"a": 3})).to_json().unwrap(),
            r#"{"a":[1,3],"b":{"x":1}}"#
        );
        assert_eq!(list(json!([1])).merge(vec![2]).to_json().unwrap(), "[1,2]");
    }

    #[test]
    fn unique_loose_and_strict() {
        let c = list(json!([1, "1", 2, 2.0, 3]));
        assert_eq!(c.unique().values().to_json().unwrap(), "[1,2,3]");
        assert_eq!(
            c.unique_by(Criterion::Identity, true).values().to_json().unwrap(),
            r#"[1,"1",2,2.0,3]"#
        );
        let people = list(json!([{"t": "a", "n": 1}, {"t": "b", "n": 2}, {"t": "a", "n": 3}]));
        assert_eq!(people.unique_by("t", false).pluck("n", None).to_json().unwrap(), "[1,2]");
    }

    #[test]
    fn chunk_keeps_keys_and_rejects_zero() {
        let c = list(json!([1, 2, 3]));
        assert_eq!(c.chunk(2).to_json().unwrap(), r#"[[1,2],{"2":3}]"#);
        assert!(c.chunk(0).is_empty());
    }

    #[test]
    fn partition_is_stable() {
        let c = list(json!([1, 2, 3, 4]));
        let (even, odd) = c.partition(|v, _| v.to_number().is_some_and(|n| n.to_f64() % 2.0 == 0.0));
        assert_eq!(even.values().to_json().unwrap(), "[2,4]");
        assert_eq!(odd.values().to_json().unwrap(), "[1,3]");
        assert_eq!(even.keys().to_json().unwrap(), "[1,3]");
    }

    #[test]
    fn flatten_and_collapse() {
        let c = list(json!([1, [2, [3]]]));
        assert_eq!(c.flatten(None).to_json().unwrap(), "[1,2,3]");
        assert_eq!(c.flatten(Some(1)).to_json().unwrap(), "[1,2,[3]]");
        assert_eq!(list(json!([[1], [2, 3]])).collapse().to_json().unwrap(), "[1,2,3]");
    }

    #[test]
    fn pluck_key_by_group_by() {
        let c = list(json!([
            {"id": 7, "name": "desk", "kind": "wood"},
            {"id": 9, "name": "lamp", "kind": "metal"},
            {"id": 3, "name": "door", "kind": "wood"},
        ]));
        assert_eq!(
            c.pluck("name", Some("id")).to_json().unwrap(),
            r#"{"7":"desk","9":"lamp","3":"door"}"#
        );
        assert_eq!(c.key_by("name").keys().to_json().unwrap(), r#"["desk","lamp","door"]"#);
        let groups = c.group_by("kind");
        assert_eq!(groups.keys().to_json().unwrap(), r#"["wood","metal"]"#);
        match groups.get("wood") {
            Some(Value::Collection(wood)) => assert_eq!(wood.count(), 2),
            other => panic!("unexpected group: {other:?}"),
        }
    }

    #[test]
    fn array_helpers() {
        let keys = list(json!(["a", "b"]));
        assert_eq!(keys.combine(vec![1, 2]).to_json().unwrap(), r#"{"a":1,"b":2}"#);
        assert_eq!(keys.pad(3, "z").to_json().unwrap(), r#"["a","b","z"]"#);
        assert_eq!(keys.flip().to_json().unwrap(), r#"{"a":0,"b":1}"#);
        assert_eq!(keys.diff(vec!["a"]).to_json().unwrap(), r#"{"1":"b"}"#);
        assert_eq!(keys.intersect(vec!["a"]).to_json().unwrap(), r#"["a"]"#);
        assert_eq!(keys.implode(", "), "a, b");
    }

    #[test]
    fn set_clears_sort_chain_but_pop_keeps_it() {
        let mut sorted = list(json!([3, 1, 2])).sort_by(Criterion::Identity);
        sorted.pop();
        assert!(sorted.then_by(Criterion::Identity).is_ok());
        sorted.push(0);
        assert!(matches!(
            sorted.then_by(Criterion::Identity),
            Err(CollectionError::UnchainedSort)
        ));
    }

    #[test]
    fn set_path_into_nested_collection_clears_its_chain() {
        let mut outer = Collection::empty();
        let inner = list(json!([3, 1])).sort_by(Criterion::Identity);
        outer.set("inner", Value::Collection(inner));
        outer.forget_path("inner.0");
        match outer.get("inner") {
            Some(Value::Collection(c)) => assert!(c.then_by(Criterion::Identity).is_ok()),
            other => panic!("unexpected: {other:?}"),
        }
        outer.set_path("inner.5", 0);
        match outer.get("inner") {
            Some(Value::Collection(c)) => {
                assert_eq!(c.count(), 2);
                assert!(matches!(
                    c.then_by(Criterion::Identity),
                    Err(CollectionError::UnchainedSort)
                ));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn to_array_unwraps_nested_collections() {
        let mut c = Collection::empty();
        c.push(Value::Collection(list(json!([1]))));
        match c.to_array().get(&Key::Int(0)) {
            Some(Value::Map(inner)) => assert_eq!(inner.len(), 1),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(c.to_json_pretty().unwrap(), "[\n  [\n    1\n  ]\n]");
    }
}
