//! Ordered key-value backing store.
//!
//! [`Items`] keeps entries in insertion order with unique keys. A hash
//! index maps each key to its position so key lookups are constant time;
//! value queries are still linear scans. It also tracks the next free
//! integer key (one past the largest integer key ever inserted) so that
//! appends behave like list pushes even after removals.

use std::collections::HashMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::key::Key;
use crate::value::Value;

/// Ordered mapping from [`Key`] to [`Value`].
#[derive(Debug, Clone, Default)]
pub struct Items {
    entries: Vec<(Key, Value)>,
    index: HashMap<Key, usize>,
    next_index: i64,
}

impl Items {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Items::default()
    }

    /// Creates an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Items {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            next_index: 0,
        }
    }

    /// Builds a list (keys `0..n`) from values.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut items = Items::new();
        for value in values {
            items.push(value.into());
        }
        items
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == Key::Int(i as i64))
    }

    /// Position of `key` in insertion order.
    pub fn position(&self, key: &Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Looks up the entry addressed by a raw path segment.
    pub fn get_segment(&self, segment: &str) -> Option<&Value> {
        self.get(&Key::from(segment))
    }

    /// Entry at `index` in insertion order.
    pub fn entry_at(&self, index: usize) -> Option<(&Key, &Value)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn first(&self) -> Option<(&Key, &Value)> {
        self.entry_at(0)
    }

    pub fn last(&self) -> Option<(&Key, &Value)> {
        self.entries.last().map(|(k, v)| (k, v))
    }

    /// Inserts or replaces the value at `key`.
    ///
    /// Replacing keeps the key's original position. Returns the previous value.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.track_index(&key);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Appends a value under the next free integer key and returns that key.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::Int(self.next_index);
        self.next_index = self.next_index.saturating_add(1);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key.clone(), value));
        key
    }

    /// Inserts an entry at the front; an existing entry under `key` is dropped.
    pub fn prepend(&mut self, key: Key, value: Value) {
        self.remove(&key);
        self.track_index(&key);
        self.entries.insert(0, (key, value));
        self.rebuild_index();
    }

    /// Removes the entry at `key`, preserving the order of the rest.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let removed = self.index.remove(key)?;
        for pos in self.index.values_mut() {
            if *pos > removed {
                *pos -= 1;
            }
        }
        Some(self.entries.remove(removed).1)
    }

    pub fn pop_last(&mut self) -> Option<(Key, Value)> {
        let (key, value) = self.entries.pop()?;
        self.index.remove(&key);
        Some((key, value))
    }

    pub fn shift_first(&mut self) -> Option<(Key, Value)> {
        let key = self.entries.first()?.0.clone();
        let value = self.remove(&key)?;
        Some((key, value))
    }

    /// Renumbers integer keys to `0..` in order, keeping string keys.
    pub fn reindex(&mut self) {
        let mut next = 0;
        for (key, _) in &mut self.entries {
            if key.is_int() {
                *key = Key::Int(next);
                next += 1;
            }
        }
        self.next_index = next;
        self.rebuild_index();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Key, &Value)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Keeps only entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Key, &Value) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
        self.rebuild_index();
    }

    /// Converts nested collections into plain maps, recursively.
    pub fn into_plain(self) -> Items {
        self.into_iter().map(|(k, v)| (k, v.into_plain())).collect()
    }

    pub(crate) fn into_entries(self) -> Vec<(Key, Value)> {
        self.entries
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, (key, _)) in self.entries.iter().enumerate() {
            self.index.insert(key.clone(), pos);
        }
    }

    fn track_index(&mut self, key: &Key) {
        if let Key::Int(n) = key {
            if *n >= self.next_index {
                self.next_index = n.saturating_add(1);
            }
        }
    }
}

impl PartialEq for Items {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(Key, Value)> for Items {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut items = Items::new();
        for (key, value) in iter {
            items.insert(key, value);
        }
        items
    }
}

impl IntoIterator for Items {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<(Key, Value)> for Items {
    fn extend<I: IntoIterator<Item = (Key, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Serialize for Items {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}
