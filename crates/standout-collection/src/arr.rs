//! Array primitives over [`Items`].
//!
//! Pure functions taking and returning ordered mappings. Integer keys are
//! treated as list positions (renumbered where the operation implies it)
//! and string keys as named slots.

use crate::items::Items;
use crate::key::Key;
use crate::value::Value;

/// Appends `right` to `left`: integer keys are renumbered, string keys
/// from `right` overwrite those in `left`.
pub fn merge(left: &Items, right: &Items) -> Items {
    let mut out = Items::with_capacity(left.len() + right.len());
    for (key, value) in left.iter().chain(right.iter()) {
        merge_entry(&mut out, key, value.clone());
    }
    out
}

/// Appends one entry with merge semantics: integer keys are renumbered.
pub(crate) fn merge_entry(out: &mut Items, key: &Key, value: Value) {
    match key {
        Key::Int(_) => {
            out.push(value);
        }
        Key::Str(_) => {
            out.insert(key.clone(), value);
        }
    }
}

/// Like [`merge`], but string keys present on both sides are combined
/// into lists (recursively for nested containers) instead of overwritten.
pub fn merge_recursive(left: &Items, right: &Items) -> Items {
    let mut out = merge(left, &Items::new());
    for (key, value) in right.iter() {
        if key.is_int() {
            out.push(value.clone());
            continue;
        }
        let combined = match out.get(key) {
            Some(existing) => {
                let existing = as_list(existing);
                let incoming = as_list(value);
                Value::Map(merge_recursive(&existing, &incoming))
            }
            None => value.clone(),
        };
        out.insert(key.clone(), combined);
    }
    out
}

fn as_list(value: &Value) -> Items {
    match value.as_items() {
        Some(items) => items.clone(),
        None => Items::from_values([value.clone()]),
    }
}

/// Overwrites entries of `left` with entries of `right`, keys kept as-is.
pub fn replace(left: &Items, right: &Items) -> Items {
    let mut out = left.clone();
    for (key, value) in right.iter() {
        out.insert(key.clone(), value.clone());
    }
    out
}

/// Like [`replace`], descending into containers present on both sides.
pub fn replace_recursive(left: &Items, right: &Items) -> Items {
    let mut out = left.clone();
    for (key, value) in right.iter() {
        let replaced = match (out.get(key).and_then(Value::as_items), value.as_items()) {
            (Some(existing), Some(incoming)) => Value::Map(replace_recursive(existing, incoming)),
            _ => value.clone(),
        };
        out.insert(key.clone(), replaced);
    }
    out
}

/// Resolves a possibly negative `offset`/`length` pair into a `start..end` range.
///
/// A negative offset counts from the end; a negative length stops that
/// many entries before the end.
pub fn slice_bounds(len: usize, offset: isize, length: Option<isize>) -> (usize, usize) {
    let len_i = len as isize;
    let start = if offset < 0 {
        (len_i + offset).max(0)
    } else {
        offset.min(len_i)
    };
    let end = match length {
        None => len_i,
        Some(l) if l < 0 => (len_i + l).max(start),
        Some(l) => start.saturating_add(l).min(len_i),
    };
    (start as usize, end.max(start) as usize)
}

/// Entries in `offset..offset + length`, keys preserved.
pub fn slice(items: &Items, offset: isize, length: Option<isize>) -> Items {
    let (start, end) = slice_bounds(items.len(), offset, length);
    items
        .iter()
        .skip(start)
        .take(end - start)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Flattens nested containers into a list of leaf values.
///
/// `depth` limits how many levels are unwrapped; `None` unwraps all.
pub fn flatten(items: &Items, depth: Option<usize>) -> Items {
    let mut out = Items::new();
    flatten_into(&mut out, items, depth);
    out
}

fn flatten_into(out: &mut Items, items: &Items, depth: Option<usize>) {
    for value in items.values() {
        match (value.as_items(), depth) {
            (None, _) | (Some(_), Some(0)) => {
                out.push(value.clone());
            }
            (Some(inner), Some(1)) => {
                for leaf in inner.values() {
                    out.push(leaf.clone());
                }
            }
            (Some(inner), _) => flatten_into(out, inner, depth.map(|d| d - 1)),
        }
    }
}

/// Merges every container value into one mapping; scalars are dropped.
pub fn collapse(items: &Items) -> Items {
    let mut out = Items::new();
    for inner in items.values().filter_map(Value::as_items) {
        for (key, value) in inner.iter() {
            merge_entry(&mut out, key, value.clone());
        }
    }
    out
}

/// Pairs the values of `keys` with the values of `values`.
///
/// Stops at the shorter side; key values with no key form are skipped.
pub fn combine(keys: &Items, values: &Items) -> Items {
    keys.values()
        .zip(values.values())
        .filter_map(|(k, v)| Some((k.to_key()?, v.clone())))
        .collect()
}

/// Pads to `size` entries with `value`: on the right for positive sizes,
/// on the left for negative ones. Integer keys are renumbered.
pub fn pad(items: &Items, size: isize, value: &Value) -> Items {
    let target = size.unsigned_abs();
    if target <= items.len() {
        return items.clone();
    }
    let fill = target - items.len();
    let mut out = Items::with_capacity(target);
    if size < 0 {
        for _ in 0..fill {
            out.push(value.clone());
        }
    }
    for (key, v) in items.iter() {
        merge_entry(&mut out, key, v.clone());
    }
    if size > 0 {
        for _ in 0..fill {
            out.push(value.clone());
        }
    }
    out
}

/// Entries of `left` whose string rendering appears nowhere in `right`.
pub fn diff(left: &Items, right: &Items) -> Items {
    let others: Vec<String> = right.values().map(Value::to_text).collect();
    left.iter()
        .filter(|(_, v)| !others.contains(&v.to_text()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Entries of `left` whose string rendering also appears in `right`.
pub fn intersect(left: &Items, right: &Items) -> Items {
    let others: Vec<String> = right.values().map(Value::to_text).collect();
    left.iter()
        .filter(|(_, v)| others.contains(&v.to_text()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Swaps keys and values; values with no key form are skipped.
pub fn flip(items: &Items) -> Items {
    items
        .iter()
        .filter_map(|(k, v)| Some((v.to_key()?, Value::from(k))))
        .collect()
}

/// Integer keys renumbered to `0..` in order; string keys are kept.
pub fn reindex(mut items: Items) -> Items {
    items.reindex();
    items
}
