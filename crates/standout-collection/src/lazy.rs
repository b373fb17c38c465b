//! Lazy, restartable collections.
//!
//! A [`LazyCollection`] wraps one of three sources: a materialized
//! mapping, a producer function, or another lazy collection. Every call
//! to [`LazyCollection::iterate`] starts a fresh traversal, so the same
//! lazy collection can be walked any number of times.
//!
//! Derived operations (`filter`, `map`, `keys`, `take`, ...) never touch
//! the source when called. They return a new lazy collection whose
//! producer restarts the upstream one and transforms it element by
//! element.
//!
//! ```
//! use standout_collection::LazyCollection;
//!
//! let evens = LazyCollection::range_from(1, 1)
//!     .filter(|v, _| v.to_number().is_some_and(|n| n.to_f64() % 2.0 == 0.0))
//!     .take(3);
//!
//! assert_eq!(evens.values().collect().to_json().unwrap(), "[2,4,6]");
//! // restartable: a second pass sees the same items
//! assert_eq!(evens.count(), 3);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::clause::Clause;
use crate::collection::{avg_of, max_of, min_of, sum_of, Collection};
use crate::criterion::Criterion;
use crate::error::{CollectionError, Result};
use crate::items::Items;
use crate::key::Key;
use crate::op::Op;
use crate::ordering::{loose_eq, strict_eq};
use crate::path;
use crate::source::{Entries, Producer, Source};
use crate::value::{Number, Value};

#[derive(Clone)]
enum LazySource {
    Materialized(Rc<Items>),
    Producer(Producer),
    Nested(Rc<LazyCollection>),
}

/// Pull-based collection over a restartable source.
#[derive(Clone)]
pub struct LazyCollection {
    source: LazySource,
}

/// Walks a shared mapping one cloned entry at a time.
struct ItemsCursor {
    items: Rc<Items>,
    position: usize,
}

impl Iterator for ItemsCursor {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.items.entry_at(self.position)?;
        self.position += 1;
        Some((key.clone(), value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.items.len().saturating_sub(self.position);
        (left, Some(left))
    }
}

impl LazyCollection {
    /// Builds a lazy collection from a restartable source.
    ///
    /// Fails with [`CollectionError::InvalidSource`] for
    /// [`Source::Iterator`], which could only be walked once.
    pub fn new(source: impl Into<Source>) -> Result<Self> {
        let source = match source.into() {
            Source::Iterator(_) => return Err(CollectionError::InvalidSource),
            Source::Producer(producer) => LazySource::Producer(producer),
            Source::Lazy(lazy) => LazySource::Nested(Rc::new(lazy)),
            other => LazySource::Materialized(Rc::new(other.into_items())),
        };
        Ok(LazyCollection { source })
    }

    /// Wraps a generator called once per traversal.
    pub fn from_producer<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (Key, Value)>,
        I::IntoIter: 'static,
    {
        LazyCollection::from_fn(move || Box::new(f().into_iter()))
    }

    fn from_fn(f: impl Fn() -> Entries + 'static) -> Self {
        LazyCollection {
            source: LazySource::Producer(Rc::new(f)),
        }
    }

    fn materialized(items: Items) -> Self {
        LazyCollection {
            source: LazySource::Materialized(Rc::new(items)),
        }
    }

    pub fn empty() -> Self {
        LazyCollection::materialized(Items::new())
    }

    /// Integers from `start` to `end` inclusive, descending if `end < start`.
    pub fn range(start: i64, end: i64) -> Self {
        LazyCollection::range_step(start, end, 1)
    }

    /// Like [`range`](Self::range), advancing by `step` (0 counts as 1).
    pub fn range_step(start: i64, end: i64, step: u64) -> Self {
        let step = step.max(1);
        LazyCollection::from_fn(move || {
            let ascending = start <= end;
            let mut next = Some(start);
            let mut index = 0i64;
            Box::new(std::iter::from_fn(move || {
                let current = next?;
                if (ascending && current > end) || (!ascending && current < end) {
                    return None;
                }
                next = if ascending {
                    current.checked_add_unsigned(step)
                } else {
                    current.checked_sub_unsigned(step)
                };
                let key = Key::Int(index);
                index += 1;
                Some((key, Value::from(current)))
            }))
        })
    }

    /// Open-ended sequence `start, start + step, ...`; a negative step
    /// counts down and 0 counts as 1. Ends only at the `i64` bounds.
    pub fn range_from(start: i64, step: i64) -> Self {
        let step = if step == 0 { 1 } else { step };
        LazyCollection::from_fn(move || {
            let mut next = Some(start);
            let mut index = 0i64;
            Box::new(std::iter::from_fn(move || {
                let current = next?;
                next = current.checked_add(step);
                let key = Key::Int(index);
                index += 1;
                Some((key, Value::from(current)))
            }))
        })
    }

    /// `f(1)..=f(n)` as a list, computed on demand.
    pub fn times<F>(n: usize, f: F) -> Self
    where
        F: Fn(usize) -> Value + 'static,
    {
        let f = Rc::new(f);
        LazyCollection::from_fn(move || {
            let f = Rc::clone(&f);
            Box::new((1..=n).map(move |i| (Key::from(i - 1), f(i))))
        })
    }

    /// Starts a fresh traversal of the source.
    pub fn iterate(&self) -> Entries {
        match &self.source {
            LazySource::Materialized(items) => Box::new(ItemsCursor {
                items: Rc::clone(items),
                position: 0,
            }),
            LazySource::Producer(producer) => producer(),
            LazySource::Nested(inner) => inner.iterate(),
        }
    }

    /// New lazy collection applying `f` to each fresh upstream traversal.
    fn derive<F>(&self, f: F) -> LazyCollection
    where
        F: Fn(Entries) -> Entries + 'static,
    {
        let upstream = self.clone();
        LazyCollection::from_fn(move || f(upstream.iterate()))
    }

    // --- derived ---

    pub fn map<F>(&self, f: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> Value + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |entries| {
            let f = Rc::clone(&f);
            Box::new(entries.map(move |(k, v)| {
                let mapped = f(&v, &k);
                (k, mapped)
            }))
        })
    }

    /// Maps entries to new `(key, value)` pairs. Duplicate keys resolve
    /// on collection, later ones winning.
    pub fn map_with_keys<F>(&self, f: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> (Key, Value) + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |entries| {
            let f = Rc::clone(&f);
            Box::new(entries.map(move |(k, v)| f(&v, &k)))
        })
    }

    pub fn filter<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |entries| {
            let pred = Rc::clone(&pred);
            Box::new(entries.filter(move |(k, v)| pred(v, k)))
        })
    }

    pub fn filter_truthy(&self) -> LazyCollection {
        self.filter(|v, _| v.is_truthy())
    }

    pub fn reject<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.filter(move |v, k| !pred(v, k))
    }

    /// Keys as a list.
    pub fn keys(&self) -> LazyCollection {
        self.derive(|entries| {
            Box::new(
                entries
                    .enumerate()
                    .map(|(i, (k, _))| (Key::from(i), Value::from(k))),
            )
        })
    }

    /// Values as a list.
    pub fn values(&self) -> LazyCollection {
        self.derive(|entries| {
            Box::new(entries.enumerate().map(|(i, (_, v))| (Key::from(i), v)))
        })
    }

    pub fn take(&self, limit: usize) -> LazyCollection {
        self.derive(move |entries| Box::new(entries.take(limit)))
    }

    pub fn skip(&self, count: usize) -> LazyCollection {
        self.derive(move |entries| Box::new(entries.skip(count)))
    }

    /// Entries `offset..offset + length`, keys kept.
    pub fn slice(&self, offset: usize, length: Option<usize>) -> LazyCollection {
        match length {
            Some(length) => self.skip(offset).take(length),
            None => self.skip(offset),
        }
    }

    pub fn take_while<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |entries| {
            let pred = Rc::clone(&pred);
            Box::new(entries.take_while(move |(k, v)| pred(v, k)))
        })
    }

    /// Entries before the first one matching `pred`.
    pub fn take_until<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.take_while(move |v, k| !pred(v, k))
    }

    pub fn skip_while<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |entries| {
            let pred = Rc::clone(&pred);
            Box::new(entries.skip_while(move |(k, v)| pred(v, k)))
        })
    }

    /// Entries from the first one matching `pred` onwards.
    pub fn skip_until<F>(&self, pred: F) -> LazyCollection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.skip_while(move |v, k| !pred(v, k))
    }

    /// Groups into list-keyed chunks of at most `size` entries.
    pub fn chunk(&self, size: usize) -> LazyCollection {
        if size == 0 {
            return LazyCollection::empty();
        }
        self.derive(move |mut entries| {
            let mut index = 0usize;
            Box::new(std::iter::from_fn(move || {
                let chunk: Items = entries.by_ref().take(size).collect();
                if chunk.is_empty() {
                    return None;
                }
                let key = Key::from(index);
                index += 1;
                Some((key, Value::Collection(Collection::from_items(chunk))))
            }))
        })
    }

    pub fn unique(&self) -> LazyCollection {
        self.unique_by(Criterion::Identity, false)
    }

    /// Drops entries whose extracted value was already seen.
    pub fn unique_by(&self, criterion: impl Into<Criterion>, strict: bool) -> LazyCollection {
        let criterion = criterion.into();
        self.derive(move |entries| {
            let criterion = criterion.clone();
            let mut seen: Vec<Value> = Vec::new();
            Box::new(entries.filter(move |(k, v)| {
                let id = criterion.extract(v, k).into_owned();
                let eq = if strict { strict_eq } else { loose_eq };
                if seen.iter().any(|s| eq(s, &id)) {
                    return false;
                }
                seen.push(id);
                true
            }))
        })
    }

    /// Reads `value_path` from every item, keyed by `key_path` when given.
    pub fn pluck(&self, value_path: &str, key_path: Option<&str>) -> LazyCollection {
        let value_path = value_path.to_string();
        let key_path = key_path.map(str::to_string);
        self.derive(move |entries| {
            let value_path = value_path.clone();
            let key_path = key_path.clone();
            let mut index = 0usize;
            Box::new(entries.map(move |(_, item)| {
                let value = path::resolve(&item, &value_path)
                    .value()
                    .cloned()
                    .unwrap_or_default();
                let key = key_path
                    .as_deref()
                    .and_then(|p| path::resolve(&item, p).value()?.to_key())
                    .unwrap_or_else(|| {
                        index += 1;
                        Key::from(index - 1)
                    });
                (key, value)
            }))
        })
    }

    // --- queries ---

    pub fn where_clause(&self, clause: Clause) -> LazyCollection {
        self.filter(move |item, _| clause.matches(item))
    }

    pub fn where_op(&self, path: &str, op: &str, value: impl Into<Value>) -> Result<LazyCollection> {
        Ok(self.where_clause(Clause::op(path, op, value)?))
    }

    pub fn where_eq(&self, path: &str, value: impl Into<Value>) -> LazyCollection {
        self.where_clause(Clause::compare(path, Op::Eq, value))
    }

    pub fn where_strict(&self, path: &str, value: impl Into<Value>) -> LazyCollection {
        self.where_clause(Clause::compare(path, Op::Identical, value))
    }

    pub fn where_null(&self, path: &str) -> LazyCollection {
        self.where_clause(Clause::null(path))
    }

    pub fn where_not_null(&self, path: &str) -> LazyCollection {
        self.where_clause(Clause::not_null(path))
    }

    pub fn where_between(
        &self,
        path: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> LazyCollection {
        self.where_clause(Clause::between(path, min, max))
    }

    pub fn where_not_between(
        &self,
        path: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> LazyCollection {
        self.where_clause(Clause::not_between(path, min, max))
    }

    pub fn where_in<V: Into<Value>>(
        &self,
        path: &str,
        set: impl IntoIterator<Item = V>,
        strict: bool,
    ) -> LazyCollection {
        self.where_clause(Clause::is_in(path, set, strict))
    }

    pub fn where_not_in<V: Into<Value>>(
        &self,
        path: &str,
        set: impl IntoIterator<Item = V>,
        strict: bool,
    ) -> LazyCollection {
        self.where_clause(Clause::not_in(path, set, strict))
    }

    pub fn where_like(&self, path: &str, pattern: &str, strict: bool) -> LazyCollection {
        self.where_clause(Clause::like(path, pattern, strict))
    }

    pub fn where_regex(&self, path: &str, pattern: &str) -> Result<LazyCollection> {
        Ok(self.where_clause(Clause::regex(path, pattern)?))
    }

    // --- terminal ---

    /// Materializes every entry into an eager collection.
    ///
    /// Never returns on an open-ended source.
    pub fn collect(&self) -> Collection {
        let items: Items = self.iterate().collect();
        tracing::trace!(count = items.len(), "materialized lazy collection");
        Collection::from_items(items)
    }

    /// Materialized entries.
    pub fn all(&self) -> Items {
        self.collect().into_items()
    }

    /// Materializes once; later traversals replay the snapshot.
    pub fn eager(&self) -> LazyCollection {
        LazyCollection::materialized(self.all())
    }

    pub fn to_array(&self) -> Items {
        self.collect().to_array()
    }

    pub fn to_json(&self) -> Result<String> {
        self.collect().to_json()
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        self.iterate().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some()
    }

    pub fn first(&self) -> Option<Value> {
        self.iterate().next().map(|(_, v)| v)
    }

    pub fn first_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Option<Value> {
        self.iterate().find(|(k, v)| pred(v, k)).map(|(_, v)| v)
    }

    /// First matching value, or [`CollectionError::ItemNotFound`].
    pub fn first_or_fail(&self, pred: impl FnMut(&Value, &Key) -> bool) -> Result<Value> {
        self.first_where(pred).ok_or(CollectionError::ItemNotFound)
    }

    pub fn last(&self) -> Option<Value> {
        self.iterate().last().map(|(_, v)| v)
    }

    pub fn count(&self) -> usize {
        self.iterate().count()
    }

    /// Number of entries whose extracted value is truthy.
    pub fn count_where(&self, criterion: impl Into<Criterion>) -> usize {
        self.extracted(criterion.into()).filter(Value::is_truthy).count()
    }

    pub fn is_empty(&self) -> bool {
        self.iterate().next().is_none()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    pub fn contains(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        self.iterate().any(|(k, v)| pred(&v, &k))
    }

    pub fn contains_value(&self, needle: impl Into<Value>) -> bool {
        let needle = needle.into();
        self.contains(|v, _| loose_eq(v, &needle))
    }

    pub fn every(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        self.iterate().all(|(k, v)| pred(&v, &k))
    }

    pub fn reduce<A>(&self, init: A, mut f: impl FnMut(A, &Value, &Key) -> A) -> A {
        self.iterate().fold(init, |acc, (k, v)| f(acc, &v, &k))
    }

    /// Calls `f` for each entry until it returns `false`.
    pub fn each(&self, mut f: impl FnMut(&Value, &Key) -> bool) -> &Self {
        for (k, v) in self.iterate() {
            if !f(&v, &k) {
                break;
            }
        }
        self
    }

    fn extracted(&self, criterion: Criterion) -> impl Iterator<Item = Value> {
        self.iterate()
            .map(move |(k, v)| criterion.extract(&v, &k).into_owned())
    }

    pub fn sum(&self) -> Number {
        self.sum_by(Criterion::Identity)
    }

    pub fn sum_by(&self, criterion: impl Into<Criterion>) -> Number {
        sum_of(self.extracted(criterion.into()))
    }

    pub fn avg(&self) -> Option<f64> {
        self.avg_by(Criterion::Identity)
    }

    pub fn avg_by(&self, criterion: impl Into<Criterion>) -> Option<f64> {
        avg_of(self.extracted(criterion.into()))
    }

    pub fn min(&self) -> Option<Value> {
        self.min_by(Criterion::Identity)
    }

    pub fn min_by(&self, criterion: impl Into<Criterion>) -> Option<Value> {
        min_of(self.extracted(criterion.into()))
    }

    pub fn max(&self) -> Option<Value> {
        self.max_by(Criterion::Identity)
    }

    pub fn max_by(&self, criterion: impl Into<Criterion>) -> Option<Value> {
        max_of(self.extracted(criterion.into()))
    }
}

impl Default for LazyCollection {
    fn default() -> Self {
        LazyCollection::empty()
    }
}

impl fmt::Debug for LazyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            LazySource::Materialized(items) => format!("Materialized({} items)", items.len()),
            LazySource::Producer(_) => "Producer".to_string(),
            LazySource::Nested(_) => "Nested".to_string(),
        };
        f.debug_struct("LazyCollection")
            .field("source", &format_args!("{source}"))
            .finish()
    }
}

impl From<Collection> for LazyCollection {
    fn from(collection: Collection) -> Self {
        LazyCollection::materialized(collection.into_items())
    }
}

impl From<Items> for LazyCollection {
    fn from(items: Items) -> Self {
        LazyCollection::materialized(items)
    }
}
