//! Stable sorting and chained multi-key sorts.
//!
//! `sort_by` orders a collection by one [`SortKey`] and remembers it.
//! `then_by` refines that order: it splits the collection into runs whose
//! items agree under every remembered key, sorts each run by the new key,
//! and remembers the longer chain. Earlier keys therefore always dominate
//! later ones.
//!
//! ```
//! use standout_collection::Collection;
//! use serde_json::json;
//!
//! let people = Collection::new(json!([
//!     {"name": "Cy", "team": "b"},
//!     {"name": "Al", "team": "a"},
//!     {"name": "Bo", "team": "b"},
//!     {"name": "Di", "team": "a"},
//! ]));
//!
//! let ordered = people.sort_by("team").then_by_desc("name").unwrap();
//! assert_eq!(
//!     ordered.pluck("name", None).to_json().unwrap(),
//!     r#"["Di","Al","Cy","Bo"]"#
//! );
//! ```

use std::cmp::Ordering;

use crate::collection::Collection;
use crate::criterion::Criterion;
use crate::error::{CollectionError, Result};
use crate::key::Key;
use crate::ordering::{Collation, Dir};
use crate::value::Value;

/// One level of a sort: what to read, which way, and how to compare.
#[derive(Debug, Clone, Default)]
pub struct SortKey {
    pub criterion: Criterion,
    pub dir: Dir,
    pub collation: Collation,
}

impl SortKey {
    /// Ascending key with regular collation.
    pub fn new(criterion: impl Into<Criterion>) -> Self {
        SortKey {
            criterion: criterion.into(),
            dir: Dir::Asc,
            collation: Collation::Regular,
        }
    }

    pub fn desc(criterion: impl Into<Criterion>) -> Self {
        SortKey::new(criterion).with_dir(Dir::Desc)
    }

    pub fn with_dir(mut self, dir: Dir) -> Self {
        self.dir = dir;
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    fn extract(&self, value: &Value, key: &Key) -> Value {
        self.criterion.extract(value, key).into_owned()
    }

    /// Orders two extracted values under this key's collation and direction.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.dir.apply(self.collation.compare(a, b))
    }
}

/// Where a collection stands in the sort lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState {
    /// No chain: `then_by` is rejected.
    Unsorted,
    /// Ordered by a single `sort_by`.
    Sorted,
    /// Ordered by `sort_by` plus `n - 1` `then_by` refinements.
    Chained(usize),
}

type Entry = (Key, Value);

/// Stable sort of `entries` by one key, extracting each sort value once.
fn stable_sort(entries: Vec<Entry>, sort_key: &SortKey) -> Vec<Entry> {
    let mut decorated: Vec<(Value, Entry)> = entries
        .into_iter()
        .map(|(k, v)| (sort_key.extract(&v, &k), (k, v)))
        .collect();
    decorated.sort_by(|a, b| sort_key.compare(&a.0, &b.0));
    decorated.into_iter().map(|(_, entry)| entry).collect()
}

fn same_run(chain: &[SortKey], a: &[Value], b: &[Value]) -> bool {
    chain
        .iter()
        .zip(a.iter().zip(b))
        .all(|(key, (x, y))| key.collation.compare(x, y) == Ordering::Equal)
}

impl Collection {
    pub fn sort_state(&self) -> SortState {
        match self.chain().len() {
            0 => SortState::Unsorted,
            1 => SortState::Sorted,
            n => SortState::Chained(n),
        }
    }

    /// The keys that produced this collection's order, outermost first.
    pub fn sort_chain(&self) -> &[SortKey] {
        self.chain()
    }

    /// Values in ascending loose order, keys kept.
    pub fn sort(&self) -> Collection {
        self.sort_with(|a, b| Collation::Regular.compare(a, b))
    }

    pub fn sort_desc(&self) -> Collection {
        self.sort_with(|a, b| Collation::Regular.compare(b, a))
    }

    /// Stable sort by a value comparator, keys kept.
    pub fn sort_with(&self, mut compare: impl FnMut(&Value, &Value) -> Ordering) -> Collection {
        let mut entries = self.items().clone().into_entries();
        entries.sort_by(|a, b| compare(&a.1, &b.1));
        entries.into_iter().collect()
    }

    pub fn sort_keys(&self) -> Collection {
        self.sort_keys_with(Dir::Asc)
    }

    pub fn sort_keys_desc(&self) -> Collection {
        self.sort_keys_with(Dir::Desc)
    }

    fn sort_keys_with(&self, dir: Dir) -> Collection {
        let mut entries = self.items().clone().into_entries();
        entries.sort_by(|a, b| {
            let ordering = Collation::Regular.compare(&Value::from(&a.0), &Value::from(&b.0));
            dir.apply(ordering)
        });
        entries.into_iter().collect()
    }

    /// Stable ascending sort by `criterion`, starting a new chain.
    pub fn sort_by(&self, criterion: impl Into<Criterion>) -> Collection {
        self.sort_by_key(SortKey::new(criterion))
    }

    pub fn sort_by_desc(&self, criterion: impl Into<Criterion>) -> Collection {
        self.sort_by_key(SortKey::desc(criterion))
    }

    /// Stable sort by a fully specified key, starting a new chain.
    pub fn sort_by_key(&self, sort_key: SortKey) -> Collection {
        let entries = stable_sort(self.items().clone().into_entries(), &sort_key);
        Collection::with_chain(entries.into_iter().collect(), vec![sort_key])
    }

    /// Orders items that tie under every earlier key by `criterion`.
    ///
    /// Fails with [`CollectionError::UnchainedSort`] unless this collection
    /// came from `sort_by` or `then_by`.
    pub fn then_by(&self, criterion: impl Into<Criterion>) -> Result<Collection> {
        self.then_by_key(SortKey::new(criterion))
    }

    pub fn then_by_desc(&self, criterion: impl Into<Criterion>) -> Result<Collection> {
        self.then_by_key(SortKey::desc(criterion))
    }

    pub fn then_by_key(&self, sort_key: SortKey) -> Result<Collection> {
        let chain = self.chain();
        if chain.is_empty() {
            return Err(CollectionError::UnchainedSort);
        }

        let mut runs: Vec<Vec<Entry>> = Vec::new();
        let mut previous: Option<Vec<Value>> = None;
        for (k, v) in self.items().iter() {
            let readings: Vec<Value> = chain.iter().map(|key| key.extract(v, k)).collect();
            let continues = previous
                .as_ref()
                .is_some_and(|prev| same_run(chain, prev, &readings));
            if !continues {
                runs.push(Vec::new());
            }
            if let Some(run) = runs.last_mut() {
                run.push((k.clone(), v.clone()));
            }
            previous = Some(readings);
        }

        tracing::debug!(
            runs = runs.len(),
            chain_len = chain.len() + 1,
            "then_by regrouped sorted collection"
        );

        let items = runs
            .into_iter()
            .flat_map(|run| stable_sort(run, &sort_key))
            .collect();
        let mut next_chain = chain.to_vec();
        next_chain.push(sort_key);
        Ok(Collection::with_chain(items, next_chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Collection {
        Collection::new(json!([
            {"name": "ana", "age": 30, "city": "Oslo"},
            {"name": "bob", "age": 25, "city": "Rome"},
            {"name": "cid", "age": 30, "city": "Lima"},
            {"name": "dan", "age": 25, "city": "Oslo"},
        ]))
    }

    fn names(c: &Collection) -> String {
        c.pluck("name", None).to_json().unwrap()
    }

    #[test]
    fn sort_by_is_stable_and_keeps_keys() {
        let sorted = people().sort_by("age");
        assert_eq!(names(&sorted), r#"["bob","dan","ana","cid"]"#);
        assert_eq!(sorted.keys().to_json().unwrap(), "[1,3,0,2]");
        assert_eq!(sorted.sort_state(), SortState::Sorted);
    }

    #[test]
    fn sort_by_desc_keeps_ties_in_order() {
        assert_eq!(names(&people().sort_by_desc("age")), r#"["ana","cid","bob","dan"]"#);
    }

    #[test]
    fn then_by_refines_ties_only() {
        let sorted = people().sort_by("age").then_by("city").unwrap();
        assert_eq!(names(&sorted), r#"["dan","bob","cid","ana"]"#);
        assert_eq!(sorted.sort_state(), SortState::Chained(2));
        let deeper = sorted.then_by_desc("name").unwrap();
        assert_eq!(deeper.sort_chain().len(), 3);
        assert_eq!(names(&deeper), names(&sorted));
    }

    #[test]
    fn then_by_without_sort_by_fails() {
        let err = people().then_by("age").unwrap_err();
        assert!(matches!(err, CollectionError::UnchainedSort));
        assert_eq!(people().sort_state(), SortState::Unsorted);
    }

    #[test]
    fn derived_collections_drop_the_chain() {
        let sorted = people().sort_by("age");
        assert!(sorted.filter(|_, _| true).then_by("name").is_err());
    }

    #[test]
    fn callback_and_collation() {
        let files = Collection::new(vec!["f10", "F2", "f1"]);
        let natural = files.sort_by_key(
            SortKey::new(Criterion::Identity).with_collation(Collation::NaturalIgnoreCase),
        );
        assert_eq!(natural.to_json().unwrap(), r#"{"2":"f1","1":"F2","0":"f10"}"#);
        let by_len = files.sort_by(Criterion::by(|v, _| Value::from(v.to_text().len())));
        assert_eq!(by_len.values().to_json().unwrap(), r#"["F2","f1","f10"]"#);
    }

    #[test]
    fn plain_sorts() {
        let c = Collection::new(json!({"b": 2, "a": 3, "c": 1}));
        assert_eq!(c.sort().to_json().unwrap(), r#"{"c":1,"b":2,"a":3}"#);
        assert_eq!(c.sort_desc().values().to_json().unwrap(), "[3,2,1]");
        assert_eq!(c.sort_keys().keys().to_json().unwrap(), r#"["a","b","c"]"#);
        assert_eq!(c.sort_keys_desc().keys().to_json().unwrap(), r#"["c","b","a"]"#);
        assert_eq!(c.sort().sort_state(), SortState::Unsorted);
    }
}
