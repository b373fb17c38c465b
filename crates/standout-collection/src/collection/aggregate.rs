//! Aggregates over extracted values.
//!
//! Each aggregate reads one value per entry through a [`Criterion`]: the
//! item itself, a dotted path or a callback. The free `*_of` helpers work
//! on any value sequence and are shared with the lazy collection.

use std::collections::HashMap;

use crate::criterion::Criterion;
use crate::items::Items;
use crate::key::Key;
use crate::op::Op;
use crate::ordering::Collation;
use crate::value::{Number, Value};

use super::Collection;

/// Sum of the numeric readings; non-numeric values are skipped.
pub(crate) fn sum_of(values: impl Iterator<Item = Value>) -> Number {
    values
        .filter_map(|v| v.to_number())
        .fold(Number::I64(0), Number::add)
}

/// Mean of the numeric readings, `None` if there are none.
pub(crate) fn avg_of(values: impl Iterator<Item = Value>) -> Option<f64> {
    let (sum, count) = values
        .filter_map(|v| v.to_number())
        .fold((0.0, 0usize), |(sum, count), n| (sum + n.to_f64(), count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Smallest non-null value under loose comparison.
pub(crate) fn min_of(values: impl Iterator<Item = Value>) -> Option<Value> {
    values
        .filter(|v| !v.is_null())
        .reduce(|best, v| if Op::Lt.eval(&v, &best) { v } else { best })
}

/// Largest non-null value under loose comparison.
pub(crate) fn max_of(values: impl Iterator<Item = Value>) -> Option<Value> {
    values
        .filter(|v| !v.is_null())
        .reduce(|best, v| if Op::Gt.eval(&v, &best) { v } else { best })
}

fn median_of(values: impl Iterator<Item = Value>) -> Option<Number> {
    let mut numbers: Vec<Number> = values.filter_map(|v| v.to_number()).collect();
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let middle = numbers.len() / 2;
    if numbers.len() % 2 == 1 {
        Some(numbers[middle])
    } else {
        let pair = numbers[middle - 1].to_f64() + numbers[middle].to_f64();
        Some(Number::F64(pair / 2.0))
    }
}

/// Key a value is tallied under. Fractional floats keep their full
/// rendering so `1.5` and `1.7` stay apart.
fn tally_key(value: &Value) -> Option<Key> {
    match value {
        Value::Number(Number::F64(f)) if f.fract() != 0.0 => Some(Key::Str(f.to_string())),
        other => other.to_key(),
    }
}

/// Occurrence counts per tally key, in first-seen order, each with the
/// first value seen under that key.
fn tally(values: impl Iterator<Item = Value>) -> Vec<(Key, Value, usize)> {
    let mut order: Vec<(Key, Value, usize)> = Vec::new();
    let mut slots: HashMap<Key, usize> = HashMap::new();
    for value in values {
        let Some(key) = tally_key(&value) else {
            continue;
        };
        match slots.get(&key) {
            Some(&slot) => order[slot].2 += 1,
            None => {
                slots.insert(key.clone(), order.len());
                order.push((key, value, 1));
            }
        }
    }
    order
}

fn mode_of(values: impl Iterator<Item = Value>) -> Option<Vec<Value>> {
    let counts = tally(values.filter(|v| !v.is_null()));
    let highest = counts.iter().map(|(_, _, n)| *n).max()?;
    let mut modes: Vec<Value> = counts
        .into_iter()
        .filter(|(_, _, n)| *n == highest)
        .map(|(_, value, _)| value)
        .collect();
    modes.sort_by(|a, b| Collation::Regular.compare(a, b));
    Some(modes)
}

impl Collection {
    fn extracted<'a>(&'a self, criterion: &'a Criterion) -> impl Iterator<Item = Value> + 'a {
        self.items
            .iter()
            .map(move |(k, v)| criterion.extract(v, k).into_owned())
    }

    pub fn sum(&self) -> Number {
        self.sum_by(Criterion::Identity)
    }

    /// Sums a path or callback over every item.
    pub fn sum_by(&self, criterion: impl Into<Criterion>) -> Number {
        sum_of(self.extracted(&criterion.into()))
    }

    pub fn avg(&self) -> Option<f64> {
        self.avg_by(Criterion::Identity)
    }

    pub fn avg_by(&self, criterion: impl Into<Criterion>) -> Option<f64> {
        avg_of(self.extracted(&criterion.into()))
    }

    pub fn min(&self) -> Option<Value> {
        self.min_by(Criterion::Identity)
    }

    pub fn min_by(&self, criterion: impl Into<Criterion>) -> Option<Value> {
        min_of(self.extracted(&criterion.into()))
    }

    pub fn max(&self) -> Option<Value> {
        self.max_by(Criterion::Identity)
    }

    pub fn max_by(&self, criterion: impl Into<Criterion>) -> Option<Value> {
        max_of(self.extracted(&criterion.into()))
    }

    /// Middle numeric value, or the mean of the two middle values for an
    /// even count.
    ///
    /// ```
    /// use standout_collection::{Collection, Number};
    ///
    /// assert_eq!(Collection::new(vec![3, 1, 2]).median(), Some(Number::I64(2)));
    /// assert_eq!(Collection::new(vec![1, 2, 3, 4]).median(), Some(Number::F64(2.5)));
    /// ```
    pub fn median(&self) -> Option<Number> {
        self.median_by(Criterion::Identity)
    }

    pub fn median_by(&self, criterion: impl Into<Criterion>) -> Option<Number> {
        median_of(self.extracted(&criterion.into()))
    }

    /// Every value tied for the highest frequency, in ascending order.
    pub fn mode(&self) -> Option<Vec<Value>> {
        self.mode_by(Criterion::Identity)
    }

    pub fn mode_by(&self, criterion: impl Into<Criterion>) -> Option<Vec<Value>> {
        mode_of(self.extracted(&criterion.into()))
    }

    /// Number of items whose extracted value is truthy. A missing path
    /// counts as null.
    pub fn count_where(&self, criterion: impl Into<Criterion>) -> usize {
        self.extracted(&criterion.into()).filter(Value::is_truthy).count()
    }

    /// Number of items per extracted value, keyed by that value.
    pub fn count_by(&self, criterion: impl Into<Criterion>) -> Collection {
        let counts: Items = tally(self.extracted(&criterion.into()))
            .into_iter()
            .map(|(key, _, n)| (key, Value::from(n)))
            .collect();
        Collection::from_items(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(Collection::new(vec![1, 2, 3]).median(), Some(Number::I64(2)));
        assert_eq!(Collection::new(vec![1, 2, 3, 4]).median(), Some(Number::F64(2.5)));
        assert_eq!(Collection::empty().median(), None);
    }

    #[test]
    fn median_by_path_skips_non_numeric() {
        let c = Collection::new(json!([{"n": 10}, {"n": "x"}, {"n": 30}, {}]));
        assert_eq!(c.median_by("n"), Some(Number::F64(20.0)));
    }

    #[test]
    fn mode_returns_all_ties() {
        let c = Collection::new(vec![1, 1, 2, 2, 3]);
        assert_eq!(c.mode(), Some(vec![Value::from(1), Value::from(2)]));
        assert_eq!(Collection::new(vec![3, 1]).mode(), Some(vec![Value::from(1), Value::from(3)]));
        assert_eq!(Collection::empty().mode(), None);
        let floats = Collection::new(vec![1.5, 1.5, 2.7]);
        assert_eq!(floats.mode(), Some(vec![Value::from(1.5)]));
        let ties = Collection::new(json!([1.2, 1.7, 2.0, 2]));
        assert_eq!(ties.mode(), Some(vec![Value::from(2.0)]));
    }

    #[test]
    fn sum_avg_min_max() {
        let c = Collection::new(json!([{"p": 4}, {"p": "6"}, {"p": null}, {"p": 2.5}]));
        assert_eq!(c.sum_by("p"), Number::F64(12.5));
        assert_eq!(c.avg_by("p"), Some(12.5 / 3.0));
        assert_eq!(c.min_by("p"), Some(Value::from(2.5)));
        assert_eq!(c.max_by("p"), Some(Value::from("6")));
        assert_eq!(Collection::new(vec![1, 2]).sum(), Number::I64(3));
        assert_eq!(Collection::empty().sum(), Number::I64(0));
        assert_eq!(Collection::empty().avg(), None);
        assert_eq!(Collection::empty().max(), None);
    }

    #[test]
    fn callback_criterion() {
        let c = Collection::new(vec!["a", "bbb", "cc"]);
        let len = Criterion::by(|v, _| Value::from(v.to_text().len()));
        assert_eq!(c.sum_by(len.clone()), Number::I64(6));
        assert_eq!(c.max_by(len), Some(Value::from(3usize)));
    }

    #[test]
    fn count_by_value_and_path() {
        let c = Collection::new(vec!["a", "b", "a"]);
        assert_eq!(c.count_by(Criterion::Identity).to_json().unwrap(), r#"{"a":2,"b":1}"#);
        let people = Collection::new(json!([{"team": 1}, {"team": 2}, {"team": 1}]));
        assert_eq!(people.count_by("team").to_json().unwrap(), r#"{"1":2,"2":1}"#);
        let floats = Collection::new(vec![1.5, 1.5, 1.7]);
        assert_eq!(floats.count_by("").to_json().unwrap(), r#"{"1.5":2,"1.7":1}"#);
    }

    #[test]
    fn count_where_path_and_callback() {
        let c = Collection::new(json!([{"ok": true}, {"ok": false}, {"ok": 1}, {}]));
        assert_eq!(c.count(), 4);
        assert_eq!(c.count_where("ok"), 2);
        let big = Criterion::by(|v, _| Value::from(v.to_number().is_some_and(|n| n.to_f64() > 1.0)));
        assert_eq!(Collection::new(vec![0.5, 1.5, 3.0]).count_where(big), 2);
    }
}
