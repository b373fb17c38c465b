//! `where_*` filters on the eager collection.
//!
//! Each filter builds one [`Clause`] and keeps the items it matches, with
//! their keys. A path that does not resolve reads as null, except for the
//! range filters which drop such items.

use crate::clause::Clause;
use crate::error::Result;
use crate::op::Op;
use crate::value::Value;

use super::Collection;

impl Collection {
    /// Keeps items matching `clause`.
    pub fn where_clause(&self, clause: &Clause) -> Collection {
        self.filter(|item, _| clause.matches(item))
    }

    /// Keeps items where `path <op> value` holds.
    ///
    /// Fails with `InvalidOperator` if `op` is not a supported symbol.
    ///
    /// ```
    /// use standout_collection::Collection;
    /// use serde_json::json;
    ///
    /// let stock = Collection::new(json!([{"qty": 0}, {"qty": 5}, {"qty": "12"}]));
    /// assert_eq!(stock.where_op("qty", ">", 3).unwrap().count(), 2);
    /// assert!(stock.where_op("qty", "=>", 3).is_err());
    /// ```
    pub fn where_op(&self, path: &str, op: &str, value: impl Into<Value>) -> Result<Collection> {
        Ok(self.where_clause(&Clause::op(path, op, value)?))
    }

    /// Loose equality filter.
    pub fn where_eq(&self, path: &str, value: impl Into<Value>) -> Collection {
        self.where_clause(&Clause::compare(path, Op::Eq, value))
    }

    /// Strict equality filter.
    pub fn where_strict(&self, path: &str, value: impl Into<Value>) -> Collection {
        self.where_clause(&Clause::compare(path, Op::Identical, value))
    }

    pub fn where_null(&self, path: &str) -> Collection {
        self.where_clause(&Clause::null(path))
    }

    pub fn where_not_null(&self, path: &str) -> Collection {
        self.where_clause(&Clause::not_null(path))
    }

    /// Inclusive range filter; items without `path` are dropped.
    pub fn where_between(
        &self,
        path: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Collection {
        self.where_clause(&Clause::between(path, min, max))
    }

    pub fn where_not_between(
        &self,
        path: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Collection {
        self.where_clause(&Clause::not_between(path, min, max))
    }

    pub fn where_in<V: Into<Value>>(
        &self,
        path: &str,
        set: impl IntoIterator<Item = V>,
        strict: bool,
    ) -> Collection {
        self.where_clause(&Clause::is_in(path, set, strict))
    }

    pub fn where_not_in<V: Into<Value>>(
        &self,
        path: &str,
        set: impl IntoIterator<Item = V>,
        strict: bool,
    ) -> Collection {
        self.where_clause(&Clause::not_in(path, set, strict))
    }

    /// `%`-wildcard filter; see [`LikePattern`](crate::LikePattern).
    pub fn where_like(&self, path: &str, pattern: &str, strict: bool) -> Collection {
        self.where_clause(&Clause::like(path, pattern, strict))
    }

    pub fn where_regex(&self, path: &str, pattern: &str) -> Result<Collection> {
        Ok(self.where_clause(&Clause::regex(path, pattern)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use serde_json::json;

    fn products() -> Collection {
        Collection::new(json!([
            {"p": "Desk", "price": 200, "tag": "wood"},
            {"p": "Chair", "price": 100, "tag": null},
            {"p": "Door", "price": "150"},
        ]))
    }

    #[test]
    fn where_like_prefix() {
        let found = products().where_like("p", "D%", false).pluck("p", None);
        assert_eq!(found.to_json().unwrap(), r#"["Desk","Door"]"#);
    }

    #[test]
    fn where_op_and_invalid_operator() {
        let cheap = products().where_op("price", "<", 160).unwrap();
        assert_eq!(cheap.keys().to_json().unwrap(), "[1,2]");
        let err = products().where_op("price", "~", 1).unwrap_err();
        assert!(matches!(err, CollectionError::InvalidOperator(_)));
    }

    #[test]
    fn loose_and_strict_equality() {
        assert_eq!(products().where_eq("price", 150).count(), 1);
        assert_eq!(products().where_strict("price", 150).count(), 0);
        assert_eq!(products().where_strict("price", "150").count(), 1);
    }

    #[test]
    fn null_filters_treat_missing_as_null() {
        assert_eq!(products().where_null("tag").count(), 2);
        assert_eq!(products().where_not_null("tag").count(), 1);
    }

    #[test]
    fn between_family() {
        assert_eq!(products().where_between("price", 100, 150).count(), 2);
        assert_eq!(products().where_not_between("price", 100, 150).count(), 1);
        assert_eq!(products().where_between("missing", Value::Null, 1).count(), 0);
    }

    #[test]
    fn in_family() {
        assert_eq!(products().where_in("price", [150, 200], false).count(), 2);
        assert_eq!(products().where_in("price", [150, 200], true).count(), 1);
        assert_eq!(products().where_not_in("p", ["Desk"], false).count(), 2);
    }

    #[test]
    fn regex_filter() {
        assert_eq!(products().where_regex("p", "^D").unwrap().count(), 2);
        assert!(matches!(
            products().where_regex("p", "["),
            Err(CollectionError::InvalidRegex(_))
        ));
    }
}
