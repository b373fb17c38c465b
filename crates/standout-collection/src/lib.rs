//! Chainable ordered collections.
//!
//! A [`Collection`] is an ordered mapping from [`Key`] (integer or
//! string) to dynamically typed [`Value`]s, with a fluent API for
//! transforming, querying, aggregating and sorting it. A
//! [`LazyCollection`] offers the same vocabulary over restartable,
//! possibly open-ended sources, pulling one element at a time.
//!
//! - Dotted paths (`"dims.w"`, `"tags.0"`) address nested values; see [`path`]
//! - `where_*` filters compare resolved values with loose or strict rules
//! - `sort_by` + `then_by` build stable, lexicographic multi-key sorts
//! - aggregates (`sum`, `avg`, `median`, `mode`, ...) read raw values, a
//!   path or a callback through a [`Criterion`]
//!
//! # Quick Start
//!
//! ```rust
//! use standout_collection::{collect, lazy, Number};
//! use serde_json::json;
//!
//! let products = collect(json!([
//!     {"name": "Desk",  "kind": "wood",  "price": 200},
//!     {"name": "Lamp",  "kind": "metal", "price": 40},
//!     {"name": "Door",  "kind": "wood",  "price": 150},
//!     {"name": "Chair", "kind": "wood",  "price": 150},
//! ]));
//!
//! let wooden = products
//!     .where_eq("kind", "wood")
//!     .sort_by_desc("price")
//!     .then_by("name")
//!     .unwrap();
//!
//! assert_eq!(
//!     wooden.pluck("name", None).to_json().unwrap(),
//!     r#"["Desk","Chair","Door"]"#
//! );
//! assert_eq!(products.median_by("price"), Some(Number::F64(150.0)));
//!
//! let squares = lazy(products)
//!     .unwrap()
//!     .map(|_, k| (k.as_int().unwrap_or(0) + 1).pow(2).into());
//! assert_eq!(squares.sum(), Number::I64(30));
//! ```
//!
//! # Comparison Rules
//!
//! | Operator | Meaning |
//! |----------|---------|
//! | `=` `==` | loose equality: `1 == "1"`, `null == false` |
//! | `===` | strict: same kind and value |
//! | `!=` `<>` `!==` | negations of the above |
//! | `<` `>` `<=` `>=` | loose ordering; numeric strings compare as numbers |
//! | `<=>` | three-way; truthy when the operands differ |
//!
//! Anything else is rejected with [`CollectionError::InvalidOperator`].

pub mod arr;
mod clause;
mod collection;
mod criterion;
mod error;
pub mod extension;
mod items;
mod key;
mod lazy;
mod op;
mod ordering;
pub mod path;
mod sort;
mod source;
mod value;

// Re-export public API
pub use clause::{Clause, LikePattern, LikeShape, Predicate};
pub use collection::Collection;
pub use criterion::Criterion;
pub use error::{CollectionError, Result};
pub use items::Items;
pub use key::Key;
pub use lazy::LazyCollection;
pub use op::{compare, spaceship, Op};
pub use ordering::{loose_cmp, loose_eq, natural_cmp, strict_eq, Collation, Dir};
pub use path::Lookup;
pub use sort::{SortKey, SortState};
pub use source::{Entries, Producer, Source};
pub use value::{Number, Value};

/// Builds an eager collection from any supported source.
pub fn collect(source: impl Into<Source>) -> Collection {
    Collection::new(source)
}

/// Builds a lazy collection; fails for single-use iterators.
pub fn lazy(source: impl Into<Source>) -> Result<LazyCollection> {
    LazyCollection::new(source)
}
