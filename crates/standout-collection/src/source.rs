//! Every shape a collection can be built from.
//!
//! [`Source`] is a closed set of inputs. Eager construction accepts all of
//! them; lazy construction accepts everything except
//! [`Source::Iterator`], which can only be walked once.

use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::items::Items;
use crate::key::Key;
use crate::lazy::LazyCollection;
use crate::value::Value;

/// A boxed sequence of entries.
pub type Entries = Box<dyn Iterator<Item = (Key, Value)>>;

/// Zero-argument function returning a fresh sequence on every call.
pub type Producer = Rc<dyn Fn() -> Entries>;

/// Input accepted by [`Collection::new`] and [`LazyCollection::new`].
pub enum Source {
    /// An ordered mapping, used as-is.
    Items(Items),
    /// Another eager collection; its entries are copied.
    Collection(Collection),
    /// A single value: containers contribute their entries, null
    /// contributes nothing and scalars become a one-item list.
    Value(Value),
    /// Another lazy collection.
    Lazy(LazyCollection),
    /// A restartable generator.
    Producer(Producer),
    /// A single-use sequence. Eager construction drains it; lazy
    /// construction rejects it.
    Iterator(Entries),
}

impl Source {
    /// Wraps a restartable generator.
    ///
    /// `f` is called once per traversal and must return an independent
    /// sequence each time.
    pub fn producer<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (Key, Value)>,
        I::IntoIter: 'static,
    {
        Source::Producer(Rc::new(move || Box::new(f().into_iter()) as Entries))
    }

    /// Wraps a single-use sequence of entries.
    pub fn iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Key, Value)>,
        I::IntoIter: 'static,
    {
        Source::Iterator(Box::new(iter.into_iter()))
    }

    /// Drains the source into an ordered mapping.
    pub(crate) fn into_items(self) -> Items {
        match self {
            Source::Items(items) => items,
            Source::Collection(c) => c.into_items(),
            Source::Value(value) => value_items(value),
            Source::Lazy(lazy) => lazy.iterate().collect(),
            Source::Producer(producer) => producer().collect(),
            Source::Iterator(iter) => iter.collect(),
        }
    }
}

fn value_items(value: Value) -> Items {
    match value {
        Value::Null => Items::new(),
        Value::Map(items) => items,
        Value::Collection(c) => c.into_items(),
        scalar => Items::from_values([scalar]),
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Items(items) => f.debug_tuple("Items").field(items).finish(),
            Source::Collection(c) => f.debug_tuple("Collection").field(c).finish(),
            Source::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Source::Lazy(_) => f.write_str("Lazy(..)"),
            Source::Producer(_) => f.write_str("Producer(..)"),
            Source::Iterator(_) => f.write_str("Iterator(..)"),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Items(Items::new())
    }
}

impl From<Items> for Source {
    fn from(items: Items) -> Self {
        Source::Items(items)
    }
}

impl From<Collection> for Source {
    fn from(collection: Collection) -> Self {
        Source::Collection(collection)
    }
}

impl From<&Collection> for Source {
    fn from(collection: &Collection) -> Self {
        Source::Collection(collection.clone())
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Value(value)
    }
}

impl From<LazyCollection> for Source {
    fn from(lazy: LazyCollection) -> Self {
        Source::Lazy(lazy)
    }
}

impl From<serde_json::Value> for Source {
    fn from(json: serde_json::Value) -> Self {
        Source::Value(Value::from(json))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Source {
    fn from(values: Vec<T>) -> Self {
        Source::Items(Items::from_values(values))
    }
}
