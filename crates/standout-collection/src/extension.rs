//! Named extension methods for collections.
//!
//! A [`Registry`] maps `(Target, name)` to a function taking the receiver
//! and positional arguments. Each thread has one registry; [`register`]
//! and [`register_lazy`] add to it and [`Collection::call`] /
//! [`LazyCollection::call`] dispatch through it.
//!
//! ```
//! use standout_collection::{extension, Collection, Value};
//!
//! extension::register("second", |c, _args| {
//!     Ok(c.values().get(1).cloned().unwrap_or_default())
//! });
//!
//! let c = Collection::new(vec!["a", "b", "c"]);
//! assert_eq!(c.call("second", &[]).unwrap(), Value::from("b"));
//! assert!(c.call("third", &[]).is_err());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::error::{CollectionError, Result};
use crate::lazy::LazyCollection;
use crate::value::Value;

/// Receiver type an extension method is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Collection,
    Lazy,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Collection => "Collection",
            Target::Lazy => "LazyCollection",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension method on [`Collection`].
pub type Method = Rc<dyn Fn(&Collection, &[Value]) -> Result<Value>>;

/// Extension method on [`LazyCollection`].
pub type LazyMethod = Rc<dyn Fn(&LazyCollection, &[Value]) -> Result<Value>>;

/// Table of extension methods, one namespace per [`Target`].
#[derive(Default, Clone)]
pub struct Registry {
    collection: HashMap<String, Method>,
    lazy: HashMap<String, LazyMethod>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a [`Collection`] method. Returns the one replaced.
    pub fn insert(&mut self, name: impl Into<String>, method: Method) -> Option<Method> {
        self.collection.insert(name.into(), method)
    }

    /// Adds or replaces a [`LazyCollection`] method. Returns the one replaced.
    pub fn insert_lazy(
        &mut self,
        name: impl Into<String>,
        method: LazyMethod,
    ) -> Option<LazyMethod> {
        self.lazy.insert(name.into(), method)
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.collection.get(name)
    }

    pub fn get_lazy(&self, name: &str) -> Option<&LazyMethod> {
        self.lazy.get(name)
    }

    pub fn contains(&self, target: Target, name: &str) -> bool {
        match target {
            Target::Collection => self.collection.contains_key(name),
            Target::Lazy => self.lazy.contains_key(name),
        }
    }

    /// Removes a method. Returns `true` if one was registered.
    pub fn remove(&mut self, target: Target, name: &str) -> bool {
        match target {
            Target::Collection => self.collection.remove(name).is_some(),
            Target::Lazy => self.lazy.remove(name).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.collection.len() + self.lazy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.collection.clear();
        self.lazy.clear();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut collection: Vec<&String> = self.collection.keys().collect();
        let mut lazy: Vec<&String> = self.lazy.keys().collect();
        collection.sort();
        lazy.sort();
        f.debug_struct("Registry")
            .field("collection", &collection)
            .field("lazy", &lazy)
            .finish()
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::new());
}

/// Registers a [`Collection`] method on this thread.
pub fn register<F>(name: &str, method: F)
where
    F: Fn(&Collection, &[Value]) -> Result<Value> + 'static,
{
    tracing::debug!(
        target_type = "Collection",
        method = name,
        "registering extension method"
    );
    REGISTRY.with(|r| r.borrow_mut().insert(name, Rc::new(method)));
}

/// Registers a [`LazyCollection`] method on this thread.
pub fn register_lazy<F>(name: &str, method: F)
where
    F: Fn(&LazyCollection, &[Value]) -> Result<Value> + 'static,
{
    tracing::debug!(
        target_type = "LazyCollection",
        method = name,
        "registering extension method"
    );
    REGISTRY.with(|r| r.borrow_mut().insert_lazy(name, Rc::new(method)));
}

pub fn has(target: Target, name: &str) -> bool {
    REGISTRY.with(|r| r.borrow().contains(target, name))
}

/// Removes a method from this thread's registry.
pub fn unregister(target: Target, name: &str) -> bool {
    REGISTRY.with(|r| r.borrow_mut().remove(target, name))
}

/// Empties this thread's registry.
pub fn clear() {
    REGISTRY.with(|r| r.borrow_mut().clear());
}

fn unknown(target: Target, name: &str) -> CollectionError {
    tracing::debug!(
        target_type = target.as_str(),
        method = name,
        "unknown extension method"
    );
    CollectionError::UnknownMethod {
        target: target.as_str(),
        name: name.to_string(),
    }
}

impl Collection {
    /// Calls a registered extension method with this collection as receiver.
    ///
    /// The method is looked up before it runs, so it may itself register
    /// or call other extensions.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = REGISTRY.with(|r| r.borrow().get(name).cloned());
        let method = method.ok_or_else(|| unknown(Target::Collection, name))?;
        tracing::debug!(
            target_type = "Collection",
            method = name,
            args = args.len(),
            "dispatching extension method"
        );
        method(self, args)
    }
}

impl LazyCollection {
    /// Calls a registered extension method with this lazy collection as receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = REGISTRY.with(|r| r.borrow().get_lazy(name).cloned());
        let method = method.ok_or_else(|| unknown(Target::Lazy, name))?;
        tracing::debug!(
            target_type = "LazyCollection",
            method = name,
            args = args.len(),
            "dispatching extension method"
        );
        method(self, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_namespaces_are_separate() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        let size: Method = Rc::new(|c: &Collection, _: &[Value]| -> Result<Value> {
            Ok(Value::from(c.count()))
        });
        registry.insert("size", size);
        assert!(registry.contains(Target::Collection, "size"));
        assert!(!registry.contains(Target::Lazy, "size"));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(Target::Collection, "size"));
        assert!(!registry.remove(Target::Collection, "size"));
    }

    #[test]
    fn dispatch_binds_receiver_and_args() {
        register("scaled_sum", |c, args| {
            let factor = args
                .first()
                .and_then(Value::to_number)
                .map_or(1.0, |n| n.to_f64());
            Ok(Value::from(c.sum().to_f64() * factor))
        });
        let c = Collection::new(vec![1, 2, 3]);
        assert_eq!(c.call("scaled_sum", &[Value::from(2)]).unwrap(), Value::from(12.0));
        assert!(has(Target::Collection, "scaled_sum"));
        assert!(unregister(Target::Collection, "scaled_sum"));
        assert!(!has(Target::Collection, "scaled_sum"));
    }

    #[test]
    fn unknown_method_names_the_target() {
        let err = Collection::empty().call("nope", &[]).unwrap_err();
        assert!(matches!(
            err,
            CollectionError::UnknownMethod { target: "Collection", ref name } if name == "nope"
        ));
        let err = LazyCollection::empty().call("nope", &[]).unwrap_err();
        assert_eq!(err.to_string(), "no extension method 'nope' registered for LazyCollection");
    }

    #[test]
    fn lazy_methods_and_reentrant_calls() {
        register_lazy("head", |lazy, _| Ok(lazy.first().unwrap_or_default()));
        register("first_via_lazy", |c, args| c.lazy().call("head", args));
        let c = Collection::new(vec!["x", "y"]);
        assert_eq!(c.call("first_via_lazy", &[]).unwrap(), Value::from("x"));
        clear();
        assert!(!has(Target::Lazy, "head"));
    }
}
