use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

/// Read-only name → value table used for text interpolation and bind fallbacks.
pub type Variables = IndexMap<String, Value>;

/// Shared, mutable data scope that directives read from and write to.
///
/// Clones point at the same map: a two-way binding handler holds a clone
/// and writes user input back where the next render pass will see it.
#[derive(Clone, Default)]
pub struct Context {
    inner: Rc<RefCell<IndexMap<String, Value>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object. Non-object JSON yields an empty context.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Object(map) => Self::from(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.borrow_mut().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.borrow_mut().shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Run `f` against the current scope without cloning it.
    ///
    /// The scope is borrowed for the duration of `f`; `f` must not call
    /// [`Context::set`] on the same context.
    pub fn with<R>(&self, f: impl FnOnce(&IndexMap<String, Value>) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<IndexMap<String, Value>> for Context {
    fn from(map: IndexMap<String, Value>) -> Self {
        Context {
            inner: Rc::new(RefCell::new(map)),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.inner.borrow().iter()).finish()
    }
}
