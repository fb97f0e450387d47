use std::fmt;
use std::rc::Rc;

use docbind_core::{EvalError, Handler, Value};
use indexmap::IndexMap;

/// Lazy slot content. Every call renders the slot again against the live
/// context; nothing is cached between calls.
pub type ScopedSlot<N> = Rc<dyn Fn() -> Result<Vec<N>, EvalError>>;

/// Everything the backend needs to build one element besides its tag and
/// children.
pub struct RenderDescriptor<N> {
    pub attrs: IndexMap<String, Value>,
    /// `class` and `style`, kept apart from `attrs`.
    pub root_props: IndexMap<String, Value>,
    pub on: IndexMap<String, Handler>,
    pub scoped_slots: IndexMap<String, ScopedSlot<N>>,
}

impl<N> RenderDescriptor<N> {
    pub fn new() -> Self {
        Self {
            attrs: IndexMap::new(),
            root_props: IndexMap::new(),
            on: IndexMap::new(),
            scoped_slots: IndexMap::new(),
        }
    }

    pub fn set(mut self, k: impl Into<String>, v: impl Into<Value>) -> Self {
        self.attrs.insert(k.into(), v.into());
        self
    }

    pub fn root(mut self, k: impl Into<String>, v: impl Into<Value>) -> Self {
        self.root_props.insert(k.into(), v.into());
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.on.insert(event.into(), handler);
        self
    }

    /// Overlay `other` onto `self`; entries of `other` win.
    pub fn merge(mut self, other: RenderDescriptor<N>) -> Self {
        self.attrs.extend(other.attrs);
        self.root_props.extend(other.root_props);
        self.on.extend(other.on);
        self.scoped_slots.extend(other.scoped_slots);
        self
    }

    /// Render the named slot, if present.
    pub fn render_slot(&self, name: &str) -> Option<Result<Vec<N>, EvalError>> {
        self.scoped_slots.get(name).map(|slot| slot())
    }
}

impl<N> Default for RenderDescriptor<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for RenderDescriptor<N> {
    fn clone(&self) -> Self {
        Self {
            attrs: self.attrs.clone(),
            root_props: self.root_props.clone(),
            on: self.on.clone(),
            scoped_slots: self.scoped_slots.clone(),
        }
    }
}

// Handlers and slots are closures; structural equality compares them by name.
impl<N> PartialEq for RenderDescriptor<N> {
    fn eq(&self, other: &Self) -> bool {
        self.attrs == other.attrs
            && self.root_props == other.root_props
            && self.on.keys().eq(other.on.keys())
            && self.scoped_slots.keys().eq(other.scoped_slots.keys())
    }
}

impl<N> fmt::Debug for RenderDescriptor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderDescriptor")
            .field("attrs", &self.attrs)
            .field("root_props", &self.root_props)
            .field("on", &self.on.keys().collect::<Vec<_>>())
            .field("scoped_slots", &self.scoped_slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<N> From<()> for RenderDescriptor<N> {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl<N> From<Vec<(&str, &str)>> for RenderDescriptor<N> {
    fn from(v: Vec<(&str, &str)>) -> Self {
        let mut p = Self::new();
        for (k, v) in v {
            p.attrs.insert(k.to_string(), Value::from(v));
        }
        p
    }
}
