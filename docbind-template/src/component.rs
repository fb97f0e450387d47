//! Entry point for rendering a whole content document inside a host element.

use std::rc::Rc;

use docbind_core::{Context, EvalError, Handler, Value, Variables};
use docbind_dom::{Render, RenderDescriptor, ScopedSlot};
use indexmap::IndexMap;

use crate::document::{Document, Element};
use crate::editor::{self, EditorError, EditorOverlay, EditorPayload, MountPoint};
use crate::transform::{MutationHook, TransformOptions, Transformer};

/// Class added to every rendered content root.
pub const CONTENT_CLASS: &str = "docbind-content";

/// Name the content component registers under; excluded from the
/// component list sent to the editor.
pub const COMPONENT_NAME: &str = "DocbindContent";

pub type EditorFactory =
    Rc<dyn Fn(EditorPayload, &MountPoint) -> Result<Box<dyn EditorOverlay>, EditorError>>;

/// Props of the content component.
pub struct ContentProps {
    pub document: Option<Rc<Document>>,
    pub tag: String,
    pub changer: Option<MutationHook>,
    /// Directive scope. Defaults to the document's own metadata fields.
    pub context: Context,
    /// Enables double-click editing when set.
    pub editor: Option<EditorFactory>,
}

impl ContentProps {
    pub fn new(document: Document) -> Self {
        let context = Context::from_json(serde_json::Value::Object(document.meta.clone()));
        Self {
            document: Some(Rc::new(document)),
            tag: "div".to_string(),
            changer: None,
            context,
            editor: None,
        }
    }

    /// Props without a document; renders nothing.
    pub fn empty() -> Self {
        Self {
            document: None,
            tag: "div".to_string(),
            changer: None,
            context: Context::new(),
            editor: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_changer(mut self, changer: impl Fn(&Element) -> Option<Element> + 'static) -> Self {
        self.changer = Some(Rc::new(changer));
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_editor(
        mut self,
        factory: impl Fn(EditorPayload, &MountPoint) -> Result<Box<dyn EditorOverlay>, EditorError>
        + 'static,
    ) -> Self {
        self.editor = Some(Rc::new(factory));
        self
    }
}

/// What the parent passes besides props: class, style, plain attributes,
/// listeners and slot content.
pub struct AmbientData<N> {
    pub class: Option<Value>,
    pub style: Option<Value>,
    /// Component props; override same-named `body.props`.
    pub props: IndexMap<String, Value>,
    /// Become interpolation variables, with camelized names.
    pub attrs: IndexMap<String, Value>,
    pub on: IndexMap<String, Handler>,
    pub scoped_slots: IndexMap<String, ScopedSlot<N>>,
    /// Components registered in the parent, reported to the editor.
    pub components: Vec<String>,
}

impl<N> Default for AmbientData<N> {
    fn default() -> Self {
        Self {
            class: None,
            style: None,
            props: IndexMap::new(),
            attrs: IndexMap::new(),
            on: IndexMap::new(),
            scoped_slots: IndexMap::new(),
            components: Vec::new(),
        }
    }
}

impl<N> AmbientData<N> {
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<Value>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.on.insert(event.into(), handler);
        self
    }

    pub fn slot(mut self, name: impl Into<String>, slot: ScopedSlot<N>) -> Self {
        self.scoped_slots.insert(name.into(), slot);
        self
    }
}

/// Render `props.document` into one `props.tag` element.
///
/// Returns `Ok(None)` when there is no document body to render.
pub fn render_content<R>(
    props: ContentProps,
    data: AmbientData<R::Node>,
    renderer: R,
) -> Result<Option<R::Node>, EvalError>
where
    R: Render + 'static,
    R::Node: 'static,
{
    let Some(document) = props.document else {
        return Ok(None);
    };
    let Some(body) = document.body.as_ref() else {
        log::debug!("document has no body to render");
        return Ok(None);
    };
    let Some(children) = body.children.as_ref() else {
        log::debug!("document body has no children");
        return Ok(None);
    };

    let mut classes = class_names(data.class.as_ref());
    classes.push(Value::from(CONTENT_CLASS));

    let variables: Variables = data
        .attrs
        .into_iter()
        .map(|(k, v)| (camelize(&k), v))
        .collect();

    let mut descriptor = RenderDescriptor::new();
    descriptor
        .root_props
        .insert("class".to_string(), Value::Array(classes));
    if let Some(style) = data.style {
        descriptor.root_props.insert("style".to_string(), style);
    }
    let mut component_props: IndexMap<String, Value> = body
        .props
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect();
    component_props.extend(data.props);
    if !component_props.is_empty() {
        descriptor
            .root_props
            .insert("props".to_string(), Value::Object(component_props));
    }
    descriptor.on = data.on;

    if let Some(factory) = props.editor {
        let snapshot = EditorPayload {
            document: document.clone(),
            components: data
                .components
                .into_iter()
                .filter(|c| c != COMPONENT_NAME)
                .collect(),
            variables: variables.keys().cloned().collect(),
            slots: data.scoped_slots.keys().cloned().collect(),
            initial_interacted: (0.0, 0.0),
            mount_target: None,
        };
        let previous = descriptor.on.get("dblclick").cloned();
        descriptor.on.insert(
            "dblclick".to_string(),
            editor_trigger(snapshot, previous, factory),
        );
    }

    let options = TransformOptions {
        scoped_slots: data.scoped_slots,
        variables,
        mutation_hook: props.changer,
        ..TransformOptions::default()
    };
    let transformer = Transformer::new(renderer, props.context, options);
    let nodes = transformer.transform_all(children)?;
    Ok(Some(transformer.renderer().element(&props.tag, descriptor, nodes)))
}

/// `dblclick` handler: run the parent's listener, then open the editor at
/// the pointer position.
fn editor_trigger(
    snapshot: EditorPayload,
    previous: Option<Handler>,
    factory: EditorFactory,
) -> Handler {
    Handler::new(move |event| {
        if let Some(previous) = &previous {
            previous.call(event.clone());
        }
        let coordinate = |key: &str| {
            event
                .as_object()
                .and_then(|e| e.get(key))
                .map_or(0.0, Value::to_number)
        };
        // the listener sits on the host, so `currentTarget` is the content
        // root; backends that only report `target` pass that through
        let mount_target = event.as_object().and_then(|e| {
            e.get("currentTarget")
                .filter(|t| !matches!(t, Value::Null))
                .or_else(|| e.get("target"))
                .cloned()
        });
        let payload = EditorPayload {
            initial_interacted: (coordinate("clientX"), coordinate("clientY")),
            mount_target,
            ..snapshot.clone()
        };
        if let Err(e) = editor::activate(payload, |p, mount| factory(p, mount)) {
            log::warn!("{e}");
        }
    })
}

/// Parent `class` in any of its forms → list of class names.
fn class_names(class: Option<&Value>) -> Vec<Value> {
    match class {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, on)| on.truthy())
            .map(|(name, _)| Value::from(name.as_str()))
            .collect(),
        Some(other) => vec![other.clone()],
    }
}

/// Attribute name → variable name: lowercase the first letter, uppercase
/// the first letter of every later word, drop whitespace.
///
/// Hyphens are word separators but are kept: `registration-link` becomes
/// `registration-Link`.
pub fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_word = false;
    for (i, c) in s.char_indices() {
        let word = c.is_ascii_alphanumeric() || c == '_';
        let starts_word = word && (i == 0 || !prev_word);
        if starts_word || c.is_ascii_uppercase() {
            if i == 0 {
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c.to_ascii_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_word = word;
    }
    out.retain(|c| !c.is_whitespace());
    out
}
