use std::rc::Rc;

use docbind_core::{Context, EvalError, Variables};
use docbind_dom::{AttributeLookup, HtmlAttributes, Render, RenderDescriptor, ScopedSlot};
use indexmap::IndexMap;

use crate::bind::bind_attributes;
use crate::document::{DocumentNode, Element, PropValue};
use crate::interpolate::interpolate;
use crate::slots::{DEFAULT_SLOT, is_named_template, partition_slots};

/// Caller hook that may swap an element for a replacement before it is
/// bound. Returning `None` keeps the original.
pub type MutationHook = Rc<dyn Fn(&Element) -> Option<Element>>;

/// Per-pass inputs besides the renderer and the context.
pub struct TransformOptions<N> {
    /// Slot content supplied by whoever renders the document; `<slot>`
    /// placeholders draw from here.
    pub scoped_slots: IndexMap<String, ScopedSlot<N>>,
    pub variables: Variables,
    pub mutation_hook: Option<MutationHook>,
    pub attributes: Rc<dyn AttributeLookup>,
}

impl<N> Default for TransformOptions<N> {
    fn default() -> Self {
        Self {
            scoped_slots: IndexMap::new(),
            variables: Variables::new(),
            mutation_hook: None,
            attributes: Rc::new(HtmlAttributes),
        }
    }
}

impl<N> TransformOptions<N> {
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, slot: ScopedSlot<N>) -> Self {
        self.scoped_slots.insert(name.into(), slot);
        self
    }

    pub fn with_mutation_hook(mut self, hook: impl Fn(&Element) -> Option<Element> + 'static) -> Self {
        self.mutation_hook = Some(Rc::new(hook));
        self
    }

    pub fn with_attributes(mut self, attributes: impl AttributeLookup + 'static) -> Self {
        self.attributes = Rc::new(attributes);
        self
    }
}

/// Walks a document tree and hands each element to the renderer.
///
/// Holds no state besides its inputs; clones share them, which is how slot
/// providers re-render their content against the live context on every
/// call.
pub struct Transformer<R: Render> {
    renderer: Rc<R>,
    context: Context,
    options: Rc<TransformOptions<R::Node>>,
}

impl<R: Render> Clone for Transformer<R> {
    fn clone(&self) -> Self {
        Self {
            renderer: self.renderer.clone(),
            context: self.context.clone(),
            options: self.options.clone(),
        }
    }
}

impl<R> Transformer<R>
where
    R: Render + 'static,
    R::Node: 'static,
{
    pub fn new(renderer: R, context: Context, options: TransformOptions<R::Node>) -> Self {
        Self {
            renderer: Rc::new(renderer),
            context,
            options: Rc::new(options),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Transform one node. Text yields one leaf, an element one node, a
    /// `<slot>` whatever its provider renders (possibly nothing).
    pub fn transform(&self, node: &DocumentNode) -> Result<Vec<R::Node>, EvalError> {
        match node {
            DocumentNode::Text(value) => {
                let text = interpolate(value, &self.options.variables);
                Ok(vec![self.renderer.text(text)])
            }
            DocumentNode::Element(element) if element.tag == "slot" => self.slot(element),
            DocumentNode::Element(element) => Ok(vec![self.element(element)?]),
        }
    }

    pub fn transform_all(&self, nodes: &[DocumentNode]) -> Result<Vec<R::Node>, EvalError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.extend(self.transform(node)?);
        }
        Ok(out)
    }

    fn slot(&self, placeholder: &Element) -> Result<Vec<R::Node>, EvalError> {
        let name = placeholder
            .props
            .get("name")
            .and_then(PropValue::as_text)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SLOT);
        match self.options.scoped_slots.get(name) {
            Some(provider) => provider(),
            None => {
                log::trace!("slot '{name}' has no provider");
                Ok(Vec::new())
            }
        }
    }

    fn element(&self, original: &Element) -> Result<R::Node, EvalError> {
        let replaced;
        let element = match self.options.mutation_hook.as_ref().and_then(|hook| hook(original)) {
            Some(replacement) => {
                replaced = replacement;
                &replaced
            }
            None => original,
        };

        let slots = RenderDescriptor {
            scoped_slots: partition_slots(element, self),
            ..RenderDescriptor::new()
        };
        let props = bind_attributes(
            element,
            &self.context,
            &self.options.variables,
            self.options.attributes.as_ref(),
        )?;
        let descriptor = slots.merge(props);

        let mut children = Vec::with_capacity(element.children.len());
        for child in &element.children {
            match child {
                // handled by partition_slots
                _ if is_named_template(child) => {}
                DocumentNode::Element(template) if template.is_template() => {
                    children.extend(self.transform_all(&template.children)?);
                }
                other => children.extend(self.transform(other)?),
            }
        }

        Ok(self.renderer.element(&element.tag, descriptor, children))
    }
}

/// Transform `node` in one pass. A missing node renders nothing.
pub fn transform<R>(
    node: Option<&DocumentNode>,
    renderer: R,
    context: &Context,
    options: TransformOptions<R::Node>,
) -> Result<Vec<R::Node>, EvalError>
where
    R: Render + 'static,
    R::Node: 'static,
{
    match node {
        Some(node) => Transformer::new(renderer, context.clone(), options).transform(node),
        None => Ok(Vec::new()),
    }
}
