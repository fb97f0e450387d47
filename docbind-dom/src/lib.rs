pub mod attributes;
pub mod descriptor;
pub mod events;
pub mod html;

pub use attributes::{AttributeLookup, HtmlAttributes};
pub use descriptor::{RenderDescriptor, ScopedSlot};

#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element {
        tag: String,
        props: Props,
        children: Vec<VNode>,
    },
    Text(String),
}

pub type Props = RenderDescriptor<VNode>;

impl VNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text(_) => None,
        }
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            VNode::Element { props, .. } => Some(props),
            VNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text(_) => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text(t) => t.clone(),
            VNode::Element { children, .. } => {
                children.iter().map(VNode::text_content).collect()
            }
        }
    }
}

/// The element-construction function of a UI backend.
///
/// The transformer hands every element it produces to `element`, and every
/// text leaf to `text`, and never inspects the returned nodes.
pub trait Render {
    type Node;

    fn element(
        &self,
        tag: &str,
        descriptor: RenderDescriptor<Self::Node>,
        children: Vec<Self::Node>,
    ) -> Self::Node;

    fn text(&self, value: String) -> Self::Node;
}

/// Builds in-memory [`VNode`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct VNodeRenderer;

impl Render for VNodeRenderer {
    type Node = VNode;

    fn element(&self, tag: &str, descriptor: Props, children: Vec<VNode>) -> VNode {
        h(tag, descriptor, children)
    }

    fn text(&self, value: String) -> VNode {
        text(value)
    }
}

pub fn h(tag: impl Into<String>, props: impl Into<Props>, children: Vec<VNode>) -> VNode {
    VNode::Element {
        tag: tag.into(),
        props: props.into(),
        children,
    }
}
pub fn text(t: impl Into<String>) -> VNode {
    VNode::Text(t.into())
}
