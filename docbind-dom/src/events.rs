use docbind_core::{Handler, Value};

use crate::VNode;

/// Dispatches an event by scanning the VNode tree for `on` handlers named
/// `event` and invoking each with a clone of `payload`.
/// Returns the number of handlers invoked.
pub fn dispatch(event: &str, payload: Value, tree: &VNode) -> usize {
    fn walk(node: &VNode, event: &str, out: &mut Vec<Handler>) {
        match node {
            VNode::Text(_) => {}
            VNode::Element {
                props, children, ..
            } => {
                if let Some(h) = props.on.get(event) {
                    out.push(h.clone());
                }
                for c in children {
                    walk(c, event, out);
                }
            }
        }
    }
    let mut targets = Vec::new();
    walk(tree, event, &mut targets);
    // Handlers may write to the context; the tree is not borrowed while they run.
    for h in &targets {
        h.call(payload.clone());
    }
    log::trace!("dispatched '{event}' to {} handler(s)", targets.len());
    targets.len()
}

/// Finds the first element with the given tag, depth first.
pub fn find_by_tag<'a>(tree: &'a VNode, tag: &str) -> Option<&'a VNode> {
    match tree {
        VNode::Text(_) => None,
        VNode::Element { tag: t, children, .. } => {
            if t == tag {
                return Some(tree);
            }
            children.iter().find_map(|c| find_by_tag(c, tag))
        }
    }
}
