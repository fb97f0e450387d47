use std::rc::Rc;

use docbind_dom::{Render, ScopedSlot};
use indexmap::IndexMap;

use crate::document::{DocumentNode, Element};
use crate::transform::Transformer;

pub const DEFAULT_SLOT: &str = "default";

/// Name a `template` declares with `#name` or `v-slot:name`. The first
/// slot key wins; no key, or an empty name, means [`DEFAULT_SLOT`].
pub fn slot_name(template: &Element) -> &str {
    let Some(key) = template
        .props
        .keys()
        .find(|k| k.starts_with('#') || k.starts_with("v-slot:"))
    else {
        return DEFAULT_SLOT;
    };
    match key.split([':', '#']).nth(1) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_SLOT,
    }
}

/// Whether `node` is a `template` whose content belongs to a named slot
/// rather than inline.
pub fn is_named_template(node: &DocumentNode) -> bool {
    matches!(node, DocumentNode::Element(e) if e.is_template() && slot_name(e) != DEFAULT_SLOT)
}

/// Turn every named `template` child of `element` into a lazy slot.
///
/// Default templates stay where they are; the transformer inlines their
/// content.
pub fn partition_slots<R>(
    element: &Element,
    transformer: &Transformer<R>,
) -> IndexMap<String, ScopedSlot<R::Node>>
where
    R: Render + 'static,
    R::Node: 'static,
{
    let mut slots: IndexMap<String, ScopedSlot<R::Node>> = IndexMap::new();
    for child in &element.children {
        let DocumentNode::Element(template) = child else {
            continue;
        };
        if !is_named_template(child) {
            continue;
        }
        let name = slot_name(template).to_string();
        let content = template.children.clone();
        let transformer = transformer.clone();
        log::trace!("<{}> provides slot '{name}'", element.tag);
        slots.insert(name, Rc::new(move || transformer.transform_all(&content)));
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names() {
        assert_eq!(slot_name(&Element::new("template").prop("#aside", "")), "aside");
        assert_eq!(slot_name(&Element::new("template").prop("v-slot:footer", "")), "footer");
        assert_eq!(slot_name(&Element::new("template")), DEFAULT_SLOT);
        assert_eq!(slot_name(&Element::new("template").prop("#", "")), DEFAULT_SLOT);
        assert_eq!(slot_name(&Element::new("template").prop("v-slot:", "")), DEFAULT_SLOT);
        assert_eq!(slot_name(&Element::new("template").prop("#a:b", "")), "a");
    }

    #[test]
    fn first_slot_key_wins() {
        let t = Element::new("template")
            .prop("class", "x")
            .prop("#first", "")
            .prop("#second", "");
        assert_eq!(slot_name(&t), "first");
    }

    #[test]
    fn only_named_templates_are_named() {
        let named: DocumentNode = Element::new("template").prop("#aside", "").into();
        let unnamed: DocumentNode = Element::new("template").into();
        let div: DocumentNode = Element::new("div").prop("#aside", "").into();
        assert!(is_named_template(&named));
        assert!(!is_named_template(&unnamed));
        assert!(!is_named_template(&div));
    }
}
