use std::fmt::Write;

use docbind_core::Value;

use crate::{Props, VNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a render tree to HTML. Event handlers and slots have no
/// markup and are dropped.
pub fn to_html(node: &VNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &VNode, out: &mut String) {
    match node {
        VNode::Text(t) => out.push_str(&escape_html(t)),
        VNode::Element {
            tag,
            props,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            write_attrs(props, out);
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for c in children {
                write_node(c, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn write_attrs(props: &Props, out: &mut String) {
    if let Some(class) = props.root_props.get("class").and_then(class_list) {
        write_attr(out, "class", &Value::String(class));
    }
    if let Some(style) = props.root_props.get("style").map(style_text) {
        write_attr(out, "style", &Value::String(style));
    }
    for (name, value) in &props.attrs {
        write_attr(out, name, value);
    }
}

fn write_attr(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null | Value::Bool(false) | Value::Function(_) => {}
        Value::Bool(true) => {
            let _ = write!(out, " {name}");
        }
        other => {
            let _ = write!(out, " {name}=\"{}\"", escape_html(&other.to_display()));
        }
    }
}

/// `"a b"`, `["a", "b"]` or `{ a: true, b: false }` → `"a b"` / `"a"`.
fn class_list(value: &Value) -> Option<String> {
    let names: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(class_list).collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| v.truthy())
            .map(|(k, _)| k.clone())
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_display()],
    };
    let joined = names
        .into_iter()
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

fn style_text(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}:{}", v.to_display()))
            .collect::<Vec<_>>()
            .join(";"),
        other => other.to_display(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
