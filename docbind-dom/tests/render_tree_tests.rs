use std::cell::RefCell;
use std::rc::Rc;

use docbind_core::{Handler, Value};
use docbind_dom::events::{dispatch, find_by_tag};
use docbind_dom::html::to_html;
use docbind_dom::{Props, VNode, h, text};

#[test]
fn dispatch_invokes_handler_with_payload() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handler = {
        let seen = seen.clone();
        Handler::new(move |v| seen.borrow_mut().push(v))
    };
    let vnode = h("button", Props::new().on("click", handler), vec![text("+1")]);

    let n = dispatch("click", Value::from(7), &vnode);
    assert_eq!(n, 1);
    assert_eq!(&*seen.borrow(), &vec![Value::from(7)]);
}

#[test]
fn dispatch_handles_multiple_targets() {
    let count = Rc::new(RefCell::new(0));
    let handler = {
        let count = count.clone();
        Handler::new(move |_| *count.borrow_mut() += 1)
    };
    let vnode = h(
        "div",
        Props::new(),
        vec![
            h("button", Props::new().on("click", handler.clone()), vec![]),
            h("button", Props::new().on("click", handler), vec![]),
        ],
    );
    assert_eq!(dispatch("click", Value::Null, &vnode), 2);
    assert_eq!(*count.borrow(), 2);
    assert_eq!(dispatch("input", Value::Null, &vnode), 0);
}

#[test]
fn descriptor_equality_compares_handlers_by_name() {
    let a = Props::new().on("click", Handler::new(|_| {}));
    let b = Props::new().on("click", Handler::new(|_| {}));
    assert_eq!(a, b);
    assert_ne!(a, Props::new());
}

#[test]
fn merge_prefers_later_entries() {
    let a = Props::new().set("id", "a").set("title", "t");
    let b = Props::new().set("id", "b");
    let merged = a.merge(b);
    assert_eq!(merged.attrs.get("id"), Some(&Value::from("b")));
    assert_eq!(merged.attrs.get("title"), Some(&Value::from("t")));
}

#[test]
fn html_output_for_nested_tree() {
    let tree = h(
        "div",
        Props::new()
            .root("class", Value::Array(vec![Value::from("a"), Value::from("docbind-content")]))
            .set("id", "main")
            .set("hidden", true)
            .set("draft", false),
        vec![
            h("p", (), vec![text("Hi")]),
            h("br", (), vec![]),
            h("input", Props::new().set("value", 3), vec![]),
        ],
    );
    assert_eq!(
        to_html(&tree),
        r#"<div class="a docbind-content" id="main" hidden><p>Hi</p><br><input value="3"></div>"#
    );
}

#[test]
fn find_by_tag_walks_depth_first() {
    let tree = h("div", (), vec![h("section", (), vec![h("em", (), vec![text("x")])])]);
    let em = find_by_tag(&tree, "em").map(VNode::text_content);
    assert_eq!(em.as_deref(), Some("x"));
    assert!(find_by_tag(&tree, "table").is_none());
}
