use std::cell::RefCell;
use std::rc::Rc;

use docbind_core::{Context, EvalError, Handler, Value};
use docbind_dom::{VNode, VNodeRenderer, events, html};
use docbind_template::component::CONTENT_CLASS;
use docbind_template::editor::{self, MOUNT_POINT_ATTRIBUTE};
use docbind_template::{
    Activation, AmbientData, ContentProps, Document, EditorError, EditorOverlay, EditorPayload,
    render_content,
};
use serde_json::json;

fn doc(value: serde_json::Value) -> Document {
    serde_json::from_value(value).unwrap()
}

fn greeting() -> Document {
    doc(json!({
        "title": "Welcome",
        "body": {
            "type": "root",
            "children": [
                { "type": "element", "tag": "h1", "props": { ":title": "title" },
                  "children": [{ "type": "text", "value": "Hi {{ user-Name }}" }] },
                { "type": "element", "tag": "slot", "props": { "name": "footer" } }
            ]
        }
    }))
}

#[derive(Default)]
struct Recorder {
    updates: Rc<RefCell<Vec<EditorPayload>>>,
    destroyed: Rc<RefCell<bool>>,
}

impl EditorOverlay for Recorder {
    fn update(&mut self, payload: EditorPayload) {
        self.updates.borrow_mut().push(payload);
    }

    fn destroyed(&mut self) {
        *self.destroyed.borrow_mut() = true;
    }
}

#[test]
fn missing_body_renders_nothing() {
    let out = render_content(ContentProps::empty(), AmbientData::default(), VNodeRenderer).unwrap();
    assert!(out.is_none());

    let bodiless = ContentProps::new(doc(json!({ "title": "x" })));
    let out = render_content(bodiless, AmbientData::default(), VNodeRenderer).unwrap();
    assert!(out.is_none());
}

#[test]
fn renders_document_inside_host_element() {
    let data = AmbientData::<VNode>::default()
        .class(vec![Value::from("prose")])
        .attr("user-name", "Ada")
        .slot(
            "footer",
            Rc::new(|| Ok::<_, EvalError>(vec![VNode::Text("bye".into())])),
        );
    let root = render_content(ContentProps::new(greeting()).with_tag("article"), data, VNodeRenderer)
        .unwrap()
        .unwrap();

    assert_eq!(root.tag(), Some("article"));
    let props = root.props().unwrap();
    assert_eq!(
        props.root_props.get("class"),
        Some(&Value::Array(vec![Value::from("prose"), Value::from(CONTENT_CLASS)]))
    );
    assert!(props.attrs.is_empty());

    // the document's own metadata is the directive context
    let h1 = &root.children()[0];
    assert_eq!(h1.props().unwrap().attrs.get("title"), Some(&Value::from("Welcome")));
    assert_eq!(h1.text_content(), "Hi Ada");
    assert_eq!(root.children()[1], VNode::Text("bye".into()));
}

#[test]
fn ambient_attributes_are_camelized_into_variables() {
    let document = doc(json!({
        "body": { "children": [{ "type": "text", "value": "{{ registration-Link }} $title" }] }
    }));
    let data = AmbientData::default()
        .attr("registration-link", "/join")
        .attr("Title", "Docs");
    let root = render_content(ContentProps::new(document), data, VNodeRenderer)
        .unwrap()
        .unwrap();
    assert_eq!(root.text_content(), "/join Docs");
}

#[test]
fn explicit_context_and_changer() {
    let ctx = Context::from_json(json!({ "title": "From context" }));
    let props = ContentProps::new(greeting())
        .with_context(ctx)
        .with_changer(|e| (e.tag == "h1").then(|| {
            let mut e = e.clone();
            e.tag = "h2".into();
            e
        }));
    let root = render_content(props, AmbientData::default(), VNodeRenderer)
        .unwrap()
        .unwrap();
    let heading = &root.children()[0];
    assert_eq!(heading.tag(), Some("h2"));
    assert_eq!(
        heading.props().unwrap().attrs.get("title"),
        Some(&Value::from("From context"))
    );
}

#[test]
fn html_output_carries_marker_class() {
    let document = doc(json!({
        "body": { "children": [{ "tag": "p", "children": [{ "type": "text", "value": "x" }] }] }
    }));
    let root = render_content(ContentProps::new(document), AmbientData::default(), VNodeRenderer)
        .unwrap()
        .unwrap();
    assert_eq!(html::to_html(&root), "<div class=\"docbind-content\"><p>x</p></div>");
}

#[test]
fn double_click_chains_caller_handler_and_opens_editor() {
    let caller_calls = Rc::new(RefCell::new(0));
    let seen = caller_calls.clone();
    let updates = Rc::new(RefCell::new(Vec::new()));
    let created = Rc::new(RefCell::new(Vec::<EditorPayload>::new()));

    let record = created.clone();
    let overlay_updates = updates.clone();
    let props = ContentProps::new(greeting()).with_editor(move |payload, mount| {
        assert_eq!(mount.attribute, MOUNT_POINT_ATTRIBUTE);
        record.borrow_mut().push(payload);
        Ok(Box::new(Recorder {
            updates: overlay_updates.clone(),
            ..Recorder::default()
        }) as Box<dyn EditorOverlay>)
    });
    let mut data = AmbientData::default()
        .attr("user-name", "Ada")
        .on("dblclick", Handler::new(move |_| *seen.borrow_mut() += 1));
    data.components = vec!["DocbindContent".into(), "Callout".into()];

    let root = render_content(props, data, VNodeRenderer).unwrap().unwrap();
    let event = Value::from(json!({ "clientX": 10, "clientY": 20, "target": "content" }));

    events::dispatch("dblclick", event.clone(), &root);
    assert_eq!(*caller_calls.borrow(), 1);
    assert!(editor::is_active());
    assert_eq!(editor::mount_point_count(), 1);

    let first = created.borrow()[0].clone();
    assert_eq!(first.initial_interacted, (10.0, 20.0));
    assert_eq!(first.components, vec!["Callout".to_string()]);
    assert_eq!(first.variables, vec!["user-Name".to_string()]);
    assert_eq!(first.mount_target, Some(Value::from("content")));

    events::dispatch("dblclick", event, &root);
    assert_eq!(*caller_calls.borrow(), 2);
    assert_eq!(created.borrow().len(), 1);
    assert_eq!(updates.borrow().len(), 1);
    assert_eq!(editor::mount_point_count(), 1);

    assert!(editor::dispose());
    assert_eq!(editor::mount_point_count(), 0);
}

#[test]
fn editor_lifecycle() {
    let destroyed = Rc::new(RefCell::new(false));
    let payload = EditorPayload {
        document: Rc::new(greeting()),
        components: Vec::new(),
        variables: Vec::new(),
        slots: vec!["footer".into()],
        initial_interacted: (0.0, 0.0),
        mount_target: None,
    };

    assert!(!editor::is_active());
    assert!(!editor::dispose());

    let flag = destroyed.clone();
    let first = editor::activate(payload.clone(), |_, _| {
        Ok(Box::new(Recorder {
            destroyed: flag,
            ..Recorder::default()
        }) as Box<dyn EditorOverlay>)
    });
    assert_eq!(first, Ok(Activation::Created));

    let second = editor::activate(payload, |_, _| panic!("overlay must be reused"));
    assert_eq!(second, Ok(Activation::Updated));
    assert_eq!(editor::mount_points().len(), 1);

    assert!(editor::dispose());
    assert!(*destroyed.borrow());
    assert!(!editor::is_active());
    assert_eq!(editor::mount_point_count(), 0);
}

#[test]
fn failed_editor_mount_detaches_its_mount_point() {
    let payload = EditorPayload {
        document: Rc::new(greeting()),
        components: Vec::new(),
        variables: Vec::new(),
        slots: Vec::new(),
        initial_interacted: (1.0, 2.0),
        mount_target: None,
    };
    let result = editor::activate(payload, |_, _| Err(EditorError::Mount("no overlay".into())));
    assert_eq!(result, Err(EditorError::Mount("no overlay".into())));
    assert!(!editor::is_active());
    assert_eq!(editor::mount_point_count(), 0);
}

#[test]
fn body_props_reach_the_host_and_ambient_props_win() {
    let document = doc(json!({
        "body": {
            "props": { "lang": "ru", "dir": "ltr" },
            "children": [{ "type": "text", "value": "x" }]
        }
    }));
    let data = AmbientData::default().prop("dir", "rtl");
    let root = render_content(ContentProps::new(document), data, VNodeRenderer)
        .unwrap()
        .unwrap();

    let props = root.props().unwrap().root_props.get("props").unwrap();
    let props = props.as_object().unwrap();
    assert_eq!(props.get("lang"), Some(&Value::from("ru")));
    assert_eq!(props.get("dir"), Some(&Value::from("rtl")));
    assert_eq!(html::to_html(&root), "<div class=\"docbind-content\">x</div>");
}

#[test]
fn editor_mounts_on_the_content_root_of_the_gesture() {
    let targets = Rc::new(RefCell::new(Vec::new()));
    let record = targets.clone();
    let props = ContentProps::new(greeting()).with_editor(move |payload, _| {
        record.borrow_mut().push(payload.mount_target);
        Ok(Box::new(Recorder::default()) as Box<dyn EditorOverlay>)
    });
    let root = render_content(props, AmbientData::default(), VNodeRenderer)
        .unwrap()
        .unwrap();

    let event = Value::from(json!({ "target": "inner-span", "currentTarget": "content-root" }));
    events::dispatch("dblclick", event, &root);
    assert_eq!(*targets.borrow(), vec![Some(Value::from("content-root"))]);
    assert!(editor::dispose());
}

/// Overlay that tries to activate the editor again while being updated.
struct Nested {
    inner: Rc<RefCell<Vec<Result<Activation, EditorError>>>>,
}

impl EditorOverlay for Nested {
    fn update(&mut self, payload: EditorPayload) {
        let result = editor::activate(payload, |_, _| panic!("nested create must not run"));
        self.inner.borrow_mut().push(result);
    }
}

#[test]
fn nested_activation_is_rejected() {
    let payload = EditorPayload {
        document: Rc::new(greeting()),
        components: Vec::new(),
        variables: Vec::new(),
        slots: Vec::new(),
        initial_interacted: (0.0, 0.0),
        mount_target: None,
    };

    // from inside the factory
    let failed = editor::activate(payload.clone(), |p, _| {
        let nested = editor::activate(p, |_, _| panic!("nested create must not run"));
        assert_eq!(nested, Err(EditorError::Reentrant));
        Err(EditorError::Mount("gave up".into()))
    });
    assert_eq!(failed, Err(EditorError::Mount("gave up".into())));
    assert!(!editor::is_active());
    assert_eq!(editor::mount_point_count(), 0);

    // from inside update
    let inner = Rc::new(RefCell::new(Vec::new()));
    let overlay_inner = inner.clone();
    let created = editor::activate(payload.clone(), |_, _| {
        Ok(Box::new(Nested { inner: overlay_inner }) as Box<dyn EditorOverlay>)
    });
    assert_eq!(created, Ok(Activation::Created));
    let updated = editor::activate(payload, |_, _| panic!("overlay must be reused"));
    assert_eq!(updated, Ok(Activation::Updated));
    assert_eq!(*inner.borrow(), vec![Err(EditorError::Reentrant)]);

    assert!(editor::is_active());
    assert_eq!(editor::mount_point_count(), 1);
    assert!(editor::dispose());
    assert_eq!(editor::mount_point_count(), 0);
}
