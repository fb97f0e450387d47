//! Classifies one raw prop key/value pair into the directive it encodes.
//!
//! Rules are tried in a fixed order and the first match wins:
//! `v-model` → `v-bind` (spread) → `@`/`v-on:` → `:`/`v-bind:` → literal.

use docbind_core::{Context, Value};

use crate::document::PropValue;

/// Prop keys (after any `ns:` prefix) that belong on the element root
/// instead of in `attrs`.
pub const ROOT_KEYS: &[&str] = &["class-name", "class", "className", "style"];

/// Tags whose `v-model` is left to the backend's native form handling.
pub const NATIVE_INPUTS: &[&str] = &["select", "textarea", "input"];

const MODEL_PREFIX: &str = "v-model";
const SPREAD_KEY: &str = "v-bind";
const ON_PREFIXES: &[&str] = &["@", "v-on:"];
const BIND_PREFIXES: &[&str] = &[":", "v-bind:"];

/// `v-model` modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub lazy: bool,
    pub number: bool,
    pub trim: bool,
}

impl Modifiers {
    /// Parse the `.lazy.number` tail of a `v-model` key. Unknown
    /// modifiers and a `:arg` are ignored.
    pub fn parse(tail: &str) -> Self {
        let mut mods = Modifiers::default();
        for m in tail.split('.').filter(|m| !m.is_empty()) {
            match m {
                "lazy" => mods.lazy = true,
                "number" => mods.number = true,
                "trim" => mods.trim = true,
                _ => {}
            }
        }
        mods
    }

    pub fn event(&self) -> &'static str {
        if self.lazy { "change" } else { "input" }
    }

    /// Transform an event payload before it is written back. `number`
    /// wins over `trim`.
    pub fn apply(&self, payload: Value) -> Value {
        if self.number {
            Value::Number(payload.to_number())
        } else if self.trim {
            match payload {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other,
            }
        } else {
            payload
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive<'a> {
    /// `v-model.mods="target"`
    Model { target: &'a str, modifiers: Modifiers },
    /// `v-bind="source"`
    Spread { source: &'a str },
    /// `@event="expression"`
    On { event: &'a str, expression: &'a str },
    /// `:name="expression"`
    Bind { name: &'a str, expression: &'a str },
    /// `key=["a", "b"]`
    List { key: &'a str, values: &'a [String] },
    /// `key="value"`
    Literal { key: &'a str, value: &'a str },
}

/// One prop of one element, with what the rules need to decide.
pub struct Candidate<'a> {
    pub tag: &'a str,
    pub key: &'a str,
    pub value: &'a PropValue,
    pub context: &'a Context,
}

type Rule = for<'a> fn(&Candidate<'a>) -> Option<Directive<'a>>;

const RULES: &[Rule] = &[two_way, spread, event, bound];

pub fn classify<'a>(candidate: &Candidate<'a>) -> Directive<'a> {
    RULES
        .iter()
        .find_map(|rule| rule(candidate))
        .unwrap_or_else(|| literal(candidate))
}

/// Root-key test on the key with any `prefix:` removed (`:class`,
/// `v-bind:style`).
pub fn is_root_key(raw_key: &str) -> bool {
    let bare = raw_key.rsplit(':').next().unwrap_or(raw_key);
    ROOT_KEYS.contains(&bare)
}

fn two_way<'a>(c: &Candidate<'a>) -> Option<Directive<'a>> {
    let tail = c.key.strip_prefix(MODEL_PREFIX)?;
    let target = c.value.as_text()?;
    if NATIVE_INPUTS.contains(&c.tag) {
        return None;
    }
    if !c.context.contains_key(target) {
        log::debug!("{}: '{target}' is not in context, leaving {} as is", c.tag, c.key);
        return None;
    }
    Some(Directive::Model {
        target,
        modifiers: Modifiers::parse(tail),
    })
}

fn spread<'a>(c: &Candidate<'a>) -> Option<Directive<'a>> {
    if c.key != SPREAD_KEY {
        return None;
    }
    Some(Directive::Spread {
        source: c.value.as_text()?,
    })
}

fn event<'a>(c: &Candidate<'a>) -> Option<Directive<'a>> {
    let name = strip_any(c.key, ON_PREFIXES)?;
    Some(Directive::On {
        event: name,
        expression: c.value.as_text()?,
    })
}

fn bound<'a>(c: &Candidate<'a>) -> Option<Directive<'a>> {
    let name = strip_any(c.key, BIND_PREFIXES)?;
    Some(Directive::Bind {
        name,
        expression: c.value.as_text()?,
    })
}

fn literal<'a>(c: &Candidate<'a>) -> Directive<'a> {
    match c.value {
        PropValue::List(values) => Directive::List { key: c.key, values },
        PropValue::Text(value) => Directive::Literal { key: c.key, value },
    }
}

fn strip_any<'a>(key: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| key.strip_prefix(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_one<'a>(tag: &'a str, key: &'a str, value: &'a PropValue, ctx: &'a Context) -> Directive<'a> {
        classify(&Candidate {
            tag,
            key,
            value,
            context: ctx,
        })
    }

    #[test]
    fn priority_order() {
        let ctx = Context::from_json(json!({ "text": "" }));
        let v = PropValue::from("text");
        assert!(matches!(classify_one("my-input", "v-model.trim", &v, &ctx), Directive::Model { .. }));
        assert_eq!(classify_one("div", "v-bind", &v, &ctx), Directive::Spread { source: "text" });
        assert_eq!(
            classify_one("div", "v-on:click", &v, &ctx),
            Directive::On { event: "click", expression: "text" }
        );
        assert_eq!(
            classify_one("div", "@click", &v, &ctx),
            Directive::On { event: "click", expression: "text" }
        );
        assert_eq!(
            classify_one("div", "v-bind:title", &v, &ctx),
            Directive::Bind { name: "title", expression: "text" }
        );
        assert_eq!(
            classify_one("div", ":title", &v, &ctx),
            Directive::Bind { name: "title", expression: "text" }
        );
        assert_eq!(
            classify_one("div", "title", &v, &ctx),
            Directive::Literal { key: "title", value: "text" }
        );
    }

    #[test]
    fn model_falls_through_for_native_tags_and_missing_targets() {
        let ctx = Context::from_json(json!({ "text": "" }));
        let present = PropValue::from("text");
        let missing = PropValue::from("missingKey");
        assert!(matches!(classify_one("input", "v-model", &present, &ctx), Directive::Literal { .. }));
        assert!(matches!(classify_one("div", "v-model", &missing, &ctx), Directive::Literal { .. }));
    }

    #[test]
    fn list_values() {
        let ctx = Context::new();
        let v = PropValue::from(vec!["a", "b"]);
        assert!(matches!(classify_one("p", "className", &v, &ctx), Directive::List { values, .. } if values.len() == 2));
    }

    #[test]
    fn modifiers() {
        let m = Modifiers::parse(".number.lazy");
        assert!(m.number && m.lazy && !m.trim);
        assert_eq!(m.event(), "change");
        assert_eq!(m.apply(Value::from("42")), Value::from(42));

        let both = Modifiers::parse(".trim.number");
        assert_eq!(both.apply(Value::from(" 7 ")), Value::from(7));
        assert_eq!(Modifiers::parse(".trim").apply(Value::from("  hi  ")), Value::from("hi"));
        assert_eq!(Modifiers::default().event(), "input");
    }

    #[test]
    fn root_keys() {
        assert!(is_root_key("class"));
        assert!(is_root_key(":class"));
        assert!(is_root_key("v-bind:style"));
        assert!(is_root_key("className"));
        assert!(!is_root_key("@click"));
        assert!(!is_root_key("v-model"));
        assert!(!is_root_key("xlink:href"));
    }
}
