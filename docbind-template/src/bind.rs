use docbind_core::{Context, EvalError, Handler, Value, Variables};
use docbind_dom::{AttributeLookup, RenderDescriptor};
use indexmap::IndexMap;

use crate::directive::{Candidate, Directive, Modifiers, classify, is_root_key};
use crate::document::Element;
use crate::eval::evaluate;

/// Field a two-way binding drives. Custom model props of components are
/// not resolved.
pub const MODEL_FIELD: &str = "value";

/// Resolve every prop of `element` into `attrs`, `root_props` and `on`.
/// `scoped_slots` is left empty.
pub fn bind_attributes<N>(
    element: &Element,
    context: &Context,
    variables: &Variables,
    attributes: &dyn AttributeLookup,
) -> Result<RenderDescriptor<N>, EvalError> {
    let mut data = RenderDescriptor::new();
    for (key, value) in &element.props {
        let root = is_root_key(key);
        let directive = classify(&Candidate {
            tag: &element.tag,
            key,
            value,
            context,
        });
        log::trace!("<{}> {key}: {directive:?}", element.tag);

        match directive {
            Directive::Model { target, modifiers } => {
                let current = evaluate(target, context)?;
                assign(&mut data, root, MODEL_FIELD, current);
                data.on.insert(
                    modifiers.event().to_string(),
                    write_back(context.clone(), target, modifiers),
                );
            }
            Directive::Spread { source } => {
                let resolved = match context.get(source) {
                    Some(v) => Some(v),
                    None => evaluate(source, context)?,
                };
                match resolved {
                    Some(Value::Object(map)) => {
                        for (k, v) in map {
                            let root = is_root_key(&k);
                            assign(&mut data, root, &k, Some(v));
                        }
                    }
                    other => log::debug!("v-bind=\"{source}\" is not an object: {other:?}"),
                }
            }
            Directive::On { event, expression } => match evaluate(expression, context)? {
                Some(Value::Function(handler)) => {
                    data.on.insert(event.to_string(), handler);
                }
                None => log::debug!("@{event}=\"{expression}\" is unresolved"),
                Some(_) => {
                    return Err(EvalError::NotCallable {
                        expression: expression.to_string(),
                    });
                }
            },
            Directive::Bind { name, expression } => {
                let resolved = match context.get(expression) {
                    Some(v) => Some(v),
                    None => match variables.get(expression) {
                        Some(v) => Some(v.clone()),
                        None => evaluate(expression, context)?,
                    },
                };
                assign(&mut data, root, name, resolved);
            }
            Directive::List { key, values } => {
                let name = attributes.attribute_name(key);
                assign(&mut data, root, &name, Some(Value::String(values.join(" "))));
            }
            Directive::Literal { key, value } => {
                let name = attributes.attribute_name(key);
                assign(&mut data, root, &name, Some(Value::String(value.to_string())));
            }
        }
    }
    Ok(data)
}

/// Installs the `v-model` handler: `context[target] = modifiers(payload)`.
fn write_back(context: Context, target: &str, modifiers: Modifiers) -> Handler {
    let target = target.to_string();
    Handler::new(move |payload| context.set(target.clone(), modifiers.apply(payload)))
}

/// Store under `name` in the root or attribute map. An unresolved value
/// clears an earlier entry of the same name.
fn assign<N>(data: &mut RenderDescriptor<N>, root: bool, name: &str, value: Option<Value>) {
    let (map, name): (&mut IndexMap<String, Value>, &str) = if root {
        (&mut data.root_props, root_name(name))
    } else {
        (&mut data.attrs, name)
    };
    match value {
        Some(v) => {
            map.insert(name.to_string(), v);
        }
        None => {
            log::debug!("'{name}' is unresolved");
            map.shift_remove(name);
        }
    }
}

fn root_name(name: &str) -> &str {
    match name {
        "className" | "class-name" => "class",
        other => other,
    }
}
