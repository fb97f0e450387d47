//! Evaluates directive expressions with every context key in scope as a
//! bare identifier.

use docbind_core::{Context, EvalError, Value};
use indexmap::IndexMap;

use crate::expression::{BinaryOp, Expr, LogicalOp, UnaryOp, parse_expression};

/// Evaluate `src` against `context`.
///
/// `Ok(None)` means the expression is well formed but yields no defined
/// value (a bare name the context lacks, a missing member). Syntax errors
/// and reads through `null`/`undefined` are errors. Never writes to
/// `context`.
pub fn evaluate(src: &str, context: &Context) -> Result<Option<Value>, EvalError> {
    let expr = parse_expression(src)?;
    context.with(|scope| {
        let eval = Evaluator { scope };
        match &expr {
            // a bare unknown name is unresolved, not a reference error
            Expr::Ident(name) => Ok(scope.get(name).cloned()),
            other => eval.eval(other),
        }
    })
}

struct Evaluator<'a> {
    scope: &'a IndexMap<String, Value>,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> Result<Option<Value>, EvalError> {
        match expr {
            Expr::Literal(v) => Ok(Some(v.clone())),
            Expr::Undefined => Ok(None),
            Expr::Ident(name) => match self.scope.get(name) {
                Some(v) => Ok(Some(v.clone())),
                None => Err(EvalError::UndefinedVariable { name: name.clone() }),
            },
            Expr::Member(target, name) => {
                let target = self.eval(target)?;
                property(target.as_ref(), name)
            }
            Expr::Index(target, key) => {
                let target = self.eval(target)?;
                let key = display(self.eval(key)?.as_ref());
                property(target.as_ref(), &key)
            }
            Expr::Unary(op, operand) => {
                let v = self.eval(operand)?;
                Ok(Some(match op {
                    UnaryOp::Not => Value::Bool(!truthy(v.as_ref())),
                    UnaryOp::Neg => Value::Number(-number(v.as_ref())),
                    UnaryOp::Plus => Value::Number(number(v.as_ref())),
                }))
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = self.eval(lhs)?;
                let r = self.eval(rhs)?;
                Ok(Some(binary(*op, l.as_ref(), r.as_ref())))
            }
            Expr::Logical(op, lhs, rhs) => {
                let l = self.eval(lhs)?;
                let short_circuit = match op {
                    LogicalOp::And => !truthy(l.as_ref()),
                    LogicalOp::Or => truthy(l.as_ref()),
                };
                if short_circuit { Ok(l) } else { self.eval(rhs) }
            }
            Expr::Conditional(test, then, otherwise) => {
                if truthy(self.eval(test)?.as_ref()) {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval(item)?.unwrap_or(Value::Null));
                }
                Ok(Some(Value::Array(out)))
            }
            Expr::Object(entries) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    if let Some(v) = self.eval(value)? {
                        out.insert(key.clone(), v);
                    }
                }
                Ok(Some(Value::Object(out)))
            }
        }
    }
}

fn property(target: Option<&Value>, key: &str) -> Result<Option<Value>, EvalError> {
    match target {
        None | Some(Value::Null) => Err(EvalError::UndefinedProperty {
            property: key.to_string(),
            target: display(target),
        }),
        Some(Value::Object(map)) => Ok(map.get(key).cloned()),
        Some(Value::Array(items)) => {
            if key == "length" {
                return Ok(Some(Value::Number(items.len() as f64)));
            }
            Ok(key.parse::<usize>().ok().and_then(|i| items.get(i)).cloned())
        }
        Some(Value::String(s)) => {
            if key == "length" {
                return Ok(Some(Value::Number(s.encode_utf16().count() as f64)));
            }
            // indexes count UTF-16 units, like `length`
            Ok(key
                .parse::<usize>()
                .ok()
                .and_then(|i| s.encode_utf16().nth(i))
                .map(|unit| Value::String(String::from_utf16_lossy(&[unit]))))
        }
        Some(_) => Ok(None),
    }
}

fn truthy(v: Option<&Value>) -> bool {
    v.is_some_and(Value::truthy)
}

fn number(v: Option<&Value>) -> f64 {
    v.map_or(f64::NAN, Value::to_number)
}

fn display(v: Option<&Value>) -> String {
    v.map_or_else(|| "undefined".to_string(), Value::to_display)
}

fn is_stringish(v: Option<&Value>) -> bool {
    matches!(
        v,
        Some(Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Function(_))
    )
}

fn binary(op: BinaryOp, l: Option<&Value>, r: Option<&Value>) -> Value {
    match op {
        BinaryOp::Add => {
            if is_stringish(l) || is_stringish(r) {
                Value::String(display(l) + &display(r))
            } else {
                Value::Number(number(l) + number(r))
            }
        }
        BinaryOp::Sub => Value::Number(number(l) - number(r)),
        BinaryOp::Mul => Value::Number(number(l) * number(r)),
        BinaryOp::Div => Value::Number(number(l) / number(r)),
        BinaryOp::Rem => Value::Number(number(l) % number(r)),
        BinaryOp::Lt => Value::Bool(compare(l, r, |o| o.is_lt())),
        BinaryOp::Le => Value::Bool(compare(l, r, |o| o.is_le())),
        BinaryOp::Gt => Value::Bool(compare(l, r, |o| o.is_gt())),
        BinaryOp::Ge => Value::Bool(compare(l, r, |o| o.is_ge())),
        BinaryOp::Eq => Value::Bool(loose_eq(l, r)),
        BinaryOp::Ne => Value::Bool(!loose_eq(l, r)),
        BinaryOp::StrictEq => Value::Bool(strict_eq(l, r)),
        BinaryOp::StrictNe => Value::Bool(!strict_eq(l, r)),
    }
}

fn compare(l: Option<&Value>, r: Option<&Value>, test: fn(std::cmp::Ordering) -> bool) -> bool {
    if let (Some(Value::String(a)), Some(Value::String(b))) = (l, r) {
        return test(a.cmp(b));
    }
    number(l).partial_cmp(&number(r)).is_some_and(test)
}

fn strict_eq(l: Option<&Value>, r: Option<&Value>) -> bool {
    match (l, r) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn loose_eq(l: Option<&Value>, r: Option<&Value>) -> bool {
    let nullish = |v: Option<&Value>| matches!(v, None | Some(Value::Null));
    if nullish(l) || nullish(r) {
        return nullish(l) && nullish(r);
    }
    match (l, r) {
        (Some(Value::Bool(_)), _) => loose_eq(Some(&Value::Number(number(l))), r),
        (_, Some(Value::Bool(_))) => loose_eq(l, Some(&Value::Number(number(r)))),
        (Some(Value::Number(a)), Some(Value::String(_))) => *a == number(r),
        (Some(Value::String(_)), Some(Value::Number(b))) => number(l) == *b,
        (Some(a @ (Value::Array(_) | Value::Object(_))), Some(Value::String(_) | Value::Number(_))) => {
            loose_eq(Some(&Value::String(a.to_display())), r)
        }
        (Some(Value::String(_) | Value::Number(_)), Some(b @ (Value::Array(_) | Value::Object(_)))) => {
            loose_eq(l, Some(&Value::String(b.to_display())))
        }
        _ => strict_eq(l, r),
    }
}
