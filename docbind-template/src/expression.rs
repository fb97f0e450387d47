//! Parser for directive expressions (`:title="post.title"`,
//! `v-bind="{ id: n + 1 }"`, `@click="onClick"`).

use docbind_core::{EvalError, Value};
use pest::Parser;
use pest::iterators::{Pair, Pairs};

#[derive(pest_derive::Parser)]
#[grammar = "expression.pest"]
struct ExpressionParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Undefined,
    Ident(String),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
}

pub fn parse_expression(src: &str) -> Result<Expr, EvalError> {
    let mut pairs =
        ExpressionParser::parse(Rule::expression, src).map_err(|e| EvalError::Syntax {
            expression: src.to_string(),
            message: e.to_string(),
        })?;
    let root = pairs.next().ok_or_else(|| EvalError::Syntax {
        expression: src.to_string(),
        message: "empty expression".to_string(),
    })?;
    // expression = SOI ~ conditional ~ EOI
    let conditional = root
        .into_inner()
        .find(|p| p.as_rule() == Rule::conditional)
        .ok_or_else(|| EvalError::Syntax {
            expression: src.to_string(),
            message: "empty expression".to_string(),
        })?;
    Ok(build(conditional))
}

fn build(pair: Pair<Rule>) -> Expr {
    match pair.as_rule() {
        Rule::conditional => {
            let mut inner = pair.into_inner();
            let test = inner.next().map(build).unwrap_or(Expr::Undefined);
            match (inner.next(), inner.next()) {
                (Some(then), Some(otherwise)) => Expr::Conditional(
                    Box::new(test),
                    Box::new(build(then)),
                    Box::new(build(otherwise)),
                ),
                _ => test,
            }
        }
        Rule::logical_or | Rule::logical_and => build_logical(pair.into_inner()),
        Rule::equality | Rule::comparison | Rule::additive | Rule::multiplicative => {
            build_binary(pair.into_inner())
        }
        Rule::unary => {
            let mut ops = Vec::new();
            let mut operand = Expr::Undefined;
            for p in pair.into_inner() {
                match p.as_rule() {
                    Rule::unary_op => ops.push(match p.as_str() {
                        "!" => UnaryOp::Not,
                        "-" => UnaryOp::Neg,
                        _ => UnaryOp::Plus,
                    }),
                    _ => operand = build(p),
                }
            }
            // prefix operators bind right to left
            ops.into_iter()
                .rev()
                .fold(operand, |acc, op| Expr::Unary(op, Box::new(acc)))
        }
        Rule::postfix => {
            let mut inner = pair.into_inner();
            let base = inner.next().map(build).unwrap_or(Expr::Undefined);
            inner.fold(base, |acc, access| match access.as_rule() {
                Rule::member => {
                    let name = access.into_inner().as_str().to_string();
                    Expr::Member(Box::new(acc), name)
                }
                _ => {
                    let key = access.into_inner().next().map(build).unwrap_or(Expr::Undefined);
                    Expr::Index(Box::new(acc), Box::new(key))
                }
            })
        }
        Rule::number => Expr::Literal(Value::Number(
            pair.as_str().parse::<f64>().unwrap_or(f64::NAN),
        )),
        Rule::string => Expr::Literal(Value::String(string_literal(pair))),
        Rule::boolean => Expr::Literal(Value::Bool(pair.as_str() == "true")),
        Rule::null => Expr::Literal(Value::Null),
        Rule::undefined => Expr::Undefined,
        Rule::identifier => Expr::Ident(pair.as_str().to_string()),
        Rule::array => Expr::Array(pair.into_inner().map(build).collect()),
        Rule::object => Expr::Object(
            pair.into_inner()
                .map(|entry| {
                    let mut kv = entry.into_inner();
                    let key = kv
                        .next()
                        .map(|k| match k.as_rule() {
                            Rule::string => string_literal(k),
                            _ => k.as_str().to_string(),
                        })
                        .unwrap_or_default();
                    let value = kv.next().map(build).unwrap_or(Expr::Undefined);
                    (key, value)
                })
                .collect(),
        ),
        _ => Expr::Undefined,
    }
}

fn build_logical(mut inner: Pairs<Rule>) -> Expr {
    let first = inner.next().map(build).unwrap_or(Expr::Undefined);
    let mut acc = first;
    while let (Some(op), Some(rhs)) = (inner.next(), inner.next()) {
        let op = if op.as_rule() == Rule::and_op {
            LogicalOp::And
        } else {
            LogicalOp::Or
        };
        acc = Expr::Logical(op, Box::new(acc), Box::new(build(rhs)));
    }
    acc
}

fn build_binary(mut inner: Pairs<Rule>) -> Expr {
    let mut acc = inner.next().map(build).unwrap_or(Expr::Undefined);
    while let (Some(op), Some(rhs)) = (inner.next(), inner.next()) {
        let op = match op.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "===" => BinaryOp::StrictEq,
            _ => BinaryOp::StrictNe,
        };
        acc = Expr::Binary(op, Box::new(acc), Box::new(build(rhs)));
    }
    acc
}

fn string_literal(pair: Pair<Rule>) -> String {
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Box<Expr> {
        Box::new(Expr::Ident(s.to_string()))
    }

    #[test]
    fn member_chain() {
        let e = parse_expression("post.author['name']").unwrap();
        assert_eq!(
            e,
            Expr::Index(
                Box::new(Expr::Member(ident("post"), "author".into())),
                Box::new(Expr::Literal(Value::from("name")))
            )
        );
    }

    #[test]
    fn precedence_and_associativity() {
        let e = parse_expression("a - b - c * 2").unwrap();
        let lhs = Expr::Binary(BinaryOp::Sub, ident("a"), ident("b"));
        let rhs = Expr::Binary(BinaryOp::Mul, ident("c"), Box::new(Expr::Literal(Value::from(2))));
        assert_eq!(e, Expr::Binary(BinaryOp::Sub, Box::new(lhs), Box::new(rhs)));
    }

    #[test]
    fn conditional_nests_to_the_right() {
        let e = parse_expression("a ? b : c ? d : e").unwrap();
        match e {
            Expr::Conditional(_, _, otherwise) => {
                assert!(matches!(*otherwise, Expr::Conditional(..)))
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert_eq!(parse_expression("true").unwrap(), Expr::Literal(Value::Bool(true)));
        assert_eq!(parse_expression("trueish").unwrap(), Expr::Ident("trueish".into()));
        assert_eq!(parse_expression("undefined").unwrap(), Expr::Undefined);
    }

    #[test]
    fn string_escapes() {
        let e = parse_expression(r#"'it\'s' + "\n""#).unwrap();
        assert_eq!(
            e,
            Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Literal(Value::from("it's"))),
                Box::new(Expr::Literal(Value::from("\n")))
            )
        );
    }

    #[test]
    fn object_and_array_literals() {
        let e = parse_expression("{ id: 1, 'data-x': [a, 2] }").unwrap();
        match e {
            Expr::Object(entries) => {
                assert_eq!(entries[0].0, "id");
                assert_eq!(entries[1].0, "data-x");
                assert!(matches!(entries[1].1, Expr::Array(ref items) if items.len() == 2));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn malformed_is_syntax_error() {
        assert!(matches!(parse_expression("a +"), Err(EvalError::Syntax { .. })));
        assert!(matches!(parse_expression("count++"), Err(EvalError::Syntax { .. })));
        assert!(matches!(parse_expression(""), Err(EvalError::Syntax { .. })));
    }
}
