use thiserror::Error;

/// Failure while evaluating a directive expression.
///
/// These are the only failures a render pass surfaces; unresolved
/// bindings and interpolations are absorbed by the transformer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("syntax error in expression '{expression}': {message}")]
    Syntax { expression: String, message: String },

    #[error("'{name}' is not defined")]
    UndefinedVariable { name: String },

    #[error("cannot read property '{property}' of {target}")]
    UndefinedProperty { property: String, target: String },

    #[error("event handler '{expression}' resolved to a non-function value")]
    NotCallable { expression: String },
}
