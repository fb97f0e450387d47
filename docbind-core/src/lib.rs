//! Runtime data shared by every docbind crate: dynamically typed values,
//! the mutable render context and the evaluation error type.

pub mod context;
pub mod error;
pub mod value;

pub use context::{Context, Variables};
pub use error::EvalError;
pub use value::{Handler, Value};
