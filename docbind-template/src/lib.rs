//! Turns a parsed content document into render-tree nodes, resolving
//! directives, slots and text interpolation along the way.

pub mod bind;
pub mod component;
pub mod directive;
pub mod document;
pub mod editor;
pub mod eval;
pub mod expression;
pub mod interpolate;
pub mod slots;
pub mod transform;

pub use bind::bind_attributes;
pub use component::{AmbientData, ContentProps, camelize, render_content};
pub use document::{Body, Document, DocumentError, DocumentNode, Element, PropValue};
pub use editor::{Activation, EditorError, EditorOverlay, EditorPayload, MountPoint};
pub use eval::evaluate;
pub use interpolate::interpolate;
pub use transform::{MutationHook, TransformOptions, Transformer, transform};
