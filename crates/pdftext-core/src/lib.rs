//! pdftext-core: Backend-independent data types for content-stream text extraction.
//!
//! This crate provides the value model shared by the parser and its callers:
//! content-stream objects ([`Object`], [`Name`], [`Dict`], [`ObjRef`]), the byte
//! classifier ([`CharClass`]), transformation matrices and paint parameters.
//! It has no required dependencies; enable the `serde` feature to derive
//! serialization on the public value types.

pub mod char_class;
pub mod geometry;
pub mod object;
pub mod painting;

pub use char_class::{CharClass, hex_value};
pub use geometry::Matrix;
pub use object::{Dict, Name, ObjRef, Object, write_literal_string};
pub use painting::{Color, DashPattern, LineCap, LineJoin};
