//! pdftext-parse: content stream tokenizing and text interpretation.
//!
//! The pipeline runs in four layers, each usable on its own:
//!
//! 1. [`Scanner`] splits bytes into [`Token`]s.
//! 2. [`Assembler`] builds arrays and dictionaries into [`Object`]s.
//! 3. [`CommandReader`] groups operands with their operator.
//! 4. [`Interpreter`] tracks graphics state and reports decoded text to a
//!    [`TextHandler`].
//!
//! Shared value types live in [`pdftext_core`].
//!
//! [`Object`]: pdftext_core::Object

pub mod assembler;
pub mod commands;
pub mod decoder;
pub mod error;
pub mod graphics_state;
pub mod handler;
pub mod interpreter;
pub mod operator;
pub mod options;
pub mod resources;
pub mod scanner;
pub mod source;

pub use assembler::{Assembler, parse_object, parse_objects};
pub use commands::{Command, CommandReader, for_each_command};
pub use decoder::{
    CharCode, CodeRange, CodeSpace, DecoderCache, FontDecoder, FontKey, FontResolver, FontResource,
};
pub use error::ContentError;
pub use graphics_state::{GraphicsState, GraphicsStateStack, TextRenderMode};
pub use handler::{MarkedContent, TextContext, TextHandler, TextRun};
pub use interpreter::{Interpreter, for_all_text};
pub use operator::Op;
pub use options::InterpretOptions;
pub use resources::{MemoryResources, NoResources, ResourceCategory, Resources};
pub use scanner::{Marker, Scanner, Token};
pub use source::{ByteSource, PartChain};

pub use pdftext_core;
