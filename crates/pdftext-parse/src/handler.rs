//! Text callback trait for content stream interpretation.
//!
//! The interpreter calls [`TextHandler::on_text`] once per shown string with
//! a [`TextContext`] describing the state at that moment. Handlers that need
//! to keep events beyond the callback copy them into a [`TextRun`].

use std::rc::Rc;

use pdftext_core::{Dict, Name};

use crate::decoder::FontResource;
use crate::error::ContentError;
use crate::graphics_state::GraphicsState;
use crate::operator::Op;
use crate::resources::Resources;

/// An open `BMC`/`BDC` region.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedContent {
    pub tag: Name,
    /// Property list of a `BDC`, inline or resolved from `Properties`.
    pub properties: Option<Dict>,
}

impl MarkedContent {
    /// `MCID` from the property list, if any.
    pub fn mcid(&self) -> Option<i64> {
        self.properties.as_ref()?.get("MCID")?.as_i64()
    }
}

/// Everything in force when a text-showing operator runs.
pub struct TextContext<'a> {
    pub resources: &'a dyn Resources,
    pub state: &'a GraphicsState,
    /// Open marked-content regions, outermost first.
    pub marked_content: &'a [MarkedContent],
    /// The operator showing the text.
    pub operator: &'a Op,
    /// Offset of that operator in the logical stream.
    pub offset: u64,
}

impl TextContext<'_> {
    pub fn font(&self) -> Option<&Rc<FontResource>> {
        self.state.font.as_ref()
    }
}

/// Receives decoded text from the interpreter.
pub trait TextHandler {
    /// Called for each decoded string. Returning an error stops interpretation.
    fn on_text(&mut self, ctx: &TextContext<'_>, text: &str) -> Result<(), ContentError>;
}

impl<F> TextHandler for F
where
    F: FnMut(&TextContext<'_>, &str) -> Result<(), ContentError>,
{
    fn on_text(&mut self, ctx: &TextContext<'_>, text: &str) -> Result<(), ContentError> {
        self(ctx, text)
    }
}

/// Owned copy of one text callback.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    pub text: String,
    /// Resource name of the font, without the leading slash.
    pub font: Option<String>,
    pub font_size: f64,
    pub text_matrix: [f64; 6],
    pub ctm: [f64; 6],
    /// Tags of the enclosing marked-content regions, outermost first.
    pub tags: Vec<String>,
    pub mcid: Option<i64>,
    pub offset: u64,
}

impl TextRun {
    pub fn capture(ctx: &TextContext<'_>, text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: ctx.font().map(|f| f.name.to_string_lossy()),
            font_size: ctx.state.font_size,
            text_matrix: ctx.state.text_matrix.to_array(),
            ctm: ctx.state.ctm.to_array(),
            tags: ctx
                .marked_content
                .iter()
                .map(|m| m.tag.to_string_lossy())
                .collect(),
            mcid: ctx.marked_content.iter().rev().find_map(MarkedContent::mcid),
            offset: ctx.offset,
        }
    }
}

/// Collects every run.
impl TextHandler for Vec<TextRun> {
    fn on_text(&mut self, ctx: &TextContext<'_>, text: &str) -> Result<(), ContentError> {
        self.push(TextRun::capture(ctx, text));
        Ok(())
    }
}
