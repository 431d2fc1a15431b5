//! Content stream interpreter.
//!
//! Replays the command stream of one page (one or more content-stream
//! parts), maintaining the graphics-state stack and the marked-content stack,
//! and passes decoded text to a [`TextHandler`].
//!
//! Lexical and structural errors abort the run. Operand problems on a known
//! operator do not: the operator is skipped and interpretation continues.

use std::collections::HashMap;
use std::io::Read;
use std::rc::Rc;

use pdftext_core::{Color, Dict, Matrix, Name, Object};
use tracing::{debug, trace, warn};

use crate::commands::CommandReader;
use crate::decoder::{DecoderCache, FontKey, FontResolver, FontResource};
use crate::error::ContentError;
use crate::graphics_state::{GraphicsState, GraphicsStateStack, TextRenderMode, parse_dash};
use crate::handler::{MarkedContent, TextContext, TextHandler};
use crate::operator::Op;
use crate::options::InterpretOptions;
use crate::resources::{ResourceCategory, Resources};
use crate::source::PartChain;

/// The last `N` operands as numbers, or `None` if there are fewer than `N`
/// or any of them is not numeric.
fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    let tail = operands.get(operands.len().checked_sub(N)?..)?;
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(tail) {
        *slot = obj.as_f64()?;
    }
    Some(out)
}

fn last_name(operands: &[Object]) -> Option<&Name> {
    operands.last()?.as_name()
}

fn last_int(operands: &[Object]) -> Option<i64> {
    operands.last()?.as_i64()
}

fn matrix(m: [f64; 6]) -> Matrix {
    Matrix::from_array(m)
}

/// Components of SC/SCN/sc/scn. A trailing pattern name is allowed and
/// ignored; anything else non-numeric rejects the operator.
fn color_components(operands: &[Object], allow_pattern: bool) -> Option<Vec<f64>> {
    let numeric = match operands.last() {
        Some(Object::Name(_)) if allow_pattern => &operands[..operands.len() - 1],
        _ => operands,
    };
    numeric.iter().map(Object::as_f64).collect()
}

/// Interpreter for the content streams of one page.
///
/// Font lookups and decoders are cached for the lifetime of the interpreter,
/// so one instance should serve one page.
pub struct Interpreter<'a> {
    resources: &'a dyn Resources,
    fonts: &'a dyn FontResolver,
    options: InterpretOptions,
    stack: GraphicsStateStack,
    marked: Vec<MarkedContent>,
    font_cache: HashMap<Name, Option<Rc<FontResource>>>,
    decoders: DecoderCache,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        resources: &'a dyn Resources,
        fonts: &'a dyn FontResolver,
        options: InterpretOptions,
    ) -> Self {
        Self {
            resources,
            fonts,
            options,
            stack: GraphicsStateStack::new(),
            marked: Vec::new(),
            font_cache: HashMap::new(),
            decoders: DecoderCache::new(),
        }
    }

    /// The live graphics state.
    pub fn state(&self) -> &GraphicsState {
        self.stack.current()
    }

    /// Number of states saved by unmatched `q` operators.
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Open marked-content regions, outermost first.
    pub fn marked_content(&self) -> &[MarkedContent] {
        &self.marked
    }

    /// Number of distinct fonts whose decoders have been built.
    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }

    /// Interpret the given parts as one logical content stream.
    pub fn run<I, H>(&mut self, parts: I, handler: &mut H) -> Result<(), ContentError>
    where
        I: IntoIterator,
        I::Item: Read,
        H: TextHandler + ?Sized,
    {
        let source = PartChain::new(parts.into_iter(), self.options.separate_parts);
        let mut reader = CommandReader::new(source, &self.options);
        while reader.advance()? {
            self.execute(reader.operator(), reader.operands(), reader.offset(), handler)?;
        }
        if self.stack.depth() > 0 {
            debug!(depth = self.stack.depth(), "unbalanced q at end of content");
        }
        Ok(())
    }

    /// Apply one command.
    pub fn execute<H>(
        &mut self,
        name: &[u8],
        operands: &[Object],
        offset: u64,
        handler: &mut H,
    ) -> Result<(), ContentError>
    where
        H: TextHandler + ?Sized,
    {
        let op = Op::from_bytes(name);
        trace!(%op, operands = operands.len(), offset, "command");
        let applied = match &op {
            // --- graphics state ---
            Op::Save => {
                self.stack.save();
                true
            }
            Op::Restore => {
                if !self.stack.restore() {
                    debug!(offset, "Q with empty state stack");
                }
                true
            }
            Op::ConcatMatrix => numbers::<6>(operands)
                .map(|m| self.gs().concat_matrix(matrix(m)))
                .is_some(),
            Op::LineWidth => numbers::<1>(operands)
                .map(|[w]| self.gs().line_width = w)
                .is_some(),
            Op::MiterLimit => numbers::<1>(operands)
                .map(|[m]| self.gs().miter_limit = m)
                .is_some(),
            Op::LineCap => last_int(operands)
                .and_then(pdftext_core::LineCap::from_i64)
                .map(|cap| self.gs().line_cap = cap)
                .is_some(),
            Op::LineJoin => last_int(operands)
                .and_then(pdftext_core::LineJoin::from_i64)
                .map(|join| self.gs().line_join = join)
                .is_some(),
            Op::Dash => match operands {
                [.., array, phase] => parse_dash(array, phase)
                    .map(|dash| self.gs().dash = dash)
                    .is_some(),
                _ => false,
            },
            Op::RenderingIntent => last_name(operands).is_some(),
            Op::Flatness => numbers::<1>(operands).is_some(),
            Op::ExtGState => match last_name(operands) {
                Some(name) => {
                    self.apply_ext_gstate(name);
                    true
                }
                None => false,
            },

            // --- path construction, painting, clipping ---
            Op::MoveTo | Op::LineTo => numbers::<2>(operands).is_some(),
            Op::CurveTo => numbers::<6>(operands).is_some(),
            Op::CurveToV | Op::CurveToY | Op::Rectangle => numbers::<4>(operands).is_some(),
            Op::ClosePath
            | Op::Stroke
            | Op::CloseStroke
            | Op::Fill
            | Op::FillObsolete
            | Op::FillEvenOdd
            | Op::FillStroke
            | Op::FillStrokeEvenOdd
            | Op::CloseFillStroke
            | Op::CloseFillStrokeEvenOdd
            | Op::EndPath
            | Op::Clip
            | Op::ClipEvenOdd => true,

            // --- text objects and state ---
            Op::BeginText => {
                self.gs().begin_text();
                true
            }
            Op::EndText => true,
            Op::CharSpacing => numbers::<1>(operands)
                .map(|[v]| self.gs().char_spacing = v)
                .is_some(),
            Op::WordSpacing => numbers::<1>(operands)
                .map(|[v]| self.gs().word_spacing = v)
                .is_some(),
            Op::HorizontalScaling => numbers::<1>(operands)
                .map(|[v]| self.gs().horizontal_scaling = v)
                .is_some(),
            Op::Leading => numbers::<1>(operands)
                .map(|[v]| self.gs().leading = v)
                .is_some(),
            Op::Rise => numbers::<1>(operands)
                .map(|[v]| self.gs().rise = v)
                .is_some(),
            Op::RenderMode => last_int(operands)
                .and_then(TextRenderMode::from_i64)
                .map(|mode| self.gs().render_mode = mode)
                .is_some(),
            Op::Font => match operands {
                [.., Object::Name(font), size] => match size.as_f64() {
                    Some(size) => {
                        let font = self.lookup_font(font);
                        self.gs().set_font(font, size);
                        true
                    }
                    None => false,
                },
                _ => false,
            },

            // --- text positioning ---
            Op::MoveText => numbers::<2>(operands)
                .map(|[tx, ty]| self.gs().move_text_position(tx, ty))
                .is_some(),
            Op::MoveTextSetLeading => numbers::<2>(operands)
                .map(|[tx, ty]| self.gs().move_text_position_and_set_leading(tx, ty))
                .is_some(),
            Op::TextMatrix => numbers::<6>(operands)
                .map(|m| self.gs().set_text_matrix(matrix(m)))
                .is_some(),
            Op::NextLine => {
                self.gs().move_to_next_line();
                true
            }

            // --- text showing ---
            Op::ShowText => match operands.last() {
                Some(Object::String(bytes)) => {
                    self.show_text(&op, bytes, offset, handler)?;
                    true
                }
                _ => false,
            },
            Op::ShowTextArray => match operands.last() {
                Some(Object::Array(items)) => {
                    for item in items {
                        // numeric kerning adjustments are skipped
                        if let Object::String(bytes) = item {
                            self.show_text(&op, bytes, offset, handler)?;
                        }
                    }
                    true
                }
                _ => false,
            },
            Op::NextLineShowText => match operands.last() {
                Some(Object::String(bytes)) => {
                    self.gs().move_to_next_line();
                    self.show_text(&op, bytes, offset, handler)?;
                    true
                }
                _ => false,
            },
            Op::NextLineSpacingShowText => match operands {
                [.., aw, ac, Object::String(bytes)] => match (aw.as_f64(), ac.as_f64()) {
                    (Some(aw), Some(ac)) => {
                        let gs = self.gs();
                        gs.word_spacing = aw;
                        gs.char_spacing = ac;
                        gs.move_to_next_line();
                        self.show_text(&op, bytes, offset, handler)?;
                        true
                    }
                    _ => false,
                },
                _ => false,
            },

            // --- type 3 glyph metrics ---
            Op::GlyphWidth => numbers::<2>(operands).is_some(),
            Op::GlyphWidthBBox => numbers::<6>(operands).is_some(),

            // --- color ---
            Op::StrokeColorSpace => match last_name(operands) {
                Some(space) => {
                    let space = space.clone();
                    self.gs().set_stroke_color_space(space);
                    true
                }
                None => false,
            },
            Op::FillColorSpace => match last_name(operands) {
                Some(space) => {
                    let space = space.clone();
                    self.gs().set_fill_color_space(space);
                    true
                }
                None => false,
            },
            Op::StrokeColor | Op::StrokeColorN => {
                let allow_pattern = matches!(op, Op::StrokeColorN);
                match color_components(operands, allow_pattern) {
                    Some(c) if !c.is_empty() => {
                        self.gs().stroke_color = Color::from_components(&c);
                        true
                    }
                    Some(_) => allow_pattern,
                    None => false,
                }
            }
            Op::FillColor | Op::FillColorN => {
                let allow_pattern = matches!(op, Op::FillColorN);
                match color_components(operands, allow_pattern) {
                    Some(c) if !c.is_empty() => {
                        self.gs().fill_color = Color::from_components(&c);
                        true
                    }
                    Some(_) => allow_pattern,
                    None => false,
                }
            }
            Op::StrokeGray => numbers::<1>(operands)
                .map(|[g]| self.gs().set_stroke_gray(g))
                .is_some(),
            Op::FillGray => numbers::<1>(operands)
                .map(|[g]| self.gs().set_fill_gray(g))
                .is_some(),
            Op::StrokeRgb => numbers::<3>(operands)
                .map(|[r, g, b]| self.gs().set_stroke_rgb(r, g, b))
                .is_some(),
            Op::FillRgb => numbers::<3>(operands)
                .map(|[r, g, b]| self.gs().set_fill_rgb(r, g, b))
                .is_some(),
            Op::StrokeCmyk => numbers::<4>(operands)
                .map(|[c, m, y, k]| self.gs().set_stroke_cmyk(c, m, y, k))
                .is_some(),
            Op::FillCmyk => numbers::<4>(operands)
                .map(|[c, m, y, k]| self.gs().set_fill_cmyk(c, m, y, k))
                .is_some(),

            // --- shading, images, external objects ---
            Op::Shade | Op::XObject => last_name(operands).is_some(),
            Op::BeginInlineImage | Op::InlineImageData | Op::EndInlineImage => true,

            // --- marked content ---
            Op::MarkPoint => last_name(operands).is_some(),
            Op::MarkPointProps => matches!(
                operands,
                [.., Object::Name(_), Object::Dictionary(_) | Object::Name(_)]
            ),
            // Malformed BMC/BDC still open a region without properties, so
            // the matching EMC does not close an enclosing one.
            Op::BeginMarked => {
                let tag = last_name(operands);
                self.marked.push(MarkedContent {
                    tag: tag.cloned().unwrap_or_default(),
                    properties: None,
                });
                tag.is_some()
            }
            Op::BeginMarkedProps => {
                let (tag, properties) = match operands {
                    [.., Object::Name(tag), props] => {
                        let properties = match props {
                            Object::Dictionary(d) => Some(Some(d.clone())),
                            Object::Name(name) => Some(self.lookup_properties(name)),
                            _ => None,
                        };
                        (Some(tag), properties)
                    }
                    _ => (None, None),
                };
                let applied = properties.is_some();
                self.marked.push(MarkedContent {
                    tag: tag.cloned().unwrap_or_default(),
                    properties: properties.flatten(),
                });
                applied
            }
            Op::EndMarked => {
                if self.marked.pop().is_none() {
                    debug!(offset, "EMC without open marked content");
                }
                true
            }

            Op::BeginCompat | Op::EndCompat => true,
            Op::Unknown(_) => {
                debug!(%op, offset, "unknown operator ignored");
                true
            }
        };
        if !applied {
            let types: Vec<&str> = operands.iter().map(Object::type_name).collect();
            debug!(%op, offset, operands = ?types, "invalid operands, operator skipped");
        }
        Ok(())
    }

    fn gs(&mut self) -> &mut GraphicsState {
        self.stack.current_mut()
    }

    fn show_text<H>(
        &mut self,
        op: &Op,
        bytes: &[u8],
        offset: u64,
        handler: &mut H,
    ) -> Result<(), ContentError>
    where
        H: TextHandler + ?Sized,
    {
        let Some(font) = self.stack.current().font.clone() else {
            return Err(ContentError::Font {
                font: "(none)".into(),
                reason: format!("{op} at offset {offset} with no usable font selected"),
            });
        };
        let text = self.decoders.get_or_resolve(&font, self.fonts)?.decode(bytes);
        let ctx = TextContext {
            resources: self.resources,
            state: self.stack.current(),
            marked_content: &self.marked,
            operator: op,
            offset,
        };
        handler.on_text(&ctx, &text)
    }

    /// Font resource for a `Tf` name, memoized per name.
    fn lookup_font(&mut self, name: &Name) -> Option<Rc<FontResource>> {
        if let Some(cached) = self.font_cache.get(name) {
            return cached.clone();
        }
        let font = self
            .resources
            .get(ResourceCategory::Font, name)
            .and_then(|entry| self.font_from_entry(name.clone(), &entry, FontKey::Name(name.clone())));
        if font.is_none() {
            warn!(font = %name, "font resource not found");
        }
        self.font_cache.insert(name.clone(), font.clone());
        font
    }

    /// `direct_key` identifies the font when `entry` is not a reference.
    fn font_from_entry(
        &self,
        name: Name,
        entry: &Object,
        direct_key: FontKey,
    ) -> Option<Rc<FontResource>> {
        let key = match entry {
            Object::Reference(r) => FontKey::Reference(*r),
            _ => direct_key,
        };
        let Object::Dictionary(dict) = self.resources.deref(entry)? else {
            return None;
        };
        Some(Rc::new(FontResource { name, key, dict }))
    }

    fn apply_ext_gstate(&mut self, name: &Name) {
        let Some(ext) = self.resources.get_dict(ResourceCategory::ExtGState, name) else {
            warn!(name = %name, "ExtGState resource not found");
            return;
        };
        self.gs().apply_ext_gstate(&ext);
        if let Some(font_entry) = ext.get("Font") {
            self.apply_ext_gstate_font(name, font_entry);
        }
    }

    /// ExtGState `Font`: `[font size]` where `font` is normally a reference.
    fn apply_ext_gstate_font(&mut self, gs_name: &Name, entry: &Object) {
        let Some([font_obj, size]) = self.resources.deref(entry).and_then(|e| match e {
            Object::Array(items) => <[Object; 2]>::try_from(items).ok(),
            _ => None,
        }) else {
            debug!(name = %gs_name, "malformed ExtGState Font entry");
            return;
        };
        let font = self.font_from_entry(
            gs_name.clone(),
            &font_obj,
            FontKey::ExtGState(gs_name.clone()),
        );
        let (Some(font), Some(size)) = (font, size.as_f64()) else {
            warn!(name = %gs_name, "ExtGState font not resolvable");
            return;
        };
        self.gs().set_font(Some(font), size);
    }

    /// Property list named by a `BDC` operand.
    fn lookup_properties(&self, name: &Name) -> Option<Dict> {
        let props = self.resources.get_dict(ResourceCategory::Properties, name);
        if props.is_none() {
            warn!(name = %name, "Properties resource not found");
        }
        props
    }
}

/// Run a fresh interpreter with default options over `parts`, calling
/// `handler` for each decoded string.
pub fn for_all_text<I, F>(
    parts: I,
    resources: &dyn Resources,
    fonts: &dyn FontResolver,
    mut handler: F,
) -> Result<(), ContentError>
where
    I: IntoIterator,
    I::Item: Read,
    F: FnMut(&TextContext<'_>, &str) -> Result<(), ContentError>,
{
    Interpreter::new(resources, fonts, InterpretOptions::default()).run(parts, &mut handler)
}
