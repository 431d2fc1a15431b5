//! Font decoders and the per-call decoder cache.
//!
//! A [`FontDecoder`] pairs a [`CodeSpace`], which says how string bytes split
//! into character codes, with a function mapping each code to Unicode. Building
//! one from a font dictionary is the job of a [`FontResolver`] supplied by the
//! caller; the interpreter only caches what the resolver returns.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use pdftext_core::{Name, ObjRef};
use tracing::debug;

use crate::error::ContentError;

/// A contiguous range of codes of one byte width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    /// Code length in bytes, 1 to 4.
    pub width: u8,
    pub low: u32,
    pub high: u32,
}

impl CodeRange {
    pub fn new(width: u8, low: u32, high: u32) -> Self {
        Self { width, low, high }
    }

    fn contains(&self, width: usize, code: u32) -> bool {
        usize::from(self.width) == width && self.low <= code && code <= self.high
    }
}

/// One character code split out of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCode {
    pub code: u32,
    /// Number of bytes the code occupied.
    pub width: u8,
    /// False when no code-space range matched and one byte was taken.
    pub valid: bool,
}

/// How string bytes are grouped into character codes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CodeSpace {
    /// One byte per code (simple fonts).
    #[default]
    SingleByte,
    /// Variable-width codes defined by ranges (composite fonts).
    Ranges(Vec<CodeRange>),
}

impl CodeSpace {
    /// The two-byte code space `<0000> <FFFF>` used by Identity encodings.
    pub fn two_byte() -> Self {
        CodeSpace::Ranges(vec![CodeRange::new(2, 0x0000, 0xFFFF)])
    }

    /// Split `bytes` into codes.
    ///
    /// At each position the shortest range width whose range contains the
    /// next bytes wins. When nothing matches, a single byte is taken as an
    /// invalid code.
    pub fn split(&self, bytes: &[u8]) -> Vec<CharCode> {
        let ranges = match self {
            CodeSpace::SingleByte => {
                return bytes
                    .iter()
                    .map(|&b| CharCode {
                        code: u32::from(b),
                        width: 1,
                        valid: true,
                    })
                    .collect();
            }
            CodeSpace::Ranges(ranges) => ranges,
        };
        let mut out = Vec::with_capacity(bytes.len());
        let mut pos = 0;
        while pos < bytes.len() {
            let mut code = 0u32;
            let mut matched = None;
            for width in 1..=4usize {
                let Some(&b) = bytes.get(pos + width - 1) else {
                    break;
                };
                code = code << 8 | u32::from(b);
                if ranges.iter().any(|r| r.contains(width, code)) {
                    matched = Some((code, width));
                    break;
                }
            }
            match matched {
                Some((code, width)) => {
                    out.push(CharCode {
                        code,
                        width: width as u8,
                        valid: true,
                    });
                    pos += width;
                }
                None => {
                    out.push(CharCode {
                        code: u32::from(bytes[pos]),
                        width: 1,
                        valid: false,
                    });
                    pos += 1;
                }
            }
        }
        out
    }
}

type DecodeFn = dyn Fn(u32) -> Option<String>;

/// A code space plus a code-to-Unicode mapping.
pub struct FontDecoder {
    code_space: CodeSpace,
    decode: Box<DecodeFn>,
}

impl fmt::Debug for FontDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDecoder")
            .field("code_space", &self.code_space)
            .finish_non_exhaustive()
    }
}

impl FontDecoder {
    /// Decoder from a code space and a mapping that may yield several
    /// characters per code (ligatures).
    pub fn new(code_space: CodeSpace, decode: impl Fn(u32) -> Option<String> + 'static) -> Self {
        Self {
            code_space,
            decode: Box::new(decode),
        }
    }

    /// Decoder whose mapping yields at most one character per code.
    pub fn from_chars(code_space: CodeSpace, decode: impl Fn(u32) -> Option<char> + 'static) -> Self {
        Self::new(code_space, move |code| decode(code).map(String::from))
    }

    /// Single-byte decoder mapping each byte to the same Unicode code point.
    pub fn latin1() -> Self {
        Self::from_chars(CodeSpace::SingleByte, char::from_u32)
    }

    /// Two-byte decoder reading codes as UTF-16BE units. Surrogates are unmapped.
    pub fn utf16be() -> Self {
        Self::from_chars(CodeSpace::two_byte(), char::from_u32)
    }

    pub fn code_space(&self) -> &CodeSpace {
        &self.code_space
    }

    /// Decode `bytes` to text. Unmapped codes become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        for c in self.code_space.split(bytes) {
            match c.valid.then(|| (self.decode)(c.code)).flatten() {
                Some(s) => out.push_str(&s),
                None => out.push(char::REPLACEMENT_CHARACTER),
            }
        }
        out
    }
}

/// Stable identity of a font resource.
///
/// Indirect fonts are identified by their object reference, so two resource
/// names pointing at the same font share one decoder. Direct font
/// dictionaries fall back to the name they were found under, qualified by
/// where they were found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontKey {
    Reference(ObjRef),
    /// Direct dictionary in the `Font` resource category.
    Name(Name),
    /// Direct dictionary in the `Font` entry of the named ExtGState.
    ExtGState(Name),
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontKey::Reference(r) => write!(f, "{r}"),
            FontKey::Name(n) => write!(f, "{n}"),
            FontKey::ExtGState(n) => write!(f, "ExtGState {n}"),
        }
    }
}

/// A font selected by `Tf`: resource name, identity and dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct FontResource {
    pub name: Name,
    pub key: FontKey,
    pub dict: pdftext_core::Dict,
}

impl FontResource {
    /// `BaseFont` of the dictionary, if present.
    pub fn base_font(&self) -> Option<&Name> {
        self.dict.get("BaseFont").and_then(|o| o.as_name())
    }
}

/// Builds decoders for fonts.
pub trait FontResolver {
    fn resolve_decoder(&self, font: &FontResource) -> Result<FontDecoder, ContentError>;
}

impl<F> FontResolver for F
where
    F: Fn(&FontResource) -> Result<FontDecoder, ContentError>,
{
    fn resolve_decoder(&self, font: &FontResource) -> Result<FontDecoder, ContentError> {
        self(font)
    }
}

/// Decoders resolved so far in one extraction call, keyed by font identity.
#[derive(Debug, Default)]
pub struct DecoderCache {
    decoders: HashMap<FontKey, FontDecoder>,
}

impl DecoderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached decoder for `font`, resolving it on first use.
    ///
    /// Failures are returned and not cached.
    pub fn get_or_resolve(
        &mut self,
        font: &FontResource,
        resolver: &dyn FontResolver,
    ) -> Result<&FontDecoder, ContentError> {
        match self.decoders.entry(font.key.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(
                    font = %font.key,
                    name = %font.name,
                    base_font = ?font.base_font(),
                    "resolving font decoder"
                );
                Ok(entry.insert(resolver.resolve_decoder(font)?))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}
