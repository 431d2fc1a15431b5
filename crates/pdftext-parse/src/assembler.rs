//! Composite object assembly.
//!
//! [`Assembler`] folds the scanner's flat token sequence into nested arrays
//! and dictionaries. Scalars and operators outside any open composite are
//! returned immediately; inside one they accumulate in the top frame until
//! the matching close marker arrives.

use std::io::Read;

use pdftext_core::{Dict, Object};
use tracing::debug;

use crate::error::ContentError;
use crate::scanner::{Marker, Scanner, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Dict,
    Array,
}

/// An open `<<` or `[` and the values collected so far.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    values: Vec<Object>,
}

/// Stack machine building composite objects from tokens.
pub struct Assembler<R> {
    scanner: Scanner<R>,
    frames: Vec<Frame>,
    max_depth: usize,
}

impl<R: Read> Assembler<R> {
    /// Assembler with the default nesting limit of 64.
    pub fn new(scanner: Scanner<R>) -> Self {
        Self::with_max_depth(scanner, 64)
    }

    pub fn with_max_depth(scanner: Scanner<R>, max_depth: usize) -> Self {
        Self {
            scanner,
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn scanner(&self) -> &Scanner<R> {
        &self.scanner
    }

    /// The underlying scanner, for raw reads such as inline image data.
    pub fn scanner_mut(&mut self) -> &mut Scanner<R> {
        &mut self.scanner
    }

    /// Current number of open composites.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Read the next complete object.
    ///
    /// Operators are returned as [`Object::Operator`]. At end of input with
    /// composites still open, the partial values are discarded and
    /// [`ContentError::EndOfInput`] is returned.
    pub fn next_object(&mut self) -> Result<Object, ContentError> {
        loop {
            let token = match self.scanner.next_token() {
                Ok(token) => token,
                Err(ContentError::EndOfInput) if !self.frames.is_empty() => {
                    debug!(depth = self.frames.len(), "end of input inside open composite");
                    self.frames.clear();
                    return Err(ContentError::EndOfInput);
                }
                Err(err) => return Err(err),
            };
            let offset = self.scanner.token_start();
            let value = match token {
                Token::Marker(Marker::DictOpen) => {
                    self.push_frame(FrameKind::Dict)?;
                    continue;
                }
                Token::Marker(Marker::ArrayOpen) => {
                    self.push_frame(FrameKind::Array)?;
                    continue;
                }
                Token::Marker(Marker::DictClose) => self.close_dict(offset)?,
                Token::Marker(Marker::ArrayClose) => self.close_array(offset)?,
                other => match other.into_object() {
                    Some(obj) => obj,
                    None => continue,
                },
            };
            match self.frames.last_mut() {
                Some(frame) => frame.values.push(value),
                None => return Ok(value),
            }
        }
    }

    fn push_frame(&mut self, kind: FrameKind) -> Result<(), ContentError> {
        if self.frames.len() >= self.max_depth {
            return Err(ContentError::LimitExceeded {
                limit: "nesting depth",
                value: self.frames.len() + 1,
            });
        }
        self.frames.push(Frame {
            kind,
            values: Vec::new(),
        });
        Ok(())
    }

    fn close_dict(&mut self, offset: u64) -> Result<Object, ContentError> {
        let unbalanced = ContentError::UnbalancedClose {
            offset,
            marker: Marker::DictClose.as_str(),
        };
        let values = match self.frames.pop() {
            Some(Frame {
                kind: FrameKind::Dict,
                values,
            }) => values,
            Some(frame) => {
                self.frames.push(frame);
                return Err(unbalanced);
            }
            None => return Err(unbalanced),
        };
        if values.len() % 2 != 0 {
            return Err(ContentError::OddDictionary { offset });
        }
        let mut dict = Dict::new();
        let mut values = values.into_iter();
        while let (Some(key), Some(value)) = (values.next(), values.next()) {
            let Object::Name(key) = key else {
                return Err(ContentError::NonNameKey { offset });
            };
            // null values are dropped by insert
            dict.insert(key, value);
        }
        Ok(Object::Dictionary(dict))
    }

    fn close_array(&mut self, offset: u64) -> Result<Object, ContentError> {
        match self.frames.pop() {
            Some(Frame {
                kind: FrameKind::Array,
                values,
            }) => Ok(Object::Array(values)),
            Some(frame) => {
                self.frames.push(frame);
                Err(ContentError::UnbalancedClose {
                    offset,
                    marker: Marker::ArrayClose.as_str(),
                })
            }
            None => Err(ContentError::UnbalancedClose {
                offset,
                marker: Marker::ArrayClose.as_str(),
            }),
        }
    }
}

/// Parse exactly one object from `bytes`.
///
/// Trailing content after the first complete object is ignored.
pub fn parse_object(bytes: &[u8]) -> Result<Object, ContentError> {
    Assembler::new(Scanner::new(bytes)).next_object()
}

/// Parse every object in `bytes`, operators included.
pub fn parse_objects(bytes: &[u8]) -> Result<Vec<Object>, ContentError> {
    let mut assembler = Assembler::new(Scanner::new(bytes));
    let mut out = Vec::new();
    loop {
        match assembler.next_object() {
            Ok(obj) => out.push(obj),
            Err(ContentError::EndOfInput) => return Ok(out),
            Err(err) => return Err(err),
        }
    }
}
