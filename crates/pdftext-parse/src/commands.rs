//! Grouping of objects into `(operator, operands)` commands.
//!
//! Operands accumulate in one reusable buffer until an operator arrives.
//! End of input ends the command sequence normally; operands left without a
//! closing operator are discarded.
//!
//! Inline images (`BI ... ID <data> EI`) get special treatment: after an `ID`
//! operator the scanner is switched to a raw read, and the image bytes are
//! delivered as the single String operand of a synthetic `EI` command.

use std::io::Read;

use pdftext_core::Object;
use tracing::debug;

use crate::assembler::Assembler;
use crate::error::ContentError;
use crate::options::InterpretOptions;
use crate::scanner::Scanner;

/// One operator with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub operator: Vec<u8>,
    pub operands: Vec<Object>,
    /// Offset of the operator token in the logical stream.
    pub offset: u64,
}

/// Pull-style command reader.
pub struct CommandReader<R> {
    assembler: Assembler<R>,
    operator: Vec<u8>,
    operands: Vec<Object>,
    offset: u64,
    max_operands: usize,
    inline_data_pending: bool,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R, options: &InterpretOptions) -> Self {
        Self {
            assembler: Assembler::with_max_depth(Scanner::new(source), options.max_nesting_depth),
            operator: Vec::new(),
            operands: Vec::new(),
            offset: 0,
            max_operands: options.max_operands,
            inline_data_pending: false,
        }
    }

    /// Move to the next command, leaving it in the reader's buffers.
    ///
    /// Returns `Ok(false)` at end of input.
    pub(crate) fn advance(&mut self) -> Result<bool, ContentError> {
        self.operands.clear();
        if self.inline_data_pending {
            self.inline_data_pending = false;
            let data = self.assembler.scanner_mut().read_inline_image_data()?;
            self.offset = self.assembler.scanner().offset().saturating_sub(2);
            self.operator.clear();
            self.operator.extend_from_slice(b"EI");
            self.operands.push(Object::String(data));
            return Ok(true);
        }
        loop {
            let obj = match self.assembler.next_object() {
                Ok(obj) => obj,
                Err(ContentError::EndOfInput) => {
                    if !self.operands.is_empty() {
                        debug!(
                            count = self.operands.len(),
                            "discarding trailing operands at end of input"
                        );
                        self.operands.clear();
                    }
                    return Ok(false);
                }
                Err(err) => return Err(err),
            };
            match obj {
                Object::Operator(op) => {
                    self.offset = self.assembler.scanner().token_start();
                    self.inline_data_pending = op == b"ID";
                    self.operator = op;
                    return Ok(true);
                }
                operand => {
                    if self.operands.len() >= self.max_operands {
                        return Err(ContentError::LimitExceeded {
                            limit: "operand count",
                            value: self.operands.len() + 1,
                        });
                    }
                    self.operands.push(operand);
                }
            }
        }
    }

    pub(crate) fn operator(&self) -> &[u8] {
        &self.operator
    }

    pub(crate) fn operands(&self) -> &[Object] {
        &self.operands
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next command, or `None` at end of input.
    pub fn next_command(&mut self) -> Result<Option<Command>, ContentError> {
        if !self.advance()? {
            return Ok(None);
        }
        Ok(Some(Command {
            operator: std::mem::take(&mut self.operator),
            operands: std::mem::take(&mut self.operands),
            offset: self.offset,
        }))
    }
}

/// Invoke `callback(operator, operands)` for every command in `source`.
///
/// Stops at the first error, from either the stream or the callback.
pub fn for_each_command<R, F>(
    source: R,
    options: &InterpretOptions,
    mut callback: F,
) -> Result<(), ContentError>
where
    R: Read,
    F: FnMut(&[u8], &[Object]) -> Result<(), ContentError>,
{
    let mut reader = CommandReader::new(source, options);
    while reader.advance()? {
        callback(&reader.operator, &reader.operands)?;
    }
    Ok(())
}
