//! Buffered byte source feeding the scanner.
//!
//! [`ByteSource`] pulls bytes from any [`Read`] through a refill buffer, lets
//! the scanner push back up to two bytes, and tracks the absolute offset of
//! the next byte. The first I/O error is latched: every later read replays an
//! error of the same kind and message instead of touching the reader again.
//!
//! [`PartChain`] concatenates the parts of a multi-stream page into one
//! logical reader.

use std::io::{self, Read};

use tracing::debug;

use crate::error::ContentError;

const REFILL_SIZE: usize = 4096;
const MAX_PUSHBACK: usize = 2;

/// Streaming byte reader with bounded pushback and a sticky error latch.
pub struct ByteSource<R> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    pending: [u8; MAX_PUSHBACK],
    pending_len: usize,
    eof: bool,
    error: Option<(io::ErrorKind, String)>,
    offset: u64,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; REFILL_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            pending: [0; MAX_PUSHBACK],
            pending_len: 0,
            eof: false,
            error: None,
            offset: 0,
        }
    }

    /// Absolute offset of the next byte to be returned.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the underlying reader has failed.
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    fn replay_error(&self) -> Option<ContentError> {
        self.error
            .as_ref()
            .map(|(kind, msg)| ContentError::Io(io::Error::new(*kind, msg.clone())))
    }

    /// Makes sure the refill buffer holds at least one byte unless the
    /// reader is exhausted. Returns `Ok(false)` at end of input.
    fn fill(&mut self) -> Result<bool, ContentError> {
        if self.pos < self.len {
            return Ok(true);
        }
        if let Some(err) = self.replay_error() {
            return Err(err);
        }
        if self.eof {
            return Ok(false);
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(true);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(offset = self.offset, error = %err, "byte source failed");
                    self.error = Some((err.kind(), err.to_string()));
                    return Err(ContentError::Io(err));
                }
            }
        }
    }

    /// Next byte, `Ok(None)` at end of input.
    pub fn next(&mut self) -> Result<Option<u8>, ContentError> {
        if self.pending_len > 0 {
            self.pending_len -= 1;
            self.offset += 1;
            return Ok(Some(self.pending[self.pending_len]));
        }
        if !self.fill()? {
            return Ok(None);
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        self.offset += 1;
        Ok(Some(b))
    }

    /// Next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>, ContentError> {
        if self.pending_len > 0 {
            return Ok(Some(self.pending[self.pending_len - 1]));
        }
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.buf[self.pos]))
    }

    /// Consume the next byte if it satisfies `cond`.
    pub fn next_if(&mut self, cond: impl FnOnce(u8) -> bool) -> Result<Option<u8>, ContentError> {
        match self.peek()? {
            Some(b) if cond(b) => self.next(),
            _ => Ok(None),
        }
    }

    /// Push a byte back so the next read returns it.
    ///
    /// At most two bytes may be pending; pushing a third is a logic error
    /// in the caller and the byte is dropped.
    pub fn unread(&mut self, b: u8) {
        debug_assert!(self.pending_len < MAX_PUSHBACK, "pushback overflow");
        if self.pending_len < MAX_PUSHBACK {
            self.pending[self.pending_len] = b;
            self.pending_len += 1;
            self.offset -= 1;
        }
    }
}

/// A [`Read`] over the ordered parts of one logical content stream.
///
/// With `separator` set, a single space byte is emitted between consecutive
/// parts so that a token can never straddle a part boundary.
pub struct PartChain<I: Iterator> {
    parts: I,
    current: Option<I::Item>,
    index: usize,
    separator: bool,
    separator_pending: bool,
}

impl<I> PartChain<I>
where
    I: Iterator,
    I::Item: Read,
{
    pub fn new(parts: I, separator: bool) -> Self {
        Self {
            parts,
            current: None,
            index: 0,
            separator,
            separator_pending: false,
        }
    }
}

impl<I> Read for PartChain<I>
where
    I: Iterator,
    I::Item: Read,
{
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.separator_pending {
                self.separator_pending = false;
                out[0] = b' ';
                return Ok(1);
            }
            let Some(part) = self.current.as_mut() else {
                match self.parts.next() {
                    Some(next) => {
                        if self.index > 0 {
                            debug!(part = self.index, "content stream part boundary");
                            self.separator_pending = self.separator;
                        }
                        self.index += 1;
                        self.current = Some(next);
                        continue;
                    }
                    None => return Ok(0),
                }
            };
            match part.read(out)? {
                0 => self.current = None,
                n => return Ok(n),
            }
        }
    }
}
