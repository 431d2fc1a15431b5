//! Byte classification for content-stream lexing.
//!
//! Every byte falls into exactly one of three classes. Whitespace and
//! delimiters end a run of regular bytes; the scanner, the name serializer
//! and the inline-image terminator search all share this table.

/// Lexical class of a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// NUL, TAB, LF, FF, CR, SPACE.
    Space,
    /// `%`, `(`, `)`, `<`, `>`, `[`, `]`, `/`.
    Delim,
    /// Everything else, including `{` and `}`.
    Reg,
}

const fn build_table() -> [CharClass; 256] {
    let mut table = [CharClass::Reg; 256];
    let spaces = b"\x00\x09\x0A\x0C\x0D\x20";
    let delims = b"%()<>[]/";
    let mut i = 0;
    while i < spaces.len() {
        table[spaces[i] as usize] = CharClass::Space;
        i += 1;
    }
    let mut i = 0;
    while i < delims.len() {
        table[delims[i] as usize] = CharClass::Delim;
        i += 1;
    }
    table
}

static TABLE: [CharClass; 256] = build_table();

impl CharClass {
    /// Classify a byte.
    #[inline]
    pub fn of(ch: u8) -> CharClass {
        TABLE[ch as usize]
    }

    /// Shorthand for `CharClass::of(ch) == CharClass::Space`.
    #[inline]
    pub fn is_space(ch: u8) -> bool {
        Self::of(ch) == CharClass::Space
    }

    /// Shorthand for `CharClass::of(ch) == CharClass::Reg`.
    #[inline]
    pub fn is_regular(ch: u8) -> bool {
        Self::of(ch) == CharClass::Reg
    }
}

/// Value of an ASCII hex digit, either case.
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_bytes() {
        for b in [b'\0', b'\t', b'\n', b'\x0C', b'\r', b' '] {
            assert_eq!(CharClass::of(b), CharClass::Space, "byte {b:#04x}");
        }
    }

    #[test]
    fn delimiter_bytes() {
        for b in *b"%()<>[]/" {
            assert_eq!(CharClass::of(b), CharClass::Delim, "byte {:?}", b as char);
        }
    }

    #[test]
    fn curly_braces_are_regular() {
        assert_eq!(CharClass::of(b'{'), CharClass::Reg);
        assert_eq!(CharClass::of(b'}'), CharClass::Reg);
    }

    #[test]
    fn other_bytes_are_regular() {
        assert_eq!(CharClass::of(b'a'), CharClass::Reg);
        assert_eq!(CharClass::of(b'\\'), CharClass::Reg);
        assert_eq!(CharClass::of(b'\''), CharClass::Reg);
        assert_eq!(CharClass::of(b'"'), CharClass::Reg);
        assert_eq!(CharClass::of(b'\x08'), CharClass::Reg);
        assert_eq!(CharClass::of(0xFF), CharClass::Reg);
        assert!(CharClass::is_regular(b'#'));
        assert!(CharClass::is_space(b'\r'));
    }

    #[test]
    fn hex_digits() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }
}
