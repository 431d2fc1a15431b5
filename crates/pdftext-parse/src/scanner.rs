//! Content stream tokenizer.
//!
//! [`Scanner`] turns a byte stream into a flat sequence of [`Token`]s:
//! numbers, strings, names, keywords, structural markers and operators.
//! Composite values are not built here; see [`crate::assembler`].

use std::io::Read;

use pdftext_core::{CharClass, Name, Object, hex_value};

use crate::error::ContentError;
use crate::source::ByteSource;

/// `<<`, `>>`, `[` or `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    DictOpen,
    DictClose,
    ArrayOpen,
    ArrayClose,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::DictOpen => "<<",
            Marker::DictClose => ">>",
            Marker::ArrayOpen => "[",
            Marker::ArrayClose => "]",
        }
    }
}

/// A primitive lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Null,
    Name(Name),
    /// Literal string `( ... )`, escapes already decoded.
    String(Vec<u8>),
    /// Hex string `< ... >`, already decoded to bytes.
    HexString(Vec<u8>),
    Marker(Marker),
    Operator(Vec<u8>),
}

impl Token {
    /// The value this token stands for, or `None` for structural markers.
    pub fn into_object(self) -> Option<Object> {
        Some(match self {
            Token::Integer(i) => Object::Integer(i),
            Token::Real(r) => Object::Real(r),
            Token::Boolean(b) => Object::Boolean(b),
            Token::Null => Object::Null,
            Token::Name(n) => Object::Name(n),
            Token::String(s) | Token::HexString(s) => Object::String(s),
            Token::Operator(op) => Object::Operator(op),
            Token::Marker(_) => return None,
        })
    }
}

/// Tokenizer over a streaming byte source.
pub struct Scanner<R> {
    src: ByteSource<R>,
    token_start: u64,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            src: ByteSource::new(reader),
            token_start: 0,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.src.offset()
    }

    /// Offset of the first byte of the most recently returned token.
    pub fn token_start(&self) -> u64 {
        self.token_start
    }

    /// Read the next token.
    ///
    /// Returns [`ContentError::EndOfInput`] once the source is exhausted
    /// between tokens.
    pub fn next_token(&mut self) -> Result<Token, ContentError> {
        let first = loop {
            match self.src.next()? {
                None => return Err(ContentError::EndOfInput),
                Some(b'%') => self.skip_comment()?,
                Some(c) if CharClass::is_space(c) => {}
                Some(c) => break c,
            }
        };
        let start = self.src.offset() - 1;
        self.token_start = start;
        match first {
            b'(' => self.read_string(start).map(Token::String),
            b'<' => {
                if self.src.next_if(|b| b == b'<')?.is_some() {
                    Ok(Token::Marker(Marker::DictOpen))
                } else {
                    self.read_hex_string(start).map(Token::HexString)
                }
            }
            b'>' => match self.src.next()? {
                Some(b'>') => Ok(Token::Marker(Marker::DictClose)),
                Some(other) => {
                    self.src.unread(other);
                    Err(ContentError::malformed(start, "lone '>'"))
                }
                None => Err(ContentError::malformed(start, "lone '>' at end of input")),
            },
            b'[' => Ok(Token::Marker(Marker::ArrayOpen)),
            b']' => Ok(Token::Marker(Marker::ArrayClose)),
            b'/' => self.read_name(start).map(Token::Name),
            _ => {
                let mut word = vec![first];
                while let Some(b) = self.src.next_if(CharClass::is_regular)? {
                    word.push(b);
                }
                Ok(classify_word(word))
            }
        }
    }

    /// Skip to the end of a `%` comment. The line terminator is left unread.
    fn skip_comment(&mut self) -> Result<(), ContentError> {
        while self.src.next_if(|b| b != b'\r' && b != b'\n')?.is_some() {}
        Ok(())
    }

    fn read_string(&mut self, start: u64) -> Result<Vec<u8>, ContentError> {
        let mut out = Vec::new();
        let mut depth = 1usize;
        loop {
            let Some(c) = self.src.next()? else {
                return Err(ContentError::malformed(start, "unterminated string"));
            };
            match c {
                b'(' => {
                    depth += 1;
                    out.push(c);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(c);
                }
                b'\\' => self.read_escape(start, &mut out)?,
                _ => out.push(c),
            }
        }
    }

    /// Decode the escape sequence following a backslash inside a string.
    fn read_escape(&mut self, start: u64, out: &mut Vec<u8>) -> Result<(), ContentError> {
        let Some(c) = self.src.next()? else {
            return Err(ContentError::malformed(start, "unterminated string escape"));
        };
        match c {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // escaped line end: CR LF counts as one, LF CR as two
            b'\n' => {}
            b'\r' => {
                self.src.next_if(|b| b == b'\n')?;
            }
            b'0'..=b'7' => {
                let mut value = u32::from(c - b'0');
                for _ in 0..2 {
                    match self.src.next_if(|b| (b'0'..=b'7').contains(&b))? {
                        Some(d) => value = value * 8 + u32::from(d - b'0'),
                        None => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            // `(`, `)`, `\` and anything else stand for themselves
            _ => out.push(c),
        }
        Ok(())
    }

    fn read_hex_string(&mut self, start: u64) -> Result<Vec<u8>, ContentError> {
        let mut out = Vec::new();
        let mut high: Option<u8> = None;
        loop {
            let Some(c) = self.src.next()? else {
                return Err(ContentError::malformed(start, "unterminated hex string"));
            };
            if c == b'>' {
                break;
            }
            if c <= b' ' {
                continue;
            }
            let Some(v) = hex_value(c) else {
                return Err(ContentError::malformed(
                    self.src.offset() - 1,
                    format!("invalid hex digit {:?} in hex string", c as char),
                ));
            };
            match high.take() {
                Some(h) => out.push(h << 4 | v),
                None => high = Some(v),
            }
        }
        if let Some(h) = high {
            out.push(h << 4);
        }
        Ok(out)
    }

    fn read_name(&mut self, start: u64) -> Result<Name, ContentError> {
        let mut out = Vec::new();
        while let Some(c) = self.src.next_if(CharClass::is_regular)? {
            if c != b'#' {
                out.push(c);
                continue;
            }
            let mut value = 0u8;
            for _ in 0..2 {
                let digit = self.src.next()?;
                match digit.and_then(hex_value) {
                    Some(v) => value = value << 4 | v,
                    None if digit.is_none() => {
                        return Err(ContentError::malformed(start, "unterminated name escape"));
                    }
                    None => {
                        return Err(ContentError::malformed(
                            self.src.offset() - 1,
                            "invalid hex digit in name escape",
                        ));
                    }
                }
            }
            out.push(value);
        }
        Ok(Name(out))
    }

    /// Raw data of an inline image, read after the `ID` operator.
    ///
    /// Skips the single whitespace byte that follows `ID`, then returns every
    /// byte up to the whitespace preceding an `EI` that is itself followed by
    /// whitespace, a delimiter or end of input. The `EI` is consumed.
    pub fn read_inline_image_data(&mut self) -> Result<Vec<u8>, ContentError> {
        let start = self.src.offset();
        self.src.next_if(CharClass::is_space)?;
        let mut data = Vec::new();
        loop {
            let Some(c) = self.src.next()? else {
                return Err(ContentError::malformed(start, "inline image without EI"));
            };
            if !CharClass::is_space(c) {
                data.push(c);
                continue;
            }
            if self.src.next_if(|b| b == b'E')?.is_none() {
                data.push(c);
                continue;
            }
            if self.src.next_if(|b| b == b'I')?.is_none() {
                data.push(c);
                data.push(b'E');
                continue;
            }
            match self.src.peek()? {
                None => return Ok(data),
                Some(b) if !CharClass::is_regular(b) => return Ok(data),
                Some(_) => data.extend_from_slice(&[c, b'E', b'I']),
            }
        }
    }
}

/// Numbers, keywords or operators: a run of regular bytes.
fn classify_word(word: Vec<u8>) -> Token {
    if let Some(token) = parse_number(&word) {
        return token;
    }
    match word.as_slice() {
        b"true" => Token::Boolean(true),
        b"false" => Token::Boolean(false),
        b"null" => Token::Null,
        _ => Token::Operator(word),
    }
}

fn parse_number(word: &[u8]) -> Option<Token> {
    let digits = match word.first()? {
        b'+' | b'-' => &word[1..],
        _ => word,
    };
    let s = std::str::from_utf8(word).ok()?;
    if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) {
        return Some(match s.parse::<i64>() {
            Ok(i) => Token::Integer(i),
            // out of i64 range
            Err(_) => Token::Real(s.parse::<f64>().ok()?),
        });
    }
    if !word
        .iter()
        .all(|&c| c.is_ascii_digit() || matches!(c, b'.' | b'+' | b'-'))
    {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(Token::Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token> {
        let mut scanner = Scanner::new(input);
        let mut out = Vec::new();
        loop {
            match scanner.next_token() {
                Ok(t) => out.push(t),
                Err(ContentError::EndOfInput) => return out,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    fn single(input: &[u8]) -> Token {
        let mut t = tokens(input);
        assert_eq!(t.len(), 1, "expected one token from {input:?}: {t:?}");
        t.remove(0)
    }

    fn scan_error(input: &[u8]) -> ContentError {
        let mut scanner = Scanner::new(input);
        loop {
            match scanner.next_token() {
                Ok(_) => continue,
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn empty_and_whitespace_only_input() {
        assert!(tokens(b"").is_empty());
        assert!(tokens(b" \t\r\n\x0C\0").is_empty());
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            tokens(b"1 % comment ( [ <<\n2%x\r3 %eof"),
            vec![Token::Integer(1), Token::Integer(2), Token::Integer(3)]
        );
    }

    #[test]
    fn integers() {
        assert_eq!(single(b"42"), Token::Integer(42));
        assert_eq!(single(b"-17"), Token::Integer(-17));
        assert_eq!(single(b"+0"), Token::Integer(0));
        assert_eq!(single(b"-0"), Token::Integer(0));
    }

    #[test]
    fn integer_overflow_falls_back_to_real() {
        assert_eq!(single(b"99999999999999999999"), Token::Real(1e20));
    }

    #[test]
    fn reals() {
        assert_eq!(single(b".5"), Token::Real(0.5));
        assert_eq!(single(b"+.5"), Token::Real(0.5));
        assert_eq!(single(b"-3.25"), Token::Real(-3.25));
        assert_eq!(single(b"4."), Token::Real(4.0));
    }

    #[test]
    fn non_numbers_become_operators() {
        assert_eq!(single(b"1e5"), Token::Operator(b"1e5".to_vec()));
        assert_eq!(single(b"inf"), Token::Operator(b"inf".to_vec()));
        assert_eq!(single(b"1.2.3"), Token::Operator(b"1.2.3".to_vec()));
        assert_eq!(single(b"-"), Token::Operator(b"-".to_vec()));
        assert_eq!(single(b"T*"), Token::Operator(b"T*".to_vec()));
        assert_eq!(single(b"'"), Token::Operator(b"'".to_vec()));
    }

    #[test]
    fn keywords() {
        assert_eq!(
            tokens(b"true false null"),
            vec![Token::Boolean(true), Token::Boolean(false), Token::Null]
        );
        assert_eq!(single(b"True"), Token::Operator(b"True".to_vec()));
    }

    #[test]
    fn operators_split_on_delimiters() {
        assert_eq!(
            tokens(b"0 0 m/F1 12 Tf[(a)]TJ"),
            vec![
                Token::Integer(0),
                Token::Integer(0),
                Token::Operator(b"m".to_vec()),
                Token::Name(Name::from("F1")),
                Token::Integer(12),
                Token::Operator(b"Tf".to_vec()),
                Token::Marker(Marker::ArrayOpen),
                Token::String(b"a".to_vec()),
                Token::Marker(Marker::ArrayClose),
                Token::Operator(b"TJ".to_vec()),
            ]
        );
    }

    #[test]
    fn curly_braces_join_words() {
        assert_eq!(single(b"{1}"), Token::Operator(b"{1}".to_vec()));
        assert_eq!(
            tokens(b"{ }"),
            vec![Token::Operator(b"{".to_vec()), Token::Operator(b"}".to_vec())]
        );
    }

    #[test]
    fn stray_close_paren_is_an_operator() {
        assert_eq!(single(b")"), Token::Operator(b")".to_vec()));
    }

    #[test]
    fn string_simple_and_nested() {
        assert_eq!(single(b"(Hello)"), Token::String(b"Hello".to_vec()));
        assert_eq!(single(b"(a(b)c)"), Token::String(b"a(b)c".to_vec()));
        assert_eq!(single(b"()"), Token::String(vec![]));
    }

    #[test]
    fn string_control_escapes() {
        assert_eq!(
            single(br"(\n\r\t\b\f\(\)\\)"),
            Token::String(b"\n\r\t\x08\x0C()\\".to_vec())
        );
    }

    #[test]
    fn string_escaped_line_endings() {
        assert_eq!(single(b"(a\\\r\nb)"), Token::String(b"ab".to_vec()));
        assert_eq!(single(b"(a\\\n\rb)"), Token::String(b"a\rb".to_vec()));
        assert_eq!(single(b"(a\\\rb)"), Token::String(b"ab".to_vec()));
        assert_eq!(single(b"(a\\\nb)"), Token::String(b"ab".to_vec()));
    }

    #[test]
    fn string_unescaped_line_endings_are_kept() {
        assert_eq!(single(b"(a\r\nb)"), Token::String(b"a\r\nb".to_vec()));
    }

    #[test]
    fn string_octal_escapes() {
        assert_eq!(single(br"(\101)"), Token::String(b"A".to_vec()));
        assert_eq!(single(br"(\0)"), Token::String(vec![0]));
        assert_eq!(single(br"(\12x)"), Token::String(b"\nx".to_vec()));
        assert_eq!(single(br"(\0053)"), Token::String(b"\x053".to_vec()));
        assert_eq!(single(br"(\777)"), Token::String(vec![0xFF]));
        assert_eq!(single(br"(\400)"), Token::String(vec![0x00]));
    }

    #[test]
    fn string_unknown_escape_passes_byte() {
        assert_eq!(single(br"(\q\8)"), Token::String(b"q8".to_vec()));
    }

    #[test]
    fn hex_strings() {
        assert_eq!(single(b"<48656C6C6F>"), Token::HexString(b"Hello".to_vec()));
        assert_eq!(single(b"<68656C7>"), Token::HexString(b"help".to_vec()));
        assert_eq!(single(b"<48 65\n6c 6C\t6f>"), Token::HexString(b"Hello".to_vec()));
        assert_eq!(single(b"<>"), Token::HexString(vec![]));
        assert_eq!(single(b"<a>"), Token::HexString(vec![0xA0]));
    }

    #[test]
    fn hex_string_rejects_non_hex() {
        let err = scan_error(b"<12zz>");
        assert!(
            matches!(err, ContentError::MalformedToken { offset: 3, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn names() {
        assert_eq!(single(b"/Type"), Token::Name(Name::from("Type")));
        assert_eq!(single(b"/A#42"), Token::Name(Name::from("AB")));
        assert_eq!(single(b"/lime#20green"), Token::Name(Name::from("lime green")));
        assert_eq!(single(b"/"), Token::Name(Name::default()));
        assert_eq!(single(b"/a{b}"), Token::Name(Name::from("a{b}")));
        assert_eq!(
            tokens(b"/A/B"),
            vec![Token::Name(Name::from("A")), Token::Name(Name::from("B"))]
        );
    }

    #[test]
    fn name_escape_may_encode_delimiters() {
        assert_eq!(single(b"/a#2Fb"), Token::Name(Name::from("a/b")));
    }

    #[test]
    fn name_bad_escape() {
        assert!(matches!(
            scan_error(b"/A#4G"),
            ContentError::MalformedToken { offset: 4, .. }
        ));
        assert!(matches!(
            scan_error(b"/A#4"),
            ContentError::MalformedToken { offset: 0, .. }
        ));
    }

    #[test]
    fn markers() {
        assert_eq!(
            tokens(b"<<[]>>"),
            vec![
                Token::Marker(Marker::DictOpen),
                Token::Marker(Marker::ArrayOpen),
                Token::Marker(Marker::ArrayClose),
                Token::Marker(Marker::DictClose),
            ]
        );
    }

    #[test]
    fn lone_close_angle_is_malformed() {
        assert!(matches!(
            scan_error(b"1 > 2"),
            ContentError::MalformedToken { offset: 2, .. }
        ));
        assert!(matches!(
            scan_error(b">"),
            ContentError::MalformedToken { .. }
        ));
    }

    #[test]
    fn unterminated_constructs_are_malformed() {
        for input in [&b"(abc"[..], b"(a\\", b"<4142", b"/x#"] {
            assert!(
                matches!(scan_error(input), ContentError::MalformedToken { .. }),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn offsets_track_tokens() {
        let mut scanner = Scanner::new(&b"  12 /Ab"[..]);
        scanner.next_token().unwrap();
        assert_eq!(scanner.token_start(), 2);
        assert_eq!(scanner.offset(), 4);
        scanner.next_token().unwrap();
        assert_eq!(scanner.token_start(), 5);
        assert_eq!(scanner.offset(), 8);
    }

    #[test]
    fn inline_image_data() {
        let mut scanner = Scanner::new(&b"ID \x00EI\xffE\nEIx\nEI Q"[..]);
        assert_eq!(scanner.next_token().unwrap(), Token::Operator(b"ID".to_vec()));
        let data = scanner.read_inline_image_data().unwrap();
        assert_eq!(data, b"\x00EI\xffE\nEIx");
        assert_eq!(scanner.next_token().unwrap(), Token::Operator(b"Q".to_vec()));
    }

    #[test]
    fn inline_image_data_at_end_of_input() {
        let mut scanner = Scanner::new(&b"ID abc EI"[..]);
        scanner.next_token().unwrap();
        assert_eq!(scanner.read_inline_image_data().unwrap(), b"abc");
        assert!(scanner.next_token().unwrap_err().is_end_of_input());
    }

    #[test]
    fn inline_image_without_terminator() {
        let mut scanner = Scanner::new(&b"ID abc"[..]);
        scanner.next_token().unwrap();
        assert!(matches!(
            scanner.read_inline_image_data(),
            Err(ContentError::MalformedToken { .. })
        ));
    }

    #[test]
    fn token_into_object() {
        assert_eq!(
            Token::HexString(b"A".to_vec()).into_object(),
            Some(Object::String(b"A".to_vec()))
        );
        assert_eq!(Token::Marker(Marker::DictOpen).into_object(), None);
    }
}
