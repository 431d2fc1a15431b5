//! Content-stream value model.
//!
//! [`Object`] is the tagged value produced by the scanner and assembler.
//! Every type here implements [`Display`] by re-serializing into
//! content-stream syntax, so that printing a parsed value and parsing the
//! output again yields an equal value.

use std::fmt::{self, Display, Formatter};

use crate::char_class::CharClass;

/// A name object, stored as its decoded bytes (`#XX` escapes already applied).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name(pub Vec<u8>);

impl Name {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Name(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lossy UTF-8 view, for diagnostics and keys.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Name {
        Name(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Name {
    fn from(b: &[u8]) -> Name {
        Name(b.to_vec())
    }
}

impl<T: AsRef<[u8]>> PartialEq<T> for Name {
    fn eq(&self, other: &T) -> bool {
        self.0 == other.as_ref()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for &c in &self.0 {
            if (0x21..=0x7E).contains(&c) && CharClass::is_regular(c) && c != b'#' {
                write!(f, "{}", c as char)?;
            } else {
                write!(f, "#{c:02X}")?;
            }
        }
        Ok(())
    }
}

/// Indirect object reference `num gen R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjRef {
    pub num: u32,
    pub generation: u16,
}

impl ObjRef {
    pub fn new(num: u32, generation: u16) -> Self {
        Self { num, generation }
    }
}

impl Display for ObjRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.num, self.generation)
    }
}

/// Dictionary with unique keys, kept in insertion order.
///
/// A `null` value is equivalent to an absent key: [`Dict::insert`] with
/// [`Object::Null`] removes the key instead of storing it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dict(Vec<(Name, Object)>);

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<Name>, value: Object) {
        let key = key.into();
        let pos = self.0.iter().position(|(k, _)| *k == key);
        match (pos, value) {
            (Some(i), Object::Null) => {
                self.0.remove(i);
            }
            (None, Object::Null) => {}
            (Some(i), value) => self.0[i].1 = value,
            (None, value) => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Object> {
        let key = key.as_ref();
        self.0.iter().find(|(k, _)| k.0 == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Object)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Name, Object)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Name, Object)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl Display for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("<<")?;
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{key} {value}")?;
        }
        f.write_str(">>")
    }
}

/// A content-stream value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Object {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Name(Name),
    /// String bytes, from either a literal `( )` or a hex `< >` string.
    String(Vec<u8>),
    Array(Vec<Object>),
    Dictionary(Dict),
    /// An operator mnemonic such as `Tj` or `cm`.
    Operator(Vec<u8>),
    /// Indirect reference. Only appears in resource dictionaries supplied
    /// by the caller; the scanner never produces one.
    Reference(ObjRef),
}

impl Object {
    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "null",
            Object::Boolean(_) => "boolean",
            Object::Integer(_) => "integer",
            Object::Real(_) => "real",
            Object::Name(_) => "name",
            Object::String(_) => "string",
            Object::Array(_) => "array",
            Object::Dictionary(_) => "dictionary",
            Object::Operator(_) => "operator",
            Object::Reference(_) => "reference",
        }
    }

    /// Numeric value of an Integer or Real.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Object::Integer(i) => Some(i as f64),
            Object::Real(r) => Some(r),
            _ => None,
        }
    }

    /// Integer value; a Real is accepted when it has no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Object::Integer(i) => Some(i),
            Object::Real(r) if r.fract() == 0.0 && r.is_finite() => Some(r as i64),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<f64> for Object {
    fn from(r: f64) -> Self {
        Object::Real(r)
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Object::Name(n)
    }
}

impl From<Dict> for Object {
    fn from(d: Dict) -> Self {
        Object::Dictionary(d)
    }
}

impl From<ObjRef> for Object {
    fn from(r: ObjRef) -> Self {
        Object::Reference(r)
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Object::Array(a)
    }
}

/// Writes a real so that it re-parses as a Real: always with a decimal point,
/// never in exponent notation.
fn write_real(f: &mut Formatter<'_>, r: f64) -> fmt::Result {
    if !r.is_finite() {
        // Not representable in content-stream syntax.
        return f.write_str("0.0");
    }
    let s = format!("{r}");
    if s.contains('.') {
        f.write_str(&s)
    } else {
        write!(f, "{s}.0")
    }
}

/// Writes a literal string, escaping the bytes that would otherwise change
/// meaning and using octal escapes for non-printable bytes.
pub fn write_literal_string(f: &mut impl fmt::Write, bytes: &[u8]) -> fmt::Result {
    f.write_char('(')?;
    for &c in bytes {
        match c {
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x08 => f.write_str("\\b")?,
            0x0C => f.write_str("\\f")?,
            b'(' => f.write_str("\\(")?,
            b')' => f.write_str("\\)")?,
            b'\\' => f.write_str("\\\\")?,
            0x20..=0x7E => f.write_char(c as char)?,
            _ => write!(f, "\\{c:03o}")?,
        }
    }
    f.write_char(')')
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => f.write_str("null"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Integer(i) => write!(f, "{i}"),
            Object::Real(r) => write_real(f, *r),
            Object::Name(n) => write!(f, "{n}"),
            Object::String(s) => write_literal_string(f, s),
            Object::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Object::Dictionary(d) => write!(f, "{d}"),
            Object::Operator(op) => f.write_str(&String::from_utf8_lossy(op)),
            Object::Reference(r) => write!(f, "{r}"),
        }
    }
}
