//! Property tests for the tokenizer and assembler.
//!
//! - Re-serializing a parsed object and parsing it again reaches a fixed point
//! - Arbitrary bytes never panic the scanner, assembler, or interpreter

use pdftext_parse::pdftext_core::{Dict, Name, Object};
use pdftext_parse::{
    ContentError, FontDecoder, FontResource, InterpretOptions, Interpreter, MemoryResources,
    ResourceCategory, TextRun, parse_object, parse_objects,
};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Object> {
    prop_oneof![
        Just(Object::Null),
        any::<bool>().prop_map(Object::Boolean),
        any::<i64>().prop_map(Object::Integer),
        (-1.0e9f64..1.0e9).prop_map(Object::Real),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(|b| Object::Name(Name(b))),
        prop::collection::vec(any::<u8>(), 0..40).prop_map(Object::String),
    ]
}

fn object() -> impl Strategy<Value = Object> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Object::Array),
            prop::collection::vec((prop::collection::vec(any::<u8>(), 1..8), inner), 0..6)
                .prop_map(|entries| {
                    Object::Dictionary(
                        entries
                            .into_iter()
                            .map(|(k, v)| (Name(k), v))
                            .collect::<Dict>(),
                    )
                }),
        ]
    })
}

fn reparse(obj: &Object) -> Result<Object, ContentError> {
    parse_object(obj.to_string().as_bytes())
}

/// Property: serialize, parse, serialize again is stable.
#[test]
fn proptest_serialize_reparse_fixed_point() {
    proptest!(|(obj in object())| {
        let once = reparse(&obj);
        prop_assert!(once.is_ok(), "failed to re-parse {}", obj);
        let once = once.unwrap();
        let twice = reparse(&once);
        prop_assert!(twice.is_ok(), "failed to re-parse {}", once);
        prop_assert_eq!(once.to_string(), twice.unwrap().to_string());
    });
}

/// Property: integers, names and strings survive exactly.
#[test]
fn proptest_exact_scalars() {
    proptest!(|(n in any::<i64>(), name in prop::collection::vec(any::<u8>(), 0..16), s in prop::collection::vec(any::<u8>(), 0..64))| {
        prop_assert_eq!(reparse(&Object::Integer(n)).unwrap(), Object::Integer(n));
        let name = Object::Name(Name(name));
        prop_assert_eq!(reparse(&name).unwrap(), name);
        let s = Object::String(s);
        prop_assert_eq!(reparse(&s).unwrap(), s);
    });
}

/// Property: arbitrary bytes produce objects or an error, never a panic.
#[test]
fn proptest_arbitrary_bytes_no_panic() {
    proptest!(|(bytes in prop::collection::vec(any::<u8>(), 0..256))| {
        let _ = parse_objects(&bytes);
    });
}

/// Property: the interpreter survives arbitrary operator soup.
#[test]
fn proptest_interpreter_no_panic() {
    let words = prop::sample::select(vec![
        "q", "Q", "cm", "BT", "ET", "Tf", "Td", "TD", "T*", "Tj", "TJ", "'", "\"", "gs", "BMC",
        "BDC", "EMC", "re", "f", "1", "0.5", "-3", "/F1", "/X", "(a)", "<41>", "[", "]", "<<",
        ">>", "sc", "scn", "d", "w", "Tr", "Tz",
    ]);
    proptest!(|(tokens in prop::collection::vec(words, 0..60))| {
        let content = tokens.join(" ");
        let mut res = MemoryResources::default();
        let mut font = Dict::new();
        font.insert("Type", Object::Name(Name::from("Font")));
        res.insert(ResourceCategory::Font, "F1", Object::Dictionary(font));
        let fonts = |_: &FontResource| -> Result<FontDecoder, ContentError> { Ok(FontDecoder::latin1()) };
        let mut runs: Vec<TextRun> = Vec::new();
        let _ = Interpreter::new(&res, &fonts, InterpretOptions::default())
            .run([content.as_bytes()], &mut runs);
    });
}
