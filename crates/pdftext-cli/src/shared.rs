use std::fs;
use std::path::Path;

use pdftext_core::{Dict, Name, ObjRef, Object};
use pdftext_parse::{ContentError, FontDecoder, FontResource, ResourceCategory, Resources};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v` count.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a content-stream file with user-friendly error messages.
pub fn read_part(file: &Path) -> Result<Vec<u8>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    fs::read(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })
}

/// Print a fatal content error and return the exit code.
pub fn report(err: &ContentError) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Resources for bare content streams: every font name resolves to a
/// synthetic simple font named after it. Nothing else exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticFonts;

impl Resources for SyntheticFonts {
    fn get(&self, category: ResourceCategory, name: &Name) -> Option<Object> {
        match category {
            ResourceCategory::Font => {
                let mut dict = Dict::new();
                dict.insert("Type", Object::Name(Name::from("Font")));
                dict.insert("BaseFont", Object::Name(name.clone()));
                Some(Object::Dictionary(dict))
            }
            _ => None,
        }
    }

    fn resolve(&self, _reference: ObjRef) -> Option<Object> {
        None
    }
}

pub fn latin1_decoder(_font: &FontResource) -> Result<FontDecoder, ContentError> {
    Ok(FontDecoder::latin1())
}

pub fn utf16_decoder(_font: &FontResource) -> Result<FontDecoder, ContentError> {
    Ok(FontDecoder::utf16be())
}
