use std::io::{self, Write};
use std::path::PathBuf;

use pdftext_parse::{ContentError, InterpretOptions, Interpreter, TextContext, TextRun};

use crate::cli::TextFormat;
use crate::shared::{SyntheticFonts, latin1_decoder, read_part, report, utf16_decoder};

pub fn run(
    files: &[PathBuf],
    format: &TextFormat,
    two_byte: bool,
    options: InterpretOptions,
) -> Result<(), i32> {
    let parts = files
        .iter()
        .map(|f| read_part(f))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(parts = parts.len(), two_byte, "interpreting content stream");

    let resolver = if two_byte { utf16_decoder } else { latin1_decoder };
    let mut interpreter = Interpreter::new(&SyntheticFonts, &resolver, options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut handler = |ctx: &TextContext<'_>, text: &str| -> Result<(), ContentError> {
        match format {
            TextFormat::Text => writeln!(out, "{text}")?,
            TextFormat::Json => {
                let run = TextRun::capture(ctx, text);
                let line = serde_json::to_string(&run)
                    .map_err(|e| ContentError::Handler(e.to_string()))?;
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    };

    interpreter
        .run(parts.iter().map(Vec::as_slice), &mut handler)
        .map_err(|e| report(&e))
}
