use std::io::{self, Write};
use std::path::Path;

use pdftext_parse::pdftext_core::Object;
use pdftext_parse::{Assembler, ContentError, InterpretOptions, Scanner, for_each_command};

use crate::shared::{read_part, report};

pub fn run(file: &Path, commands: bool, options: InterpretOptions) -> Result<(), i32> {
    let data = read_part(file)?;
    let result = if commands {
        dump_commands(&data, &options)
    } else {
        dump_objects(&data, &options)
    };
    result.map_err(|e| report(&e))
}

/// One assembled object per line, operators included.
fn dump_objects(data: &[u8], options: &InterpretOptions) -> Result<(), ContentError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut assembler = Assembler::with_max_depth(Scanner::new(data), options.max_nesting_depth);
    loop {
        match assembler.next_object() {
            Ok(obj) => writeln!(out, "{obj}")?,
            Err(ContentError::EndOfInput) => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

/// One command per line: operands, then the operator.
fn dump_commands(data: &[u8], options: &InterpretOptions) -> Result<(), ContentError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for_each_command(data, options, |operator, operands| {
        writeln!(out, "{}", format_command(operator, operands))?;
        Ok(())
    })
}

fn format_command(operator: &[u8], operands: &[Object]) -> String {
    let mut line = String::new();
    for operand in operands {
        line.push_str(&operand.to_string());
        line.push(' ');
    }
    line.push_str(&String::from_utf8_lossy(operator));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdftext_parse::pdftext_core::Name;

    #[test]
    fn format_command_operands_then_operator() {
        let operands = [Object::Name(Name::from("F1")), Object::Integer(12)];
        assert_eq!(format_command(b"Tf", &operands), "/F1 12 Tf");
        assert_eq!(format_command(b"ET", &[]), "ET");
    }
}
