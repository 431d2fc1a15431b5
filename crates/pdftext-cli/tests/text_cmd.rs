//! Integration tests for the `text` subcommand.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cmd() -> Command {
    Command::cargo_bin("pdftext").unwrap()
}

/// Write raw content-stream bytes to a temporary file.
fn write_part(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

fn path(f: &tempfile::NamedTempFile) -> &str {
    f.path().to_str().unwrap()
}

#[test]
fn text_extracts_hello() {
    let f = write_part(b"BT /F1 12 Tf 72 72 Td (Hello) Tj ET");
    cmd()
        .args(["text", path(&f)])
        .assert()
        .success()
        .stdout("Hello\n");
}

#[test]
fn text_one_line_per_run() {
    let f = write_part(b"BT /F1 12 Tf [(Hel) -50 (lo)] TJ 0 -14 Td (World) ' ET");
    cmd()
        .args(["text", path(&f)])
        .assert()
        .success()
        .stdout("Hel\nlo\nWorld\n");
}

#[test]
fn text_latin1_decoding() {
    let f = write_part(b"BT /F1 12 Tf (Caf\\351) Tj ET");
    cmd()
        .args(["text", path(&f)])
        .assert()
        .success()
        .stdout("Caf\u{e9}\n");
}

#[test]
fn text_two_byte_decoding() {
    let f = write_part(b"BT /F0 10 Tf <00480069> Tj ET");
    cmd()
        .args(["text", path(&f), "--two-byte"])
        .assert()
        .success()
        .stdout("Hi\n");
}

#[test]
fn text_parts_are_concatenated_in_order() {
    let a = write_part(b"BT /F1 12 Tf");
    let b = write_part(b"(second) Tj ET");
    cmd()
        .args(["text", path(&a), path(&b)])
        .assert()
        .success()
        .stdout("second\n");
}

#[test]
fn text_no_part_separator_joins_tokens() {
    let a = write_part(b"BT /F1 12 Tf (a) T");
    let b = write_part(b"j ET");
    cmd()
        .args(["text", path(&a), path(&b), "--no-part-separator"])
        .assert()
        .success()
        .stdout("a\n");
    // with the separator, "T" and "j" are two unknown operators
    cmd()
        .args(["text", path(&a), path(&b)])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn text_json_format_outputs_json_lines() {
    let f = write_part(b"q 1 0 0 1 5 5 cm BT /F1 12 Tf 72 700 Td (Hi) Tj (there) Tj ET Q");
    let output = cmd()
        .args(["text", path(&f), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["text"], "Hi");
    assert_eq!(lines[0]["font"], "F1");
    assert_eq!(lines[0]["font_size"], 12.0);
    assert_eq!(lines[0]["text_matrix"][5], 700.0);
    assert_eq!(lines[0]["ctm"][4], 5.0);
    assert_eq!(lines[1]["text"], "there");
}

#[test]
fn text_malformed_stream_fails() {
    let f = write_part(b"BT /F1 12 Tf (ok) Tj <4G> Tj ET");
    cmd()
        .args(["text", path(&f)])
        .assert()
        .failure()
        .code(1)
        .stdout("ok\n")
        .stderr(predicate::str::contains("Error: malformed token at offset"));
}

#[test]
fn text_text_without_font_fails() {
    let f = write_part(b"BT (x) Tj ET");
    cmd()
        .args(["text", path(&f)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn text_max_depth_limit() {
    let f = write_part(b"[[[1]]] pop BT /F1 1 Tf (x) Tj ET");
    cmd()
        .args(["text", path(&f), "--max-depth", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit exceeded"));
    cmd()
        .args(["text", path(&f)])
        .assert()
        .success()
        .stdout("x\n");
}

#[test]
fn text_file_not_found_error() {
    cmd()
        .args(["text", "/nonexistent/content.bin"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn text_verbose_logs_to_stderr() {
    let f = write_part(b"BT /F1 12 Tf (x) Tj zz ET");
    cmd()
        .env_remove("RUST_LOG")
        .args(["-v", "text", path(&f)])
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::contains("unknown operator"));
}
