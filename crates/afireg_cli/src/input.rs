//! Prompt/response helpers for the menu loop.
//!
//! # Responsibility
//! - Gather and pre-validate typed input from stdin.
//! - Map yes/no answers onto the core's pure deletion decision.

use afireg_core::{DeletionDecision, ValidationError};
use std::io::{self, Write};

/// Prompts once and returns the trimmed answer.
///
/// A closed stdin is reported as an I/O error so the caller can terminate
/// instead of spinning on empty reads.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut buffer = String::new();
    let read = io::stdin().read_line(&mut buffer)?;
    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input stream closed",
        ));
    }
    Ok(buffer.trim().to_string())
}

/// Prompts until `check` accepts the answer, echoing each rejection.
pub fn prompt_validated(
    label: &str,
    check: impl Fn(&str) -> Result<(), ValidationError>,
) -> io::Result<String> {
    loop {
        let value = prompt(label)?;
        match check(&value) {
            Ok(()) => return Ok(value),
            Err(err) => println!("{err}"),
        }
    }
}

/// Prompts once for a numeric identifier; `None` means the answer was not
/// a number.
pub fn prompt_id(label: &str) -> io::Result<Option<i64>> {
    let raw = prompt(label)?;
    Ok(raw.parse().ok())
}

/// Asks a yes/no question; only `y`/`yes` (case-insensitive) confirms.
pub fn confirm(label: &str) -> io::Result<DeletionDecision> {
    let answer = prompt(label)?.to_ascii_lowercase();
    Ok(match answer.as_str() {
        "y" | "yes" => DeletionDecision::Confirmed,
        _ => DeletionDecision::Declined,
    })
}
