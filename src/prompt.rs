//! Interactive console prompts, written against generic reader/writer
//! handles so tests can drive them with in-memory buffers.

use std::io::{self, BufRead, Write};

use crate::cli::Browser;

pub fn prompt_browser<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<Browser>> {
    writeln!(output, "Choose browser:")?;
    writeln!(output, "1. Firefox")?;
    writeln!(output, "2. Chrome")?;
    write!(output, "Enter 1 or 2: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(match line.trim() {
        "1" => Some(Browser::Firefox),
        "2" => Some(Browser::Chrome),
        _ => None,
    })
}

pub fn prompt_limit<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<u64>> {
    write!(output, "Number of entries to fetch (press Enter for all): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_limit(&line))
}

pub fn prompt_export<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "Export to CSV? (y/n): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// Empty, `all`, and non-numeric input all mean "every row".
pub fn parse_limit(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return None;
    }
    trimmed.parse().ok()
}
