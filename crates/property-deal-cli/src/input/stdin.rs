use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON document for `what`.
///
/// `None` when stdin is an interactive terminal or nothing was piped.
pub fn read_stdin(what: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read stdin for {what}: {e}"))?;

    parse_piped(&buffer, what)
}

/// Parse piped text; blank input counts as no document.
fn parse_piped(text: &str, what: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin for {what}: {e}"))?;
    Ok(Some(value))
}
