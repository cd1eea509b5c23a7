//! Output rendering
//!
//! Every command produces one JSON document on stdout, indented two spaces.
//! The document is rendered in full before anything is written so a failed
//! command never leaves partial output behind.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Render `value` as two-space indented JSON with a trailing newline
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("failed to render output")?;
    out.push('\n');
    Ok(out)
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> Result<()> {
    let out = render(value)?;
    w.write_all(out.as_bytes())?;
    w.flush()?;
    Ok(())
}

/// Print `value` to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value)
}

/// Print a plain status line
pub fn print_ok() {
    println!("OK");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_two_space_indent() {
        let out = render(&json!({"name": "web", "ports": ["80/tcp"]})).unwrap();
        assert_eq!(
            out,
            "{\n  \"name\": \"web\",\n  \"ports\": [\n    \"80/tcp\"\n  ]\n}\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!([])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");
    }
}
