//! Reader for the flavor map configuration format.
//!
//! The format is a restricted properties file:
//!
//! ```text
//! # comment
//! UTF8_STRING=text/plain;charset=UTF-8
//! UNICODE\ TEXT=text/plain;charset=utf-16le;eoln="\r\n";terminators=2
//! text/uri-list=application/x-java-file-list;class=java.util.List,\
//!     text/uri-list
//! ```
//!
//! Each line maps one native to a comma separated list of MIME types. An
//! odd number of trailing backslashes continues the line. In keys `\ `
//! stands for a space; values are unescaped individually (`\uXXXX`, `\t`,
//! `\n`, `\r`, `\f`). A comma always separates values, escaped or not.
//! Malformed lines and values are logged and skipped.

use tracing::warn;

/// One native and the MIME type strings configured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PropertyEntry {
    pub(crate) native: String,
    pub(crate) values: Vec<String>,
    pub(crate) line: usize,
}

/// Parses configuration text into entries, skipping what cannot be read.
pub(crate) fn parse_properties(text: &str) -> Vec<PropertyEntry> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_number = index + 1;
        let mut line = raw.trim().to_string();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        while continues(&line) {
            line.pop();
            match lines.next() {
                Some((_, next)) => line.push_str(next.trim()),
                None => break,
            }
        }

        let Some((key, values)) = line.split_once('=') else {
            warn!(line = line_number, "skipping flavor map line without '=': {}", line);
            continue;
        };
        let native = key.replace("\\ ", " ").trim().to_string();
        if native.is_empty() {
            warn!(line = line_number, "skipping flavor map line without a native");
            continue;
        }

        let values = values
            .split(',')
            .filter_map(|value| match unescape(value) {
                Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
                Ok(_) => None,
                Err(reason) => {
                    warn!(line = line_number, native = %native, "skipping flavor map value: {}", reason);
                    None
                }
            })
            .collect();

        entries.push(PropertyEntry {
            native,
            values,
            line: line_number,
        });
    }

    entries
}

/// True if the line ends in an unescaped backslash.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&ch| ch == '\\').count() % 2 == 1
}

/// Resolves backslash escapes in a value.
fn unescape(value: &str) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let digits: String = chars.by_ref().take(4).collect();
                if digits.len() != 4 {
                    return Err(format!("truncated \\u escape in {:?}", value));
                }
                let code = u32::from_str_radix(&digits, 16)
                    .map_err(|_| format!("malformed \\uxxxx encoding in {:?}", value))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("\\u{} is not a character", digits))?;
                out.push(decoded);
            }
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\x0c'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}
