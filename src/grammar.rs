//! Token grammar for MIME types and parameter values.
//!
//! Based on the RFC 2045 `token` and `tspecials` productions.

/// Reports whether the character is in `tspecials`.
///
/// tspecials := "(" / ")" / "<" / ">" / "@" / "," / ";" / ":" / "\" / <"> / "/" / "[" / "]" / "?" / "="
pub fn is_tspecial(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '='
    )
}

/// Reports whether the character may appear in a token.
///
/// Anything strictly between SPACE and DEL that is not a tspecial.
pub fn is_token_char(c: char) -> bool {
    c > '\x20' && c < '\x7f' && !is_tspecial(c)
}

/// Reports whether the string is a non-empty run of token characters.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// Renders a parameter value, quoting it when it is not a bare token.
///
/// Inside quotes, `"` and `\` are escaped with a backslash. The empty
/// string is quoted so that the output always parses back.
pub fn quote(value: &str) -> String {
    if is_token(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Removes backslash escapes from the body of a quoted value.
///
/// The surrounding quotes must already be stripped. A trailing lone
/// backslash is dropped.
pub fn unquote(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut escaped = false;
    for ch in body.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    out
}
