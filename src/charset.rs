//! Character set names and their ranking.
//!
//! The negotiation engine never transcodes anything; it only needs to know
//! which names denote the same charset, which charsets are supported, and
//! which one to prefer when several text flavors differ only by charset.

use std::borrow::Cow;
use std::cmp::Ordering;

/// Charset assumed when a charset text flavor carries no `charset`
/// parameter.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Charset marker for flavors whose data is decoded text.
///
/// Canonicalizes to `UTF-16`, the platform's wide encoding.
pub const UNICODE_CHARSET: &str = "Unicode";

/// Canonical name and accepted aliases (lowercase) of every supported
/// charset.
static SUPPORTED: &[(&str, &[&str])] = &[
    ("US-ASCII", &["us-ascii", "ascii", "us", "iso646-us", "ascii7", "646", "cp367", "csascii"]),
    ("ISO-8859-1", &["iso-8859-1", "iso8859-1", "iso8859_1", "iso_8859-1", "8859_1", "latin1", "l1", "cp819"]),
    ("ISO-8859-2", &["iso-8859-2", "iso8859-2", "iso8859_2", "latin2", "l2"]),
    ("ISO-8859-15", &["iso-8859-15", "iso8859-15", "iso8859_15", "latin9", "latin-9"]),
    ("UTF-8", &["utf-8", "utf8", "unicode-1-1-utf-8"]),
    ("UTF-16", &["utf-16", "utf16", "unicode", "utf_16"]),
    ("UTF-16BE", &["utf-16be", "utf_16be", "x-utf-16be", "unicodebigunmarked", "iso-10646-ucs-2"]),
    ("UTF-16LE", &["utf-16le", "utf_16le", "x-utf-16le", "unicodelittleunmarked"]),
    ("windows-1252", &["windows-1252", "cp1252", "cp5348"]),
    ("KOI8-R", &["koi8-r", "koi8_r", "koi8", "cskoi8r"]),
    ("Shift_JIS", &["shift_jis", "sjis", "shift-jis", "ms_kanji", "x-sjis"]),
    ("EUC-JP", &["euc-jp", "eucjp", "euc_jp", "x-euc-jp"]),
    ("GBK", &["gbk", "cp936", "windows-936"]),
    ("Big5", &["big5", "csbig5"]),
];

/// Charsets every platform is expected to support, in addition to the
/// default charset.
static STANDARD: &[&str] = &["US-ASCII", "ISO-8859-1", "UTF-8", "UTF-16BE", "UTF-16LE", "UTF-16"];

fn lookup(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_ascii_lowercase();
    SUPPORTED
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Returns the canonical name of a charset.
///
/// Unknown names are returned unchanged, so two unknown names are only
/// equivalent when they are spelled identically.
///
/// # Examples
///
/// ```
/// use flavor_map::charset::canonical_name;
///
/// assert_eq!(canonical_name("utf8"), "UTF-8");
/// assert_eq!(canonical_name("Unicode"), "UTF-16");
/// assert_eq!(canonical_name("x-compound-text"), "x-compound-text");
/// ```
pub fn canonical_name(name: &str) -> Cow<'_, str> {
    match lookup(name) {
        Some(canonical) => Cow::Borrowed(canonical),
        None => Cow::Borrowed(name),
    }
}

/// Reports whether the charset is known and supported.
pub fn is_encoding_supported(name: &str) -> bool {
    lookup(name).is_some()
}

/// Returns the standard encodings, best first.
pub fn standard_encodings() -> Vec<&'static str> {
    let mut encodings: Vec<&'static str> = STANDARD.to_vec();
    if !encodings.contains(&DEFAULT_CHARSET) {
        encodings.push(DEFAULT_CHARSET);
    }
    encodings.sort_by(|a, b| compare_charsets(b, a));
    encodings
}

// Rank of a canonical charset; higher is better.
fn rank(canonical: &str) -> i32 {
    match canonical {
        "UTF-16" => 7,
        "UTF-8" => 6,
        "UTF-16BE" => 5,
        "UTF-16LE" => 4,
        "US-ASCII" => 1,
        c if c == DEFAULT_CHARSET => 3,
        _ => 0,
    }
}

/// Compares two charset names by preference; `Greater` means `a` is
/// preferred.
///
/// Unicode charsets win over the default charset, which wins over
/// US-ASCII, which wins over any other supported charset. Unsupported
/// charsets lose to everything. Equally ranked charsets are ordered
/// alphabetically by canonical name, the earlier name being preferred.
pub fn compare_charsets(a: &str, b: &str) -> Ordering {
    let a = lookup(a);
    let b = lookup(b);
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => rank(a).cmp(&rank(b)).then_with(|| b.cmp(a)),
    }
}
