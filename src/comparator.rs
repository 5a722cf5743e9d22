//! Ordering of text flavors by fidelity.
//!
//! Used to pick the single best text flavor out of the flavors a data
//! source offers.

use crate::charset::compare_charsets;
use crate::flavor::DataFlavor;
use crate::representation::TypeKind;
use std::cmp::Ordering;

/// Text base types from worst to best. Anything else ranks below all of
/// them.
static TEXT_TYPES: &[&str] = &[
    "text/plain",
    "application/x-java-serialized-object",
    "text/calendar",
    "text/css",
    "text/directory",
    "text/parityfec",
    "text/rfc822-headers",
    "text/t140",
    "text/tab-separated-values",
    "text/uri-list",
    "text/richtext",
    "text/enriched",
    "text/rtf",
    "text/html",
    "text/xml",
    "text/sgml",
];

/// Decoded text representations from worst to best.
static DECODED_TEXT: &[TypeKind] = &[
    TypeKind::CharArray,
    TypeKind::CharBuffer,
    TypeKind::String,
    TypeKind::Reader,
];

/// Encoded text representations from worst to best.
static ENCODED_TEXT: &[TypeKind] = &[TypeKind::ByteArray, TypeKind::ByteBuffer, TypeKind::InputStream];

fn rank<T: PartialEq>(table: &[T], item: &T) -> Option<usize> {
    table.iter().position(|entry| entry == item)
}

// `None` (unknown) loses to every listed entry.
fn compare_ranks<T: PartialEq>(table: &[T], a: &T, b: &T) -> Ordering {
    rank(table, a).cmp(&rank(table, b))
}

/// Compares two flavors as text; `Greater` means `a` is the better text
/// flavor.
///
/// Text flavors beat non-text flavors, and two non-text flavors are equal.
/// Two text flavors are ranked by:
///
/// 1. base MIME type: `sgml > xml > html > rtf > enriched > richtext >
///    uri-list > tab-separated-values > t140 > rfc822-headers > parityfec >
///    directory > css > calendar > application/x-java-serialized-object >
///    plain > anything else`;
/// 2. for charset-aware sub types, the decoded representation:
///    `Reader > String > CharBuffer > char[] > other`;
/// 3. for charset-aware sub types, the charset (see
///    [`compare_charsets`]);
/// 4. the encoded representation: `InputStream > ByteBuffer > byte[] >
///    other`.
///
/// Flavors that tie on all of these compare `Equal` even when they are
/// different flavors.
pub fn compare_text_flavors(a: &DataFlavor, b: &DataFlavor) -> Ordering {
    match (a.is_flavor_text_type(), b.is_flavor_text_type()) {
        (true, true) => compare_text(a, b),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}

fn compare_text(a: &DataFlavor, b: &DataFlavor) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let base_a = a.mime().base_type();
    let base_b = b.mime().base_type();
    let ordering = compare_ranks(TEXT_TYPES, &base_a.as_str(), &base_b.as_str());
    if ordering != Ordering::Equal {
        return ordering;
    }

    let kind_a = a.representation_class().kind();
    let kind_b = b.representation_class().kind();

    // same base type from here on, so one flavor decides charset support
    if a.does_subtype_support_charset() {
        let ordering = compare_ranks(DECODED_TEXT, &kind_a, &kind_b);
        if ordering != Ordering::Equal {
            return ordering;
        }
        if let (Some(charset_a), Some(charset_b)) = (a.effective_charset(), b.effective_charset()) {
            let ordering = compare_charsets(charset_a, charset_b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }

    compare_ranks(ENCODED_TEXT, &kind_a, &kind_b)
}

/// Selects the best text flavor out of `flavors`.
///
/// Returns `None` if the slice is empty or holds no text flavor. When
/// several flavors tie for best under [`compare_text_flavors`], which of
/// them is returned is unspecified.
///
/// # Examples
///
/// ```
/// use flavor_map::{select_best_text_flavor, DataFlavor};
///
/// let html = DataFlavor::new("text/html; charset=UTF-8; class=java.io.InputStream").unwrap();
/// let plain = DataFlavor::new("text/plain; class=java.lang.String").unwrap();
/// let flavors = [plain, html.clone()];
/// assert_eq!(select_best_text_flavor(&flavors), Some(&html));
/// ```
pub fn select_best_text_flavor(flavors: &[DataFlavor]) -> Option<&DataFlavor> {
    flavors
        .iter()
        .max_by(|a, b| compare_text_flavors(a, b))
        .filter(|best| best.is_flavor_text_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::{image_flavor, java_file_list_flavor, plain_text_flavor, string_flavor};

    fn flavor(mime: &str) -> DataFlavor {
        DataFlavor::new(mime).unwrap()
    }

    #[test]
    fn test_text_beats_non_text() {
        let text = flavor("text/plain; class=java.io.Reader");
        assert_eq!(compare_text_flavors(&text, image_flavor()), Ordering::Greater);
        assert_eq!(compare_text_flavors(image_flavor(), &text), Ordering::Less);
        assert_eq!(
            compare_text_flavors(image_flavor(), java_file_list_flavor()),
            Ordering::Equal
        );
    }

    #[test]
    fn test_base_type_dominates() {
        let html_stream = flavor("text/html; charset=UTF-8; class=java.io.InputStream");
        let plain_string = flavor("text/plain; class=java.lang.String");
        assert_eq!(
            compare_text_flavors(&html_stream, &plain_string),
            Ordering::Greater
        );

        let sgml = flavor("text/sgml; class=\"[B\"");
        assert_eq!(compare_text_flavors(&sgml, &html_stream), Ordering::Greater);

        // string_flavor ranks just above text/plain
        assert_eq!(
            compare_text_flavors(string_flavor(), &plain_string),
            Ordering::Greater
        );
        let calendar = flavor("text/calendar; class=java.lang.String");
        assert_eq!(
            compare_text_flavors(&calendar, string_flavor()),
            Ordering::Greater
        );
    }

    #[test]
    fn test_unknown_text_type_loses() {
        let other = flavor("text/x-comparator-other; charset=UTF-8; class=java.io.Reader");
        let plain = flavor("text/plain; class=\"[B\"");
        assert_eq!(compare_text_flavors(&plain, &other), Ordering::Greater);
    }

    #[test]
    fn test_decoded_representation_order() {
        let reader = flavor("text/plain; class=java.io.Reader");
        let string = flavor("text/plain; class=java.lang.String");
        let buffer = flavor("text/plain; class=java.nio.CharBuffer");
        let chars = flavor("text/plain; class=\"[C\"");
        let stream = flavor("text/plain; charset=UTF-16; class=java.io.InputStream");

        assert_eq!(compare_text_flavors(&reader, &string), Ordering::Greater);
        assert_eq!(compare_text_flavors(&string, &buffer), Ordering::Greater);
        assert_eq!(compare_text_flavors(&buffer, &chars), Ordering::Greater);
        assert_eq!(compare_text_flavors(&chars, &stream), Ordering::Greater);
    }

    #[test]
    fn test_charset_order() {
        let utf16 = flavor("text/plain; charset=UTF-16; class=java.nio.ByteBuffer");
        let utf8 = flavor("text/plain; charset=UTF-8; class=java.io.InputStream");
        let ascii = flavor("text/plain; charset=US-ASCII; class=java.io.InputStream");
        let latin1 = flavor("text/plain; charset=ISO-8859-1; class=java.io.InputStream");

        // charset decides before the encoded representation
        assert_eq!(compare_text_flavors(&utf16, &utf8), Ordering::Greater);
        assert_eq!(compare_text_flavors(&utf8, &ascii), Ordering::Greater);
        assert_eq!(compare_text_flavors(&ascii, &latin1), Ordering::Greater);
    }

    #[test]
    fn test_encoded_representation_order() {
        let stream = flavor("text/plain; charset=UTF-8; class=java.io.InputStream");
        let buffer = flavor("text/plain; charset=UTF-8; class=java.nio.ByteBuffer");
        let bytes = flavor("text/plain; charset=UTF-8; class=\"[B\"");
        assert_eq!(compare_text_flavors(&stream, &buffer), Ordering::Greater);
        assert_eq!(compare_text_flavors(&buffer, &bytes), Ordering::Greater);

        let rtf_stream = flavor("text/rtf; class=java.io.InputStream");
        let rtf_bytes = flavor("text/rtf; class=\"[B\"");
        assert_eq!(compare_text_flavors(&rtf_stream, &rtf_bytes), Ordering::Greater);
    }

    #[test]
    fn test_equal_flavors_compare_equal() {
        let a = flavor("text/plain; charset=utf8; class=java.io.InputStream");
        let b = flavor("text/plain; charset=UTF-8; class=java.io.InputStream");
        assert_eq!(compare_text_flavors(&a, &b), Ordering::Equal);
        assert_eq!(
            compare_text_flavors(plain_text_flavor(), plain_text_flavor()),
            Ordering::Equal
        );
    }

    #[test]
    fn test_select_best() {
        let html = flavor("text/html; charset=UTF-8; class=java.io.InputStream");
        let plain = flavor("text/plain; class=java.lang.String");
        let flavors = vec![plain.clone(), html.clone()];
        assert_eq!(select_best_text_flavor(&flavors), Some(&html));

        let reversed = vec![html.clone(), plain];
        assert_eq!(select_best_text_flavor(&reversed), Some(&html));
    }

    #[test]
    fn test_select_best_without_text() {
        assert_eq!(select_best_text_flavor(&[]), None);
        let flavors = vec![image_flavor().clone(), java_file_list_flavor().clone()];
        assert_eq!(select_best_text_flavor(&flavors), None);
    }
}
