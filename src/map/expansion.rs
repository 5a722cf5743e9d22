//! Expansion of a text base type into the flavors it can be delivered as.

use crate::charset::{standard_encodings, UNICODE_CHARSET};
use crate::flavor::{plain_text_flavor, string_flavor, DataFlavor};
use crate::mime_type::MimeType;
use crate::representation::{names, StandardTypes};
use indexmap::IndexSet;

const DECODED_TEXT_CLASSES: &[&str] = &[names::READER, names::STRING, names::CHAR_BUFFER, names::CHAR_ARRAY];

const ENCODED_TEXT_CLASSES: &[&str] = &[names::INPUT_STREAM, names::BYTE_BUFFER, names::BYTE_ARRAY];

const HTML_DOCUMENTS: &[&str] = &["all", "selection", "fragment"];

/// Returns every flavor a native of text base type `mime_type` can be
/// converted to, best first.
///
/// Parameters of `mime_type` are ignored. Charset-aware sub types expand to
/// the decoded text classes in the `Unicode` charset followed by every
/// standard encoding in every encoded text class; `text/plain` additionally
/// yields [`string_flavor`] first and [`plain_text_flavor`] last, and
/// `text/html` yields each variant once per `document` kind. Other sub
/// types expand to one flavor per encoded text class.
///
/// # Examples
///
/// ```
/// use flavor_map::map::text_flavors_for;
/// use flavor_map::{string_flavor, MimeType};
///
/// let flavors = text_flavors_for(&MimeType::parse("text/plain").unwrap());
/// assert_eq!(&flavors[0], string_flavor());
///
/// let rtf = text_flavors_for(&MimeType::parse("text/rtf").unwrap());
/// assert_eq!(rtf.len(), 3);
/// ```
pub fn text_flavors_for(mime_type: &MimeType) -> Vec<DataFlavor> {
    let base = mime_type.without_parameters();
    let mut flavors = IndexSet::new();

    if !crate::flavor::does_subtype_support_charset(base.sub_type(), None) {
        for class in ENCODED_TEXT_CLASSES {
            flavors.insert(flavor(&base, None, *class, None));
        }
        return flavors.into_iter().collect();
    }

    let is_plain = base.primary_type() == "text" && base.sub_type() == "plain";
    let documents: &[&str] = if base.primary_type() == "text" && base.sub_type() == "html" {
        HTML_DOCUMENTS
    } else {
        &[]
    };

    if is_plain {
        flavors.insert(string_flavor().clone());
    }
    for class in DECODED_TEXT_CLASSES {
        for_each_document(documents, |document| {
            flavors.insert(flavor(&base, Some(UNICODE_CHARSET), *class, document));
        });
    }
    for charset in standard_encodings() {
        for class in ENCODED_TEXT_CLASSES {
            for_each_document(documents, |document| {
                let candidate = flavor(&base, Some(charset), *class, document);
                if &candidate == plain_text_flavor() {
                    flavors.insert(plain_text_flavor().clone());
                } else {
                    flavors.insert(candidate);
                }
            });
        }
    }
    if is_plain {
        flavors.insert(plain_text_flavor().clone());
    }

    flavors.into_iter().collect()
}

fn for_each_document(documents: &[&str], mut f: impl FnMut(Option<&str>)) {
    if documents.is_empty() {
        f(None);
    } else {
        documents.iter().for_each(|document| f(Some(*document)));
    }
}

fn flavor(base: &MimeType, charset: Option<&str>, class: &'static str, document: Option<&str>) -> DataFlavor {
    let mut mime_type = base.clone();
    if let Some(charset) = charset {
        mime_type.set_parameter("charset", charset);
    }
    if let Some(document) = document {
        mime_type.set_parameter("document", document);
    }
    DataFlavor::from_parts(mime_type, StandardTypes::builtin(class), None)
}
