//! Data flavors.
//!
//! A [`DataFlavor`] describes a datum's format independently of any
//! platform: a MIME type plus the representation class the data is
//! delivered as. Flavors are used as keys and values throughout the
//! [`FlavorMap`](crate::FlavorMap), so their equality and hashing follow a
//! precise set of rules:
//!
//! - representation classes must be equal;
//! - MIME types must *match*: same primary type, and same sub type unless
//!   either side is the `*` wildcard;
//! - for `text/*` flavors whose sub type supports a charset and whose
//!   representation class is not decoded text, the canonical `charset`
//!   parameters must be equal;
//! - for `text/html` flavors the `document` parameters must be equal.
//!
//! Because of the wildcard rule the sub type never contributes to the hash.
//! Wildcard matching also means equality is not transitive across
//! wildcard flavors; that is inherent to the matching rules.

use crate::charset::{canonical_name, is_encoding_supported, DEFAULT_CHARSET};
use crate::error::{Error, Result};
use crate::mime_type::MimeType;
use crate::representation::{names, RepresentationClass, StandardTypes, TypeKind, TypeResolver};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// MIME type of serialized objects.
pub const JAVA_SERIALIZED_OBJECT_MIME_TYPE: &str = "application/x-java-serialized-object";

/// MIME type of references to objects that never leave the process.
pub const JAVA_JVM_LOCAL_OBJECT_MIME_TYPE: &str = "application/x-java-jvm-local-objectref";

/// MIME type of remote object references.
pub const JAVA_REMOTE_OBJECT_MIME_TYPE: &str = "application/x-java-remote-object";

const HUMAN_PRESENTABLE_NAME: &str = "humanPresentableName";

/// Whether `text/<subtype>` carries a meaningful charset.
///
/// Seeded with the registered text subtypes. Subtypes outside the seed are
/// decided the first time one is seen, by whether that first flavor had a
/// `charset` parameter, and the answer sticks for the rest of the process.
/// Processes that see inconsistent flavors for one such subtype therefore
/// get order-dependent answers.
static TEXT_SUBTYPE_CHARSET_SUPPORT: Lazy<Mutex<HashMap<String, bool>>> = Lazy::new(|| {
    let seed = [
        ("sgml", true),
        ("xml", true),
        ("html", true),
        ("enriched", true),
        ("richtext", true),
        ("uri-list", true),
        ("directory", true),
        ("css", true),
        ("calendar", true),
        ("plain", true),
        ("rtf", false),
        ("tab-separated-values", false),
        ("t140", false),
        ("rfc822-headers", false),
        ("parityfec", false),
    ];
    Mutex::new(
        seed.into_iter()
            .map(|(subtype, supported)| (subtype.to_string(), supported))
            .collect(),
    )
});

/// Reports whether a text sub type supports a charset parameter.
///
/// `charset` is the charset parameter of the flavor or MIME type being
/// examined; it only matters the first time an unregistered sub type is
/// seen.
pub fn does_subtype_support_charset(sub_type: &str, charset: Option<&str>) -> bool {
    let mut table = TEXT_SUBTYPE_CHARSET_SUPPORT.lock();
    if let Some(&supported) = table.get(sub_type) {
        return supported;
    }
    let supported = charset.is_some();
    table.insert(sub_type.to_string(), supported);
    supported
}

/// A MIME-type-based, representation-qualified data format descriptor.
#[derive(Debug, Clone)]
pub struct DataFlavor {
    mime_type: MimeType,
    representation_class: RepresentationClass,
    human_presentable_name: String,
}

impl DataFlavor {
    /// Creates a flavor from a MIME type string.
    ///
    /// The `class` parameter names the representation class and is resolved
    /// against [`StandardTypes::global`]. Without it the class defaults to
    /// `java.io.InputStream`, except for
    /// `application/x-java-serialized-object`, which requires one.
    ///
    /// # Examples
    ///
    /// ```
    /// use flavor_map::DataFlavor;
    ///
    /// let flavor = DataFlavor::new("text/plain; charset=UTF-8").unwrap();
    /// assert_eq!(flavor.representation_class().name(), "java.io.InputStream");
    /// assert_eq!(flavor.human_presentable_name(), "text/plain");
    /// assert!(DataFlavor::new("application/x-java-serialized-object").is_err());
    /// ```
    pub fn new(mime_type: &str) -> Result<Self> {
        Self::with_resolver(mime_type, None, StandardTypes::global())
    }

    /// Creates a flavor with an explicit human presentable name.
    pub fn with_name(mime_type: &str, human_presentable_name: &str) -> Result<Self> {
        Self::with_resolver(mime_type, Some(human_presentable_name), StandardTypes::global())
    }

    /// Creates a flavor, resolving its representation class with `resolver`.
    ///
    /// Names the resolver does not know are looked up in the global
    /// standard table before giving up with [`Error::UnresolvedType`].
    pub fn with_resolver(
        mime_type: &str,
        human_presentable_name: Option<&str>,
        resolver: &dyn TypeResolver,
    ) -> Result<Self> {
        let parsed = MimeType::parse(mime_type)?;
        let representation_class = match parsed.parameter("class") {
            Some(class_name) => resolver
                .resolve(class_name)
                .or_else(|| StandardTypes::global().resolve(class_name))
                .ok_or_else(|| Error::UnresolvedType(class_name.to_string()))?,
            None if parsed.base_type() == JAVA_SERIALIZED_OBJECT_MIME_TYPE => {
                return Err(Error::InvalidArgument(format!(
                    "no representation class specified for: {}",
                    mime_type
                )));
            }
            None => StandardTypes::builtin(names::INPUT_STREAM),
        };
        Ok(Self::assemble(parsed, representation_class, human_presentable_name))
    }

    /// Creates a serialized-object flavor for a representation class.
    ///
    /// The MIME type is `application/x-java-serialized-object` with the
    /// class name as its `class` parameter.
    pub fn from_class(
        representation_class: RepresentationClass,
        human_presentable_name: Option<&str>,
    ) -> Self {
        Self::assemble(
            MimeType::from_static("application", "x-java-serialized-object"),
            representation_class,
            human_presentable_name,
        )
    }

    /// Creates a flavor from an already parsed MIME type and a resolved
    /// class. The `class` parameter is overwritten with the class name.
    pub(crate) fn from_parts(
        mime_type: MimeType,
        representation_class: RepresentationClass,
        human_presentable_name: Option<&str>,
    ) -> Self {
        Self::assemble(mime_type, representation_class, human_presentable_name)
    }

    fn assemble(
        mut mime_type: MimeType,
        representation_class: RepresentationClass,
        human_presentable_name: Option<&str>,
    ) -> Self {
        mime_type.set_parameter("class", representation_class.name());
        let human_presentable_name = match human_presentable_name {
            Some(name) => name.to_string(),
            None => mime_type
                .parameter(HUMAN_PRESENTABLE_NAME)
                .map(str::to_string)
                .unwrap_or_else(|| mime_type.base_type()),
        };
        mime_type.remove_parameter(HUMAN_PRESENTABLE_NAME);
        Self {
            mime_type,
            representation_class,
            human_presentable_name,
        }
    }

    fn constant(
        primary: &'static str,
        sub: &'static str,
        parameters: &[(&str, &str)],
        class: &'static str,
        human_presentable_name: Option<&str>,
    ) -> Self {
        let mut mime_type = MimeType::from_static(primary, sub);
        for (name, value) in parameters {
            mime_type.set_parameter(name, value);
        }
        Self::assemble(mime_type, StandardTypes::builtin(class), human_presentable_name)
    }

    /// Returns the full MIME type string, including the `class` parameter.
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    /// Returns the parsed MIME type.
    pub fn mime(&self) -> &MimeType {
        &self.mime_type
    }

    /// Returns the primary MIME type.
    pub fn primary_type(&self) -> &str {
        self.mime_type.primary_type()
    }

    /// Returns the MIME sub type.
    pub fn sub_type(&self) -> &str {
        self.mime_type.sub_type()
    }

    /// Returns a MIME parameter. `humanPresentableName` returns the
    /// flavor's human presentable name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        if name == HUMAN_PRESENTABLE_NAME {
            Some(&self.human_presentable_name)
        } else {
            self.mime_type.parameter(name)
        }
    }

    /// Returns the representation class.
    pub fn representation_class(&self) -> &RepresentationClass {
        &self.representation_class
    }

    /// Returns the human presentable name.
    pub fn human_presentable_name(&self) -> &str {
        &self.human_presentable_name
    }

    /// Replaces the human presentable name. It does not take part in
    /// equality.
    pub fn set_human_presentable_name(&mut self, name: impl Into<String>) {
        self.human_presentable_name = name.into();
    }

    /// Reports whether this flavor's MIME type matches `mime_type`.
    ///
    /// Unparseable input never matches.
    pub fn is_mime_type_equal(&self, mime_type: &str) -> bool {
        self.mime_type.matches_str(mime_type).unwrap_or(false)
    }

    /// Reports whether the MIME types of two flavors match, ignoring
    /// representation classes.
    pub fn is_mime_type_equal_to(&self, other: &DataFlavor) -> bool {
        self.mime_type.matches(&other.mime_type)
    }

    /// Returns true if this is a serialized-object MIME type.
    pub fn is_mime_type_serialized_object(&self) -> bool {
        self.is_mime_type_equal(JAVA_SERIALIZED_OBJECT_MIME_TYPE)
    }

    pub fn is_representation_class_input_stream(&self) -> bool {
        self.representation_class.kind() == TypeKind::InputStream
    }

    pub fn is_representation_class_reader(&self) -> bool {
        self.representation_class.kind() == TypeKind::Reader
    }

    pub fn is_representation_class_char_buffer(&self) -> bool {
        self.representation_class.kind() == TypeKind::CharBuffer
    }

    pub fn is_representation_class_byte_buffer(&self) -> bool {
        self.representation_class.kind() == TypeKind::ByteBuffer
    }

    pub fn is_representation_class_serializable(&self) -> bool {
        self.representation_class.is_serializable()
    }

    pub fn is_representation_class_remote(&self) -> bool {
        self.representation_class.is_remote()
    }

    /// Serialized-object MIME type with a serializable representation.
    pub fn is_flavor_serialized_object_type(&self) -> bool {
        self.is_representation_class_serializable() && self.is_mime_type_serialized_object()
    }

    /// Remote-object MIME type with a remote, serializable representation.
    pub fn is_flavor_remote_object_type(&self) -> bool {
        self.is_representation_class_remote()
            && self.is_representation_class_serializable()
            && self.is_mime_type_equal(JAVA_REMOTE_OBJECT_MIME_TYPE)
    }

    /// File list MIME type with a list representation.
    pub fn is_flavor_java_file_list_type(&self) -> bool {
        self.representation_class.kind() == TypeKind::List
            && self.mime_type.matches(&java_file_list_flavor().mime_type)
    }

    /// Reports whether this flavor's sub type supports a charset.
    ///
    /// See [`does_subtype_support_charset`].
    pub fn does_subtype_support_charset(&self) -> bool {
        does_subtype_support_charset(self.sub_type(), self.mime_type.parameter("charset"))
    }

    /// Text flavor whose data depends on a charset.
    ///
    /// True for [`string_flavor`], for `text/*` flavors with a
    /// charset-aware sub type and a decoded text representation, and for
    /// those with an encoded representation whose charset is absent or
    /// supported.
    pub fn is_flavor_charset_text_type(&self) -> bool {
        if self == string_flavor() {
            return true;
        }
        if self.primary_type() != "text" || !self.does_subtype_support_charset() {
            return false;
        }
        if self.representation_class.is_standard_text() {
            return true;
        }
        if !self.representation_class.is_encoded_text() {
            return false;
        }
        match self.mime_type.parameter("charset") {
            None => true,
            Some(charset) => is_encoding_supported(charset),
        }
    }

    /// Text flavor treated as opaque bytes: a `text/*` flavor whose sub type
    /// does not support a charset, delivered as encoded text.
    pub fn is_flavor_noncharset_text_type(&self) -> bool {
        self.primary_type() == "text"
            && !self.does_subtype_support_charset()
            && self.representation_class.is_encoded_text()
    }

    /// Returns true for charset and non-charset text flavors.
    pub fn is_flavor_text_type(&self) -> bool {
        self.is_flavor_charset_text_type() || self.is_flavor_noncharset_text_type()
    }

    /// Returns the charset text data of this flavor is encoded with.
    ///
    /// Fails with [`Error::UnsupportedFlavor`] for anything that is not a
    /// charset text flavor. A missing `charset` parameter means the default
    /// charset.
    pub fn text_charset(&self) -> Result<String> {
        self.effective_charset()
            .map(str::to_string)
            .ok_or_else(|| Error::UnsupportedFlavor(self.mime_type()))
    }

    pub(crate) fn effective_charset(&self) -> Option<&str> {
        if !self.is_flavor_charset_text_type() {
            return None;
        }
        Some(self.mime_type.parameter("charset").unwrap_or(DEFAULT_CHARSET))
    }

    fn hash_code(&self) -> u64 {
        let mut total = component_hash(self.representation_class.name())
            .wrapping_add(component_hash(self.primary_type()));
        if self.primary_type() == "text" {
            if self.does_subtype_support_charset() && !self.representation_class.is_standard_text() {
                if let Some(charset) = self.mime_type.parameter("charset") {
                    total = total.wrapping_add(component_hash(&canonical_name(charset)));
                }
            }
            if self.sub_type() == "html" {
                if let Some(document) = self.mime_type.parameter("document") {
                    total = total.wrapping_add(component_hash(document));
                }
            }
        }
        total
    }
}

fn component_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for DataFlavor {
    fn eq(&self, that: &Self) -> bool {
        if self.representation_class != that.representation_class {
            return false;
        }
        if !self.mime_type.matches(&that.mime_type) {
            return false;
        }
        if self.primary_type() == "text" {
            if self.does_subtype_support_charset() && !self.representation_class.is_standard_text() {
                let this_charset = self.mime_type.parameter("charset").map(canonical_name);
                let that_charset = that.mime_type.parameter("charset").map(canonical_name);
                if this_charset != that_charset {
                    return false;
                }
            }
            if self.sub_type() == "html"
                && self.mime_type.parameter("document") != that.mime_type.parameter("document")
            {
                return false;
            }
        }
        true
    }
}

impl Eq for DataFlavor {}

impl Hash for DataFlavor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for DataFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataFlavor[mimetype={};representationclass={}",
            self.mime_type.base_type(),
            self.representation_class
        )?;
        if self.representation_class.is_encoded_text() {
            if let Some(charset) = self.effective_charset() {
                write!(f, ";charset={}", charset)?;
            }
        }
        f.write_str("]")
    }
}

macro_rules! standard_flavor {
    ($(#[$doc:meta])* $name:ident => $init:expr) => {
        $(#[$doc])*
        pub fn $name() -> &'static DataFlavor {
            static FLAVOR: Lazy<DataFlavor> = Lazy::new(|| $init);
            &FLAVOR
        }
    };
}

standard_flavor!(
    /// Unicode text delivered as a `String`.
    string_flavor => DataFlavor::constant(
        "application", "x-java-serialized-object", &[], names::STRING, Some("Unicode String"),
    )
);

standard_flavor!(
    /// Images delivered as `java.awt.Image`.
    image_flavor => DataFlavor::constant("image", "x-java-image", &[], names::IMAGE, Some("Image"))
);

standard_flavor!(
    /// Plain text as a byte stream in the `unicode` charset.
    ///
    /// Deprecated in favor of [`string_flavor`] and the reader based text
    /// flavors; kept because platforms still announce it and callers look
    /// for this exact value.
    plain_text_flavor => DataFlavor::constant(
        "text", "plain", &[("charset", "unicode")], names::INPUT_STREAM, Some("Plain Text"),
    )
);

standard_flavor!(
    /// A list of files.
    java_file_list_flavor => DataFlavor::constant(
        "application", "x-java-file-list", &[], names::LIST, None,
    )
);

standard_flavor!(
    /// The whole HTML document as a `String`.
    all_html_flavor => DataFlavor::constant(
        "text", "html", &[("document", "all"), ("charset", "Unicode")], names::STRING, None,
    )
);

standard_flavor!(
    /// The selected part of an HTML document as a `String`.
    selection_html_flavor => DataFlavor::constant(
        "text", "html", &[("document", "selection"), ("charset", "Unicode")], names::STRING, None,
    )
);

standard_flavor!(
    /// The selected fragment of an HTML document, possibly unbalanced, as a
    /// `String`.
    fragment_html_flavor => DataFlavor::constant(
        "text", "html", &[("document", "fragment"), ("charset", "Unicode")], names::STRING, None,
    )
);
