//! Representation classes and the type resolver collaborator.
//!
//! A data flavor names the type its data is delivered as through the
//! `class` MIME parameter. The negotiation engine only needs to know what
//! *kind* of type a name denotes (a character stream, a byte buffer, a
//! list...), so names are resolved into [`RepresentationClass`] values by a
//! [`TypeResolver`] supplied by the host.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// What a representation class is, as far as flavor negotiation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A character stream (`java.io.Reader` or a subtype).
    Reader,
    /// Exactly `java.lang.String`.
    String,
    /// A character buffer (`java.nio.CharBuffer` or a subtype).
    CharBuffer,
    /// Exactly a char array, `[C`.
    CharArray,
    /// A byte stream (`java.io.InputStream` or a subtype).
    InputStream,
    /// A byte buffer (`java.nio.ByteBuffer` or a subtype).
    ByteBuffer,
    /// Exactly a byte array, `[B`.
    ByteArray,
    /// A list type (`java.util.List` or a subtype), used for file lists.
    List,
    /// Anything else.
    Other,
}

/// A resolved representation type.
///
/// Identity is the fully qualified name; the kind and flags describe what
/// the type can be used as.
#[derive(Debug, Clone)]
pub struct RepresentationClass {
    name: Arc<str>,
    kind: TypeKind,
    serializable: bool,
    remote: bool,
}

impl RepresentationClass {
    /// Describes a type that is neither serializable nor remote.
    pub fn new(name: impl Into<Arc<str>>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            serializable: false,
            remote: false,
        }
    }

    /// Marks the type as serializable.
    pub fn serializable(mut self) -> Self {
        self.serializable = true;
        self
    }

    /// Marks the type as a remote object interface.
    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    /// Returns the fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns true for serializable types.
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    /// Returns true for remote object types.
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Returns true for the decoded text types: readers, `String`, char
    /// buffers and char arrays.
    pub fn is_standard_text(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Reader | TypeKind::String | TypeKind::CharBuffer | TypeKind::CharArray
        )
    }

    /// Returns true for the encoded text types: byte streams, byte buffers
    /// and byte arrays.
    pub fn is_encoded_text(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::InputStream | TypeKind::ByteBuffer | TypeKind::ByteArray
        )
    }
}

impl PartialEq for RepresentationClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RepresentationClass {}

impl Hash for RepresentationClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for RepresentationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Well-known representation class names.
pub mod names {
    pub const INPUT_STREAM: &str = "java.io.InputStream";
    pub const READER: &str = "java.io.Reader";
    pub const STRING: &str = "java.lang.String";
    pub const CHAR_BUFFER: &str = "java.nio.CharBuffer";
    pub const BYTE_BUFFER: &str = "java.nio.ByteBuffer";
    pub const CHAR_ARRAY: &str = "[C";
    pub const BYTE_ARRAY: &str = "[B";
    pub const LIST: &str = "java.util.List";
    pub const IMAGE: &str = "java.awt.Image";
    pub const OBJECT: &str = "java.lang.Object";
    pub const SERIALIZABLE: &str = "java.io.Serializable";
    pub const REMOTE: &str = "java.rmi.Remote";
}

/// Resolves representation class names.
///
/// Implemented by the host environment. Returning `None` makes flavor
/// construction fail with [`Error::UnresolvedType`](crate::Error::UnresolvedType).
pub trait TypeResolver: Send + Sync {
    /// Resolves a fully qualified type name.
    fn resolve(&self, name: &str) -> Option<RepresentationClass>;
}

fn builtin_types() -> Vec<RepresentationClass> {
    use names::*;
    vec![
        RepresentationClass::new(INPUT_STREAM, TypeKind::InputStream),
        RepresentationClass::new("java.io.ByteArrayInputStream", TypeKind::InputStream),
        RepresentationClass::new("java.io.FileInputStream", TypeKind::InputStream),
        RepresentationClass::new(READER, TypeKind::Reader),
        RepresentationClass::new("java.io.StringReader", TypeKind::Reader),
        RepresentationClass::new("java.io.InputStreamReader", TypeKind::Reader),
        RepresentationClass::new(STRING, TypeKind::String).serializable(),
        RepresentationClass::new(CHAR_BUFFER, TypeKind::CharBuffer),
        RepresentationClass::new(BYTE_BUFFER, TypeKind::ByteBuffer),
        RepresentationClass::new(CHAR_ARRAY, TypeKind::CharArray).serializable(),
        RepresentationClass::new(BYTE_ARRAY, TypeKind::ByteArray).serializable(),
        RepresentationClass::new(LIST, TypeKind::List),
        RepresentationClass::new("java.util.ArrayList", TypeKind::List).serializable(),
        RepresentationClass::new(IMAGE, TypeKind::Other),
        RepresentationClass::new(OBJECT, TypeKind::Other),
        RepresentationClass::new(SERIALIZABLE, TypeKind::Other).serializable(),
        RepresentationClass::new(REMOTE, TypeKind::Other).remote(),
        RepresentationClass::new("java.net.URL", TypeKind::Other).serializable(),
    ]
}

/// The built-in type table.
///
/// Knows the standard text, byte and list types and accepts additional
/// registrations at runtime.
///
/// # Examples
///
/// ```
/// use flavor_map::{RepresentationClass, StandardTypes, TypeKind, TypeResolver};
///
/// let types = StandardTypes::new();
/// assert_eq!(types.resolve("java.io.Reader").unwrap().kind(), TypeKind::Reader);
/// assert!(types.resolve("com.example.Payload").is_none());
///
/// types.register(RepresentationClass::new("com.example.Payload", TypeKind::Other).serializable());
/// assert!(types.resolve("com.example.Payload").unwrap().is_serializable());
/// ```
#[derive(Debug)]
pub struct StandardTypes {
    types: RwLock<HashMap<Arc<str>, RepresentationClass>>,
}

impl StandardTypes {
    /// Creates a table holding the built-in types.
    pub fn new() -> Self {
        let types = builtin_types()
            .into_iter()
            .map(|class| (class.name.clone(), class))
            .collect();
        Self {
            types: RwLock::new(types),
        }
    }

    /// Returns the process-wide table used by the resolver-less flavor
    /// constructors.
    pub fn global() -> &'static StandardTypes {
        static GLOBAL: Lazy<StandardTypes> = Lazy::new(StandardTypes::new);
        &GLOBAL
    }

    /// Adds or replaces a type.
    pub fn register(&self, class: RepresentationClass) {
        self.types.write().insert(class.name.clone(), class);
    }

    /// Returns a built-in type, unaffected by later registrations.
    pub(crate) fn builtin(name: &'static str) -> RepresentationClass {
        static BUILTIN: Lazy<HashMap<Arc<str>, RepresentationClass>> = Lazy::new(|| {
            builtin_types()
                .into_iter()
                .map(|class| (class.name.clone(), class))
                .collect()
        });
        BUILTIN
            .get(name)
            .cloned()
            // every name in `names` is in the builtin table
            .unwrap_or_else(|| RepresentationClass::new(name, TypeKind::Other))
    }
}

impl Default for StandardTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver for StandardTypes {
    fn resolve(&self, name: &str) -> Option<RepresentationClass> {
        self.types.read().get(name).cloned()
    }
}

impl<T: TypeResolver + ?Sized> TypeResolver for Arc<T> {
    fn resolve(&self, name: &str) -> Option<RepresentationClass> {
        (**self).resolve(name)
    }
}
