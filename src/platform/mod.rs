//! The platform mapping collaborator.
//!
//! A desktop integration can contribute native/flavor mappings that are not
//! in the static configuration, and wants to know the text conventions
//! (charset, end of line, terminators) the configuration declares for its
//! text natives. The [`FlavorMap`](crate::FlavorMap) consults it on every
//! lookup of a key whose mappings were not pinned, and puts its answers
//! ahead of explicitly added mappings.

use crate::flavor::DataFlavor;
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;

/// Wide encoding the platform uses for native Unicode text.
#[cfg(windows)]
pub const DEFAULT_UNICODE_ENCODING: &str = "utf-16le";

/// Wide encoding the platform uses for native Unicode text.
#[cfg(not(windows))]
pub const DEFAULT_UNICODE_ENCODING: &str = "iso-10646-ucs-2";

/// Text conventions declared for a text native in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNativeProperties {
    /// Charset of the native data.
    pub charset: Option<String>,
    /// End of line sequence.
    pub eoln: Option<String>,
    /// Number of terminating NUL bytes.
    pub terminators: Option<u32>,
}

impl TextNativeProperties {
    /// Returns true if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.charset.is_none() && self.eoln.is_none() && self.terminators.is_none()
    }
}

/// Platform specific mappings between natives and flavors.
///
/// The [`FlavorMap`](crate::FlavorMap) memoizes lookup results that include
/// these answers, so for a given key they must not change once the map is
/// built.
pub trait PlatformMappings: Send + Sync {
    /// Flavors the platform maps `native` to, best first.
    fn mappings_for_native(&self, native: &str) -> Vec<DataFlavor>;

    /// Natives the platform maps `flavor` to, best first.
    fn mappings_for_flavor(&self, flavor: &DataFlavor) -> Vec<String>;

    /// Receives the text conventions the configuration declares for a
    /// charset text native.
    fn register_text_properties(&self, _native: &str, _properties: &TextNativeProperties) {}

    /// Encoding of native Unicode text.
    fn default_unicode_encoding(&self) -> &str {
        DEFAULT_UNICODE_ENCODING
    }
}

/// Table backed [`PlatformMappings`].
///
/// For hosts whose platform mappings are known up front, and for tests. The
/// table is filled before it is handed to a map and is read-only afterwards.
///
/// # Examples
///
/// ```
/// use flavor_map::{image_flavor, PlatformMappings, StaticPlatformMappings};
///
/// let platform = StaticPlatformMappings::new()
///     .with_mapping("PNG", image_flavor().clone())
///     .with_mapping("CF_DIB", image_flavor().clone());
/// assert_eq!(platform.mappings_for_flavor(image_flavor()), vec!["PNG", "CF_DIB"]);
/// ```
#[derive(Debug, Default)]
pub struct StaticPlatformMappings {
    flavors: IndexMap<String, IndexSet<DataFlavor>>,
    natives: IndexMap<DataFlavor, IndexSet<String>>,
    text_properties: RwLock<IndexMap<String, TextNativeProperties>>,
}

impl StaticPlatformMappings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `native` to `flavor` in both directions.
    pub fn with_mapping(mut self, native: &str, flavor: DataFlavor) -> Self {
        self.add(native.to_string(), flavor);
        self
    }

    fn add(&mut self, native: String, flavor: DataFlavor) {
        self.flavors
            .entry(native.clone())
            .or_default()
            .insert(flavor.clone());
        self.natives.entry(flavor).or_default().insert(native);
    }

    /// Returns the text properties registered for `native`, if any.
    pub fn text_properties(&self, native: &str) -> Option<TextNativeProperties> {
        self.text_properties.read().get(native).cloned()
    }
}

impl FromIterator<(String, DataFlavor)> for StaticPlatformMappings {
    fn from_iter<I: IntoIterator<Item = (String, DataFlavor)>>(iter: I) -> Self {
        let mut mappings = Self::new();
        for (native, flavor) in iter {
            mappings.add(native, flavor);
        }
        mappings
    }
}

impl PlatformMappings for StaticPlatformMappings {
    fn mappings_for_native(&self, native: &str) -> Vec<DataFlavor> {
        self.flavors
            .get(native)
            .map(|flavors| flavors.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn mappings_for_flavor(&self, flavor: &DataFlavor) -> Vec<String> {
        self.natives
            .get(flavor)
            .map(|natives| natives.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn register_text_properties(&self, native: &str, properties: &TextNativeProperties) {
        self.text_properties
            .write()
            .insert(native.to_string(), properties.clone());
    }
}
