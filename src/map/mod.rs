//! The flavor map.
//!
//! A [`FlavorMap`] maps platform format names ("natives") to the data
//! flavors they can be read as, and data flavors to the natives they can be
//! written as. Mappings come from three places, in priority order:
//!
//! 1. the platform collaborator ([`PlatformMappings`]), consulted on every
//!    lookup of a key whose mappings were not pinned;
//! 2. the static configuration (a bundled properties resource plus any
//!    sources given to the [`FlavorMapBuilder`]);
//! 3. mappings added at runtime with the `add_*` methods.
//!
//! A flavor nobody mapped is given an invented native, `JAVA_DATAFLAVOR:`
//! followed by its MIME type, and that native is mapped back to the flavor.
//! Text flavors are matched by base type, so a native configured for
//! `text/plain` serves every charset and representation of plain text.
//!
//! The map is safe to share between threads. Every operation runs under one
//! lock, and the platform collaborator is called with that lock held, so it
//! must not call back into the map.
//!
//! # Examples
//!
//! ```
//! use flavor_map::{string_flavor, FlavorMap};
//!
//! let map = FlavorMap::builder().build();
//! let natives = map.natives_for_flavor(string_flavor());
//! assert!(natives.contains(&"UTF8_STRING".to_string()));
//!
//! let flavors = map.flavors_for_native("UTF8_STRING");
//! assert!(flavors.contains(string_flavor()));
//! ```

mod builder;
mod cache;
mod codec;
mod expansion;
mod properties;

pub use builder::FlavorMapBuilder;
pub use codec::{
    decode_data_flavor, decode_java_mime_type, encode_data_flavor, encode_java_mime_type,
    is_java_mime_type, JAVA_MIME_PREFIX,
};
pub use expansion::text_flavors_for;

use crate::error::{Error, Result};
use crate::flavor::DataFlavor;
use crate::mime_type::MimeType;
use crate::platform::{PlatformMappings, TextNativeProperties, DEFAULT_UNICODE_ENCODING};
use crate::representation::{names, StandardTypes, TypeResolver};
use cache::LookupCache;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

const TEXT_PLAIN_BASE_TYPE: &str = "text/plain";

/// A thread-safe, extensible mapping between natives and data flavors.
pub struct FlavorMap {
    tables: Mutex<FlavorTables>,
}

struct FlavorTables {
    native_to_flavor: IndexMap<String, IndexSet<DataFlavor>>,
    flavor_to_native: IndexMap<DataFlavor, IndexSet<String>>,
    // natives configured for a text base type, e.g. "text/plain"
    text_type_to_native: IndexMap<String, IndexSet<String>>,
    natives_cache: LookupCache<DataFlavor, String>,
    flavors_cache: LookupCache<String, DataFlavor>,
    pinned_flavors: HashSet<DataFlavor>,
    pinned_natives: HashSet<String>,
    text_properties: IndexMap<String, TextNativeProperties>,
    platform: Option<Arc<dyn PlatformMappings>>,
    resolver: Option<Arc<dyn TypeResolver>>,
}

impl FlavorMap {
    /// Starts building a flavor map.
    pub fn builder() -> FlavorMapBuilder {
        FlavorMapBuilder::new()
    }

    /// Returns the shared process-wide map.
    ///
    /// It holds the bundled configuration and no platform collaborator. It
    /// is built the first time it is requested.
    pub fn system() -> Arc<FlavorMap> {
        static SYSTEM: Lazy<Arc<FlavorMap>> = Lazy::new(|| Arc::new(FlavorMap::builder().build()));
        Arc::clone(&SYSTEM)
    }

    fn from_tables(tables: FlavorTables) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Returns the natives `flavor` can be written as, best first.
    ///
    /// If nothing maps the flavor, a `JAVA_DATAFLAVOR:` native is invented
    /// and both directions of the new mapping are recorded. Flavors pinned
    /// with [`set_natives_for_flavor`](Self::set_natives_for_flavor) return
    /// exactly their pinned natives.
    pub fn natives_for_flavor(&self, flavor: &DataFlavor) -> Vec<String> {
        self.tables.lock().natives_for_flavor(flavor)
    }

    /// Returns every native the map knows, including invented ones.
    pub fn all_natives(&self) -> Vec<String> {
        self.tables.lock().all_natives()
    }

    /// Returns the flavors `native` can be read as, best first.
    ///
    /// Text flavors are followed by every charset and representation
    /// variant of their base type. An unknown native yields an empty list,
    /// except for a `JAVA_DATAFLAVOR:` native, which is decoded and
    /// recorded.
    pub fn flavors_for_native(&self, native: &str) -> Vec<DataFlavor> {
        self.tables.lock().flavors_for_native(native)
    }

    /// Returns every flavor any known native can be read as.
    pub fn all_flavors(&self) -> Vec<DataFlavor> {
        self.tables.lock().all_flavors()
    }

    /// Maps each flavor to its most preferred native, or `None` if it has
    /// none.
    pub fn natives_for_flavors(&self, flavors: &[DataFlavor]) -> IndexMap<DataFlavor, Option<String>> {
        let mut tables = self.tables.lock();
        flavors
            .iter()
            .map(|flavor| {
                let native = tables.natives_for_flavor(flavor).into_iter().next();
                (flavor.clone(), native)
            })
            .collect()
    }

    /// [`natives_for_flavors`](Self::natives_for_flavors) over
    /// [`all_flavors`](Self::all_flavors).
    pub fn natives_for_all_flavors(&self) -> IndexMap<DataFlavor, Option<String>> {
        let mut tables = self.tables.lock();
        let flavors = tables.all_flavors();
        flavors
            .into_iter()
            .map(|flavor| {
                let native = tables.natives_for_flavor(&flavor).into_iter().next();
                (flavor, native)
            })
            .collect()
    }

    /// Maps each native to its most preferred flavor, or `None` if it has
    /// none.
    pub fn flavors_for_natives<S: AsRef<str>>(&self, natives: &[S]) -> IndexMap<String, Option<DataFlavor>> {
        let mut tables = self.tables.lock();
        natives
            .iter()
            .map(|native| {
                let native = native.as_ref();
                let flavor = tables.flavors_for_native(native).into_iter().next();
                (native.to_string(), flavor)
            })
            .collect()
    }

    /// [`flavors_for_natives`](Self::flavors_for_natives) over
    /// [`all_natives`](Self::all_natives).
    pub fn flavors_for_all_natives(&self) -> IndexMap<String, Option<DataFlavor>> {
        let mut tables = self.tables.lock();
        let natives = tables.all_natives();
        natives
            .into_iter()
            .map(|native| {
                let flavor = tables.flavors_for_native(&native).into_iter().next();
                (native, flavor)
            })
            .collect()
    }

    /// Adds `native` as the least preferred native of `flavor`.
    ///
    /// The native is taken as is, never decoded.
    pub fn add_unencoded_native_for_flavor(&self, flavor: &DataFlavor, native: &str) -> Result<()> {
        check_native(native)?;
        self.tables.lock().add_native_for_flavor(flavor, native);
        Ok(())
    }

    /// Replaces the natives of `flavor` and pins them.
    ///
    /// A pinned flavor is never given an invented native and is not
    /// looked up on the platform. An empty list pins the flavor to
    /// nothing.
    pub fn set_natives_for_flavor<S: AsRef<str>>(&self, flavor: &DataFlavor, natives: &[S]) -> Result<()> {
        for native in natives {
            check_native(native.as_ref())?;
        }
        let mut tables = self.tables.lock();
        tables.flavor_to_native.shift_remove(flavor);
        for native in natives {
            tables.add_native_for_flavor(flavor, native.as_ref());
        }
        tables.pinned_flavors.insert(flavor.clone());
        tables.natives_cache.remove(flavor);
        debug!(flavor = %flavor, "pinned natives for flavor");
        Ok(())
    }

    /// Adds `flavor` as the least preferred flavor of `native`.
    ///
    /// The native is taken as is, never decoded.
    pub fn add_flavor_for_unencoded_native(&self, native: &str, flavor: &DataFlavor) -> Result<()> {
        check_native(native)?;
        self.tables.lock().add_flavor_for_native(native, flavor);
        Ok(())
    }

    /// Replaces the flavors of `native` and pins them.
    ///
    /// A pinned native is not looked up on the platform and its flavors
    /// are returned without text expansion.
    pub fn set_flavors_for_native(&self, native: &str, flavors: &[DataFlavor]) -> Result<()> {
        check_native(native)?;
        let mut tables = self.tables.lock();
        tables.native_to_flavor.shift_remove(native);
        for flavor in flavors {
            tables.add_flavor_for_native(native, flavor);
        }
        tables.pinned_natives.insert(native.to_string());
        tables.flavors_cache.remove(native);
        debug!(native, "pinned flavors for native");
        Ok(())
    }

    /// Returns the text conventions configured for a text native.
    pub fn text_properties_for_native(&self, native: &str) -> Option<TextNativeProperties> {
        self.tables.lock().text_properties.get(native).cloned()
    }

    /// Returns the plain text flavor in the platform's native Unicode
    /// encoding, delivered as a byte stream.
    pub fn text_plain_unicode_flavor(&self) -> DataFlavor {
        let tables = self.tables.lock();
        let encoding = tables
            .platform
            .as_ref()
            .map_or(DEFAULT_UNICODE_ENCODING, |platform| platform.default_unicode_encoding());
        let mut mime_type = MimeType::from_static("text", "plain");
        mime_type.set_parameter("charset", encoding);
        DataFlavor::from_parts(
            mime_type,
            StandardTypes::builtin(names::INPUT_STREAM),
            Some("Plain Text"),
        )
    }
}

impl Default for FlavorMap {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for FlavorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.lock();
        f.debug_struct("FlavorMap")
            .field("natives", &tables.native_to_flavor.len())
            .field("flavors", &tables.flavor_to_native.len())
            .field("has_platform", &tables.platform.is_some())
            .finish()
    }
}

fn check_native(native: &str) -> Result<()> {
    if native.is_empty() {
        return Err(Error::InvalidArgument("native must not be empty".to_string()));
    }
    Ok(())
}

impl FlavorTables {
    fn new(
        platform: Option<Arc<dyn PlatformMappings>>,
        resolver: Option<Arc<dyn TypeResolver>>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            native_to_flavor: IndexMap::new(),
            flavor_to_native: IndexMap::new(),
            text_type_to_native: IndexMap::new(),
            natives_cache: LookupCache::new(cache_capacity),
            flavors_cache: LookupCache::new(cache_capacity),
            pinned_flavors: HashSet::new(),
            pinned_natives: HashSet::new(),
            text_properties: IndexMap::new(),
            platform,
            resolver,
        }
    }

    fn resolver(&self) -> &dyn TypeResolver {
        match &self.resolver {
            Some(resolver) => resolver.as_ref(),
            None => StandardTypes::global(),
        }
    }

    fn add_native_for_flavor(&mut self, flavor: &DataFlavor, native: &str) {
        self.flavor_to_native
            .entry(flavor.clone())
            .or_default()
            .insert(native.to_string());
        self.natives_cache.remove(flavor);
    }

    fn add_flavor_for_native(&mut self, native: &str, flavor: &DataFlavor) {
        self.native_to_flavor
            .entry(native.to_string())
            .or_default()
            .insert(flavor.clone());
        self.flavors_cache.remove(native);
    }

    // Records both directions of a mapping.
    fn store(&mut self, native: &str, flavor: &DataFlavor) {
        self.add_flavor_for_native(native, flavor);
        self.add_native_for_flavor(flavor, native);
    }

    /// Platform flavors followed by explicit ones; decodes an unmapped
    /// encoded native.
    fn native_to_flavor_lookup(&mut self, native: &str) -> IndexSet<DataFlavor> {
        let mut flavors = self.native_to_flavor.get(native).cloned().unwrap_or_default();

        if !self.pinned_natives.contains(native) {
            if let Some(platform) = &self.platform {
                let mut platform_flavors: IndexSet<DataFlavor> =
                    platform.mappings_for_native(native).into_iter().collect();
                if !platform_flavors.is_empty() {
                    platform_flavors.extend(flavors);
                    flavors = platform_flavors;
                }
            }
        }

        if flavors.is_empty() {
            if let Some(mime_type) = decode_java_mime_type(native) {
                match DataFlavor::with_resolver(mime_type, None, self.resolver()) {
                    Ok(flavor) => {
                        debug!(native, flavor = %flavor, "decoded encoded native");
                        self.store(native, &flavor);
                        flavors.insert(flavor);
                    }
                    Err(err) => warn!(native, "cannot decode encoded native: {}", err),
                }
            }
        }

        flavors
    }

    /// Platform natives followed by explicit ones; invents a native for an
    /// unmapped flavor when `synthesize` is set.
    fn flavor_to_native_lookup(&mut self, flavor: &DataFlavor, synthesize: bool) -> IndexSet<String> {
        let mut natives = self.flavor_to_native.get(flavor).cloned().unwrap_or_default();

        if !self.pinned_flavors.contains(flavor) {
            if let Some(platform) = &self.platform {
                let mut platform_natives: IndexSet<String> =
                    platform.mappings_for_flavor(flavor).into_iter().collect();
                if !platform_natives.is_empty() {
                    platform_natives.extend(natives);
                    natives = platform_natives;
                }
            }
        }

        if natives.is_empty() && synthesize {
            let encoded = encode_data_flavor(flavor);
            debug!(flavor = %flavor, native = %encoded, "synthesized native for flavor");
            self.store(&encoded, flavor);
            natives.insert(encoded);
        }

        natives
    }

    fn natives_for_flavor(&mut self, flavor: &DataFlavor) -> Vec<String> {
        if let Some(natives) = self.natives_cache.check(flavor) {
            trace!(flavor = %flavor, "natives cache hit");
            return natives;
        }

        let natives = if self.pinned_flavors.contains(flavor) {
            self.flavor_to_native_lookup(flavor, false)
        } else if flavor.is_flavor_charset_text_type() {
            let mut natives = IndexSet::new();
            if flavor.primary_type() == "text" {
                if let Some(configured) = self.text_type_to_native.get(&flavor.mime().base_type()) {
                    natives.extend(configured.iter().cloned());
                }
            }
            if let Some(configured) = self.text_type_to_native.get(TEXT_PLAIN_BASE_TYPE) {
                natives.extend(configured.iter().cloned());
            }
            // explicitly added natives rank below the configured text natives
            let synthesize = natives.is_empty();
            natives.extend(self.flavor_to_native_lookup(flavor, synthesize));
            natives
        } else if flavor.is_flavor_noncharset_text_type() {
            let mut natives = self
                .text_type_to_native
                .get(&flavor.mime().base_type())
                .cloned()
                .unwrap_or_default();
            let synthesize = natives.is_empty();
            natives.extend(self.flavor_to_native_lookup(flavor, synthesize));
            natives
        } else {
            self.flavor_to_native_lookup(flavor, true)
        };

        let natives: Vec<String> = natives.into_iter().collect();
        self.natives_cache.put(flavor.clone(), natives.clone());
        natives
    }

    fn all_natives(&self) -> Vec<String> {
        self.native_to_flavor.keys().cloned().collect()
    }

    fn flavors_for_native(&mut self, native: &str) -> Vec<DataFlavor> {
        if let Some(flavors) = self.flavors_cache.check(native) {
            trace!(native, "flavors cache hit");
            return flavors;
        }

        let found = self.native_to_flavor_lookup(native);
        if self.pinned_natives.contains(native) {
            return found.into_iter().collect();
        }

        let mut flavors = IndexSet::new();
        for flavor in found {
            let expanded = (flavor.primary_type() == "text").then(|| text_flavors_for(flavor.mime()));
            flavors.insert(flavor);
            flavors.extend(expanded.into_iter().flatten());
        }

        let flavors: Vec<DataFlavor> = flavors.into_iter().collect();
        self.flavors_cache.put(native.to_string(), flavors.clone());
        flavors
    }

    fn all_flavors(&mut self) -> Vec<DataFlavor> {
        let mut flavors = IndexSet::new();
        for native in self.all_natives() {
            flavors.extend(self.flavors_for_native(&native));
        }
        flavors.into_iter().collect()
    }
}
