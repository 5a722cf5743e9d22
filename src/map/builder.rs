//! Flavor map construction and static configuration loading.

use super::expansion::text_flavors_for;
use super::properties::parse_properties;
use super::{FlavorMap, FlavorTables};
use crate::error::{Error, Result};
use crate::flavor::{does_subtype_support_charset, DataFlavor};
use crate::mime_type::MimeType;
use crate::platform::{PlatformMappings, TextNativeProperties};
use crate::representation::TypeResolver;
use indexmap::IndexSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// The bundled configuration.
const DEFAULT_PROPERTIES: &str = include_str!("../resources/flavormap.properties");

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Parameters describing native text rather than the flavor.
const TEXT_NATIVE_PARAMETERS: &[&str] = &["charset", "class", "eoln", "terminators"];

/// Builder for [`FlavorMap`].
///
/// The configuration is loaded once, when [`build`](Self::build) is called:
/// the bundled resource first (unless disabled), then every added source in
/// the order it was added.
///
/// # Examples
///
/// ```
/// use flavor_map::{DataFlavor, FlavorMap};
///
/// let map = FlavorMap::builder()
///     .without_defaults()
///     .properties("CUSTOM=application/x-custom;class=java.lang.String")
///     .build();
///
/// let flavor = DataFlavor::new("application/x-custom; class=java.lang.String").unwrap();
/// assert_eq!(map.natives_for_flavor(&flavor), vec!["CUSTOM"]);
/// ```
pub struct FlavorMapBuilder {
    include_defaults: bool,
    sources: Vec<String>,
    platform: Option<Arc<dyn PlatformMappings>>,
    resolver: Option<Arc<dyn TypeResolver>>,
    cache_capacity: usize,
}

impl FlavorMapBuilder {
    /// Creates a builder using the bundled configuration.
    pub fn new() -> Self {
        Self {
            include_defaults: true,
            sources: Vec::new(),
            platform: None,
            resolver: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Skips the bundled configuration.
    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    /// Adds configuration text in the properties format.
    pub fn properties(mut self, text: impl Into<String>) -> Self {
        self.sources.push(text.into());
        self
    }

    /// Reads configuration from a properties file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file cannot be read.
    pub async fn properties_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| Error::ConfigLoad(format!("{}: {}", path.display(), err)))?;
        debug!(path = %path.display(), "read flavor map configuration");
        self.sources.push(text);
        Ok(self)
    }

    /// Sets the platform collaborator.
    pub fn platform(mut self, platform: Arc<dyn PlatformMappings>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the resolver for representation class names. Without one, the
    /// global [`StandardTypes`](crate::StandardTypes) table is used.
    pub fn resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets how many lookup results are memoized per direction. Zero
    /// disables memoization.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builds the map, loading the configuration.
    pub fn build(self) -> FlavorMap {
        let mut tables = FlavorTables::new(self.platform, self.resolver, self.cache_capacity);
        if self.include_defaults {
            tables.load_properties(DEFAULT_PROPERTIES);
        }
        for source in &self.sources {
            tables.load_properties(source);
        }
        debug!(
            natives = tables.native_to_flavor.len(),
            flavors = tables.flavor_to_native.len(),
            "flavor map loaded"
        );
        FlavorMap::from_tables(tables)
    }
}

impl Default for FlavorMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlavorTables {
    fn load_properties(&mut self, text: &str) {
        for entry in parse_properties(text) {
            for value in &entry.values {
                self.load_value(&entry.native, value, entry.line);
            }
        }
    }

    fn load_value(&mut self, native: &str, value: &str, line: usize) {
        let mut mime_type = match MimeType::parse(value) {
            Ok(mime_type) => mime_type,
            Err(err) => {
                warn!(line, native, "skipping malformed MIME type {:?}: {}", value, err);
                return;
            }
        };

        if mime_type.primary_type() == "text" {
            let charset = mime_type.parameter("charset");
            if does_subtype_support_charset(mime_type.sub_type(), charset) {
                let properties = TextNativeProperties {
                    charset: charset.map(str::to_string),
                    eoln: mime_type.parameter("eoln").map(str::to_string),
                    terminators: parse_terminators(mime_type.parameter("terminators"), native, line),
                };
                if !properties.is_empty() {
                    if let Some(platform) = &self.platform {
                        platform.register_text_properties(native, &properties);
                    }
                    self.text_properties.insert(native.to_string(), properties);
                }
            }
            for name in TEXT_NATIVE_PARAMETERS {
                mime_type.remove_parameter(name);
            }
        }

        let flavor = match DataFlavor::with_resolver(&mime_type.to_string(), None, self.resolver()) {
            Ok(flavor) => flavor,
            Err(err) => {
                warn!(line, native, "skipping flavor {:?}: {}", value, err);
                return;
            }
        };

        let mut flavors = IndexSet::new();
        if flavor.primary_type() == "text" {
            flavors.insert(flavor.clone());
            flavors.extend(text_flavors_for(flavor.mime()));
            self.text_type_to_native
                .entry(flavor.mime().base_type())
                .or_default()
                .insert(native.to_string());
        } else {
            flavors.insert(flavor);
        }

        for flavor in &flavors {
            self.store(native, flavor);
        }
    }
}

fn parse_terminators(value: Option<&str>, native: &str, line: usize) -> Option<u32> {
    let value = value?;
    match value.trim().parse() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!(line, native, "ignoring invalid terminators {:?}", value);
            None
        }
    }
}
