//! Data flavor negotiation for clipboard and drag-and-drop transfers.
//!
//! This crate provides:
//! - MIME type and parameter list parsing and formatting (RFC 2045 tokens)
//! - Data flavors: a MIME type plus the representation the data is
//!   delivered as, with the standard text, image and file list flavors
//! - Ordering of text flavors by fidelity, to pick the best one on offer
//! - A thread-safe flavor map between platform format names ("natives")
//!   and flavors, configured from a properties resource and extensible at
//!   runtime
//!
//! Configuration files are read with tokio; everything else is
//! synchronous.
//!
//! # Examples
//!
//! ```
//! use flavor_map::{select_best_text_flavor, FlavorMap};
//!
//! let map = FlavorMap::builder().build();
//! let flavors = map.flavors_for_native("HTML Format");
//! let best = select_best_text_flavor(&flavors).unwrap();
//! assert_eq!(best.sub_type(), "html");
//! ```

pub mod charset;
pub mod comparator;
pub mod error;
pub mod flavor;
pub mod grammar;
pub mod map;
pub mod mime_type;
pub mod parameter_list;
pub mod platform;
pub mod representation;

// Re-export commonly used types
pub use comparator::{compare_text_flavors, select_best_text_flavor};
pub use error::{Error, ParseError, Result};
pub use flavor::{
    all_html_flavor, fragment_html_flavor, image_flavor, java_file_list_flavor, plain_text_flavor,
    selection_html_flavor, string_flavor, DataFlavor,
};
pub use map::{FlavorMap, FlavorMapBuilder};
pub use mime_type::MimeType;
pub use parameter_list::ParameterList;
pub use platform::{PlatformMappings, StaticPlatformMappings, TextNativeProperties};
pub use representation::{RepresentationClass, StandardTypes, TypeKind, TypeResolver};
