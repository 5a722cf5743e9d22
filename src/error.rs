//! Error types for the flavor-map crate.

use thiserror::Error;

/// The main error type for the flavor-map crate.
///
/// Lookups on a [`FlavorMap`](crate::FlavorMap) never produce one of these;
/// absence is reported with empty results. Errors come from constructing
/// MIME types and flavors, from loading configuration files, and from
/// precondition checks on the explicit mapping setters.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed MIME type or parameter syntax
    #[error("MIME type parse error: {0}")]
    Parse(#[from] ParseError),

    /// A representation class name that the type resolver does not know
    #[error("cannot resolve representation class: {0}")]
    UnresolvedType(String),

    /// The flavor is not usable for the requested operation
    #[error("unsupported flavor: {0}")]
    UnsupportedFlavor(String),

    /// Invalid argument passed to a mapping operation or flavor constructor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Flavor map configuration could not be loaded
    #[error("flavor map configuration error: {0}")]
    ConfigLoad(String),
}

/// Specialized Result type for flavor-map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error produced by the MIME type and parameter list parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `/` separating primary type and sub type, or a `;` before it.
    #[error("unable to find a sub type")]
    MissingSubType,

    /// The primary type is not an RFC 2045 token.
    #[error("primary type is invalid: {0:?}")]
    InvalidPrimaryType(String),

    /// The sub type is not an RFC 2045 token.
    #[error("sub type is invalid: {0:?}")]
    InvalidSubType(String),

    /// A `;` not followed by a parameter name.
    #[error("couldn't find parameter name at index {0}")]
    MissingParameterName(usize),

    /// A parameter name not followed by `=`.
    #[error("couldn't find the '=' that separates parameter {0:?} from its value")]
    MissingEquals(String),

    /// A parameter name and `=` with nothing after them.
    #[error("couldn't find a value for parameter named {0:?}")]
    MissingValue(String),

    /// A quoted value without its closing quote.
    #[error("encountered unterminated quoted parameter value")]
    UnterminatedQuote,

    /// A parameter value starting with a character that is neither a quote
    /// nor a token character.
    #[error("unexpected character {ch:?} encountered at index {index}")]
    UnexpectedCharacter { index: usize, ch: char },

    /// Input left over after the last parameter.
    #[error("more characters encountered in input than expected at index {0}")]
    TrailingCharacters(usize),
}
