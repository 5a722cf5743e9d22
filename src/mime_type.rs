//! MIME types as used to describe data flavors.
//!
//! A [`MimeType`] is a lowercase `primary/sub` pair plus a
//! [`ParameterList`]. Parsing is strict: both halves of the base type must be
//! RFC 2045 tokens and the parameter list must be well formed.

use crate::error::ParseError;
use crate::grammar::is_token;
use crate::parameter_list::ParameterList;
use std::fmt;
use std::str::FromStr;

/// A parsed MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
    primary_type: String,
    sub_type: String,
    parameters: ParameterList,
}

impl MimeType {
    /// Parses a MIME type such as `text/plain; charset=UTF-8`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flavor_map::MimeType;
    ///
    /// let mime = MimeType::parse("Text/HTML; Document=selection").unwrap();
    /// assert_eq!(mime.base_type(), "text/html");
    /// assert_eq!(mime.parameter("document"), Some("selection"));
    /// assert!(MimeType::parse("text").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let slash = raw.find('/');
        let semicolon = raw.find(';');

        let (primary, sub, parameters) = match (slash, semicolon) {
            (None, _) => return Err(ParseError::MissingSubType),
            (Some(s), None) => (&raw[..s], &raw[s + 1..], ParameterList::new()),
            (Some(s), Some(p)) if s < p => (
                &raw[..s],
                &raw[s + 1..p],
                ParameterList::parse(&raw[p..])?,
            ),
            (Some(_), Some(_)) => return Err(ParseError::MissingSubType),
        };

        Self::from_parts(primary, sub, parameters)
    }

    /// Builds a MIME type with no parameters.
    pub fn new(primary_type: &str, sub_type: &str) -> Result<Self, ParseError> {
        Self::from_parts(primary_type, sub_type, ParameterList::new())
    }

    /// Builds a MIME type from its base type halves and a parameter list.
    pub fn with_parameters(
        primary_type: &str,
        sub_type: &str,
        parameters: ParameterList,
    ) -> Result<Self, ParseError> {
        Self::from_parts(primary_type, sub_type, parameters)
    }

    /// Builds a MIME type from halves known to be lowercase tokens.
    pub(crate) fn from_static(primary_type: &'static str, sub_type: &'static str) -> Self {
        Self {
            primary_type: primary_type.to_string(),
            sub_type: sub_type.to_string(),
            parameters: ParameterList::new(),
        }
    }

    fn from_parts(
        primary_type: &str,
        sub_type: &str,
        parameters: ParameterList,
    ) -> Result<Self, ParseError> {
        let primary_type = primary_type.trim().to_lowercase();
        let sub_type = sub_type.trim().to_lowercase();
        if !is_token(&primary_type) {
            return Err(ParseError::InvalidPrimaryType(primary_type));
        }
        if !is_token(&sub_type) {
            return Err(ParseError::InvalidSubType(sub_type));
        }
        Ok(Self {
            primary_type,
            sub_type,
            parameters,
        })
    }

    /// Returns the primary type, e.g. `text`.
    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    /// Returns the sub type, e.g. `plain`.
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// Returns `primary/sub` without parameters.
    pub fn base_type(&self) -> String {
        format!("{}/{}", self.primary_type, self.sub_type)
    }

    /// Returns a copy without parameters.
    pub(crate) fn without_parameters(&self) -> MimeType {
        Self {
            primary_type: self.primary_type.clone(),
            sub_type: self.sub_type.clone(),
            parameters: ParameterList::new(),
        }
    }

    /// Returns the parameter list.
    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    /// Returns the value of the named parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set_parameter(&mut self, name: &str, value: &str) {
        self.parameters.set(name, value);
    }

    /// Removes a parameter, returning its previous value.
    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        self.parameters.remove(name)
    }

    /// Reports whether the base types match.
    ///
    /// Primary types must be equal. Sub types must be equal unless either of
    /// them is the `*` wildcard. Parameters are ignored.
    pub fn matches(&self, other: &MimeType) -> bool {
        self.primary_type == other.primary_type
            && (self.sub_type == "*" || other.sub_type == "*" || self.sub_type == other.sub_type)
    }

    /// Parses `other` and reports whether it [`matches`](Self::matches).
    pub fn matches_str(&self, other: &str) -> Result<bool, ParseError> {
        Ok(self.matches(&MimeType::parse(other)?))
    }
}

impl FromStr for MimeType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.primary_type, self.sub_type, self.parameters)
    }
}
