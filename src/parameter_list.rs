//! MIME type parameter lists.
//!
//! Parses and serializes the `; name=value` run that follows the base type
//! of a MIME type. Names are case-insensitive and stored lowercase; values
//! keep their case.

use crate::error::ParseError;
use crate::grammar::{is_token_char, quote, unquote};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ordered set of MIME type parameters.
///
/// Insertion order is kept for serialization; equality ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    parameters: IndexMap<String, String>,
}

impl ParameterList {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a parameter list such as `; charset=utf-8; class="[B"`.
    ///
    /// Leading and trailing whitespace is ignored. An empty or blank input
    /// yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use flavor_map::ParameterList;
    ///
    /// let params = ParameterList::parse("; Charset=UTF-8; class=\"[C\"").unwrap();
    /// assert_eq!(params.get("charset"), Some("UTF-8"));
    /// assert_eq!(params.get("class"), Some("[C"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let chars: Vec<char> = raw.chars().collect();
        let len = chars.len();
        let mut list = Self::new();

        let mut i = skip_whitespace(&chars, 0);
        while i < len && chars[i] == ';' {
            i = skip_whitespace(&chars, i + 1);

            let name_start = i;
            while i < len && is_token_char(chars[i]) {
                i += 1;
            }
            if i == name_start {
                return Err(ParseError::MissingParameterName(name_start));
            }
            let name: String = chars[name_start..i].iter().collect::<String>().to_lowercase();

            i = skip_whitespace(&chars, i);
            if i >= len || chars[i] != '=' {
                return Err(ParseError::MissingEquals(name));
            }
            i = skip_whitespace(&chars, i + 1);
            if i >= len {
                return Err(ParseError::MissingValue(name));
            }

            let value = if chars[i] == '"' {
                i += 1;
                let body_start = i;
                while i < len && chars[i] != '"' {
                    // an escape consumes the character after it
                    i += if chars[i] == '\\' { 2 } else { 1 };
                }
                if i >= len {
                    return Err(ParseError::UnterminatedQuote);
                }
                let body: String = chars[body_start..i].iter().collect();
                i += 1;
                unquote(&body)
            } else if is_token_char(chars[i]) {
                let value_start = i;
                while i < len && is_token_char(chars[i]) {
                    i += 1;
                }
                chars[value_start..i].iter().collect()
            } else {
                return Err(ParseError::UnexpectedCharacter { index: i, ch: chars[i] });
            };

            list.parameters.insert(name, value);
            i = skip_whitespace(&chars, i);
        }

        if i < len {
            return Err(ParseError::TrailingCharacters(i));
        }
        Ok(list)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns the value of the named parameter. The lookup is
    /// case-insensitive on the name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&normalize_name(name))
            .map(String::as_str)
    }

    /// Sets a parameter, replacing any existing value in place.
    ///
    /// The name is trimmed and lowercased, the value is trimmed.
    pub fn set(&mut self, name: &str, value: &str) {
        self.parameters
            .insert(normalize_name(name), value.trim().to_string());
    }

    /// Removes the named parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.parameters.shift_remove(&normalize_name(name))
    }

    /// Iterates over parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Hash for ParameterList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order-independent, like equality
        let mut pairs: Vec<_> = self.parameters.iter().collect();
        pairs.sort();
        pairs.hash(state);
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.parameters {
            write!(f, "; {}={}", name, quote(value))?;
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}
