//! XMP value types
//!
//! This module defines the values produced for completed XMP properties.
//! The parser only tracks the *shape* of a value; what a text value means
//! (integer, date, ...) is decided by the schema table in the model.

use std::fmt;

/// Structural category of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ShapeTag {
    /// Scalar text
    Text,
    /// Scalar reference (`rdf:resource`)
    Resource,
    /// Ordered list (`rdf:Seq`)
    OrderedList,
    /// Unordered list (`rdf:Bag`)
    UnorderedList,
    /// Language alternative (`rdf:Alt` with `xml:lang` items)
    LangAlt,
    /// Nested structure (`rdf:parseType="Resource"`)
    Structure,
    /// Alternative of embedded thumbnails
    ThumbnailAlt,
}

impl ShapeTag {
    /// Get the RDF container name for list shapes
    pub fn rdf_container(&self) -> Option<&'static str> {
        match self {
            ShapeTag::OrderedList => Some("Seq"),
            ShapeTag::UnorderedList => Some("Bag"),
            ShapeTag::LangAlt | ShapeTag::ThumbnailAlt => Some("Alt"),
            _ => None,
        }
    }
}

/// Value of a completed XMP property
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum XmpValue {
    /// Text value
    Text(String),
    /// URI reference
    Resource(String),
    /// Items of an `rdf:Seq`
    OrderedList(Vec<String>),
    /// Items of an `rdf:Bag`
    UnorderedList(Vec<String>),
    /// `(language, text)` pairs of an `rdf:Alt`
    LangAlt(Vec<(String, String)>),
    /// Structure whose fields live in the namespace `uri` (bound to `prefix`)
    Structure {
        /// Prefix of the structure's namespace
        prefix: String,
        /// URI of the structure's namespace
        uri: String,
        /// `(local name, value)` pairs in document order
        fields: Vec<(String, String)>,
    },
    /// Decoded thumbnail images
    Thumbnails(Vec<Vec<u8>>),
}

impl XmpValue {
    /// Get the shape of this value
    pub fn shape(&self) -> ShapeTag {
        match self {
            XmpValue::Text(_) => ShapeTag::Text,
            XmpValue::Resource(_) => ShapeTag::Resource,
            XmpValue::OrderedList(_) => ShapeTag::OrderedList,
            XmpValue::UnorderedList(_) => ShapeTag::UnorderedList,
            XmpValue::LangAlt(_) => ShapeTag::LangAlt,
            XmpValue::Structure { .. } => ShapeTag::Structure,
            XmpValue::Thumbnails(_) => ShapeTag::ThumbnailAlt,
        }
    }

    /// Get the value as a string, if it is a scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmpValue::Text(s) | XmpValue::Resource(s) => Some(s),
            _ => None,
        }
    }

    /// Get the items, if the value is an ordered or unordered list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            XmpValue::OrderedList(items) | XmpValue::UnorderedList(items) => Some(items),
            _ => None,
        }
    }

    /// Get the text for a language, if the value is a language alternative
    ///
    /// Falls back to `x-default` when the requested language is missing.
    pub fn lang(&self, lang: &str) -> Option<&str> {
        let XmpValue::LangAlt(items) = self else {
            return None;
        };
        items
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(lang))
            .or_else(|| items.iter().find(|(l, _)| l == "x-default"))
            .map(|(_, text)| text.as_str())
    }

    /// Get a structure field by local name
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            XmpValue::Structure { fields, .. } => fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for XmpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmpValue::Text(s) | XmpValue::Resource(s) => write!(f, "{}", s),
            XmpValue::OrderedList(items) | XmpValue::UnorderedList(items) => {
                write!(f, "{}", items.join("; "))
            }
            XmpValue::LangAlt(_) => match self.lang("x-default") {
                Some(text) => write!(f, "{}", text),
                None => write!(f, "[LangAlt]"),
            },
            XmpValue::Structure { .. } => write!(f, "[Structure]"),
            XmpValue::Thumbnails(images) => write!(f, "[{} thumbnail(s)]", images.len()),
        }
    }
}

impl From<String> for XmpValue {
    fn from(s: String) -> Self {
        XmpValue::Text(s)
    }
}

impl From<&str> for XmpValue {
    fn from(s: &str) -> Self {
        XmpValue::Text(s.to_string())
    }
}
