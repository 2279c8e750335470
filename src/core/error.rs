//! Error types for XMP parsing
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Error types for XMP operations
#[derive(Debug, Error)]
pub enum XmpError {
    /// No `<?xpacket begin=...?>` marker was found
    #[error("No XMP packet found")]
    NoXPacket,

    /// Generic grammar violation (malformed markers, illegal nesting, bad XML)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A top-level `rdf:Description` has no `rdf:about` attribute
    #[error("Required attribute rdf:about missing in <{0}>")]
    MissingAbout(String),

    /// Unknown element, only reported when unknown elements are forbidden
    #[error("Unknown element <{0}>")]
    UnknownElement(String),

    /// Unknown attribute, only reported when unknown attributes are forbidden
    #[error("Unknown attribute \"{attribute}\"=\"{value}\" in element <{element}>")]
    UnknownAttribute {
        /// Element carrying the attribute
        element: String,
        /// Attribute name
        attribute: String,
        /// Attribute value
        value: String,
    },

    /// A specific element was required but another one was found
    #[error("Expected element <{expected}>, found <{found}> instead")]
    UnexpectedElement {
        /// Element the grammar requires here
        expected: String,
        /// Element actually found
        found: String,
    },

    /// Non-whitespace text where only elements are allowed
    #[error("The current element (<{0}>) cannot contain text")]
    InvalidContent(String),

    /// Comment or processing instruction where none is permitted
    #[error("XMP cannot contain XML comments or processing instructions")]
    InvalidComment,

    /// Invalid symbol in base64 data
    #[error("Invalid base64 byte 0x{byte:02x} at offset {offset}")]
    InvalidBase64 {
        /// Offset of the offending byte in the input
        offset: usize,
        /// The offending byte
        byte: u8,
    },

    /// Error reported by a handler callback
    #[error("Handler error: {0}")]
    Handler(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for XMP operations
pub type XmpResult<T> = Result<T, XmpError>;
