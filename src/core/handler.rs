//! Handler trait and options for XMP parsing
//!
//! The parser does not build any tree itself. Instead it reports schemas and
//! completed properties to an [`XmpHandler`], which decides what to keep.

use crate::core::error::{XmpError, XmpResult};
use crate::types::value::XmpValue;

/// Options for XMP parsing.
///
/// Use the builder pattern to configure options. The default is the most
/// tolerant setting: unknown elements and attributes are skipped, comments
/// are ignored and `rdf:about` is optional.
///
/// # Example
///
/// ```rust
/// use xmpstream::{ParseOptions, XmpModel};
///
/// let packet = "junk<?xpacket begin='' id='W5M0MpCehiHzreSzNTczkc9d'?>\
///     <x:xmpmeta xmlns:x='adobe:ns:meta/'>\
///     <rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'/>\
///     </x:xmpmeta><?xpacket end='r'?>junk";
/// let model = XmpModel::parse(packet.as_bytes(), ParseOptions::default().find_xpacket())?;
/// assert!(model.schemas().is_empty());
/// # Ok::<(), xmpstream::XmpError>(())
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip leading bytes until `<?xpacket begin=` (and trailing bytes after the packet)
    pub find_xpacket: bool,
    /// Reject XML comments inside the packet
    pub no_comments: bool,
    /// Reject unknown elements instead of skipping them
    pub no_unknown_elements: bool,
    /// Reject unknown attributes instead of ignoring them
    pub no_unknown_attributes: bool,
    /// Require `rdf:about` on top-level `rdf:Description` elements
    pub no_missing_about: bool,
}

impl ParseOptions {
    /// Search for the packet marker inside arbitrary data.
    pub fn find_xpacket(mut self) -> Self {
        self.find_xpacket = true;
        self
    }

    /// Treat XML comments as errors.
    pub fn no_comments(mut self) -> Self {
        self.no_comments = true;
        self
    }

    /// Treat unknown elements as errors.
    pub fn no_unknown_elements(mut self) -> Self {
        self.no_unknown_elements = true;
        self
    }

    /// Treat unknown attributes as errors.
    pub fn no_unknown_attributes(mut self) -> Self {
        self.no_unknown_attributes = true;
        self
    }

    /// Require `rdf:about` on every top-level description.
    pub fn no_missing_about(mut self) -> Self {
        self.no_missing_about = true;
        self
    }

    /// Enable every check: no comments, no unknown content, no missing `rdf:about`.
    pub fn strict(self) -> Self {
        self.no_comments()
            .no_unknown_elements()
            .no_unknown_attributes()
            .no_missing_about()
    }
}

/// Receiver of schema and property events
///
/// `start_schema` is called once for every namespace scope opened in the
/// packet (except the RDF and `x:xmpmeta` namespaces, which the parser
/// consumes itself). The returned value is handed back with every property
/// of that scope and finally moved into `end_schema` when the scope closes.
///
/// Returning an error from any callback aborts the parse.
pub trait XmpHandler {
    /// Per-scope data returned by `start_schema`
    type Schema;

    /// A namespace scope has been opened
    fn start_schema(&mut self, uri: &str, prefix: &str) -> XmpResult<Self::Schema>;

    /// A namespace scope has been closed
    fn end_schema(&mut self, schema: Self::Schema) -> XmpResult<()> {
        let _ = schema;
        Ok(())
    }

    /// A property has been completed; the value is moved to the handler
    fn set_property(&mut self, schema: &Self::Schema, name: &str, value: XmpValue)
        -> XmpResult<()>;

    /// The parse failed; called at most once, before the context becomes unusable
    fn error(&mut self, error: &XmpError) {
        let _ = error;
    }
}
