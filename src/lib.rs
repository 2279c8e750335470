//! # xmpstream
//!
//! A streaming parser for XMP metadata packets.
//!
//! XMP packets are a restricted form of RDF/XML embedded in image and
//! document files. This crate parses them with a small state machine that
//! accepts input in arbitrary chunks and reports every namespace scope and
//! completed property to an [`XmpHandler`] as soon as it is known.
//!
//! ## Features
//!
//! - **Streaming**: feed any number of chunks, nothing but the current
//!   property is buffered
//! - **Tolerant or strict**: unknown elements, unknown attributes, comments
//!   and missing `rdf:about` are accepted or rejected per [`ParseOptions`]
//! - **Packet scanning**: locate `<?xpacket begin=` inside arbitrary data
//! - **Thumbnails**: embedded base64 images are decoded
//! - **Model and serializer**: [`XmpModel`] collects properties by schema and
//!   writes them back as a packet
//!
//! ## Example
//!
//! ```rust
//! use xmpstream::{ns, ParseOptions, XmpModel};
//!
//! let packet = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
//! <x:xmpmeta xmlns:x="adobe:ns:meta/">
//!  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!   <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
//!    <dc:subject><rdf:Bag><rdf:li>sky</rdf:li><rdf:li>sea</rdf:li></rdf:Bag></dc:subject>
//!   </rdf:Description>
//!  </rdf:RDF>
//! </x:xmpmeta>
//! <?xpacket end="w"?>"#;
//!
//! let model = XmpModel::parse(packet.as_bytes(), ParseOptions::default().strict())?;
//! let subject = model.property(ns::DC, "subject").and_then(|v| v.as_list());
//! assert_eq!(subject, Some(&["sky".to_string(), "sea".to_string()][..]));
//! # Ok::<(), xmpstream::XmpError>(())
//! ```

pub mod core;
pub mod types;
pub mod utils;

pub use crate::core::{
    lookup_schema, ns, ParseOptions, ParseState, PropertyKind, SchemaInfo, XmlEventSink,
    XmpError, XmpHandler, XmpModel, XmpNamespace, XmpParseContext, XmpProperty, XmpResult,
    XmpSchema, XmpSerializer,
};
pub use crate::types::{ShapeTag, XmpValue};
pub use crate::utils::base64;
