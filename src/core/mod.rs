//! XMP Core module
//!
//! This module contains the core functionality for XMP packet processing:
//! the XML event layer, the parse state machine, the handler interface, and
//! the model and serializer built on top of them.

pub mod accumulator;
pub mod error;
pub mod handler;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod state;
pub mod tokenizer;

pub use error::{XmpError, XmpResult};
pub use handler::{ParseOptions, XmpHandler};
pub use model::{XmpModel, XmpNamespace, XmpProperty, XmpSchema};
pub use namespace::ns;
pub use parser::XmpParseContext;
pub use schema::{lookup_schema, PropertyKind, SchemaInfo};
pub use serializer::XmpSerializer;
pub use state::ParseState;
pub use tokenizer::{XmlEventSink, XmlTokenizer};
