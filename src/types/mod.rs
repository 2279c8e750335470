//! XMP value types
//!
//! This module defines the value types produced by the parser.

pub mod value;

pub use value::{ShapeTag, XmpValue};
