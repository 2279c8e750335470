//! Utility functions for XMP processing

pub mod base64;
