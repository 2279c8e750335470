//! XMP model
//!
//! [`XmpModel`] is a ready-made [`XmpHandler`] that keeps every parsed
//! property, grouped by schema. Schemas are annotated with the matching entry
//! of the well-known schema table when there is one.

use crate::core::error::{XmpError, XmpResult};
use crate::core::handler::{ParseOptions, XmpHandler};
use crate::core::parser::XmpParseContext;
use crate::core::schema::{lookup_schema, PropertyKind, SchemaInfo};
use crate::core::serializer::XmpSerializer;
use crate::types::value::XmpValue;
use std::str::FromStr;

/// A property kept by the model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmpProperty {
    /// Local name of the property
    pub name: String,
    /// Value of the property
    pub value: XmpValue,
}

/// All properties of one namespace
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmpSchema {
    uri: String,
    prefix: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    info: Option<&'static SchemaInfo>,
    properties: Vec<XmpProperty>,
}

impl XmpSchema {
    fn new(uri: &str, prefix: &str) -> Self {
        Self {
            uri: uri.to_string(),
            prefix: prefix.to_string(),
            info: lookup_schema(uri),
            properties: Vec::new(),
        }
    }

    /// Namespace URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Prefix the namespace was first declared with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Entry of the well-known schema table, if any
    pub fn info(&self) -> Option<&'static SchemaInfo> {
        self.info
    }

    /// Human-readable name: the table title, or the prefix for unknown schemas
    pub fn title(&self) -> &str {
        self.info.map_or(self.prefix.as_str(), |info| info.title)
    }

    /// Properties in the order they were first seen
    pub fn properties(&self) -> &[XmpProperty] {
        &self.properties
    }

    /// Get a property value by local name
    pub fn property(&self, name: &str) -> Option<&XmpValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Semantic kind of a property, if the schema is well-known and defines it
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.info.and_then(|info| info.property_kind(name))
    }

    fn set(&mut self, name: &str, value: XmpValue) {
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(property) => {
                log::debug!("Property {}:{} set again, keeping the last value", self.prefix, name);
                property.value = value;
            }
            None => self.properties.push(XmpProperty {
                name: name.to_string(),
                value,
            }),
        }
    }
}

/// Namespace handed back by the parser with each property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmpNamespace {
    pub uri: String,
    pub prefix: String,
}

/// Properties of an XMP packet, grouped by schema
///
/// Repeated declarations of the same namespace URI (for example in several
/// `rdf:Description` elements) merge into one schema. Namespaces without any
/// property are not kept.
///
/// # Example
///
/// ```rust
/// use xmpstream::XmpModel;
///
/// let model: XmpModel = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
/// <x:xmpmeta xmlns:x="adobe:ns:meta/">
///  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
///   <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/"
///     xmp:CreatorTool="My App" xmp:Rating="4"/>
///  </rdf:RDF>
/// </x:xmpmeta>
/// <?xpacket end="w"?>"#
///     .parse()?;
///
/// let xmp = model.schema("http://ns.adobe.com/xap/1.0/").unwrap();
/// assert_eq!(xmp.title(), "XMP Basic");
/// assert_eq!(xmp.property("Rating").and_then(|v| v.as_str()), Some("4"));
/// # Ok::<(), xmpstream::XmpError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmpModel {
    schemas: Vec<XmpSchema>,
}

impl XmpModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete buffer holding an XMP packet
    pub fn parse(bytes: &[u8], options: ParseOptions) -> XmpResult<Self> {
        let mut context = XmpParseContext::new(Self::new(), options);
        context.parse(bytes)?;
        context.end_parse()?;
        Ok(context.into_handler())
    }

    /// Schemas in the order they were first seen
    pub fn schemas(&self) -> &[XmpSchema] {
        &self.schemas
    }

    /// Get a schema by namespace URI
    pub fn schema(&self, uri: &str) -> Option<&XmpSchema> {
        self.schemas.iter().find(|s| s.uri == uri)
    }

    /// Get a property value by namespace URI and local name
    pub fn property(&self, uri: &str, name: &str) -> Option<&XmpValue> {
        self.schema(uri)?.property(name)
    }

    /// Set a property, creating its schema if needed
    ///
    /// `prefix` is only used when the schema does not exist yet.
    pub fn set_property(&mut self, uri: &str, prefix: &str, name: &str, value: XmpValue) {
        let index = match self.schemas.iter().position(|s| s.uri == uri) {
            Some(index) => index,
            None => {
                self.schemas.push(XmpSchema::new(uri, prefix));
                self.schemas.len() - 1
            }
        };
        self.schemas[index].set(name, value);
    }

    /// Number of properties in all schemas
    pub fn len(&self) -> usize {
        self.schemas.iter().map(|s| s.properties.len()).sum()
    }

    /// Check if the model holds no property
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Serialize to XMP Packet format
    pub fn serialize_packet(&self) -> XmpResult<String> {
        XmpSerializer::new().serialize_packet(self)
    }
}

impl XmpHandler for XmpModel {
    type Schema = XmpNamespace;

    fn start_schema(&mut self, uri: &str, prefix: &str) -> XmpResult<XmpNamespace> {
        Ok(XmpNamespace {
            uri: uri.to_string(),
            prefix: prefix.to_string(),
        })
    }

    fn set_property(&mut self, schema: &XmpNamespace, name: &str, value: XmpValue) -> XmpResult<()> {
        XmpModel::set_property(self, &schema.uri, &schema.prefix, name, value);
        Ok(())
    }

    fn error(&mut self, error: &XmpError) {
        log::debug!("XMP model discarded after error: {}", error);
    }
}

impl FromStr for XmpModel {
    type Err = XmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes(), ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::namespace::ns;
    use pretty_assertions::assert_eq;

    const PACKET: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:format>image/jpeg</dc:format>
   <dc:subject><rdf:Bag><rdf:li>sky</rdf:li><rdf:li>sea</rdf:li></rdf:Bag></dc:subject>
  </rdf:Description>
  <rdf:Description rdf:about="" xmlns:ex="http://example.com/ns/">
   <ex:Custom>1</ex:Custom>
  </rdf:Description>
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:source>camera</dc:source>
   <dc:format>image/png</dc:format>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

    #[test]
    fn test_parse_groups_by_schema() {
        let model: XmpModel = PACKET.parse().unwrap();

        let uris: Vec<_> = model.schemas().iter().map(|s| s.uri()).collect();
        assert_eq!(uris, vec![ns::DC, "http://example.com/ns/"]);
        assert_eq!(model.len(), 4);

        let dc = model.schema(ns::DC).unwrap();
        let names: Vec<_> = dc.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["format", "subject", "source"]);
        assert_eq!(dc.property("format").and_then(|v| v.as_str()), Some("image/png"));
        assert_eq!(
            model.property(ns::DC, "subject").and_then(|v| v.as_list()),
            Some(&["sky".to_string(), "sea".to_string()][..])
        );
    }

    #[test]
    fn test_schema_annotations() {
        let model: XmpModel = PACKET.parse().unwrap();

        let dc = model.schema(ns::DC).unwrap();
        assert_eq!(dc.title(), "Dublin Core");
        assert_eq!(dc.property_kind("subject"), Some(PropertyKind::TextBag));

        let custom = model.schema("http://example.com/ns/").unwrap();
        assert!(custom.info().is_none());
        assert_eq!(custom.title(), "ex");
        assert_eq!(custom.property_kind("Custom"), None);
    }

    #[test]
    fn test_parse_error_is_returned() {
        let truncated = &PACKET[..PACKET.len() / 2];
        assert!(truncated.parse::<XmpModel>().is_err());
        assert!(matches!(
            XmpModel::parse(b"", ParseOptions::default()),
            Err(XmpError::NoXPacket)
        ));
    }

    #[test]
    fn test_set_property() {
        let mut model = XmpModel::new();
        assert!(model.is_empty());
        model.set_property(ns::XMP, "xmp", "Rating", "3".into());
        model.set_property(ns::XMP, "other", "Rating", "5".into());

        assert_eq!(model.len(), 1);
        assert_eq!(model.schemas()[0].prefix(), "xmp");
        assert_eq!(model.property(ns::XMP, "Rating"), Some(&XmpValue::from("5")));
    }
}
