//! XMP XML/RDF serializer
//!
//! This module writes an [`XmpModel`] back as an XMP Packet. Every schema
//! becomes one `rdf:Description`, and every property is written in the
//! element form matching the shape of its value, so that parsing the output
//! gives back the same model.

use crate::core::error::{XmpError, XmpResult};
use crate::core::model::{XmpModel, XmpSchema};
use crate::core::namespace::ns;
use crate::types::value::XmpValue;
use crate::utils::base64;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Column at which thumbnail base64 text is wrapped
pub const BASE64_LINE_WIDTH: usize = 76;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serializer for XMP Packets
#[derive(Debug, Clone, Copy, Default)]
pub struct XmpSerializer;

impl XmpSerializer {
    /// Create a new XMP serializer
    pub fn new() -> Self {
        Self
    }

    /// Serialize a model to RDF/XML (the `x:xmpmeta` element)
    pub fn serialize_rdf(&self, model: &XmpModel) -> XmpResult<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 1);

        let mut meta = BytesStart::new("x:xmpmeta");
        meta.push_attribute(("xmlns:x", ns::X));
        writer.write_event(Event::Start(meta))?;

        let mut rdf = BytesStart::new("rdf:RDF");
        rdf.push_attribute(("xmlns:rdf", ns::RDF));
        writer.write_event(Event::Start(rdf))?;

        for schema in model.schemas() {
            self.serialize_schema(&mut writer, schema)?;
        }

        writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
        writer.write_event(Event::End(BytesEnd::new("x:xmpmeta")))?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result)
            .map_err(|e| XmpError::SerializationError(format!("UTF-8 encoding error: {}", e)))
    }

    /// Serialize to XMP Packet format
    pub fn serialize_packet(&self, model: &XmpModel) -> XmpResult<String> {
        let rdf_content = self.serialize_rdf(model)?;

        let packet = format!(
            "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n{}\n<?xpacket end=\"w\"?>",
            rdf_content
        );

        Ok(packet)
    }

    fn serialize_schema(&self, writer: &mut XmlWriter, schema: &XmpSchema) -> XmpResult<()> {
        let prefix = schema.prefix();
        if prefix.is_empty() || prefix.contains(':') {
            return Err(XmpError::SerializationError(format!(
                "Invalid prefix \"{}\" for namespace {}",
                prefix,
                schema.uri()
            )));
        }

        let mut desc = BytesStart::new("rdf:Description");
        desc.push_attribute(("rdf:about", ""));
        desc.push_attribute((format!("xmlns:{}", prefix).as_str(), schema.uri()));

        if schema.properties().is_empty() {
            writer.write_event(Event::Empty(desc))?;
            return Ok(());
        }

        writer.write_event(Event::Start(desc))?;
        for property in schema.properties() {
            let name = format!("{}:{}", prefix, property.name);
            self.serialize_property(writer, &name, &property.value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
        Ok(())
    }

    fn serialize_property(&self, writer: &mut XmlWriter, name: &str, value: &XmpValue) -> XmpResult<()> {
        match value {
            XmpValue::Text(text) => {
                write_text_element(writer, BytesStart::new(name), text)?;
            }
            XmpValue::Resource(uri) => {
                let mut elem = BytesStart::new(name);
                elem.push_attribute(("rdf:resource", uri.as_str()));
                writer.write_event(Event::Empty(elem))?;
            }
            XmpValue::OrderedList(items) | XmpValue::UnorderedList(items) => {
                let container = if matches!(value, XmpValue::OrderedList(_)) {
                    "rdf:Seq"
                } else {
                    "rdf:Bag"
                };
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Start(BytesStart::new(container)))?;
                for item in items {
                    write_text_element(writer, BytesStart::new("rdf:li"), item)?;
                }
                writer.write_event(Event::End(BytesEnd::new(container)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            XmpValue::LangAlt(items) => {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Start(BytesStart::new("rdf:Alt")))?;
                for (lang, text) in items {
                    let mut li = BytesStart::new("rdf:li");
                    li.push_attribute(("xml:lang", lang.as_str()));
                    write_text_element(writer, li, text)?;
                }
                writer.write_event(Event::End(BytesEnd::new("rdf:Alt")))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            XmpValue::Structure {
                prefix,
                uri,
                fields,
            } => {
                let mut elem = BytesStart::new(name);
                elem.push_attribute(("rdf:parseType", "Resource"));
                if fields.is_empty() {
                    writer.write_event(Event::Empty(elem))?;
                    return Ok(());
                }
                if prefix.is_empty() {
                    return Err(XmpError::SerializationError(format!(
                        "Structure {} has fields but no namespace",
                        name
                    )));
                }
                elem.push_attribute((format!("xmlns:{}", prefix).as_str(), uri.as_str()));
                writer.write_event(Event::Start(elem))?;
                for (field, text) in fields {
                    let field_name = format!("{}:{}", prefix, field);
                    write_text_element(writer, BytesStart::new(&field_name), text)?;
                }
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            XmpValue::Thumbnails(images) => {
                let mut elem = BytesStart::new(name);
                elem.push_attribute((
                    format!("xmlns:{}", ns::XMP_IMAGE_PREFIX).as_str(),
                    ns::XMP_IMAGE,
                ));
                writer.write_event(Event::Start(elem))?;
                writer.write_event(Event::Start(BytesStart::new("rdf:Alt")))?;
                let image_name = format!("{}:image", ns::XMP_IMAGE_PREFIX);
                if images.is_empty() {
                    // a resource item without image keeps the list a thumbnail list
                    let mut li = BytesStart::new("rdf:li");
                    li.push_attribute(("rdf:parseType", "Resource"));
                    writer.write_event(Event::Empty(li))?;
                }
                for image in images {
                    let mut li = BytesStart::new("rdf:li");
                    li.push_attribute(("rdf:parseType", "Resource"));
                    writer.write_event(Event::Start(li))?;
                    let encoded = base64::encode(image, BASE64_LINE_WIDTH);
                    write_text_element(writer, BytesStart::new(&image_name), &encoded)?;
                    writer.write_event(Event::End(BytesEnd::new("rdf:li")))?;
                }
                writer.write_event(Event::End(BytesEnd::new("rdf:Alt")))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
        Ok(())
    }
}

/// Write `<name>text</name>`, or an empty element for empty text
///
/// The parser drops text that is only whitespace, so such a value reads back
/// as empty text.
fn write_text_element(writer: &mut XmlWriter, start: BytesStart<'_>, text: &str) -> XmpResult<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}
