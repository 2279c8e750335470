//! Property value accumulator
//!
//! A property's value is assembled piece by piece while its element is open:
//! list items, structure fields and thumbnail text arrive as separate events.
//! The accumulator keeps the partial value and the scope the property name
//! was resolved against, and refuses pieces whose shape conflicts with what
//! has already been collected.

use crate::types::value::{ShapeTag, XmpValue};
use crate::utils::base64;

/// Property being parsed
#[derive(Debug)]
pub struct PropertyAccumulator {
    /// Local part of the property name
    name: String,
    /// Index of the namespace scope the name resolved to
    scope: usize,
    value: Option<XmpValue>,
    /// Base64 text of the thumbnail being read
    image: String,
}

impl PropertyAccumulator {
    pub fn new(name: &str, scope: usize) -> Self {
        Self {
            name: name.to_string(),
            scope,
            value: None,
            image: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> usize {
        self.scope
    }

    /// Shape established so far, if any
    pub fn shape(&self) -> Option<ShapeTag> {
        self.value.as_ref().map(XmpValue::shape)
    }

    /// Add text to a scalar value
    ///
    /// Consecutive text runs are concatenated. Returns false if the property
    /// already holds a non-text value.
    pub fn add_text(&mut self, text: &str) -> bool {
        match &mut self.value {
            None => {
                self.value = Some(XmpValue::Text(text.to_string()));
                true
            }
            Some(XmpValue::Text(current)) => {
                current.push_str(text);
                true
            }
            Some(_) => false,
        }
    }

    /// Make the property a URI reference
    pub fn set_resource(&mut self, uri: &str) -> bool {
        match self.value {
            None => {
                self.value = Some(XmpValue::Resource(uri.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Start a structure in the namespace of its first field
    pub fn start_structure(&mut self, prefix: &str, uri: &str) -> bool {
        match self.value {
            None => {
                self.value = Some(XmpValue::Structure {
                    prefix: prefix.to_string(),
                    uri: uri.to_string(),
                    fields: Vec::new(),
                });
                true
            }
            Some(XmpValue::Structure { .. }) => true,
            _ => false,
        }
    }

    /// Make sure the value is a structure, even if no field was seen
    pub fn finish_structure(&mut self) {
        if self.value.is_none() {
            self.value = Some(XmpValue::Structure {
                prefix: String::new(),
                uri: String::new(),
                fields: Vec::new(),
            });
        }
    }

    /// Give the property an empty container value if it has none yet
    ///
    /// Returns false if the property already holds a value of another shape.
    pub fn ensure_container(&mut self, shape: ShapeTag) -> bool {
        if self.value.is_none() {
            self.value = match shape {
                ShapeTag::OrderedList => Some(XmpValue::OrderedList(Vec::new())),
                ShapeTag::UnorderedList => Some(XmpValue::UnorderedList(Vec::new())),
                ShapeTag::LangAlt => Some(XmpValue::LangAlt(Vec::new())),
                ShapeTag::ThumbnailAlt => Some(XmpValue::Thumbnails(Vec::new())),
                _ => return false,
            };
        }
        self.shape() == Some(shape)
    }

    /// Open a new item slot of the given container shape
    ///
    /// `key` is the language for [`ShapeTag::LangAlt`] and the field name for
    /// [`ShapeTag::Structure`]. Returns false if the property already holds a
    /// value of another shape.
    pub fn open_item(&mut self, shape: ShapeTag, key: Option<&str>) -> bool {
        if self.value.is_none() && !self.ensure_container(shape) {
            return false;
        }

        let key = key.unwrap_or_default().to_string();
        match (&mut self.value, shape) {
            (Some(XmpValue::OrderedList(items)), ShapeTag::OrderedList)
            | (Some(XmpValue::UnorderedList(items)), ShapeTag::UnorderedList) => {
                items.push(String::new());
                true
            }
            (Some(XmpValue::LangAlt(items)), ShapeTag::LangAlt) => {
                items.push((key, String::new()));
                true
            }
            (Some(XmpValue::Structure { fields, .. }), ShapeTag::Structure) => {
                fields.push((key, String::new()));
                true
            }
            _ => false,
        }
    }

    /// Store text in the last open item slot
    ///
    /// An item without text keeps an empty value. Returns false if no slot is
    /// open.
    pub fn update_item(&mut self, text: &str) -> bool {
        let slot = match &mut self.value {
            Some(XmpValue::OrderedList(items)) | Some(XmpValue::UnorderedList(items)) => {
                items.last_mut()
            }
            Some(XmpValue::LangAlt(items)) => items.last_mut().map(|(_, text)| text),
            Some(XmpValue::Structure { fields, .. }) => fields.last_mut().map(|(_, value)| value),
            _ => None,
        };
        match slot {
            Some(slot) => {
                slot.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Collect base64 text of a thumbnail image
    pub fn push_image_text(&mut self, text: &str) {
        self.image.push_str(text);
    }

    /// Decode the collected thumbnail text and add it as a new image
    ///
    /// Every closed image element adds an image: an empty element or text
    /// that fails to decode adds an empty one. Returns false if the property
    /// is not a thumbnail list.
    pub fn finish_image(&mut self) -> bool {
        let text = std::mem::take(&mut self.image);
        if !self.ensure_container(ShapeTag::ThumbnailAlt) {
            return false;
        }
        let Some(XmpValue::Thumbnails(images)) = &mut self.value else {
            return false;
        };
        match base64::decode(text.as_bytes(), false) {
            Ok(bytes) => images.push(bytes),
            Err(e) => {
                log::warn!("Thumbnail of property {} is not valid base64: {}", self.name, e);
                images.push(Vec::new());
            }
        }
        true
    }

    /// Take the collected value; a property without content is empty text
    pub fn into_value(self) -> XmpValue {
        self.value.unwrap_or_else(|| XmpValue::Text(String::new()))
    }
}
