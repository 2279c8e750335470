//! Streaming XMP parser
//!
//! [`XmpParseContext`] consumes an XMP packet in arbitrary chunks and reports
//! schemas and completed properties to an [`XmpHandler`] as soon as they are
//! known. Nothing but the property currently being parsed is kept in memory.

use crate::core::accumulator::PropertyAccumulator;
use crate::core::error::{XmpError, XmpResult};
use crate::core::handler::{ParseOptions, XmpHandler};
use crate::core::namespace::{matches_with_prefix, ns, split_qname, NamespaceStack};
use crate::core::state::{FrameStack, ParseState};
use crate::core::tokenizer::{XmlEventSink, XmlTokenizer};
use crate::types::value::ShapeTag;

const XPACKET_BEGIN: &[u8] = b"<?xpacket begin=";
const XPACKET_END: &str = "<?xpacket end=";

fn is_whitespace(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

fn is_namespace_declaration(attribute: &str) -> bool {
    attribute == "xmlns" || attribute.starts_with("xmlns:")
}

fn unexpected(expected: String, found: &str) -> XmpError {
    XmpError::UnexpectedElement {
        expected,
        found: found.to_string(),
    }
}

/// Incremental XMP parser
///
/// Feed the packet with [`parse`](Self::parse) as many times as needed, then
/// call [`end_parse`](Self::end_parse) once. After the first error the context
/// is unusable and every further call fails without reaching the handler.
///
/// # Example
///
/// ```rust
/// use xmpstream::{ParseOptions, XmpHandler, XmpParseContext, XmpResult, XmpValue};
///
/// #[derive(Default)]
/// struct Titles(Vec<String>);
///
/// impl XmpHandler for Titles {
///     type Schema = String;
///
///     fn start_schema(&mut self, uri: &str, _prefix: &str) -> XmpResult<String> {
///         Ok(uri.to_string())
///     }
///
///     fn set_property(&mut self, _uri: &String, name: &str, value: XmpValue) -> XmpResult<()> {
///         if name == "title" {
///             self.0.push(value.lang("x-default").unwrap_or_default().to_string());
///         }
///         Ok(())
///     }
/// }
///
/// let packet = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
/// <x:xmpmeta xmlns:x="adobe:ns:meta/">
///  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
///   <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
///    <dc:title><rdf:Alt><rdf:li xml:lang="x-default">Sunset</rdf:li></rdf:Alt></dc:title>
///   </rdf:Description>
///  </rdf:RDF>
/// </x:xmpmeta>
/// <?xpacket end="w"?>"#;
///
/// let mut context = XmpParseContext::new(Titles::default(), ParseOptions::default());
/// for chunk in packet.as_bytes().chunks(7) {
///     context.parse(chunk)?;
/// }
/// context.end_parse()?;
/// assert_eq!(context.into_handler().0, vec!["Sunset".to_string()]);
/// # Ok::<(), xmpstream::XmpError>(())
/// ```
pub struct XmpParseContext<H: XmpHandler> {
    tokenizer: XmlTokenizer,
    machine: StateMachine<H>,
}

impl<H: XmpHandler> XmpParseContext<H> {
    /// Create a parse context reporting to `handler`
    pub fn new(handler: H, options: ParseOptions) -> Self {
        Self {
            tokenizer: XmlTokenizer::new(),
            machine: StateMachine::new(handler, options),
        }
    }

    /// Options this context was created with
    pub fn options(&self) -> ParseOptions {
        self.machine.options
    }

    /// Current parser state
    pub fn state(&self) -> ParseState {
        self.machine.state
    }

    /// Feed the next chunk of the packet
    pub fn parse(&mut self, bytes: &[u8]) -> XmpResult<()> {
        self.machine.check_usable()?;
        self.tokenizer.push(bytes);
        self.run(false)
    }

    /// Signal the end of input
    ///
    /// Fails with [`XmpError::NoXPacket`] if no packet was started, and with
    /// [`XmpError::ParseError`] if the packet is incomplete.
    pub fn end_parse(&mut self) -> XmpResult<()> {
        self.machine.check_usable()?;
        self.run(true)?;
        match self.machine.state {
            ParseState::AfterXPacket => Ok(()),
            ParseState::Start => Err(self.machine.fail(XmpError::NoXPacket)),
            _ => {
                let error = match self.tokenizer.open_elements().last() {
                    Some(name) => XmpError::ParseError(format!(
                        "Document ended unexpectedly, element <{}> is still open",
                        name
                    )),
                    None => XmpError::ParseError(
                        "XMP packet is not terminated by <?xpacket end=...?>".to_string(),
                    ),
                };
                Err(self.machine.fail(error))
            }
        }
    }

    /// Get the handler
    pub fn handler(&self) -> &H {
        &self.machine.handler
    }

    /// Get the handler mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.machine.handler
    }

    /// Consume the context, returning the handler
    pub fn into_handler(self) -> H {
        self.machine.handler
    }

    fn run(&mut self, last: bool) -> XmpResult<()> {
        loop {
            if self.machine.is_searching() && !self.seek_packet(last) {
                return Ok(());
            }

            let offset = self.tokenizer.offset();
            if let Err(e) = self.tokenizer.feed(&mut self.machine, last) {
                return Err(self.machine.fail(e));
            }

            // the tokenizer stops after a packet when searching, look for the next one
            let progressed = self.tokenizer.offset() != offset;
            if !progressed || !self.machine.is_searching() || self.tokenizer.pending().is_empty() {
                return Ok(());
            }
        }
    }

    /// Drop pending bytes up to the next packet marker
    ///
    /// Returns true if the pending input now starts with the marker. Otherwise
    /// only a tail that may hold the start of a split marker is kept.
    fn seek_packet(&mut self, last: bool) -> bool {
        let pending = self.tokenizer.pending();
        match memchr::memmem::find(pending, XPACKET_BEGIN) {
            Some(start) => {
                if start > 0 {
                    log::debug!(
                        "Skipping {} bytes before XMP packet at offset {}",
                        start,
                        self.tokenizer.offset()
                    );
                }
                self.tokenizer.discard(start);
                true
            }
            None => {
                let keep = if last {
                    0
                } else {
                    (XPACKET_BEGIN.len() - 1).min(pending.len())
                };
                let skip = pending.len() - keep;
                self.tokenizer.discard(skip);
                false
            }
        }
    }
}

/// Grammar of the XMP packet, driven by XML events
struct StateMachine<H: XmpHandler> {
    handler: H,
    options: ParseOptions,
    state: ParseState,
    depth: usize,
    namespaces: NamespaceStack<H::Schema>,
    rdf_prefix: String,
    meta_prefix: Option<String>,
    /// `rdf:RDF` appeared without the `x:xmpmeta` wrapper
    xmpmeta_elided: bool,
    frames: FrameStack,
    property: Option<PropertyAccumulator>,
    /// Name of the `x:xmpmeta` wrapper, for end-of-packet errors
    meta_element: String,
}

impl<H: XmpHandler> StateMachine<H> {
    fn new(handler: H, options: ParseOptions) -> Self {
        Self {
            handler,
            options,
            state: ParseState::Start,
            depth: 0,
            namespaces: NamespaceStack::new(),
            rdf_prefix: ns::RDF_PREFIX.to_string(),
            meta_prefix: None,
            xmpmeta_elided: false,
            frames: FrameStack::new(),
            property: None,
            meta_element: String::new(),
        }
    }

    fn check_usable(&self) -> XmpResult<()> {
        if self.state == ParseState::Error {
            return Err(XmpError::ParseError(
                "The parse context is unusable after an error".to_string(),
            ));
        }
        Ok(())
    }

    /// Enter the error state, telling the handler once
    fn fail(&mut self, error: XmpError) -> XmpError {
        if self.state != ParseState::Error {
            log::debug!(
                "XMP parse failed in state {:?} at depth {}: {}",
                self.state,
                self.depth,
                error
            );
            self.state = ParseState::Error;
            self.handler.error(&error);
        }
        error
    }

    fn is_searching(&self) -> bool {
        self.options.find_xpacket
            && matches!(self.state, ParseState::Start | ParseState::AfterXPacket)
    }

    fn is_rdf(&self, name: &str, local: &str) -> bool {
        matches_with_prefix(name, &self.rdf_prefix, local)
    }

    fn rdf_name(&self, local: &str) -> String {
        format!("{}:{}", self.rdf_prefix, local)
    }

    fn is_xmpmeta(&self, name: &str) -> bool {
        name == "x:xmpmeta"
            || name == "x:xapmeta"
            || self.meta_prefix.as_deref().is_some_and(|prefix| {
                matches_with_prefix(name, prefix, "xmpmeta")
                    || matches_with_prefix(name, prefix, "xapmeta")
            })
    }

    fn push_namespace(&mut self, uri: &str, prefix: &str) -> XmpResult<()> {
        if uri == ns::X {
            self.meta_prefix = Some(prefix.to_string());
            return Ok(());
        }
        if uri == ns::RDF {
            self.rdf_prefix = prefix.to_string();
            return Ok(());
        }
        let schema = self.handler.start_schema(uri, prefix)?;
        log::debug!("Schema {}={} opened at depth {}", prefix, uri, self.depth);
        self.namespaces.push(self.depth, uri, prefix, schema);
        Ok(())
    }

    fn pop_namespaces(&mut self, depth: usize) -> XmpResult<()> {
        while let Some(scope) = self.namespaces.pop_at_or_below(depth) {
            log::trace!("Schema {}={} closed", scope.prefix, scope.uri);
            self.handler.end_schema(scope.data)?;
        }
        Ok(())
    }

    fn propagate(&mut self, property: PropertyAccumulator) -> XmpResult<()> {
        let scope = self.namespaces.get(property.scope()).ok_or_else(|| {
            XmpError::ParseError(format!(
                "Namespace of property {} is no longer in scope",
                property.name()
            ))
        })?;
        let name = property.name().to_string();
        let value = property.into_value();
        log::debug!("Property {}:{} ({:?})", scope.prefix, name, value.shape());
        self.handler.set_property(&scope.data, &name, value)
    }

    fn skip(&mut self, state: ParseState) -> XmpResult<()> {
        self.frames.push(self.state, self.depth)?;
        self.state = state;
        Ok(())
    }

    fn unknown_element(&mut self, name: &str) -> XmpResult<()> {
        if self.options.no_unknown_elements {
            return Err(XmpError::UnknownElement(name.to_string()));
        }
        log::warn!("Skipping unknown element <{}>", name);
        self.skip(ParseState::SkippingUnknownElements)
    }

    fn ignore_element(&mut self) -> XmpResult<()> {
        self.skip(ParseState::SkippingIgnoredElements)
    }

    fn unknown_attribute(&self, element: &str, attribute: &str, value: &str) -> XmpResult<()> {
        if self.options.no_unknown_attributes {
            return Err(XmpError::UnknownAttribute {
                element: element.to_string(),
                attribute: attribute.to_string(),
                value: value.to_string(),
            });
        }
        log::warn!("Ignoring unknown attribute {}=\"{}\" in <{}>", attribute, value, element);
        Ok(())
    }

    fn on_start_element(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        log::debug!("[{:?}] {} <{}>", self.state, self.depth, name);
        self.depth += 1;
        for (key, value) in attributes {
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.push_namespace(value, prefix)?;
            }
        }

        match self.state {
            ParseState::InsideXPacket => {
                if self.is_xmpmeta(name) {
                    self.meta_element = name.to_string();
                    self.state = ParseState::InsideXmpMeta;
                } else if self.is_rdf(name, "RDF") {
                    // pretend the wrapper was there
                    self.depth += 1;
                    self.xmpmeta_elided = true;
                    self.state = ParseState::InsideRdf;
                } else {
                    return Err(unexpected("x:xmpmeta".to_string(), name));
                }
            }
            ParseState::InsideXmpMeta => {
                if !self.is_rdf(name, "RDF") {
                    return Err(unexpected(self.rdf_name("RDF"), name));
                }
                self.state = ParseState::InsideRdf;
            }
            ParseState::InsideRdf => {
                if !self.is_rdf(name, "Description") {
                    return Err(unexpected(self.rdf_name("Description"), name));
                }
                self.state = ParseState::InsideTopLevelDesc;
                self.start_description(name, attributes)?;
            }
            ParseState::InsideTopLevelDesc => self.start_property(name, attributes)?,
            ParseState::InsideProperty => self.start_property_value(name, attributes)?,
            ParseState::InsideQDesc => {
                self.state = if self.is_rdf(name, "value") {
                    ParseState::InsideQDescValue
                } else {
                    ParseState::InsideQDescQual
                };
            }
            ParseState::InsideStructAddNs | ParseState::InsideStruct => self.start_field(name)?,
            ParseState::InsideAlt => {
                if !self.is_rdf(name, "li") {
                    return Err(unexpected(self.rdf_name("li"), name));
                }
                self.start_alt_item(name, attributes)?;
            }
            ParseState::InsideBag | ParseState::InsideSeq => {
                if !self.is_rdf(name, "li") {
                    return Err(unexpected(self.rdf_name("li"), name));
                }
                self.start_list_item(name, attributes)?;
            }
            ParseState::InsideBagLi | ParseState::InsideSeqLi => {
                if !self.is_rdf(name, "Description") {
                    return Err(unexpected(self.rdf_name("Description"), name));
                }
                self.frames.push(self.state, self.depth)?;
                self.state = ParseState::InsideQDesc;
            }
            ParseState::InsideAltLiRsc => self.start_thumbnail_field(name)?,
            ParseState::InsideBagLiRsc | ParseState::InsideSeqLiRsc => self.unknown_element(name)?,
            ParseState::SkippingUnknownElements | ParseState::SkippingIgnoredElements => {}
            _ => {
                return Err(XmpError::ParseError(format!(
                    "Nested elements (<{}>) are not allowed in this context",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Attributes of a top-level `rdf:Description`
    fn start_description(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        let mut about = false;
        for (key, value) in attributes {
            if self.is_rdf(key, "about") || key == "about" {
                about = true;
            } else if is_namespace_declaration(key) {
                continue;
            } else if let Some((scope, local)) = self.namespaces.resolve(key) {
                // shorthand property
                let mut property = PropertyAccumulator::new(local, scope);
                property.add_text(value);
                self.propagate(property)?;
            } else {
                self.unknown_attribute(name, key, value)?;
            }
        }
        if !about && self.options.no_missing_about {
            return Err(XmpError::MissingAbout(name.to_string()));
        }
        Ok(())
    }

    fn start_property(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        let Some((scope, local)) = self.namespaces.resolve(name) else {
            return self.unknown_element(name);
        };
        let mut property = PropertyAccumulator::new(local, scope);
        self.state = ParseState::InsideProperty;
        for (key, value) in attributes {
            if self.is_rdf(key, "resource") {
                property.set_resource(value);
            } else if self.is_rdf(key, "parseType") && value == "Resource" {
                self.frames.push(ParseState::InsideTopLevelDesc, self.depth)?;
                self.state = ParseState::InsideStructAddNs;
            } else if !is_namespace_declaration(key) {
                self.unknown_attribute(name, key, value)?;
            }
        }
        self.property = Some(property);
        Ok(())
    }

    fn start_property_value(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        if self.is_rdf(name, "Description") {
            let mut structure = false;
            for (key, value) in attributes {
                if is_namespace_declaration(key) {
                    structure = true;
                } else {
                    self.unknown_attribute(name, key, value)?;
                }
            }
            self.frames.push(ParseState::InsideProperty, self.depth)?;
            self.state = if structure {
                ParseState::InsideStructAddNs
            } else {
                ParseState::InsideQDesc
            };
        } else if self.is_rdf(name, "Alt") {
            self.state = ParseState::InsideAlt;
        } else if self.is_rdf(name, "Bag") {
            self.state = ParseState::InsideBag;
            self.ensure_container(ShapeTag::UnorderedList);
        } else if self.is_rdf(name, "Seq") {
            self.state = ParseState::InsideSeq;
            self.ensure_container(ShapeTag::OrderedList);
        } else {
            self.unknown_element(name)?;
        }
        Ok(())
    }

    /// Structure field, in a namespace declared on the structure or just above it
    fn start_field(&mut self, name: &str) -> XmpResult<()> {
        let min_depth = self.depth.saturating_sub(2);
        let Some((index, local)) = self.namespaces.resolve_within(name, min_depth) else {
            return self.unknown_element(name);
        };
        let Some(scope) = self.namespaces.get(index) else {
            return self.unknown_element(name);
        };
        let Some(property) = self.property.as_mut() else {
            return Err(no_property(name));
        };

        let accepted = (self.state != ParseState::InsideStructAddNs
            || property.start_structure(&scope.prefix, &scope.uri))
            && property.open_item(ShapeTag::Structure, Some(local));
        if accepted {
            self.state = ParseState::InsideStructElement;
            Ok(())
        } else {
            log::warn!(
                "Ignoring field <{}>, property {} already has a {:?} value",
                name,
                property.name(),
                property.shape()
            );
            self.ignore_element()
        }
    }

    fn start_alt_item(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        let mut resource = false;
        let mut lang = None;
        for (key, value) in attributes {
            if self.is_rdf(key, "parseType") && value == "Resource" {
                resource = true;
            } else if key == "xml:lang" {
                lang = Some(value.as_str());
            } else if !is_namespace_declaration(key) {
                self.unknown_attribute(name, key, value)?;
            }
        }

        let Some(property) = self.property.as_mut() else {
            return Err(no_property(name));
        };
        if resource {
            // resource items make the Alt a thumbnail list, even without images
            if property.ensure_container(ShapeTag::ThumbnailAlt) {
                self.state = ParseState::InsideAltLiRsc;
                return Ok(());
            }
            log::warn!(
                "Ignoring thumbnail item, property {} already has a {:?} value",
                property.name(),
                property.shape()
            );
            return self.ignore_element();
        }
        let accepted = match lang {
            Some(lang) => property.open_item(ShapeTag::LangAlt, Some(lang)),
            None => property.open_item(ShapeTag::OrderedList, None),
        };
        if accepted {
            self.state = ParseState::InsideAltLi;
            Ok(())
        } else {
            log::warn!(
                "Ignoring item of property {}, it does not match the previous items",
                property.name()
            );
            self.ignore_element()
        }
    }

    fn start_list_item(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        let ordered = self.state == ParseState::InsideSeq;
        let mut resource = false;
        for (key, value) in attributes {
            if self.is_rdf(key, "parseType") && value == "Resource" {
                resource = true;
            } else if !is_namespace_declaration(key) {
                self.unknown_attribute(name, key, value)?;
            }
        }

        if resource {
            self.state = if ordered {
                ParseState::InsideSeqLiRsc
            } else {
                ParseState::InsideBagLiRsc
            };
            return Ok(());
        }
        let Some(property) = self.property.as_mut() else {
            return Err(no_property(name));
        };
        let (shape, state) = if ordered {
            (ShapeTag::OrderedList, ParseState::InsideSeqLi)
        } else {
            (ShapeTag::UnorderedList, ParseState::InsideBagLi)
        };
        if property.open_item(shape, None) {
            self.state = state;
            Ok(())
        } else {
            log::warn!(
                "Ignoring item of property {}, it does not match the previous items",
                property.name()
            );
            self.ignore_element()
        }
    }

    /// Child of a thumbnail item: only the image data is kept
    fn start_thumbnail_field(&mut self, name: &str) -> XmpResult<()> {
        let local = match self.namespaces.resolve(name) {
            Some((index, local))
                if self
                    .namespaces
                    .get(index)
                    .is_some_and(|scope| scope.uri == ns::XMP_IMAGE) =>
            {
                Some(local)
            }
            _ => split_qname(name)
                .filter(|(prefix, _)| {
                    *prefix == ns::XAP_IMAGE_PREFIX || *prefix == ns::XMP_IMAGE_PREFIX
                })
                .map(|(_, local)| local),
        };
        match local {
            Some("image") => {
                self.state = ParseState::InsideAltLiRscImg;
                Ok(())
            }
            Some("format") | Some("width") | Some("height") => self.ignore_element(),
            _ => self.unknown_element(name),
        }
    }

    fn on_end_element(&mut self, name: &str) -> XmpResult<()> {
        log::debug!("[{:?}] {} </{}>", self.state, self.depth, name);
        match self.state {
            ParseState::InsideProperty => {
                self.state = ParseState::InsideTopLevelDesc;
                if let Some(property) = self.property.take() {
                    self.propagate(property)?;
                }
            }
            ParseState::InsideStructAddNs | ParseState::InsideStruct => {
                self.state = self.frames.pop(self.depth)?;
                if let Some(mut property) = self.property.take() {
                    property.finish_structure();
                    self.propagate(property)?;
                }
            }
            ParseState::InsideAlt => {
                // an Alt without items is an empty language alternative
                if self.property.as_ref().is_some_and(|p| p.shape().is_none()) {
                    self.ensure_container(ShapeTag::LangAlt);
                }
                self.state = ParseState::InsideProperty;
            }
            ParseState::InsideBag | ParseState::InsideSeq => {
                self.state = ParseState::InsideProperty;
            }
            ParseState::InsideQDesc => {
                self.state = self.frames.pop(self.depth)?;
            }
            ParseState::InsideQDescValue | ParseState::InsideQDescQual => {
                self.state = ParseState::InsideQDesc;
            }
            ParseState::InsideStructElement => {
                self.state = ParseState::InsideStruct;
            }
            ParseState::InsideAltLi => {
                self.state = ParseState::InsideAlt;
            }
            ParseState::InsideAltLiRsc => {
                self.state = ParseState::InsideAlt;
            }
            ParseState::InsideAltLiRscImg => {
                self.state = ParseState::InsideAltLiRsc;
                if let Some(property) = self.property.as_mut() {
                    if !property.finish_image() {
                        log::warn!(
                            "Ignoring thumbnail, property {} already has a {:?} value",
                            property.name(),
                            property.shape()
                        );
                    }
                }
            }
            ParseState::InsideBagLi => {
                self.state = ParseState::InsideBag;
            }
            ParseState::InsideBagLiRsc => {
                self.state = ParseState::InsideBag;
            }
            ParseState::InsideSeqLi => {
                self.state = ParseState::InsideSeq;
            }
            ParseState::InsideSeqLiRsc => {
                self.state = ParseState::InsideSeq;
            }
            ParseState::InsideTopLevelDesc => {
                self.state = ParseState::InsideRdf;
            }
            ParseState::InsideRdf => {
                self.state = ParseState::AfterRdf;
            }
            ParseState::AfterRdf if self.is_xmpmeta(name) => {
                self.state = ParseState::AfterXmpMeta;
            }
            ParseState::SkippingUnknownElements | ParseState::SkippingIgnoredElements => {
                if self.frames.top().is_some_and(|frame| frame.depth == self.depth) {
                    // resume normal processing
                    self.state = self.frames.pop(self.depth)?;
                }
            }
            _ => {
                return Err(XmpError::ParseError(format!(
                    "End of element <{}> not expected in this context",
                    name
                )));
            }
        }
        self.pop_namespaces(self.depth)?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn ensure_container(&mut self, shape: ShapeTag) {
        if let Some(property) = self.property.as_mut() {
            if !property.ensure_container(shape) {
                log::warn!(
                    "Property {} already has a {:?} value, its {:?} items will be ignored",
                    property.name(),
                    property.shape(),
                    shape
                );
            }
        }
    }

    fn on_text(&mut self, text: &str, parent: Option<&str>) -> XmpResult<()> {
        let blank = is_whitespace(text);
        match self.state {
            ParseState::InsideProperty => {
                if blank {
                    return Ok(());
                }
                match self.property.as_mut() {
                    Some(property) => {
                        if !property.add_text(text) {
                            log::warn!(
                                "Ignoring text in property {}, it already has a {:?} value",
                                property.name(),
                                property.shape()
                            );
                        }
                    }
                    None => log::debug!("Ignoring text after a structured value"),
                }
            }
            ParseState::InsideStructElement
            | ParseState::InsideAltLi
            | ParseState::InsideBagLi
            | ParseState::InsideSeqLi => {
                if !blank {
                    if let Some(property) = self.property.as_mut() {
                        property.update_item(text);
                    }
                }
            }
            ParseState::InsideAltLiRscImg => {
                if let Some(property) = self.property.as_mut() {
                    property.push_image_text(text);
                }
            }
            ParseState::InsideQDescValue => {
                if blank {
                    return Ok(());
                }
                let scalar = self
                    .frames
                    .top()
                    .is_some_and(|frame| frame.state == ParseState::InsideProperty);
                if let Some(property) = self.property.as_mut() {
                    if scalar {
                        property.add_text(text);
                    } else {
                        property.update_item(text);
                    }
                }
            }
            ParseState::InsideQDescQual => {
                log::trace!("Ignoring qualifier value {:?}", text);
            }
            ParseState::SkippingUnknownElements | ParseState::SkippingIgnoredElements => {}
            _ => {
                if !blank {
                    return Err(XmpError::InvalidContent(parent.unwrap_or_default().to_string()));
                }
            }
        }
        Ok(())
    }

    fn is_ignorable(&self, text: &str) -> bool {
        text.starts_with("<?adobe-") || (!self.options.no_comments && text.starts_with("<!--"))
    }

    fn on_passthrough(&mut self, text: &str) -> XmpResult<()> {
        match self.state {
            ParseState::Start | ParseState::AfterXPacket => {
                if !text.starts_with("<?xpacket begin=") {
                    return Err(XmpError::ParseError(
                        "XMP packets must start with <?xpacket begin=...?>".to_string(),
                    ));
                }
                log::debug!("XMP packet begins: {}", text);
                self.state = ParseState::InsideXPacket;
                self.xmpmeta_elided = false;
            }
            ParseState::AfterRdf | ParseState::AfterXmpMeta => {
                if text.starts_with(XPACKET_END) {
                    if self.state == ParseState::AfterRdf {
                        if !self.xmpmeta_elided {
                            return Err(XmpError::ParseError(format!(
                                "Element <{}> must be closed before the end of the packet",
                                self.meta_element
                            )));
                        }
                        self.depth = self.depth.saturating_sub(1);
                        self.pop_namespaces(self.depth)?;
                    }
                    log::debug!("XMP packet ends: {}", text);
                    self.state = ParseState::AfterXPacket;
                } else if !self.is_ignorable(text) {
                    return Err(XmpError::ParseError(
                        "XMP packets must end with <?xpacket end=...?>".to_string(),
                    ));
                }
            }
            _ => {
                if !self.is_ignorable(text) {
                    return Err(XmpError::InvalidComment);
                }
            }
        }
        Ok(())
    }
}

fn no_property(element: &str) -> XmpError {
    XmpError::ParseError(format!("<{}> appears outside of a property", element))
}

impl<H: XmpHandler> XmlEventSink for StateMachine<H> {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()> {
        self.on_start_element(name, attributes)
            .map_err(|e| self.fail(e))
    }

    fn end_element(&mut self, name: &str) -> XmpResult<()> {
        self.on_end_element(name).map_err(|e| self.fail(e))
    }

    fn text(&mut self, text: &str, parent: Option<&str>) -> XmpResult<()> {
        self.on_text(text, parent).map_err(|e| self.fail(e))
    }

    fn passthrough(&mut self, text: &str) -> XmpResult<()> {
        self.on_passthrough(text).map_err(|e| self.fail(e))
    }

    fn suspended(&self) -> bool {
        self.options.find_xpacket && self.state == ParseState::AfterXPacket
    }
}
