//! Streaming XML event layer
//!
//! This module turns raw packet bytes into SAX-style events using
//! `quick-xml`. Input may arrive in arbitrary chunks: markup is only read
//! once it is complete, and a text run is only delivered once the markup
//! that ends it has been seen. Element nesting is checked here so the XMP
//! state machine can rely on well-formed event order.

use crate::core::error::{XmpError, XmpResult};
use quick_xml::errors::{Error, IllFormedError, SyntaxError};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Receiver of XML events
pub trait XmlEventSink {
    /// Start tag with its attributes in document order
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) -> XmpResult<()>;

    /// End tag (also emitted for empty elements)
    fn end_element(&mut self, name: &str) -> XmpResult<()>;

    /// Character data with entities resolved, and the element holding it
    fn text(&mut self, text: &str, parent: Option<&str>) -> XmpResult<()>;

    /// Comments, processing instructions and declarations, verbatim
    fn passthrough(&mut self, text: &str) -> XmpResult<()>;

    /// Stop delivering events; the remaining bytes stay buffered
    fn suspended(&self) -> bool {
        false
    }
}

/// Incremental XML tokenizer
#[derive(Debug, Default)]
pub struct XmlTokenizer {
    pending: Vec<u8>,
    open: Vec<String>,
    /// Text run read so far, waiting for the markup that ends it
    text: String,
    offset: u64,
}

impl XmlTokenizer {
    /// Create an empty tokenizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of input
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Bytes received but not yet tokenized
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Drop the first `count` pending bytes
    pub fn discard(&mut self, count: usize) {
        let count = count.min(self.pending.len());
        self.pending.drain(..count);
        self.offset += count as u64;
    }

    /// Absolute input offset of the first pending byte
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Names of the elements opened but not yet closed
    pub fn open_elements(&self) -> &[String] {
        &self.open
    }

    /// Deliver every complete event in the pending input
    ///
    /// When `last` is false, an incomplete trailing construct is kept for the
    /// next call. When `last` is true, it is an error.
    pub fn feed<S: XmlEventSink + ?Sized>(&mut self, sink: &mut S, last: bool) -> XmpResult<()> {
        let mut state = Tokenizing {
            open: &mut self.open,
            text: &mut self.text,
            base_offset: self.offset,
        };
        let (consumed, result) = state.tokenize(&self.pending, sink, last);
        self.discard(consumed);
        result
    }
}

fn utf8(bytes: &[u8]) -> XmpResult<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| XmpError::ParseError(format!("Invalid UTF-8 in XMP packet: {}", e)))
}

/// Collect attributes, decoding XML entities in values (e.g., &quot; -> ")
fn collect_attributes(e: &BytesStart<'_>) -> XmpResult<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmpError::ParseError(format!("Malformed attribute: {}", e)))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let raw_value = utf8(&attr.value)?;
        let value = unescape(raw_value)
            .map_err(|e| XmpError::ParseError(format!("Bad entity in attribute {}: {}", key, e)))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

/// Whether `error`, raised at `at`, only means the input stops too early
///
/// quick-xml reports markup cut by the end of the buffer as a syntax error.
/// The exception is `<!` followed by an unknown byte, which is a real error
/// unless the buffer ends right after the `<!`. A reference is truncated
/// only if nothing that could end it follows the `&`.
fn is_truncated(error: &Error, input: &[u8], at: usize) -> bool {
    match error {
        Error::Syntax(SyntaxError::InvalidBangMarkup) => input.len().saturating_sub(at) <= 2,
        Error::Syntax(_) => true,
        Error::IllFormed(IllFormedError::UnclosedReference) => input
            .get(at + 1..)
            .is_some_and(|rest| memchr::memchr3(b';', b'&', b'<', rest).is_none()),
        _ => false,
    }
}

/// Tokenizer state borrowed for one feed
struct Tokenizing<'a> {
    open: &'a mut Vec<String>,
    text: &'a mut String,
    base_offset: u64,
}

impl Tokenizing<'_> {
    /// Tokenize `input`, returning how many bytes were read
    fn tokenize<S: XmlEventSink + ?Sized>(
        &mut self,
        input: &[u8],
        sink: &mut S,
        last: bool,
    ) -> (usize, XmpResult<()>) {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.trim_text(false);
        config.expand_empty_elements = true;
        // each feed gets a fresh reader, nesting is tracked across feeds by `open`
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut consumed = 0;
        loop {
            if sink.suspended() {
                return (consumed, Ok(()));
            }

            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let at = reader.error_position() as usize;
                    if !last && is_truncated(&e, input, at) {
                        // keep the cut construct for the next feed
                        return (at.min(input.len()), Ok(()));
                    }
                    return (
                        consumed,
                        Err(XmpError::ParseError(format!(
                            "XML error at byte {}: {}",
                            self.base_offset + at as u64,
                            e
                        ))),
                    );
                }
            };

            let step = match event {
                Event::Text(t) => match std::str::from_utf8(&t) {
                    Ok(raw) => {
                        self.text.push_str(raw);
                        Ok(())
                    }
                    // a multi-byte character cut by the end of the chunk
                    Err(e)
                        if e.error_len().is_none()
                            && !last
                            && reader.buffer_position() as usize == input.len() =>
                    {
                        let valid = e.valid_up_to();
                        if let Err(e) = utf8(&t[..valid]).map(|raw| self.text.push_str(raw)) {
                            return (consumed, Err(e));
                        }
                        return (input.len() - (t.len() - valid), Ok(()));
                    }
                    Err(e) => Err(XmpError::ParseError(format!(
                        "Invalid UTF-8 in XMP packet: {}",
                        e
                    ))),
                },
                Event::CData(c) => utf8(&c).map(|raw| self.text.push_str(raw)),
                Event::GeneralRef(r) => match r.resolve_char_ref() {
                    Ok(Some(ch)) => {
                        self.text.push(ch);
                        Ok(())
                    }
                    Ok(None) => utf8(&r).and_then(|name| match resolve_predefined_entity(name) {
                        Some(resolved) => {
                            self.text.push_str(resolved);
                            Ok(())
                        }
                        None => Err(XmpError::ParseError(format!("Unknown entity &{};", name))),
                    }),
                    Err(e) => Err(XmpError::ParseError(format!("Bad character reference: {}", e))),
                },
                Event::Eof => {
                    // an unfinished text run stays buffered until more input arrives
                    let result = if last { self.flush_text(sink) } else { Ok(()) };
                    return (input.len(), result);
                }
                markup => match self.flush_text(sink) {
                    Ok(()) => self.dispatch(markup, sink),
                    Err(e) => Err(e),
                },
            };

            consumed = reader.buffer_position() as usize;
            if let Err(e) = step {
                return (consumed, Err(e));
            }
        }
    }

    fn flush_text<S: XmlEventSink + ?Sized>(&mut self, sink: &mut S) -> XmpResult<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut *self.text);
        sink.text(&text, self.open.last().map(String::as_str))
    }

    /// Deliver one markup event to the sink
    fn dispatch<S: XmlEventSink + ?Sized>(&mut self, event: Event<'_>, sink: &mut S) -> XmpResult<()> {
        match event {
            Event::Start(e) => {
                let qname = e.name();
                let name = utf8(qname.as_ref())?.to_string();
                let attrs = collect_attributes(&e)?;
                self.open.push(name.clone());
                sink.start_element(&name, &attrs)
            }
            Event::Empty(e) => {
                let qname = e.name();
                let name = utf8(qname.as_ref())?.to_string();
                let attrs = collect_attributes(&e)?;
                sink.start_element(&name, &attrs)?;
                sink.end_element(&name)
            }
            Event::End(e) => {
                let qname = e.name();
                let name = utf8(qname.as_ref())?;
                match self.open.pop() {
                    Some(expected) if expected == name => sink.end_element(name),
                    Some(expected) => Err(XmpError::ParseError(format!(
                        "Element <{}> was closed, but the currently open element is <{}>",
                        name, expected
                    ))),
                    None => Err(XmpError::ParseError(format!(
                        "Element <{}> was closed, but no element is open",
                        name
                    ))),
                }
            }
            Event::Comment(c) => sink.passthrough(&format!("<!--{}-->", utf8(&c)?)),
            Event::PI(pi) => sink.passthrough(&format!("<?{}?>", utf8(&pi)?)),
            Event::Decl(decl) => sink.passthrough(&format!("<?{}?>", utf8(&decl)?)),
            Event::DocType(doctype) => sink.passthrough(&format!("<!DOCTYPE {}>", utf8(&doctype)?)),
            _ => Ok(()),
        }
    }
}
