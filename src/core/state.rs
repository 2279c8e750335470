//! Parser states
//!
//! Only a few XMP elements may contain other elements and no deep nesting
//! is allowed, so every legal position in a packet maps to one state:
//!
//! ```text
//! (init)                                 Start
//! <?xpacket begin='' id='...'?>           InsideXPacket
//!  <x:xmpmeta xmlns:x='adobe:ns:meta/'>    InsideXmpMeta
//!   <rdf:RDF xmlns:rdf='...'>               InsideRdf
//!    <rdf:Description rdf:about='' ...>      InsideTopLevelDesc
//!     <foo:bar>                               InsideProperty
//!       ... (simple or structured value)       Inside...
//!     </foo:bar>                             InsideTopLevelDesc
//!    </rdf:Description>                     InsideRdf
//!   </rdf:RDF>                             AfterRdf
//!  </x:xmpmeta>                           AfterXmpMeta
//! <?xpacket end='r'?>                    AfterXPacket
//! ```
//!
//! The few places where the grammar nests (qualified values, structures,
//! skipped subtrees) remember where to return in a [`FrameStack`].

use crate::core::error::{XmpError, XmpResult};

/// Position of the parser in the XMP grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Start,
    InsideXPacket,
    InsideXmpMeta,
    InsideRdf,
    InsideTopLevelDesc,
    InsideProperty,
    /// `rdf:Description` used below the top level: a value with qualifiers
    InsideQDesc,
    InsideQDescValue,
    InsideQDescQual,
    /// Structure before its first field (namespace not captured yet)
    InsideStructAddNs,
    InsideStruct,
    InsideStructElement,
    InsideAlt,
    InsideAltLi,
    /// `rdf:li rdf:parseType="Resource"` in an `rdf:Alt`: a thumbnail
    InsideAltLiRsc,
    InsideAltLiRscImg,
    InsideBag,
    InsideBagLi,
    InsideBagLiRsc,
    InsideSeq,
    InsideSeqLi,
    InsideSeqLiRsc,
    AfterRdf,
    AfterXmpMeta,
    AfterXPacket,
    SkippingUnknownElements,
    SkippingIgnoredElements,
    Error,
}

/// Maximum number of saved frames; the XMP grammar never nests deeper
pub const MAX_SAVED_FRAMES: usize = 6;

/// State to resume once the element at `depth` closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub state: ParseState,
    pub depth: usize,
}

/// Bounded stack of saved frames
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(MAX_SAVED_FRAMES),
        }
    }

    /// Save a frame, failing if the grammar's nesting bound is exceeded
    pub fn push(&mut self, state: ParseState, depth: usize) -> XmpResult<()> {
        if self.frames.len() >= MAX_SAVED_FRAMES {
            return Err(XmpError::ParseError(format!(
                "Elements nested too deeply (more than {} levels of structures, qualifiers or skipped elements)",
                MAX_SAVED_FRAMES
            )));
        }
        self.frames.push(Frame { state, depth });
        Ok(())
    }

    /// Remove the innermost frame, which must have been saved at `depth`
    pub fn pop(&mut self, depth: usize) -> XmpResult<ParseState> {
        match self.frames.pop() {
            Some(frame) if frame.depth == depth => Ok(frame.state),
            Some(frame) => Err(XmpError::ParseError(format!(
                "Element at depth {} closed while the frame saved at depth {} is active",
                depth, frame.depth
            ))),
            None => Err(XmpError::ParseError(
                "End of element closes a context that was never opened".to_string(),
            )),
        }
    }

    /// Innermost frame
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }
}
