//! Namespace scopes for XMP parsing
//!
//! XMP uses namespaces to organize properties into schemas. While parsing,
//! every `xmlns:prefix="uri"` declaration opens a scope that stays visible
//! until the declaring element closes. Scopes form a LIFO stack ordered by
//! declaration depth; lookups walk from the innermost scope outwards so a
//! closer redeclaration of a prefix shadows an outer one.

/// Well-known XMP namespaces
pub mod ns {
    /// Adobe XMP meta wrapper namespace (`x:xmpmeta`)
    pub const X: &str = "adobe:ns:meta/";
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XML namespace (for xml:lang, etc.)
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// XMP Basic namespace
    pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
    /// Dublin Core namespace
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// EXIF namespace
    pub const EXIF: &str = "http://ns.adobe.com/exif/1.0/";
    /// EXIF Aux namespace
    pub const EXIF_AUX: &str = "http://ns.adobe.com/exif/1.0/aux/";
    /// TIFF namespace
    pub const TIFF: &str = "http://ns.adobe.com/tiff/1.0/";
    /// Photoshop namespace
    pub const PHOTOSHOP: &str = "http://ns.adobe.com/photoshop/1.0/";
    /// IPTC Core namespace
    pub const IPTC_CORE: &str = "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/";
    /// XMP Rights namespace
    pub const XMP_RIGHTS: &str = "http://ns.adobe.com/xap/1.0/rights/";
    /// XMP Media Management namespace
    pub const XMP_MM: &str = "http://ns.adobe.com/xap/1.0/mm/";
    /// PDF namespace
    pub const PDF: &str = "http://ns.adobe.com/pdf/1.3/";
    /// XMP Image namespace (thumbnails)
    pub const XMP_IMAGE: &str = "http://ns.adobe.com/xap/1.0/g/img/";
    /// Dimensions structure type namespace
    pub const ST_DIM: &str = "http://ns.adobe.com/xap/1.0/sType/Dimensions#";
    /// RDF prefix
    pub const RDF_PREFIX: &str = "rdf";
    /// XMP Image prefix used by older producers
    pub const XAP_IMAGE_PREFIX: &str = "xapGImg";
    /// XMP Image prefix
    pub const XMP_IMAGE_PREFIX: &str = "xmpGImg";
}

/// Split a qualified name into `(prefix, local name)`
///
/// Both parts must be non-empty.
pub fn split_qname(name: &str) -> Option<(&str, &str)> {
    let (prefix, local) = name.split_once(':')?;
    if prefix.is_empty() || local.is_empty() {
        return None;
    }
    Some((prefix, local))
}

/// Check if `name` is `prefix:local`
pub fn matches_with_prefix(name: &str, prefix: &str, local: &str) -> bool {
    split_qname(name).is_some_and(|(p, l)| p == prefix && l == local)
}

/// A namespace declared on an element, with the handler's data for it
#[derive(Debug, Clone)]
pub struct NamespaceScope<T> {
    /// Depth of the declaring element
    pub depth: usize,
    /// Namespace URI
    pub uri: String,
    /// Declared prefix
    pub prefix: String,
    /// Data returned by the handler when the scope was opened
    pub data: T,
}

/// Stack of namespace scopes currently visible
#[derive(Debug, Clone)]
pub struct NamespaceStack<T> {
    scopes: Vec<NamespaceScope<T>>,
}

impl<T> NamespaceStack<T> {
    /// Create an empty stack
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Open a scope declared at `depth`
    ///
    /// Returns the index of the new scope.
    pub fn push(&mut self, depth: usize, uri: &str, prefix: &str, data: T) -> usize {
        debug_assert!(self.scopes.last().map_or(true, |s| s.depth <= depth));
        self.scopes.push(NamespaceScope {
            depth,
            uri: uri.to_string(),
            prefix: prefix.to_string(),
            data,
        });
        self.scopes.len() - 1
    }

    /// Remove the innermost scope if it was declared at `depth` or deeper
    pub fn pop_at_or_below(&mut self, depth: usize) -> Option<NamespaceScope<T>> {
        if self.scopes.last()?.depth >= depth {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Find the innermost scope binding the prefix of `name`
    ///
    /// Returns the scope index and the local part of the name.
    pub fn resolve<'n>(&self, name: &'n str) -> Option<(usize, &'n str)> {
        self.resolve_within(name, 0)
    }

    /// Like [`resolve`](Self::resolve), considering only scopes declared at
    /// `min_depth` or deeper
    pub fn resolve_within<'n>(&self, name: &'n str, min_depth: usize) -> Option<(usize, &'n str)> {
        let (prefix, local) = split_qname(name)?;
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .take_while(|(_, scope)| scope.depth >= min_depth)
            .find(|(_, scope)| scope.prefix == prefix)
            .map(|(index, _)| (index, local))
    }

    /// Get a scope by index
    pub fn get(&self, index: usize) -> Option<&NamespaceScope<T>> {
        self.scopes.get(index)
    }

    /// Number of open scopes
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if no scope is open
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<T> Default for NamespaceStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("dc:title"), Some(("dc", "title")));
        assert_eq!(split_qname("title"), None);
        assert_eq!(split_qname("dc:"), None);
        assert_eq!(split_qname(":title"), None);
        assert!(matches_with_prefix("rdf:li", "rdf", "li"));
        assert!(!matches_with_prefix("rdf:li", "RDF", "li"));
    }

    #[test]
    fn test_resolve_innermost_first() {
        let mut stack = NamespaceStack::new();
        stack.push(2, "http://example.com/outer", "ex", "outer");
        let inner = stack.push(3, "http://example.com/inner", "ex", "inner");

        let (index, local) = stack.resolve("ex:prop").unwrap();
        assert_eq!(index, inner);
        assert_eq!(local, "prop");
        assert_eq!(stack.get(index).unwrap().data, "inner");
        assert_eq!(stack.resolve("other:prop"), None);
    }

    #[test]
    fn test_pop_is_lifo_by_depth() {
        let mut stack = NamespaceStack::new();
        stack.push(2, "http://example.com/a", "a", ());
        stack.push(3, "http://example.com/b", "b", ());
        stack.push(3, "http://example.com/c", "c", ());

        assert_eq!(stack.pop_at_or_below(3).unwrap().prefix, "c");
        assert_eq!(stack.pop_at_or_below(3).unwrap().prefix, "b");
        assert!(stack.pop_at_or_below(3).is_none());
        assert_eq!(stack.len(), 1);
        assert!(stack.resolve("a:x").is_some());
    }

    #[test]
    fn test_resolve_within_depth_window() {
        let mut stack = NamespaceStack::new();
        stack.push(2, "http://example.com/a", "a", ());
        stack.push(4, "http://example.com/b", "b", ());

        assert!(stack.resolve_within("b:x", 3).is_some());
        assert!(stack.resolve_within("a:x", 3).is_none());
        assert!(stack.resolve_within("a:x", 2).is_some());
    }
}
