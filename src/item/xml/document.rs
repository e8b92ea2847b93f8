use std::fmt;

use log::{debug, error};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{MwsError, Result};
use crate::item::xml::element::{XmlContent, XmlElement};

/// Options controlling how XML text is turned into a [`Document`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep text nodes that consist only of white space.
    ///
    /// Off by default: indentation between elements is dropped so that the
    /// sibling chain of a container holds only meaningful nodes.
    pub preserve_whitespace: bool,
}

/// Index of a node inside a [`Document`].
///
/// Ids are handed out in document order, so comparing two ids of the same
/// document compares their position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// The kind of a node in the parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    CData,
    Comment,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// A fully parsed, immutable XML tree.
///
/// Nodes are stored in a flat array and reference each other by index:
/// every node knows its parent, its first and last child and its next
/// sibling. The document always has exactly one root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Parse XML text with the default [`ParseOptions`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mws_runtime::item::xml::Document;
    ///
    /// let doc = Document::parse("<Order><Id>42</Id></Order>").unwrap();
    /// assert_eq!(doc.root().name(), Some("Order"));
    /// assert_eq!(doc.root().inner_text(), "42");
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, ParseOptions::default())
    }

    /// Parse XML text into a tree.
    ///
    /// Fails with [`MwsError::MalformedDocument`] if the text is not a
    /// well-formed document with a single root element.
    pub fn parse_with(xml: &str, options: ParseOptions) -> Result<Self> {
        TreeBuilder::new(options).build(xml).inspect_err(|e| {
            error!("Failed to parse XML document: {}", e);
        })
    }

    /// The root element.
    pub fn root(&self) -> XmlNode<'_> {
        self.node(self.root)
    }

    /// Look a node up by id.
    pub fn get(&self, id: NodeId) -> Option<XmlNode<'_>> {
        (id.0 < self.nodes.len()).then(|| self.node(id))
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always holds its root element, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: NodeId) -> XmlNode<'_> {
        XmlNode { document: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// A borrowed handle on one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct XmlNode<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> XmlNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        match self.data().kind {
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::CData(_) => NodeType::CData,
            NodeKind::Comment(_) => NodeType::Comment,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// True for text and CDATA nodes.
    pub fn is_text(&self) -> bool {
        matches!(self.node_type(), NodeType::Text | NodeType::CData)
    }

    /// Tag name of an element, `None` for any other node.
    pub fn name(&self) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True if this is an element whose tag is exactly `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// Own content of a text, CDATA or comment node.
    pub fn text(&self) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Text(text) | NodeKind::CData(text) | NodeKind::Comment(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let attributes: &'a [(String, String)] = match &self.document.data(self.id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        };
        attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parent(&self) -> Option<XmlNode<'a>> {
        self.data().parent.map(|id| self.document.node(id))
    }

    pub fn first_child(&self) -> Option<XmlNode<'a>> {
        self.data().first_child.map(|id| self.document.node(id))
    }

    pub fn next_sibling(&self) -> Option<XmlNode<'a>> {
        self.data().next_sibling.map(|id| self.document.node(id))
    }

    pub fn has_children(&self) -> bool {
        self.data().first_child.is_some()
    }

    pub fn children(&self) -> Children<'a> {
        Children {
            document: self.document,
            next: self.data().first_child,
        }
    }

    /// Concatenated text and CDATA of all descendants, tags stripped.
    pub fn inner_text(&self) -> String {
        match &self.data().kind {
            NodeKind::Text(text) | NodeKind::CData(text) => text.clone(),
            NodeKind::Comment(_) => String::new(),
            NodeKind::Element { .. } => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.children() {
            match &child.data().kind {
                NodeKind::Text(text) | NodeKind::CData(text) => out.push_str(text),
                NodeKind::Element { .. } => child.collect_text(out),
                NodeKind::Comment(_) => {}
            }
        }
    }

    /// Deep copy of this element into an owned fragment.
    ///
    /// Returns `None` if the node is not an element.
    pub fn to_element(&self) -> Option<XmlElement> {
        let NodeKind::Element { name, attributes } = &self.data().kind else {
            return None;
        };
        let children = self
            .children()
            .filter_map(|child| match &child.data().kind {
                NodeKind::Element { .. } => child.to_element().map(XmlContent::Element),
                NodeKind::Text(text) => Some(XmlContent::Text(text.clone())),
                NodeKind::CData(text) => Some(XmlContent::CData(text.clone())),
                NodeKind::Comment(text) => Some(XmlContent::Comment(text.clone())),
            })
            .collect();
        Some(XmlElement::from_parts(
            name.clone(),
            attributes.clone(),
            children,
        ))
    }

    /// Whether this handle points into `document`.
    pub(crate) fn belongs_to(&self, document: &Document) -> bool {
        std::ptr::eq(self.document, document)
    }

    fn data(&self) -> &'a NodeData {
        self.document.data(self.id)
    }
}

impl PartialEq for XmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

impl Eq for XmlNode<'_> {}

impl fmt::Debug for XmlNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("XmlNode");
        debug.field("id", &self.id.0).field("type", &self.node_type());
        if let Some(name) = self.name() {
            debug.field("name", &name);
        }
        debug.finish()
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = XmlNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.document.node(self.next?);
        self.next = node.data().next_sibling;
        Some(node)
    }
}

struct TreeBuilder {
    options: ParseOptions,
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
    pending_text: String,
}

impl TreeBuilder {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            stack: Vec::new(),
            root: None,
            pending_text: String::new(),
        }
    }

    fn build(mut self, xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(format!("XML parse error: {}", e)))?;

            match event {
                Event::Start(e) => {
                    self.flush_text()?;
                    let id = self.open_element(&e)?;
                    self.stack.push(id);
                }
                Event::Empty(e) => {
                    self.flush_text()?;
                    self.open_element(&e)?;
                }
                Event::End(_) => {
                    self.flush_text()?;
                    if self.stack.pop().is_none() {
                        return Err(malformed("unexpected closing tag"));
                    }
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(e.as_ref())
                        .map_err(|e| malformed(format!("invalid UTF-8 in text: {}", e)))?;
                    let text = unescape(raw)
                        .map_err(|e| malformed(format!("invalid character data: {}", e)))?;
                    self.pending_text.push_str(&text);
                }
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(e.as_ref())
                        .map_err(|e| malformed(format!("invalid UTF-8 in reference: {}", e)))?;
                    let reference = format!("&{};", name);
                    let resolved = unescape(&reference)
                        .map_err(|e| malformed(format!("unresolved reference {}: {}", reference, e)))?;
                    self.pending_text.push_str(&resolved);
                }
                Event::CData(e) => {
                    self.flush_text()?;
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|e| malformed(format!("invalid UTF-8 in CDATA: {}", e)))?;
                    self.push_child(NodeKind::CData(text.to_string()))?;
                }
                Event::Comment(e) => {
                    self.flush_text()?;
                    if !self.stack.is_empty() {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        self.push_child(NodeKind::Comment(text))?;
                    }
                }
                Event::Eof => break,
                _ => {} // Declarations, doctypes and processing instructions carry no data
            }
        }

        self.flush_text()?;
        if !self.stack.is_empty() {
            return Err(malformed("unexpected end of input: unclosed element"));
        }
        let root = self
            .root
            .ok_or_else(|| malformed("no root element found"))?;

        debug!("Parsed XML document with {} nodes", self.nodes.len());
        Ok(Document {
            nodes: self.nodes,
            root,
        })
    }

    fn open_element(&mut self, start: &BytesStart<'_>) -> Result<NodeId> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| malformed(format!("invalid UTF-8 in tag name: {}", e)))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed(format!("invalid attribute: {}", e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| malformed(format!("invalid UTF-8 in attribute name: {}", e)))?;
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| malformed(format!("invalid UTF-8 in attribute value: {}", e)))?;
            let value = unescape(raw)
                .map_err(|e| malformed(format!("invalid attribute value: {}", e)))?;
            attributes.push((key.to_string(), value.into_owned()));
        }

        if self.stack.is_empty() && self.root.is_some() {
            return Err(malformed(format!(
                "second root element <{}> after document element",
                name
            )));
        }
        let id = self.push_child(NodeKind::Element { name, attributes })?;
        if self.root.is_none() {
            self.root = Some(id);
        }
        Ok(id)
    }

    fn flush_text(&mut self) -> Result<()> {
        if self.pending_text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending_text);
        let blank = text.trim().is_empty();
        if self.stack.is_empty() {
            if blank {
                return Ok(());
            }
            return Err(malformed("text content outside the root element"));
        }
        if blank && !self.options.preserve_whitespace {
            return Ok(());
        }
        self.push_child(NodeKind::Text(text))?;
        Ok(())
    }

    fn push_child(&mut self, kind: NodeKind) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
        });

        if let Some(parent) = parent {
            match self.nodes[parent.0].last_child {
                Some(last) => self.nodes[last.0].next_sibling = Some(id),
                None => self.nodes[parent.0].first_child = Some(id),
            }
            self.nodes[parent.0].last_child = Some(id);
        }
        Ok(id)
    }
}

fn malformed(message: impl Into<String>) -> MwsError {
    MwsError::MalformedDocument(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sibling_chain_in_document_order() {
        let doc = Document::parse("<A><B/><C>text</C><D/></A>").unwrap();
        let root = doc.root();
        assert_eq!(root.name(), Some("A"));

        let names: Vec<_> = root.children().filter_map(|n| n.name()).collect();
        assert_eq!(names, vec!["B", "C", "D"]);

        let ids: Vec<_> = root.children().map(|n| n.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let c = root.children().nth(1).unwrap();
        assert_eq!(c.parent(), Some(root));
        assert_eq!(c.next_sibling().and_then(|n| n.name()), Some("D"));
        assert_eq!(c.first_child().unwrap().node_type(), NodeType::Text);
    }

    #[test]
    fn drops_indentation_but_keeps_text() {
        let xml = "<A>\n  <B>  padded  </B>\n  <C/>\n</A>";
        let doc = Document::parse(xml).unwrap();
        let root = doc.root();
        assert_eq!(root.children().count(), 2);
        assert_eq!(root.children().next().unwrap().inner_text(), "  padded  ");

        let preserved = Document::parse_with(
            xml,
            ParseOptions {
                preserve_whitespace: true,
            },
        )
        .unwrap();
        assert_eq!(preserved.root().children().count(), 5);
    }

    #[test]
    fn resolves_entities_into_a_single_text_node() {
        let doc = Document::parse(r#"<A title="a &amp; b">x &lt; y &#65;</A>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.attribute("title"), Some("a & b"));
        assert_eq!(root.children().count(), 1);
        assert_eq!(root.inner_text(), "x < y A");
    }

    #[test]
    fn inner_text_flattens_nested_content() {
        let doc =
            Document::parse("<A>one<B>two<!-- skipped --><C>three</C></B><![CDATA[<four>]]></A>")
                .unwrap();
        assert_eq!(doc.root().inner_text(), "onetwothree<four>");
    }

    #[test]
    fn to_element_copies_the_subtree() {
        let doc = Document::parse(r#"<A><B k="v">t<C/></B></A>"#).unwrap();
        let b = doc.root().first_child().unwrap().to_element().unwrap();
        assert_eq!(b.name(), "B");
        assert_eq!(b.attribute("k"), Some("v"));
        assert_eq!(b.children().len(), 2);
        assert_eq!(b.text(), "t");

        let text = doc.root().first_child().unwrap().first_child().unwrap();
        assert!(text.to_element().is_none());
    }

    #[test]
    fn rejects_malformed_input() {
        for xml in [
            "",
            "   ",
            "<A>",
            "<A></B>",
            "<A/><B/>",
            "text<A/>",
            "<A>&undefined;</A>",
            r#"<A x="1" x="2"/>"#,
        ] {
            let result = Document::parse(xml);
            assert!(
                matches!(result, Err(MwsError::MalformedDocument(_))),
                "expected {:?} to be rejected",
                xml
            );
        }
    }

    #[test]
    fn accepts_prolog_and_trailing_comments() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- head -->\n<A/>\n<!-- tail -->\n";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root().name(), Some("A"));
        assert!(!doc.root().has_children());
        assert_eq!(doc.len(), 1);
    }
}
