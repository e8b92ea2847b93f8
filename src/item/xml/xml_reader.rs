use std::cell::{Cell, RefCell};
use std::io::Read;

use log::{debug, error};

use crate::core::value::XmlValue;
use crate::error::{MwsError, Result};

use super::document::{Document, NodeId, ParseOptions, XmlNode};
use super::element::XmlElement;

/// A builder for creating cursor readers.
///
/// # Examples
///
/// ```
/// use mws_runtime::item::xml::MwsXmlReaderBuilder;
///
/// let xml = "<Result>\n  <Name>  spaced  </Name>\n</Result>";
/// let reader = MwsXmlReaderBuilder::new()
///     .preserve_whitespace(false)
///     .from_text(xml)
///     .unwrap();
///
/// let name: String = reader.read("Name").unwrap();
/// assert_eq!(name, "  spaced  ");
/// ```
#[derive(Debug, Default)]
pub struct MwsXmlReaderBuilder {
    options: ParseOptions,
}

impl MwsXmlReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep white-space-only text nodes in the tree.
    ///
    /// They then take part in the sibling chain: [`MwsXmlReader::read_value`]
    /// can land on them and [`MwsXmlReader::read`] steps over them.
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.options.preserve_whitespace = preserve;
        self
    }

    /// Creates a reader over XML text.
    pub fn from_text(self, xml: &str) -> Result<MwsXmlReader> {
        let document = Document::parse_with(xml, self.options)?;
        Ok(MwsXmlReader::with_document(document))
    }

    /// Creates a reader over UTF-8 encoded XML bytes.
    pub fn from_slice(self, xml: &[u8]) -> Result<MwsXmlReader> {
        let text = std::str::from_utf8(xml).map_err(|e| {
            error!("XML input is not valid UTF-8: {}", e);
            MwsError::MalformedDocument(format!("invalid UTF-8: {}", e))
        })?;
        self.from_text(text)
    }

    /// Creates a reader by loading a whole document from `reader`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mws_runtime::item::xml::MwsXmlReaderBuilder;
    /// use std::io::Cursor;
    ///
    /// let input = Cursor::new("<Result><Count>3</Count></Result>");
    /// let reader = MwsXmlReaderBuilder::new().from_reader(input).unwrap();
    /// assert_eq!(reader.read::<u32>("Count").unwrap(), 3);
    /// ```
    pub fn from_reader<R: Read>(self, mut reader: R) -> Result<MwsXmlReader> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| {
            error!("Failed to read XML input: {}", e);
            MwsError::Io(e)
        })?;
        self.from_slice(&bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    container: NodeId,
    /// Next sibling to examine; `None` only when the container is empty.
    cursor: Option<NodeId>,
}

/// A cursor-driven reader that maps an XML tree onto typed objects.
///
/// The reader keeps a *container* (the element being read into) and a
/// *cursor* (the next child of the container to examine). By-name reads
/// search the container's children starting at the cursor, wrap around to
/// the first child at the end of the chain, and stop after one full lap.
/// A match moves the cursor past it, so fields read in document order are
/// each found on the first node examined.
///
/// Entering a nested object pushes a new frame; the frame is popped by a
/// scope guard when the nested read returns, including when it fails.
///
/// The cursor state lives in `Cell`/`RefCell`, so the reader is not `Sync`:
/// one reader serves one logical object graph on one thread.
///
/// # Examples
///
/// ```
/// use mws_runtime::item::xml::MwsXmlReader;
///
/// let xml = r#"
/// <GetServiceStatusResult>
///   <Status>GREEN</Status>
///   <Timestamp>2024-03-01T12:00:00Z</Timestamp>
///   <MessageId>173964729I</MessageId>
/// </GetServiceStatusResult>"#;
///
/// let reader = MwsXmlReader::new(xml).unwrap();
/// let status: String = reader.read("Status").unwrap();
/// let message_id: String = reader.read("MessageId").unwrap();
/// let missing: Option<String> = reader.read("Messages").unwrap();
///
/// assert_eq!(status, "GREEN");
/// assert_eq!(message_id, "173964729I");
/// assert!(missing.is_none());
/// ```
#[derive(Debug)]
pub struct MwsXmlReader {
    document: Document,
    current: Cell<Frame>,
    parents: RefCell<Vec<Frame>>,
}

impl MwsXmlReader {
    /// Parse `xml` and position the reader inside its root element.
    pub fn new(xml: &str) -> Result<Self> {
        MwsXmlReaderBuilder::new().from_text(xml)
    }

    pub fn from_slice(xml: &[u8]) -> Result<Self> {
        MwsXmlReaderBuilder::new().from_slice(xml)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        MwsXmlReaderBuilder::new().from_reader(reader)
    }

    /// Position a reader inside the root element of an already parsed tree.
    pub fn with_document(document: Document) -> Self {
        let root = document.root();
        let frame = Frame {
            container: root.id(),
            cursor: root.first_child().map(|child| child.id()),
        };
        Self {
            document,
            current: Cell::new(frame),
            parents: RefCell::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The element currently being read into.
    pub fn container(&self) -> XmlNode<'_> {
        self.document.node(self.current.get().container)
    }

    /// The next child of the container to be examined.
    pub fn cursor(&self) -> Option<XmlNode<'_>> {
        self.current.get().cursor.map(|id| self.document.node(id))
    }

    /// Number of nested objects currently entered; 0 inside the root.
    pub fn depth(&self) -> usize {
        self.parents.borrow().len()
    }

    /// Read the first child element named `name`, searching from the cursor.
    ///
    /// Returns `T::default()` when the container has no content or no child
    /// matches; the cursor is left where it was in that case.
    pub fn read<T: XmlValue + Default>(&self, name: &str) -> Result<T> {
        let frame = self.current.get();
        let Some(start) = frame.cursor else {
            debug!("<{}> has no content, skipping '{}'", self.tag(frame), name);
            return Ok(T::default());
        };

        let mut node = start;
        loop {
            if self.document.node(node).is_named(name) {
                debug!("Found <{}> in <{}>", name, self.tag(frame));
                let value = self.read_object::<T>(node)?;
                self.move_cursor(self.next_or_first(frame.container, node));
                return Ok(value);
            }
            node = self.next_or_first(frame.container, node);
            if node == start {
                break;
            }
        }

        debug!("No <{}> in <{}>", name, self.tag(frame));
        Ok(T::default())
    }

    /// Read every child element named `name`, in document order.
    ///
    /// Returns `None` when the container has no content at all, which is
    /// distinct from `Some(vec![])` for a container without matches.
    pub fn read_list<T: XmlValue>(&self, name: &str) -> Result<Option<Vec<T>>> {
        let frame = self.current.get();
        let Some(start) = frame.cursor else {
            debug!("<{}> has no content, skipping list '{}'", self.tag(frame), name);
            return Ok(None);
        };

        let matches = self.matching_children(frame, start, name);
        debug!(
            "Found {} <{}> in <{}>",
            matches.len(),
            name,
            self.tag(frame)
        );

        let mut items = Vec::with_capacity(matches.len());
        for &node in &matches {
            items.push(self.read_object::<T>(node)?);
        }
        if let Some(&last) = matches.last() {
            self.move_cursor(self.next_or_first(frame.container, last));
        }
        Ok(Some(items))
    }

    /// Read the `member_name` lists of every wrapper element named `name`,
    /// concatenated in document order.
    ///
    /// # Examples
    ///
    /// ```
    /// use mws_runtime::item::xml::MwsXmlReader;
    ///
    /// let xml = r#"
    /// <Result>
    ///   <ASINList><ASIN>B001</ASIN><ASIN>B002</ASIN></ASINList>
    ///   <ASINList><ASIN>B003</ASIN></ASINList>
    /// </Result>"#;
    ///
    /// let reader = MwsXmlReader::new(xml).unwrap();
    /// let asins: Vec<String> = reader.read_list_members("ASINList", "ASIN").unwrap().unwrap();
    /// assert_eq!(asins, vec!["B001", "B002", "B003"]);
    /// ```
    pub fn read_list_members<T: XmlValue>(
        &self,
        name: &str,
        member_name: &str,
    ) -> Result<Option<Vec<T>>> {
        let frame = self.current.get();
        let Some(start) = frame.cursor else {
            debug!("<{}> has no content, skipping list '{}'", self.tag(frame), name);
            return Ok(None);
        };

        let wrappers = self.matching_children(frame, start, name);
        let mut items = Vec::new();
        for &wrapper in &wrappers {
            let _scope = self.begin_object(Some(wrapper))?;
            if let Some(inner) = self.read_list::<T>(member_name)? {
                items.extend(inner);
            }
        }
        if let Some(&last) = wrappers.last() {
            self.move_cursor(self.next_or_first(frame.container, last));
        }
        Ok(Some(items))
    }

    /// Copy every direct child element of the container, in document order.
    pub fn read_any(&self) -> Vec<XmlElement> {
        self.container()
            .children()
            .filter_map(|child| child.to_element())
            .collect()
    }

    /// Convert the attribute `name` of the current container.
    pub fn read_attribute<T: XmlValue>(&self, name: &str) -> Result<T> {
        let container = self.container();
        match container.attribute(name) {
            Some(value) => T::from_xml_text(value).inspect_err(|e| {
                error!(
                    "Failed to convert attribute '{}' of <{}>: {}",
                    name,
                    container.name().unwrap_or_default(),
                    e
                );
            }),
            None => Err(MwsError::MissingAttribute(name.to_string())),
        }
    }

    /// Convert the text node under the cursor.
    pub fn read_value<T: XmlValue>(&self) -> Result<T> {
        match self.cursor() {
            Some(node) if node.is_text() => T::from_xml_text(node.text().unwrap_or_default()),
            _ => Err(MwsError::NotTextNode),
        }
    }

    /// Run `read` with `node` as the container, restoring the current frame
    /// afterwards.
    ///
    /// `node` must come from this reader's own document.
    pub(crate) fn read_nested<F>(&self, node: XmlNode<'_>, read: F) -> Result<()>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        if !node.belongs_to(&self.document) {
            error!("Node <{}> belongs to another document", node.name().unwrap_or_default());
            return Err(MwsError::NullNode);
        }
        let _scope = self.begin_object(Some(node.id()))?;
        read(self)
    }

    fn read_object<T: XmlValue>(&self, node: NodeId) -> Result<T> {
        T::from_xml_node(self, self.document.node(node)).inspect_err(|e| {
            error!(
                "Failed to read <{}>: {}",
                self.document.node(node).name().unwrap_or_default(),
                e
            );
        })
    }

    fn begin_object(&self, node: Option<NodeId>) -> Result<ObjectScope<'_>> {
        let node = node
            .and_then(|id| self.document.get(id))
            .filter(|node| node.is_element())
            .ok_or(MwsError::NullNode)?;

        let frame = Frame {
            container: node.id(),
            cursor: node.first_child().map(|child| child.id()),
        };
        let mut parents = self.parents.borrow_mut();
        parents.push(self.current.get());
        self.current.set(frame);
        debug!(
            "Entered <{}> at depth {}",
            node.name().unwrap_or_default(),
            parents.len()
        );
        Ok(ObjectScope { reader: self })
    }

    fn end_object(&self) {
        let exited = self.current.get();
        if let Some(mut parent) = self.parents.borrow_mut().pop() {
            parent.cursor = Some(exited.container);
            self.current.set(parent);
            debug!("Left <{}>", self.tag(exited));
        }
    }

    /// Element children named `name` met on one lap from `start`, in
    /// document order.
    fn matching_children(&self, frame: Frame, start: NodeId, name: &str) -> Vec<NodeId> {
        let mut matches = Vec::new();
        let mut node = start;
        loop {
            if self.document.node(node).is_named(name) {
                matches.push(node);
            }
            node = self.next_or_first(frame.container, node);
            if node == start {
                break;
            }
        }
        matches.sort_unstable();
        matches
    }

    fn next_or_first(&self, container: NodeId, node: NodeId) -> NodeId {
        self.document
            .node(node)
            .next_sibling()
            .or_else(|| self.document.node(container).first_child())
            .map_or(node, |next| next.id())
    }

    fn move_cursor(&self, cursor: NodeId) {
        let mut frame = self.current.get();
        frame.cursor = Some(cursor);
        self.current.set(frame);
    }

    fn tag(&self, frame: Frame) -> &str {
        self.document
            .node(frame.container)
            .name()
            .unwrap_or_default()
    }
}

/// Leaves the entered object when dropped.
struct ObjectScope<'r> {
    reader: &'r MwsXmlReader,
}

impl Drop for ObjectScope<'_> {
    fn drop(&mut self) {
        self.reader.end_object();
    }
}
