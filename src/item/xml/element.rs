#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An owned, detached copy of an element subtree.
///
/// This is the opaque fragment handed out for schema-less content: it is
/// never converted, only copied out of the document so that it outlives the
/// reader it came from.
///
/// # Examples
///
/// ```
/// use mws_runtime::item::xml::XmlElement;
///
/// let element = XmlElement::new("Tag")
///     .attr("lang", "en")
///     .text_child("hello");
///
/// assert_eq!(element.name(), "Tag");
/// assert_eq!(element.attribute("lang"), Some("en"));
/// assert_eq!(element.text(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct XmlElement {
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    attributes: Vec<(String, String)>,
    #[cfg_attr(feature = "serde", serde(default))]
    children: Vec<XmlContent>,
}

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum XmlContent {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<XmlContent>,
    ) -> Self {
        Self {
            name,
            attributes,
            children,
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlContent::Element(child));
        self
    }

    /// Add a text child.
    pub fn text_child(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlContent::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlContent] {
        &self.children
    }

    /// Child elements only, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlContent::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element named `name`.
    pub fn element(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// Concatenated text and CDATA of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlContent::Text(text) | XmlContent::CData(text) => out.push_str(text),
                XmlContent::Element(element) => element.collect_text(out),
                XmlContent::Comment(_) => {}
            }
        }
    }
}
