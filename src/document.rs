//! XML document parsing
//!
//! Loads a file as text and parses it into an owned element tree that can be
//! queried by slash-separated paths without re-parsing. Acceptance is purely
//! "well-formed, or not" - no DTD or schema validation is performed.

use std::path::Path;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use crate::{Error, Result};

/// A parsed XML document: one owned tree of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlNode,
}

/// One element in the tree: name, attributes, child elements, and the
/// concatenated character data directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character data directly inside this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

impl XmlDocument {
    /// The document's root element
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Locate a descendant element by a slash-separated path.
    ///
    /// The first segment names the root element; each further segment picks
    /// the first child with that name. `find("root/item")` on
    /// `<root><item/></root>` returns the `item` element.
    pub fn find(&self, path: &str) -> Option<&XmlNode> {
        let mut segments = path.trim_matches('/').split('/');
        if segments.next()? != self.root.name {
            return None;
        }

        let mut current = &self.root;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Attribute of the element at `path`
    pub fn attribute(&self, path: &str, name: &str) -> Option<&str> {
        self.find(path)?.attribute(name)
    }
}

/// Parse the file at `path` as XML.
///
/// An unreadable file is an I/O error; anything that is not well-formed XML
/// is a parse error.
pub fn parse(path: &Path) -> Result<XmlDocument> {
    let raw = std::fs::read_to_string(path)?;
    parse_str(&raw)
}

/// Parse a string as XML into an owned document tree
pub fn parse_str(xml: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Err(e) => return Err(Error::Parse(e.to_string())),
            Ok(Event::Start(e)) => {
                if root.is_some() && stack.is_empty() {
                    return Err(Error::Parse("multiple root elements".to_string()));
                }
                stack.push(node_from_start(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let node = node_from_start(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(node) => attach(&mut stack, &mut root, node)?,
                None => return Err(Error::Parse("unexpected closing tag".to_string())),
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                if let Some(node) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        node.text.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::Eof) => break,
            // declarations, comments, processing instructions
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::Parse("unexpected end of document".to_string()));
    }

    match root {
        Some(root) => Ok(XmlDocument { root }),
        None => Err(Error::Parse("document has no root element".to_string())),
    }
}

fn node_from_start(e: &BytesStart) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Attach a completed element to its parent, or install it as the root.
fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::Parse("multiple root elements".to_string()));
    }
    *root = Some(node);
    Ok(())
}
