//! Owned element tree read with `quick-xml`.

use std::fmt::Display;
use std::path::Path;

use quick_xml::NsReader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crc_model::{RegistryError, Result};

use crate::qname::QName;

/// One element with its resolved namespace, attributes, text, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub local: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn is(&self, name: QName<'_>) -> bool {
        name.matches(self.namespace.as_deref(), &self.local)
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed text content; `None` when empty.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// First child with the given name.
    pub fn child(&self, name: QName<'_>) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.is(name))
    }

    pub fn children_named<'s>(
        &'s self,
        name: QName<'s>,
    ) -> impl Iterator<Item = &'s XmlElement> + 's {
        self.children.iter().filter(move |child| child.is(name))
    }

    /// Text of the first child with the given name.
    pub fn child_text(&self, name: QName<'_>) -> Option<&str> {
        self.child(name).and_then(XmlElement::text)
    }

    /// Follows a path of first-matching children.
    pub fn descend(&self, path: &[QName<'_>]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, name| element.child(*name))
    }

    /// Local names of all children, in document order.
    pub fn child_locals(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.local.as_str()).collect()
    }
}

/// A parsed registry export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

fn xml_error(position: u64, error: impl Display) -> RegistryError {
    RegistryError::Xml {
        position,
        message: error.to_string(),
    }
}

fn namespace_of(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<XmlElement> {
    let position = reader.buffer_position();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| xml_error(position, error))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|error| xml_error(position, error))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(XmlElement {
        namespace,
        local: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(xml_error(position, "more than one root element")),
    }
    Ok(())
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let step = reader.read_resolved_event();
            let (resolved, event) = match step {
                Ok(pair) => pair,
                Err(error) => return Err(xml_error(reader.error_position(), error)),
            };
            let namespace = namespace_of(&resolved);
            let position = reader.buffer_position();
            match event {
                Event::Start(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    close_element(&mut stack, &mut root, element, position)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| xml_error(position, "unexpected closing tag"))?;
                    close_element(&mut stack, &mut root, element, position)?;
                }
                Event::Text(text) => {
                    let decoded = text.decode().map_err(|error| xml_error(position, error))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&decoded);
                    }
                }
                Event::CData(data) => {
                    let decoded = data.decode().map_err(|error| xml_error(position, error))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&decoded);
                    }
                }
                Event::GeneralRef(reference) => {
                    let name = reference
                        .decode()
                        .map_err(|error| xml_error(position, error))?;
                    let resolved = match reference
                        .resolve_char_ref()
                        .map_err(|error| xml_error(position, error))?
                    {
                        Some(ch) => ch.to_string(),
                        None => resolve_predefined_entity(&name)
                            .ok_or_else(|| {
                                xml_error(position, format!("unknown entity &{name};"))
                            })?
                            .to_string(),
                    };
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&resolved);
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(xml_error(
                reader.buffer_position(),
                "unexpected end of document",
            ));
        }
        let root = root.ok_or_else(|| xml_error(0, "document has no root element"))?;
        Ok(Self { root })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }
}
