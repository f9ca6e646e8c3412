//! Minimal XML element tree with a canonical byte form
//!
//! The tree keeps qualified names and attribute order as read, and drops
//! everything that does not carry meaning for metadata comparison:
//! the XML declaration, comments, processing instructions and
//! whitespace-only text between elements.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `md:KeyDescriptor`
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = utf8(start.name().as_ref())?.to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::MalformedDocument(format!("bad attribute: {e}")))?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, key: &str, value: Option<&str>) {
        let position = self.attributes.iter().position(|(k, _)| k == key);
        match (position, value) {
            (Some(i), Some(v)) => self.attributes[i].1 = v.to_string(),
            (Some(i), None) => {
                self.attributes.remove(i);
            }
            (None, Some(v)) => self.attributes.push((key.to_string(), v.to_string())),
            (None, None) => {}
        }
    }

    /// Child elements with the given local name
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(e) if e.local_name() == local_name => Some(e),
            _ => None,
        })
    }

    /// Index in `children` of the first child element with the given local name
    pub fn child_position(&self, local_name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.local_name() == local_name))
    }

    /// Concatenated text content of this element's direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Canonical serialization used to compare two documents semantically.
    ///
    /// Attributes are sorted by qualified name; empty elements are always
    /// written with an explicit end tag.
    pub fn canonical(&self) -> Vec<u8> {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out.into_bytes()
    }

    fn write_canonical(&self, out: &mut String) {
        let mut attributes: Vec<&(String, String)> = self.attributes.iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(&b.0));

        out.push('<');
        out.push_str(&self.name);
        for (key, value) in attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');

        for child in &self.children {
            match child {
                Node::Element(e) => e.write_canonical(out),
                Node::Text(t) => out.push_str(&escape(t.as_str())),
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Parse a document into its single root element
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                ensure_single_root(&root, &stack)?;
                stack.push(Element::from_start(&e)?);
            }
            Event::Empty(e) => {
                ensure_single_root(&root, &stack)?;
                let element = Element::from_start(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml already checks that end names match
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedDocument("unexpected end tag".into()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let data = e.into_inner();
                push_text(&mut stack, utf8(&data)?)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::MalformedDocument("unexpected end of document".into()));
    }

    root.ok_or_else(|| Error::MalformedDocument("document has no root element".into()))
}

fn ensure_single_root(root: &Option<Element>, stack: &[Element]) -> Result<()> {
    if root.is_some() && stack.is_empty() {
        return Err(Error::MalformedDocument(
            "document has more than one root element".into(),
        ));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None => Err(Error::MalformedDocument(
            "text outside of the root element".into(),
        )),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::MalformedDocument(format!("invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let root = parse(
            r#"<?xml version="1.0"?>
<!-- generated -->
<md:Root xmlns:md="urn:x" a="1">
    <md:Child use="signing">hello &amp; bye</md:Child>
    <Empty/>
</md:Root>"#,
        )
        .unwrap();

        assert_eq!(root.name, "md:Root");
        assert_eq!(root.local_name(), "Root");
        assert_eq!(root.attribute("a"), Some("1"));
        assert_eq!(root.children.len(), 2);

        let child = root.children_named("Child").next().unwrap();
        assert_eq!(child.attribute("use"), Some("signing"));
        assert_eq!(child.text(), "hello & bye");
        assert_eq!(root.child_position("Empty"), Some(1));
    }

    #[test]
    fn test_rejects_malformed() {
        for xml in [
            "",
            "just text",
            "<a><b></a>",
            "<a>",
            "<a/><b/>",
            "<a x=\"1\" x=\"2\"/>",
        ] {
            assert!(
                matches!(parse(xml), Err(Error::MalformedDocument(_))),
                "{xml:?} should not parse"
            );
        }
    }

    #[test]
    fn test_canonical_ignores_formatting() {
        let a = parse(r#"<r b="2" a="1"><c>x</c><d/></r>"#).unwrap();
        let b = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<r a="1"   b="2">
  <!-- note -->
  <c>x</c>
  <d></d>
</r>"#,
        )
        .unwrap();

        assert_eq!(a.canonical(), b.canonical());
        assert_eq!(
            String::from_utf8(a.canonical()).unwrap(),
            r#"<r a="1" b="2"><c>x</c><d></d></r>"#
        );
    }

    #[test]
    fn test_canonical_detects_content_change() {
        let a = parse(r#"<r><c>x</c></r>"#).unwrap();
        let b = parse(r#"<r><c>y</c></r>"#).unwrap();
        assert_ne!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_set_attribute() {
        let mut e = parse(r#"<r ID="one"/>"#).unwrap();
        e.set_attribute("ID", Some("two"));
        assert_eq!(e.attribute("ID"), Some("two"));
        e.set_attribute("ID", None);
        assert_eq!(e.attribute("ID"), None);
        e.set_attribute("ID", Some("three"));
        assert_eq!(e.attribute("ID"), Some("three"));
    }
}
