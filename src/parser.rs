//! XML text to [`XmlNode`] tree.

use crate::config::FlattenConfig;
use crate::error::{Error, Result};
use crate::model::XmlNode;
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An element still waiting for its end tag.
struct OpenElement {
    node: XmlNode,
    text: String,
}

impl OpenElement {
    fn finish(mut self) -> XmlNode {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            self.node.text = Some(trimmed.to_string());
        }
        self.node
    }
}

/// Parse an XML document into its root element.
///
/// Comments, processing instructions, the XML declaration and DOCTYPE are
/// skipped. Entity and character references are decoded. The document must
/// have exactly one root element and every element must be closed.
///
/// # Example
///
/// ```
/// use xml2table::{parser::parse_str, FlattenConfig};
///
/// let root = parse_str("<a x=\"1\"><b>t</b></a>", &FlattenConfig::default())?;
/// assert_eq!(root.name, "a");
/// assert_eq!(root.children[0].text.as_deref(), Some("t"));
/// # Ok::<(), xml2table::Error>(())
/// ```
pub fn parse_str(xml: &str, config: &FlattenConfig) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::XmlParse(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                ensure_single_root(&root, &reader)?;
                let node = element_from_start(&e, config, &reader)?;
                stack.push(OpenElement {
                    node,
                    text: String::new(),
                });
            }
            Event::Empty(e) => {
                ensure_single_root(&root, &reader)?;
                let node = element_from_start(&e, config, &reader)?;
                attach(node, &mut stack, &mut root);
            }
            Event::End(_) => {
                let open = stack.pop().ok_or_else(|| {
                    Error::XmlParse(format!(
                        "unexpected end tag (at byte {})",
                        reader.buffer_position()
                    ))
                })?;
                attach(open.finish(), &mut stack, &mut root);
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| {
                    Error::XmlParse(format!("{} (at byte {})", err, reader.buffer_position()))
                })?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(Error::XmlParse(format!(
                            "text outside the root element (at byte {})",
                            reader.buffer_position()
                        )))
                    }
                }
            }
            Event::CData(e) => match stack.last_mut() {
                Some(open) => open.text.push_str(&String::from_utf8_lossy(&e)),
                None => {
                    return Err(Error::XmlParse(format!(
                        "CDATA outside the root element (at byte {})",
                        reader.buffer_position()
                    )))
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::XmlParse(format!(
            "unclosed element <{}> at end of input",
            open.node.name
        )));
    }

    let root = root.ok_or_else(|| Error::XmlParse("no root element found".to_string()))?;
    debug!(
        "parsed <{}> with {} elements, depth {}",
        root.name,
        root.element_count(),
        root.depth()
    );
    Ok(root)
}

fn ensure_single_root(root: &Option<XmlNode>, reader: &Reader<&[u8]>) -> Result<()> {
    if root.is_some() {
        return Err(Error::XmlParse(format!(
            "junk after document element (at byte {})",
            reader.buffer_position()
        )));
    }
    Ok(())
}

/// Hand a finished element to its parent, or make it the root.
fn attach(node: XmlNode, stack: &mut [OpenElement], root: &mut Option<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(node),
        None => *root = Some(node),
    }
}

fn element_from_start(
    start: &BytesStart<'_>,
    config: &FlattenConfig,
    reader: &Reader<&[u8]>,
) -> Result<XmlNode> {
    let qname = start.name();
    let name = if config.strip_namespaces {
        String::from_utf8_lossy(qname.local_name().as_ref()).into_owned()
    } else {
        String::from_utf8_lossy(qname.as_ref()).into_owned()
    };

    let mut node = XmlNode::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            Error::XmlParse(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }

        let attr_name = if config.strip_namespaces {
            String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned()
        } else {
            String::from_utf8_lossy(key).into_owned()
        };
        let value = attr.unescape_value().map_err(|e| {
            Error::XmlParse(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        node.attributes.push((attr_name, value.into_owned()));
    }

    Ok(node)
}
