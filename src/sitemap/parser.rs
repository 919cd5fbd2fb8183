//! Strict XML parsing of sitemap bodies, with one repair attempt
//!
//! quick-xml never expands entities declared in a DTD and never resolves
//! external entities: `<!DOCTYPE>` content is skipped, and any entity other
//! than the five predefined ones or a character reference fails the parse.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Reasons a body could not be parsed as XML
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML syntax error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid entity or character reference: {0}")]
    Entity(String),

    #[error("Malformed document: {0}")]
    Structure(String),
}

/// Minimal element tree produced by [`parse_xml`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified tag name as written, e.g. `sitemap` or `sm:sitemap`
    pub name: String,
    /// Concatenated direct text content (entities decoded)
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        for attr in start.attributes() {
            attr.map_err(|e| ParseError::Structure(format!("invalid attribute: {}", e)))?;
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Self::default()
        })
    }
}

/// Parses a body into an element tree
///
/// Fails on syntax errors, mismatched or unclosed tags, unknown entities,
/// content outside the root element, or a missing root element.
pub fn parse_xml(body: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::Structure("multiple root elements".to_string()));
                }
                stack.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::Structure("unmatched end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::Entity(e.to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ParseError::Structure(
                            "text outside the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DTDs carry
            // nothing we use
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Structure(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ParseError::Structure("no root element".to_string()))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ParseError::Structure("multiple root elements".to_string())),
    }
    Ok(())
}

/// Parses a body, retrying once after HTML-entity unescaping
///
/// The usual cause of failure is an HTML entity (or a character reference
/// missing its `;`) written inside a `<loc>`. The repair pass decodes every
/// HTML entity in the raw body and parses again; if that also fails, the
/// second error is returned.
pub fn parse_with_repair(body: &str) -> Result<XmlElement, ParseError> {
    match parse_xml(body) {
        Ok(root) => Ok(root),
        Err(e) => {
            tracing::error!("Error parsing sitemap: {}", e);
            let repaired = html_escape::decode_html_entities(body);
            parse_xml(&repaired)
        }
    }
}

/// Collects child sitemap locations from a parsed document
///
/// Walks the root's children: an element whose tag ends with `sitemap`
/// contributes the text of its first child element; an element whose tag ends
/// with `sitemapindex` is walked one level further for nested `sitemap`
/// entries. `url` entries of a `urlset` contribute nothing.
pub fn extract_locations(root: &XmlElement) -> Vec<String> {
    let mut locations = Vec::new();

    for child in &root.children {
        if child.name.ends_with("sitemap") {
            push_first_child_text(child, &mut locations);
        } else if child.name.ends_with("sitemapindex") {
            for nested in child.children.iter().filter(|n| n.name.ends_with("sitemap")) {
                push_first_child_text(nested, &mut locations);
            }
        }
    }

    locations
}

fn push_first_child_text(entry: &XmlElement, locations: &mut Vec<String>) {
    if let Some(first) = entry.children.first() {
        let text = first.text.trim();
        if !text.is_empty() {
            locations.push(text.to_string());
        }
    }
}
