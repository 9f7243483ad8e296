//! XML well-formedness check for rendered documents
//!
//! Schema validation is out of scope; this only guarantees that what is written
//! parses: matching tags, one root element, valid attributes and entities.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Where and why a document is not well-formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlProblem {
    /// 1-based line of the offending position
    pub line: usize,
    pub message: String,
}

/// Check that `xml` is a well-formed document
pub fn check_well_formed(xml: &str) -> Result<(), XmlProblem> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;

    let mut depth: usize = 0;
    let mut roots: usize = 0;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| problem(xml, reader.error_position(), e.to_string()))?;

        match event {
            Event::Start(start) => {
                check_attributes(&start)
                    .map_err(|message| problem(xml, reader.buffer_position(), message))?;
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(empty) => {
                check_attributes(&empty)
                    .map_err(|message| problem(xml, reader.buffer_position(), message))?;
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    problem(xml, reader.buffer_position(), "unmatched closing tag".to_string())
                })?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| problem(xml, reader.buffer_position(), e.to_string()))?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(problem(
                        xml,
                        reader.buffer_position(),
                        "text outside the root element".to_string(),
                    ));
                }
            }
            Event::Eof => break,
            _ => {}
        }

        if roots > 1 {
            return Err(problem(
                xml,
                reader.buffer_position(),
                "more than one root element".to_string(),
            ));
        }
    }

    if depth > 0 {
        return Err(problem(xml, reader.buffer_position(), "unclosed element".to_string()));
    }
    if roots == 0 {
        return Err(XmlProblem {
            line: 1,
            message: "document has no root element".to_string(),
        });
    }
    Ok(())
}

/// Attributes parse, are not duplicated, and their entities resolve
fn check_attributes(tag: &BytesStart<'_>) -> Result<(), String> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        attr.unescape_value().map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn problem(xml: &str, position: u64, message: String) -> XmlProblem {
    let end = usize::try_from(position).unwrap_or(xml.len()).min(xml.len());
    let line = 1 + xml.as_bytes()[..end].iter().filter(|b| **b == b'\n').count();
    XmlProblem { line, message }
}
