//! XML escaping for rendered values
//!
//! Template output is XML, so values taken from the context must be escaped
//! before they land in element text or attribute values. Auto-escaping in the
//! engine is off; templates apply the `xml` filter explicitly.

/// Escape a string for XML element text and attribute values
///
/// Escapes: ampersand, angle brackets, double and single quotes
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove characters XML 1.0 cannot carry
///
/// Control characters other than tab, newline and carriage return are dropped,
/// as are the non-characters U+FFFE and U+FFFF.
pub fn legalize_xml_text(s: &str) -> String {
    s.chars().filter(|c| is_xml_char(*c)).collect()
}

fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => !c.is_control(),
    }
}

/// Legalize then escape
pub fn xml_text(s: &str) -> String {
    escape_xml(&legalize_xml_text(s))
}
