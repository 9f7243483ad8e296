//! Template preprocessor
//!
//! Second pass: reassemble lexer tokens into text the render engine accepts.
//!
//! - `%%` markers alternate between `{%` and `%}` in document order.
//! - `<!--# ... #-->` build comments are removed with everything inside them.
//!   When a build comment is the only thing on its line, the leading
//!   indentation and the newline after it go too, so a commented-out line
//!   leaves no blank line behind.
//! - A `#-->` outside a build comment is ordinary text.
//! - A literal `{%` in text (outside blocks and `{{ }}` expressions) is
//!   emitted as an expression printing `{%`, so it reaches the output as-is.

use thiserror::Error;

use super::lexer::{tokenize, Token};

/// Engine block opener
const BLOCK_OPEN: &str = "{%";
/// Engine block closer
const BLOCK_CLOSE: &str = "%}";
/// Engine expression printing a literal block opener
const LITERAL_BLOCK_OPEN: &str = "{{ \"{%\" }}";

/// Preprocessing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// Odd number of `%%` markers; `line` is the marker left open
    #[error("unbalanced '%%' marker in template '{template}' at line {line}")]
    UnbalancedMarker { template: String, line: usize },

    /// `<!--#` without a matching `#-->`
    #[error("unterminated build comment in template '{template}' opened at line {line}")]
    UnterminatedComment { template: String, line: usize },
}

/// Rewrite `source` into engine syntax
///
/// `template` names the template in error messages.
pub fn preprocess(template: &str, source: &str) -> Result<String, PreprocessError> {
    let mut out = String::with_capacity(source.len());
    let mut open_marker: Option<usize> = None;
    // (line, whether the comment started its own line)
    let mut open_comment: Option<(usize, bool)> = None;
    let mut trim_next_newline = false;
    let mut in_expression = false;

    for token in tokenize(source) {
        if let Some((_, own_line)) = open_comment {
            if let Token::CommentClose { .. } = token {
                open_comment = None;
                trim_next_newline = own_line;
            }
            continue;
        }

        match token {
            Token::Text(text) => {
                let text = if trim_next_newline {
                    text.strip_prefix("\r\n")
                        .or_else(|| text.strip_prefix('\n'))
                        .unwrap_or(text)
                } else {
                    text
                };
                if open_marker.is_some() {
                    out.push_str(text);
                } else {
                    push_text(&mut out, text, &mut in_expression);
                }
            }
            Token::Marker { line } => match open_marker.take() {
                Some(_) => out.push_str(BLOCK_CLOSE),
                None => {
                    out.push_str(BLOCK_OPEN);
                    open_marker = Some(line);
                }
            },
            Token::CommentOpen { line } => {
                let own_line = strip_line_indent(&mut out);
                open_comment = Some((line, own_line));
            }
            Token::CommentClose { .. } => out.push_str(token.as_str()),
        }
        trim_next_newline = false;
    }

    if let Some((line, _)) = open_comment {
        return Err(PreprocessError::UnterminatedComment {
            template: template.to_string(),
            line,
        });
    }
    if let Some(line) = open_marker {
        return Err(PreprocessError::UnbalancedMarker {
            template: template.to_string(),
            line,
        });
    }
    Ok(out)
}

/// Copy template text, rewriting `{%` that is not inside a `{{ }}` expression
fn push_text(out: &mut String, text: &str, in_expression: &mut bool) {
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if !*in_expression && rest.starts_with("{{") {
            out.push_str("{{");
            *in_expression = true;
            rest = &rest[2..];
        } else if *in_expression && rest.starts_with("}}") {
            out.push_str("}}");
            *in_expression = false;
            rest = &rest[2..];
        } else if !*in_expression && rest.starts_with(BLOCK_OPEN) {
            out.push_str(LITERAL_BLOCK_OPEN);
            rest = &rest[BLOCK_OPEN.len()..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
}

/// Drop spaces and tabs between the last newline and the end of `out` when
/// nothing else sits there. Returns whether the current line is now empty.
fn strip_line_indent(out: &mut String) -> bool {
    let line_start = out.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let blank = out[line_start..].chars().all(|c| c == ' ' || c == '\t');
    if blank {
        out.truncate(line_start);
    }
    blank
}
