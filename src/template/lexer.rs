//! Template lexer
//!
//! First pass of preprocessing: split raw template text into literal text,
//! control markers and build-comment delimiters. No rewriting happens here.
//!
//! Delimiters are matched literally. A build comment opens with `<!--#` and
//! closes with `#-->`, the `#` flush against the comment characters; `<!-- #`
//! is ordinary text.

/// Control-block marker; stands for both `{%` and `%}`
pub const MARKER: &str = "%%";

/// Opening delimiter of a build-time comment
pub const COMMENT_OPEN: &str = "<!--#";

/// Closing delimiter of a build-time comment
pub const COMMENT_CLOSE: &str = "#-->";

/// One lexical unit, with the 1-based line it starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Marker { line: usize },
    CommentOpen { line: usize },
    CommentClose { line: usize },
}

impl Token<'_> {
    /// Source text the token was read from
    pub fn as_str(&self) -> &str {
        match self {
            Token::Text(text) => text,
            Token::Marker { .. } => MARKER,
            Token::CommentOpen { .. } => COMMENT_OPEN,
            Token::CommentClose { .. } => COMMENT_CLOSE,
        }
    }
}

/// Split `source` into tokens
///
/// Concatenating `as_str()` of every token reproduces `source` exactly.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut text_start = 0;
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];
        let delimiter = if rest.starts_with(COMMENT_OPEN) {
            Some((Token::CommentOpen { line }, COMMENT_OPEN.len()))
        } else if rest.starts_with(COMMENT_CLOSE) {
            Some((Token::CommentClose { line }, COMMENT_CLOSE.len()))
        } else if rest.starts_with(MARKER) {
            Some((Token::Marker { line }, MARKER.len()))
        } else {
            None
        };

        match delimiter {
            Some((token, len)) => {
                if text_start < pos {
                    tokens.push(Token::Text(&source[text_start..pos]));
                }
                tokens.push(token);
                pos += len;
                text_start = pos;
            }
            None => {
                // rest is non-empty, so there is a next char
                let c = rest.chars().next().unwrap_or_default();
                if c == '\n' {
                    line += 1;
                }
                pos += c.len_utf8();
            }
        }
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}
