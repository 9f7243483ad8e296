//! Renderer
//!
//! Evaluates a preprocessed template against a serializable context with
//! minijinja, then checks that the result is well-formed XML.
//!
//! Engine settings: `trim_blocks` and `lstrip_blocks` on, auto-escaping off
//! (templates use the `xml` filter), undefined values are errors. Engine
//! comments are `<!--# ... #-->`, so `{#` in XML text stays literal.
//!
//! Helpers available to templates:
//! - `timestamp()` / `timestamp(fmt)`: current UTC time from the renderer's clock
//! - `hash_id()`: `_` followed by seven hex digits, unique per call
//! - `|xml`: escape for element text and attribute values

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::SecondsFormat;
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::escaping::escape_xml;
use super::lexer::{COMMENT_CLOSE, COMMENT_OPEN};
use super::wellformed::check_well_formed;
use super::PreparedTemplate;
use crate::domain::entities::PackageContext;
use crate::domain::ports::{Clock, SystemClock};
use crate::domain::value_objects::ContentDigest;

/// Rendering failures, always naming the template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The template text is not valid engine syntax
    #[error("syntax error in template '{template}'{}: {message}", at_line(.line))]
    TemplateSyntax {
        template: String,
        line: Option<usize>,
        message: String,
    },

    /// Evaluation failed (missing or wrong-shaped context value, bad helper call)
    #[error("cannot render template '{template}'{}: {message}", at_line(.line))]
    Render {
        template: String,
        line: Option<usize>,
        message: String,
    },

    /// The rendered output is not well-formed XML
    #[error("template '{template}' produced malformed XML at output line {line}: {message}")]
    MalformedXml {
        template: String,
        line: usize,
        message: String,
    },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Renders prepared templates; cheap to clone
#[derive(Debug, Clone)]
pub struct Renderer {
    clock: Arc<dyn Clock>,
    counter: Arc<AtomicU64>,
    check_xml: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Renderer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            counter: Arc::new(AtomicU64::new(0)),
            check_xml: true,
        }
    }

    /// Renderer whose helpers read the context's clock
    pub fn for_context(context: &PackageContext) -> Self {
        Self::new(context.clock())
    }

    /// Skip the well-formedness check (for non-XML previews)
    pub fn without_xml_check(mut self) -> Self {
        self.check_xml = false;
        self
    }

    /// Render `template` against `context`
    pub fn render<C: Serialize + ?Sized>(
        &self,
        template: &PreparedTemplate,
        context: &C,
    ) -> Result<String, RenderError> {
        let env = self
            .environment()
            .map_err(|e| engine_error(template.name(), &e))?;
        let compiled = env
            .template_from_named_str(template.name(), template.source())
            .map_err(|e| engine_error(template.name(), &e))?;

        let output = compiled
            .render(Value::from_serialize(context))
            .map_err(|e| engine_error(template.name(), &e))?;

        if self.check_xml {
            check_well_formed(&output).map_err(|problem| RenderError::MalformedXml {
                template: template.name().to_string(),
                line: problem.line,
                message: problem.message,
            })?;
        }

        info!("Rendered template '{}' ({} bytes)", template.name(), output.len());
        Ok(output)
    }

    fn environment<'source>(&self) -> Result<Environment<'source>, minijinja::Error> {
        let mut env = Environment::new();
        env.set_syntax(
            SyntaxConfig::builder()
                .comment_delimiters(COMMENT_OPEN, COMMENT_CLOSE)
                .build()?,
        );
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("xml", |value: Value| escape_xml(&value.to_string()));

        let clock = Arc::clone(&self.clock);
        env.add_function("timestamp", move |fmt: Option<String>| {
            format_timestamp(clock.as_ref(), fmt.as_deref())
        });

        let clock = Arc::clone(&self.clock);
        let counter = Arc::clone(&self.counter);
        env.add_function("hash_id", move || {
            let n = counter.fetch_add(1, Ordering::Relaxed);
            hash_id(clock.as_ref(), n)
        });

        Ok(env)
    }
}

/// `timestamp()` helper
fn format_timestamp(clock: &dyn Clock, fmt: Option<&str>) -> Result<String, minijinja::Error> {
    let now = clock.now();
    match fmt {
        None => Ok(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
        Some(fmt) => {
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("invalid timestamp format '{}'", fmt),
                ));
            }
            Ok(now.format(fmt).to_string())
        }
    }
}

/// `hash_id()` helper: `_` plus 7 hex digits of SHA-256(nanoseconds + counter)
///
/// The counter keeps ids distinct under a frozen or coarse clock.
fn hash_id(clock: &dyn Clock, counter: u64) -> String {
    let nanos = clock.now().timestamp_nanos_opt().unwrap_or_default();
    let seed = format!("{}{}", nanos, counter);
    debug!("Minting hash id from seed {}", seed);
    format!("_{}", ContentDigest::from_bytes(seed.as_bytes()).short(7))
}

fn engine_error(template: &str, err: &minijinja::Error) -> RenderError {
    let message = match err.detail() {
        Some(detail) => format!("{}: {}", err.kind(), detail),
        None => err.kind().to_string(),
    };
    if err.kind() == ErrorKind::SyntaxError {
        RenderError::TemplateSyntax {
            template: template.to_string(),
            line: err.line(),
            message,
        }
    } else {
        RenderError::Render {
            template: template.to_string(),
            line: err.line(),
            message,
        }
    }
}
