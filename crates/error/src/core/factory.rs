//! Reusable error constructors bound to a code and a message template
//!
//! A [`Factory`] is built once, usually in a `static` or at start-up, and
//! invoked many times. The template is compiled when the factory is built;
//! every call only substitutes values.
//!
//! ```rust
//! use base_error::Factory;
//!
//! let not_found = Factory::new(&["NOT_FOUND", "{} {} does not exist"]);
//! let err = not_found.make(&[&"user", &42]);
//! assert_eq!(err.to_string(), "[NOT_FOUND] user 42 does not exist");
//! ```

use std::error::Error as StdError;
use std::fmt::Display;

use tracing::trace;

use crate::core::error::{BaseError, Cause};
use crate::core::stack::{callers, effective_depth};

/// Placeholder for the next positional value.
pub const PLACEHOLDER: &str = "{}";

/// Alternative spelling of [`PLACEHOLDER`].
pub const PLACEHOLDER_ALT: &str = "%v";

/// Misuse of the factory builders. These are programming mistakes, reported
/// when the factory is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// No arguments at all.
    #[error("error factory needs at least an error code")]
    MissingCode,

    /// More than a code and a template.
    #[error("error factory takes at most a code and a message template, got {count} arguments")]
    TooManyArguments {
        /// Number of arguments supplied.
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot,
}

/// A message template compiled into literal runs and positional slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    placeholders: usize,
}

impl Template {
    /// Compile `source`. Both `{}` and `%v` mark a positional slot.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut placeholders = 0;
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            let slot = rest
                .strip_prefix(PLACEHOLDER)
                .or_else(|| rest.strip_prefix(PLACEHOLDER_ALT));
            if let Some(tail) = slot {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Slot);
                placeholders += 1;
                rest = tail;
                continue;
            }

            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                literal.push(ch);
            }
            rest = chars.as_str();
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            segments,
            placeholders,
        }
    }

    /// Number of positional slots, fixed at compile time.
    #[inline]
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Substitute `values` in order.
    ///
    /// Missing trailing values become empty strings and surplus values are
    /// ignored; formatting never fails.
    pub fn format(&self, values: &[&dyn Display]) -> String {
        if values.len() < self.placeholders {
            trace!(
                expected = self.placeholders,
                supplied = values.len(),
                "padding missing template values"
            );
        }

        let mut out = String::new();
        let mut values = values.iter();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot => {
                    if let Some(value) = values.next() {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(PLACEHOLDER)
    }
}

/// The parsed `(code)` or `(code, template)` argument pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryArgs {
    pub code: String,
    pub template: Template,
}

impl FactoryArgs {
    /// Accept exactly one argument (the code, with template `{}`) or two
    /// (code and template).
    pub fn parse(args: &[&str]) -> Result<Self, FactoryError> {
        match *args {
            [] => Err(FactoryError::MissingCode),
            [code] => Ok(Self {
                code: code.to_owned(),
                template: Template::default(),
            }),
            [code, template] => Ok(Self {
                code: code.to_owned(),
                template: Template::parse(template),
            }),
            _ => Err(FactoryError::TooManyArguments { count: args.len() }),
        }
    }
}

/// Builds [`BaseError`]s with a fixed code from a fixed template.
#[derive(Debug, Clone)]
pub struct Factory {
    code: String,
    template: Template,
    system: bool,
    depth: Option<usize>,
}

impl Factory {
    fn from_args(args: &[&str], system: bool, depth: Option<usize>) -> Result<Self, FactoryError> {
        let FactoryArgs { code, template } = FactoryArgs::parse(args)?;
        Ok(Self {
            code,
            template,
            system,
            depth: depth.map(effective_depth),
        })
    }

    /// Business-error factory from `[code]` or `[code, template]`.
    ///
    /// # Panics
    ///
    /// On any other number of arguments.
    #[track_caller]
    pub fn new(args: &[&str]) -> Self {
        match Self::try_new(args) {
            Ok(factory) => factory,
            Err(err) => panic!("{err}"),
        }
    }

    /// Non-panicking [`new`](Self::new).
    pub fn try_new(args: &[&str]) -> Result<Self, FactoryError> {
        Self::from_args(args, false, None)
    }

    /// Business-error factory that captures `depth` frames per error.
    ///
    /// # Panics
    ///
    /// On any number of arguments other than one or two.
    #[track_caller]
    pub fn stack(depth: usize, args: &[&str]) -> Self {
        match Self::from_args(args, false, Some(depth)) {
            Ok(factory) => factory,
            Err(err) => panic!("{err}"),
        }
    }

    /// System-error factory.
    ///
    /// # Panics
    ///
    /// On any number of arguments other than one or two.
    #[track_caller]
    pub fn system(args: &[&str]) -> Self {
        match Self::from_args(args, true, None) {
            Ok(factory) => factory,
            Err(err) => panic!("{err}"),
        }
    }

    /// System-error factory that captures `depth` frames per error.
    ///
    /// # Panics
    ///
    /// On any number of arguments other than one or two.
    #[track_caller]
    pub fn system_stack(depth: usize, args: &[&str]) -> Self {
        match Self::from_args(args, true, Some(depth)) {
            Ok(factory) => factory,
            Err(err) => panic!("{err}"),
        }
    }

    /// Typed constructor; cannot fail.
    pub fn with_template(code: impl Into<String>, template: &str) -> Self {
        Self {
            code: code.into(),
            template: Template::parse(template),
            system: false,
            depth: None,
        }
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Whether produced errors are system-classified.
    #[inline]
    pub fn produces_system(&self) -> bool {
        self.system
    }

    /// Frames captured per error, if any.
    #[inline]
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Build a fresh error from `values`.
    #[inline(never)]
    pub fn make(&self, values: &[&dyn Display]) -> BaseError {
        let message = self.template.format(values);
        // No closure here: an `Option::map` frame would end the capture scan.
        let stack = match self.depth {
            Some(depth) => Some(callers(0, depth)),
            None => None,
        };
        BaseError::from_parts(&self.code, message, self.system, stack)
    }
}

/// Wraps errors under a fixed code.
#[derive(Debug, Clone)]
pub struct WrapFactory {
    code: String,
    depth: Option<usize>,
}

impl WrapFactory {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            depth: None,
        }
    }

    /// Capture `depth` frames per wrapped error.
    pub fn stack(depth: usize, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            depth: Some(effective_depth(depth)),
        }
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Wrap `err`; `None` stays `None`.
    #[inline(never)]
    pub fn wrap<E>(&self, err: Option<E>) -> Option<BaseError>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err: Cause = std::sync::Arc::new(err?);
        Some(self.wrap_cause(err))
    }

    /// Wrap a shared error; `None` stays `None`.
    #[inline(never)]
    pub fn wrap_shared(&self, err: Option<Cause>) -> Option<BaseError> {
        Some(self.wrap_cause(err?))
    }

    #[inline(never)]
    fn wrap_cause(&self, err: Cause) -> BaseError {
        let stack = match self.depth {
            Some(depth) => Some(callers(0, depth)),
            None => None,
        };
        BaseError::wrap_cause(self.code.as_str(), err, stack)
    }
}
