//! Main [`BaseError`] struct and its rendering

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::stack::{StackTrace, callers, effective_depth};
use crate::kinds::ErrorClass;

/// Shared handle to a previously existing error.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Separator between an error's own output and its cause in verbose mode.
pub const CAUSE_SEPARATOR: &str = "---cause---";

/// Separator used by [`BaseError::with_chain`].
pub const CHAIN_SEPARATOR: &str = "<-";

/// How [`BaseError::render`] lays out an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// `[code] message`
    #[default]
    Short,
    /// The short text as an escaped, double-quoted string.
    Quoted,
    /// Short text, then the stack trace, then the cause chain.
    Verbose,
}

/// Structured error value: a stable code, a human message and an optional
/// cause and stack trace.
///
/// Business errors (the default) are expected failures a caller can act on.
/// System errors are infrastructure failures; every wrapped error is one.
///
/// `{}` prints `[code] message`; `{:#}` prints the verbose form with the
/// stack trace and the full cause chain.
///
/// ```rust
/// use base_error::BaseError;
///
/// let err = BaseError::new("USER_NOT_FOUND", "no user with id 42");
/// assert_eq!(err.to_string(), "[USER_NOT_FOUND] no user with id 42");
/// assert!(!err.is_system_classified());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseError {
    code: String,
    #[cfg_attr(feature = "serde", serde(rename = "msg"))]
    message: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    system: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    chain: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    cause: Option<Cause>,
    #[cfg_attr(feature = "serde", serde(skip))]
    stack: Option<StackTrace>,
}

impl BaseError {
    fn build(
        code: impl Into<String>,
        message: impl Into<String>,
        system: bool,
        cause: Option<Cause>,
        stack: Option<StackTrace>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            system,
            chain: String::new(),
            cause,
            stack,
        }
    }

    /// Business error without a stack trace.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(code, message, false, None, None)
    }

    /// Business error with up to `depth` frames of the caller's stack.
    #[inline(never)]
    pub fn new_stack(code: impl Into<String>, message: impl Into<String>, depth: usize) -> Self {
        let stack = callers(0, effective_depth(depth));
        Self::build(code, message, false, None, Some(stack))
    }

    /// System error without a stack trace.
    pub fn system(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(code, message, true, None, None)
    }

    /// System error with up to `depth` frames of the caller's stack.
    #[inline(never)]
    pub fn system_stack(code: impl Into<String>, message: impl Into<String>, depth: usize) -> Self {
        let stack = callers(0, effective_depth(depth));
        Self::build(code, message, true, None, Some(stack))
    }

    /// Wrap an existing error under `code`.
    ///
    /// `None` stays `None`. The result is always system-classified, its
    /// message is the wrapped error's `Display` text and its cause is the
    /// wrapped error itself.
    pub fn wrap<E>(code: impl Into<String>, err: Option<E>) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        err.map(|err| Self::wrap_cause(code, Arc::new(err), None))
    }

    /// [`wrap`](Self::wrap) plus a stack trace of the caller.
    #[inline(never)]
    pub fn wrap_stack<E>(code: impl Into<String>, err: Option<E>, depth: usize) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err = err?;
        let stack = callers(0, effective_depth(depth));
        Some(Self::wrap_cause(code, Arc::new(err), Some(stack)))
    }

    /// Wrap an error the caller already holds a shared handle to.
    pub fn wrap_shared(code: impl Into<String>, err: Option<Cause>) -> Option<Self> {
        err.map(|err| Self::wrap_cause(code, err, None))
    }

    /// [`wrap_shared`](Self::wrap_shared) plus a stack trace of the caller.
    #[inline(never)]
    pub fn wrap_shared_stack(
        code: impl Into<String>,
        err: Option<Cause>,
        depth: usize,
    ) -> Option<Self> {
        let err = err?;
        let stack = callers(0, effective_depth(depth));
        Some(Self::wrap_cause(code, err, Some(stack)))
    }

    pub(crate) fn wrap_cause(
        code: impl Into<String>,
        cause: Cause,
        stack: Option<StackTrace>,
    ) -> Self {
        let message = cause.to_string();
        Self::build(code, message, true, Some(cause), stack)
    }

    pub(crate) fn from_parts(
        code: &str,
        message: String,
        system: bool,
        stack: Option<StackTrace>,
    ) -> Self {
        Self::build(code, message, system, None, stack)
    }

    /// Mark this error as system-classified.
    #[must_use]
    pub fn with_system(mut self) -> Self {
        self.system = true;
        self
    }

    /// Record the propagation path, joined with `<-`.
    ///
    /// ```rust
    /// use base_error::BaseError;
    ///
    /// let err = BaseError::new("E1", "boom").with_chain(["repo", "service", "handler"]);
    /// assert_eq!(err.chain(), "repo<-service<-handler");
    /// ```
    #[must_use]
    pub fn with_chain<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chain = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                chain.push_str(CHAIN_SEPARATOR);
            }
            chain.push_str(segment.as_ref());
        }
        self.chain = chain;
        self
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The chain label, empty unless [`with_chain`](Self::with_chain) was called.
    #[inline]
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// The stored classification flag: `true` for system errors.
    #[inline]
    pub fn is_system_classified(&self) -> bool {
        self.system
    }

    #[inline]
    pub fn class(&self) -> ErrorClass {
        if self.system {
            ErrorClass::System
        } else {
            ErrorClass::Business
        }
    }

    /// The wrapped error, if this value was built by a `wrap*` constructor.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The shared handle to the wrapped error.
    pub fn cause_shared(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// The captured stack trace, if a `*_stack` constructor was used.
    #[inline]
    pub fn stack_trace(&self) -> Option<&StackTrace> {
        self.stack.as_ref()
    }

    /// `[code] message`
    pub fn text(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }

    /// Render in the given mode.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Short => self.to_string(),
            RenderMode::Quoted => format!("{:?}", self.text()),
            RenderMode::Verbose => format!("{self:#}"),
        }
    }
}

impl StdError for BaseError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !f.alternate() {
            return Ok(());
        }

        if let Some(stack) = &self.stack {
            write!(f, "{stack:#}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\n{CAUSE_SEPARATOR}\n{cause:#}")?;
        }
        Ok(())
    }
}
