//! Attach a stack trace to an error this library did not create

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{Cause, RenderMode};
use crate::core::stack::{StackTrace, callers, effective_depth};

/// An existing error paired with the caller's stack trace.
///
/// It has no code or message of its own: `{}` is the inner error's `{}`.
/// `{:#}` renders the inner error's `{:#}` followed by this trace.
#[derive(Debug, Clone)]
pub struct WithStack {
    inner: Cause,
    stack: StackTrace,
}

impl WithStack {
    /// Pair `err` with up to `depth` frames of the caller's stack.
    ///
    /// `None` stays `None`.
    #[inline(never)]
    pub fn new<E>(err: Option<E>, depth: usize) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        Some(Self::capture(Arc::new(err?), depth))
    }

    /// [`new`](Self::new) for an error behind a shared handle.
    #[inline(never)]
    pub fn shared(err: Option<Cause>, depth: usize) -> Option<Self> {
        Some(Self::capture(err?, depth))
    }

    #[inline(never)]
    pub(crate) fn capture(inner: Cause, depth: usize) -> Self {
        let stack = callers(0, effective_depth(depth));
        Self { inner, stack }
    }

    /// The wrapped error.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    pub fn cause_shared(&self) -> &Cause {
        &self.inner
    }

    #[inline]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack
    }

    /// Render in the given mode. Short and quoted forms are the inner
    /// error's text; verbose appends this trace to the inner verbose form.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Short => self.to_string(),
            RenderMode::Quoted => format!("{:?}", self.inner.to_string()),
            RenderMode::Verbose => format!("{self:#}"),
        }
    }
}

impl StdError for WithStack {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.inner)
    }
}

impl fmt::Display for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:#}{:#}", self.inner, self.stack)
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BaseError;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_none_propagates() {
        assert!(WithStack::new::<io::Error>(None, 3).is_none());
        assert!(WithStack::shared(None, 3).is_none());
    }

    #[test]
    fn test_display_delegates_to_inner() {
        let err = WithStack::new(Some(BaseError::new("E1", "x")), 2).unwrap();
        assert_eq!(err.to_string(), "[E1] x");
    }

    #[test]
    fn test_render_modes() {
        let err = WithStack::new(Some(BaseError::new("E", "a\"b")), 1).unwrap();

        assert_eq!(err.render(RenderMode::Short), "[E] a\"b");
        assert_eq!(err.render(RenderMode::Quoted), r#""[E] a\"b""#);

        let verbose = err.render(RenderMode::Verbose);
        assert!(verbose.starts_with("[E] a\"b\n"));
        assert_eq!(verbose.lines().count(), 1 + err.stack_trace().len());
    }

    #[test]
    fn test_cause_is_inner_error() {
        let err = WithStack::new(Some(io::Error::other("disk full")), 1).unwrap();
        assert_eq!(err.cause().to_string(), "disk full");
        assert!(err.cause().downcast_ref::<io::Error>().is_some());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_trace_starts_in_test() {
        let err = WithStack::new(Some(io::Error::other("x")), 0).unwrap();
        assert_eq!(err.stack_trace().len(), 1);

        let function = err.stack_trace().frames()[0]
            .resolve()
            .function
            .unwrap_or_default();
        assert!(function.contains("test_trace_starts_in_test"), "unexpected frame {function}");
    }

    #[test]
    fn test_verbose_appends_trace() {
        let err = WithStack::new(Some(io::Error::other("x")), 2).unwrap();
        let verbose = format!("{err:#}");
        assert!(verbose.starts_with("x\n"));
        assert_eq!(verbose.lines().count(), 1 + err.stack_trace().len());
    }
}
