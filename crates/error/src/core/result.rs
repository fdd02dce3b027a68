//! Result type and extension traits

use std::error::Error as StdError;
use std::sync::Arc;

use crate::core::error::BaseError;
use crate::core::stack::{callers, effective_depth};
use crate::core::with_stack::WithStack;

/// Result type for operations failing with a [`BaseError`]
pub type Result<T> = std::result::Result<T, BaseError>;

/// Wrap the error side of any `Result`.
///
/// `Ok` values pass through untouched, mirroring how `wrap(code, None)`
/// returns `None`.
pub trait ResultExt<T> {
    /// Wrap the error under `code` as a system error.
    fn wrap_err(self, code: &str) -> Result<T>;

    /// [`wrap_err`](Self::wrap_err) with a stack trace of the caller.
    fn wrap_err_stack(self, code: &str, depth: usize) -> Result<T>;

    /// Attach a stack trace without changing the error.
    fn with_stack(self, depth: usize) -> std::result::Result<T, WithStack>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err(self, code: &str) -> Result<T> {
        self.map_err(|e| BaseError::wrap_cause(code, Arc::new(e), None))
    }

    // Capturing paths match instead of `map_err`: a closure would put a
    // `Result::map_err` frame between this crate's frames and the caller.
    #[inline(never)]
    fn wrap_err_stack(self, code: &str, depth: usize) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => {
                let stack = callers(0, effective_depth(depth));
                Err(BaseError::wrap_cause(code, Arc::new(e), Some(stack)))
            }
        }
    }

    #[inline(never)]
    fn with_stack(self, depth: usize) -> std::result::Result<T, WithStack> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(WithStack::capture(Arc::new(e), depth)),
        }
    }
}

/// Extension trait specifically for [`BaseError`] results
pub trait BaseResultExt<T> {
    /// Mark the error as system-classified.
    fn with_system(self) -> Result<T>;

    /// Record the propagation path on the error.
    fn with_chain<I, S>(self, segments: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
}

impl<T> BaseResultExt<T> for Result<T> {
    fn with_system(self) -> Result<T> {
        self.map_err(BaseError::with_system)
    }

    fn with_chain<I, S>(self, segments: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.map_err(|e| e.with_chain(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    fn failing() -> std::result::Result<u32, io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "config.toml"))
    }

    #[test]
    fn test_wrap_err() {
        let error = failing().wrap_err("CONFIG").unwrap_err();
        assert_eq!(error.to_string(), "[CONFIG] config.toml");
        assert!(error.is_system_classified());
        assert!(error.cause().is_some());
    }

    #[test]
    fn test_ok_passes_through() {
        let ok: std::result::Result<u32, io::Error> = Ok(7);
        assert_eq!(ok.wrap_err("CONFIG").unwrap(), 7);

        let ok: std::result::Result<u32, io::Error> = Ok(7);
        assert_eq!(ok.with_stack(3).unwrap(), 7);
    }

    #[test]
    fn test_wrap_err_stack_captures() {
        let error = failing().wrap_err_stack("CONFIG", 0).unwrap_err();
        assert_eq!(error.stack_trace().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_with_stack_keeps_message() {
        let error = failing().with_stack(2).unwrap_err();
        assert_eq!(error.to_string(), "config.toml");
    }

    #[test]
    fn test_base_result_extensions() {
        let result: Result<()> = Err(BaseError::new("E1", "x"));
        let error = result
            .with_system()
            .with_chain(["db", "repo"])
            .unwrap_err();

        assert!(error.is_system_classified());
        assert_eq!(error.chain(), "db<-repo");
    }
}
