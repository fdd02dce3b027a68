//! # Base Error
//!
//! Structured error values for application code: every error carries a
//! stable machine-readable code, a human message, an optional cause and an
//! optional stack trace captured at the caller's call site.
//!
//! ## Quick Start
//!
//! ```rust
//! use base_error::prelude::*;
//!
//! fn load(id: u32) -> Result<String> {
//!     if id == 0 {
//!         return Err(BaseError::new("INVALID_ID", "id must be positive"));
//!     }
//!     std::fs::read_to_string(format!("/nonexistent/{id}")).wrap_err("LOAD_FAILED")
//! }
//!
//! let err = load(0).unwrap_err();
//! assert_eq!(err.to_string(), "[INVALID_ID] id must be positive");
//!
//! let err = load(7).unwrap_err();
//! assert!(err.is_system_classified());
//! assert!(err.cause().is_some());
//! ```
//!
//! ## Output
//!
//! - `{}` - `[code] message`
//! - `{:#}` - the short text, one `file:line` per captured frame, then
//!   `---cause---` and the cause's own verbose output
//! - [`RenderMode::Quoted`] - the short text as an escaped string literal
//!
//! ## Business vs. system errors
//!
//! [`BaseError::new`] and [`Factory`] produce business errors;
//! [`BaseError::system`] and every `wrap*` constructor produce system errors.
//! Note the polarity of [`is_system`]; see [`kinds`].
//!
//! The library never logs or prints on its own; it emits `tracing` events at
//! `trace`/`debug` level only.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod core;
pub mod kinds;

use std::error::Error as StdError;

pub use crate::core::{
    BaseError, BaseResultExt, CAUSE_SEPARATOR, CHAIN_SEPARATOR, CaptureConfig, Cause, Factory,
    FactoryArgs, FactoryError, Frame, FrameInfo, RenderMode, Result, ResultExt, StackTrace,
    Template, WithStack, WrapFactory, callers, callers_with,
};
pub use kinds::{ErrorClass, ErrorKind, is_system};

/// Business error without a stack trace.
pub fn new(code: impl Into<String>, message: impl Into<String>) -> BaseError {
    BaseError::new(code, message)
}

/// Business error with a stack trace of up to `depth` frames.
#[inline(never)]
pub fn new_stack(code: impl Into<String>, message: impl Into<String>, depth: usize) -> BaseError {
    BaseError::new_stack(code, message, depth)
}

/// System error without a stack trace.
pub fn system(code: impl Into<String>, message: impl Into<String>) -> BaseError {
    BaseError::system(code, message)
}

/// System error with a stack trace of up to `depth` frames.
#[inline(never)]
pub fn system_stack(code: impl Into<String>, message: impl Into<String>, depth: usize) -> BaseError {
    BaseError::system_stack(code, message, depth)
}

/// See [`BaseError::wrap`].
pub fn wrap<E>(code: impl Into<String>, err: Option<E>) -> Option<BaseError>
where
    E: StdError + Send + Sync + 'static,
{
    BaseError::wrap(code, err)
}

/// See [`BaseError::wrap_stack`].
#[inline(never)]
pub fn wrap_stack<E>(code: impl Into<String>, err: Option<E>, depth: usize) -> Option<BaseError>
where
    E: StdError + Send + Sync + 'static,
{
    BaseError::wrap_stack(code, err, depth)
}

/// See [`WithStack::new`].
#[inline(never)]
pub fn with_stack<E>(err: Option<E>, depth: usize) -> Option<WithStack>
where
    E: StdError + Send + Sync + 'static,
{
    WithStack::new(err, depth)
}

/// See [`Factory::new`].
#[track_caller]
pub fn factory(args: &[&str]) -> Factory {
    Factory::new(args)
}

/// See [`Factory::stack`].
#[track_caller]
pub fn factory_stack(depth: usize, args: &[&str]) -> Factory {
    Factory::stack(depth, args)
}

/// See [`Factory::system`].
#[track_caller]
pub fn system_factory(args: &[&str]) -> Factory {
    Factory::system(args)
}

/// See [`Factory::system_stack`].
#[track_caller]
pub fn system_factory_stack(depth: usize, args: &[&str]) -> Factory {
    Factory::system_stack(depth, args)
}

/// See [`WrapFactory::new`].
pub fn wrap_factory(code: impl Into<String>) -> WrapFactory {
    WrapFactory::new(code)
}

/// See [`WrapFactory::stack`].
pub fn wrap_factory_stack(depth: usize, code: impl Into<String>) -> WrapFactory {
    WrapFactory::stack(depth, code)
}

/// Convenient prelude with everything you need
pub mod prelude {
    pub use super::{
        BaseError, BaseResultExt, ErrorClass, ErrorKind, Factory, RenderMode, Result, ResultExt,
        WithStack, WrapFactory, is_system,
    };
}
