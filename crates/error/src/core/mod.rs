//! Core error types and structures
//!
//! - [`error`](crate::core::error) - Main [`BaseError`](crate::BaseError) struct and rendering
//! - [`with_stack`](crate::core::with_stack) - Stack trace attached to a foreign error
//! - [`factory`](crate::core::factory) - Precompiled, reusable error constructors
//! - [`stack`](crate::core::stack) - Frame capture and stack traces
//! - [`config`](crate::core::config) - Which frames capture treats as this library's own
//! - [`result`](crate::core::result) - Result type and extension traits

pub mod config;
pub mod error;
pub mod factory;
pub mod result;
pub mod stack;
pub mod with_stack;

// Re-export core types
pub use config::CaptureConfig;
pub use error::{BaseError, CAUSE_SEPARATOR, CHAIN_SEPARATOR, Cause, RenderMode};
pub use factory::{Factory, FactoryArgs, FactoryError, Template, WrapFactory};
pub use result::{BaseResultExt, Result, ResultExt};
pub use stack::{Frame, FrameInfo, StackTrace, callers, callers_with};
pub use with_stack::WithStack;
