//! Error classification
//!
//! ## Error Classes
//!
//! - [`ErrorClass::Business`] - expected failures the caller can recover from
//! - [`ErrorClass::System`] - infrastructure or unexpected failures; wrapping
//!   always produces one
//!
//! ## Error Kinds
//!
//! [`ErrorKind::of`] answers "which of this library's error types is this?"
//! for any `dyn Error`. It is a closed set: everything not produced here is
//! [`ErrorKind::Foreign`].
//!
//! ## `is_system`
//!
//! [`is_system`] returns `true` for a **business** [`BaseError`] and `false`
//! for system errors and for every other error type. The name does not match
//! what it answers. Existing call sites depend on this polarity, so it is
//! kept as is; use [`BaseError::class`] or
//! [`BaseError::is_system_classified`] when the stored flag is wanted.

use std::error::Error as StdError;

use crate::core::error::BaseError;
use crate::core::with_stack::WithStack;

/// Business/system split carried by every [`BaseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Expected, caller-recoverable failure.
    Business,
    /// Infrastructure or unexpected failure.
    System,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Business => "BUSINESS",
            ErrorClass::System => "SYSTEM",
        }
    }
}

/// Which error type a `dyn Error` is, from this library's point of view.
#[derive(Debug, Clone, Copy)]
pub enum ErrorKind<'a> {
    /// A [`BaseError`].
    Base(&'a BaseError),
    /// A [`WithStack`] wrapper.
    Stacked(&'a WithStack),
    /// Any other error type.
    Foreign,
}

impl<'a> ErrorKind<'a> {
    /// Classify `err` by its concrete type.
    pub fn of(err: &'a (dyn StdError + 'static)) -> Self {
        if let Some(base) = err.downcast_ref::<BaseError>() {
            ErrorKind::Base(base)
        } else if let Some(stacked) = err.downcast_ref::<WithStack>() {
            ErrorKind::Stacked(stacked)
        } else {
            ErrorKind::Foreign
        }
    }

    /// The [`ErrorClass`] of a [`BaseError`]; `None` for other kinds.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            ErrorKind::Base(base) => Some(base.class()),
            ErrorKind::Stacked(_) | ErrorKind::Foreign => None,
        }
    }
}

/// `true` only for a [`BaseError`] whose system flag is **not** set.
///
/// See the [module docs](self) for why the name reads inverted. Unknown error
/// kinds, including [`WithStack`], return `false`.
///
/// ```rust
/// use base_error::{BaseError, is_system};
///
/// assert!(is_system(&BaseError::new("E1", "expected failure")));
/// assert!(!is_system(&BaseError::system("E2", "database down")));
/// ```
pub fn is_system(err: &(dyn StdError + 'static)) -> bool {
    matches!(ErrorKind::of(err), ErrorKind::Base(base) if !base.is_system_classified())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_kind_of_each_type() {
        let base = BaseError::new("E1", "x");
        assert!(matches!(ErrorKind::of(&base), ErrorKind::Base(_)));

        let stacked = WithStack::new(Some(io::Error::other("x")), 1).unwrap();
        assert!(matches!(ErrorKind::of(&stacked), ErrorKind::Stacked(_)));

        let foreign = io::Error::other("x");
        assert!(matches!(ErrorKind::of(&foreign), ErrorKind::Foreign));
    }

    #[test]
    fn test_class_only_for_base_errors() {
        let system = BaseError::system("E1", "x");
        assert_eq!(ErrorKind::of(&system).class(), Some(ErrorClass::System));
        assert_eq!(ErrorKind::of(&io::Error::other("x")).class(), None);
    }

    #[test]
    fn test_is_system_polarity() {
        assert!(is_system(&BaseError::new("E1", "x")));
        assert!(!is_system(&BaseError::system("E1", "x")));
        assert!(!is_system(&BaseError::new("E1", "x").with_system()));
    }

    #[test]
    fn test_is_system_on_other_kinds_is_false() {
        let business = WithStack::new(Some(BaseError::new("E1", "x")), 1).unwrap();
        assert!(!is_system(&business));
        assert!(!is_system(&io::Error::other("x")));
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ErrorClass::Business.as_str(), "BUSINESS");
        assert_eq!(ErrorClass::System.as_str(), "SYSTEM");
    }
}
