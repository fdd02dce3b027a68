//! Frame-capture configuration
//!
//! Stack capture has to know which frames belong to this library so that a
//! trace starts at the caller's real call site. That knowledge lives in a
//! [`CaptureConfig`], computed once per process and read-only afterwards.
//! Tests (and embedders that re-export this crate under another name) can
//! build their own config and pass it to
//! [`callers_with`](crate::core::stack::callers_with).

use std::borrow::Cow;
use std::sync::OnceLock;

/// Hard bound on how many frames the capture scan inspects.
pub const DEFAULT_SCAN_CEILING: usize = 15;

/// Marker identifying frames that run inside a unit-test module.
pub const DEFAULT_TEST_MARKER: &str = "::tests::";

static CONFIG: OnceLock<CaptureConfig> = OnceLock::new();

/// Which frames count as "own" and how far the capture scan may look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    self_modules: Vec<Cow<'static, str>>,
    test_markers: Vec<Cow<'static, str>>,
    scan_ceiling: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            self_modules: vec![Cow::Borrowed(concat!(env!("CARGO_CRATE_NAME"), "::"))],
            test_markers: vec![Cow::Borrowed(DEFAULT_TEST_MARKER)],
            scan_ceiling: DEFAULT_SCAN_CEILING,
        }
    }
}

impl CaptureConfig {
    /// Config with no self identity: nothing is filtered and capture starts
    /// at the requested skip.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            self_modules: Vec::new(),
            test_markers: Vec::new(),
            scan_ceiling: DEFAULT_SCAN_CEILING,
        }
    }

    /// Add a module prefix whose frames are excluded from captured traces.
    ///
    /// A trailing `::` is appended when missing so `foo` does not also
    /// match `foobar::`.
    #[must_use]
    pub fn with_self_module(mut self, module: impl Into<Cow<'static, str>>) -> Self {
        let module = module.into();
        let module = if module.ends_with("::") {
            module
        } else {
            Cow::Owned(format!("{module}::"))
        };
        self.self_modules.push(module);
        self
    }

    /// Add a marker that exempts a frame from exclusion.
    #[must_use]
    pub fn with_test_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.test_markers.push(marker.into());
        self
    }

    /// Override the scan ceiling. Zero disables the scan.
    #[must_use]
    pub fn with_scan_ceiling(mut self, ceiling: usize) -> Self {
        self.scan_ceiling = ceiling;
        self
    }

    /// Module prefixes treated as this library's own code.
    pub fn self_modules(&self) -> impl Iterator<Item = &str> {
        self.self_modules.iter().map(AsRef::as_ref)
    }

    /// Absolute frame index at which the capture scan gives up.
    #[inline]
    pub fn scan_ceiling(&self) -> usize {
        self.scan_ceiling
    }

    /// `true` if the demangled symbol belongs to a configured self module.
    ///
    /// Trait-impl symbols (`<Type as Trait>::method`) count as own when
    /// either the type or the trait lives in a self module.
    pub fn is_own(&self, symbol: &str) -> bool {
        symbol.split(" as ").any(|part| {
            let part = part.trim_start_matches('<');
            self.self_modules
                .iter()
                .any(|module| part.starts_with(module.as_ref()))
        })
    }

    /// `true` if the symbol runs inside test code.
    pub fn is_test(&self, symbol: &str) -> bool {
        self.test_markers
            .iter()
            .any(|marker| symbol.contains(marker.as_ref()))
    }
}

/// Install the process-wide config.
///
/// Only the first call wins; later calls get their config handed back. Once
/// any stack has been captured the default is already fixed.
pub fn install(config: CaptureConfig) -> Result<(), CaptureConfig> {
    CONFIG.set(config)
}

/// The process-wide config, defaulted on first use.
pub fn config() -> &'static CaptureConfig {
    CONFIG.get_or_init(CaptureConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn default_identifies_this_crate() {
        let config = CaptureConfig::default();
        assert_eq!(config.self_modules().collect::<Vec<_>>(), vec!["base_error::"]);
        assert_eq!(config.scan_ceiling(), 15);
    }

    #[rstest]
    #[case("base_error::core::stack::callers", true)]
    #[case("<base_error::core::error::BaseError as core::fmt::Display>::fmt", true)]
    #[case(
        "<core::result::Result<T,E> as base_error::core::result::ResultExt<T>>::wrap_err_stack",
        true
    )]
    #[case("<my_app::Id as core::fmt::Display>::fmt", false)]
    #[case("base_errorx::thing", false)]
    #[case("my_app::handler", false)]
    #[case("_Unwind_Backtrace", false)]
    fn own_frames_match_on_module_prefix(#[case] symbol: &str, #[case] own: bool) {
        assert_eq!(CaptureConfig::default().is_own(symbol), own);
    }

    #[test]
    fn test_marker_exempts_frames() {
        let config = CaptureConfig::default();
        assert!(config.is_test("base_error::core::stack::tests::capture"));
        assert!(!config.is_test("base_error::core::stack::callers"));
    }

    #[test]
    fn self_module_gets_path_separator() {
        let config = CaptureConfig::empty().with_self_module("app");
        assert!(config.is_own("app::db::query"));
        assert!(!config.is_own("application::main"));
    }

    #[test]
    fn empty_config_owns_nothing() {
        let config = CaptureConfig::empty();
        assert!(!config.is_own("base_error::core::stack::callers"));
        assert!(!config.is_test("base_error::core::stack::tests::capture"));
    }
}
