//! Stack capture seen from outside the crate: traces must start at the code
//! that asked for the error and never contain the library's own frames.

use std::io;

use base_error::{BaseError, CaptureConfig, StackTrace, callers_with};
use pretty_assertions::assert_eq;

fn functions(trace: &StackTrace) -> Vec<String> {
    trace
        .resolve()
        .into_iter()
        .map(|info| info.function.unwrap_or_default())
        .collect()
}

fn assert_no_library_frames(trace: &StackTrace) {
    for function in functions(trace) {
        let own = CaptureConfig::default().is_own(&function);
        assert!(!own, "library frame leaked into trace: {function}");
    }
}

fn assert_starts_in(trace: &StackTrace, caller: &str) {
    let functions = functions(trace);
    assert!(
        functions.first().is_some_and(|f| f.ends_with(caller)),
        "trace should start in {caller}: {functions:?}"
    );
}

#[inline(never)]
fn nested_helper() -> BaseError {
    base_error::new_stack("E1", "from helper", 2)
}

#[test]
fn new_stack_starts_at_call_site() {
    let err = base_error::new_stack("E1", "x", 4);
    let trace = err.stack_trace().unwrap();

    assert!(trace.len() <= 4);
    assert_no_library_frames(trace);
    assert_starts_in(trace, "new_stack_starts_at_call_site");
}

#[test]
fn helper_frame_comes_first() {
    let err = nested_helper();
    let trace = err.stack_trace().unwrap();

    assert_eq!(trace.len(), 2);
    assert_starts_in(trace, "nested_helper");
    assert!(functions(trace)[1].ends_with("helper_frame_comes_first"));
}

#[test]
fn every_stack_constructor_skips_library_frames() {
    let cause = || Some(io::Error::other("x"));
    let traces = [
        base_error::system_stack("E1", "x", 3).stack_trace().cloned(),
        base_error::wrap_stack("E1", cause(), 3).and_then(|e| e.stack_trace().cloned()),
        base_error::factory_stack(3, &["E1"]).make(&[&1]).stack_trace().cloned(),
        base_error::system_factory_stack(3, &["E1"]).make(&[&1]).stack_trace().cloned(),
        base_error::wrap_factory_stack(3, "E1")
            .wrap(cause())
            .and_then(|e| e.stack_trace().cloned()),
        base_error::with_stack(cause(), 3).map(|e| e.stack_trace().clone()),
    ];

    for trace in traces {
        let trace = trace.unwrap();
        assert_no_library_frames(&trace);
        assert_starts_in(&trace, "every_stack_constructor_skips_library_frames");
    }
}

#[test]
fn result_extensions_capture_the_caller() {
    use base_error::ResultExt;

    let failed: Result<(), io::Error> = Err(io::Error::other("x"));
    let err = failed.wrap_err_stack("E1", 2).unwrap_err();
    let trace = err.stack_trace().unwrap();
    assert_no_library_frames(trace);
    assert_starts_in(trace, "result_extensions_capture_the_caller");
}

#[test]
fn verbose_nested_stacks_show_both_traces() {
    let inner = base_error::new_stack("INNER", "x", 2);
    let inner_depth = inner.stack_trace().unwrap().len();
    let outer = base_error::with_stack(Some(inner), 3).unwrap();
    let outer_depth = outer.stack_trace().len();

    let verbose = format!("{outer:#}");
    assert!(verbose.starts_with("[INNER] x\n"));
    assert_eq!(verbose.lines().count(), 1 + inner_depth + outer_depth);
    assert_eq!(verbose.matches("---cause---").count(), 0);

    let wrapped = base_error::wrap_stack("OUTER", Some(outer), 1).unwrap();
    let verbose = format!("{wrapped:#}");
    assert_eq!(verbose.matches("---cause---").count(), 1);
    assert_eq!(verbose.lines().count(), 1 + 1 + 1 + 1 + inner_depth + outer_depth);
}

#[test]
fn injected_config_without_identity_keeps_library_frames() {
    let trace = callers_with(&CaptureConfig::empty(), 0, 30);
    let functions = functions(&trace);
    assert!(functions.iter().any(|f| f.starts_with("base_error::")));
}

#[test]
fn injected_identity_can_exclude_the_caller() {
    let config = CaptureConfig::default().with_self_module("capture");
    let trace = callers_with(&config, 0, 1);
    let functions = functions(&trace);
    assert!(
        !functions[0].starts_with("capture::"),
        "test frame should be excluded: {functions:?}"
    );
}
