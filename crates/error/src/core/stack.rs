//! Frame capture and stack traces
//!
//! [`callers`] walks the current thread's stack and records raw instruction
//! pointers; symbolisation is deferred until a trace is rendered. Frames that
//! belong to this library are skipped, so a trace always begins at the code
//! that asked for the error, no matter how many internal forwarding calls sit
//! between the public constructor and the capture point.

use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::core::config::{self, CaptureConfig};

/// A single captured program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    ip: usize,
}

impl Frame {
    #[inline]
    fn new(ip: usize) -> Self {
        Self { ip }
    }

    /// The raw instruction pointer (a return address).
    #[inline]
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Symbolise this frame.
    ///
    /// When functions were inlined into the frame the innermost one is
    /// reported, so an inlined caller still shows its own file and line.
    pub fn resolve(&self) -> FrameInfo {
        self.inline_chain()
            .into_iter()
            .next()
            .unwrap_or_else(|| FrameInfo {
                ip: self.ip,
                ..FrameInfo::default()
            })
    }

    /// Every function this frame stands for, innermost first.
    ///
    /// A single entry unless the optimizer inlined calls into the frame.
    /// Empty when the address cannot be symbolised.
    pub fn inline_chain(&self) -> Vec<FrameInfo> {
        let mut chain = Vec::new();
        // Return addresses point past the call instruction.
        let lookup = self.ip.saturating_sub(1) as *mut c_void;
        backtrace::resolve(lookup, |symbol| {
            chain.push(FrameInfo {
                ip: self.ip,
                function: symbol.name().map(|name| format!("{name:#}")),
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno(),
            });
        });
        chain
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.resolve(), f)
    }
}

/// Symbol information for a [`Frame`]. Any part may be missing when the
/// binary carries no debug info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Instruction pointer the info was resolved from.
    pub ip: usize,
    /// Demangled function name, without the hash suffix.
    pub function: Option<String>,
    /// Source file.
    pub file: Option<PathBuf>,
    /// Source line.
    pub line: Option<u32>,
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, &self.function) {
            (Some(file), Some(line), _) => write!(f, "{}:{line}", file.display()),
            (Some(file), None, _) => write!(f, "{}", file.display()),
            (None, _, Some(function)) => f.write_str(function),
            (None, _, None) => write!(f, "{:#x}", self.ip),
        }
    }
}

/// An immutable, innermost-first sequence of captured frames.
///
/// `{}` renders nothing. `{:#}` renders one `\n<file>:<line>` line per frame,
/// which is how it appears inside verbose error output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    frames: Box<[Frame]>,
}

impl StackTrace {
    /// Number of captured frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The captured frames, innermost first.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Symbolise every frame.
    pub fn resolve(&self) -> Vec<FrameInfo> {
        self.frames.iter().map(Frame::resolve).collect()
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return Ok(());
        }
        for frame in self.frames.iter() {
            write!(f, "\n{frame}")?;
        }
        Ok(())
    }
}

/// Coerce a requested depth: a trace is never asked for zero frames.
#[inline]
pub(crate) fn effective_depth(depth: usize) -> usize {
    depth.max(1)
}

/// Capture up to `depth` frames starting at the first caller frame found at
/// or after index `skip`, using the process-wide [`CaptureConfig`].
#[inline(never)]
pub fn callers(skip: usize, depth: usize) -> StackTrace {
    callers_with(config::config(), skip, depth)
}

/// [`callers`] with an explicit config.
#[inline(never)]
pub fn callers_with(config: &CaptureConfig, skip: usize, depth: usize) -> StackTrace {
    let limit = config.scan_ceiling().max(skip) + depth;
    let mut ips = Vec::with_capacity(limit);
    backtrace::trace(|frame| {
        ips.push(frame.ip() as usize);
        ips.len() < limit
    });

    let start = scan_start(config, &ips, skip);
    let frames: Box<[Frame]> = ips
        .into_iter()
        .skip(start)
        .take(depth)
        .map(Frame::new)
        .collect();
    trace!(skip, depth, start, captured = frames.len(), "captured stack trace");

    StackTrace { frames }
}

/// Find the index of the first frame that is not this library's own.
///
/// Unwinder frames come before the first own frame and are passed over.
/// Frames from test modules always qualify. A frame counts as own when any
/// function inlined into it is own.
fn scan_start(config: &CaptureConfig, ips: &[usize], skip: usize) -> usize {
    if config.self_modules().next().is_none() {
        return skip;
    }

    let mut seen_own = false;
    for (index, &ip) in ips
        .iter()
        .enumerate()
        .take(config.scan_ceiling())
        .skip(skip)
    {
        let chain = Frame::new(ip).inline_chain();
        let names: Vec<&str> = chain
            .iter()
            .filter_map(|info| info.function.as_deref())
            .collect();
        if names.iter().any(|name| config.is_test(name)) {
            return index;
        }
        if names.iter().any(|name| config.is_own(name)) {
            seen_own = true;
        } else if seen_own {
            return index;
        }
    }

    debug!(
        skip,
        ceiling = config.scan_ceiling(),
        "no caller frame within scan ceiling, capturing from skip"
    );
    skip
}
