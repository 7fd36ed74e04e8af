//! Stack attribution for log records.
//!
//! Frames are walked innermost-first. Everything up to and including the
//! inspecting method's own frame (identified by its qualified name) is
//! discarded, so depth 0 is always the code that asked for the capture.

use std::fmt;
use std::panic::Location;

/// Upper bound on frames kept by a full-stack capture.
pub const MAX_CALLER_DEPTH: usize = 25;

/// One resolved stack location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    pub file: String,
    pub line: u32,
    /// Qualified function name; empty when only the call site is known.
    pub function: String,
}

impl fmt::Display for CallerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "{}: {}", self.file, self.line)
        } else {
            write!(f, "{}: {} {}", self.file, self.line, self.function)
        }
    }
}

impl From<&Location<'_>> for CallerFrame {
    fn from(location: &Location<'_>) -> Self {
        CallerFrame {
            file: location.file().to_string(),
            line: location.line(),
            function: String::new(),
        }
    }
}

/// Resolve the frame `skip` levels above the method named by `marker`.
///
/// `site` is the `#[track_caller]` location of that method's caller and is
/// used for `skip == 0` when the native stack cannot be symbolized.
pub fn capture_one(marker: &str, skip: usize, site: &Location<'_>) -> Option<CallerFrame> {
    pick_one(walk(marker, skip, 1).into_iter().next(), skip, site)
}

/// Resolve up to `max` frames above the method named by `marker`,
/// immediate caller first. Frames without file and line are left out.
pub fn capture_all(marker: &str, max: usize) -> Vec<CallerFrame> {
    walk(marker, 0, max.min(MAX_CALLER_DEPTH))
        .into_iter()
        .flatten()
        .collect()
}

/// `slot` is `None` when the stack ended before `skip`, `Some(None)` when
/// the frame exists but has no file/line (binaries without debug info).
fn pick_one(slot: Option<Option<CallerFrame>>, skip: usize, site: &Location<'_>) -> Option<CallerFrame> {
    match slot.flatten() {
        Some(frame) => Some(frame),
        None if skip == 0 => Some(CallerFrame::from(site)),
        None => None,
    }
}

#[cfg_attr(not(feature = "stacktrace"), allow(dead_code))]
fn located(file: Option<&std::path::Path>, line: Option<u32>, function: String) -> Option<CallerFrame> {
    match (file, line) {
        (Some(file), Some(line)) => Some(CallerFrame {
            file: file.display().to_string(),
            line,
            function,
        }),
        _ => None,
    }
}

#[cfg_attr(not(feature = "stacktrace"), allow(dead_code))]
fn is_marker(function: &str, marker: &str) -> bool {
    // v0 mangling renders inherent methods as `<path::Type>::method`.
    let normalized: String = function.chars().filter(|c| *c != '<' && *c != '>').collect();
    normalized.ends_with(marker)
}

#[cfg(feature = "stacktrace")]
fn walk(marker: &str, skip: usize, max: usize) -> Vec<Option<CallerFrame>> {
    let mut frames = Vec::new();
    if max == 0 {
        return frames;
    }

    let mut past_marker = false;
    let mut depth = 0usize;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() >= max {
                return;
            }
            let function = symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_default();

            if is_marker(&function, marker) {
                past_marker = true;
                return;
            }
            if !past_marker {
                return;
            }

            if depth >= skip {
                frames.push(located(symbol.filename(), symbol.lineno(), function));
            }
            depth += 1;
        });
        frames.len() < max
    });

    frames
}

#[cfg(not(feature = "stacktrace"))]
fn walk(_marker: &str, _skip: usize, _max: usize) -> Vec<Option<CallerFrame>> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_file_line_function() {
        let frame = CallerFrame {
            file: "src/main.rs".into(),
            line: 42,
            function: "app::run".into(),
        };
        assert_eq!(frame.to_string(), "src/main.rs: 42 app::run");
    }

    #[test]
    fn location_fallback_omits_function() {
        let frame = CallerFrame::from(Location::caller());
        assert!(frame.to_string().starts_with(file!()));
        assert!(frame.function.is_empty());
    }

    #[test]
    fn marker_matches_both_manglings() {
        let marker = "Logger::with_caller";
        assert!(is_marker("ctx_logger::logger::Logger::with_caller", marker));
        assert!(is_marker("<ctx_logger::logger::Logger>::with_caller", marker));
        assert!(!is_marker("ctx_logger::logger::Logger::with_callers_frames", marker));
        assert!(!is_marker("ctx_logger::logger::Logger::with_caller::{{closure}}", marker));
    }

    #[test]
    fn unknown_marker_falls_back_to_site_for_depth_zero() {
        let site = Location::caller();
        let frame = capture_one("no::such::marker_fn", 0, site).unwrap();
        assert_eq!(frame.line, site.line());
        assert!(capture_one("no::such::marker_fn", 3, site).is_none());
    }

    #[test]
    fn frame_without_debug_info_is_unresolved() {
        assert!(located(None, Some(12), "app::run".into()).is_none());
        assert!(located(Some(std::path::Path::new("src/app.rs")), None, "app::run".into()).is_none());
        let frame = located(Some(std::path::Path::new("src/app.rs")), Some(12), "app::run".into());
        assert_eq!(frame.unwrap().to_string(), "src/app.rs: 12 app::run");
    }

    #[test]
    fn unlocated_frame_falls_back_to_site_or_keeps_parent() {
        let site = Location::caller();
        let frame = pick_one(Some(None), 0, site).unwrap();
        assert_eq!(frame, CallerFrame::from(site));
        assert!(!frame.to_string().contains("?: 0"));

        assert!(pick_one(Some(None), 2, site).is_none());
        assert!(pick_one(None, 2, site).is_none());
    }

    #[test]
    fn full_capture_without_marker_is_empty() {
        assert!(capture_all("no::such::marker_fn", MAX_CALLER_DEPTH).is_empty());
    }
}
