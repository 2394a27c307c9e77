//! Capturing the current call stack.
//!
//! Frames are resolved with the `backtrace` crate and rendered in the same textual convention the
//! parser reads, so a captured trace and a foreign trace go through one code path.
//! A Rust symbol `app::service::Service::load` renders as `Service.load`, a free function
//! `app::run` as `run`, and closures as `<anonymous>`.
//!
//! Symbols are resolved lazily, one frame at a time, so a capture that only needs the top of the
//! stack stops walking once it has enough frames.

use std::path::{Path, PathBuf};

use crate::{GroomOptions, groom_trace};

/// One resolved frame of a captured stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled symbol without hash, e.g. `app::Service::load`
    pub symbol: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Frame {
    /// `Context.method` or `method` derived from the symbol.
    pub fn qualified_name(&self) -> Option<String> {
        self.symbol.as_deref().and_then(qualify_symbol)
    }

    /// Render as a call-site line. Frames without file and line have no useful rendering.
    pub fn to_line(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        let line = self.line?;
        let column = self.column.unwrap_or(1);
        Some(match self.qualified_name() {
            Some(name) => format!("at {} ({}:{}:{})", name, file.display(), line, column),
            None => format!("at {}:{}:{}", file.display(), line, column),
        })
    }

    /// Has the file and line a call-site line needs.
    fn is_renderable(&self) -> bool {
        self.file.is_some() && self.line.is_some()
    }

    /// A frame of one of the [`Trace`] capture functions.
    fn is_capture_entry(&self) -> bool {
        self.symbol.as_deref().is_some_and(|symbol| {
            symbol.contains("Trace::capture") || symbol.contains("Trace>::capture")
        })
    }

    fn is_capture_machinery(&self) -> bool {
        self.is_capture_entry()
            || self
                .symbol
                .as_deref()
                .is_some_and(|symbol| symbol.starts_with("backtrace::"))
    }
}

/// An ordered list of frames, innermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    frames: Vec<Frame>,
}

impl Trace {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Trace { frames }
    }

    /// Capture the whole stack of the calling thread.
    ///
    /// Frames belonging to the capture itself are removed, so the first frame is the caller.
    /// Without the `capture` feature the trace is empty.
    #[inline(never)]
    pub fn capture() -> Self {
        Trace {
            frames: Self::capture_frames(|_| true),
        }
    }

    /// Capture the calling thread's stack, resolving symbols only until `limit` renderable
    /// frames are known.
    #[inline(never)]
    pub fn capture_limited(limit: usize) -> Self {
        let mut frames = Self::capture_frames(|frames| renderable_count(frames) < limit);
        truncate_renderable(&mut frames, limit);
        Trace { frames }
    }

    /// Capture the calling thread's stack starting at the frame located at `file` and `line`.
    ///
    /// Symbols are resolved until the anchor and `limit` renderable frames from it are known.
    /// `None` when no frame matches, see [`Trace::anchored_at`].
    #[inline(never)]
    pub fn capture_anchored(file: &str, line: u32, limit: usize) -> Option<Self> {
        let frames = Self::capture_frames(|frames| match anchor_position(frames, file, line) {
            Some(start) => renderable_count(&frames[start..]) < limit,
            None => true,
        });
        let mut anchored = Trace { frames }.anchored_at(file, line)?;
        truncate_renderable(&mut anchored.frames, limit);
        Some(anchored)
    }

    /// Walk the stack, resolving one frame at a time, while `keep_going` holds for the frames
    /// resolved so far below the capture functions. Nothing is judged before those are passed.
    #[inline(never)]
    fn capture_frames(mut keep_going: impl FnMut(&[Frame]) -> bool) -> Vec<Frame> {
        let mut frames: Vec<Frame> = Vec::new();

        #[cfg(feature = "capture")]
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                frames.push(Frame {
                    symbol: symbol.name().map(|name| format!("{:#}", name)),
                    file: symbol.filename().map(Path::to_path_buf),
                    line: symbol.lineno(),
                    column: symbol.colno(),
                });
            });
            match frames.iter().rposition(Frame::is_capture_entry) {
                Some(index) => keep_going(&frames[index + 1..]),
                None => true,
            }
        });
        #[cfg(not(feature = "capture"))]
        let _ = &mut keep_going;

        frames.drain(..machinery_end(&frames));
        if !frames.is_empty() && frames.iter().all(|frame| frame.file.is_none()) {
            tracing::debug!(frames = frames.len(), "captured trace has no symbolized frames");
        }
        frames
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The trace starting at the first frame located at `file` and `line`.
    ///
    /// Used to line a captured stack up with a `#[track_caller]` location. Paths are compared
    /// by trailing components, so a relative `src/lib.rs` matches `/work/app/src/lib.rs`.
    pub fn anchored_at(&self, file: &str, line: u32) -> Option<Trace> {
        let start = anchor_position(&self.frames, file, line)?;
        Some(Trace {
            frames: self.frames[start..].to_vec(),
        })
    }

    /// Renderable frames as call-site lines joined with `\n`.
    pub fn render(&self) -> String {
        self.frames
            .iter()
            .filter_map(Frame::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Index just past the last frame of the capture machinery.
fn machinery_end(frames: &[Frame]) -> usize {
    frames
        .iter()
        .rposition(Frame::is_capture_machinery)
        .map_or(0, |index| index + 1)
}

fn renderable_count(frames: &[Frame]) -> usize {
    frames.iter().filter(|frame| frame.is_renderable()).count()
}

/// Keep frames up to and including the `limit`th renderable one.
fn truncate_renderable(frames: &mut Vec<Frame>, limit: usize) {
    if limit == 0 {
        frames.clear();
        return;
    }
    let mut seen = 0;
    let end = frames
        .iter()
        .position(|frame| {
            if frame.is_renderable() {
                seen += 1;
            }
            seen >= limit
        })
        .map_or(frames.len(), |index| index + 1);
    frames.truncate(end);
}

fn anchor_position(frames: &[Frame], file: &str, line: u32) -> Option<usize> {
    let file = Path::new(file);
    frames.iter().position(|frame| {
        frame.line == Some(line)
            && frame
                .file
                .as_deref()
                .is_some_and(|path| path.ends_with(file))
    })
}

/// Capture the current stack and groom it. The frame of this function is always dropped.
#[inline(never)]
pub fn capture_current_trace(options: GroomOptions) -> String {
    let options = options.dropping(1);
    let trace = Trace::capture_limited(options.drop_count.saturating_add(options.max_lines));
    groom_trace(&trace.render(), options)
}

/// Reduce a demangled Rust symbol to `Context.method` or `method`.
///
/// Handles both manglings: closures are `{{closure}}` or `{closure#N}`, and v0 symbols may end
/// in a `::<...>` generic argument list.
fn qualify_symbol(symbol: &str) -> Option<String> {
    let mut segments = split_path(symbol.trim());
    let mut closure = false;
    while let Some(last) = segments.last() {
        if is_closure(last) {
            closure = true;
        } else if !(last.starts_with('{') || (segments.len() > 1 && last.starts_with('<'))) {
            break;
        }
        segments.pop();
    }

    let (last, owner) = match segments.as_slice() {
        [] => return None,
        [last] => (*last, None),
        [.., owner, last] => (*last, Some(*owner)),
    };

    let method = if closure {
        "<anonymous>".to_string()
    } else {
        strip_generics(last)
    };
    if method.is_empty() || method.starts_with('<') {
        return None;
    }

    let context = owner.and_then(|owner| {
        if let Some(inner) = owner.strip_prefix('<').and_then(|o| o.strip_suffix('>')) {
            // `<Type as Trait>` or `<Type>`
            let ty = inner.split(" as ").next().unwrap_or(inner).trim();
            if !is_named_type(ty) {
                return None;
            }
            let ty = split_path(ty).last().copied().unwrap_or(ty);
            return Some(strip_generics(ty));
        }
        let owner = strip_generics(owner);
        owner
            .starts_with(|c: char| c.is_ascii_uppercase())
            .then_some(owner)
    });

    let name = match context {
        Some(context) if !context.is_empty() => format!("{}.{}", context, method),
        _ => method,
    };
    Some(name.split_whitespace().collect())
}

fn is_closure(segment: &str) -> bool {
    segment == "{{closure}}" || segment.starts_with("{closure#")
}

/// A path type such as `app::User<T>`, not a reference, tuple, slice, pointer or `fn` type.
fn is_named_type(ty: &str) -> bool {
    ty.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && !ty.contains("fn(")
        && !ty.starts_with("dyn ")
        && !ty.starts_with("impl ")
}

/// Split on `::` outside of angle brackets. The `>` of a `->` does not close a bracket.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'<' => depth += 1,
            b'>' if index == 0 || bytes[index - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                segments.push(&path[start..index]);
                index += 2;
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    segments.push(&path[start..]);
    segments.retain(|segment| !segment.is_empty());
    segments
}

fn strip_generics(segment: &str) -> String {
    match segment.find('<') {
        Some(0) => segment.to_string(),
        Some(index) => segment[..index].to_string(),
        None => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_line;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_qualify_method_on_type() {
        assert_eq!(
            qualify_symbol("app::service::Service::load").as_deref(),
            Some("Service.load")
        );
        assert_eq!(
            qualify_symbol("app::cache::Cache<K,V>::get").as_deref(),
            Some("Cache.get")
        );
    }

    #[test]
    fn test_qualify_free_function() {
        assert_eq!(qualify_symbol("app::run").as_deref(), Some("run"));
        assert_eq!(qualify_symbol("main").as_deref(), Some("main"));
    }

    #[test]
    fn test_qualify_trait_impl() {
        assert_eq!(
            qualify_symbol("<app::model::User as core::fmt::Display>::fmt").as_deref(),
            Some("User.fmt")
        );
    }

    #[test]
    fn test_qualify_closure() {
        assert_eq!(
            qualify_symbol("app::Worker::spawn::{{closure}}").as_deref(),
            Some("Worker.<anonymous>")
        );
        assert_eq!(
            qualify_symbol("app::main::{{closure}}::{{closure}}").as_deref(),
            Some("<anonymous>")
        );
    }

    #[test]
    fn test_qualify_numbered_closure() {
        assert_eq!(qualify_symbol("a::b::{closure#0}").as_deref(), Some("<anonymous>"));
        assert_eq!(
            qualify_symbol("app::Worker::spawn::{closure#0}").as_deref(),
            Some("Worker.<anonymous>")
        );
        assert_eq!(
            qualify_symbol("<app::Worker>::spawn::{closure#1}::{closure#0}").as_deref(),
            Some("Worker.<anonymous>")
        );
    }

    #[test]
    fn test_qualify_trailing_generic_arguments() {
        assert_eq!(
            qualify_symbol("test::__rust_begin_short_backtrace::<F, T>").as_deref(),
            Some("__rust_begin_short_backtrace")
        );
        assert_eq!(
            qualify_symbol(
                "std::panicking::try::do_call::<core::panic::unwind_safe::AssertUnwindSafe<F>, core::result::Result<(), String>>"
            )
            .as_deref(),
            Some("do_call")
        );
        assert_eq!(
            qualify_symbol(
                "core::ops::function::FnOnce::call_once::<fn() -> core::result::Result<(), String>, ()>"
            )
            .as_deref(),
            Some("FnOnce.call_once")
        );
        assert_eq!(
            qualify_symbol("<F as core::ops::function::FnOnce<()>>::call_once::{shim:vtable#0}")
                .as_deref(),
            Some("F.call_once")
        );
    }

    #[test]
    fn test_qualify_function_pointer_owner() {
        assert_eq!(
            qualify_symbol(
                "<fn() -> core::result::Result<(), alloc::string::String> as core::ops::function::FnOnce<()>>::call_once"
            )
            .as_deref(),
            Some("call_once")
        );
        assert_eq!(qualify_symbol("<core::result::Result<(), E>>"), None);
    }

    #[test]
    fn test_split_path_arrow() {
        assert_eq!(
            split_path("<fn() -> a::B as c::D>::call"),
            vec!["<fn() -> a::B as c::D>", "call"]
        );
    }

    #[test]
    fn test_frame_lines_parse_back() {
        let named = Frame {
            symbol: Some("app::service::Service::load".to_string()),
            file: Some(PathBuf::from("/work/app/src/service.rs")),
            line: Some(42),
            column: Some(9),
        };
        let site = parse_line(&named.to_line().unwrap()).unwrap();
        assert_eq!(site.context.as_deref(), Some("Service"));
        assert_eq!(site.method.as_deref(), Some("load"));
        assert_eq!(site.module, "/work/app/src/service.rs");
        assert_eq!((site.line, site.column), (42, 9));

        let bare = Frame {
            symbol: None,
            file: Some(PathBuf::from("main.rs")),
            line: Some(3),
            column: None,
        };
        assert_eq!(bare.to_line().as_deref(), Some("at main.rs:3:1"));

        assert_eq!(Frame::default().to_line(), None);
    }

    #[test]
    fn test_truncate_renderable() {
        let frame = |file: Option<&str>| Frame {
            symbol: None,
            file: file.map(PathBuf::from),
            line: Some(1),
            column: None,
        };
        let mut frames = vec![
            frame(Some("a.rs")),
            frame(None),
            frame(Some("b.rs")),
            frame(Some("c.rs")),
        ];
        truncate_renderable(&mut frames, 2);
        assert_eq!(frames.len(), 3);
        truncate_renderable(&mut frames, 0);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_anchored_at() {
        let frame = |file: &str, line: u32| Frame {
            symbol: Some("f".to_string()),
            file: Some(PathBuf::from(file)),
            line: Some(line),
            column: Some(1),
        };
        let trace = Trace::from_frames(vec![
            frame("/work/lib/src/main.rs", 10),
            frame("/work/app/src/main.rs", 20),
            frame("/rustc/library/core/src/ops/function.rs", 250),
        ]);
        let anchored = trace.anchored_at("src/main.rs", 20).unwrap();
        assert_eq!(anchored.frames().len(), 2);
        assert_eq!(
            anchored.frames()[0].file.as_deref(),
            Some(Path::new("/work/app/src/main.rs"))
        );
        assert!(trace.anchored_at("src/main.rs", 21).is_none());
        assert!(trace.anchored_at("src/other.rs", 20).is_none());
    }

    #[test]
    fn test_limited_capture_stops_early() {
        let full = Trace::capture();
        let limited = Trace::capture_limited(1);
        assert_eq!(renderable_count(limited.frames()), 1);
        assert!(
            limited.frames().len() < full.frames().len(),
            "limited {} frames, full {}",
            limited.frames().len(),
            full.frames().len()
        );
        assert!(!limited.frames().iter().any(Frame::is_capture_machinery));
    }

    #[test]
    fn test_anchored_capture() {
        let line = line!() + 1;
        let trace = Trace::capture_anchored(file!(), line, 2).expect("anchor frame");
        let first = &trace.frames()[0];
        assert_eq!(first.line, Some(line));
        assert_eq!(renderable_count(trace.frames()), 2);

        assert!(Trace::capture_anchored("src/not_here.rs", 1, 2).is_none());
    }

    #[test]
    fn test_captured_trace_is_parseable() {
        let trace = capture_current_trace(GroomOptions::new().with_max_lines(5));
        let lines: Vec<&str> = trace.lines().collect();
        assert!(lines.len() <= 5);
        for line in lines {
            assert!(parse_line(line).is_ok(), "unparseable captured line: {line}");
        }
    }
}
