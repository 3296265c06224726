// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub use self::builder::Builder;
pub use self::builder::DEFAULT_TAGS_CONTEXT_KEY;
use crate::Context;
use crate::Error;
use crate::Severity;
use crate::Stream;
use crate::Tags;
use crate::append::Append;
use crate::filter;
use crate::filter::Threshold;
use crate::layout::Payload;
use crate::layout::TextLayout;
use crate::layout::short_function_name;
use crate::tags;
use crate::tags::TagValue;
use crate::trap::Trap;

mod builder;

const LOOKUP_FAILED: &str = "failed to dynamically lookup function name";

/// A leveled logger that splits lines between an output and an error stream.
///
/// Cloning a logger is cheap and every clone shares the same streams and configuration.
///
/// Each accepted line is written once to exactly one stream: [`Severity::Standard`], info and
/// debug lines go to the output stream, everything else to the error stream. No lock is held
/// while writing, so concurrent lines may interleave unless the stream prevents it.
///
/// # Examples
///
/// ```
/// use logsplit::Context;
/// use logsplit::Logger;
/// use logsplit::Severity;
/// use logsplit::append::Buffer;
///
/// let out = Buffer::default();
/// let err = Buffer::default();
/// let (logger, ctx) = Logger::builder()
///     .out(out.clone())
///     .err(err.clone())
///     .threshold(Severity::Debug)
///     .disable_timestamps()
///     .build(&Context::background());
///
/// let (_, ctx) = logger.add_tag(&ctx, "request", 42);
/// logger.infof(&ctx, format_args!("served in {}ms", 3)).unwrap();
/// logger.warning(&ctx, &[&"slow", &"upstream"]).unwrap();
///
/// assert_eq!(out.contents(), "INFO [request:42] served in 3ms\n");
/// assert_eq!(err.contents(), "WARN [request:42] slow upstream\n");
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    out: Arc<dyn Append>,
    err: Arc<dyn Append>,
    threshold: Threshold,
    layout: TextLayout,
    tags_key: Cow<'static, str>,
    trap: Box<dyn Trap>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &self.inner;
        f.debug_struct("Logger")
            .field("out", &inner.out)
            .field("err", &inner.err)
            .field("threshold", &inner.threshold)
            .field("layout", &inner.layout)
            .field("tags_key", &inner.tags_key)
            .field("trap", &inner.trap)
            .finish()
    }
}

impl Logger {
    /// Create a new [`Builder`] with every option at its default.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The logger attached to `ctx` by [`Builder::build`], if any.
    pub fn from_context(ctx: &Context) -> Option<Logger> {
        ctx.logger().cloned()
    }

    /// The configured threshold.
    pub fn threshold(&self) -> Threshold {
        self.inner.threshold
    }

    /// Whether a line of `severity` would be written.
    pub fn enabled(&self, severity: impl Into<Severity>) -> bool {
        filter::should_emit(severity, self.inner.threshold)
    }

    /// Log space-separated values at `severity`.
    pub fn log(
        &self,
        ctx: &Context,
        severity: impl Into<Severity>,
        values: &[&dyn fmt::Display],
    ) -> Result<(), Error> {
        self.dispatch(ctx, severity.into(), None, Payload::Values(values))
    }

    /// Log formatted arguments at `severity`.
    pub fn logf(
        &self,
        ctx: &Context,
        severity: impl Into<Severity>,
        args: fmt::Arguments<'_>,
    ) -> Result<(), Error> {
        self.dispatch(ctx, severity.into(), None, Payload::Args(args))
    }

    /// Log at `severity`, attributing the line to `function`.
    ///
    /// `function` may be fully qualified; only its last segment is rendered. If function names
    /// are enabled and `function` cannot be resolved to a name, a critical diagnostic is written
    /// to the error stream first and the line is rendered without a function name.
    ///
    /// This is what the [`log!`](crate::log!) family of macros expands to.
    pub fn log_at<'a>(
        &self,
        ctx: &Context,
        severity: impl Into<Severity>,
        function: &str,
        payload: impl Into<Payload<'a>>,
    ) -> Result<(), Error> {
        self.dispatch(ctx, severity.into(), Some(function), payload.into())
    }

    pub(crate) fn dispatch(
        &self,
        ctx: &Context,
        severity: Severity,
        function: Option<&str>,
        payload: Payload<'_>,
    ) -> Result<(), Error> {
        let inner = &self.inner;
        if !filter::should_emit(severity, inner.threshold) {
            return Ok(());
        }

        let function = match function {
            Some(raw) if inner.layout.function_name => {
                let name = short_function_name(raw);
                if name.is_none() {
                    // a failed diagnostic must not stop the original line; fatal traps still exit
                    let _ = self.lookup_failed();
                }
                name
            }
            _ => None,
        };

        let tags = if inner.layout.tags {
            tags::all_tags(ctx, &inner.tags_key)
        } else {
            Tags::default()
        };

        let line = inner.layout.format(severity, function, &tags, payload)?;
        self.write(severity.stream(), &line)
    }

    fn lookup_failed(&self) -> Result<(), Error> {
        let line = self.inner.layout.format(
            Severity::Critical,
            None,
            &Tags::default(),
            Payload::Args(format_args!("{LOOKUP_FAILED}")),
        )?;
        self.write(Stream::Err, &line)
    }

    fn write(&self, stream: Stream, line: &[u8]) -> Result<(), Error> {
        let inner = &self.inner;
        let (append, name) = match stream {
            Stream::Out => (&inner.out, "out"),
            Stream::Err => (&inner.err, "err"),
        };

        match append.append(line) {
            Ok(()) => Ok(()),
            Err(err) => inner.trap.trap(err.with_context("stream", name), line),
        }
    }

    /// Flush both streams.
    pub fn flush(&self) -> Result<(), Error> {
        self.inner.out.flush()?;
        self.inner.err.flush()
    }

    /// Log a standard line. Standard lines are written whenever logging is enabled.
    pub fn std(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Standard, values)
    }

    /// Log a formatted standard line.
    pub fn stdf(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Standard, args)
    }

    /// Log a critical line.
    pub fn critical(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Critical, values)
    }

    /// Log a formatted critical line.
    pub fn criticalf(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Critical, args)
    }

    /// Log an error line.
    pub fn error(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Error, values)
    }

    /// Log a formatted error line.
    pub fn errorf(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Error, args)
    }

    /// Log a warning line.
    pub fn warning(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Warning, values)
    }

    /// Log a formatted warning line.
    pub fn warningf(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Warning, args)
    }

    /// Log an info line.
    pub fn info(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Info, values)
    }

    /// Log a formatted info line.
    pub fn infof(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Info, args)
    }

    /// Log a debug line.
    pub fn debug(&self, ctx: &Context, values: &[&dyn fmt::Display]) -> Result<(), Error> {
        self.log(ctx, Severity::Debug, values)
    }

    /// Log a formatted debug line.
    pub fn debugf(&self, ctx: &Context, args: fmt::Arguments<'_>) -> Result<(), Error> {
        self.logf(ctx, Severity::Debug, args)
    }

    /// All tags in `ctx`, or none if no tag was ever added to it.
    pub fn tags(&self, ctx: &Context) -> Tags {
        tags::all_tags(ctx, &self.inner.tags_key)
    }

    /// A single tag in `ctx`.
    pub fn tag(&self, ctx: &Context, name: &str) -> Option<TagValue> {
        tags::get_tag(ctx, &self.inner.tags_key, name)
    }

    /// Add or overwrite a tag.
    ///
    /// Returns the tags after the write and a context carrying them. The context is `ctx` itself
    /// if it already carries tags, so reassigning it in a loop does not grow it. An empty `name`
    /// changes nothing and returns `ctx` as is.
    pub fn add_tag(
        &self,
        ctx: &Context,
        name: &str,
        value: impl Into<TagValue>,
    ) -> (Tags, Context) {
        tags::add_tag(ctx, &self.inner.tags_key, name, value.into())
    }

    /// Remove a tag. Removing a tag that does not exist is not an error.
    ///
    /// Returns the tags after the removal and a context carrying them. An empty `name` changes
    /// nothing and returns `ctx` as is.
    pub fn remove_tag(&self, ctx: &Context, name: &str) -> (Tags, Context) {
        tags::remove_tag(ctx, &self.inner.tags_key, name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ErrorKind;
    use crate::append::Buffer;

    #[derive(Debug)]
    struct Broken;

    impl Append for Broken {
        fn append(&self, _: &[u8]) -> Result<(), Error> {
            Err(Error::new(ErrorKind::Write, "stream closed"))
        }
    }

    #[derive(Debug)]
    struct Unflushable;

    impl Append for Unflushable {
        fn append(&self, _: &[u8]) -> Result<(), Error> {
            Ok(())
        }

        fn flush(&self) -> Result<(), Error> {
            Err(Error::new(ErrorKind::Write, "flush failed"))
        }
    }

    #[derive(Debug, Default)]
    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Trap for Recording {
        fn trap(&self, err: Error, line: &[u8]) -> Result<(), Error> {
            let mut records = self.0.lock().unwrap();
            records.push(format!("{} | {}", err.message(), String::from_utf8_lossy(line)));
            Ok(())
        }
    }

    fn quiet() -> Builder {
        Logger::builder().disable_timestamps()
    }

    #[test]
    fn test_write_failure_is_returned() {
        let (logger, ctx) = quiet().err(Broken).build(&Context::background());
        let err = logger.critical(&ctx, &[&"boom"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(err.to_string().contains("stream: err"), "{err}");
    }

    #[test]
    fn test_filtered_line_never_fails() {
        let (logger, ctx) = quiet()
            .err(Broken)
            .threshold(Severity::Standard)
            .build(&Context::background());
        logger.critical(&ctx, &[&"suppressed"]).unwrap();
    }

    #[test]
    fn test_trap_decides_outcome() {
        let records = Arc::new(Mutex::new(vec![]));
        let (logger, ctx) = quiet()
            .out(Broken)
            .trap(Recording(records.clone()))
            .build(&Context::background());

        logger.info(&ctx, &[&"lost"]).unwrap();
        assert_eq!(*records.lock().unwrap(), ["stream closed | INFO lost\n"]);
    }

    #[test]
    fn test_flush() {
        let (logger, _) = quiet()
            .out(Buffer::default())
            .err(Buffer::default())
            .build(&Context::background());
        logger.flush().unwrap();

        let (logger, _) = quiet()
            .out(Buffer::default())
            .err(Unflushable)
            .build(&Context::background());
        let err = logger.flush().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert_eq!(err.message(), "flush failed");
    }

    #[test]
    fn test_unresolvable_function_name() {
        let out = Buffer::default();
        let err = Buffer::default();
        let (logger, ctx) = quiet()
            .out(out.clone())
            .err(err.clone())
            .build(&Context::background());

        logger
            .log_at(&ctx, Severity::Info, "", format_args!("still here"))
            .unwrap();
        assert_eq!(err.contents(), format!("CRIT {LOOKUP_FAILED}\n"));
        assert_eq!(out.contents(), "INFO still here\n");
    }

    #[test]
    fn test_unresolvable_function_name_ignored_when_disabled() {
        let err = Buffer::default();
        let (logger, ctx) = quiet()
            .out(Buffer::default())
            .err(err.clone())
            .disable_function_name()
            .build(&Context::background());

        logger
            .log_at(&ctx, Severity::Info, "", format_args!("quiet"))
            .unwrap();
        assert!(err.is_empty());
    }

    #[test]
    fn test_failed_diagnostic_does_not_stop_line() {
        let out = Buffer::default();
        let (logger, ctx) = quiet()
            .out(out.clone())
            .err(Broken)
            .build(&Context::background());

        logger
            .log_at(&ctx, Severity::Info, "{{closure}}", format_args!("kept"))
            .unwrap();
        assert_eq!(out.contents(), "INFO kept\n");
    }

    #[test]
    fn test_disabled_logger_skips_diagnostic() {
        let err = Buffer::default();
        let (logger, ctx) = quiet()
            .err(err.clone())
            .threshold(Threshold::DISABLED)
            .build(&Context::background());

        logger
            .log_at(&ctx, Severity::Standard, "", format_args!("nothing"))
            .unwrap();
        assert!(err.is_empty());
    }
}
