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
use std::env;
use std::fmt;
use std::sync::Arc;

use jiff::Zoned;

use super::Logger;
use super::LoggerInner;
use crate::Context;
use crate::Error;
use crate::ErrorKind;
use crate::append;
use crate::append::Append;
use crate::clock::Clock;
use crate::filter::Threshold;
use crate::layout::DEFAULT_TIMESTAMP_FORMAT;
use crate::layout::TextLayout;
use crate::layout::is_valid_timestamp_format;
use crate::trap::FatalTrap;
use crate::trap::ReturnTrap;
use crate::trap::Trap;

/// The context key tags are stored under unless [`Builder::tags_context_key`] says otherwise.
pub const DEFAULT_TAGS_CONTEXT_KEY: &str = "logsplit.tags";

/// A builder for configuring a [`Logger`]. See also [`Logger::builder`].
///
/// Every option left unset falls back to its default when the logger is built:
///
/// | option | default |
/// |---|---|
/// | [`out`](Builder::out) | [`Stdout`](append::Stdout) |
/// | [`err`](Builder::err) | [`Stderr`](append::Stderr) |
/// | [`threshold`](Builder::threshold) | [`Severity::Info`](crate::Severity::Info) |
/// | [`prefix`](Builder::prefix) | none |
/// | [`timestamp_format`](Builder::timestamp_format) | [`DEFAULT_TIMESTAMP_FORMAT`] |
/// | [`timestamp_func`](Builder::timestamp_func) | [`Zoned::now`] |
/// | [`tags_context_key`](Builder::tags_context_key) | [`DEFAULT_TAGS_CONTEXT_KEY`] |
///
/// Timestamps, function names and tags are rendered unless disabled. Write failures are
/// returned to the caller unless [`log_fatal`](Builder::log_fatal) is set.
///
/// ## Examples
///
/// ```rust
/// use logsplit::Context;
/// use logsplit::Logger;
/// use logsplit::Severity;
///
/// let (logger, ctx) = Logger::builder()
///     .threshold(Severity::Warning)
///     .prefix("[api]")
///     .build(&Context::background());
///
/// assert!(Logger::from_context(&ctx).is_some());
/// assert!(!logger.enabled(Severity::Info));
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Default)]
pub struct Builder {
    out: Option<Arc<dyn Append>>,
    err: Option<Arc<dyn Append>>,
    threshold: Option<Threshold>,
    prefix: Option<String>,
    disable_timestamps: bool,
    timestamp_format: Option<Cow<'static, str>>,
    clock: Option<Clock>,
    log_fatal: bool,
    disable_function_name: bool,
    disable_tags: bool,
    tags_context_key: Option<Cow<'static, str>>,
    trap: Option<Box<dyn Trap>>,
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("out", &self.out)
            .field("err", &self.err)
            .field("threshold", &self.threshold)
            .field("prefix", &self.prefix)
            .field("disable_timestamps", &self.disable_timestamps)
            .field("timestamp_format", &self.timestamp_format)
            .field("clock", &self.clock)
            .field("log_fatal", &self.log_fatal)
            .field("disable_function_name", &self.disable_function_name)
            .field("disable_tags", &self.disable_tags)
            .field("tags_context_key", &self.tags_context_key)
            .field("trap", &self.trap)
            .finish()
    }
}

impl Builder {
    /// Create a new [`Builder`] with every option unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output stream. Standard, info and debug lines go here.
    pub fn out(mut self, out: impl Append) -> Self {
        self.out = Some(Arc::new(out));
        self
    }

    /// Set the error stream. Critical, error and warning lines go here.
    pub fn err(mut self, err: impl Append) -> Self {
        self.err = Some(Arc::new(err));
        self
    }

    /// Send both streams to the same appender.
    pub fn combined(mut self, append: impl Append) -> Self {
        let append: Arc<dyn Append> = Arc::new(append);
        self.out = Some(append.clone());
        self.err = Some(append);
        self
    }

    /// Set the most verbose severity to write. A negative threshold disables logging.
    pub fn threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.threshold = Some(threshold.into());
        self
    }

    /// Read the threshold from the environment variable `var`.
    ///
    /// The value may be a severity name (`warn`, `debug`, ...), an integer, or `off`. If the
    /// variable is unset, the threshold is left as is.
    ///
    /// # Errors
    ///
    /// Return an error if the variable is set but cannot be parsed.
    pub fn threshold_from_env(self, var: &str) -> Result<Self, Error> {
        match env::var(var) {
            Ok(value) => {
                let threshold = value
                    .parse::<Threshold>()
                    .map_err(|err| err.with_context("variable", var))?;
                Ok(self.threshold(threshold))
            }
            Err(env::VarError::NotPresent) => Ok(self),
            Err(err) => Err(Error::new(ErrorKind::Config, "failed to read threshold")
                .with_context("variable", var)
                .with_source(err)),
        }
    }

    /// Set the text placed before each message, after the other decorations.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Do not render timestamps. Useful when the stream already adds its own.
    pub fn disable_timestamps(mut self) -> Self {
        self.disable_timestamps = true;
        self
    }

    /// Set the [`strftime`](jiff::fmt::strtime) format of timestamps.
    ///
    /// An empty or invalid format falls back to [`DEFAULT_TIMESTAMP_FORMAT`] when the logger is
    /// built.
    pub fn timestamp_format(mut self, format: impl Into<Cow<'static, str>>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    /// Set the function that provides the current time.
    pub fn timestamp_func<F>(mut self, now: F) -> Self
    where
        F: Fn() -> Zoned + Send + Sync + 'static,
    {
        self.clock = Some(Clock::Custom(Arc::new(now)));
        self
    }

    /// Exit the process when a line cannot be written, instead of returning the error.
    ///
    /// Ignored if a custom [`trap`](Builder::trap) is set.
    pub fn log_fatal(mut self, log_fatal: bool) -> Self {
        self.log_fatal = log_fatal;
        self
    }

    /// Set a custom policy for lines that cannot be written.
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Some(Box::new(trap));
        self
    }

    /// Do not render the name of the calling function.
    pub fn disable_function_name(mut self) -> Self {
        self.disable_function_name = true;
        self
    }

    /// Do not render tags.
    ///
    /// Tags can still be added, removed and read; they are only left out of the lines.
    pub fn disable_tags(mut self) -> Self {
        self.disable_tags = true;
        self
    }

    /// Set the context key tags are stored under.
    ///
    /// Loggers with different keys keep separate tags in the same context. An empty key falls
    /// back to [`DEFAULT_TAGS_CONTEXT_KEY`].
    pub fn tags_context_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.tags_context_key = Some(key.into());
        self
    }

    /// Build the logger, filling every unset option with its default.
    ///
    /// Returns the logger and a context derived from `ctx` that carries it, so that
    /// [`Logger::from_context`] can retrieve it.
    pub fn build(self, ctx: &Context) -> (Logger, Context) {
        let Self {
            out,
            err,
            threshold,
            prefix,
            disable_timestamps,
            timestamp_format,
            clock,
            log_fatal,
            disable_function_name,
            disable_tags,
            tags_context_key,
            trap,
        } = self;

        let trap: Box<dyn Trap> = match trap {
            Some(trap) => trap,
            None if log_fatal => Box::new(FatalTrap::default()),
            None => Box::new(ReturnTrap::default()),
        };
        let out: Arc<dyn Append> = match out {
            Some(out) => out,
            None => Arc::new(append::Stdout::default()),
        };
        let err: Arc<dyn Append> = match err {
            Some(err) => err,
            None => Arc::new(append::Stderr::default()),
        };

        let layout = TextLayout {
            timestamps: !disable_timestamps,
            timestamp_format: timestamp_format
                .filter(|format| is_valid_timestamp_format(format))
                .unwrap_or(Cow::Borrowed(DEFAULT_TIMESTAMP_FORMAT)),
            clock: clock.unwrap_or_default(),
            function_name: !disable_function_name,
            tags: !disable_tags,
            prefix: prefix.unwrap_or_default(),
        };

        let logger = Logger {
            inner: Arc::new(LoggerInner {
                out,
                err,
                threshold: threshold.unwrap_or_default(),
                layout,
                tags_key: tags_context_key
                    .filter(|key| !key.is_empty())
                    .unwrap_or(Cow::Borrowed(DEFAULT_TAGS_CONTEXT_KEY)),
                trap,
            }),
        };

        let ctx = ctx.with_logger(logger.clone());
        (logger, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_defaults() {
        let (logger, _) = Builder::new().build(&Context::background());
        let inner = &logger.inner;

        assert_eq!(inner.threshold, Threshold::from(Severity::Info));
        assert_eq!(inner.tags_key, DEFAULT_TAGS_CONTEXT_KEY);
        assert_eq!(inner.layout.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(inner.layout.timestamps);
        assert!(inner.layout.function_name);
        assert!(inner.layout.tags);
        assert!(inner.layout.prefix.is_empty());
        assert!(matches!(inner.layout.clock, Clock::System));
    }

    #[test]
    fn test_empty_values_fall_back() {
        let (logger, _) = Builder::new()
            .timestamp_format("")
            .tags_context_key("")
            .build(&Context::background());

        assert_eq!(logger.inner.tags_key, DEFAULT_TAGS_CONTEXT_KEY);
        assert_eq!(logger.inner.layout.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);

        let (logger, _) = Builder::new()
            .timestamp_format("%Y %")
            .build(&Context::background());
        assert_eq!(logger.inner.layout.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);

        let (logger, _) = Builder::new()
            .timestamp_format("%H:%M")
            .build(&Context::background());
        assert_eq!(logger.inner.layout.timestamp_format, "%H:%M");
    }

    #[test]
    fn test_threshold_zero_is_kept() {
        let (logger, _) = Builder::new()
            .threshold(Severity::Standard)
            .build(&Context::background());
        assert_eq!(logger.threshold().as_raw(), 0);
    }

    #[test]
    fn test_build_attaches_logger() {
        let base = Context::background().with_value("request", 7u32);
        let (logger, ctx) = Builder::new().prefix("p").build(&base);

        let found = Logger::from_context(&ctx).unwrap();
        assert!(Arc::ptr_eq(&found.inner, &logger.inner));
        assert_eq!(ctx.value::<u32>("request"), Some(&7));
        assert!(Logger::from_context(&base).is_none());
    }

    #[derive(Debug)]
    struct Ignore;

    impl Trap for Ignore {
        fn trap(&self, _: Error, _: &[u8]) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_trap_selection() {
        let trap_of = |builder: Builder| {
            let (logger, _) = builder.build(&Context::background());
            format!("{:?}", logger.inner.trap)
        };

        assert_eq!(trap_of(Builder::new()), "ReturnTrap");
        assert_eq!(trap_of(Builder::new().log_fatal(false)), "ReturnTrap");
        assert_eq!(trap_of(Builder::new().log_fatal(true)), "FatalTrap");
        assert_eq!(trap_of(Builder::new().log_fatal(true).trap(Ignore)), "Ignore");
        assert_eq!(trap_of(Builder::new().trap(Ignore).log_fatal(true)), "Ignore");
    }

    #[test]
    fn test_threshold_from_env() {
        let var = "LOGSPLIT_TEST_THRESHOLD_FROM_ENV_UNSET";
        let builder = Builder::new().threshold(2).threshold_from_env(var).unwrap();
        assert_eq!(builder.threshold, Some(Threshold::new(2)));
    }
}
