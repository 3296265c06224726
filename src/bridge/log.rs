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

use std::env;
use std::io::Write;

use crate::Context;
use crate::Error;
use crate::ErrorKind;
use crate::Logger;
use crate::Severity;
use crate::Threshold;
use crate::layout::Payload;

/// The conventional environment variable for [`LogBridge::filter_from_env`].
pub const DEFAULT_FILTER_ENV: &str = "RUST_LOG";

/// Forwards records from the [`log`] crate to a [`Logger`].
///
/// Levels map as follows: `Error` to [`Severity::Error`], `Warn` to [`Severity::Warning`],
/// `Info` to [`Severity::Info`], `Debug` and `Trace` to [`Severity::Debug`]. The record's module
/// path takes the place of the function name, and lines carry the tags of the bridge's context.
///
/// Records pass the logger's threshold and, if set, an [`env_filter`] directive filter.
///
/// # Examples
///
/// ```
/// use logsplit::Context;
/// use logsplit::Logger;
/// use logsplit::bridge::LogBridge;
///
/// let (logger, ctx) = Logger::builder().build(&Context::background());
/// let (_, ctx) = logger.add_tag(&ctx, "service", "billing");
///
/// LogBridge::new(logger)
///     .context(ctx)
///     .filter("info,hyper=warn")
///     .unwrap()
///     .apply();
///
/// log::info!("ready");
/// ```
#[derive(Debug)]
pub struct LogBridge {
    logger: Logger,
    ctx: Context,
    filter: Option<env_filter::Filter>,
}

impl LogBridge {
    /// Create a bridge that logs through `logger` with an empty context and no filter.
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            ctx: Context::background(),
            filter: None,
        }
    }

    /// Set the context records are logged with. Its tags decorate every forwarded line.
    pub fn context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    /// Filter records with `env_logger`-style directives, e.g. `info,my_crate::db=debug`.
    ///
    /// # Errors
    ///
    /// Return an error if the directives cannot be parsed.
    pub fn filter(mut self, directives: &str) -> Result<Self, Error> {
        let mut builder = env_filter::Builder::new();
        builder.try_parse(directives).map_err(|err| {
            Error::new(ErrorKind::Config, "failed to parse filter directives")
                .with_context("directives", directives)
                .with_source(err)
        })?;
        self.filter = Some(builder.build());
        Ok(self)
    }

    /// Filter records with the directives in the environment variable `var`, usually
    /// [`DEFAULT_FILTER_ENV`]. If the variable is unset, records are not filtered.
    ///
    /// # Errors
    ///
    /// Return an error if the variable is set but cannot be read or parsed.
    pub fn filter_from_env(self, var: &str) -> Result<Self, Error> {
        match env::var(var) {
            Ok(directives) => self
                .filter(&directives)
                .map_err(|err| err.with_context("variable", var)),
            Err(env::VarError::NotPresent) => Ok(self),
            Err(err) => Err(Error::new(ErrorKind::Config, "failed to read filter")
                .with_context("variable", var)
                .with_source(err)),
        }
    }

    /// The most verbose level this bridge can forward.
    fn max_level(&self) -> log::LevelFilter {
        let from_threshold = max_level_of(self.logger.threshold());
        match &self.filter {
            Some(filter) => from_threshold.min(filter.filter()),
            None => from_threshold,
        }
    }

    /// Install this bridge as the global logger of the `log` crate.
    ///
    /// The global maximum level is lowered to what the logger's threshold and the filter can
    /// accept, so that rejected records are skipped before they are formatted.
    ///
    /// # Errors
    ///
    /// Return an error if the global logger has already been set.
    pub fn try_apply(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Install this bridge as the global logger of the `log` crate.
    ///
    /// Unlike [`try_apply`](LogBridge::try_apply), a global logger that is already set is left in
    /// place and this bridge is dropped.
    pub fn apply(self) {
        let _ = self.try_apply();
    }
}

fn severity_of(level: log::Level) -> Severity {
    match level {
        log::Level::Error => Severity::Error,
        log::Level::Warn => Severity::Warning,
        log::Level::Info => Severity::Info,
        log::Level::Debug | log::Level::Trace => Severity::Debug,
    }
}

fn max_level_of(threshold: Threshold) -> log::LevelFilter {
    match threshold.as_raw() {
        raw if raw >= Severity::Debug.as_raw() => log::LevelFilter::Trace,
        raw if raw == Severity::Info.as_raw() => log::LevelFilter::Info,
        raw if raw == Severity::Warning.as_raw() => log::LevelFilter::Warn,
        raw if raw >= Severity::Critical.as_raw() => log::LevelFilter::Error,
        // standard-only or disabled: no record maps to Standard
        _ => log::LevelFilter::Off,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if let Some(filter) = &self.filter {
            if !filter.enabled(metadata) {
                return false;
            }
        }
        self.logger.enabled(severity_of(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(filter) = &self.filter {
            if !filter.matches(record) {
                return;
            }
        }

        // records without a module path or target simply render no function name
        let function = record
            .module_path()
            .filter(|path| !path.is_empty())
            .or_else(|| Some(record.target()).filter(|target| !target.is_empty()));
        let severity = severity_of(record.level());
        let payload = Payload::Args(*record.args());
        if let Err(err) = self.logger.dispatch(&self.ctx, severity, function, payload) {
            handle_log_error(record, err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.logger.flush() {
            handle_flush_error(err);
        }
    }
}

// `log::Log` cannot return errors; report them on stderr as a last resort.
fn handle_log_error(record: &log::Record, error: Error) {
    let _ = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
"###,
        args = record.args(),
        record = record,
        error = error,
    );
}

fn handle_flush_error(error: Error) {
    let _ = write!(
        std::io::stderr(),
        r###"
Error perform flush.
    Error: {error:?}
"###,
    );
}
