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
use std::fmt::Write;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;
use crate::Severity;
use crate::Tags;
use crate::clock::Clock;
use crate::layout::Payload;

/// The default timestamp format: RFC 3339 with second precision and a numeric offset.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Shorten a fully qualified function name to its last path segment.
///
/// Trailing closure segments are dropped, so a call from a closure is attributed to the
/// function that defines it. Returns `None` if nothing is left.
///
/// # Examples
///
/// ```
/// use logsplit::layout::short_function_name;
///
/// assert_eq!(short_function_name("app::server::handle"), Some("handle"));
/// assert_eq!(short_function_name("app::run::{{closure}}"), Some("run"));
/// assert_eq!(short_function_name(""), None);
/// ```
pub fn short_function_name(raw: &str) -> Option<&str> {
    let mut name = raw.trim();
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }

    let short = match name.rsplit_once("::") {
        Some((_, last)) => last,
        None => name,
    };
    if short.is_empty() || short == "{{closure}}" {
        None
    } else {
        Some(short)
    }
}

/// Whether `format` is a non-empty `strftime` format that jiff can render.
pub(crate) fn is_valid_timestamp_format(format: &str) -> bool {
    let sample = Timestamp::UNIX_EPOCH.to_zoned(TimeZone::UTC);
    !format.is_empty() && jiff::fmt::strtime::format(format.as_bytes(), &sample).is_ok()
}

/// A layout that formats a line as text.
///
/// Output format, with every decoration enabled:
///
/// ```text
/// 2024-08-11T22:44:57+08:00 OUT handle [request:42, user:alice] ~~~ what comes before?
/// 2024-08-11T22:44:57+08:00 WARN handle something is not right
/// ```
///
/// Segments are separated by single spaces. Disabled or empty segments are left out entirely,
/// including the tag list when there are no tags.
#[derive(Debug, Clone)]
pub(crate) struct TextLayout {
    pub(crate) timestamps: bool,
    pub(crate) timestamp_format: Cow<'static, str>,
    pub(crate) clock: Clock,
    pub(crate) function_name: bool,
    pub(crate) tags: bool,
    pub(crate) prefix: String,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            timestamps: true,
            timestamp_format: Cow::Borrowed(DEFAULT_TIMESTAMP_FORMAT),
            clock: Clock::default(),
            function_name: true,
            tags: true,
            prefix: String::new(),
        }
    }
}

impl TextLayout {
    pub(crate) fn format(
        &self,
        severity: Severity,
        function: Option<&str>,
        tags: &Tags,
        payload: Payload<'_>,
    ) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        if self.timestamps {
            let now = self.clock.now();
            let time = jiff::fmt::strtime::format(self.timestamp_format.as_bytes(), &now)
                .map_err(|err| {
                    Error::new(ErrorKind::Format, "failed to format timestamp")
                        .with_context("format", &self.timestamp_format)
                        .with_source(err)
                })?;
            text.push_str(&time);
            text.push(' ');
        }

        text.push_str(severity.as_str());
        self.write_decorations(&mut text, function, tags)
            .map_err(Error::from_fmt_error)?;

        let start = text.len();
        write!(&mut text, " {payload}").map_err(Error::from_fmt_error)?;
        if text.len() == start + 1 {
            text.truncate(start);
        }

        text.push('\n');
        Ok(text.into_bytes())
    }

    fn write_decorations(
        &self,
        text: &mut String,
        function: Option<&str>,
        tags: &Tags,
    ) -> std::fmt::Result {
        if let Some(function) = function.filter(|_| self.function_name) {
            write!(text, " {function}")?;
        }
        if self.tags && !tags.is_empty() {
            write!(text, " {tags}")?;
        }
        if !self.prefix.is_empty() {
            write!(text, " {}", self.prefix)?;
        }
        Ok(())
    }
}
