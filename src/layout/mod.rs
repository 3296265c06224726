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

//! Rendering of log lines.

use std::fmt;

pub(crate) use self::text::TextLayout;
pub use self::text::DEFAULT_TIMESTAMP_FORMAT;
pub use self::text::short_function_name;
pub(crate) use self::text::is_valid_timestamp_format;

mod text;

/// The user-supplied part of a log line.
#[derive(Clone, Copy)]
pub enum Payload<'a> {
    /// A format string already applied to its arguments, e.g. from [`format_args!`].
    Args(fmt::Arguments<'a>),
    /// Loose values, rendered with their [`fmt::Display`] impls and joined by single spaces.
    Values(&'a [&'a dyn fmt::Display]),
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Args(args) => f.write_fmt(*args),
            Payload::Values(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Args(args) => f.debug_tuple("Args").field(args).finish(),
            Payload::Values(values) => f.debug_tuple("Values").field(&values.len()).finish(),
        }
    }
}

impl<'a> From<fmt::Arguments<'a>> for Payload<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        Payload::Args(args)
    }
}

impl<'a> From<&'a [&'a dyn fmt::Display]> for Payload<'a> {
    fn from(values: &'a [&'a dyn fmt::Display]) -> Self {
        Payload::Values(values)
    }
}
