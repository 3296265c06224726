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

//! Logsplit is a leveled logger that splits its lines between an output stream and an error
//! stream, and decorates them with request-scoped tags.
//!
//! # Overview
//!
//! Each line carries one of six [`Severity`] levels. Standard, info and debug lines go to the
//! output stream (stdout by default); critical, error and warning lines go to the error stream
//! (stderr by default). A [`Threshold`] decides which lines are written at all.
//!
//! Lines are rendered as
//!
//! ```text
//! [timestamp ]LABEL[ function][ [tags]][ prefix][ message]
//! ```
//!
//! Tags are name/value pairs stored in a [`Context`]. Every context derived from the one a tag
//! was added to sees it, so a request handler can tag its context once and have every line
//! logged for that request carry the tag.
//!
//! # Examples
//!
//! Log with the defaults:
//!
//! ```
//! use logsplit::Context;
//! use logsplit::Logger;
//!
//! let (logger, ctx) = Logger::builder().build(&Context::background());
//! let (_, ctx) = logger.add_tag(&ctx, "request", 42);
//!
//! logsplit::info!(logger, &ctx, "listening on {}", 8080).unwrap();
//! logsplit::warning!(logger, &ctx, "config file missing, using defaults").unwrap();
//! ```
//!
//! Capture lines and fix the clock:
//!
//! ```
//! use jiff::Timestamp;
//! use jiff::tz::TimeZone;
//! use logsplit::Context;
//! use logsplit::Logger;
//! use logsplit::Severity;
//! use logsplit::append::Buffer;
//!
//! let out = Buffer::default();
//! let (logger, ctx) = Logger::builder()
//!     .combined(out.clone())
//!     .threshold(Severity::Debug)
//!     .prefix("[worker]")
//!     .disable_function_name()
//!     .timestamp_func(|| Timestamp::UNIX_EPOCH.to_zoned(TimeZone::UTC))
//!     .build(&Context::background());
//!
//! logger.debugf(&ctx, format_args!("picked up job {}", 7)).unwrap();
//! assert_eq!(out.contents(), "1970-01-01T00:00:00+00:00 DEBUG [worker] picked up job 7\n");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
mod macros;

pub mod append;
pub mod filter;
pub mod layout;
pub mod trap;

#[cfg(feature = "bridge-log")]
pub mod bridge;

mod clock;
mod context;
mod error;
mod logger;
mod severity;
mod tags;

pub use self::append::Append;
pub use self::context::Context;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::filter::Threshold;
pub use self::layout::Payload;
pub use self::logger::Builder;
pub use self::logger::DEFAULT_TAGS_CONTEXT_KEY;
pub use self::logger::Logger;
pub use self::severity::Severity;
pub use self::severity::Stream;
pub use self::tags::TagStore;
pub use self::tags::TagValue;
pub use self::tags::Tags;
pub use self::trap::Trap;
