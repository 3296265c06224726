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

//! Output streams for rendered lines.

use std::fmt;
use std::sync::Arc;

use crate::Error;

pub use self::buffer::Buffer;
pub use self::filter_writer::FilterWriter;
pub use self::filter_writer::WriteFn;
pub use self::filter_writer::default_write_fn;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::writer::Writer;

mod buffer;
mod filter_writer;
mod stdio;
mod writer;

/// A stream that accepts rendered lines.
///
/// Appenders take `&self` and synchronize themselves: the logger holds no lock while it writes,
/// so concurrent lines may interleave unless the appender prevents it.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Write one whole line, including its line terminator.
    fn append(&self, line: &[u8]) -> Result<(), Error>;

    /// Flush any buffered bytes.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Append + ?Sized> Append for Arc<T> {
    fn append(&self, line: &[u8]) -> Result<(), Error> {
        (**self).append(line)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }
}

impl<T: Append + ?Sized> Append for Box<T> {
    fn append(&self, line: &[u8]) -> Result<(), Error> {
        (**self).append(line)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }
}
