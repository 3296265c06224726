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

use std::fmt;
use std::io;

/// A handler that processes each byte slice before it reaches the inner writer.
pub type WriteFn = dyn Fn(&mut dyn io::Write, &[u8]) -> io::Result<()> + Send + Sync;

/// Forward bytes to the inner writer unchanged.
pub fn default_write_fn(out: &mut dyn io::Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)
}

/// An [`io::Write`] adapter that hands every write to a [`WriteFn`] along with the inner writer.
///
/// The handler decides what, if anything, reaches the inner writer. A successful write always
/// reports the full length of the input. Empty writes never reach the handler.
///
/// Wrap it in [`Writer`](crate::append::Writer) to use it as a log stream.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use logsplit::append::FilterWriter;
///
/// let mut writer = FilterWriter::new(Vec::new(), |out, bytes| {
///     for line in bytes.split_inclusive(|b| *b == b'\n') {
///         if !line.starts_with(b"DEBUG") {
///             out.write_all(line)?;
///         }
///     }
///     Ok(())
/// });
///
/// writer.write_all(b"DEBUG noisy\nINFO useful\n").unwrap();
/// assert_eq!(writer.get_ref(), b"INFO useful\n");
/// ```
pub struct FilterWriter<W> {
    handler: Box<WriteFn>,
    out: W,
}

impl<W: io::Write> FilterWriter<W> {
    /// Create a writer that passes every write through `handler`.
    pub fn new<F>(out: W, handler: F) -> Self
    where
        F: Fn(&mut dyn io::Write, &[u8]) -> io::Result<()> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            out,
        }
    }

    /// Create a writer that forwards bytes unchanged.
    pub fn passthrough(out: W) -> Self {
        Self::new(out, default_write_fn)
    }

    /// Borrow the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W> fmt::Debug for FilterWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterWriter").finish_non_exhaustive()
    }
}

impl<W: io::Write> io::Write for FilterWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        (self.handler)(&mut self.out, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
