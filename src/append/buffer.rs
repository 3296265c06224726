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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Error;
use crate::append::Append;

/// An appender that collects lines in memory.
///
/// Clones share the same bytes, so a test can keep one handle and give the other to a logger.
///
/// # Examples
///
/// ```
/// use logsplit::Context;
/// use logsplit::Logger;
/// use logsplit::append::Buffer;
///
/// let out = Buffer::default();
/// let (logger, ctx) = Logger::builder()
///     .out(out.clone())
///     .disable_timestamps()
///     .build(&Context::background());
///
/// logger.std(&ctx, &[&"hello"]).unwrap();
/// assert_eq!(out.contents(), "OUT hello\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Buffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The collected bytes, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// The collected lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Append for Buffer {
    fn append(&self, line: &[u8]) -> Result<(), Error> {
        self.lock().extend_from_slice(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_bytes() {
        let buffer = Buffer::default();
        let handle = buffer.clone();
        handle.append(b"one\n").unwrap();
        handle.append(b"two\n").unwrap();
        assert_eq!(buffer.lines(), ["one", "two"]);

        buffer.clear();
        assert!(handle.is_empty());
        handle.append(b"three\n").unwrap();
        assert_eq!(buffer.contents(), "three\n");
    }
}
