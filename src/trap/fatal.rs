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

use std::io;
use std::io::Write;

use crate::Error;
use crate::trap::Trap;

/// A trap that records the failing line on the process's stderr and exits.
///
/// Installed by [`Builder::log_fatal`](crate::Builder::log_fatal). The process exits with
/// status 1 even if the record itself cannot be written.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct FatalTrap {}

impl Trap for FatalTrap {
    fn trap(&self, err: Error, line: &[u8]) -> Result<(), Error> {
        let _ = write!(
            io::stderr(),
            r###"
Error perform logging.
    Attempted to log: {line}
    Error: {err:?}
"###,
            line = String::from_utf8_lossy(line).trim_end(),
        );
        std::process::exit(1)
    }
}
