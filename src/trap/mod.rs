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

//! Policies for lines that could not be written.

use std::fmt;

use crate::Error;

pub use self::default::ReturnTrap;
pub use self::fatal::FatalTrap;

mod default;
mod fatal;

/// A policy invoked when a stream fails to accept a line.
///
/// The logger writes each line once and never retries. Whatever the trap returns is what the
/// logging call returns.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle the failure to write `line`.
    fn trap(&self, err: Error, line: &[u8]) -> Result<(), Error>;
}
