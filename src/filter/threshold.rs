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
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;
use crate::Severity;

/// The most verbose severity a logger lets through.
///
/// From least to most verbose, the severities are:
///
/// - `Critical`
/// - `Error`
/// - `Warning`
/// - `Info`
/// - `Debug`
///
/// If the threshold is set to `Warning`, it will allow `Critical`, `Error` and `Warning` lines.
/// `Standard` lines are always allowed.
///
/// Any negative threshold disables logging completely.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Threshold(i32);

impl Threshold {
    /// A threshold that disables logging completely.
    pub const DISABLED: Threshold = Threshold(-1);

    /// Create a threshold from a raw integer.
    pub fn new(raw: i32) -> Self {
        Threshold(raw)
    }

    /// The integer value of this threshold.
    pub fn as_raw(self) -> i32 {
        self.0
    }

    /// Whether logging is disabled entirely.
    pub fn is_disabled(self) -> bool {
        self.0 < 0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Severity::Info.into()
    }
}

impl From<Severity> for Threshold {
    fn from(severity: Severity) -> Self {
        Threshold(severity.as_raw())
    }
}

impl From<i32> for Threshold {
    fn from(raw: i32) -> Self {
        Threshold(raw)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_disabled() {
            f.pad("OFF")
        } else {
            match self.0 {
                0..=5 => fmt::Display::fmt(&Severity::from_raw(self.0), f),
                raw => fmt::Display::fmt(&raw, f),
            }
        }
    }
}

impl FromStr for Threshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("disabled") {
            return Ok(Threshold::DISABLED);
        }
        if let Ok(raw) = s.parse::<i32>() {
            return Ok(Threshold(raw));
        }
        s.parse::<Severity>()
            .map(Threshold::from)
            .map_err(|err| Error::new(ErrorKind::Config, "invalid threshold").with_source(err))
    }
}
