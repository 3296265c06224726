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

//! Severity levels and the streams they are routed to.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

/// An enum representing the available severity levels.
///
/// Lower values are more urgent, except for [`Severity::Standard`], which is the baseline that
/// is always emitted while logging is enabled.
#[repr(i32)]
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    /// Standard log output. Always shown.
    Standard = 0,
    /// A fatal issue.
    Critical = 1,
    /// A general issue that was recovered.
    Error = 2,
    /// An issue that may require intervention.
    Warning = 3,
    /// Generic runtime information.
    Info = 4,
    /// Debug output.
    Debug = 5,
}

/// The stream a line is written to.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Stream {
    /// The output stream, stdout by default.
    Out,
    /// The error stream, stderr by default.
    Err,
}

impl Severity {
    /// All declared severities, from the baseline to the most verbose.
    pub const ALL: [Severity; 6] = [
        Severity::Standard,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
    ];

    /// Convert a raw integer into a severity.
    ///
    /// Values outside the declared range are normalized to [`Severity::Standard`].
    pub fn from_raw(raw: i32) -> Severity {
        match raw {
            1 => Severity::Critical,
            2 => Severity::Error,
            3 => Severity::Warning,
            4 => Severity::Info,
            5 => Severity::Debug,
            _ => Severity::Standard,
        }
    }

    /// The integer value of this severity.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Return the display label of the `Severity`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Standard => "OUT",
            Severity::Critical => "CRIT",
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// The stream lines of this severity go to, whether or not they pass the threshold.
    ///
    /// The baseline and the less urgent half of the scale (info and debug) go to the output
    /// stream. Everything else goes to the error stream.
    pub fn stream(self) -> Stream {
        if self == Severity::Standard || self >= Severity::Info {
            Stream::Out
        } else {
            Stream::Err
        }
    }
}

impl From<i32> for Severity {
    fn from(raw: i32) -> Self {
        Severity::from_raw(raw)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let severity = match s.to_ascii_lowercase().as_str() {
            "out" | "std" | "standard" => Severity::Standard,
            "crit" | "critical" => Severity::Critical,
            "error" => Severity::Error,
            "warn" | "warning" => Severity::Warning,
            "info" => Severity::Info,
            "debug" => Severity::Debug,
            _ => match s.parse::<i32>() {
                Ok(raw) if (0..=5).contains(&raw) => Severity::from_raw(raw),
                _ => {
                    return Err(Error::new(ErrorKind::Config, "unknown severity")
                        .with_context("input", s));
                }
            },
        };
        Ok(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_total() {
        let labels = Severity::ALL.map(|s| s.as_str());
        assert_eq!(labels, ["OUT", "CRIT", "ERROR", "WARN", "INFO", "DEBUG"]);
    }

    #[test]
    fn test_out_of_range_normalizes_to_standard() {
        assert_eq!(Severity::from_raw(-3), Severity::Standard);
        assert_eq!(Severity::from_raw(6), Severity::Standard);
        assert_eq!(Severity::from(i32::MAX).as_str(), "OUT");
        for severity in Severity::ALL {
            assert_eq!(Severity::from_raw(severity.as_raw()), severity);
        }
    }

    #[test]
    fn test_stream_routing() {
        assert_eq!(Severity::Standard.stream(), Stream::Out);
        assert_eq!(Severity::Critical.stream(), Stream::Err);
        assert_eq!(Severity::Error.stream(), Stream::Err);
        assert_eq!(Severity::Warning.stream(), Stream::Err);
        assert_eq!(Severity::Info.stream(), Stream::Out);
        assert_eq!(Severity::Debug.stream(), Stream::Out);
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" 5 ".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("std".parse::<Severity>().unwrap(), Severity::Standard);

        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!("9".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(format!("{:>5}", Severity::Info), " INFO");
    }
}
