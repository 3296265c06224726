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

//! Threshold filtering and stream routing.

pub use self::threshold::Threshold;
use crate::Severity;
use crate::Stream;

mod threshold;

/// Decide whether a line of the given severity is emitted under the given threshold.
///
/// A disabled threshold rejects everything. Otherwise [`Severity::Standard`] is always emitted,
/// and any other severity is emitted iff it is at most the threshold.
pub fn should_emit(severity: impl Into<Severity>, threshold: impl Into<Threshold>) -> bool {
    let threshold = threshold.into();
    if threshold.is_disabled() {
        return false;
    }

    let severity = severity.into();
    severity == Severity::Standard || severity.as_raw() <= threshold.as_raw()
}

/// The stream a line of the given severity is routed to. Independent of any threshold.
pub fn stream_for(severity: impl Into<Severity>) -> Stream {
    severity.into().stream()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_always_emitted() {
        for threshold in 0..=8 {
            assert!(should_emit(Severity::Standard, threshold));
        }
    }

    #[test]
    fn test_emit_iff_at_most_threshold() {
        for severity in Severity::ALL.into_iter().skip(1) {
            for threshold in 0..=8 {
                assert_eq!(
                    should_emit(severity, threshold),
                    severity.as_raw() <= threshold,
                    "severity={severity:?} threshold={threshold}"
                );
            }
        }
    }

    #[test]
    fn test_disabled_rejects_everything() {
        for severity in Severity::ALL {
            assert!(!should_emit(severity, -1));
            assert!(!should_emit(severity, Threshold::DISABLED));
            assert!(!should_emit(severity, i32::MIN));
        }
    }

    #[test]
    fn test_undeclared_severity_is_standard() {
        assert!(should_emit(42, Severity::Standard));
        assert!(should_emit(-7, 0));
        assert!(!should_emit(42, -1));
        assert_eq!(stream_for(42), Stream::Out);
    }

    #[test]
    fn test_routing_ignores_threshold() {
        // critical is suppressed by a standard threshold but still belongs on the error stream
        assert!(!should_emit(Severity::Critical, Severity::Standard));
        assert_eq!(stream_for(Severity::Critical), Stream::Err);
        assert_eq!(stream_for(Severity::Debug), Stream::Out);
    }
}
