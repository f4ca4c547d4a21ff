//! Validation errors produced at builder construction

use std::fmt;

/// Reason for rejecting an [`Options`](crate::Options) recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    /// Epoch earlier than the Unix epoch
    #[error("the EpochMS must be later than 1970-1-1T00:00:00")]
    EpochTooSmall,

    /// Epoch in the future
    #[error("the EpochMS must be earlier than now")]
    EpochTooLarge,

    /// Epoch too close to "now" given the reserve window
    #[error("the end date has been reached and there are not enough identifiers")]
    TooPoor,

    /// No segments declared
    #[error("bit-segments is empty")]
    SegmentsEmpty,

    /// More segments than the layout limit
    #[error("bit-segments too many")]
    SegmentsTooMany,

    /// Required Timestamp or Sequence segment missing
    #[error("required bit-segments(Timestamp and Sequence)is missing")]
    SegmentMiss,

    /// Segment width outside [1, 63]
    #[error("the width of bit-segment is incorrect")]
    WidthInvalid,

    /// Cumulative width exceeds the two 63-bit halves
    #[error("the width of bit-segment is too large")]
    WidthTooLarge,

    /// Fallback or static value does not fit the segment mask
    #[error("invalid value")]
    InvalidValue,

    /// Provider segment references an unregistered data provider
    #[error("data provider is not registered")]
    DataSource,

    /// Sequence width too small to sustain generation
    #[error("the sequence width is too small and the time to generate identifiers is too slow")]
    TooSlow,
}

/// Structured error describing the offending option.
///
/// `name` identifies the option ("EpochMS", "Segments", "Sequence.Width"),
/// `extra` carries optional context such as a provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsError {
    pub name: &'static str,
    pub extra: Vec<String>,
    pub reason: Reason,
}

impl OptionsError {
    pub(crate) fn new(name: &'static str, reason: Reason) -> Self {
        Self {
            name,
            extra: Vec::new(),
            reason,
        }
    }

    pub(crate) fn with_extra(name: &'static str, reason: Reason, extra: Vec<String>) -> Self {
        Self {
            name,
            extra,
            reason,
        }
    }

    /// Compare by option name and reason, ignoring `extra`.
    pub fn same_as(&self, other: &OptionsError) -> bool {
        self.name == other.name && self.reason == other.reason
    }
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid options {:?}", self.name)?;
        if !self.extra.is_empty() {
            write!(f, "[{}]", self.extra.join(","))?;
        }
        write!(f, ", reason: \"{}\"", self.reason)
    }
}

impl std::error::Error for OptionsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OptionsError::new("EpochMS", Reason::EpochTooLarge);
        assert_eq!(
            err.to_string(),
            "invalid options \"EpochMS\", reason: \"the EpochMS must be earlier than now\""
        );
    }

    #[test]
    fn test_error_display_with_extra() {
        let err = OptionsError::with_extra("Segments", Reason::DataSource, vec!["geo".to_string()]);
        assert_eq!(
            err.to_string(),
            "invalid options \"Segments\"[geo], reason: \"data provider is not registered\""
        );
    }

    #[test]
    fn test_same_as_ignores_extra() {
        let a = OptionsError::new("Segments", Reason::SegmentMiss);
        let b = OptionsError::with_extra("Segments", Reason::SegmentMiss, vec!["x".into()]);
        assert!(a.same_as(&b));
        let c = OptionsError::new("EpochMS", Reason::SegmentMiss);
        assert!(!a.same_as(&c));
    }
}
