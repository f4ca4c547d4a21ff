//! Bit-segment declarations: value sources, widths and constructors

use std::fmt;

use crate::provider::Value;

/// Data source a bit-segment draws its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Fixed value declared with the segment
    #[default]
    Static,
    /// Positional argument of the caller
    Args,
    /// OS environment variable
    Os,
    /// Settings map carried by the options
    Settings,
    /// Per-millisecond sequence counter
    SequenceId,
    /// Clock-derived field
    DateTime,
    /// Cryptographically secure random number
    RandomId,
    /// Registered data provider
    Provider,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Static => "Static",
            Source::Args => "Args",
            Source::Os => "OS",
            Source::Settings => "Settings",
            Source::SequenceId => "SequenceID",
            Source::DateTime => "DateTime",
            Source::RandomId => "RandomID",
            Source::Provider => "Provider",
        })
    }
}

/// Sub-kind of a DateTime segment, carried in its `index` field.
///
/// Timestamp kinds measure elapsed time since the configured epoch; Time
/// kinds extract a calendar field of "now" in local time. Discriminants 4
/// and 5 are reserved (sub-millisecond calendar fields were never defined).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum DateTimeKind {
    #[default]
    TimestampMilliseconds = 0,
    TimestampNanoseconds = 1,
    TimestampMicroseconds = 2,
    TimestampSeconds = 3,
    TimeMillisecond = 6,
    TimeSecond = 7,
    TimeMinute = 8,
    TimeHour = 9,
    TimeDay = 10,
    TimeMonth = 11,
    TimeYear = 12,
    TimeYearDay = 13,
    TimeWeekday = 14,
    TimeWeekNumber = 15,
}

impl DateTimeKind {
    /// Map a raw segment index back to a kind.
    ///
    /// Unknown indexes resolve as `TimestampMilliseconds`.
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => DateTimeKind::TimestampNanoseconds,
            2 => DateTimeKind::TimestampMicroseconds,
            3 => DateTimeKind::TimestampSeconds,
            6 => DateTimeKind::TimeMillisecond,
            7 => DateTimeKind::TimeSecond,
            8 => DateTimeKind::TimeMinute,
            9 => DateTimeKind::TimeHour,
            10 => DateTimeKind::TimeDay,
            11 => DateTimeKind::TimeMonth,
            12 => DateTimeKind::TimeYear,
            13 => DateTimeKind::TimeYearDay,
            14 => DateTimeKind::TimeWeekday,
            15 => DateTimeKind::TimeWeekNumber,
            _ => DateTimeKind::TimestampMilliseconds,
        }
    }

    /// True for the epoch-offset kinds that satisfy the required-timestamp
    /// validation rule; calendar fields do not.
    pub fn is_timestamp(self) -> bool {
        matches!(
            self,
            DateTimeKind::TimestampMilliseconds
                | DateTimeKind::TimestampNanoseconds
                | DateTimeKind::TimestampMicroseconds
                | DateTimeKind::TimestampSeconds
        )
    }
}

impl fmt::Display for DateTimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateTimeKind::TimestampMilliseconds => "Timestamp.Milliseconds",
            DateTimeKind::TimestampNanoseconds => "Timestamp.Nanoseconds",
            DateTimeKind::TimestampMicroseconds => "Timestamp.Microseconds",
            DateTimeKind::TimestampSeconds => "Timestamp.Seconds",
            DateTimeKind::TimeMillisecond => "Time.Millisecond",
            DateTimeKind::TimeSecond => "Time.Second",
            DateTimeKind::TimeMinute => "Time.Minute",
            DateTimeKind::TimeHour => "Time.Hour",
            DateTimeKind::TimeDay => "Time.Day",
            DateTimeKind::TimeMonth => "Time.Month",
            DateTimeKind::TimeYear => "Time.Year",
            DateTimeKind::TimeYearDay => "Time.YearDay",
            DateTimeKind::TimeWeekday => "Time.Weekday",
            DateTimeKind::TimeWeekNumber => "Time.WeekNumber",
        })
    }
}

/// One bit-segment of the packed identifier.
///
/// Immutable once registered on an [`Options`](crate::Options); the mask is
/// derived from the width during options finalization.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    /// Where the value comes from
    pub source: Source,
    /// Bit width, 1..=63
    pub width: u8,
    /// Fallback value; for `Static` this is the value itself
    pub value: i64,
    /// Lookup key for OS, Settings and Provider sources
    pub key: String,
    /// Source-specific index; selects the sub-kind for DateTime
    pub index: i32,

    pub(crate) query: Vec<Value>,
    pub(crate) mask: i64,
}

impl Segment {
    /// Segment with a fixed value.
    pub fn fixed(width: u8, value: i64) -> Self {
        Self {
            source: Source::Static,
            width,
            value,
            ..Self::default()
        }
    }

    /// Segment filled from the caller's positional arguments.
    pub fn arg(width: u8, index: i32, fallback: i64) -> Self {
        Self {
            source: Source::Args,
            width,
            index,
            value: fallback,
            ..Self::default()
        }
    }

    /// Segment filled from an OS environment variable.
    pub fn env(width: u8, name: impl Into<String>, fallback: i64) -> Self {
        Self {
            source: Source::Os,
            width,
            key: name.into(),
            value: fallback,
            ..Self::default()
        }
    }

    /// Segment filled from the options settings map.
    pub fn option(width: u8, key: impl Into<String>, fallback: i64) -> Self {
        Self {
            source: Source::Settings,
            width,
            key: key.into(),
            value: fallback,
            ..Self::default()
        }
    }

    /// Segment filled from the per-millisecond sequence counter.
    pub fn sequence(width: u8) -> Self {
        Self {
            source: Source::SequenceId,
            width,
            ..Self::default()
        }
    }

    /// Segment filled from the clock.
    pub fn timestamp(width: u8, kind: DateTimeKind) -> Self {
        Self {
            source: Source::DateTime,
            width,
            index: kind as i32,
            ..Self::default()
        }
    }

    /// Segment filled from a secure random number.
    pub fn random(width: u8) -> Self {
        Self {
            source: Source::RandomId,
            width,
            ..Self::default()
        }
    }

    /// Segment filled by the registered data provider `source`, called with
    /// `query`.
    pub fn data(
        width: u8,
        source: impl Into<String>,
        fallback: i64,
        query: Vec<Value>,
    ) -> Self {
        Self {
            source: Source::Provider,
            width,
            key: source.into(),
            value: fallback,
            query,
            ..Self::default()
        }
    }

    /// Data-center segment bound to the `"Host"` settings key.
    pub fn host(width: u8, fallback: i64) -> Self {
        Self::option(width, "Host", fallback)
    }

    /// Server-node segment bound to the `"Node"` settings key.
    pub fn node(width: u8, fallback: i64) -> Self {
        Self::option(width, "Node", fallback)
    }

    /// Derived mask, `(1 << width) - 1`. Zero until finalized.
    #[inline]
    pub fn mask(&self) -> i64 {
        self.mask
    }

    /// Calculate the mask for a width in [1, 63].
    #[inline]
    pub(crate) const fn calculate_mask(width: u8) -> i64 {
        ((1u64 << width) - 1) as i64
    }
}
