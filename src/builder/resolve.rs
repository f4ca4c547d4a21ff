//! Per-segment value resolution
//!
//! Runtime failures never surface: a missing variable, an unregistered
//! argument, a provider error or a drained CSPRNG all degrade to the
//! segment's declared fallback (or zero for random segments).

use chrono::{DateTime, Datelike, Local, Timelike};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::options::Options;
use crate::provider;
use crate::segment::{DateTimeKind, Segment, Source};

const NS_PER_MS: i64 = 1_000_000;
const US_PER_MS: i64 = 1_000;
const MS_PER_SECOND: i64 = 1_000;

/// Resolve the raw value for one segment. `args_seen` counts the `Args`
/// segments already consumed, so argument values are positional in
/// declaration order.
pub(super) fn resolve(
    segment: &Segment,
    options: &Options,
    now: &DateTime<Local>,
    sequence: i64,
    argv: &[i64],
    args_seen: usize,
) -> i64 {
    let mut f = segment.value;
    match segment.source {
        Source::Static => {}
        Source::Args => {
            if let Some(v) = argv.get(args_seen) {
                f = *v;
            }
        }
        Source::Os => {
            if !segment.key.is_empty() {
                if let Some(v) = std::env::var(&segment.key)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                {
                    f = v;
                }
            }
        }
        Source::Settings => {
            if !segment.key.is_empty() {
                if let Some(v) = options.setting(&segment.key) {
                    f = v;
                }
            }
        }
        Source::SequenceId => f = sequence,
        Source::DateTime => {
            f = datetime(DateTimeKind::from_index(segment.index), now, options.epoch_ms)
        }
        Source::RandomId => f = random_bits(segment.width),
        Source::Provider => {
            if let Ok(v) = provider::read(&segment.key, &segment.query) {
                f = v;
            }
        }
    }
    f
}

/// Clock-derived field of the captured instant. Timestamp kinds measure
/// from the epoch; Time kinds are local calendar fields.
fn datetime(kind: DateTimeKind, now: &DateTime<Local>, epoch_ms: i64) -> i64 {
    let epoch = epoch_ms.max(0);
    match kind {
        DateTimeKind::TimestampNanoseconds => {
            // nanosecond timestamps overflow i64 in 2262; saturate rather
            // than fail, the packer masks to the segment width anyway
            now.timestamp_nanos_opt().unwrap_or(i64::MAX) - epoch * NS_PER_MS
        }
        DateTimeKind::TimestampMicroseconds => now.timestamp_micros() - epoch * US_PER_MS,
        DateTimeKind::TimestampSeconds => now.timestamp() - epoch / MS_PER_SECOND,
        DateTimeKind::TimeMillisecond => now.timestamp_millis() % MS_PER_SECOND,
        DateTimeKind::TimeSecond => i64::from(now.second()),
        DateTimeKind::TimeMinute => i64::from(now.minute()),
        DateTimeKind::TimeHour => i64::from(now.hour()),
        DateTimeKind::TimeDay => i64::from(now.day()),
        DateTimeKind::TimeMonth => i64::from(now.month()),
        DateTimeKind::TimeYear => i64::from(now.year()),
        DateTimeKind::TimeYearDay => i64::from(now.ordinal()),
        DateTimeKind::TimeWeekday => i64::from(now.weekday().num_days_from_sunday()),
        DateTimeKind::TimeWeekNumber => i64::from(now.ordinal() / 7 + 1),
        DateTimeKind::TimestampMilliseconds => now.timestamp_millis() - epoch,
    }
}

/// A cryptographically secure random number of the given bit width.
///
/// Draws `ceil(width / 8)` bytes from the OS CSPRNG, decodes them
/// little-endian and masks to `width` bits. Returns 0 for widths outside
/// [1, 63] and when the CSPRNG fails.
pub fn random_bits(width: u8) -> i64 {
    if !(1..=63).contains(&width) {
        return 0;
    }
    let count = (width as usize).div_ceil(8);
    let mut buf = [0u8; 8];
    if OsRng.try_fill_bytes(&mut buf[..count]).is_err() {
        return 0;
    }
    let v = u64::from_le_bytes(buf);
    (v & ((1u64 << width) - 1)) as i64
}
