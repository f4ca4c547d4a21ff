//! Fixed-layout derivatives of the composition engine

use chrono::Local;

use crate::builder::Builder;
use crate::error::OptionsError;
use crate::options::{Options, EPOCH_MS};
use crate::segment::{DateTimeKind, Segment};

/// Errors from the hard-coded snowflake factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeError {
    #[error("server id is too small or too large")]
    InvalidServer,

    #[error("server time error")]
    InvalidTime,
}

/// Classic snowflake layout over the generic engine: sequence 12 | node 4 |
/// host 6 | timestamp 41, with host and node carried in the settings map.
pub fn snowflake(host: i64, node: i64) -> Result<Builder, OptionsError> {
    Options::config(
        host,
        node,
        vec![
            Segment::sequence(12),
            Segment::node(4, 0),
            Segment::host(6, 0),
            Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
        ],
    )
    .new_epoch(EPOCH_MS)
    .build()
}

/// Sequential-identifier shorthand: host in [0, 63], node in [0, 15],
/// timestamp in the middle so plain `i64` ordering follows generation
/// order only per (host, node) pair.
pub fn seq_id(host: i64, node: i64) -> Result<impl Fn(&[i64]) -> i64, OptionsError> {
    let builder = Options::with_segments(vec![
        Segment::sequence(12),
        Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
        Segment::fixed(4, node),
        Segment::fixed(6, host),
    ])
    .build()?;
    Ok(move |argv: &[i64]| builder.next_with(argv).main)
}

/// Classic single-word snowflake without the generic packer: a thunk
/// producing one `i64` per call from the fixed layout
/// sequence 12 | server 10 | timestamp 41.
///
/// `server` must be in [0, 1023]; construction fails when the default
/// epoch is in the future or the 41-bit timestamp field is exhausted.
pub fn simple(server: i64) -> Result<impl FnMut() -> i64, SnowflakeError> {
    const SEQUENCE_MASK: i64 = (1 << 12) - 1;
    const SERVER_MASK: i64 = (1 << 10) - 1;
    const SERVER_SHIFT: u32 = 12;
    const TIMESTAMP_MASK: i64 = (1 << 41) - 1;
    const TIMESTAMP_SHIFT: u32 = 22;

    if server < 0 || server > SERVER_MASK {
        return Err(SnowflakeError::InvalidServer);
    }
    let elapsed = Local::now().timestamp_millis() - EPOCH_MS;
    if !(0..=TIMESTAMP_MASK).contains(&elapsed) {
        return Err(SnowflakeError::InvalidTime);
    }

    let mut last = 0i64;
    let mut sequence = 0i64;
    Ok(move || {
        let mut now = Local::now().timestamp_millis();
        if now == last {
            sequence = (sequence + 1) & SEQUENCE_MASK;
            if sequence == 0 {
                while now <= last {
                    now = Local::now().timestamp_millis();
                }
            }
        } else {
            sequence = 0;
        }
        last = now;
        ((now - EPOCH_MS) << TIMESTAMP_SHIFT) | (server << SERVER_SHIFT) | sequence
    })
}
