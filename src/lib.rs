//! Unique, roughly time-ordered identifiers composed from bit-segments.
//!
//! `snowbits` generalizes the classic Snowflake algorithm: instead of a
//! fixed `timestamp | worker | sequence` layout, an identifier is assembled
//! from an ordered list of bit-segments, each drawn from a declared value
//! source (static constant, caller argument, environment variable, settings
//! entry, sequence counter, clock field, secure random, or a registered
//! data provider). Layouts may span up to 126 bits, packed into a pair of
//! 63-bit halves so both stay representable as non-negative signed 64-bit
//! integers.
//!
//! ```
//! use snowbits::{DateTimeKind, Options, Segment};
//!
//! let builder = Options::new()
//!     .add(Segment::sequence(12))
//!     .add(Segment::fixed(10, 42))
//!     .add(Segment::timestamp(41, DateTimeKind::TimestampMilliseconds))
//!     .build()
//!     .expect("valid layout");
//!
//! let id = builder.next();
//! assert!(!id.is_zero());
//! assert_eq!((id.main >> 12) & 0x3FF, 42);
//! ```
//!
//! Every layout needs at least one epoch-offset timestamp segment and one
//! sequence segment of width 8 or more; validation happens once, at
//! construction. Generation itself never fails: runtime source errors
//! degrade to the segment's declared fallback.

mod base64;
mod builder;
mod error;
mod id;
mod options;
mod provider;
mod segment;
mod snowflake;

#[cfg(test)]
mod tests;

pub use base64::{Base64, DecodeError, DecodeReason, Encoder, ALIGN_WIDTH};
pub use builder::{random_bits, Builder, DebugInfo};
pub use error::{OptionsError, Reason};
pub use id::Id;
pub use options::{
    define, predefined, Options, ENV_DOMAIN_ID, ENV_SERVER_HOST, ENV_SERVER_NODE, ENV_TIME_EPOCH,
    EPOCH_MS, EPOCH_RESERVED_DAYS, HOST_WIDTH, NODE_WIDTH, SEGMENTS_LIMIT, SEQUENCE_WIDTH,
    TIMESTAMP_WIDTH,
};
pub use provider::{register, registered, DataProvider, ProviderError, Value};
pub use segment::{DateTimeKind, Segment, Source};
pub use snowflake::{seq_id, simple, snowflake, SnowflakeError};
