//! The composition engine
//!
//! A [`Builder`] owns a validated copy of its [`Options`] and the mutex
//! over the clock-sequence state. Every `next` call derives a fresh
//! identifier: tick the clock, resolve each segment, fold the values into
//! the `(main, ext)` pair.

mod clock;
mod pack;
mod resolve;
mod validate;

pub use resolve::random_bits;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::base64::Encoder;
use crate::error::{OptionsError, Reason};
use crate::id::Id;
use crate::options::{Options, EPOCH_MS, EPOCH_RESERVED_DAYS, MS_PER_DAY};
use crate::segment::Source;
use clock::Clock;
use pack::Packer;

/// Snapshot of the latest generation, captured while [`Builder::debug`]
/// is set: the sequence value, the resolved (clamped and masked) value of
/// every segment in declaration order, and the shared "now".
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub sequence: i64,
    pub raw: Vec<i64>,
    pub now: DateTime<Local>,
}

/// Thread-safe identifier generator over a validated segment layout.
pub struct Builder {
    /// Encoder used by the string forms; the default base-36 `Display`
    /// format when unset
    pub encoder: Option<Box<dyn Encoder + Send + Sync>>,
    /// Capture [`DebugInfo`] on every generation
    pub debug: bool,

    options: Options,
    sequence_mask: i64,
    clock: Mutex<Clock>,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("encoder_set", &self.encoder.is_some())
            .field("debug", &self.debug)
            .field("options", &self.options)
            .field("sequence_mask", &self.sequence_mask)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Builder {
    /// Validate `options` and construct a builder.
    ///
    /// The recipe is copied in; later mutation of the caller's value does
    /// not affect this builder.
    pub fn new(mut options: Options) -> Result<Self, OptionsError> {
        let sequence_mask = validate::validate(&mut options)?;
        Ok(Self {
            encoder: None,
            debug: false,
            options,
            sequence_mask,
            clock: Mutex::new(Clock::new()),
        })
    }

    /// The validated options this builder generates from.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Generate the next identifier.
    ///
    /// Never fails: runtime source errors degrade to fallback values. The
    /// `(timestamp, sequence)` pair increases strictly across calls on one
    /// builder; a wall clock jumping backward past the last captured
    /// millisecond is not detected and can break that ordering.
    #[inline]
    pub fn next(&self) -> Id {
        self.next_with(&[])
    }

    /// Generate the next identifier, feeding `argv` to `Args` segments in
    /// declaration order.
    pub fn next_with(&self, argv: &[i64]) -> Id {
        let mut clock = self.clock.lock();
        let (now, sequence) = clock.tick(self.sequence_mask);
        let mut packer = Packer::new();
        let mut raw = self
            .debug
            .then(|| Vec::with_capacity(self.options.segments.len()));
        let mut args_seen = 0usize;
        for segment in &self.options.segments {
            let mut f = resolve::resolve(segment, &self.options, &now, sequence, argv, args_seen);
            if segment.source == Source::Args {
                args_seen += 1;
            }
            if f < 0 {
                f = 0;
            }
            f &= segment.mask;
            if let Some(values) = raw.as_mut() {
                values.push(f);
            }
            packer.push(f, segment.width);
        }
        if let Some(values) = raw {
            clock.info = Some(DebugInfo {
                sequence,
                raw: values,
                now,
            });
        }
        packer.finish(self.options.signed)
    }

    /// Next identifier as a bare `i64` (the `main` half).
    #[inline]
    pub fn next_i64(&self) -> i64 {
        self.next().main
    }

    /// Like [`Builder::next_i64`], with caller arguments.
    pub fn next_i64_with(&self, argv: &[i64]) -> i64 {
        self.next_with(argv).main
    }

    /// Next identifier in textual form, through the configured encoder.
    pub fn next_string(&self) -> String {
        self.format(&self.next())
    }

    /// Like [`Builder::next_string`], with caller arguments.
    pub fn next_string_with(&self, argv: &[i64]) -> String {
        self.format(&self.next_with(argv))
    }

    fn format(&self, id: &Id) -> String {
        match &self.encoder {
            Some(encoder) => encoder.encode(id),
            None => id.to_string(),
        }
    }

    /// Debug snapshot of the latest generation, if [`Builder::debug`] was
    /// set when it ran.
    pub fn debug_info(&self) -> Option<DebugInfo> {
        self.clock.lock().info.clone()
    }

    /// Re-validate and install a new epoch. Zero restores the default
    /// epoch, negative values are rejected.
    pub fn reset_epoch(&mut self, epoch_ms: i64) -> Result<(), OptionsError> {
        if epoch_ms < 0 {
            return Err(OptionsError::new("EpochMS", Reason::EpochTooSmall));
        }
        let now_ms = Local::now().timestamp_millis();
        if epoch_ms > now_ms {
            return Err(OptionsError::new("EpochMS", Reason::EpochTooLarge));
        }
        let window = self.options.reserved_days.max(EPOCH_RESERVED_DAYS) * MS_PER_DAY;
        if now_ms - epoch_ms < window {
            return Err(OptionsError::new("EpochMS", Reason::TooPoor));
        }
        self.options.epoch_ms = if epoch_ms == 0 { EPOCH_MS } else { epoch_ms };
        Ok(())
    }
}
