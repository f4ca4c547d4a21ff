//! Construction-time validation of an Options recipe
//!
//! All rules run before any builder state exists; a single failure is
//! reported and no partial builder escapes.

use chrono::Local;

use crate::error::{OptionsError, Reason};
use crate::options::{Options, BITS_MAX_WIDTH, EPOCH_MS, EPOCH_RESERVED_DAYS, MS_PER_DAY, SEGMENTS_LIMIT};
use crate::provider;
use crate::segment::{DateTimeKind, Segment, Source};

/// Validate `options` in place (deriving masks and substituting the default
/// epoch) and return the sequence mask for the builder's counter.
pub(super) fn validate(options: &mut Options) -> Result<i64, OptionsError> {
    let now_ms = Local::now().timestamp_millis();
    if options.epoch_ms > now_ms {
        return Err(OptionsError::new("EpochMS", Reason::EpochTooLarge));
    }
    if options.segments.is_empty() {
        return Err(OptionsError::new("Segments", Reason::SegmentsEmpty));
    }
    if options.segments.len() > SEGMENTS_LIMIT {
        return Err(OptionsError::new("Segments", Reason::SegmentsTooMany));
    }
    let window = options.reserved_days.max(EPOCH_RESERVED_DAYS) * MS_PER_DAY;
    if now_ms - options.epoch_ms < window {
        return Err(OptionsError::new("EpochMS", Reason::TooPoor));
    }
    if options.epoch_ms <= 0 {
        options.epoch_ms = EPOCH_MS;
    }

    let mut total: u32 = 0;
    let mut sequence_width: u8 = 0;
    let mut has_timestamp = false;
    for segment in options.segments.iter_mut() {
        let width = segment.width;
        if !(1..=BITS_MAX_WIDTH).contains(&width) {
            return Err(OptionsError::new("Segments", Reason::WidthInvalid));
        }
        total += u32::from(width);
        if total > 2 * u32::from(BITS_MAX_WIDTH) {
            return Err(OptionsError::new("Segments", Reason::WidthTooLarge));
        }
        segment.mask = Segment::calculate_mask(width);
        match segment.source {
            Source::SequenceId => {
                if width > sequence_width {
                    sequence_width = width;
                }
            }
            Source::DateTime => {
                // only exact epoch-offset kinds satisfy the requirement;
                // unknown indexes resolve as milliseconds but do not count
                let kind = DateTimeKind::from_index(segment.index);
                if kind.is_timestamp() && segment.index == kind as i32 {
                    has_timestamp = true;
                }
            }
            Source::RandomId => {}
            Source::Provider => {
                if !provider::registered(&segment.key) {
                    return Err(OptionsError::with_extra(
                        "Segments",
                        Reason::DataSource,
                        vec![segment.key.clone()],
                    ));
                }
                if segment.value > segment.mask {
                    return Err(OptionsError::new("Segments", Reason::InvalidValue));
                }
            }
            Source::Static | Source::Args | Source::Os | Source::Settings => {
                if segment.value > segment.mask {
                    return Err(OptionsError::new("Segments", Reason::InvalidValue));
                }
            }
        }
    }
    if !has_timestamp || sequence_width == 0 {
        return Err(OptionsError::new("Segments", Reason::SegmentMiss));
    }
    if sequence_width < 8 {
        return Err(OptionsError::new("Sequence.Width", Reason::TooSlow));
    }
    Ok(Segment::calculate_mask(sequence_width))
}
