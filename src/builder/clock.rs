//! Per-builder millisecond clock with intra-millisecond sequence counter

use chrono::{DateTime, Local};

use super::DebugInfo;

/// Mutable clock-sequence state, guarded by the builder's mutex.
#[derive(Debug)]
pub(super) struct Clock {
    now: Option<DateTime<Local>>,
    sequence: i64,
    pub(super) info: Option<DebugInfo>,
}

impl Clock {
    pub(super) fn new() -> Self {
        Self {
            now: None,
            sequence: 0,
            info: None,
        }
    }

    /// Advance the clock-sequence pair for one generation.
    ///
    /// Within one millisecond the sequence increments through
    /// `sequence_mask`; when it wraps, the call busy-waits for the next
    /// millisecond (bounded by one millisecond on a healthy clock) and
    /// restarts the sequence at zero. The captured instant is also the
    /// "now" every calendar-field segment of this call observes.
    pub(super) fn tick(&mut self, sequence_mask: i64) -> (DateTime<Local>, i64) {
        let mut now = Local::now();
        let mut ms = now.timestamp_millis();
        let last = self.now.map_or(0, |t| t.timestamp_millis());
        let mut sequence = 0i64;
        if ms == last {
            sequence = (self.sequence + 1) & sequence_mask;
            if sequence == 0 {
                #[cfg(feature = "tracing")]
                tracing::trace!(last_ms = last, "sequence exhausted, waiting for next millisecond");
                while ms <= last {
                    now = Local::now();
                    ms = now.timestamp_millis();
                }
            }
        }
        self.now = Some(now);
        self.sequence = sequence;
        (now, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_increments_within_millisecond() {
        let mut clock = Clock::new();
        let mask = (1i64 << 12) - 1;

        let (first, seq) = clock.tick(mask);
        assert_eq!(seq, 0, "fresh clock starts at sequence 0");

        // ticks landing in the same millisecond must increment, ticks in a
        // later millisecond must restart
        let (second, seq) = clock.tick(mask);
        if second.timestamp_millis() == first.timestamp_millis() {
            assert_eq!(seq, 1);
        } else {
            assert_eq!(seq, 0);
        }
    }

    #[test]
    fn test_wrap_waits_for_next_millisecond() {
        let mut clock = Clock::new();
        // a 1-bit mask wraps after two IDs per millisecond
        let mask = 1i64;
        let mut last = clock.tick(mask);
        for _ in 0..64 {
            let next = clock.tick(mask);
            assert!(
                (next.0.timestamp_millis(), next.1) > (last.0.timestamp_millis(), last.1),
                "clock-sequence pairs must be strictly increasing"
            );
            last = next;
        }
    }
}
