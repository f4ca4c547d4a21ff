//! Options assembly and the predefined-layout registry

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::builder::Builder;
use crate::error::OptionsError;
use crate::segment::{DateTimeKind, Segment};

/// Maximum number of segments in one layout
pub const SEGMENTS_LIMIT: usize = 63;
/// Minimum days the epoch must precede "now"
pub const EPOCH_RESERVED_DAYS: i64 = 7;
/// Default epoch: 2022-12-12T00:00:00Z, in milliseconds
pub const EPOCH_MS: i64 = 1_670_774_400_000;

/// Default widths of the classic layout
pub const HOST_WIDTH: u8 = 6;
pub const NODE_WIDTH: u8 = 4;
pub const TIMESTAMP_WIDTH: u8 = 41;
pub const SEQUENCE_WIDTH: u8 = 12;

pub(crate) const BITS_MAX_WIDTH: u8 = 63;
pub(crate) const MS_PER_DAY: i64 = 86_400_000;

/// Data center id, value range [0, 63]
pub const ENV_SERVER_HOST: &str = "SERVER_HOST_ID";
/// Server node id, value range [0, 15]
pub const ENV_SERVER_NODE: &str = "SERVER_NODE_ID";
/// Geo region id, value range [0, 65535]
pub const ENV_DOMAIN_ID: &str = "SERVER_DOMAIN_ID";
/// Epoch override for all predefined layouts, in milliseconds
pub const ENV_TIME_EPOCH: &str = "SERVER_EPOCH_TIMESTAMP";

/// User-assembled recipe consumed once at builder construction.
///
/// Segments are ordered from least-significant to most-significant: the
/// segment at offset 0 occupies the low bits of `main`.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Minimum days the epoch must precede "now"; 0 means the default of
    /// [`EPOCH_RESERVED_DAYS`]
    pub reserved_days: i64,
    /// Start timestamp in milliseconds; 0 or negative selects the default
    /// epoch at build time
    pub epoch_ms: i64,
    /// Carry a sign marker through textual formatting
    pub signed: bool,

    pub(crate) segments: Vec<Segment>,
    pub(crate) settings: HashMap<String, i64>,
}

impl Options {
    /// Empty options; segments are appended with [`Options::add`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Options over a ready-made segment list.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        let mut o = Self::default();
        for segment in segments {
            o = o.add(segment);
        }
        o
    }

    /// Classic host/node recipe: seeds the settings map consumed by
    /// [`Segment::host`] and [`Segment::node`] segments.
    pub fn config(host: i64, node: i64, segments: Vec<Segment>) -> Self {
        Self::with_segments(segments)
            .set("Host", host)
            .set("Node", node)
    }

    /// Append a bit-segment declaration.
    pub fn add(mut self, mut segment: Segment) -> Self {
        if (1..=BITS_MAX_WIDTH).contains(&segment.width) {
            segment.mask = Segment::calculate_mask(segment.width);
        }
        self.segments.push(segment);
        self
    }

    /// Set a settings key consumed by `Settings` segments.
    pub fn set(mut self, key: impl Into<String>, value: i64) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Override the start timestamp.
    pub fn new_epoch(mut self, epoch_ms: i64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    /// Modify the key, index and fallback of the segment at `offset`.
    /// Out-of-range offsets are ignored.
    pub fn patch(mut self, offset: usize, key: impl Into<String>, index: i32, fallback: i64) -> Self {
        if let Some(segment) = self.segments.get_mut(offset) {
            segment.key = key.into();
            segment.index = index;
            segment.value = fallback;
        }
        self
    }

    /// Number of declared segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Declared segments, in packing order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Value of a settings key, if set.
    pub fn setting(&self, key: &str) -> Option<i64> {
        self.settings.get(key).copied()
    }

    /// Validate the recipe and construct a [`Builder`].
    pub fn build(self) -> Result<Builder, OptionsError> {
        Builder::new(self)
    }

    /// The classic snowflake layout (preset `"default"`).
    pub fn classic() -> Self {
        preset("default")
    }

    /// The 126-bit random-heavy layout (preset `"random"`).
    pub fn shuffle() -> Self {
        preset("random")
    }

    /// The 126-bit open-identifier layout (preset `"openid"`).
    pub fn open_id() -> Self {
        preset("openid")
    }

    /// The sequence-first layout (preset `"sequence"`).
    pub fn seq_id() -> Self {
        preset("sequence")
    }
}

type PresetMap = RwLock<HashMap<String, Options>>;

static PRESETS: OnceLock<PresetMap> = OnceLock::new();

static ALIASES: &[(&str, &str)] = &[
    ("seqid", "sequence"),
    ("sequenceid", "sequence"),
    ("classic", "default"),
    ("snowflake", "default"),
    ("shuffle", "random"),
    ("testing", "test"),
];

fn presets() -> &'static PresetMap {
    PRESETS.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert(
            "default".to_string(),
            Options::with_segments(vec![
                Segment::sequence(SEQUENCE_WIDTH),
                Segment::env(NODE_WIDTH, ENV_SERVER_NODE, 0),
                Segment::env(HOST_WIDTH, ENV_SERVER_HOST, 0),
                Segment::timestamp(TIMESTAMP_WIDTH, DateTimeKind::TimestampMilliseconds),
            ])
            .new_epoch(EPOCH_MS),
        );
        // 126 bits
        map.insert(
            "random".to_string(),
            Options::with_segments(vec![
                Segment::random(63),
                Segment::timestamp(31, DateTimeKind::TimestampSeconds),
                Segment::env(NODE_WIDTH, ENV_SERVER_NODE, 0),
                Segment::sequence(SEQUENCE_WIDTH),
                Segment::env(HOST_WIDTH, ENV_SERVER_HOST, 0),
                Segment::timestamp(10, DateTimeKind::TimeMillisecond),
            ])
            .new_epoch(EPOCH_MS),
        );
        map.insert(
            "sequence".to_string(),
            Options::with_segments(vec![
                Segment::sequence(12),
                Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
                Segment::env(NODE_WIDTH, ENV_SERVER_NODE, 0),
                Segment::env(HOST_WIDTH, ENV_SERVER_HOST, 0),
            ]),
        );
        // 126 bits
        map.insert(
            "openid".to_string(),
            Options::with_segments(vec![
                Segment::timestamp(31, DateTimeKind::TimestampSeconds),
                Segment::env(4, ENV_SERVER_NODE, 0),
                Segment::sequence(14),
                Segment::env(6, ENV_SERVER_HOST, 0),
                Segment::timestamp(10, DateTimeKind::TimeMillisecond),
                Segment::env(16, ENV_DOMAIN_ID, 0),
                Segment::random(45),
            ]),
        );
        // 126 bits, exercises every source kind
        map.insert(
            "test".to_string(),
            Options::with_segments(vec![
                Segment::timestamp(31, DateTimeKind::TimestampSeconds),
                Segment::fixed(4, 9),
                Segment::env(10, ENV_SERVER_NODE, 0),
                Segment::sequence(12),
                Segment::data(5, "default", 3, vec!["hit".into()]),
                Segment::env(10, ENV_SERVER_HOST, 0),
                Segment::data(5, "default", 9, vec!["not_found".into()]),
                Segment::arg(8, 0, 0),
                Segment::random(21),
                Segment::option(10, "test", 0),
                Segment::timestamp(10, DateTimeKind::TimeMillisecond),
            ]),
        );
        // Environment override applies to every predefined layout
        if let Some(epoch) = std::env::var(ENV_TIME_EPOCH)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        {
            for options in map.values_mut() {
                options.epoch_ms = epoch;
            }
        }
        RwLock::new(map)
    })
}

/// Look up a predefined layout by scene name or alias, case-insensitively.
pub fn predefined(scene: &str) -> Option<Options> {
    let scene = scene.to_lowercase();
    let scene = match ALIASES.iter().find(|(alias, _)| *alias == scene) {
        Some((_, target)) => *target,
        None => scene.as_str(),
    };
    presets().read().get(scene).cloned()
}

/// Register a layout under a new scene name.
///
/// Returns false without registering when the name collides with an alias
/// or an existing scene.
pub fn define(scene: &str, options: Options) -> bool {
    let scene = scene.to_lowercase();
    if ALIASES.iter().any(|(alias, _)| *alias == scene) {
        return false;
    }
    let mut map = presets().write();
    if map.contains_key(&scene) {
        return false;
    }
    map.insert(scene, options);
    true
}

fn preset(scene: &str) -> Options {
    // The built-in scenes are always present
    predefined(scene).unwrap_or_default()
}
