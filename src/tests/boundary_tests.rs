//! Layouts around and across the 63-bit boundary

use super::test_utils::assert_unique_ids;
use crate::*;

const ALIGNED: Base64 = Base64 { aligned: true };

#[test]
fn test_openid_layout_fills_both_halves() {
    let builder = Options::open_id().build().expect("valid preset");

    let ids: Vec<Id> = (0..200).map(|_| builder.next()).collect();
    assert_unique_ids(&ids);

    for id in &ids {
        // Random(45) occupies the top bits, so ext is populated
        assert!(id.ext > 0, "126-bit layout left ext empty");
        assert!(id.main >= 0 && id.ext >= 0, "sign bits must stay clear");

        let buf = id.bytes();
        assert_eq!(Id::from_bytes(&buf), *id);

        let encoded = ALIGNED.encode(id);
        assert_eq!(ALIGNED.decode(&encoded).expect("own encoding"), *id);
    }
}

#[test]
fn test_exact_boundary_carries_into_ext() {
    // the first four segments fill main exactly; the trailing random
    // segment must land at ext bit 0
    let mut builder = Options::with_segments(vec![
        Segment::sequence(12),
        Segment::fixed(4, 9),
        Segment::fixed(6, 33),
        Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
        Segment::random(63),
    ])
    .build()
    .expect("valid layout");
    builder.debug = true;

    for _ in 0..100 {
        let id = builder.next();
        let info = builder.debug_info().expect("debug capture enabled");
        assert_eq!(id.ext, info.raw[4], "ext must hold the trailing segment");
        assert_eq!((id.main >> 12) & 0xF, 9);
        assert_eq!((id.main >> 16) & 0x3F, 33);
    }
}

#[test]
fn test_straddling_segment_splits() {
    // timestamp starts at bit 46 and spills 24 of its 41 bits into ext
    let mut builder = Options::with_segments(vec![
        Segment::sequence(14),
        Segment::random(32),
        Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
        Segment::fixed(39, 0x55),
    ])
    .build()
    .expect("valid layout");
    builder.debug = true;

    for _ in 0..100 {
        let id = builder.next();
        let info = builder.debug_info().expect("debug capture enabled");
        let ts = info.raw[2];
        assert_eq!(id.main >> 46, ts & ((1 << 17) - 1), "low 17 timestamp bits");
        assert_eq!(id.ext & ((1 << 24) - 1), ts >> 17, "high 24 timestamp bits");
        assert_eq!(id.ext >> 24, 0x55, "fixed tail above the carried bits");
    }
}

#[test]
fn test_shuffle_layout_roundtrips() {
    let builder = Options::shuffle().build().expect("valid preset");
    for _ in 0..50 {
        let id = builder.next();
        // the seconds timestamp sits in ext, so it is always populated
        assert!(id.ext > 0);
        let encoded = ALIGNED.encode(&id);
        assert_eq!(ALIGNED.decode(&encoded).expect("own encoding"), id);
        assert_eq!(Id::from_bytes(&id.bytes()), id);
    }
}
