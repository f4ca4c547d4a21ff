//! Predefined layout scenarios

use super::test_utils::register_map_provider;
use crate::*;

const SCENES: &[&str] = &["default", "random", "sequence", "openid", "test"];

#[test]
fn test_all_presets_generate() {
    // the "test" scene references a provider named "default"
    register_map_provider("default");

    for scene in SCENES {
        let options = predefined(scene).unwrap_or_else(|| panic!("missing preset {scene}"));
        let mut builder = options
            .build()
            .unwrap_or_else(|e| panic!("preset {scene} rejected: {e}"));
        builder.debug = true;

        for _ in 0..10 {
            let id = builder.next_with(&[1, 2, 3]);
            assert!(!id.is_zero(), "preset {scene} produced a zero id");
            assert_eq!(Id::from_bytes(&id.bytes()), id, "byte round-trip for {scene}");

            // reassemble the halves from the captured raw values
            let info = builder.debug_info().expect("debug capture enabled");
            let mut acc: u128 = 0;
            let mut offset = 0u32;
            for (segment, raw) in builder.options().segments().iter().zip(&info.raw) {
                acc |= (*raw as u128) << offset;
                offset += u32::from(segment.width);
            }
            assert_eq!((acc & ((1 << 63) - 1)) as i64, id.main, "main for {scene}");
            assert_eq!((acc >> 63) as i64, id.ext, "ext for {scene}");
        }
    }
}

#[test]
fn test_aliases_resolve() {
    for (alias, scene) in [
        ("snowflake", "default"),
        ("classic", "default"),
        ("shuffle", "random"),
        ("seqid", "sequence"),
        ("sequenceid", "sequence"),
        ("testing", "test"),
    ] {
        let a = predefined(alias).unwrap_or_else(|| panic!("missing alias {alias}"));
        let s = predefined(scene).unwrap_or_else(|| panic!("missing scene {scene}"));
        assert_eq!(a.len(), s.len(), "{alias} does not match {scene}");
    }
}

#[test]
fn test_defined_scene_builds() {
    assert!(define(
        "preset_tests_custom",
        Options::with_segments(vec![
            Segment::sequence(12),
            Segment::timestamp(41, DateTimeKind::TimestampMilliseconds),
            Segment::node(4, 4),
            Segment::host(6, 8),
        ]),
    ));

    let options = predefined("preset_tests_custom")
        .expect("defined scene must be retrievable")
        .new_epoch(EPOCH_MS)
        .set("test", 99)
        .patch(2, "Node", 0, 5);
    assert_eq!(options.epoch_ms, EPOCH_MS);
    assert_eq!(options.setting("test"), Some(99));
    assert_eq!(options.segments()[2].value, 5);

    let builder = options.build().expect("valid layout");
    let mut last = 0i64;
    for _ in 0..20_000 {
        let id = builder.next_i64();
        assert!(id > 0, "zero id generated");
        assert!(id > last, "ids are not incremental");
        last = id;
    }
}

#[test]
fn test_registry_copies_are_independent() {
    let patched = predefined("sequence").expect("preset").new_epoch(42);
    assert_eq!(patched.epoch_ms, 42);
    // the registry still hands out the pristine recipe
    let fresh = predefined("sequence").expect("preset");
    assert_ne!(fresh.epoch_ms, 42);
}
