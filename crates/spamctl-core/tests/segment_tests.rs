//! Property tests for expression segmentation

use proptest::prelude::*;
use spamctl_core::segment::{generate, generate_sharded};
use spamctl_core::Error;
use std::collections::BTreeSet;

fn domain() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9.-]{0,24}"
}

fn unescape(segment: &str) -> Vec<String> {
    segment.split('|').map(|part| part.replace('\\', "")).collect()
}

proptest! {
    #[test]
    fn segments_stay_below_limit(
        names in prop::collection::vec(domain(), 0..60),
        max in 60usize..300,
    ) {
        for segment in generate(&names, max).unwrap() {
            prop_assert!(segment.len() < max, "{} >= {}", segment.len(), max);
        }
    }

    #[test]
    fn segments_reconstruct_sorted_input(
        names in prop::collection::vec(domain(), 0..60),
        max in 60usize..300,
    ) {
        let segments = generate(&names, max).unwrap();
        let rebuilt: Vec<String> = segments.iter().flat_map(|s| unescape(s)).collect();

        let expected: Vec<String> = names.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(rebuilt, expected);
    }

    #[test]
    fn generation_is_order_independent(
        names in prop::collection::vec(domain(), 0..40),
    ) {
        let mut reversed = names.clone();
        reversed.reverse();
        prop_assert_eq!(generate(&names, 120).unwrap(), generate(&reversed, 120).unwrap());
    }

    #[test]
    fn sharded_segments_share_leading_character(
        names in prop::collection::vec(domain(), 1..60),
    ) {
        for (shard, segments) in generate_sharded(&names, 100).unwrap() {
            for name in segments.iter().flat_map(|s| unescape(s)) {
                prop_assert!(name.to_ascii_uppercase().starts_with(&shard));
            }
        }
    }
}

#[test]
fn test_greedy_packing() {
    // "a\.com" is 6 characters; two of them plus the separator are 13
    let segments = generate(&["c.com", "a.com", "b.com"], 14).unwrap();
    assert_eq!(segments, vec![r"a\.com|b\.com", r"c\.com"]);

    // 13 is not below 13
    let segments = generate(&["a.com", "b.com"], 13).unwrap();
    assert_eq!(segments, vec![r"a\.com", r"b\.com"]);
}

#[test]
fn test_overflow_names_domain_and_limit() {
    match generate(&["ok.com", "much-too-long-domain.com"], 20) {
        Err(Error::SegmentOverflow { domain, max_length }) => {
            assert_eq!(domain, "much-too-long-domain.com");
            assert_eq!(max_length, 20);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_blank_name_rejected() {
    assert!(matches!(
        generate(&["a.com", "  "], 255),
        Err(Error::InvalidDomainName { .. })
    ));
    assert!(matches!(
        generate_sharded(&["", "a.com"], 255),
        Err(Error::InvalidDomainName { .. })
    ));
}
