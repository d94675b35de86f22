use proptest::prelude::*;
use scorematch_core::{Role, TextNormalizer};
use scorematch_extract::{ElementCombinationResolver, RegistryNormalizer, ScoreExtractor};
use std::collections::{HashMap, HashSet};
use once_cell::sync::Lazy;

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
static EXTRACTOR: Lazy<ScoreExtractor> =
    Lazy::new(|| ScoreExtractor::with_defaults().expect("default extractor should build"));

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
static NORMALIZER: Lazy<RegistryNormalizer> =
    Lazy::new(|| RegistryNormalizer::with_defaults().expect("normalizer should build"));

/// Report-like text assembled from score vocabulary.
fn report_text() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        Just("gleason".to_string()),
        Just("primary".to_string()),
        Just("secondary".to_string()),
        Just("tertiary".to_string()),
        Just("score".to_string()),
        Just("pelkkää".to_string()),
        Just("+".to_string()),
        Just("=".to_string()),
        Just("/".to_string()),
        Just(",".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("ja".to_string()),
        (1_u8..=12).prop_map(|n| n.to_string()),
        "[a-zäö]{1,8}",
    ];
    prop::collection::vec(word, 0..24).prop_map(|words| words.join(" "))
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Primary),
        Just(Role::Secondary),
        Just(Role::Tertiary),
        Just(Role::Aggregate),
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(text in "[a-zA-ZäöÄÖ0-9 ():+=/.,_-]{0,80}") {
        let once = NORMALIZER.normalize(&text);
        prop_assert_eq!(NORMALIZER.normalize(&once), once);
    }

    #[test]
    fn normalization_adds_no_digits(text in "[a-zA-Z0-9 ()IVX:+.,-]{0,80}") {
        let digits = |s: &str| s.chars().filter(char::is_ascii_digit).count();
        let normalized = NORMALIZER.normalize(&text);
        prop_assert!(digits(&normalized) <= digits(&text));
    }

    #[test]
    fn matches_are_ordered_and_disjoint(text in report_text()) {
        let matches = EXTRACTOR.extractor().extract(&text, 0);
        for m in &matches {
            prop_assert!(m.start < m.end && m.end <= text.len());
        }
        for pair in matches.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn resolver_groups_are_contiguous_and_role_unique(
        roles in prop::collection::vec(role(), 0..30),
        max_repeat in 1_usize..=6,
    ) {
        let Ok(resolver) = ElementCombinationResolver::new(max_repeat) else {
            panic!("positive max_repeat is valid");
        };
        let groups = resolver.resolve(&roles);
        prop_assert_eq!(groups.len(), roles.len());

        let mut next = 0;
        let mut members: HashMap<usize, HashSet<Role>> = HashMap::new();
        for (group, role) in groups.iter().zip(&roles) {
            prop_assert!(*group <= next);
            if *group == next {
                next += 1;
            }
            prop_assert!(members.entry(*group).or_default().insert(*role));
        }
    }

    #[test]
    fn rows_are_in_domain_and_consistent(text in report_text()) {
        let Ok(rows) = EXTRACTOR.extract_text(&text) else {
            panic!("extraction should not fail");
        };
        for (expected_id, row) in (1_u32..).zip(&rows) {
            prop_assert_eq!(row.observation_id, expected_id);
            prop_assert!(!row.values().is_empty());
            for grade in [row.primary, row.secondary, row.tertiary].into_iter().flatten() {
                prop_assert!((3..=5).contains(&grade));
            }
            if let Some(aggregate) = row.aggregate {
                prop_assert!((6..=10).contains(&aggregate));
            }
            if let (None, Some(a), Some(b), Some(c)) =
                (&row.warning, row.primary, row.secondary, row.aggregate)
            {
                prop_assert_eq!(a + b, c);
            }
        }
    }
}
