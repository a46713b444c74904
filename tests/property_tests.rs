//! Property-based tests for case pairing and output comparison

use std::path::{Path, PathBuf};

use porunga::harness::compare::outputs_match;
use porunga::harness::expected_path_for;
use proptest::prelude::*;

// =============================================================================
// Suffix substitution
// =============================================================================

proptest! {
    /// Property: `.in` always maps to `.out` with the stem untouched
    #[test]
    fn lowercase_suffix_maps_to_out(stem in "[a-zA-Z0-9_-]{1,16}(\\.[a-z0-9]{1,4})?") {
        let input = PathBuf::from(format!("testdata/{}.in", stem));
        let expected = expected_path_for(&input).unwrap();
        prop_assert_eq!(expected, PathBuf::from(format!("testdata/{}.out", stem)));
    }

    /// Property: `.IN` always maps to `.OUT`
    #[test]
    fn uppercase_suffix_maps_to_upper_out(stem in "[a-zA-Z0-9_-]{1,16}") {
        let input = PathBuf::from(format!("{}.IN", stem));
        prop_assert_eq!(expected_path_for(&input), Some(PathBuf::from(format!("{}.OUT", stem))));
    }

    /// Property: derivation is deterministic
    #[test]
    fn derivation_is_pure(stem in "[a-z]{1,8}", ext in "(in|IN|out|txt|In)") {
        let input = PathBuf::from(format!("{}.{}", stem, ext));
        prop_assert_eq!(expected_path_for(&input), expected_path_for(&input));
    }

    /// Property: anything other than exactly `in` / `IN` is not an input
    #[test]
    fn other_suffixes_are_rejected(stem in "[a-z]{1,8}", ext in "[a-zA-Z]{1,4}") {
        prop_assume!(ext != "in" && ext != "IN");
        let input = format!("{}.{}", stem, ext);
        prop_assert_eq!(expected_path_for(Path::new(&input)), None);
    }
}

// =============================================================================
// Trimmed comparison
// =============================================================================

proptest! {
    /// Property: surrounding whitespace never affects the verdict
    #[test]
    fn surrounding_whitespace_is_ignored(
        body in "[a-z0-9]([a-z0-9 ]{0,20}[a-z0-9])?",
        lead in "[ \t\r\n]{0,4}",
        trail in "[ \t\r\n]{0,4}",
    ) {
        let padded = format!("{}{}{}", lead, body, trail);
        prop_assert!(outputs_match(padded.as_bytes(), body.as_bytes()));
        prop_assert!(outputs_match(body.as_bytes(), padded.as_bytes()));
    }

    /// Property: different trimmed content never matches
    #[test]
    fn different_content_does_not_match(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
        prop_assume!(a != b);
        prop_assert!(!outputs_match(a.as_bytes(), b.as_bytes()));
    }
}
