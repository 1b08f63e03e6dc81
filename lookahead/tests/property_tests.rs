//! Property tests over generated patterns and subjects

use lookahead::{Matcher, match_string, scan};
use proptest::prelude::*;

fn atom() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("a"),
        Just("b"),
        Just("c"),
        Just("."),
        Just("a*"),
        Just("b+"),
        Just("(ab)"),
        Just("(?:c|a)"),
        Just("[bc]"),
        Just("$"),
    ]
}

fn fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(atom(), 0..5).prop_map(|atoms| atoms.concat())
}

fn subject() -> impl Strategy<Value = String> {
    "[abc]{0,8}"
}

proptest! {
    #[test]
    fn plain_patterns_agree_with_engine(pattern in fragment(), subject in subject()) {
        let expected = regex::Regex::new(&pattern).unwrap().is_match(&subject);
        prop_assert_eq!(match_string(&pattern, &subject).unwrap(), expected);
    }

    #[test]
    fn single_candidate_lookahead_is_anchored_continuation(
        interior in fragment(),
        rest in subject()
    ) {
        let subject = format!("x{rest}");
        let positive = match_string(&format!("^x(?={interior})"), &subject).unwrap();
        let negative = match_string(&format!("^x(?!{interior})"), &subject).unwrap();
        let expected = regex::Regex::new(&format!("^x(?:{interior})"))
            .unwrap()
            .is_match(&subject);
        prop_assert_eq!(positive, expected);
        prop_assert_eq!(negative, !expected);
    }

    #[test]
    fn repeated_calls_agree(interior in fragment(), subject in subject()) {
        let matcher = Matcher::new(&format!("a(?!{interior})")).unwrap();
        prop_assert_eq!(matcher.is_match(&subject).unwrap(), matcher.is_match(&subject).unwrap());
    }

    #[test]
    fn short_patterns_have_no_lookahead(pattern in "[(?=!a)]{0,3}") {
        match scan(&pattern) {
            Ok(spans) => prop_assert!(spans.is_empty(), "{:?} yielded {:?}", pattern, spans),
            Err(err) => prop_assert!(err.is_invalid_syntax(), "{:?} failed with {}", pattern, err),
        }
    }
}
