//! Property tests for path pattern matching.

use heron_router::PathPattern;
use proptest::prelude::*;

fn literal() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,8}"
}

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.~-]{0,12}"
}

/// A template segment: literal, or `:name`.
fn template_segment() -> impl Strategy<Value = String> {
    prop_oneof![literal(), "[a-z]{1,6}".prop_map(|name| format!(":{name}"))]
}

proptest! {
    #[test]
    fn differing_segment_counts_never_match(
        template in prop::collection::vec(template_segment(), 1..6),
        path in prop::collection::vec(value(), 1..8),
    ) {
        prop_assume!(template.len() != path.len());
        let template_path = format!("/{}", template.join("/"));
        let request_path = format!("/{}", path.join("/"));

        let pattern = PathPattern::new(&template_path);
        prop_assert!(!pattern.matches(&request_path));
    }

    #[test]
    fn extract_recovers_substituted_value(
        literals in prop::collection::vec(literal(), 1..6),
        index in any::<prop::sample::Index>(),
        v in value(),
    ) {
        let i = index.index(literals.len());
        let mut template = literals.clone();
        template[i] = ":target".to_string();
        let mut path = literals;
        path[i] = v.clone();

        let pattern = PathPattern::new(&template.join("/"));
        let request_path = format!("/{}", path.join("/"));

        prop_assert!(pattern.matches(&request_path));
        let params = pattern.extract_params(&request_path);
        prop_assert_eq!(params.len(), 1);
        prop_assert_eq!(params.get("target"), Some(v.as_str()));
    }

    #[test]
    fn static_pattern_matches_only_itself(
        literals in prop::collection::vec(literal(), 1..6),
        other in prop::collection::vec(literal(), 1..6),
    ) {
        let own_path = format!("/{}", literals.join("/"));
        let other_path = format!("/{}", other.join("/"));

        let pattern = PathPattern::new(&literals.join("/"));
        prop_assert!(pattern.matches(&own_path));
        prop_assert_eq!(pattern.matches(&other_path), literals == other);
    }
}
