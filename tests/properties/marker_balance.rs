//! Property tests for `%%` marker rewriting.

use proptest::prelude::*;

use aip_packager::template::{preprocess, PreprocessError};

/// Text between markers: no `%`, braces or comment delimiters
fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z <>/=\"\n]{0,12}").unwrap()
}

fn join_with_markers(segments: &[String], markers: usize) -> String {
    let mut source = String::new();
    for (i, segment) in segments.iter().enumerate() {
        source.push_str(segment);
        if i < markers {
            source.push_str("%%");
        }
    }
    source
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: an even marker count always preprocesses, alternating open/close.
    #[test]
    fn property_even_markers_alternate(
        pairs in 0usize..6,
        segments in proptest::collection::vec(segment(), 13),
    ) {
        let markers = pairs * 2;
        let source = join_with_markers(&segments[..=markers], markers);

        let output = preprocess("prop", &source).unwrap();

        prop_assert_eq!(output.matches("{%").count(), pairs);
        prop_assert_eq!(output.matches("%}").count(), pairs);
        prop_assert!(!output.contains("%%"));
        let first_open = output.find("{%");
        let first_close = output.find("%}");
        if let (Some(open), Some(close)) = (first_open, first_close) {
            prop_assert!(open < close);
        }
    }

    /// PROPERTY: an odd marker count always fails.
    #[test]
    fn property_odd_markers_fail(
        pairs in 0usize..6,
        segments in proptest::collection::vec(segment(), 13),
    ) {
        let markers = pairs * 2 + 1;
        let source = join_with_markers(&segments[..=markers], markers);

        let result = preprocess("prop", &source);

        prop_assert!(
            matches!(result, Err(PreprocessError::UnbalancedMarker { .. })),
            "expected UnbalancedMarker for {:?}, got {:?}",
            source,
            result
        );
    }
}
