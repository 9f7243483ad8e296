//! Property tests for build-comment detection.

use proptest::prelude::*;

use aip_packager::template::preprocess;

fn body() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 .,]{0,30}").unwrap()
}

fn gap() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ \t]{1,3}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `#` flush against both delimiters removes the comment entirely.
    #[test]
    fn property_flush_comment_is_removed(text in body()) {
        let source = format!("<a><!--#{}#--></a>", text);
        let output = preprocess("prop", &source).unwrap();
        prop_assert_eq!(output, "<a></a>");
    }

    /// PROPERTY: whitespace between the delimiter and `#` keeps the comment verbatim.
    #[test]
    fn property_spaced_comment_survives(
        text in body(),
        open_gap in gap(),
        close_gap in gap(),
    ) {
        let comment = format!("<!--{}#{}#{}-->", open_gap, text, close_gap);
        let source = format!("<a>{}</a>", comment);
        let output = preprocess("prop", &source).unwrap();
        prop_assert_eq!(output, source);
    }
}
