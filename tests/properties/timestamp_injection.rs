//! Property tests for provenance log normalization.

use std::path::Path;

use chrono::{Duration, SecondsFormat, TimeZone, Utc};
use proptest::prelude::*;

use aip_packager::domain::value_objects::EntityKind;
use aip_packager::parser::parse_log;

fn kind() -> impl Strategy<Value = EntityKind> {
    prop_oneof![
        Just(EntityKind::Agent),
        Just(EntityKind::Event),
        Just(EntityKind::Object),
    ]
}

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("n_[a-z0-9_]{0,10}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: one entry per line, and `timestamp` always equals the line key.
    #[test]
    fn property_timestamp_equals_key(
        lines in proptest::collection::vec((kind(), name(), proptest::option::of("[a-z]{1,6}")), 0..20),
    ) {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut content = String::new();
        let mut keys = Vec::new();
        for (i, (kind, name, stale)) in lines.iter().enumerate() {
            let offset = i64::try_from(i).unwrap();
            let key = (base + Duration::seconds(offset)).to_rfc3339_opts(SecondsFormat::Secs, true);
            let stale = stale
                .as_ref()
                .map(|s| format!(", timestamp: x{}", s))
                .unwrap_or_default();
            content.push_str(&format!("{}: {{name: {}, entity: {}{}}}\n", key, name, kind, stale));
            keys.push((key, *kind));
        }

        let log = parse_log(&content, Path::new("prop.log")).unwrap();

        prop_assert_eq!(log.len(), lines.len());
        for kind in EntityKind::ALL {
            let expected: Vec<&str> = keys
                .iter()
                .filter(|(_, k)| *k == kind)
                .map(|(key, _)| key.as_str())
                .collect();
            let actual: Vec<&str> = log.entries(kind).iter().map(|e| e.timestamp()).collect();
            prop_assert_eq!(&actual, &expected);
            for entry in log.entries(kind) {
                prop_assert_eq!(entry.attribute_str("timestamp"), Some(entry.timestamp()));
            }
        }
    }
}
