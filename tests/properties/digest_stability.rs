//! Property tests for file digests.

use proptest::prelude::*;
use tempfile::tempdir;

use aip_packager::domain::value_objects::ContentDigest;
use aip_packager::DigestWalker;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: unchanged content digests identically; changed content does not.
    #[test]
    fn property_digest_stable_and_sensitive(
        content in proptest::collection::vec(any::<u8>(), 0..4096),
        extra in any::<u8>(),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, &content).unwrap();

        let walker = DigestWalker::new(dir.path()).unwrap();
        let first = walker.collect_records().unwrap();
        let second = walker.collect_records().unwrap();

        prop_assert_eq!(first.len(), 1);
        prop_assert_eq!(&first[0].digest, &second[0].digest);
        prop_assert_eq!(&first[0].digest, &ContentDigest::from_bytes(&content));
        prop_assert_eq!(first[0].size, content.len() as u64);

        let mut changed = content.clone();
        changed.push(extra);
        std::fs::write(&path, &changed).unwrap();
        let third = walker.collect_records().unwrap();
        prop_assert_ne!(&first[0].digest, &third[0].digest);
    }
}
