//! Sharding Module Tests
//!
//! Validates key-to-shard mapping and the descriptor string format.
//!
//! ## Test Scopes
//! - **Sharder**: deterministic hashing, range bounds, and spread across shards.
//! - **Descriptors**: parsing, formatting, and key matching.

#[cfg(test)]
mod tests {
    use crate::error::RouteError;
    use crate::sharding::{
        ChecksumSharder, ShardDescriptor, Sharder, hash_resource, matches, parse_shard,
    };

    // ============================================================
    // SHARDER TESTS
    // ============================================================

    #[test]
    fn test_shard_is_deterministic() {
        let sharder = ChecksumSharder::new(8).unwrap();

        let s1 = sharder.get_shard("/pfs/repo/file.txt").unwrap();
        let s2 = sharder.get_shard("/pfs/repo/file.txt").unwrap();
        assert_eq!(s1, s2, "The same key should yield the same shard");

        // A second, independent sharder must agree
        let other = ChecksumSharder::new(8).unwrap();
        assert_eq!(other.get_shard("/pfs/repo/file.txt").unwrap(), s1);
    }

    #[test]
    fn test_shard_is_within_range() {
        for num_shards in [1u64, 2, 3, 7, 8, 64, 1000] {
            let sharder = ChecksumSharder::new(num_shards).unwrap();
            for i in 0..500 {
                let key = format!("/data/file_{}", i);
                let shard = sharder.get_shard(&key).unwrap();
                assert!(
                    shard < num_shards,
                    "Shard {} should be < {}",
                    shard,
                    num_shards
                );
            }
        }
    }

    #[test]
    fn test_shard_distribution() {
        let sharder = ChecksumSharder::new(16).unwrap();
        let mut counts = vec![0usize; 16];

        for i in 0..10000 {
            let key = format!("/repo/commit-{}/file-{}", i % 37, i);
            counts[sharder.get_shard(&key).unwrap() as usize] += 1;
        }

        // Every shard gets used with 10000 keys over 16 shards
        assert!(
            counts.iter().all(|&c| c > 0),
            "All shards should receive keys, got: {:?}",
            counts
        );
    }

    #[test]
    fn test_empty_key_is_hashable() {
        let sharder = ChecksumSharder::new(4).unwrap();
        let shard = sharder.get_shard("").unwrap();
        assert!(shard < 4);
    }

    #[test]
    fn test_descriptor_for_key() {
        let sharder = ChecksumSharder::new(8).unwrap();
        let descriptor = sharder.get_descriptor("/a/b").unwrap();

        assert_eq!(descriptor.num_shards, 8);
        assert_eq!(descriptor.index, sharder.get_shard("/a/b").unwrap());
        assert!(descriptor.matches("/a/b"));
    }

    // ============================================================
    // DESCRIPTOR TESTS
    // ============================================================

    #[test]
    fn test_parse_shard() {
        assert_eq!(parse_shard("3-8").unwrap(), (3, 8));
        assert_eq!(parse_shard("0-1").unwrap(), (0, 1));
    }

    #[test]
    fn test_parse_shard_rejects_malformed() {
        for bad in [
            "38", "", "-8", "3-", "a-8", "3-b", "3-8-1", "8-8", "0-0", "+3-8", "3-+8", "03-08",
            "3-08", "00-8", " 3-8", "3-8 ",
        ] {
            let result = parse_shard(bad);
            assert!(
                matches!(result, Err(RouteError::InvalidDescriptor { .. })),
                "'{}' should fail to parse, got {:?}",
                bad,
                result
            );
        }
    }

    #[test]
    fn test_parse_shard_accepts_bare_zero() {
        assert_eq!(parse_shard("0-10").unwrap(), (0, 10));
        assert_eq!(parse_shard("10-100").unwrap(), (10, 100));
    }

    #[test]
    fn test_descriptor_display_round_trip() {
        let descriptor = ShardDescriptor::new(3, 8).unwrap();
        assert_eq!(descriptor.to_string(), "3-8");
        assert_eq!("3-8".parse::<ShardDescriptor>().unwrap(), descriptor);
    }

    #[test]
    fn test_match_agrees_with_hash() {
        let key = "/pfs/repo/master/file";
        let expected = hash_resource(key) % 4;

        for index in 0..4u64 {
            let descriptor = format!("{}-4", index);
            assert_eq!(
                matches(key, &descriptor).unwrap(),
                index == expected,
                "descriptor {}",
                descriptor
            );
        }
    }

    #[test]
    fn test_match_rejects_bad_descriptor() {
        assert!(matches("/a", "nope").is_err());
    }

    #[test]
    fn test_descriptor_out_of_range() {
        assert!(ShardDescriptor::new(4, 4).is_err());
        assert!(matches!(
            ShardDescriptor::new(0, 0),
            Err(RouteError::ZeroShards)
        ));
    }
}
