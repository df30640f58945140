/* tests/version_tests.rs */

use std::cmp::Ordering;

use confcache::Version;

#[test]
fn test_component_ordering() {
	assert_eq!(Version::compare("1.0", "1.0.0"), Ordering::Equal);
	assert_eq!(Version::compare("1.0.0", "1.0.1"), Ordering::Less);
	assert_eq!(Version::compare("1.0.0", "0.9"), Ordering::Greater);
	assert_eq!(Version::compare("2", "10"), Ordering::Less);
	assert_eq!(Version::compare("1.2.3", "1.2.3"), Ordering::Equal);
	assert_eq!(Version::compare("1.0.0.0.0", "1"), Ordering::Equal);
}

#[test]
fn test_marker_prefix_ignored() {
	assert_eq!(Version::compare("v1.0", "v1.0.0"), Ordering::Equal);
	assert_eq!(Version::compare("v1.0.0", "v1.0.1"), Ordering::Less);
	assert_eq!(Version::compare("v1.0.0", "v0.9"), Ordering::Greater);
	// Mixed prefixes compare the same as bare versions.
	assert_eq!(Version::compare("1.0", "v1.0.0"), Ordering::Equal);
	assert_eq!(Version::compare("1.0.0", "v1.0.1"), Ordering::Less);
	assert_eq!(Version::compare("1.0.0", "v0.9"), Ordering::Greater);
}

#[test]
fn test_valid_outranks_invalid() {
	for invalid in ["z", "_", "/", "!", "."] {
		assert_eq!(Version::compare("1.0", invalid), Ordering::Greater);
		assert_eq!(Version::compare(invalid, "1.0"), Ordering::Less);
	}
}

#[test]
fn test_invalid_versions_compare_equal() {
	assert_eq!(Version::compare("z", "/"), Ordering::Equal);
	assert_eq!(Version::compare("_", "/"), Ordering::Equal);
	assert_eq!(Version::compare("/", "/"), Ordering::Equal);
	assert_eq!(Version::compare("!", "/"), Ordering::Equal);
	assert_eq!(Version::compare(".", "/"), Ordering::Equal);
	assert_eq!(Version::compare("zzz", "not a version"), Ordering::Equal);
}

#[test]
fn test_antisymmetry() {
	let samples = ["1.0", "1.0.1", "v2", "0.9.9", "z", "10.0"];
	for a in samples {
		for b in samples {
			let forward = Version::compare(a, b);
			let backward = Version::compare(b, a);
			assert_eq!(forward, backward.reverse(), "compare({a:?}, {b:?})");
		}
	}
}

#[test]
fn test_validity() {
	assert!(Version::parse("1").is_valid());
	assert!(Version::parse("1.2.3").is_valid());
	assert!(Version::parse("v1.0").is_valid());
	assert!(Version::parse("1.0.0.0.0.0").is_valid());

	assert!(!Version::parse("").is_valid());
	assert!(!Version::parse("v").is_valid());
	assert!(!Version::parse("z").is_valid());
	assert!(!Version::parse("1..2").is_valid());
	assert!(!Version::parse("1.2.").is_valid());
	assert!(!Version::parse(".1").is_valid());
	assert!(!Version::parse("1.a.2").is_valid());
	assert!(!Version::parse("1-2").is_valid());
	// A component too large for u64 renders the whole version invalid.
	assert!(!Version::parse("99999999999999999999999999").is_valid());
}

#[test]
fn test_equality_follows_ordering() {
	// Two invalid versions are the same "unknown" version.
	assert_eq!(Version::parse("z"), Version::parse("/"));
	assert_eq!(Version::parse("1.0"), Version::parse("v1.0.0"));
	assert_ne!(Version::parse("1.0"), Version::parse("1.0.1"));
}

#[test]
fn test_display() {
	assert_eq!(Version::parse("v1.2.3").to_string(), "1.2.3");
	assert_eq!(Version::parse("10.0").to_string(), "10.0");
	assert_eq!(Version::parse("bogus").to_string(), "<invalid>");
}
