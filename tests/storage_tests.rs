/* tests/storage_tests.rs */

use std::time::{Duration, UNIX_EPOCH};

use confcache::storage::{MemoryStorage, Storage};
use confcache::ConfigSnapshot;
use serde_json::json;

fn snapshot(version: &str) -> ConfigSnapshot {
	ConfigSnapshot::new(
		version,
		json!({"key": "value"}).as_object().unwrap().clone(),
		UNIX_EPOCH + Duration::from_millis(1_600_000_000_000),
	)
}

#[tokio::test]
async fn test_empty_load() {
	let storage = MemoryStorage::new();
	let (config, highest) = storage.load().await.unwrap();
	assert!(config.is_none());
	assert!(highest.is_none());
}

#[tokio::test]
async fn test_store_and_load() {
	let storage = MemoryStorage::new();
	let stored = snapshot("1.0.1");
	storage.store(&stored).await.unwrap();

	let (loaded, _) = storage.load().await.unwrap();
	let loaded = loaded.unwrap();
	assert_eq!(loaded.version(), "1.0.1");
	assert_eq!(loaded.encode(), stored.encode());
}

#[tokio::test]
async fn test_store_replaces_previous() {
	let storage = MemoryStorage::new();
	storage.store(&snapshot("1.0.0")).await.unwrap();
	storage.store(&snapshot("1.0.1")).await.unwrap();

	let (loaded, _) = storage.load().await.unwrap();
	assert_eq!(loaded.unwrap().version(), "1.0.1");
}

#[tokio::test]
async fn test_declare_version_is_monotonic() {
	let storage = MemoryStorage::new();

	storage.declare_version("1.0.1").await.unwrap();
	let (_, highest) = storage.load().await.unwrap();
	assert_eq!(highest.as_deref(), Some("1.0.1"));

	// A lower advisory never decreases the mark.
	storage.declare_version("1.0.0").await.unwrap();
	let (_, highest) = storage.load().await.unwrap();
	assert_eq!(highest.as_deref(), Some("1.0.1"));

	// Equal advisories keep the stored form.
	storage.declare_version("1.0.1").await.unwrap();
	let (_, highest) = storage.load().await.unwrap();
	assert_eq!(highest.as_deref(), Some("1.0.1"));

	storage.declare_version("1.1").await.unwrap();
	let (_, highest) = storage.load().await.unwrap();
	assert_eq!(highest.as_deref(), Some("1.1"));

	// A malformed advisory compares below any valid one.
	storage.declare_version("zzz").await.unwrap();
	let (_, highest) = storage.load().await.unwrap();
	assert_eq!(highest.as_deref(), Some("1.1"));
}

#[tokio::test]
async fn test_store_and_declare_are_independent() {
	let storage = MemoryStorage::new();
	storage.store(&snapshot("1.0.0")).await.unwrap();
	storage.declare_version("2.0").await.unwrap();

	let (config, highest) = storage.load().await.unwrap();
	assert_eq!(config.unwrap().version(), "1.0.0");
	assert_eq!(highest.as_deref(), Some("2.0"));
}
