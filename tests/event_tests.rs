/* tests/event_tests.rs */

#![cfg(feature = "events")]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use confcache::storage::MemoryStorage;
use confcache::{Clock, ConfigEvent, ConfigManager, ConfigSnapshot, StaticFetcher};
use tokio::sync::broadcast::error::TryRecvError;

struct ManualClock {
	millis: AtomicU64,
}

impl Default for ManualClock {
	fn default() -> Self {
		Self {
			millis: AtomicU64::new(1_700_000_000_000),
		}
	}
}

impl ManualClock {
	fn advance(&self, by: Duration) {
		self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now(&self) -> SystemTime {
		UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
	}
}

fn manager_serving(version: &str, clock: Arc<ManualClock>) -> ConfigManager {
	let snapshot = ConfigSnapshot::new(version, Default::default(), clock.now());
	ConfigManager::builder()
		.fetcher(Arc::new(StaticFetcher::new(snapshot)))
		.storage(Arc::new(MemoryStorage::new()))
		.clock(clock)
		.build()
		.unwrap()
}

#[tokio::test]
async fn test_update_event_on_first_fetch() {
	let clock = Arc::new(ManualClock::default());
	let manager = manager_serving("1.0.0", clock.clone());
	let mut events = manager.subscribe();

	manager.read().await;

	let ConfigEvent::Updated {
		snapshot,
		previous_version,
	} = events.try_recv().unwrap();
	assert_eq!(snapshot.version(), "1.0.0");
	assert!(previous_version.is_none());
}

#[tokio::test]
async fn test_update_event_carries_previous_version() {
	let clock = Arc::new(ManualClock::default());
	let storage = Arc::new(MemoryStorage::new());
	let fetched = ConfigSnapshot::new("1.0.1", Default::default(), clock.now());
	let manager = ConfigManager::builder()
		.fetcher(Arc::new(StaticFetcher::new(fetched)))
		.storage(storage.clone())
		.clock(clock.clone())
		.build()
		.unwrap();

	// Seed an older document, then let an advisory drive the refetch.
	use confcache::storage::Storage;
	storage
		.store(&ConfigSnapshot::new("1.0.0", Default::default(), clock.now()))
		.await
		.unwrap();

	let mut events = manager.subscribe();
	clock.advance(Duration::from_millis(1));
	manager.declare_version("1.0.1").await;

	let ConfigEvent::Updated {
		snapshot,
		previous_version,
	} = events.try_recv().unwrap();
	assert_eq!(snapshot.version(), "1.0.1");
	assert_eq!(previous_version.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_no_event_without_a_version_change() {
	let clock = Arc::new(ManualClock::default());
	let manager = manager_serving("1.0.0", clock.clone());
	let mut events = manager.subscribe();

	manager.read().await;
	let _ = events.try_recv().unwrap();

	// A touch changes the fetch date, not the served version: no event.
	clock.advance(Duration::from_millis(500));
	manager.declare_version("1.0.0").await;
	assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

	// Refetching the same version stores it but emits nothing either.
	clock.advance(Duration::from_millis(1));
	manager.declare_version("1.0.2").await;
	assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
