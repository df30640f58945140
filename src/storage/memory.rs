/* src/storage/memory.rs */

use std::cmp::Ordering;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use super::{Storage, StorageError};
use crate::snapshot::ConfigSnapshot;
use crate::version::Version;

#[derive(Default)]
struct MemoryState {
	snapshot: Option<ConfigSnapshot>,
	highest_version: Option<String>,
}

/// An in-memory storage backend, useful for testing and for hosts that do
/// not want persistence across restarts.
///
/// Uses RCU (Read-Copy-Update) for lock-free reads and atomic updates.
#[derive(Default)]
pub struct MemoryStorage {
	inner: ArcSwap<MemoryState>,
}

impl MemoryStorage {
	/// Creates a new empty storage.
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl Storage for MemoryStorage {
	async fn store(&self, snapshot: &ConfigSnapshot) -> Result<(), StorageError> {
		self.inner.rcu(|state| MemoryState {
			snapshot: Some(snapshot.clone()),
			highest_version: state.highest_version.clone(),
		});
		Ok(())
	}

	async fn load(&self) -> Result<(Option<ConfigSnapshot>, Option<String>), StorageError> {
		let state = self.inner.load();
		Ok((state.snapshot.clone(), state.highest_version.clone()))
	}

	async fn declare_version(&self, version: &str) -> Result<(), StorageError> {
		self.inner.rcu(|state| {
			let highest_version = match &state.highest_version {
				// The high-water mark never decreases.
				Some(current) if Version::compare(version, current) != Ordering::Greater => {
					Some(current.clone())
				}
				_ => Some(version.to_string()),
			};
			MemoryState {
				snapshot: state.snapshot.clone(),
				highest_version,
			}
		});
		Ok(())
	}
}
