/* src/storage/mod.rs */

mod error;
mod memory;

#[cfg(feature = "fs")]
mod file;

pub use error::StorageError;
pub use memory::MemoryStorage;

#[cfg(feature = "fs")]
pub use file::FileStorage;

use async_trait::async_trait;

use crate::snapshot::ConfigSnapshot;

/// Persists the current snapshot and the highest version ever declared.
///
/// The manager serializes its storage calls, so implementations need not
/// coordinate concurrent writers of their own.
#[async_trait]
pub trait Storage: Send + Sync {
	/// Persists `snapshot` as the current document, replacing any
	/// previously stored one.
	async fn store(&self, snapshot: &ConfigSnapshot) -> Result<(), StorageError>;

	/// Loads the current snapshot and the declared-version high-water
	/// mark. Either may be absent on a fresh installation.
	async fn load(&self) -> Result<(Option<ConfigSnapshot>, Option<String>), StorageError>;

	/// Records `version` as the new high-water mark if and only if it
	/// compares higher than the currently stored one.
	async fn declare_version(&self, version: &str) -> Result<(), StorageError>;
}
