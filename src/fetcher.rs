/* src/fetcher.rs */

use async_trait::async_trait;

use crate::snapshot::{ConfigSnapshot, SnapshotError};

/// Error produced by a [`Fetcher`] implementation.
///
/// Cloneable so a single failed fetch can be reported to every caller
/// joined to it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
	/// The transport failed before a response was obtained.
	#[error("transport error: {0}")]
	Transport(String),

	/// The remote answered with a non-success status.
	#[error("unexpected status: {0}")]
	Status(u16),

	/// The response body did not decode into a snapshot envelope.
	#[error("malformed document: {0}")]
	Malformed(#[from] SnapshotError),

	/// Any other fetcher-specific failure.
	#[error("{0}")]
	Other(String),
}

/// Retrieves configuration documents from wherever they live.
///
/// The returned future resolves exactly once, eventually. Retries,
/// timeouts, and cancellation are the implementation's own concern; the
/// manager simply awaits the result.
#[async_trait]
pub trait Fetcher: Send + Sync {
	/// Fetches the latest configuration document.
	///
	/// `version_hint` is the highest version known to exist, when one has
	/// been declared. The very first fetch of a process lifetime may
	/// legitimately carry no hint.
	async fn fetch(&self, version_hint: Option<&str>) -> Result<ConfigSnapshot, FetchError>;
}

/// A fetcher that serves a preset snapshot, useful for testing and
/// embedded environments.
pub struct StaticFetcher {
	snapshot: ConfigSnapshot,
}

impl StaticFetcher {
	pub fn new(snapshot: ConfigSnapshot) -> Self {
		Self { snapshot }
	}
}

#[async_trait]
impl Fetcher for StaticFetcher {
	async fn fetch(&self, _version_hint: Option<&str>) -> Result<ConfigSnapshot, FetchError> {
		Ok(self.snapshot.clone())
	}
}
