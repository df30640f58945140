/* src/storage/file.rs */

use std::cmp::Ordering;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::{Storage, StorageError};
use crate::snapshot::ConfigSnapshot;
use crate::version::Version;

/// On-disk layout: one JSON document holding the encoded snapshot envelope
/// and the declared-version high-water mark.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileState {
	#[serde(skip_serializing_if = "Option::is_none")]
	config: Option<String>,
	#[serde(rename = "highestVersion", skip_serializing_if = "Option::is_none")]
	highest_version: Option<String>,
}

/// A file-backed storage backend using `tokio::fs`.
///
/// Writes go through a temporary sibling file followed by a rename, so a
/// crash mid-write never leaves a torn state behind.
pub struct FileStorage {
	path: PathBuf,
}

impl FileStorage {
	/// Creates a storage persisting to the given file. The file is created
	/// on the first write; a missing file loads as an empty state.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	async fn read_state(&self) -> Result<FileState, StorageError> {
		match fs::read(&self.path).await {
			Ok(bytes) => serde_json::from_slice(&bytes)
				.map_err(|e| StorageError::Corrupt(e.to_string())),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileState::default()),
			Err(e) => Err(e.into()),
		}
	}

	async fn write_state(&self, state: &FileState) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(state).map_err(|e| StorageError::Backend(e.to_string()))?;
		let tmp = self.path.with_extension("tmp");
		fs::write(&tmp, &bytes).await?;
		fs::rename(&tmp, &self.path).await?;
		Ok(())
	}
}

#[async_trait]
impl Storage for FileStorage {
	async fn store(&self, snapshot: &ConfigSnapshot) -> Result<(), StorageError> {
		let mut state = self.read_state().await?;
		state.config = Some(snapshot.encode());
		self.write_state(&state).await
	}

	async fn load(&self) -> Result<(Option<ConfigSnapshot>, Option<String>), StorageError> {
		let state = self.read_state().await?;
		let snapshot = match state.config.as_deref().map(ConfigSnapshot::decode) {
			Some(Ok(snapshot)) => Some(snapshot),
			Some(Err(e)) => {
				// A corrupt envelope degrades to "no snapshot yet" so the
				// manager can fetch a fresh document over it.
				tracing::warn!(error = %e, path = %self.path.display(), "discarding corrupt stored snapshot");
				None
			}
			None => None,
		};
		Ok((snapshot, state.highest_version))
	}

	async fn declare_version(&self, version: &str) -> Result<(), StorageError> {
		let mut state = self.read_state().await?;
		match &state.highest_version {
			// The high-water mark never decreases.
			Some(current) if Version::compare(version, current) != Ordering::Greater => Ok(()),
			_ => {
				state.highest_version = Some(version.to_string());
				self.write_state(&state).await
			}
		}
	}
}
