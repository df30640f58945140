/* src/storage/error.rs */

#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
	/// The underlying medium failed.
	#[error("io error: {0}")]
	Io(String),

	/// The persisted state could not be read back.
	#[error("corrupt storage state: {0}")]
	Corrupt(String),

	/// Any other backend-specific failure.
	#[error("storage backend error: {0}")]
	Backend(String),
}

impl From<std::io::Error> for StorageError {
	fn from(e: std::io::Error) -> Self {
		Self::Io(e.to_string())
	}
}
