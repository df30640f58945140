/* src/manager/error.rs */

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::storage::StorageError;

/// Errors surfaced through [`ReadOutcome`](super::ReadOutcome).
///
/// An error is only ever produced by a cycle that actually attempted a
/// fetch or touched storage; serving a cached document, however stale,
/// is never an error by itself.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
	#[error("fetch error: {0}")]
	Fetch(#[from] FetchError),

	#[error("storage error: {0}")]
	Storage(#[from] StorageError),

	#[error("builder error: {0}")]
	Builder(String),
}
