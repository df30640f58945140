/* src/snapshot/mod.rs */

mod codec;
mod error;

pub use error::SnapshotError;

use std::cmp::Ordering;
use std::time::{Duration, SystemTime};

use serde_json::{Map, Value};

use crate::version::Version;

/// Reserved payload key: when set to `true`, the document freezes the cache
/// and no further fetch is attempted until process restart.
pub const DISABLE_FETCH_KEY: &str = "disableConfigFetch";

/// One cached configuration document plus its freshness metadata.
///
/// Snapshots are immutable values: refreshing the fetch date (a "touch")
/// produces a new snapshot via [`ConfigSnapshot::touched`] rather than
/// mutating the shared one. The payload is opaque to this crate except for
/// [`DISABLE_FETCH_KEY`].
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
	version: String,
	data: Map<String, Value>,
	fetch_date: SystemTime,
	max_age: Duration,
	min_age: Duration,
}

impl ConfigSnapshot {
	/// Creates a snapshot confirmed current at `fetch_date`, with an
	/// unbounded lifetime and no minimum age.
	pub fn new(version: impl Into<String>, data: Map<String, Value>, fetch_date: SystemTime) -> Self {
		Self {
			version: version.into(),
			data,
			fetch_date,
			max_age: Duration::MAX,
			min_age: Duration::ZERO,
		}
	}

	/// Sets the document's own time-to-live.
	pub fn with_max_age(mut self, max_age: Duration) -> Self {
		self.max_age = max_age;
		self
	}

	/// Sets the minimum age this document must reach before a higher
	/// declared version may trigger a refetch.
	pub fn with_min_age(mut self, min_age: Duration) -> Self {
		self.min_age = min_age;
		self
	}

	/// Returns a copy whose fetch date is refreshed to `now`, extending the
	/// document's effective lifetime without changing its contents.
	pub fn touched(&self, now: SystemTime) -> Self {
		Self {
			fetch_date: now,
			..self.clone()
		}
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	/// Looks up a payload field by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	pub fn fetch_date(&self) -> SystemTime {
		self.fetch_date
	}

	pub fn max_age(&self) -> Duration {
		self.max_age
	}

	pub fn min_age(&self) -> Duration {
		self.min_age
	}

	/// Time elapsed since this snapshot was confirmed current. Zero when
	/// `now` precedes the fetch date.
	pub fn age(&self, now: SystemTime) -> Duration {
		now.duration_since(self.fetch_date).unwrap_or(Duration::ZERO)
	}

	/// Whether the document has outlived its own declared lifetime.
	pub fn is_expired(&self, now: SystemTime) -> bool {
		match self.fetch_date.checked_add(self.max_age) {
			Some(deadline) => now > deadline,
			// An unbounded lifetime never expires.
			None => false,
		}
	}

	pub fn has_higher_version_than(&self, other: &ConfigSnapshot) -> bool {
		Version::compare(&self.version, &other.version) == Ordering::Greater
	}

	/// Whether this document carries the fetch kill switch.
	pub fn fetch_disabled(&self) -> bool {
		self.data
			.get(DISABLE_FETCH_KEY)
			.and_then(Value::as_bool)
			.unwrap_or(false)
	}
}
