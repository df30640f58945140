/* src/snapshot/codec.rs */

//!
//! Textual envelope for persisting snapshots.
//!
//! The envelope is a single JSON object holding the payload fields inline
//! alongside four reserved keys: `version` (required), `fetchDate` (epoch
//! milliseconds, absent means "now"), `maxAge` and `minAge` (milliseconds;
//! absent means unbounded and zero respectively). Encoding a decoded
//! envelope reproduces the version, fetch date, lifetimes, and payload
//! exactly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use super::{ConfigSnapshot, SnapshotError};

const VERSION_KEY: &str = "version";
const FETCH_DATE_KEY: &str = "fetchDate";
const MAX_AGE_KEY: &str = "maxAge";
const MIN_AGE_KEY: &str = "minAge";

impl ConfigSnapshot {
	/// Serializes this snapshot to its envelope form.
	pub fn encode(&self) -> String {
		let mut envelope = self.data.clone();
		envelope.insert(VERSION_KEY.to_string(), Value::from(self.version.clone()));
		envelope.insert(
			FETCH_DATE_KEY.to_string(),
			Value::from(epoch_millis(self.fetch_date)),
		);
		if self.max_age != Duration::MAX {
			envelope.insert(
				MAX_AGE_KEY.to_string(),
				Value::from(self.max_age.as_millis() as u64),
			);
		}
		if self.min_age != Duration::ZERO {
			envelope.insert(
				MIN_AGE_KEY.to_string(),
				Value::from(self.min_age.as_millis() as u64),
			);
		}
		Value::Object(envelope).to_string()
	}

	/// Deserializes a snapshot from its envelope form.
	///
	/// An absent `fetchDate` is taken to mean the document is current as of
	/// the moment of deserialization.
	pub fn decode(input: &str) -> Result<Self, SnapshotError> {
		let value: Value =
			serde_json::from_str(input).map_err(|e| SnapshotError::Parse(e.to_string()))?;
		let Value::Object(mut envelope) = value else {
			return Err(SnapshotError::NotAnObject);
		};

		// Servers have been observed emitting bare numeric versions.
		let version = match envelope.remove(VERSION_KEY) {
			Some(Value::String(v)) => v,
			Some(Value::Number(n)) => n.to_string(),
			_ => return Err(SnapshotError::MissingVersion),
		};

		let fetch_date = match envelope.remove(FETCH_DATE_KEY).as_ref().and_then(Value::as_u64) {
			Some(ms) => UNIX_EPOCH + Duration::from_millis(ms),
			None => SystemTime::now(),
		};
		let max_age = envelope
			.remove(MAX_AGE_KEY)
			.as_ref()
			.and_then(Value::as_u64)
			.map(Duration::from_millis)
			.unwrap_or(Duration::MAX);
		let min_age = envelope
			.remove(MIN_AGE_KEY)
			.as_ref()
			.and_then(Value::as_u64)
			.map(Duration::from_millis)
			.unwrap_or(Duration::ZERO);

		Ok(Self {
			version,
			data: envelope,
			fetch_date,
			max_age,
			min_age,
		})
	}
}

fn epoch_millis(time: SystemTime) -> u64 {
	time.duration_since(UNIX_EPOCH)
		.unwrap_or(Duration::ZERO)
		.as_millis() as u64
}
