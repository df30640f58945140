/* src/manager/policy.rs */

use std::cmp::Ordering;
use std::time::{Duration, SystemTime};

use crate::snapshot::ConfigSnapshot;
use crate::version::Version;

/// Ceiling applied to every document's lifetime when the operator does not
/// tighten it further: ten days.
pub const DEFAULT_MAXIMUM_CONFIG_AGE: Duration = Duration::from_millis(10 * 86_400_000);

/// Manager-wide freshness knobs.
///
/// All three are durations compared against a snapshot's age or the time
/// since the last fetch attempt; see the field docs for which threshold
/// each one gates.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
	/// Minimum age a document must reach before a higher declared version
	/// may trigger a refetch. Composes with the document's own minimum age
	/// by taking the larger of the two.
	pub minimum_config_age: Duration,

	/// Minimum time between two fetch attempts, successful or not.
	pub minimum_fetch_interval: Duration,

	/// Ceiling on any document's lifetime, regardless of what the document
	/// itself declares. The tighter of the two wins.
	pub maximum_config_age: Duration,
}

impl Default for FreshnessPolicy {
	fn default() -> Self {
		Self {
			minimum_config_age: Duration::ZERO,
			minimum_fetch_interval: Duration::ZERO,
			maximum_config_age: DEFAULT_MAXIMUM_CONFIG_AGE,
		}
	}
}

impl FreshnessPolicy {
	/// Whether the cached document warrants a fetch.
	///
	/// An absent document is always stale. A present one is stale when it
	/// has outlived the tighter of its own lifetime and the manager-wide
	/// ceiling, or when a higher version has been declared and the document
	/// is old enough for the advisory to be acted upon. A document carrying
	/// the fetch kill switch is never stale.
	pub fn is_stale(
		&self,
		snapshot: Option<&ConfigSnapshot>,
		highest_declared: Option<&str>,
		now: SystemTime,
	) -> bool {
		let Some(snapshot) = snapshot else {
			return true;
		};
		if snapshot.fetch_disabled() {
			return false;
		}

		let age = snapshot.age(now);
		if age > snapshot.max_age().min(self.maximum_config_age) {
			return true;
		}

		if let Some(highest) = highest_declared {
			if Version::compare(highest, snapshot.version()) == Ordering::Greater
				&& age > self.minimum_config_age.max(snapshot.min_age())
			{
				return true;
			}
		}

		false
	}

	/// Whether a warranted fetch must nonetheless be suppressed because the
	/// previous attempt was too recent.
	pub fn is_rate_limited(&self, last_fetch_attempt: Option<SystemTime>, now: SystemTime) -> bool {
		match last_fetch_attempt {
			Some(last) => {
				now.duration_since(last).unwrap_or(Duration::ZERO) < self.minimum_fetch_interval
			}
			None => false,
		}
	}
}
