/* src/manager/mod.rs */

//!
//! The fetch-or-serve orchestrator.
//!
//! [`ConfigManager`] reconciles the age and version of the cached document,
//! out-of-band version advisories, and concurrent read requests into one
//! decision per cycle: serve the cache, or fetch. At most one fetch is ever
//! in flight; callers arriving while one is pending join it and observe its
//! outcome.

mod error;
mod flight;
mod policy;

#[cfg(feature = "events")]
mod event;

pub use error::ConfigError;
pub use policy::{DEFAULT_MAXIMUM_CONFIG_AGE, FreshnessPolicy};

#[cfg(feature = "events")]
pub use event::ConfigEvent;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::{Mutex, MutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::fetcher::Fetcher;
use crate::snapshot::ConfigSnapshot;
use crate::storage::{Storage, StorageError};
use crate::version::Version;

use flight::Flight;

/// Default capacity of the update-notification channel.
#[cfg(feature = "events")]
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// What a read cycle produced.
///
/// Both fields may be present at once: when a fetch runs and fails, the
/// previously cached document is served as a best-effort fallback alongside
/// the error. `error` is `None` whenever no fetch was attempted, even if an
/// earlier one had failed.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
	pub snapshot: Option<Arc<ConfigSnapshot>>,
	pub error: Option<ConfigError>,
}

impl ReadOutcome {
	fn served(snapshot: Option<Arc<ConfigSnapshot>>) -> Self {
		Self {
			snapshot,
			error: None,
		}
	}

	fn degraded(snapshot: Option<Arc<ConfigSnapshot>>, error: ConfigError) -> Self {
		Self {
			snapshot,
			error: Some(error),
		}
	}

	/// True when a fetch was attempted during this cycle and failed.
	pub fn is_degraded(&self) -> bool {
		self.error.is_some()
	}
}

struct State {
	loaded: bool,
	snapshot: Option<Arc<ConfigSnapshot>>,
	highest_version: Option<String>,
	last_fetch_attempt: Option<SystemTime>,
	flight: Option<Flight>,
}

impl State {
	fn empty() -> Self {
		Self {
			loaded: false,
			snapshot: None,
			highest_version: None,
			last_fetch_attempt: None,
			flight: None,
		}
	}
}

/// Keeps a single versioned configuration document fresh.
///
/// Construct one instance at host startup with injected collaborators and
/// share it by cloning; clones operate on the same cache and coalesce onto
/// the same in-flight fetch.
#[derive(Clone)]
pub struct ConfigManager {
	fetcher: Arc<dyn Fetcher>,
	storage: Arc<dyn Storage>,
	clock: Arc<dyn Clock>,
	policy: FreshnessPolicy,
	state: Arc<Mutex<State>>,
	#[cfg(feature = "events")]
	events: tokio::sync::broadcast::Sender<ConfigEvent>,
}

/// Builder for [`ConfigManager`].
pub struct ConfigManagerBuilder {
	fetcher: Option<Arc<dyn Fetcher>>,
	storage: Option<Arc<dyn Storage>>,
	clock: Option<Arc<dyn Clock>>,
	policy: FreshnessPolicy,
	#[cfg(feature = "events")]
	event_capacity: usize,
}

impl ConfigManagerBuilder {
	pub fn new() -> Self {
		Self {
			fetcher: None,
			storage: None,
			clock: None,
			policy: FreshnessPolicy::default(),
			#[cfg(feature = "events")]
			event_capacity: DEFAULT_EVENT_CAPACITY,
		}
	}

	pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
		self.fetcher = Some(fetcher);
		self
	}

	pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Overrides the wall-clock source. Intended for tests driving the
	/// freshness thresholds deterministically.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);
		self
	}

	pub fn policy(mut self, policy: FreshnessPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn minimum_config_age(mut self, age: Duration) -> Self {
		self.policy.minimum_config_age = age;
		self
	}

	pub fn minimum_fetch_interval(mut self, interval: Duration) -> Self {
		self.policy.minimum_fetch_interval = interval;
		self
	}

	pub fn maximum_config_age(mut self, age: Duration) -> Self {
		self.policy.maximum_config_age = age;
		self
	}

	/// Note: update events may be dropped if subscribers process slower
	/// than updates arrive and the channel fills up.
	#[cfg(feature = "events")]
	pub fn event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity;
		self
	}

	pub fn build(self) -> Result<ConfigManager, ConfigError> {
		let fetcher = self
			.fetcher
			.ok_or_else(|| ConfigError::Builder("fetcher is required".to_string()))?;
		let storage = self
			.storage
			.ok_or_else(|| ConfigError::Builder("storage is required".to_string()))?;

		Ok(ConfigManager {
			fetcher,
			storage,
			clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
			policy: self.policy,
			state: Arc::new(Mutex::new(State::empty())),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(self.event_capacity).0,
		})
	}
}

impl Default for ConfigManagerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigManager {
	pub fn builder() -> ConfigManagerBuilder {
		ConfigManagerBuilder::new()
	}

	/// Creates a manager with the default policy and system clock.
	pub fn new(fetcher: Arc<dyn Fetcher>, storage: Arc<dyn Storage>) -> Self {
		Self {
			fetcher,
			storage,
			clock: Arc::new(SystemClock),
			policy: FreshnessPolicy::default(),
			state: Arc::new(Mutex::new(State::empty())),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Returns the best available snapshot, fetching first when the cache
	/// warrants it.
	///
	/// Resolves exactly once. Calls arriving while a fetch is in flight
	/// join it and observe the identical outcome. A failed fetch degrades
	/// to serving the previous snapshot alongside the error; serving a
	/// cached document without attempting a fetch never produces an error.
	pub async fn read(&self) -> ReadOutcome {
		let mut state = self.state.lock().await;

		if let Some(flight) = &state.flight {
			let mut rx = flight.join();
			drop(state);
			return match rx.recv().await {
				Ok(outcome) => outcome,
				// The initiator went away without settling; fall back to
				// whatever is cached.
				Err(_) => {
					let state = self.state.lock().await;
					ReadOutcome::served(state.snapshot.clone())
				}
			};
		}

		if let Err(e) = self.ensure_loaded(&mut state).await {
			return ReadOutcome::degraded(None, ConfigError::Storage(e));
		}

		let now = self.clock.now();
		let snapshot = state.snapshot.clone();
		if !self
			.policy
			.is_stale(snapshot.as_deref(), state.highest_version.as_deref(), now)
			|| self.policy.is_rate_limited(state.last_fetch_attempt, now)
		{
			return ReadOutcome::served(snapshot);
		}

		self.run_fetch(state, now).await
	}

	/// Records an out-of-band advisory that a version at least this high
	/// exists, and refetches immediately when the freshness policy calls
	/// for it.
	///
	/// Fire-and-forget: failures on this path are logged, never returned.
	/// A malformed version is silently ignored. Declaring the version the
	/// cache already holds refreshes the document's fetch date without a
	/// network round trip.
	pub async fn declare_version(&self, version: &str) {
		if !Version::parse(version).is_valid() {
			tracing::debug!(version, "ignoring malformed version advisory");
			return;
		}

		let declared = match self.storage.declare_version(version).await {
			Ok(()) => true,
			Err(e) => {
				tracing::error!(error = %e, "could not record declared version");
				false
			}
		};

		let mut state = self.state.lock().await;
		if let Err(e) = self.ensure_loaded(&mut state).await {
			tracing::error!(error = %e, "could not load stored configuration");
			return;
		}

		if declared
			&& state
				.highest_version
				.as_deref()
				.is_none_or(|highest| Version::compare(version, highest) == Ordering::Greater)
		{
			state.highest_version = Some(version.to_string());
		}

		let now = self.clock.now();
		if let Some(snapshot) = state.snapshot.clone() {
			// A frozen document stays as-is, fetch date included.
			if snapshot.fetch_disabled() {
				return;
			}

			// Re-declaring the cached version confirms the content is still
			// current; extend its lifetime without a round trip.
			if Version::compare(version, snapshot.version()) == Ordering::Equal {
				let touched = snapshot.touched(now);
				match self.storage.store(&touched).await {
					Ok(()) => state.snapshot = Some(Arc::new(touched)),
					Err(e) => {
						tracing::error!(error = %e, "could not persist refreshed configuration")
					}
				}
				return;
			}
		}

		// An in-flight fetch already covers this advisory.
		if state.flight.is_some() {
			return;
		}

		if !self
			.policy
			.is_stale(state.snapshot.as_deref(), state.highest_version.as_deref(), now)
			|| self.policy.is_rate_limited(state.last_fetch_attempt, now)
		{
			return;
		}

		let _ = self.run_fetch(state, now).await;
	}

	/// Subscribes to update notifications. An event is emitted whenever a
	/// cycle ends with a different version being served than was previously
	/// known, after the new snapshot has been persisted.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ConfigEvent> {
		self.events.subscribe()
	}

	async fn ensure_loaded(&self, state: &mut State) -> Result<(), StorageError> {
		if state.loaded {
			return Ok(());
		}
		let (snapshot, highest_version) = self.storage.load().await?;
		state.snapshot = snapshot.map(Arc::new);
		state.highest_version = highest_version;
		state.loaded = true;
		Ok(())
	}

	/// Issues the single fetch for this cycle and settles every joined
	/// waiter with its outcome. Must be entered with no flight pending;
	/// callers hold the state lock, which is released while the fetcher
	/// runs.
	async fn run_fetch(&self, mut state: MutexGuard<'_, State>, now: SystemTime) -> ReadOutcome {
		state.flight = Some(Flight::new());
		state.last_fetch_attempt = Some(now);
		let hint = state.highest_version.clone();
		let previous = state.snapshot.clone();
		drop(state);

		let result = self.fetcher.fetch(hint.as_deref()).await;

		let mut state = self.state.lock().await;
		let outcome = match result {
			Ok(fetched) => self.accept_fetched(&mut state, fetched, previous).await,
			Err(e) => {
				tracing::error!(error = %e, "could not fetch configuration");
				ReadOutcome::degraded(previous, ConfigError::Fetch(e))
			}
		};

		let flight = state.flight.take();
		drop(state);
		if let Some(flight) = flight {
			flight.settle(&outcome);
		}
		outcome
	}

	async fn accept_fetched(
		&self,
		state: &mut State,
		fetched: ConfigSnapshot,
		previous: Option<Arc<ConfigSnapshot>>,
	) -> ReadOutcome {
		// A lagging edge cache can still serve an older document than the
		// one we hold; never replace the cache with a downgrade.
		if let Some(previous) = &previous {
			if previous.has_higher_version_than(&fetched) {
				return ReadOutcome::served(Some(Arc::clone(previous)));
			}
		}

		if let Err(e) = self.storage.store(&fetched).await {
			tracing::error!(error = %e, "could not persist fetched configuration");
			return ReadOutcome::degraded(None, ConfigError::Storage(e));
		}
		if let Err(e) = self.storage.declare_version(fetched.version()).await {
			tracing::error!(error = %e, "could not record fetched version");
		}

		let fetched = Arc::new(fetched);
		state.snapshot = Some(Arc::clone(&fetched));
		if state
			.highest_version
			.as_deref()
			.is_none_or(|highest| Version::compare(fetched.version(), highest) == Ordering::Greater)
		{
			state.highest_version = Some(fetched.version().to_string());
		}

		#[cfg(feature = "events")]
		{
			let changed = previous
				.as_deref()
				.is_none_or(|p| Version::compare(fetched.version(), p.version()) != Ordering::Equal);
			if changed {
				let _ = self.events.send(ConfigEvent::Updated {
					snapshot: Arc::clone(&fetched),
					previous_version: previous.as_ref().map(|p| p.version().to_string()),
				});
			}
		}

		ReadOutcome::served(Some(fetched))
	}
}

impl std::fmt::Debug for ConfigManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ConfigManager")
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}
