/* src/lib.rs */

//!
//! A single-flight remote configuration cache.
//!
//! This crate keeps one versioned configuration document fresh on behalf of
//! a host application. It integrates four components:
//!
//! - **version**: tolerant ordering over dotted numeric version strings.
//! - **snapshot**: the immutable cached document, its freshness metadata,
//!   and the textual envelope it persists as.
//! - **fetcher** / **storage**: collaborator traits for network retrieval
//!   and persistence, with in-memory and file-backed storage provided.
//! - **manager**: the freshness policy, fetch rate limiting, and
//!   coalescing of concurrent requests onto a single in-flight fetch
//!   (`ConfigManager`).
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `events`: Update-notification broadcast channel on the manager.
//! - `fs`: File-backed `Storage` implementation.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::SystemTime;
//! use confcache::{ConfigManager, ConfigSnapshot, MemoryStorage, StaticFetcher};
//!
//! # async fn example() {
//! let document = ConfigSnapshot::new("1.0.0", Default::default(), SystemTime::now());
//! let manager = ConfigManager::new(
//! 	Arc::new(StaticFetcher::new(document)),
//! 	Arc::new(MemoryStorage::new()),
//! );
//!
//! let outcome = manager.read().await;
//! if let Some(snapshot) = outcome.snapshot {
//! 	println!("serving version {}", snapshot.version());
//! }
//!
//! // An out-of-band hint that a newer version exists.
//! manager.declare_version("1.0.1").await;
//! # }
//! ```

pub mod clock;
pub mod fetcher;
pub mod manager;
pub mod snapshot;
pub mod storage;
pub mod version;

pub use clock::{Clock, SystemClock};
pub use fetcher::{FetchError, Fetcher, StaticFetcher};
pub use manager::{ConfigError, ConfigManager, ConfigManagerBuilder, FreshnessPolicy, ReadOutcome};
pub use snapshot::{ConfigSnapshot, DISABLE_FETCH_KEY, SnapshotError};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use version::Version;

#[cfg(feature = "events")]
pub use manager::ConfigEvent;

#[cfg(feature = "fs")]
pub use storage::FileStorage;
