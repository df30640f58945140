/* src/manager/event.rs */

use std::sync::Arc;

use crate::snapshot::ConfigSnapshot;

/// Events emitted by the manager when the served configuration changes.
#[derive(Debug, Clone)]
pub enum ConfigEvent {
	/// A document with a different version than previously known is now
	/// served. Emitted only after the new snapshot has been persisted, so
	/// subscribers reloading through storage observe it immediately.
	Updated {
		snapshot: Arc<ConfigSnapshot>,
		previous_version: Option<String>,
	},
}
