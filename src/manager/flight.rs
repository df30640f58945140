/* src/manager/flight.rs */

use tokio::sync::broadcast;

use super::ReadOutcome;

/// A single in-flight fetch with its joined waiters.
///
/// The manager creates a `Flight` under its state lock before issuing a
/// fetch; callers arriving while it exists join via [`Flight::join`] and
/// all observe the identical outcome once the initiator settles it.
/// Exactly one message is ever sent, so the channel capacity of one can
/// never drop a result.
pub(crate) struct Flight {
	tx: broadcast::Sender<ReadOutcome>,
}

impl Flight {
	pub fn new() -> Self {
		let (tx, _) = broadcast::channel(1);
		Self { tx }
	}

	/// Registers a waiter for the outcome of this flight.
	pub fn join(&self) -> broadcast::Receiver<ReadOutcome> {
		self.tx.subscribe()
	}

	/// Delivers `outcome` to every joined waiter. Consumes the flight; a
	/// flight settles at most once.
	pub fn settle(self, outcome: &ReadOutcome) {
		// Waiters may have gone away; an empty send is not an error.
		let _ = self.tx.send(outcome.clone());
	}
}
