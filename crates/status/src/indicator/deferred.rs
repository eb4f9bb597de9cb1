use std::time::Duration;

use cellbar_primitives::Timestamp;

use crate::timer::{TimerId, TimerQueue, TimerTarget};

/// At most one pending deferred action.
///
/// Deferring while an action is already pending keeps the first deadline.
#[derive(Debug)]
pub struct DeferredUpdate {
	delay: Duration,
	pending: Option<TimerId>,
}

impl DeferredUpdate {
	pub const fn new(delay: Duration) -> Self {
		Self { delay, pending: None }
	}

	/// Schedules the deferred action unless one is already pending.
	/// Returns true if a new timer was scheduled.
	pub fn defer(&mut self, timers: &mut TimerQueue, now: Timestamp, target: TimerTarget) -> bool {
		if self.pending.is_some() {
			return false;
		}
		self.pending = Some(timers.schedule(now, self.delay, target));
		true
	}

	/// Drops the pending action, if any.
	pub fn cancel(&mut self, timers: &mut TimerQueue) {
		if let Some(id) = self.pending.take() {
			timers.cancel(id);
		}
	}

	/// Claims a fired timer. Returns true if `id` is the pending action.
	pub fn take(&mut self, id: TimerId) -> bool {
		if self.pending == Some(id) {
			self.pending = None;
			true
		} else {
			false
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

#[cfg(test)]
mod tests {
	use cellbar_primitives::CellHandle;

	use super::*;
	use crate::timer::TimerKind;

	#[test]
	fn first_deferral_wins() {
		let mut timers = TimerQueue::new();
		let mut deferred = DeferredUpdate::new(Duration::from_millis(200));
		let target = TimerTarget::new(CellHandle(1), TimerKind::TimerGraceClear);

		assert!(deferred.defer(&mut timers, Timestamp::from_millis(0), target));
		assert!(!deferred.defer(&mut timers, Timestamp::from_millis(150), target));
		assert_eq!(timers.next_deadline(), Some(Timestamp::from_millis(200)));

		let (id, _) = timers.pop_due(Timestamp::from_millis(200)).unwrap();
		assert!(deferred.take(id));
		assert!(!deferred.is_pending());
	}

	#[test]
	fn cancel_removes_timer() {
		let mut timers = TimerQueue::new();
		let mut deferred = DeferredUpdate::new(Duration::from_millis(200));
		deferred.defer(&mut timers, Timestamp::EPOCH, TimerTarget::new(CellHandle(1), TimerKind::TimerGraceClear));

		deferred.cancel(&mut timers);
		assert!(!deferred.is_pending());
		assert!(timers.is_empty());
	}
}
