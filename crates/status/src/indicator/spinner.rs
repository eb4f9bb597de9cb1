use std::time::Duration;

use cellbar_primitives::{CellHandle, Timestamp};

use crate::timer::{TimerId, TimerKind, TimerQueue, TimerTarget};

/// Minimum time the executing spinner stays on screen once shown.
pub const MIN_SPINNER_TIME: Duration = Duration::from_millis(500);

/// Holds the executing indicator on screen for at least [`MIN_SPINNER_TIME`].
///
/// Runs that finish faster than a person can see a spinner would otherwise
/// flash it for a frame. While a hold is active the caller must leave the
/// attached items untouched; when the hold timer fires the caller calls
/// [`SpinnerDebounce::hold_elapsed`] and recomputes.
#[derive(Debug)]
pub struct SpinnerDebounce {
	cell: CellHandle,
	min_display: Duration,
	shown_since: Option<Timestamp>,
	hold: Option<TimerId>,
}

impl SpinnerDebounce {
	pub fn new(cell: CellHandle) -> Self {
		Self::with_min_display(cell, MIN_SPINNER_TIME)
	}

	pub fn with_min_display(cell: CellHandle, min_display: Duration) -> Self {
		Self {
			cell,
			min_display,
			shown_since: None,
			hold: None,
		}
	}

	/// Observes the current state and decides whether the caller may update.
	///
	/// Returns false when the spinner was shown less than the minimum time
	/// ago and the state has moved on; a hold timer is scheduled for the
	/// remainder unless one is already pending.
	pub fn admit(&mut self, executing: bool, timers: &mut TimerQueue, now: Timestamp) -> bool {
		match (executing, self.shown_since) {
			(true, None) => {
				self.shown_since = Some(now);
			}
			(false, Some(shown_since)) => {
				let remaining = self.min_display.as_millis() as i64 - now.millis_since(shown_since);
				if remaining > 0 {
					if self.hold.is_none() {
						let delay = Duration::from_millis(remaining as u64);
						self.hold = Some(timers.schedule(now, delay, TimerTarget::new(self.cell, TimerKind::SpinnerHold)));
						tracing::debug!(cell = %self.cell, remaining_ms = remaining, "holding executing spinner");
					}
					return false;
				}
				self.shown_since = None;
			}
			_ => {}
		}
		true
	}

	/// Handles a fired hold timer. Returns true if `id` was this debounce's
	/// pending hold, in which case the caller should recompute.
	pub fn hold_elapsed(&mut self, id: TimerId) -> bool {
		if self.hold != Some(id) {
			return false;
		}
		self.hold = None;
		self.shown_since = None;
		true
	}

	pub fn cancel(&mut self, timers: &mut TimerQueue) {
		if let Some(id) = self.hold.take() {
			timers.cancel(id);
		}
	}

	pub fn is_holding(&self) -> bool {
		self.hold.is_some()
	}

	pub fn shown_since(&self) -> Option<Timestamp> {
		self.shown_since
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(ms: i64) -> Timestamp {
		Timestamp::from_millis(ms)
	}

	#[test]
	fn short_run_is_held_for_remainder() {
		let mut timers = TimerQueue::new();
		let mut spinner = SpinnerDebounce::new(CellHandle(1));

		assert!(spinner.admit(true, &mut timers, at(0)));
		assert_eq!(spinner.shown_since(), Some(at(0)));

		assert!(!spinner.admit(false, &mut timers, at(100)));
		assert!(spinner.is_holding());
		assert_eq!(timers.next_deadline(), Some(at(500)));

		// A second update during the hold does not stack another timer.
		assert!(!spinner.admit(false, &mut timers, at(200)));
		assert_eq!(timers.len(), 1);

		let (id, target) = timers.pop_due(at(500)).unwrap();
		assert_eq!(target.kind, TimerKind::SpinnerHold);
		assert!(spinner.hold_elapsed(id));
		assert_eq!(spinner.shown_since(), None);
		assert!(spinner.admit(false, &mut timers, at(500)));
	}

	#[test]
	fn long_run_clears_immediately() {
		let mut timers = TimerQueue::new();
		let mut spinner = SpinnerDebounce::new(CellHandle(1));

		assert!(spinner.admit(true, &mut timers, at(0)));
		assert!(spinner.admit(false, &mut timers, at(600)));
		assert!(timers.is_empty());
		assert_eq!(spinner.shown_since(), None);
	}

	#[test]
	fn exactly_min_display_is_not_held() {
		let mut timers = TimerQueue::new();
		let mut spinner = SpinnerDebounce::new(CellHandle(1));

		spinner.admit(true, &mut timers, at(0));
		assert!(spinner.admit(false, &mut timers, at(500)));
		assert!(timers.is_empty());
	}

	#[test]
	fn stale_or_canceled_hold_is_ignored() {
		let mut timers = TimerQueue::new();
		let mut spinner = SpinnerDebounce::new(CellHandle(1));

		spinner.admit(true, &mut timers, at(0));
		spinner.admit(false, &mut timers, at(50));
		let (id, _) = timers.pop_due(at(500)).unwrap();
		assert!(spinner.hold_elapsed(id));
		assert!(!spinner.hold_elapsed(id));

		spinner.admit(true, &mut timers, at(600));
		spinner.admit(false, &mut timers, at(650));
		spinner.cancel(&mut timers);
		assert!(timers.is_empty());
		assert!(!spinner.is_holding());
	}
}
