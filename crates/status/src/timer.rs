//! Cancelable single-shot timers for indicator sessions.
//!
//! Indicators never hold callbacks. They schedule a [`TimerTarget`] payload
//! naming the cell and the purpose of the timer; the host drains due timers
//! with [`TimerQueue::pop_due`] and routes each one back to the owning
//! session. Canceling removes the entry, so a disposed session can never
//! observe a late fire.

use std::collections::BTreeSet;
use std::time::Duration;

use cellbar_primitives::{CellHandle, Timestamp};
use rustc_hash::FxHashMap;

/// Identity of one scheduled timer. Ids are monotonic and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Indicator type a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
	ExecutionState,
	Timer,
}

/// Purpose of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
	/// End of the minimum on-screen time for the executing spinner.
	SpinnerHold,
	/// Periodic refresh of a live elapsed-time label.
	TimerRefresh,
	/// End of the grace period before an elapsed-time label is cleared.
	TimerGraceClear,
}

impl TimerKind {
	pub const fn indicator(self) -> IndicatorKind {
		match self {
			Self::SpinnerHold => IndicatorKind::ExecutionState,
			Self::TimerRefresh | Self::TimerGraceClear => IndicatorKind::Timer,
		}
	}
}

/// Payload delivered when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTarget {
	pub cell: CellHandle,
	pub kind: TimerKind,
}

impl TimerTarget {
	pub const fn new(cell: CellHandle, kind: TimerKind) -> Self {
		Self { cell, kind }
	}
}

#[derive(Debug, Clone, Copy)]
struct Entry {
	deadline: Timestamp,
	target: TimerTarget,
}

/// Deadline-ordered set of pending timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
	next_id: u64,
	entries: FxHashMap<TimerId, Entry>,
	by_deadline: BTreeSet<(Timestamp, TimerId)>,
}

impl TimerQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules `target` to fire `delay` after `now`.
	pub fn schedule(&mut self, now: Timestamp, delay: Duration, target: TimerTarget) -> TimerId {
		self.next_id = self.next_id.wrapping_add(1);
		let id = TimerId(self.next_id);
		let deadline = now + delay;
		self.entries.insert(id, Entry { deadline, target });
		self.by_deadline.insert((deadline, id));
		tracing::trace!(?id, cell = %target.cell, kind = ?target.kind, deadline = deadline.as_millis(), "timer scheduled");
		id
	}

	/// Cancels a pending timer. Returns false if it already fired or was canceled.
	pub fn cancel(&mut self, id: TimerId) -> bool {
		let Some(entry) = self.entries.remove(&id) else {
			return false;
		};
		self.by_deadline.remove(&(entry.deadline, id));
		tracing::trace!(?id, cell = %entry.target.cell, kind = ?entry.target.kind, "timer canceled");
		true
	}

	pub fn is_pending(&self, id: TimerId) -> bool {
		self.entries.contains_key(&id)
	}

	/// Earliest pending deadline.
	pub fn next_deadline(&self) -> Option<Timestamp> {
		self.by_deadline.first().map(|(deadline, _)| *deadline)
	}

	/// Removes and returns the earliest timer whose deadline is at or before
	/// `now`. Timers sharing a deadline fire in scheduling order.
	pub fn pop_due(&mut self, now: Timestamp) -> Option<(TimerId, TimerTarget)> {
		let &(deadline, id) = self.by_deadline.first()?;
		if deadline > now {
			return None;
		}
		self.by_deadline.pop_first();
		let entry = self.entries.remove(&id)?;
		Some((id, entry.target))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of pending timers for `cell`.
	pub fn pending_for(&self, cell: CellHandle) -> usize {
		self.entries.values().filter(|entry| entry.target.cell == cell).count()
	}
}

#[cfg(test)]
mod tests;
