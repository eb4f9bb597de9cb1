//! Keeps one indicator session per visible cell.

use cellbar_primitives::{Cell, CellHandle};
use rustc_hash::FxHashMap;

use crate::host::{ConfigurationChange, ExecutionChangeEvent, StatusCx};
use crate::indicator::CellIndicator;
use crate::timer::{TimerId, TimerTarget};
use crate::visible::{VisibleCellTracker, VisibleCellsDelta};

/// Builds a session for a newly visible cell, or `None` when the cell gets
/// no indicator of this type.
pub type IndicatorFactory<I> = Box<dyn FnMut(&Cell, &mut StatusCx<'_>) -> Option<I>>;

/// Creates and disposes sessions of one indicator type in lockstep with
/// the visible cell set.
pub struct StatusBarController<I> {
	tracker: VisibleCellTracker,
	sessions: FxHashMap<CellHandle, I>,
	factory: IndicatorFactory<I>,
}

impl<I: CellIndicator> StatusBarController<I> {
	/// Starts tracking the view and builds sessions for every cell already
	/// on screen.
	pub fn attach(cx: &mut StatusCx<'_>, factory: IndicatorFactory<I>) -> Self {
		let mut controller = Self {
			tracker: VisibleCellTracker::default(),
			sessions: FxHashMap::default(),
			factory,
		};
		let delta = controller.tracker.update(cx.view);
		controller.apply(delta, cx);
		controller
	}

	/// The view scrolled or resized.
	pub fn on_visible_ranges_changed(&mut self, cx: &mut StatusCx<'_>) {
		let delta = self.tracker.update(cx.view);
		self.apply(delta, cx);
	}

	/// The view's model was swapped or its cell list was spliced.
	pub fn on_view_cells_changed(&mut self, cx: &mut StatusCx<'_>) {
		let delta = self.tracker.reset(cx.view);
		self.apply(delta, cx);
	}

	pub fn on_execution_changed(&mut self, event: &ExecutionChangeEvent, cx: &mut StatusCx<'_>) {
		for handle in self.tracker.visible_cells() {
			if let Some(session) = self.sessions.get_mut(handle)
				&& event.affects_cell(session.uri())
			{
				session.on_execution_changed(cx);
			}
		}
	}

	pub fn on_metadata_changed(&mut self, handle: CellHandle, cx: &mut StatusCx<'_>) {
		if let Some(session) = self.sessions.get_mut(&handle) {
			session.on_metadata_changed(cx);
		}
	}

	pub fn on_configuration_changed(&mut self, change: &ConfigurationChange, cx: &mut StatusCx<'_>) {
		for handle in self.tracker.visible_cells() {
			if let Some(session) = self.sessions.get_mut(handle) {
				session.on_configuration_changed(change, cx);
			}
		}
	}

	/// Delivers a fired timer to the session that owns it.
	pub fn on_timer(&mut self, id: TimerId, target: TimerTarget, cx: &mut StatusCx<'_>) {
		match self.sessions.get_mut(&target.cell) {
			Some(session) => session.on_timer(id, target.kind, cx),
			None => tracing::trace!(?id, cell = %target.cell, "timer for cell without session"),
		}
	}

	/// Disposes every session. The controller keeps tracking and can pick
	/// up again on the next visibility change.
	pub fn dispose(&mut self, cx: &mut StatusCx<'_>) {
		let removed = std::mem::take(&mut self.tracker);
		for handle in removed.visible_cells() {
			self.dispose_session(*handle, cx);
		}
		for (handle, mut session) in self.sessions.drain() {
			tracing::debug!(cell = %handle, "disposing untracked session");
			session.dispose(cx);
		}
	}

	pub fn has_session(&self, handle: CellHandle) -> bool {
		self.sessions.contains_key(&handle)
	}

	pub fn session(&self, handle: CellHandle) -> Option<&I> {
		self.sessions.get(&handle)
	}

	/// Cells with a live session, in view order.
	pub fn session_cells(&self) -> Vec<CellHandle> {
		self.tracker.visible_cells().iter().copied().filter(|handle| self.sessions.contains_key(handle)).collect()
	}

	pub fn visible_cells(&self) -> &[CellHandle] {
		self.tracker.visible_cells()
	}

	fn apply(&mut self, delta: VisibleCellsDelta, cx: &mut StatusCx<'_>) {
		if delta.is_empty() {
			return;
		}
		tracing::debug!(added = delta.added.len(), removed = delta.removed.len(), "visible cells changed");

		for handle in delta.removed {
			self.dispose_session(handle, cx);
		}

		for handle in delta.added {
			self.dispose_session(handle, cx);
			let Some(cell) = cx.view.cell_by_handle(handle).cloned() else {
				continue;
			};
			if let Some(session) = (self.factory)(&cell, cx) {
				tracing::debug!(cell = %handle, "session created");
				self.sessions.insert(handle, session);
			}
		}
	}

	fn dispose_session(&mut self, handle: CellHandle, cx: &mut StatusCx<'_>) {
		if let Some(mut session) = self.sessions.remove(&handle) {
			tracing::debug!(cell = %handle, "session disposed");
			session.dispose(cx);
		}
	}
}

impl<I> std::fmt::Debug for StatusBarController<I> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StatusBarController")
			.field("tracker", &self.tracker)
			.field("sessions", &self.sessions.len())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
