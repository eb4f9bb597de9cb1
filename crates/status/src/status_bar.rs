//! Host-facing entry point owning every indicator type.

use cellbar_primitives::{Cell, CellHandle};

use crate::controller::StatusBarController;
use crate::host::{ConfigurationChange, ExecutionChangeEvent, StatusCx};
use crate::indicator::{ExecutionStateIndicator, TimerIndicator};
use crate::timer::IndicatorKind;

/// Execution state and timer indicators for the code cells of one view.
///
/// The host forwards its viewer, execution, metadata and configuration
/// events here, and calls [`CellStatusBar::run_due_timers`] whenever the
/// timer queue's next deadline passes.
#[derive(Debug)]
pub struct CellStatusBar {
	execution: StatusBarController<ExecutionStateIndicator>,
	timer: StatusBarController<TimerIndicator>,
}

impl CellStatusBar {
	pub fn attach(cx: &mut StatusCx<'_>) -> Self {
		let execution: StatusBarController<ExecutionStateIndicator> = StatusBarController::attach(
			cx,
			Box::new(|cell: &Cell, cx: &mut StatusCx<'_>| cell.kind.is_code().then(|| ExecutionStateIndicator::new(cell, cx))),
		);
		let timer: StatusBarController<TimerIndicator> = StatusBarController::attach(
			cx,
			Box::new(|cell: &Cell, cx: &mut StatusCx<'_>| cell.kind.is_code().then(|| TimerIndicator::new(cell, cx))),
		);
		tracing::debug!(cells = execution.session_cells().len(), "cell status bar attached");
		Self { execution, timer }
	}

	pub fn on_visible_ranges_changed(&mut self, cx: &mut StatusCx<'_>) {
		self.execution.on_visible_ranges_changed(cx);
		self.timer.on_visible_ranges_changed(cx);
	}

	pub fn on_view_cells_changed(&mut self, cx: &mut StatusCx<'_>) {
		self.execution.on_view_cells_changed(cx);
		self.timer.on_view_cells_changed(cx);
	}

	pub fn on_execution_changed(&mut self, event: &ExecutionChangeEvent, cx: &mut StatusCx<'_>) {
		self.execution.on_execution_changed(event, cx);
		self.timer.on_execution_changed(event, cx);
	}

	pub fn on_metadata_changed(&mut self, handle: CellHandle, cx: &mut StatusCx<'_>) {
		self.execution.on_metadata_changed(handle, cx);
		self.timer.on_metadata_changed(handle, cx);
	}

	pub fn on_configuration_changed(&mut self, change: &ConfigurationChange, cx: &mut StatusCx<'_>) {
		self.execution.on_configuration_changed(change, cx);
		self.timer.on_configuration_changed(change, cx);
	}

	/// Fires every timer due at `cx.now`. Timers scheduled while draining
	/// run in the same pass only if they are already due.
	pub fn run_due_timers(&mut self, cx: &mut StatusCx<'_>) {
		while let Some((id, target)) = cx.timers.pop_due(cx.now) {
			match target.kind.indicator() {
				IndicatorKind::ExecutionState => self.execution.on_timer(id, target, cx),
				IndicatorKind::Timer => self.timer.on_timer(id, target, cx),
			}
		}
	}

	/// Disposes every session of every indicator type.
	pub fn dispose(&mut self, cx: &mut StatusCx<'_>) {
		self.execution.dispose(cx);
		self.timer.dispose(cx);
		tracing::debug!("cell status bar disposed");
	}

	pub fn execution_states(&self) -> &StatusBarController<ExecutionStateIndicator> {
		&self.execution
	}

	pub fn timers(&self) -> &StatusBarController<TimerIndicator> {
		&self.timer
	}
}
