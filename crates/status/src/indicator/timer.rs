use std::time::Duration;

use cellbar_primitives::{Cell, CellHandle, CellInternalMetadata, CellUri, ExecutionRunState, HIGHEST_PRIORITY, StatusAlignment, StatusItem, Timestamp, format_cell_duration};

use super::deferred::DeferredUpdate;
use super::tooltip::{RunTimings, render_tooltip};
use super::{AttachedItems, CellIndicator};
use crate::host::{ConfigurationChange, StatusCx};
use crate::settings::{TIMER_VERBOSITY_KEY, TimerVerbosity};
use crate::timer::{TimerId, TimerKind, TimerTarget};

/// How often a running cell's elapsed time label is refreshed.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// How long an elapsed time label survives after its run state reports
/// nothing to show, so a brief state gap does not blank and redraw it.
pub const UPDATE_TIMER_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Sorts right after the execution state icon.
const TIMER_PRIORITY: i64 = HIGHEST_PRIORITY - 5;

/// Shows how long a cell has been running, or how long its last run took.
#[derive(Debug)]
pub struct TimerIndicator {
	cell: CellHandle,
	uri: CellUri,
	items: AttachedItems,
	refresh: Option<TimerId>,
	grace: DeferredUpdate,
	verbosity: TimerVerbosity,
}

impl TimerIndicator {
	/// Creates the session, reads the verbosity setting and attaches the
	/// initial items.
	pub fn new(cell: &Cell, cx: &mut StatusCx<'_>) -> Self {
		let mut indicator = Self {
			cell: cell.handle,
			uri: cell.uri.clone(),
			items: AttachedItems::new(cell.handle),
			refresh: None,
			grace: DeferredUpdate::new(UPDATE_TIMER_GRACE_PERIOD),
			verbosity: TimerVerbosity::read(cx.config),
		};
		indicator.update(cx);
		indicator
	}

	pub fn verbosity(&self) -> TimerVerbosity {
		self.verbosity
	}

	fn update(&mut self, cx: &mut StatusCx<'_>) {
		let Some(cell) = cx.view.cell_by_handle(self.cell) else {
			return;
		};
		let metadata = cell.internal_metadata.clone();
		let run = cx.executions.cell_execution(&self.uri);
		let items = self.compute(&metadata, run, cx);

		if items.is_empty() && run.is_some() {
			if self.grace.defer(cx.timers, cx.now, TimerTarget::new(self.cell, TimerKind::TimerGraceClear)) {
				tracing::trace!(cell = %self.cell, "timer clear deferred");
			}
		} else {
			self.grace.cancel(cx.timers);
			self.items.replace(cx.view, items);
		}
	}

	fn compute(&mut self, metadata: &CellInternalMetadata, run: Option<ExecutionRunState>, cx: &mut StatusCx<'_>) -> Vec<StatusItem> {
		let adjustment = metadata.start_adjustment();
		match (run, metadata.run_start_time, metadata.run_end_time) {
			(Some(run), _, _) if run.did_pause => Vec::new(),
			(Some(run), Some(start), _) if run.is_executing() => {
				let elapsed = elapsed_ms(start, cx.now, adjustment);
				self.schedule_refresh(cx);
				vec![self.time_item(cx.now, elapsed)]
			}
			(None, Some(start), Some(end)) => {
				let execution_ms = elapsed_ms(start, end, 0);
				let tooltip = render_tooltip(
					RunTimings {
						last_execution: end,
						execution_ms,
						timer_ms: elapsed_ms(start, cx.now, adjustment),
						render_durations: &metadata.render_duration,
					},
					cx.renderers,
				);
				vec![self.time_item(end, execution_ms).with_tooltip(tooltip)]
			}
			_ => Vec::new(),
		}
	}

	fn time_item(&self, last_execution: Timestamp, duration_ms: u64) -> StatusItem {
		let duration = format_cell_duration(duration_ms, false);
		let text = if self.verbosity.is_verbose() {
			format!("Last Execution: {}, Duration: {duration}", last_execution.to_local_string())
		} else {
			duration
		};
		StatusItem::new(text, StatusAlignment::Left, TIMER_PRIORITY)
	}

	/// Replaces any pending refresh with one [`UPDATE_INTERVAL`] from now.
	fn schedule_refresh(&mut self, cx: &mut StatusCx<'_>) {
		if let Some(id) = self.refresh.take() {
			cx.timers.cancel(id);
		}
		self.refresh = Some(cx.timers.schedule(cx.now, UPDATE_INTERVAL, TimerTarget::new(self.cell, TimerKind::TimerRefresh)));
	}
}

impl CellIndicator for TimerIndicator {
	fn cell(&self) -> CellHandle {
		self.cell
	}

	fn uri(&self) -> &CellUri {
		&self.uri
	}

	fn on_execution_changed(&mut self, cx: &mut StatusCx<'_>) {
		self.update(cx);
	}

	fn on_metadata_changed(&mut self, cx: &mut StatusCx<'_>) {
		self.update(cx);
	}

	fn on_configuration_changed(&mut self, change: &ConfigurationChange, cx: &mut StatusCx<'_>) {
		if !change.affects(TIMER_VERBOSITY_KEY) {
			return;
		}
		self.verbosity = TimerVerbosity::read(cx.config);
		tracing::debug!(cell = %self.cell, verbosity = ?self.verbosity, "timer verbosity changed");
		self.update(cx);
	}

	fn on_timer(&mut self, id: TimerId, kind: TimerKind, cx: &mut StatusCx<'_>) {
		match kind {
			TimerKind::TimerRefresh if self.refresh == Some(id) => {
				self.refresh = None;
				self.update(cx);
			}
			TimerKind::TimerGraceClear if self.grace.take(id) => {
				tracing::trace!(cell = %self.cell, "grace period elapsed");
				self.items.clear(cx.view);
			}
			_ => {}
		}
	}

	fn dispose(&mut self, cx: &mut StatusCx<'_>) {
		self.grace.cancel(cx.timers);
		if let Some(id) = self.refresh.take() {
			cx.timers.cancel(id);
		}
		self.items.clear(cx.view);
	}
}

fn elapsed_ms(start: Timestamp, end: Timestamp, adjustment: i64) -> u64 {
	end.millis_since(start).saturating_add(adjustment).max(0) as u64
}
