use cellbar_primitives::{Cell, CellExecutionState, CellHandle, CellUri, ExecutionRunState, HIGHEST_PRIORITY, MarkdownString, StatusAlignment, StatusItem, ThemeColor};

use super::spinner::SpinnerDebounce;
use super::{AttachedItems, CellIndicator, icons};
use crate::host::StatusCx;
use crate::timer::{TimerId, TimerKind};

/// Shows the run outcome or progress of a cell as a single icon.
#[derive(Debug)]
pub struct ExecutionStateIndicator {
	cell: CellHandle,
	uri: CellUri,
	items: AttachedItems,
	spinner: SpinnerDebounce,
}

impl ExecutionStateIndicator {
	/// Creates the session and attaches its initial items.
	pub fn new(cell: &Cell, cx: &mut StatusCx<'_>) -> Self {
		let mut indicator = Self {
			cell: cell.handle,
			uri: cell.uri.clone(),
			items: AttachedItems::new(cell.handle),
			spinner: SpinnerDebounce::new(cell.handle),
		};
		indicator.update(cx);
		indicator
	}

	fn update(&mut self, cx: &mut StatusCx<'_>) {
		let Some(cell) = cx.view.cell_by_handle(self.cell) else {
			return;
		};
		let last_run_success = cell.internal_metadata.last_run_success;
		let run = cx.executions.cell_execution(&self.uri);

		let executing = run.is_some_and(|run| run.is_executing());
		if !self.spinner.admit(executing, cx.timers, cx.now) {
			tracing::trace!(cell = %self.cell, "state update suppressed while spinner is held");
			return;
		}

		self.items.replace(cx.view, items_for_state(run, last_run_success));
	}

	/// Ids of the items currently attached by this session.
	pub fn attached_ids(&self) -> &[cellbar_primitives::StatusItemId] {
		self.items.ids()
	}
}

impl CellIndicator for ExecutionStateIndicator {
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

	fn on_timer(&mut self, id: TimerId, kind: TimerKind, cx: &mut StatusCx<'_>) {
		if kind == TimerKind::SpinnerHold && self.spinner.hold_elapsed(id) {
			self.update(cx);
		}
	}

	fn dispose(&mut self, cx: &mut StatusCx<'_>) {
		self.spinner.cancel(cx.timers);
		self.items.clear(cx.view);
	}
}

/// Maps a run state and the last run outcome to the icon items to show.
pub(crate) fn items_for_state(run: Option<ExecutionRunState>, last_run_success: Option<bool>) -> Vec<StatusItem> {
	let item = match (run, last_run_success) {
		(None, Some(true)) => state_item(icons::SUCCESS, "Success").with_color(ThemeColor::from_static(icons::SUCCESS_COLOR)),
		(None, Some(false)) => state_item(icons::ERROR, "Failed").with_color(ThemeColor::from_static(icons::ERROR_COLOR)),
		(None, None) => return Vec::new(),
		(Some(run), _) => match run.state {
			CellExecutionState::Pending | CellExecutionState::Unconfirmed => state_item(icons::PENDING, "Pending"),
			CellExecutionState::Executing => {
				let icon = if run.did_pause { icons::EXECUTING } else { icons::EXECUTING_SPIN };
				state_item(icon, "Executing").with_color(ThemeColor::from_static(icons::RUNNING_COLOR))
			}
		},
	};
	vec![item]
}

fn state_item(icon: &str, tooltip: &str) -> StatusItem {
	StatusItem::new(icons::label(icon), StatusAlignment::Left, HIGHEST_PRIORITY).with_tooltip(MarkdownString::plain(tooltip))
}
