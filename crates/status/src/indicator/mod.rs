//! Per-cell status indicators.
//!
//! - [`ExecutionStateIndicator`] - success/error/pending/executing icon
//! - [`TimerIndicator`] - live and final execution duration
//!
//! Each indicator instance is one session for one visible cell. It owns the
//! ids of the items it attached and the ids of the timers it scheduled, and
//! must be [disposed](CellIndicator::dispose) before being dropped.

mod deferred;
mod execution_state;
mod spinner;
mod timer;
mod tooltip;

use cellbar_primitives::{CellHandle, CellStatusItems, CellUri, StatusItem, StatusItemId};
pub use deferred::DeferredUpdate;
pub use execution_state::ExecutionStateIndicator;
pub use spinner::{MIN_SPINNER_TIME, SpinnerDebounce};
pub use timer::{TimerIndicator, UPDATE_INTERVAL, UPDATE_TIMER_GRACE_PERIOD};

use crate::host::{ConfigurationChange, NotebookView, StatusCx};
use crate::timer::{TimerId, TimerKind};

/// Icon and theme color identifiers used by the indicators.
pub mod icons {
	pub const SUCCESS: &str = "notebook-state-success";
	pub const ERROR: &str = "notebook-state-error";
	pub const PENDING: &str = "notebook-state-pending";
	pub const EXECUTING: &str = "notebook-state-executing";
	/// Animated variant of [`EXECUTING`].
	pub const EXECUTING_SPIN: &str = "notebook-state-executing~spin";

	pub const SUCCESS_COLOR: &str = "notebookStatusSuccessIcon.foreground";
	pub const ERROR_COLOR: &str = "notebookStatusErrorIcon.foreground";
	pub const RUNNING_COLOR: &str = "notebookStatusRunningIcon.foreground";

	/// Renders an icon reference as status item text.
	pub fn label(icon: &str) -> String {
		format!("$({icon})")
	}
}

/// Lifecycle of one indicator session for one cell.
pub trait CellIndicator {
	fn cell(&self) -> CellHandle;

	fn uri(&self) -> &CellUri;

	/// The cell's execution run state changed.
	fn on_execution_changed(&mut self, cx: &mut StatusCx<'_>);

	/// The cell's internal metadata changed.
	fn on_metadata_changed(&mut self, cx: &mut StatusCx<'_>);

	/// Settings changed; indicators filter for the keys they read.
	fn on_configuration_changed(&mut self, _change: &ConfigurationChange, _cx: &mut StatusCx<'_>) {}

	/// A timer this session scheduled fired. Ids the session no longer
	/// tracks are ignored.
	fn on_timer(&mut self, id: TimerId, kind: TimerKind, cx: &mut StatusCx<'_>);

	/// Cancels pending timers, then clears the cell's items.
	fn dispose(&mut self, cx: &mut StatusCx<'_>);
}

/// Ids of the items one session currently has attached to its cell.
#[derive(Debug)]
pub(crate) struct AttachedItems {
	cell: CellHandle,
	ids: Vec<StatusItemId>,
}

impl AttachedItems {
	pub(crate) fn new(cell: CellHandle) -> Self {
		Self { cell, ids: Vec::new() }
	}

	/// Replaces this session's items with `items`.
	pub(crate) fn replace(&mut self, view: &mut dyn NotebookView, items: Vec<StatusItem>) {
		let previous = std::mem::take(&mut self.ids);
		tracing::trace!(cell = %self.cell, removed = previous.len(), added = items.len(), "status items replaced");
		self.ids = view.delta_status_items(&previous, vec![CellStatusItems { handle: self.cell, items }]);
	}

	pub(crate) fn clear(&mut self, view: &mut dyn NotebookView) {
		self.replace(view, Vec::new());
	}

	pub(crate) fn ids(&self) -> &[StatusItemId] {
		&self.ids
	}
}
