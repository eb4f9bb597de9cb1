//! Collaborator seams implemented by the hosting notebook viewer.
//!
//! The status crate never owns cells, execution state or settings. It reads
//! them through these traits on every recompute and pushes declarative item
//! lists back through [`NotebookView::delta_status_items`].

use cellbar_primitives::{Cell, CellHandle, CellRange, CellStatusItems, CellUri, ExecutionRunState, StatusItemId, Timestamp};

use crate::settings::SettingValue;
use crate::timer::TimerQueue;

/// Notebook view model: cell list, visible ranges and the status item store.
pub trait NotebookView {
	/// Returns false while the view has no notebook attached.
	fn has_model(&self) -> bool;

	fn cell_count(&self) -> usize;

	fn cell_at(&self, index: usize) -> Option<&Cell>;

	fn cell_by_handle(&self, handle: CellHandle) -> Option<&Cell>;

	/// Index ranges currently on screen, end-exclusive.
	fn visible_ranges(&self) -> &[CellRange];

	/// Atomically removes the items named by `previous` and attaches the
	/// given per-cell lists, returning the ids of the newly attached items
	/// in order.
	fn delta_status_items(&mut self, previous: &[StatusItemId], updates: Vec<CellStatusItems>) -> Vec<StatusItemId>;
}

/// Source of per-cell execution run state.
pub trait ExecutionStateProvider {
	/// Returns the active run for the cell, or `None` when it is idle.
	fn cell_execution(&self, uri: &CellUri) -> Option<ExecutionRunState>;
}

/// Execution state transition notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionChangeEvent {
	/// A single cell's run state changed.
	Cell { uri: CellUri },
	/// Notebook-level execution changed; never targets an individual cell.
	Notebook,
}

impl ExecutionChangeEvent {
	pub fn cell(uri: CellUri) -> Self {
		Self::Cell { uri }
	}

	pub fn affects_cell(&self, uri: &CellUri) -> bool {
		matches!(self, Self::Cell { uri: changed } if changed == uri)
	}
}

/// Read access to user settings.
pub trait ConfigurationStore {
	/// Looks up a dotted setting key such as `notebook.cellExecutionTimeVerbosity`.
	fn value(&self, key: &str) -> Option<SettingValue>;
}

/// Notification that one or more settings changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationChange {
	keys: Vec<String>,
}

impl ConfigurationChange {
	pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	/// Returns true when `key`, one of its parent sections, or one of its
	/// children changed.
	pub fn affects(&self, key: &str) -> bool {
		self.keys.iter().any(|changed| section_contains(changed, key) || section_contains(key, changed))
	}
}

fn section_contains(section: &str, key: &str) -> bool {
	key == section || key.strip_prefix(section).is_some_and(|rest| rest.starts_with('.'))
}

/// Display metadata for an output renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererInfo {
	pub display_name: String,
	pub extension_id: String,
}

/// Lookup of output renderers, used only for diagnostic tooltip text.
pub trait RendererRegistry {
	fn renderer_info(&self, id: &str) -> Option<RendererInfo>;
}

/// Everything an indicator needs while handling one event.
///
/// Built by the host per call; `now` is the single clock reading used for
/// the whole event so that every decision in it agrees on the time.
pub struct StatusCx<'a> {
	pub view: &'a mut dyn NotebookView,
	pub executions: &'a dyn ExecutionStateProvider,
	pub config: &'a dyn ConfigurationStore,
	pub renderers: &'a dyn RendererRegistry,
	pub timers: &'a mut TimerQueue,
	pub now: Timestamp,
}
