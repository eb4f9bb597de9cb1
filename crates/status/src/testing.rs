//! In-memory collaborators for exercising indicators without a real viewer.

use std::collections::BTreeMap;
use std::time::Duration;

use cellbar_primitives::{Cell, CellHandle, CellInternalMetadata, CellRange, CellStatusItems, CellUri, ExecutionRunState, StatusItem, StatusItemId, Timestamp};
use rustc_hash::FxHashMap;

use crate::host::{ExecutionChangeEvent, ExecutionStateProvider, NotebookView, RendererInfo, RendererRegistry, StatusCx};
use crate::settings::SettingsStore;
use crate::status_bar::CellStatusBar;
use crate::timer::TimerQueue;

/// One call to [`NotebookView::delta_status_items`] as seen by the fake view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPush {
	pub at: Timestamp,
	pub removed: Vec<StatusItemId>,
	pub updates: Vec<CellStatusItems>,
}

/// Notebook view holding cells, visible ranges and attached status items.
#[derive(Debug)]
pub struct FakeNotebook {
	cells: Vec<Cell>,
	visible: Vec<CellRange>,
	has_model: bool,
	next_item: u64,
	attached: BTreeMap<StatusItemId, (CellHandle, StatusItem)>,
	pushes: Vec<RecordedPush>,
	clock: Timestamp,
}

impl Default for FakeNotebook {
	fn default() -> Self {
		Self {
			cells: Vec::new(),
			visible: Vec::new(),
			has_model: true,
			next_item: 0,
			attached: BTreeMap::new(),
			pushes: Vec::new(),
			clock: Timestamp::EPOCH,
		}
	}
}

impl FakeNotebook {
	/// Creates a notebook of `count` code cells with handles `0..count`, all visible.
	pub fn with_code_cells(count: u64) -> Self {
		let mut notebook = Self::default();
		for handle in 0..count {
			notebook.push_cell(Cell::code(CellHandle(handle), format!("nb#{handle}")));
		}
		notebook.set_visible(&[CellRange::new(0, count.saturating_sub(1) as usize)]);
		notebook
	}

	pub fn push_cell(&mut self, cell: Cell) {
		self.cells.push(cell);
	}

	/// Removes a cell from the list; its attached items are left for the
	/// controller to clear.
	pub fn remove_cell(&mut self, handle: CellHandle) {
		self.cells.retain(|cell| cell.handle != handle);
	}

	/// Sets the end-exclusive visible ranges. The tracker also counts the
	/// cell just past each range's end, so `0..2` shows cells 0, 1 and 2.
	pub fn set_visible(&mut self, ranges: &[CellRange]) {
		self.visible = ranges.to_vec();
	}

	pub fn set_has_model(&mut self, has_model: bool) {
		self.has_model = has_model;
	}

	pub fn metadata_mut(&mut self, handle: CellHandle) -> &mut CellInternalMetadata {
		&mut self
			.cells
			.iter_mut()
			.find(|cell| cell.handle == handle)
			.unwrap_or_else(|| panic!("no cell {handle}"))
			.internal_metadata
	}

	pub fn uri(&self, handle: CellHandle) -> CellUri {
		self.cell_by_handle(handle).map(|cell| cell.uri.clone()).unwrap_or_else(|| panic!("no cell {handle}"))
	}

	/// Items currently attached to `handle`, highest priority first.
	pub fn items(&self, handle: CellHandle) -> Vec<StatusItem> {
		let mut items: Vec<_> = self.attached.values().filter(|(cell, _)| *cell == handle).map(|(_, item)| item.clone()).collect();
		items.sort_by(|a, b| b.priority.cmp(&a.priority));
		items
	}

	/// Item texts currently attached to `handle`, highest priority first.
	pub fn texts(&self, handle: CellHandle) -> Vec<String> {
		self.items(handle).into_iter().map(|item| item.text).collect()
	}

	pub fn attached_count(&self) -> usize {
		self.attached.len()
	}

	pub fn pushes(&self) -> &[RecordedPush] {
		&self.pushes
	}

	/// Item lists pushed for `handle`, oldest first.
	pub fn pushes_for(&self, handle: CellHandle) -> Vec<Vec<StatusItem>> {
		self.pushes
			.iter()
			.flat_map(|push| push.updates.iter())
			.filter(|update| update.handle == handle)
			.map(|update| update.items.clone())
			.collect()
	}

	pub fn clear_pushes(&mut self) {
		self.pushes.clear();
	}
}

impl NotebookView for FakeNotebook {
	fn has_model(&self) -> bool {
		self.has_model
	}

	fn cell_count(&self) -> usize {
		self.cells.len()
	}

	fn cell_at(&self, index: usize) -> Option<&Cell> {
		self.cells.get(index)
	}

	fn cell_by_handle(&self, handle: CellHandle) -> Option<&Cell> {
		self.cells.iter().find(|cell| cell.handle == handle)
	}

	fn visible_ranges(&self) -> &[CellRange] {
		&self.visible
	}

	fn delta_status_items(&mut self, previous: &[StatusItemId], updates: Vec<CellStatusItems>) -> Vec<StatusItemId> {
		for id in previous {
			self.attached.remove(id);
		}
		let mut ids = Vec::new();
		for update in &updates {
			for item in &update.items {
				self.next_item += 1;
				let id = StatusItemId(self.next_item);
				self.attached.insert(id, (update.handle, item.clone()));
				ids.push(id);
			}
		}
		self.pushes.push(RecordedPush {
			at: self.clock,
			removed: previous.to_vec(),
			updates,
		});
		ids
	}
}

/// Execution provider backed by a map.
#[derive(Debug, Default)]
pub struct FakeExecutions {
	runs: FxHashMap<CellUri, ExecutionRunState>,
}

impl FakeExecutions {
	/// Sets or clears a run and returns the matching change event.
	pub fn set(&mut self, uri: &CellUri, run: Option<ExecutionRunState>) -> ExecutionChangeEvent {
		match run {
			Some(run) => {
				self.runs.insert(uri.clone(), run);
			}
			None => {
				self.runs.remove(uri);
			}
		}
		ExecutionChangeEvent::cell(uri.clone())
	}
}

impl ExecutionStateProvider for FakeExecutions {
	fn cell_execution(&self, uri: &CellUri) -> Option<ExecutionRunState> {
		self.runs.get(uri).copied()
	}
}

/// Renderer registry backed by a map.
#[derive(Debug, Default)]
pub struct FakeRenderers {
	renderers: FxHashMap<String, RendererInfo>,
}

impl FakeRenderers {
	pub fn insert(&mut self, id: &str, display_name: &str, extension_id: &str) {
		self.renderers.insert(
			id.to_string(),
			RendererInfo {
				display_name: display_name.to_string(),
				extension_id: extension_id.to_string(),
			},
		);
	}
}

impl RendererRegistry for FakeRenderers {
	fn renderer_info(&self, id: &str) -> Option<RendererInfo> {
		self.renderers.get(id).cloned()
	}
}

/// Bundles every collaborator plus a pinned clock.
#[derive(Debug)]
pub struct Harness {
	pub view: FakeNotebook,
	pub executions: FakeExecutions,
	pub settings: SettingsStore,
	pub renderers: FakeRenderers,
	pub timers: TimerQueue,
	pub now: Timestamp,
}

impl Harness {
	pub fn new(view: FakeNotebook) -> Self {
		Self {
			view,
			executions: FakeExecutions::default(),
			settings: SettingsStore::new(),
			renderers: FakeRenderers::default(),
			timers: TimerQueue::new(),
			now: Timestamp::EPOCH,
		}
	}

	/// Runs `f` with a context built from the harness at the current time.
	pub fn with_cx<R>(&mut self, f: impl FnOnce(&mut StatusCx<'_>) -> R) -> R {
		self.view.clock = self.now;
		let mut cx = StatusCx {
			view: &mut self.view,
			executions: &self.executions,
			config: &self.settings,
			renderers: &self.renderers,
			timers: &mut self.timers,
			now: self.now,
		};
		f(&mut cx)
	}

	/// Moves the clock forward to `target`, stopping at every timer deadline
	/// on the way and calling `on_due` there.
	pub fn advance_to(&mut self, target: Timestamp, mut on_due: impl FnMut(&mut StatusCx<'_>)) {
		while let Some(deadline) = self.timers.next_deadline()
			&& deadline <= target
		{
			self.now = self.now.max(deadline);
			self.with_cx(&mut on_due);
		}
		self.now = self.now.max(target);
	}

	/// Advances the clock by `by`, firing due timers on `bar`.
	pub fn advance(&mut self, bar: &mut CellStatusBar, by: Duration) {
		let target = self.now + by;
		self.advance_to(target, |cx| bar.run_due_timers(cx));
	}

	pub fn at(&self, ms: i64) -> Timestamp {
		Timestamp::from_millis(ms)
	}
}
