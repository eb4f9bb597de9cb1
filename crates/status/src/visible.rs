//! Visible cell tracking.
//!
//! [`VisibleCellTracker`] turns the view's visible index ranges into a set
//! of cell handles and reports what entered and left that set. It knows
//! nothing about execution state.

use cellbar_primitives::CellHandle;
use rustc_hash::FxHashSet;

use crate::host::NotebookView;

/// Cells that entered and left the visible set, in view order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleCellsDelta {
	pub added: Vec<CellHandle>,
	pub removed: Vec<CellHandle>,
}

impl VisibleCellsDelta {
	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.removed.is_empty()
	}
}

/// Tracks which cells are currently on screen.
#[derive(Debug, Default)]
pub struct VisibleCellTracker {
	visible: Vec<CellHandle>,
}

impl VisibleCellTracker {
	/// Creates a tracker seeded with the view's current visible cells.
	pub fn new(view: &dyn NotebookView) -> Self {
		let mut tracker = Self::default();
		tracker.update(view);
		tracker
	}

	/// Currently visible cells, in view order.
	pub fn visible_cells(&self) -> &[CellHandle] {
		&self.visible
	}

	pub fn is_visible(&self, handle: CellHandle) -> bool {
		self.visible.contains(&handle)
	}

	/// Recomputes the visible set after a scroll or resize.
	///
	/// Without a model the previous set is kept and nothing is reported.
	pub fn update(&mut self, view: &dyn NotebookView) -> VisibleCellsDelta {
		if !view.has_model() {
			return VisibleCellsDelta::default();
		}

		let next = visible_handles(view);
		let next_set: FxHashSet<_> = next.iter().copied().collect();
		let prev_set: FxHashSet<_> = self.visible.iter().copied().collect();

		let added = next.iter().copied().filter(|handle| !prev_set.contains(handle)).collect();
		let removed = self.visible.iter().copied().filter(|handle| !next_set.contains(handle)).collect();
		self.visible = next;

		VisibleCellsDelta { added, removed }
	}

	/// Reports every tracked cell as removed, then recomputes from scratch.
	///
	/// Used when the model is swapped or its cell list changes, since handles
	/// from the old list may no longer resolve.
	pub fn reset(&mut self, view: &dyn NotebookView) -> VisibleCellsDelta {
		let removed = std::mem::take(&mut self.visible);
		let VisibleCellsDelta { added, .. } = self.update(view);
		VisibleCellsDelta { added, removed }
	}
}

/// Resolves visible ranges to cell handles.
///
/// Each range's end is widened by one so a partially visible trailing cell
/// counts as visible. Overlapping ranges and indices past the end of the
/// cell list are tolerated.
fn visible_handles(view: &dyn NotebookView) -> Vec<CellHandle> {
	let mut seen = FxHashSet::default();
	let mut handles = Vec::new();
	for range in view.visible_ranges() {
		for index in range.extend_end(1).indices() {
			if let Some(cell) = view.cell_at(index)
				&& seen.insert(cell.handle)
			{
				handles.push(cell.handle);
			}
		}
	}
	handles
}
