use std::collections::BTreeSet;

use cellbar_primitives::{CellExecutionState, CellRange, ExecutionRunState, Timestamp};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::host::NotebookView;
use crate::indicator::ExecutionStateIndicator;
use crate::testing::{FakeNotebook, Harness};
use crate::timer::TimerKind;

const ERROR: &str = "$(notebook-state-error)";

fn code_only() -> IndicatorFactory<ExecutionStateIndicator> {
	Box::new(|cell: &Cell, cx: &mut StatusCx<'_>| cell.kind.is_code().then(|| ExecutionStateIndicator::new(cell, cx)))
}

/// Every cell's last run failed, so each session attaches exactly one item.
fn failed_cells(count: u64) -> FakeNotebook {
	let mut view = FakeNotebook::with_code_cells(count);
	for handle in 0..count {
		view.metadata_mut(CellHandle(handle)).last_run_success = Some(false);
	}
	view
}

fn handles(raw: &[u64]) -> Vec<CellHandle> {
	raw.iter().copied().map(CellHandle).collect()
}

fn attach(h: &mut Harness) -> StatusBarController<ExecutionStateIndicator> {
	h.with_cx(|cx| StatusBarController::attach(cx, code_only()))
}

#[test]
fn attach_builds_sessions_for_visible_cells() {
	let mut view = failed_cells(10);
	view.set_visible(&[CellRange::new(0, 2)]);
	let mut h = Harness::new(view);

	let controller = attach(&mut h);

	assert_eq!(controller.session_cells(), handles(&[0, 1, 2]));
	assert_eq!(h.view.attached_count(), 3);
	assert_eq!(h.view.texts(CellHandle(2)), vec![ERROR]);
	assert!(h.view.items(CellHandle(3)).is_empty());
}

#[test]
fn scrolling_disposes_before_creating() {
	let mut view = failed_cells(10);
	view.set_visible(&[CellRange::new(0, 2)]);
	let mut h = Harness::new(view);
	let mut controller = attach(&mut h);

	h.view.clear_pushes();
	h.view.set_visible(&[CellRange::new(2, 4)]);
	h.with_cx(|cx| controller.on_visible_ranges_changed(cx));

	assert_eq!(controller.session_cells(), handles(&[2, 3, 4]));
	let pushes = h.view.pushes();
	assert_eq!(pushes.len(), 4);
	let order: Vec<_> = pushes.iter().map(|push| (push.updates[0].handle, push.updates[0].items.len())).collect();
	assert_eq!(order, vec![(CellHandle(0), 0), (CellHandle(1), 0), (CellHandle(3), 1), (CellHandle(4), 1)]);
	assert_eq!(h.view.attached_count(), 3);
}

#[test]
fn markup_cells_get_no_session() {
	let mut view = failed_cells(3);
	view.push_cell(Cell::markup(CellHandle(3), "nb#3"));
	view.set_visible(&[CellRange::new(0, 3)]);
	let mut h = Harness::new(view);

	let controller = attach(&mut h);

	assert_eq!(controller.visible_cells(), handles(&[0, 1, 2, 3]).as_slice());
	assert_eq!(controller.session_cells(), handles(&[0, 1, 2]));
	assert!(!controller.has_session(CellHandle(3)));
}

#[test]
fn execution_events_reach_only_the_affected_cell() {
	let mut h = Harness::new(failed_cells(3));
	let mut controller = attach(&mut h);
	h.view.clear_pushes();

	let uri = h.view.uri(CellHandle(1));
	let event = h.executions.set(&uri, Some(ExecutionRunState::new(CellExecutionState::Executing)));
	h.with_cx(|cx| controller.on_execution_changed(&event, cx));

	assert_eq!(h.view.texts(CellHandle(1)), vec!["$(notebook-state-executing~spin)"]);
	assert_eq!(h.view.texts(CellHandle(0)), vec![ERROR]);
	assert_eq!(h.view.pushes().len(), 1);

	h.view.clear_pushes();
	h.with_cx(|cx| controller.on_execution_changed(&ExecutionChangeEvent::Notebook, cx));
	assert!(h.view.pushes().is_empty());
}

#[test]
fn metadata_change_for_unknown_cell_is_ignored() {
	let mut view = failed_cells(10);
	view.set_visible(&[CellRange::new(0, 1)]);
	let mut h = Harness::new(view);
	let mut controller = attach(&mut h);
	h.view.clear_pushes();

	h.with_cx(|cx| controller.on_metadata_changed(CellHandle(8), cx));
	assert!(h.view.pushes().is_empty());

	h.view.metadata_mut(CellHandle(1)).last_run_success = Some(true);
	h.with_cx(|cx| controller.on_metadata_changed(CellHandle(1), cx));
	assert_eq!(h.view.texts(CellHandle(1)), vec!["$(notebook-state-success)"]);
}

#[test]
fn cell_list_change_rebuilds_every_session() {
	let mut h = Harness::new(failed_cells(4));
	let mut controller = attach(&mut h);

	h.view.remove_cell(CellHandle(1));
	h.view.clear_pushes();
	h.with_cx(|cx| controller.on_view_cells_changed(cx));

	assert_eq!(controller.session_cells(), handles(&[0, 2, 3]));
	assert!(h.view.items(CellHandle(1)).is_empty());
	assert_eq!(h.view.attached_count(), 3);
	// Four disposals, then three fresh sessions.
	assert_eq!(h.view.pushes().len(), 7);
}

#[test]
fn missing_model_keeps_sessions() {
	let mut h = Harness::new(failed_cells(4));
	let mut controller = attach(&mut h);

	h.view.set_has_model(false);
	h.view.set_visible(&[]);
	h.view.clear_pushes();
	h.with_cx(|cx| controller.on_visible_ranges_changed(cx));

	assert_eq!(controller.session_cells(), handles(&[0, 1, 2, 3]));
	assert!(h.view.pushes().is_empty());
}

#[test]
fn dispose_releases_items_and_timers() {
	let mut h = Harness::new(failed_cells(2));
	let mut controller = attach(&mut h);

	let uri = h.view.uri(CellHandle(0));
	let event = h.executions.set(&uri, Some(ExecutionRunState::new(CellExecutionState::Executing)));
	h.with_cx(|cx| controller.on_execution_changed(&event, cx));
	h.now = Timestamp::from_millis(100);
	let event = h.executions.set(&uri, None);
	h.with_cx(|cx| controller.on_execution_changed(&event, cx));
	assert_eq!(h.timers.pending_for(CellHandle(0)), 1);

	h.with_cx(|cx| controller.dispose(cx));

	assert!(h.timers.is_empty());
	assert_eq!(h.view.attached_count(), 0);
	assert!(controller.session_cells().is_empty());
}

#[test]
fn stale_timer_is_dropped() {
	let mut h = Harness::new(failed_cells(2));
	let mut controller = attach(&mut h);
	h.view.clear_pushes();

	let id = h.timers.schedule(h.now, std::time::Duration::ZERO, TimerTarget::new(CellHandle(9), TimerKind::SpinnerHold));
	let (fired, target) = h.timers.pop_due(h.now).unwrap();
	assert_eq!(fired, id);
	h.with_cx(|cx| controller.on_timer(fired, target, cx));

	assert!(h.view.pushes().is_empty());
}

/// Cells 3, 8 and 13 are markup; the rest are code cells whose last run failed.
fn mixed_notebook() -> FakeNotebook {
	let mut view = FakeNotebook::default();
	for raw in 0..16u64 {
		let handle = CellHandle(raw);
		let uri = format!("nb#{raw}");
		let mut cell = if raw % 5 == 3 { Cell::markup(handle, uri) } else { Cell::code(handle, uri) };
		cell.internal_metadata.last_run_success = Some(false);
		view.push_cell(cell);
	}
	view
}

fn expected_sessions(view: &FakeNotebook, ranges: &[CellRange]) -> Vec<CellHandle> {
	let indices: BTreeSet<usize> = ranges.iter().flat_map(|range| range.start..range.end + 1).collect();
	let mut cells: Vec<_> = indices
		.into_iter()
		.filter_map(|index| view.cell_at(index))
		.filter(|cell| cell.kind.is_code())
		.map(|cell| cell.handle)
		.collect();
	cells.sort();
	cells
}

proptest! {
	#[test]
	fn sessions_follow_visible_code_cells(
		steps in prop::collection::vec(prop::collection::vec((0usize..20, 0usize..6), 0..3), 1..16)
	) {
		let mut view = mixed_notebook();
		view.set_visible(&[]);
		let mut h = Harness::new(view);
		let mut controller = attach(&mut h);

		for step in steps {
			let ranges: Vec<_> = step.iter().map(|&(start, len)| CellRange::new(start, start + len)).collect();
			h.view.set_visible(&ranges);
			h.with_cx(|cx| controller.on_visible_ranges_changed(cx));

			let expected = expected_sessions(&h.view, &ranges);
			let mut actual = controller.session_cells();
			actual.sort();
			prop_assert_eq!(&actual, &expected);
			prop_assert_eq!(h.view.attached_count(), expected.len());
			for handle in expected {
				prop_assert_eq!(h.view.items(handle).len(), 1);
			}
		}
	}
}
