use serde::{Deserialize, Serialize};

/// Lifecycle stage of an in-flight cell run.
///
/// A cell that is not queued or running has no run state at all; callers
/// model that as `Option<ExecutionRunState>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellExecutionState {
	/// Requested, but the kernel has not acknowledged it yet.
	Unconfirmed,
	/// Acknowledged and queued behind other work.
	Pending,
	/// Currently running.
	Executing,
}

/// Snapshot of a cell's run as reported by the execution provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRunState {
	pub state: CellExecutionState,
	/// Set while the run is stopped at a breakpoint.
	#[serde(default)]
	pub did_pause: bool,
}

impl ExecutionRunState {
	pub const fn new(state: CellExecutionState) -> Self {
		Self { state, did_pause: false }
	}

	pub const fn paused(state: CellExecutionState) -> Self {
		Self { state, did_pause: true }
	}

	#[inline]
	pub const fn is_executing(&self) -> bool {
		matches!(self.state, CellExecutionState::Executing)
	}

	/// Returns true for run states waiting to start.
	#[inline]
	pub const fn is_queued(&self) -> bool {
		matches!(self.state, CellExecutionState::Pending | CellExecutionState::Unconfirmed)
	}
}
