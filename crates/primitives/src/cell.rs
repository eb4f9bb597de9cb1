use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Opaque identity of a cell within one notebook view.
///
/// Handles are stable for the lifetime of the cell and are never reused by
/// the view, so they can key per-cell state across visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellHandle(pub u64);

impl fmt::Display for CellHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "cell#{}", self.0)
	}
}

/// Document-level identity of a cell, used by the execution provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellUri(String);

impl CellUri {
	pub fn new(uri: impl Into<String>) -> Self {
		Self(uri.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CellUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Whether a cell holds executable code or rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
	Markup,
	#[default]
	Code,
}

impl CellKind {
	#[inline]
	pub const fn is_code(self) -> bool {
		matches!(self, Self::Code)
	}
}

/// Half-open range of cell indices (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRange {
	/// First index in the range.
	pub start: usize,
	/// One past the last index in the range.
	pub end: usize,
}

impl CellRange {
	pub const fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	pub const fn len(&self) -> usize {
		self.end.saturating_sub(self.start)
	}

	pub const fn is_empty(&self) -> bool {
		self.end <= self.start
	}

	/// Returns the same range with its end widened by `extra` indices.
	pub const fn extend_end(self, extra: usize) -> Self {
		Self {
			start: self.start,
			end: self.end.saturating_add(extra),
		}
	}

	/// Iterates the indices covered by this range.
	pub fn indices(&self) -> std::ops::Range<usize> {
		self.start..self.end.max(self.start)
	}
}

/// Execution bookkeeping the document model keeps per cell.
///
/// Every field is optional; absence means "no information" and never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellInternalMetadata {
	/// Outcome of the last completed run: unset, succeeded or failed.
	pub last_run_success: Option<bool>,
	/// Wall-clock time the last run started.
	pub run_start_time: Option<Timestamp>,
	/// Milliseconds added to the elapsed time, covering time spent before
	/// `run_start_time` was recorded.
	pub run_start_time_adjustment: Option<i64>,
	/// Wall-clock time the last run finished.
	pub run_end_time: Option<Timestamp>,
	/// Milliseconds each output renderer spent, keyed by renderer id.
	pub render_duration: BTreeMap<String, u64>,
}

impl CellInternalMetadata {
	/// Returns the start time adjustment, treating an unset value as zero.
	#[inline]
	pub fn start_adjustment(&self) -> i64 {
		self.run_start_time_adjustment.unwrap_or(0)
	}
}

/// A cell as exposed by the notebook view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
	pub handle: CellHandle,
	pub uri: CellUri,
	pub kind: CellKind,
	#[serde(default)]
	pub internal_metadata: CellInternalMetadata,
}

impl Cell {
	/// Creates a code cell with empty metadata.
	pub fn code(handle: CellHandle, uri: impl Into<String>) -> Self {
		Self {
			handle,
			uri: CellUri::new(uri),
			kind: CellKind::Code,
			internal_metadata: CellInternalMetadata::default(),
		}
	}

	/// Creates a markup cell with empty metadata.
	pub fn markup(handle: CellHandle, uri: impl Into<String>) -> Self {
		Self {
			kind: CellKind::Markup,
			..Self::code(handle, uri)
		}
	}
}
