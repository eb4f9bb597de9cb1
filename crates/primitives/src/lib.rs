//! Value types shared by notebook hosts and the cell status indicators.

/// Cell identity, kind, visible ranges and internal metadata.
pub mod cell;
/// Human-readable execution duration formatting.
pub mod duration;
/// Execution run state as reported by the execution provider.
pub mod execution;
/// Declarative status item records.
pub mod item;
/// Wall-clock timestamps in epoch milliseconds.
pub mod time;

pub use cell::{Cell, CellHandle, CellInternalMetadata, CellKind, CellRange, CellUri};
pub use duration::format_cell_duration;
pub use execution::{CellExecutionState, ExecutionRunState};
pub use item::{CellStatusItems, HIGHEST_PRIORITY, MarkdownString, StatusAlignment, StatusItem, StatusItemId, ThemeColor};
pub use time::Timestamp;
