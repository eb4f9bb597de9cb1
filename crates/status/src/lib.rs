//! Per-cell execution status indicators for notebook views.
//!
//! A [`CellStatusBar`] keeps one execution state icon and one execution
//! timer label attached to every visible code cell. The host owns the
//! cells, the execution state and the clock; it forwards change events and
//! drains due timers, and the indicators push declarative item lists back
//! through [`NotebookView::delta_status_items`].

/// Session bookkeeping generic over indicator type.
pub mod controller;
/// Tokio helpers for waiting on the timer queue.
pub mod driver;
/// Settings errors.
pub mod error;
/// Collaborator traits implemented by the host.
pub mod host;
/// Execution state and timer indicators.
pub mod indicator;
/// TOML-backed settings and the verbosity option.
pub mod settings;
/// Orchestrator routing host events to every indicator type.
pub mod status_bar;
/// In-memory collaborators for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
/// Cancelable single-shot timers.
pub mod timer;
/// Visible cell tracking.
pub mod visible;

pub use controller::{IndicatorFactory, StatusBarController};
pub use driver::sleep_until_next;
pub use error::{ConfigError, Result};
pub use host::{ConfigurationChange, ConfigurationStore, ExecutionChangeEvent, ExecutionStateProvider, NotebookView, RendererInfo, RendererRegistry, StatusCx};
pub use indicator::{CellIndicator, ExecutionStateIndicator, TimerIndicator};
pub use settings::{SettingValue, Settings, SettingsStore, TIMER_VERBOSITY_KEY, TimerVerbosity};
pub use status_bar::CellStatusBar;
pub use timer::{IndicatorKind, TimerId, TimerKind, TimerQueue, TimerTarget};
pub use visible::{VisibleCellTracker, VisibleCellsDelta};

#[cfg(test)]
use tracing_subscriber as _;
