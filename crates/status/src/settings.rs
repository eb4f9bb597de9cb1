//! Settings consumed by the status indicators.
//!
//! Settings are written in TOML using the viewer's dotted setting names:
//!
//! ```toml
//! [notebook]
//! cellExecutionTimeVerbosity = "verbose"
//! ```
//!
//! [`SettingsStore`] keeps the raw table so that hosts can answer arbitrary
//! [`ConfigurationStore::value`] lookups, and validates the keys this crate
//! understands through [`Settings`] when loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::host::{ConfigurationChange, ConfigurationStore};

/// Raw setting value as read from the store.
pub type SettingValue = toml::Value;

/// Setting controlling how much text the execution timer shows.
pub const TIMER_VERBOSITY_KEY: &str = "notebook.cellExecutionTimeVerbosity";

/// Execution timer label style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerVerbosity {
	/// Duration only, e.g. `1.5s`.
	#[default]
	Default,
	/// Last execution time and duration.
	Verbose,
}

impl TimerVerbosity {
	/// Interprets a raw setting value; unset or unknown values fall back to
	/// [`TimerVerbosity::Default`].
	pub fn from_setting(value: Option<SettingValue>) -> Self {
		match value {
			None => Self::Default,
			Some(SettingValue::String(s)) if s == "verbose" => Self::Verbose,
			Some(SettingValue::String(s)) if s == "default" => Self::Default,
			Some(other) => {
				tracing::warn!(key = TIMER_VERBOSITY_KEY, value = %other, "ignoring unknown timer verbosity");
				Self::Default
			}
		}
	}

	/// Reads the current verbosity from a configuration store.
	pub fn read(config: &dyn ConfigurationStore) -> Self {
		Self::from_setting(config.value(TIMER_VERBOSITY_KEY))
	}

	pub const fn is_verbose(self) -> bool {
		matches!(self, Self::Verbose)
	}
}

/// Typed view of the settings this crate reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub notebook: NotebookSettings,
}

/// `[notebook]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotebookSettings {
	pub cell_execution_time_verbosity: TimerVerbosity,
}

impl Settings {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}
}

/// In-memory [`ConfigurationStore`] backed by a TOML table.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
	table: toml::Table,
}

impl SettingsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from TOML, rejecting invalid values for known keys.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Settings::from_toml_str(source)?;
		let table: toml::Table = toml::from_str(source)?;
		Ok(Self { table })
	}

	/// Loads settings from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let store = Self::from_toml_str(&source)?;
		tracing::debug!(path = %path.display(), "loaded settings");
		Ok(store)
	}

	/// Typed snapshot of the known settings; unknown values fall back to defaults.
	pub fn settings(&self) -> Settings {
		Settings {
			notebook: NotebookSettings {
				cell_execution_time_verbosity: TimerVerbosity::read(self),
			},
		}
	}

	/// Sets a dotted key, creating intermediate sections as needed.
	pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<ConfigurationChange> {
		let mut parts = key.split('.').collect::<Vec<_>>();
		let Some(leaf) = parts.pop().filter(|leaf| !leaf.is_empty()) else {
			return Err(ConfigError::EmptyKey { key: key.to_string() });
		};

		let mut table = &mut self.table;
		for (depth, part) in parts.iter().enumerate() {
			let entry = table.entry(part.to_string()).or_insert_with(|| SettingValue::Table(toml::Table::new()));
			table = match entry {
				SettingValue::Table(inner) => inner,
				_ => {
					return Err(ConfigError::NotATable {
						key: key.to_string(),
						section: parts[..=depth].join("."),
					});
				}
			};
		}
		table.insert(leaf.to_string(), value.into());
		tracing::debug!(key, "setting updated");
		Ok(ConfigurationChange::new([key]))
	}
}

impl ConfigurationStore for SettingsStore {
	fn value(&self, key: &str) -> Option<SettingValue> {
		let mut parts = key.split('.');
		let mut current = self.table.get(parts.next()?)?;
		for part in parts {
			current = current.as_table()?.get(part)?;
		}
		Some(current.clone())
	}
}
