use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::cell::CellHandle;

/// Priority that sorts ahead of every other status item.
pub const HIGHEST_PRIORITY: i64 = i64::MAX;

/// Token the view returns for each attached item.
///
/// Diffing is identity based: a later replacement names the tokens it
/// supersedes, never the item contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatusItemId(pub u64);

/// Side of the cell status bar an item is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAlignment {
	#[default]
	Left,
	Right,
}

/// Theme color reference, resolved by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeColor(Cow<'static, str>);

impl ThemeColor {
	pub const fn from_static(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}

	pub fn new(id: impl Into<String>) -> Self {
		Self(Cow::Owned(id.into()))
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

/// Markdown tooltip text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownString {
	pub value: String,
	/// Trusted markdown may carry command links.
	pub is_trusted: bool,
}

impl MarkdownString {
	pub fn plain(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			is_trusted: false,
		}
	}

	pub fn trusted(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			is_trusted: true,
		}
	}
}

/// One inline status affordance attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusItem {
	/// Label text; `$(icon-id)` references an icon.
	pub text: String,
	pub tooltip: Option<MarkdownString>,
	pub color: Option<ThemeColor>,
	pub alignment: StatusAlignment,
	/// Higher sorts first.
	pub priority: i64,
}

impl StatusItem {
	pub fn new(text: impl Into<String>, alignment: StatusAlignment, priority: i64) -> Self {
		Self {
			text: text.into(),
			tooltip: None,
			color: None,
			alignment,
			priority,
		}
	}

	pub fn with_tooltip(mut self, tooltip: MarkdownString) -> Self {
		self.tooltip = Some(tooltip);
		self
	}

	pub fn with_color(mut self, color: ThemeColor) -> Self {
		self.color = Some(color);
		self
	}
}

/// Replacement item list for one cell in a status item delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStatusItems {
	pub handle: CellHandle,
	pub items: Vec<StatusItem>,
}
