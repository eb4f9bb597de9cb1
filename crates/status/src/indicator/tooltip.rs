//! Diagnostic tooltip for a finished run.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use cellbar_primitives::{MarkdownString, Timestamp, format_cell_duration};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::host::RendererRegistry;

/// Characters `encodeURIComponent` escapes: everything except ASCII
/// alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

const ISSUE_REPORTER_COMMAND: &str = "command:workbench.action.openIssueReporter";

/// Inputs for [`render_tooltip`], all in milliseconds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunTimings<'a> {
	pub last_execution: Timestamp,
	/// Time between run start and run end.
	pub execution_ms: u64,
	/// Time the timer has been counting, including the start adjustment.
	pub timer_ms: u64,
	pub render_durations: &'a BTreeMap<String, u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueReporterArgs<'a> {
	extension_id: &'a str,
	issue_body: String,
}

/// Builds the trusted markdown tooltip shown on a finished run's duration.
pub(crate) fn render_tooltip(timings: RunTimings<'_>, renderers: &dyn RendererRegistry) -> MarkdownString {
	let execution = format_cell_duration(timings.execution_ms, true);
	let overhead = format_cell_duration(timings.timer_ms.saturating_sub(timings.execution_ms), true);

	let mut lines = String::new();
	for (renderer_id, &render_ms) in timings.render_durations {
		let label = renderer_label(renderer_id, render_ms, timings.execution_ms, renderers);
		let _ = writeln!(lines, "- {label} {}", format_cell_duration(render_ms, true));
	}

	MarkdownString::trusted(format!(
		"**Last Execution** {}\n\n**Execution Time** {execution}\n\n**Overhead Time** {overhead}\n\n**Render Times**\n\n{lines}\n",
		timings.last_execution.to_local_string(),
	))
}

/// Slow renderers get a link that opens a prefilled issue report.
fn is_slow_render(render_ms: u64, execution_ms: u64) -> bool {
	(render_ms > 200 && execution_ms < 2000) || render_ms > 1000
}

fn renderer_label(renderer_id: &str, render_ms: u64, execution_ms: u64, renderers: &dyn RendererRegistry) -> String {
	let info = renderers.renderer_info(renderer_id);
	let name = info.as_ref().map_or(renderer_id, |info| info.display_name.as_str());
	if !is_slow_render(render_ms, execution_ms) {
		return format!("**{name}**");
	}

	let args = IssueReporterArgs {
		extension_id: info.as_ref().map_or("", |info| info.extension_id.as_str()),
		issue_body: format!(
			"Auto-generated text from notebook cell performance. The duration for the renderer, {name}, is slower than expected.\n\
			 Execution Time: {}\n\
			 Renderer Duration: {}\n",
			format_cell_duration(execution_ms, true),
			format_cell_duration(render_ms, true),
		),
	};
	match serde_json::to_string(&args) {
		Ok(json) => format!("[**{name}**]({ISSUE_REPORTER_COMMAND}?{})", utf8_percent_encode(&json, URI_COMPONENT)),
		Err(error) => {
			tracing::warn!(renderer = renderer_id, %error, "failed to encode issue reporter args");
			format!("**{name}**")
		}
	}
}
