//! Execution duration labels.
//!
//! Durations below one second read as milliseconds (`"50ms"`); longer ones
//! read as seconds with one truncated decimal (`"1.5s"`), prefixed by whole
//! minutes when there are any (`"1m 5.2s"`).

/// Formats a millisecond duration for display in a cell status item.
///
/// When `show_milliseconds` is false, sub-second durations still use the
/// seconds form (`"0.3s"`), which keeps a live-updating timer from jumping
/// between units.
pub fn format_cell_duration(duration_ms: u64, show_milliseconds: bool) -> String {
	if show_milliseconds && duration_ms < 1000 {
		return format!("{duration_ms}ms");
	}

	let minutes = duration_ms / 1000 / 60;
	let seconds = (duration_ms / 1000) % 60;
	let tenths = (duration_ms % 1000) / 100;

	if minutes > 0 {
		format!("{minutes}m {seconds}.{tenths}s")
	} else {
		format!("{seconds}.{tenths}s")
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn sub_second_shows_milliseconds() {
		assert_eq!(format_cell_duration(50, true), "50ms");
		assert_eq!(format_cell_duration(0, true), "0ms");
		assert_eq!(format_cell_duration(999, true), "999ms");
	}

	#[test]
	fn seconds_without_milliseconds() {
		assert_eq!(format_cell_duration(1500, false), "1.5s");
		assert_eq!(format_cell_duration(300, false), "0.3s");
		assert_eq!(format_cell_duration(1000, true), "1.0s");
	}

	#[test]
	fn minutes_prefix_only_when_nonzero() {
		assert_eq!(format_cell_duration(65_250, true), "1m 5.2s");
		assert_eq!(format_cell_duration(59_999, true), "59.9s");
		assert_eq!(format_cell_duration(3_600_000, true), "60m 0.0s");
	}

	#[test]
	fn tenths_are_truncated() {
		assert_eq!(format_cell_duration(1_999, true), "1.9s");
		assert_eq!(format_cell_duration(2_050, false), "2.0s");
	}

	proptest! {
		#[test]
		fn seconds_form_never_exceeds_source(ms in 1000u64..10_000_000) {
			let text = format_cell_duration(ms, true);
			let (minutes, rest) = match text.split_once("m ") {
				Some((m, rest)) => (m.parse::<u64>().unwrap(), rest),
				None => (0, text.as_str()),
			};
			let rest = rest.strip_suffix('s').unwrap();
			let (secs, tenths) = rest.split_once('.').unwrap();
			let rebuilt = minutes * 60_000 + secs.parse::<u64>().unwrap() * 1000 + tenths.parse::<u64>().unwrap() * 100;
			prop_assert!(rebuilt <= ms);
			prop_assert!(ms - rebuilt < 100);
		}
	}
}
