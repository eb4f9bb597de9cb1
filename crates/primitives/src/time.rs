use std::ops::{Add, Sub};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant in milliseconds since the Unix epoch.
///
/// Cell metadata timestamps and timer deadlines share this timeline so that
/// "now" can be injected by the host (and pinned in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub const EPOCH: Self = Self(0);

	/// Reads the system clock.
	pub fn now() -> Self {
		Self(Utc::now().timestamp_millis())
	}

	pub const fn from_millis(ms: i64) -> Self {
		Self(ms)
	}

	pub const fn as_millis(self) -> i64 {
		self.0
	}

	/// Signed distance from `earlier` to `self` in milliseconds.
	#[inline]
	pub const fn millis_since(self, earlier: Self) -> i64 {
		self.0.saturating_sub(earlier.0)
	}

	/// Distance from `earlier` to `self`, zero when `earlier` is later.
	pub fn saturating_duration_since(self, earlier: Self) -> Duration {
		Duration::from_millis(self.millis_since(earlier).max(0) as u64)
	}

	/// Formats the instant as a local date and time, e.g. `3/14/2026, 9:26:53 AM`.
	///
	/// Out-of-range values fall back to the raw millisecond count.
	pub fn to_local_string(self) -> String {
		match DateTime::<Utc>::from_timestamp_millis(self.0) {
			Some(utc) => utc.with_timezone(&Local).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
			None => format!("{}ms", self.0),
		}
	}
}

impl Add<Duration> for Timestamp {
	type Output = Self;

	fn add(self, rhs: Duration) -> Self {
		let ms = i64::try_from(rhs.as_millis()).unwrap_or(i64::MAX);
		Self(self.0.saturating_add(ms))
	}
}

impl Sub<Duration> for Timestamp {
	type Output = Self;

	fn sub(self, rhs: Duration) -> Self {
		let ms = i64::try_from(rhs.as_millis()).unwrap_or(i64::MAX);
		Self(self.0.saturating_sub(ms))
	}
}
