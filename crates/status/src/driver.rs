//! Async glue for hosts running on tokio.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = events.recv() => host.handle(event),
//!         () = sleep_until_next(&host.timers, Timestamp::now()) => host.run_due_timers(),
//!     }
//! }
//! ```

use cellbar_primitives::Timestamp;

use crate::timer::TimerQueue;

/// Waits until the queue's earliest deadline, measured from `now`.
///
/// Never completes while the queue is empty. Deadlines already in the past
/// complete immediately.
pub async fn sleep_until_next(timers: &TimerQueue, now: Timestamp) {
	match timers.next_deadline() {
		Some(deadline) => tokio::time::sleep(deadline.saturating_duration_since(now)).await,
		None => std::future::pending().await,
	}
}
