use super::*;

fn target(cell: u64, kind: TimerKind) -> TimerTarget {
	TimerTarget::new(CellHandle(cell), kind)
}

#[test]
fn pop_due_respects_deadline() {
	let mut queue = TimerQueue::new();
	let now = Timestamp::from_millis(1_000);
	queue.schedule(now, Duration::from_millis(200), target(1, TimerKind::TimerGraceClear));

	assert_eq!(queue.next_deadline(), Some(Timestamp::from_millis(1_200)));
	assert!(queue.pop_due(Timestamp::from_millis(1_199)).is_none());

	let (_, fired) = queue.pop_due(Timestamp::from_millis(1_200)).unwrap();
	assert_eq!(fired, target(1, TimerKind::TimerGraceClear));
	assert!(queue.is_empty());
}

#[test]
fn earlier_deadline_fires_first_and_ties_keep_schedule_order() {
	let mut queue = TimerQueue::new();
	let now = Timestamp::EPOCH;
	let late = queue.schedule(now, Duration::from_millis(500), target(1, TimerKind::SpinnerHold));
	let first = queue.schedule(now, Duration::from_millis(100), target(2, TimerKind::TimerRefresh));
	let second = queue.schedule(now, Duration::from_millis(100), target(3, TimerKind::TimerRefresh));

	let at = Timestamp::from_millis(1_000);
	assert_eq!(queue.pop_due(at).map(|(id, _)| id), Some(first));
	assert_eq!(queue.pop_due(at).map(|(id, _)| id), Some(second));
	assert_eq!(queue.pop_due(at).map(|(id, _)| id), Some(late));
	assert!(queue.pop_due(at).is_none());
}

#[test]
fn canceled_timer_never_fires() {
	let mut queue = TimerQueue::new();
	let id = queue.schedule(Timestamp::EPOCH, Duration::from_millis(10), target(1, TimerKind::SpinnerHold));

	assert!(queue.is_pending(id));
	assert!(queue.cancel(id));
	assert!(!queue.is_pending(id));
	assert!(!queue.cancel(id));
	assert!(queue.pop_due(Timestamp::from_millis(1_000)).is_none());
	assert_eq!(queue.next_deadline(), None);
}

#[test]
fn ids_are_not_reused() {
	let mut queue = TimerQueue::new();
	let a = queue.schedule(Timestamp::EPOCH, Duration::ZERO, target(1, TimerKind::TimerRefresh));
	queue.pop_due(Timestamp::EPOCH);
	let b = queue.schedule(Timestamp::EPOCH, Duration::ZERO, target(1, TimerKind::TimerRefresh));
	assert_ne!(a, b);
}

#[test]
fn pending_for_counts_per_cell() {
	let mut queue = TimerQueue::new();
	queue.schedule(Timestamp::EPOCH, Duration::from_millis(1), target(1, TimerKind::TimerRefresh));
	queue.schedule(Timestamp::EPOCH, Duration::from_millis(1), target(1, TimerKind::TimerGraceClear));
	queue.schedule(Timestamp::EPOCH, Duration::from_millis(1), target(2, TimerKind::SpinnerHold));

	assert_eq!(queue.pending_for(CellHandle(1)), 2);
	assert_eq!(queue.pending_for(CellHandle(2)), 1);
	assert_eq!(queue.pending_for(CellHandle(3)), 0);
	assert_eq!(TimerKind::SpinnerHold.indicator(), IndicatorKind::ExecutionState);
	assert_eq!(TimerKind::TimerGraceClear.indicator(), IndicatorKind::Timer);
}
