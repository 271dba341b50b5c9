//! Timeline Packer (spec.md §4.3): a forward-cursor bin-pack of an ordered
//! task list into a single day's working window. Deliberately the simplest
//! possible interval allocator — no backtracking, no reshuffling — since
//! ordering (§4.2) and admission (§4.1) have already decided what "first"
//! means; the packer's only job is to say whether what's left still fits.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sched_core::{Task, TaskId};

/// One task placed into the window.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub task_id: TaskId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Outcome of packing an ordered task list into a window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackResult {
    pub placed: Vec<Placement>,
    /// Tasks that didn't fit before the window closed, in the order they
    /// were considered (spec.md §4.3 edge case: total demand > capacity).
    pub skipped: Vec<TaskId>,
}

/// Pack `ordered` forward from `window_start`, never crossing `window_end`.
///
/// Each task occupies `[cursor, cursor + duration)`; the cursor only
/// advances on a successful placement, so a single oversized task cannot
/// block shorter ones queued after it from being attempted against the
/// remaining capacity.
pub fn pack(ordered: &[Task], window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> PackResult {
    let mut cursor = window_start;
    let mut result = PackResult::default();

    for task in ordered {
        let duration = ChronoDuration::minutes(task.duration_minutes);
        let end = cursor + duration;
        if end <= window_end {
            result.placed.push(Placement { task_id: task.id, start: cursor, end });
            cursor = end;
        } else {
            result.skipped.push(task.id);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::UserId;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = DateTime::parse_from_rfc3339("2026-01-06T09:00:00Z").unwrap().with_timezone(&Utc);
        (start, start + ChronoDuration::hours(8))
    }

    fn task(minutes: i64) -> Task {
        Task::new(UserId::new(), "t").duration(minutes)
    }

    #[test]
    fn packs_sequentially_from_window_start() {
        let (start, end) = window();
        let tasks = vec![task(60), task(30)];
        let result = pack(&tasks, start, end);
        assert_eq!(result.placed.len(), 2);
        assert_eq!(result.placed[0].start, start);
        assert_eq!(result.placed[0].end, start + ChronoDuration::minutes(60));
        assert_eq!(result.placed[1].start, start + ChronoDuration::minutes(60));
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn skips_tasks_that_overflow_the_window_p6() {
        let (start, end) = window();
        let tasks = vec![task(7 * 60), task(3 * 60)];
        let result = pack(&tasks, start, end);
        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.skipped.len(), 1);
        for placement in &result.placed {
            assert!(placement.end <= end);
        }
    }

    #[test]
    fn a_later_shorter_task_can_still_fit_after_an_earlier_skip() {
        let (start, end) = window();
        // 7h task overflows with the next 2h task (9h > 8h window) but a 30m
        // task queued after both still has room in the remaining hour.
        let tasks = vec![task(7 * 60), task(2 * 60), task(30)];
        let result = pack(&tasks, start, end);
        assert_eq!(result.placed.len(), 2);
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let (start, end) = window();
        let result = pack(&[], start, end);
        assert!(result.placed.is_empty());
        assert!(result.skipped.is_empty());
    }
}
