//! Break insertion with forward-shift reflow (spec.md §4.3/§4.4). Pure
//! function over an already-scheduled day: given an anchor task to follow
//! with a break, compute the break's interval and, if it doesn't fit in the
//! gap before the next task, the forward shift every later task needs.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sched_core::{ScheduleError, Task, TaskId};

/// A later task's new interval after a shift.
#[derive(Clone, Debug, PartialEq)]
pub struct Shifted {
    pub task_id: TaskId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Result of inserting a break after an anchor task.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakInsertion {
    pub break_task: Task,
    /// Later same-day tasks whose interval moved, in ascending start order.
    pub shifted: Vec<Shifted>,
    /// True if any shifted task's new end now falls past the working window.
    pub exceeds_window: bool,
}

/// Insert a `duration_minutes` break right after `anchor_id` among
/// `day_tasks` (all of one user's tasks scheduled on the same day,
/// including the anchor). Tasks starting at or before the anchor's end are
/// untouched; tasks starting after it shift forward only by the amount the
/// break overruns the gap that was already there (spec.md §4.4 insert_break,
/// §8 S3/S4).
pub fn insert_break(
    day_tasks: &[Task],
    anchor_id: TaskId,
    duration_minutes: i64,
    window_end: DateTime<Utc>,
) -> Result<BreakInsertion, ScheduleError> {
    let anchor = day_tasks
        .iter()
        .find(|t| t.id == anchor_id)
        .ok_or(ScheduleError::NoSuchAnchor(anchor_id))?;
    let anchor_end = anchor
        .scheduled_end_time
        .ok_or(ScheduleError::NoSuchAnchor(anchor_id))?;

    let mut later: Vec<&Task> = day_tasks
        .iter()
        .filter(|t| t.id != anchor_id && t.scheduled_start_time.is_some_and(|s| s > anchor_end))
        .collect();
    later.sort_by_key(|t| t.scheduled_start_time);

    let break_start = anchor_end;
    let break_end = break_start + ChronoDuration::minutes(duration_minutes);

    let gap_minutes = later
        .first()
        .map(|next| (next.scheduled_start_time.unwrap() - break_start).num_minutes())
        .unwrap_or(0);
    let overrun = (duration_minutes - gap_minutes).max(0);

    let mut shifted = Vec::with_capacity(later.len());
    let mut exceeds_window = false;
    if overrun > 0 {
        let shift = ChronoDuration::minutes(overrun);
        for task in &later {
            let new_start = task.scheduled_start_time.expect("filtered above") + shift;
            let new_end = task.scheduled_end_time.expect("I3: paired with start") + shift;
            if new_end > window_end {
                exceeds_window = true;
            }
            shifted.push(Shifted { task_id: task.id, start: new_start, end: new_end });
        }
    }

    let break_task = Task::new_break(anchor.user_id, break_start, break_end);

    Ok(BreakInsertion { break_task, shifted, exceeds_window })
}

/// Convenience for callers that only have a `UserId` and want to validate a
/// duration against a configured minimum before calling [`insert_break`].
pub fn validate_duration(duration_minutes: i64, minimum: i64) -> Result<(), ScheduleError> {
    if duration_minutes < minimum {
        return Err(ScheduleError::InvalidDuration { given: duration_minutes, minimum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sched_core::UserId;

    fn at(minute_offset: i64) -> DateTime<Utc> {
        let base = DateTime::parse_from_rfc3339("2026-01-06T09:00:00Z").unwrap().with_timezone(&Utc);
        base + ChronoDuration::minutes(minute_offset)
    }

    fn scheduled(user: UserId, start_min: i64, duration: i64) -> Task {
        let mut t = Task::new(user, "t").duration(duration);
        t.set_schedule(at(start_min), at(start_min + duration));
        t
    }

    #[test]
    fn break_fits_in_existing_gap_without_reflow_s3() {
        let user = UserId::new();
        let a = scheduled(user, 0, 60); // [09:00, 10:00)
        let mut b = scheduled(user, 75, 30); // [10:15, 10:45) -> 15 min gap
        b.id = TaskId::new();
        let window_end = at(8 * 60);

        let result = insert_break(&[a.clone(), b.clone()], a.id, 15, window_end).unwrap();
        assert_eq!(result.break_task.scheduled_start_time, Some(at(60)));
        assert_eq!(result.break_task.scheduled_end_time, Some(at(75)));
        assert!(result.shifted.is_empty());
        assert!(!result.exceeds_window);
    }

    #[test]
    fn break_overrunning_gap_shifts_later_tasks_forward_s4() {
        let user = UserId::new();
        let a = scheduled(user, 0, 60); // [09:00, 10:00)
        let mut b = scheduled(user, 60, 30); // [10:00, 10:30) -> 0 min gap
        b.id = TaskId::new();
        let window_end = at(8 * 60);

        let result = insert_break(&[a.clone(), b.clone()], a.id, 15, window_end).unwrap();
        assert_eq!(result.shifted.len(), 1);
        assert_eq!(result.shifted[0].task_id, b.id);
        assert_eq!(result.shifted[0].start, at(75));
        assert_eq!(result.shifted[0].end, at(105));
    }

    #[test]
    fn flags_when_shift_pushes_past_the_window() {
        let user = UserId::new();
        let a = scheduled(user, 0, 60);
        let mut b = scheduled(user, 60, 30);
        b.id = TaskId::new();
        let window_end = at(90); // ends right where b originally did

        let result = insert_break(&[a.clone(), b.clone()], a.id, 15, window_end).unwrap();
        assert!(result.exceeds_window);
    }

    #[test]
    fn unknown_anchor_is_an_error() {
        let user = UserId::new();
        let a = scheduled(user, 0, 60);
        let window_end = at(8 * 60);
        let err = insert_break(&[a], TaskId::new(), 15, window_end).unwrap_err();
        assert!(matches!(err, ScheduleError::NoSuchAnchor(_)));
    }

    #[test]
    fn no_later_tasks_means_no_reflow() {
        let user = UserId::new();
        let a = scheduled(user, 0, 60);
        let window_end = at(8 * 60);
        let result = insert_break(&[a.clone()], a.id, 15, window_end).unwrap();
        assert!(result.shifted.is_empty());
        assert!(!result.exceeds_window);
    }

    #[test]
    fn validate_duration_rejects_below_minimum() {
        assert!(validate_duration(3, 5).is_err());
        assert!(validate_duration(5, 5).is_ok());
    }
}
