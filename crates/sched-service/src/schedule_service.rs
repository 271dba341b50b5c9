//! `ScheduleService`: the orchestration layer spec.md §4.4 describes —
//! `generate`, `reset`, `daily`, and `insert_break` — wiring the pure
//! [`sched_solver`] functions to a [`TaskStore`] under a per-user lock
//! (spec.md §5).

use crate::locks::UserLockRegistry;
use chrono::NaiveDate;
use sched_core::{
    time::{local_datetime, to_local_date},
    Clock, DaySummary, ScheduleError, SchedulerConfig, Task, TaskId, TaskStatus, TaskStore, UserId,
};
use sched_solver::{is_done, pack, resolve, BreakInsertion, OrderingPolicy, Shifted};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Outcome of a [`ScheduleService::generate`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerateResult {
    pub scheduled: Vec<Task>,
    pub skipped: Vec<TaskId>,
}

/// Outcome of a [`ScheduleService::insert_break`] call.
#[derive(Clone, Debug)]
pub struct InsertBreakResult {
    pub break_task: Task,
    pub shifted: Vec<Task>,
    /// True if the forward shift pushed any later task past the working
    /// window's end (spec.md §4.4 edge case; not itself an error).
    pub exceeds_window: bool,
}

pub struct ScheduleService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    locks: UserLockRegistry,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, config: SchedulerConfig) -> Self {
        Self { store, clock, config, locks: UserLockRegistry::new() }
    }

    fn window(&self, date: NaiveDate) -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
        let start_minutes = self.config.default_window_start_minutes as i64;
        let end_minutes = self.config.default_window_end_minutes as i64;
        let start_time = chrono::NaiveTime::from_num_seconds_from_midnight_opt((start_minutes * 60) as u32, 0)
            .expect("config window start is a valid time of day");
        let end_time = chrono::NaiveTime::from_num_seconds_from_midnight_opt((end_minutes * 60) as u32, 0)
            .expect("config window end is a valid time of day");
        (
            local_datetime(date, start_time, self.config.zone_offset_minutes),
            local_datetime(date, end_time, self.config.zone_offset_minutes),
        )
    }

    fn tasks_on_date(&self, user_id: UserId, date: NaiveDate) -> Vec<Task> {
        self.store
            .list_by_user(&user_id)
            .into_iter()
            .filter(|t| {
                t.scheduled_start_time
                    .is_some_and(|s| to_local_date(s, self.config.zone_offset_minutes) == date)
            })
            .collect()
    }

    /// Regenerate a user's schedule for `date` from scratch (spec.md §4.4
    /// `generate`: idempotent — re-running with the same inputs and task
    /// state reproduces the same placements, spec.md §8 P1).
    #[instrument(skip(self))]
    pub fn generate(&self, user_id: UserId, date: NaiveDate, policy: OrderingPolicy) -> Result<GenerateResult, ScheduleError> {
        self.locks.with_lock(user_id, || {
            self.clear_date_locked(user_id, date);

            let now = self.clock.now();
            let all = self.store.list_by_user(&user_id);
            // spec.md §4.4 generate step 2: pending/in-progress tasks whose
            // deadline (if any) falls on the target date.
            let candidates: Vec<Task> = all
                .iter()
                .filter(|t| {
                    !t.is_break()
                        && matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress)
                        && t.deadline.map_or(true, |d| to_local_date(d, self.config.zone_offset_minutes) == date)
                })
                .cloned()
                .collect();
            let is_completed = |id: TaskId| all.iter().any(|t| t.id == id && is_done(t.status));

            let ordered = resolve(&candidates, is_completed, policy, now)?;
            let (window_start, window_end) = self.window(date);
            let packed = pack(&ordered, window_start, window_end);

            let mut scheduled = Vec::with_capacity(packed.placed.len());
            for placement in &packed.placed {
                let mut task = self.store.get(&placement.task_id).ok_or(ScheduleError::NotFound(placement.task_id))?;
                task.set_schedule(placement.start, placement.end);
                let updated = self.store.update(task).ok_or(ScheduleError::NotFound(placement.task_id))?;
                scheduled.push(updated);
            }

            info!(user = %user_id, date = %date, scheduled = scheduled.len(), skipped = packed.skipped.len(), "generated schedule");
            Ok(GenerateResult { scheduled, skipped: packed.skipped })
        })
    }

    /// Clear a user's schedule for `date`: break tasks are deleted outright,
    /// ordinary tasks lose their scheduled interval but keep their status.
    pub fn reset(&self, user_id: UserId, date: NaiveDate) {
        self.locks.with_lock(user_id, || self.clear_date_locked(user_id, date));
    }

    fn clear_date_locked(&self, user_id: UserId, date: NaiveDate) {
        for task in self.tasks_on_date(user_id, date) {
            if task.is_break() {
                self.store.delete(&task.id);
            } else {
                let mut task = task;
                task.clear_schedule();
                self.store.update(task);
            }
        }
        debug!(user = %user_id, date = %date, "cleared schedule");
    }

    /// All of a user's tasks whose scheduled interval intersects `date`,
    /// ordered by `scheduled_start_time` (spec.md §4.4 `daily`).
    pub fn daily(&self, user_id: UserId, date: NaiveDate) -> Vec<Task> {
        let mut tasks = self.tasks_on_date(user_id, date);
        tasks.sort_by_key(|t| t.scheduled_start_time);
        tasks
    }

    /// Read-side projection of a day's schedule (SPEC_FULL.md §3 supplement).
    pub fn day_summary(&self, user_id: UserId, date: NaiveDate) -> DaySummary {
        let tasks = self.tasks_on_date(user_id, date);
        let break_count = tasks.iter().filter(|t| t.is_break()).count();
        let scheduled_count = tasks.len() - break_count;
        let unscheduled_count = self
            .store
            .list_by_user(&user_id)
            .into_iter()
            .filter(|t| t.status == TaskStatus::Pending && !t.is_break() && !t.is_scheduled())
            .count();
        DaySummary { date, scheduled_count, break_count, unscheduled_count }
    }

    /// Insert a break after `anchor_id`, shifting later same-day tasks
    /// forward as needed (spec.md §4.4 `insert_break`).
    #[instrument(skip(self))]
    pub fn insert_break(&self, user_id: UserId, anchor_id: TaskId, duration_minutes: i64) -> Result<InsertBreakResult, ScheduleError> {
        self.locks.with_lock(user_id, || {
            sched_solver::validate_duration(duration_minutes, self.config.min_break_minutes)?;

            let anchor = self.store.get(&anchor_id).ok_or(ScheduleError::NoSuchAnchor(anchor_id))?;
            let anchor_start = anchor.scheduled_start_time.ok_or(ScheduleError::NoSuchAnchor(anchor_id))?;
            let date = to_local_date(anchor_start, self.config.zone_offset_minutes);
            let day_tasks = self.tasks_on_date(user_id, date);
            let (_, window_end) = self.window(date);

            let BreakInsertion { break_task, shifted, exceeds_window } =
                sched_solver::insert_break(&day_tasks, anchor_id, duration_minutes, window_end)?;

            let created = self.store.create(break_task);
            let mut shifted_tasks = Vec::with_capacity(shifted.len());
            for Shifted { task_id, start, end } in shifted {
                let mut task = self.store.get(&task_id).ok_or(ScheduleError::NotFound(task_id))?;
                task.set_schedule(start, end);
                let updated = self.store.update(task).ok_or(ScheduleError::NotFound(task_id))?;
                shifted_tasks.push(updated);
            }

            if exceeds_window {
                debug!(user = %user_id, anchor = %anchor_id, "break insertion pushed later tasks past the working window");
            }
            Ok(InsertBreakResult { break_task: created, shifted: shifted_tasks, exceeds_window })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTaskStore;
    use sched_core::time::FixedClock;

    fn service(now: chrono::DateTime<chrono::Utc>) -> (ScheduleService, Arc<InMemoryTaskStore>) {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(FixedClock::new(now));
        let service = ScheduleService::new(store.clone(), clock, SchedulerConfig::default());
        (service, store)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 6).unwrap()
    }

    fn now() -> chrono::DateTime<chrono::Utc> {
        local_datetime(date(), chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0)
    }

    #[test]
    fn generate_schedules_pending_tasks_into_the_window() {
        let (service, store) = service(now());
        let user = UserId::new();
        store.create(Task::new(user, "draft").duration(60));
        store.create(Task::new(user, "review").duration(30));

        let result = service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        assert_eq!(result.scheduled.len(), 2);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn generate_is_idempotent_p1() {
        let (service, store) = service(now());
        let user = UserId::new();
        store.create(Task::new(user, "draft").duration(60));

        let first = service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        let second = service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        assert_eq!(first.scheduled[0].scheduled_start_time, second.scheduled[0].scheduled_start_time);
    }

    #[test]
    fn reset_clears_schedule_without_rebuilding() {
        let (service, store) = service(now());
        let user = UserId::new();
        store.create(Task::new(user, "draft").duration(60));
        service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();

        service.reset(user, date());
        let summary = service.day_summary(user, date());
        assert_eq!(summary.scheduled_count, 0);
        assert_eq!(summary.unscheduled_count, 1);
    }

    #[test]
    fn daily_returns_tasks_ordered_by_scheduled_start() {
        let (service, store) = service(now());
        let user = UserId::new();
        store.create(Task::new(user, "a").duration(60));
        store.create(Task::new(user, "b").duration(30));
        service.generate(user, date(), OrderingPolicy::Ljf).unwrap();

        let tasks = service.daily(user, date());
        assert_eq!(tasks.len(), 2);
        assert!(tasks.windows(2).all(|w| w[0].scheduled_start_time <= w[1].scheduled_start_time));
    }

    #[test]
    fn generate_admits_in_progress_tasks() {
        let (service, store) = service(now());
        let user = UserId::new();
        let mut t = Task::new(user, "ongoing").duration(30);
        t.status = TaskStatus::InProgress;
        store.create(t);

        let result = service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        assert_eq!(result.scheduled.len(), 1);
    }

    #[test]
    fn generate_excludes_tasks_with_deadline_on_another_date() {
        let (service, store) = service(now());
        let user = UserId::new();
        let mut t = Task::new(user, "future").duration(30);
        t.deadline = Some(now() + chrono::Duration::days(5));
        store.create(t);

        let result = service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        assert!(result.scheduled.is_empty());
    }

    #[test]
    fn insert_break_after_generate_shifts_later_tasks() {
        let (service, store) = service(now());
        let user = UserId::new();
        let a = store.create(Task::new(user, "a").duration(60));
        store.create(Task::new(user, "b").duration(30));
        service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();

        let result = service.insert_break(user, a.id, 15).unwrap();
        assert_eq!(result.shifted.len(), 1);
    }

    #[test]
    fn daily_counts_breaks_separately_from_tasks() {
        let (service, store) = service(now());
        let user = UserId::new();
        let a = store.create(Task::new(user, "a").duration(60));
        service.generate(user, date(), OrderingPolicy::Fcfs).unwrap();
        service.insert_break(user, a.id, 15).unwrap();

        let summary = service.day_summary(user, date());
        assert_eq!(summary.scheduled_count, 1);
        assert_eq!(summary.break_count, 1);
    }
}
