//! In-memory [`TaskStore`] implementation for tests and the CLI (spec.md §6:
//! "a persistence layer ... is out of scope"; this is the stand-in callers
//! wire up in its place).
//!
//! Keyed by [`DashMap`], the same concurrent-map choice `knhk-workflow-engine`
//! uses for its in-memory case/spec stores, adapted here to a synchronous,
//! non-transactional `TaskStore`.

use chrono::NaiveDate;
use dashmap::DashMap;
use sched_core::{Report, ReportId, Task, TaskId, TaskStore, UserId};

/// Thread-safe, process-local store. `Report`s are immutable once created
/// (spec.md §3); `Task`s are replaced wholesale on `update`.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<TaskId, Task>,
    reports: DashMap<ReportId, Report>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every task across every user. Not part of [`TaskStore`] (which is
    /// scoped per-user) — used by the CLI's snapshot load/save, which owns
    /// a concrete store rather than a trait object.
    pub fn all_tasks(&self) -> Vec<Task> {
        self.tasks.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Every report across every user; see [`InMemoryTaskStore::all_tasks`].
    pub fn all_reports(&self) -> Vec<Report> {
        self.reports.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, task: Task) -> Task {
        self.tasks.insert(task.id, task.clone());
        task
    }

    fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.get(id).map(|entry| entry.value().clone())
    }

    fn update(&self, task: Task) -> Option<Task> {
        if !self.tasks.contains_key(&task.id) {
            return None;
        }
        self.tasks.insert(task.id, task.clone());
        Some(task)
    }

    fn delete(&self, id: &TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    fn list_by_user(&self, user_id: &UserId) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|entry| entry.value().user_id == *user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn create_report(&self, report: Report) -> Report {
        self.reports.insert(report.id, report.clone());
        report
    }

    fn get_report(&self, id: &ReportId) -> Option<Report> {
        self.reports.get(id).map(|entry| entry.value().clone())
    }

    fn find_report(&self, user_id: &UserId, date: NaiveDate) -> Option<Report> {
        self.reports
            .iter()
            .find(|entry| entry.value().user_id == *user_id && entry.value().date == date)
            .map(|entry| entry.value().clone())
    }

    fn list_reports(&self, user_id: &UserId) -> Vec<Report> {
        self.reports
            .iter()
            .filter(|entry| entry.value().user_id == *user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sched_core::ProductivityMetrics;

    #[test]
    fn create_and_get_round_trips() {
        let store = InMemoryTaskStore::new();
        let user = UserId::new();
        let task = Task::new(user, "write tests");
        store.create(task.clone());
        assert_eq!(store.get(&task.id).unwrap().name, "write tests");
    }

    #[test]
    fn update_on_missing_task_returns_none() {
        let store = InMemoryTaskStore::new();
        let task = Task::new(UserId::new(), "ghost");
        assert!(store.update(task).is_none());
    }

    #[test]
    fn list_by_user_excludes_other_users() {
        let store = InMemoryTaskStore::new();
        let a = UserId::new();
        let b = UserId::new();
        store.create(Task::new(a, "a-task"));
        store.create(Task::new(b, "b-task"));
        assert_eq!(store.list_by_user(&a).len(), 1);
    }

    #[test]
    fn find_report_matches_user_and_date() {
        let store = InMemoryTaskStore::new();
        let user = UserId::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let report = Report {
            id: ReportId::new(),
            user_id: user,
            date,
            created_at: Utc::now(),
            tasks: vec![],
            metrics: ProductivityMetrics::default(),
            ai_summary: None,
        };
        store.create_report(report);
        assert!(store.find_report(&user, date).is_some());
    }
}
