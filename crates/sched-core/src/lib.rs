//! # sched-core
//!
//! Core domain model and traits for the daytrack personal task-scheduling
//! engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `Report`, `TaskSummary`, `ProductivityMetrics`
//! - Core traits: `TaskStore`, `Clock`, `SummaryProvider`
//! - Identifier and time primitives shared by every other crate in the
//!   workspace
//! - The error taxonomy raised by the scheduling and reporting subsystems
//!
//! ## Example
//!
//! ```rust
//! use sched_core::{Task, TaskStatus, UserId};
//!
//! let user = UserId::new();
//! let task = Task::new(user, "write quarterly report").duration(60).priority(4);
//! assert_eq!(task.status, TaskStatus::Pending);
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod report;
pub mod task;
pub mod time;

pub use config::SchedulerConfig;
pub use error::{ExecutionError, ReportError, ScheduleError, SummaryError};
pub use ids::{ReportId, TaskId, UserId};
pub use report::{DaySummary, ProductivityMetrics, Report, TaskSummary};
pub use task::{Task, TaskStatus};
pub use time::Clock;

/// Document-oriented storage interface the scheduling core depends on.
///
/// This is deliberately not transactional (see `spec.md` §5): callers that
/// need multi-document atomicity compute updates in memory and apply them
/// in a stable order, tolerating `PartialApply`.
pub trait TaskStore: Send + Sync {
    fn create(&self, task: Task) -> Task;
    fn get(&self, id: &TaskId) -> Option<Task>;
    fn update(&self, task: Task) -> Option<Task>;
    fn delete(&self, id: &TaskId) -> bool;
    /// All tasks belonging to a user, in unspecified order.
    fn list_by_user(&self, user_id: &UserId) -> Vec<Task>;

    fn create_report(&self, report: Report) -> Report;
    fn get_report(&self, id: &ReportId) -> Option<Report>;
    fn find_report(&self, user_id: &UserId, date: chrono::NaiveDate) -> Option<Report>;
    fn list_reports(&self, user_id: &UserId) -> Vec<Report>;
}

/// Produces a short natural-language paragraph from a day's metrics.
///
/// Contract (spec.md §4.9): pure function of its inputs when the
/// deterministic fallback is in use, bounded by the caller's timeout, never
/// allowed to block report generation — callers are expected to catch
/// provider errors and fall back to [`report::template_summary`].
pub trait SummaryProvider: Send + Sync {
    fn summarize(&self, metrics: &ProductivityMetrics, tasks: &[TaskSummary]) -> Result<String, SummaryError>;
}

/// Deterministic template implementation, mandatory per spec.md §4.8 step 5.
pub struct TemplateSummaryProvider;

impl SummaryProvider for TemplateSummaryProvider {
    fn summarize(&self, metrics: &ProductivityMetrics, tasks: &[TaskSummary]) -> Result<String, SummaryError> {
        Ok(report::template_summary(metrics, tasks))
    }
}
