//! Error taxonomy (spec.md §7). Each enum is owned by the crate that can
//! actually raise it, mirroring the teacher's per-crate split between
//! `ScheduleError`, `RenderError`, `GraphError`, and `CpmError` rather than
//! one mega-enum.

use crate::ids::TaskId;
use thiserror::Error;

/// Errors raised by dependency resolution, ordering, packing, and the
/// schedule service that orchestrates them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("field '{field}' failed validation: {reason}")]
    Validation { field: String, reason: String },

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("dependency cycle detected, involving edge {from} -> {to}")]
    CycleDetected { from: TaskId, to: TaskId },

    #[error("break anchor task {0} not found or not scheduled")]
    NoSuchAnchor(TaskId),

    #[error("duration {given} below minimum {minimum} minutes")]
    InvalidDuration { given: i64, minimum: i64 },

    #[error("partial apply: {failed} of {attempted} updates failed")]
    PartialApply {
        attempted: usize,
        failed: usize,
        succeeded_ids: Vec<TaskId>,
    },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("operation exceeded its deadline")]
    Timeout,
}

/// Errors raised by the execution tracker (spec.md §4.5).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("actual_end ({end:?}) precedes actual_start ({start:?})")]
    EndBeforeStart {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("illegal status transition from {from:?} to {to:?}")]
    IllegalTransition {
        from: crate::task::TaskStatus,
        to: crate::task::TaskStatus,
    },
}

/// Errors raised by the report generator (spec.md §4.8).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("no candidate tasks for user on the requested date")]
    NoTasksForDate,

    #[error("report {0} not found")]
    NotFound(crate::ids::ReportId),
}

/// Errors raised by a [`crate::SummaryProvider`] implementation. The core
/// never blocks report generation on these: callers fall back to the
/// deterministic template (spec.md §4.8 step 5).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("summary provider timed out")]
    Timeout,

    #[error("summary provider failed: {0}")]
    ProviderFailed(String),
}
