//! `ExecutionTracker` (spec.md §4.5): applies tagged-variant patches against
//! the finite status-transition DAG owned by [`sched_core::TaskStatus`].

use chrono::{DateTime, Utc};
use sched_core::{Clock, ExecutionError, Task, TaskId, TaskStatus, TaskStore};
use std::sync::Arc;
use tracing::instrument;

/// A mutation requested against a task's execution state.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskPatch {
    /// `pending -> in_progress`; records `actual_start_time = now`.
    Start,
    /// `in_progress -> completed`; records `actual_end_time` if given.
    /// Completing without actuals is allowed (spec.md §4.5): metrics treat
    /// an absent `actual_end_time` as not measured rather than rejecting
    /// the completion.
    Complete { actual_end: Option<DateTime<Utc>> },
    /// `{pending, in_progress} -> cancelled`.
    Cancel,
}

impl TaskPatch {
    fn target_status(&self) -> TaskStatus {
        match self {
            TaskPatch::Start => TaskStatus::InProgress,
            TaskPatch::Complete { .. } => TaskStatus::Completed,
            TaskPatch::Cancel => TaskStatus::Cancelled,
        }
    }
}

pub struct ExecutionTracker {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl ExecutionTracker {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Apply `patch` to `task_id`, enforcing the transition DAG and the
    /// `actual_end >= actual_start` ordering invariant.
    #[instrument(skip(self))]
    pub fn apply(&self, task_id: TaskId, patch: TaskPatch) -> Result<Task, ExecutionError> {
        let mut task = self.store.get(&task_id).ok_or(ExecutionError::NotFound(task_id))?;
        let target = patch.target_status();
        if !task.status.can_transition_to(target) {
            return Err(ExecutionError::IllegalTransition { from: task.status, to: target });
        }

        match patch {
            TaskPatch::Start => {
                task.actual_start_time = Some(self.clock.now());
            }
            TaskPatch::Complete { actual_end } => {
                if let (Some(start), Some(end)) = (task.actual_start_time, actual_end) {
                    if end < start {
                        return Err(ExecutionError::EndBeforeStart { start, end });
                    }
                }
                task.actual_end_time = actual_end;
            }
            TaskPatch::Cancel => {}
        }
        task.status = target;
        task.updated_at = self.clock.now();

        self.store.update(task).ok_or(ExecutionError::NotFound(task_id))
    }
}
