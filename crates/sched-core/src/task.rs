//! `Task` domain type (spec.md §3).

use crate::error::ScheduleError;
use crate::ids::{TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Status of a task (spec.md §3: `{pending, in_progress, completed,
/// cancelled, break}`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Break,
}

impl TaskStatus {
    /// Whether `self -> next` is an allowed transition per the DAG in
    /// spec.md §4.5 (`pending -> in_progress -> completed`,
    /// `pending -> cancelled`, `in_progress -> cancelled`). Setting `break`
    /// is only reachable through the schedule service, not the tracker.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Pending, InProgress) => true,
            (Pending, Cancelled) => true,
            (InProgress, Completed) => true,
            (InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

/// A schedulable unit of work belonging to one user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Positive integer minutes (invariant I1).
    pub duration_minutes: i64,
    /// 1..=5, 5 highest (invariant I2).
    pub priority: u8,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
    /// Ids of tasks this task depends on; restricted to the same user
    /// (invariant I4, enforced by the resolver over the candidate set).
    pub dependencies: HashSet<TaskId>,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: Option<DateTime<Utc>>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task with no schedule. `created_at`/`updated_at`
    /// are placeholders until the store assigns real timestamps
    /// (spec.md §3: "set by store").
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        let now = DateTime::<Utc>::default();
        Self {
            id: TaskId::new(),
            user_id,
            name: name.into(),
            description: None,
            duration_minutes: 1,
            priority: 3,
            status: TaskStatus::Pending,
            deadline: None,
            dependencies: HashSet::new(),
            scheduled_start_time: None,
            scheduled_end_time: None,
            actual_start_time: None,
            actual_end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn depends_on(mut self, id: TaskId) -> Self {
        self.dependencies.insert(id);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// True if scheduled (both endpoints present per invariant I3).
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start_time.is_some() && self.scheduled_end_time.is_some()
    }

    pub fn clear_schedule(&mut self) {
        self.scheduled_start_time = None;
        self.scheduled_end_time = None;
    }

    pub fn set_schedule(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.scheduled_start_time = Some(start);
        self.scheduled_end_time = Some(end);
    }

    /// Construct a `break` task (spec.md §4.7): owned by a user, scheduled,
    /// no dependencies, excluded from ordering and metrics.
    pub fn new_break(user_id: UserId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let minutes = (end - start).num_minutes().max(1);
        let mut task = Task::new(user_id, "Break").duration(minutes);
        task.status = TaskStatus::Break;
        task.set_schedule(start, end);
        task
    }

    pub fn is_break(&self) -> bool {
        self.status == TaskStatus::Break
    }

    /// Validate the invariants this type alone can check (I1, I2, I3, I5).
    /// I4 (acyclicity) and I6 (no cross-task overlap) require the broader
    /// candidate set and are enforced by the resolver / packer.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.duration_minutes < 1 {
            return Err(ScheduleError::Validation {
                field: "duration_minutes".into(),
                reason: "must be >= 1".into(),
            });
        }
        if !(1..=5).contains(&self.priority) {
            return Err(ScheduleError::Validation {
                field: "priority".into(),
                reason: "must be in 1..=5".into(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ScheduleError::Validation {
                field: "name".into(),
                reason: "must be non-empty".into(),
            });
        }
        match (self.scheduled_start_time, self.scheduled_end_time) {
            (Some(s), Some(e)) => {
                let minutes = (e - s).num_minutes();
                if (minutes - self.duration_minutes).abs() > 1 {
                    return Err(ScheduleError::Validation {
                        field: "scheduled_end_time".into(),
                        reason: "interval length must equal duration (within 1 minute)".into(),
                    });
                }
            }
            (None, None) => {}
            _ => {
                return Err(ScheduleError::Validation {
                    field: "scheduled_start_time".into(),
                    reason: "scheduled_start_time and scheduled_end_time must both be present or both absent".into(),
                });
            }
        }
        if let (Some(s), Some(e)) = (self.actual_start_time, self.actual_end_time) {
            if e < s {
                return Err(ScheduleError::Validation {
                    field: "actual_end_time".into(),
                    reason: "must be >= actual_start_time".into(),
                });
            }
        }
        if self.is_break() && !self.dependencies.is_empty() {
            return Err(ScheduleError::Validation {
                field: "dependencies".into(),
                reason: "break tasks may not have dependencies".into(),
            });
        }
        if self.is_break() && !self.is_scheduled() {
            return Err(ScheduleError::Validation {
                field: "scheduled_start_time".into(),
                reason: "break tasks must have a scheduled interval".into(),
            });
        }
        Ok(())
    }
}
