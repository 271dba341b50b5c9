//! Dependency Resolver (spec.md §4.1).
//!
//! Takes a candidate set of tasks for one user and produces a linear order
//! in which dependencies precede their dependents. The comparator from an
//! [`OrderingPolicy`] defines a single *global* pre-topological order over
//! the whole candidate set (not a per-level sort); the resolver then walks
//! that order and promotes each task's unplaced dependencies immediately
//! ahead of it, so "shortest job first" or "highest priority" describes the
//! schedule as a whole rather than just the next topological wave. Cycle
//! detection keeps the in-degree / zero-queue shape of the teacher's
//! `dag::topological_sort`, applied to the subgraph induced by the
//! candidate set.

use crate::policies::OrderingPolicy;
use chrono::{DateTime, Utc};
use sched_core::{ScheduleError, Task, TaskId, TaskStatus};
use std::collections::{HashMap, HashSet};

/// Resolve `candidates` into an admissible, dependency-respecting order.
///
/// `is_completed` answers whether a task id outside the candidate set has
/// already finished (invariant I4's acyclicity applies only within the
/// candidate set; cross-day dependencies are resolved against task status).
///
/// Tasks whose dependencies are unfinished and not part of the candidate
/// set are held out of the result entirely (spec.md §4.2), along with any
/// task that transitively depends on a held-out task. A true cycle among
/// the candidate set itself is a hard error.
pub fn resolve(
    candidates: &[Task],
    is_completed: impl Fn(TaskId) -> bool,
    policy: OrderingPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, ScheduleError> {
    let by_id: HashMap<TaskId, &Task> = candidates.iter().map(|t| (t.id, t)).collect();
    let candidate_ids: HashSet<TaskId> = by_id.keys().copied().collect();

    detect_cycle(candidates, &candidate_ids)?;

    // A task is blocked if it has an externally unmet dependency, or if any
    // of its in-candidate-set dependencies is itself blocked; this cascades
    // hold-outs to dependents without needing a separate queue pass.
    let mut blocked: HashMap<TaskId, bool> = HashMap::new();
    for id in &candidate_ids {
        is_blocked(*id, &by_id, &candidate_ids, &is_completed, &mut blocked);
    }

    let mut admitted: Vec<&Task> = candidates.iter().filter(|t| !blocked[&t.id]).collect();
    admitted.sort_by(|a, b| policy.compare(a, b, now));

    let mut placed: HashSet<TaskId> = HashSet::with_capacity(admitted.len());
    let mut result: Vec<Task> = Vec::with_capacity(admitted.len());
    for task in &admitted {
        place(task, &by_id, &candidate_ids, &mut placed, &mut result, policy, now);
    }

    Ok(result)
}

/// Memoized check: does `id` have an unmet dependency, directly or
/// transitively through the candidate set?
fn is_blocked(
    id: TaskId,
    by_id: &HashMap<TaskId, &Task>,
    candidate_ids: &HashSet<TaskId>,
    is_completed: &impl Fn(TaskId) -> bool,
    memo: &mut HashMap<TaskId, bool>,
) -> bool {
    if let Some(&cached) = memo.get(&id) {
        return cached;
    }
    let task = by_id[&id];
    let mut blocked = false;
    for dep in &task.dependencies {
        let dep_blocked = if candidate_ids.contains(dep) {
            is_blocked(*dep, by_id, candidate_ids, is_completed, memo)
        } else {
            !is_completed(*dep)
        };
        if dep_blocked {
            blocked = true;
            break;
        }
    }
    memo.insert(id, blocked);
    blocked
}

/// Append `task` to `result`, first recursively placing any not-yet-placed
/// dependencies (in the same global [`OrderingPolicy`] order) immediately
/// ahead of it. Dependencies are guaranteed present in `by_id` and free of
/// cycles by the time this runs (checked by [`detect_cycle`] and filtered
/// by the blocked-task pass in [`resolve`]).
fn place<'a>(
    task: &'a Task,
    by_id: &HashMap<TaskId, &'a Task>,
    candidate_ids: &HashSet<TaskId>,
    placed: &mut HashSet<TaskId>,
    result: &mut Vec<Task>,
    policy: OrderingPolicy,
    now: DateTime<Utc>,
) {
    if !placed.insert(task.id) {
        return;
    }

    let mut deps: Vec<&Task> = task
        .dependencies
        .iter()
        .filter(|dep| candidate_ids.contains(dep))
        .map(|dep| by_id[dep])
        .collect();
    deps.sort_by(|a, b| policy.compare(a, b, now));
    for dep in deps {
        place(dep, by_id, candidate_ids, placed, result, policy, now);
    }

    result.push(task.clone());
}

/// Structural cycle check over dependency edges internal to `candidate_ids`
/// only (external references are out of scope for acyclicity — invariant
/// I4 is defined per-user over the whole task graph, but a cycle can only
/// ever be introduced among tasks the caller controls together).
fn detect_cycle(candidates: &[Task], candidate_ids: &HashSet<TaskId>) -> Result<(), ScheduleError> {
    let mut in_degree: HashMap<TaskId, usize> = candidate_ids.iter().map(|id| (*id, 0)).collect();
    let mut successors: HashMap<TaskId, Vec<TaskId>> =
        candidate_ids.iter().map(|id| (*id, Vec::new())).collect();

    for task in candidates {
        for dep in &task.dependencies {
            if candidate_ids.contains(dep) {
                *in_degree.get_mut(&task.id).expect("tracked") += 1;
                successors.get_mut(dep).expect("tracked").push(task.id);
            }
        }
    }

    let mut queue: Vec<TaskId> = in_degree.iter().filter(|(_, &d)| d == 0).map(|(id, _)| *id).collect();
    let mut visited = 0usize;
    while let Some(id) = queue.pop() {
        visited += 1;
        for succ in &successors[&id] {
            let degree = in_degree.get_mut(succ).expect("tracked");
            *degree -= 1;
            if *degree == 0 {
                queue.push(*succ);
            }
        }
    }

    if visited != candidate_ids.len() {
        let (to, from) = in_degree
            .iter()
            .find(|(_, &d)| d > 0)
            .map(|(id, _)| {
                let dependent = candidates.iter().find(|t| t.id == *id).expect("present");
                let edge_from = dependent
                    .dependencies
                    .iter()
                    .find(|d| candidate_ids.contains(d))
                    .copied()
                    .unwrap_or(*id);
                (*id, edge_from)
            })
            .expect("cycle implies a remaining node");
        return Err(ScheduleError::CycleDetected { from, to });
    }

    Ok(())
}

/// True if `status` counts as "done" for admission purposes.
pub fn is_done(status: TaskStatus) -> bool {
    status == TaskStatus::Completed
}
