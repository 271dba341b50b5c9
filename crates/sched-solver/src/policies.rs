//! Ordering policies (spec.md §4.2): data-driven comparator contracts
//! selected by value rather than dispatched through a trait object, mirroring
//! how the teacher keys `TaskConstraint` and `DependencyType` off plain enums
//! rather than a `dyn` hierarchy.

use chrono::{DateTime, Utc};
use sched_core::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which comparator the resolver uses as the global pre-topological order
/// over a candidate set (spec.md §4.2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// Highest composite score first; see [`composite_score`].
    #[default]
    RoundRobin,
    /// Earliest `created_at` first.
    Fcfs,
    /// Shortest `duration_minutes` first.
    Sjf,
    /// Longest `duration_minutes` first.
    Ljf,
    /// Highest `priority` first.
    Priority,
}

impl OrderingPolicy {
    /// Total order used to sort a ready set. Ties always fall through to
    /// `created_at` ascending so the result is deterministic.
    pub fn compare(&self, a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
        match self {
            OrderingPolicy::RoundRobin => score_desc(a, b, now)
                .then_with(|| by_deadline_asc(a, b))
                .then_with(|| by_created_at(a, b)),
            OrderingPolicy::Fcfs => by_created_at(a, b),
            OrderingPolicy::Sjf => a
                .duration_minutes
                .cmp(&b.duration_minutes)
                .then_with(|| by_priority_desc(a, b))
                .then_with(|| by_created_at(a, b)),
            OrderingPolicy::Ljf => b
                .duration_minutes
                .cmp(&a.duration_minutes)
                .then_with(|| by_priority_desc(a, b))
                .then_with(|| by_created_at(a, b)),
            OrderingPolicy::Priority => by_priority_desc(a, b)
                .then_with(|| by_deadline_asc(a, b))
                .then_with(|| by_created_at(a, b)),
        }
    }
}

fn score_desc(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
    composite_score(b, now)
        .partial_cmp(&composite_score(a, now))
        .unwrap_or(Ordering::Equal)
}

fn by_created_at(a: &Task, b: &Task) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn by_priority_desc(a: &Task, b: &Task) -> Ordering {
    b.priority.cmp(&a.priority)
}

/// Earlier deadline first; tasks with no deadline sort last.
fn by_deadline_asc(a: &Task, b: &Task) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `S = priority * 10 + deadline_pressure` (spec.md §4.2). Higher is more
/// urgent. A task with no deadline, or one already past, contributes no
/// pressure term.
pub fn composite_score(task: &Task, now: DateTime<Utc>) -> f64 {
    task.priority as f64 * 10.0 + deadline_pressure(task, now)
}

/// `max(0, 10 - hours_until_deadline / 2.4)` (spec.md §4.2); zero once the
/// deadline has passed or is absent — lateness itself is a report-time
/// concern (§4.8), not an ordering one.
pub fn deadline_pressure(task: &Task, now: DateTime<Utc>) -> f64 {
    match task.deadline {
        Some(deadline) if deadline > now => {
            let hours = (deadline - now).num_minutes() as f64 / 60.0;
            (10.0 - hours / 2.4).max(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::UserId;

    fn task(duration: i64, priority: u8, created_offset_secs: i64) -> Task {
        let user = UserId::new();
        let base = DateTime::parse_from_rfc3339("2026-01-06T00:00:00Z").unwrap().with_timezone(&Utc);
        Task::new(user, "t")
            .duration(duration)
            .priority(priority)
            .created_at(base + chrono::Duration::seconds(created_offset_secs))
    }

    #[test]
    fn sjf_orders_by_duration_ascending() {
        let now = Utc::now();
        let short = task(10, 3, 0);
        let long = task(90, 3, 1);
        assert_eq!(OrderingPolicy::Sjf.compare(&short, &long, now), Ordering::Less);
        assert_eq!(OrderingPolicy::Sjf.compare(&long, &short, now), Ordering::Greater);
    }

    #[test]
    fn ljf_orders_by_duration_descending() {
        let now = Utc::now();
        let short = task(10, 3, 0);
        let long = task(90, 3, 1);
        assert_eq!(OrderingPolicy::Ljf.compare(&long, &short, now), Ordering::Less);
    }

    #[test]
    fn priority_orders_high_first_then_earlier_deadline() {
        let now = Utc::now();
        let mut high = task(30, 5, 0);
        let mut low = task(30, 1, 1);
        let soon = now + chrono::Duration::hours(1);
        let later = now + chrono::Duration::hours(10);
        high.deadline = Some(later);
        low.deadline = Some(soon);
        assert_eq!(OrderingPolicy::Priority.compare(&high, &low, now), Ordering::Less);
    }

    #[test]
    fn fcfs_orders_by_created_at() {
        let now = Utc::now();
        let earlier = task(30, 3, 0);
        let later = task(30, 3, 100);
        assert_eq!(OrderingPolicy::Fcfs.compare(&earlier, &later, now), Ordering::Less);
    }

    #[test]
    fn deadline_pressure_is_zero_without_deadline() {
        let now = Utc::now();
        let t = task(30, 3, 0);
        assert_eq!(deadline_pressure(&t, now), 0.0);
    }

    #[test]
    fn deadline_pressure_rises_as_deadline_approaches() {
        let now = Utc::now();
        let mut t = task(30, 3, 0);
        t.deadline = Some(now + chrono::Duration::hours(1));
        let near = deadline_pressure(&t, now);
        t.deadline = Some(now + chrono::Duration::hours(20));
        let far = deadline_pressure(&t, now);
        assert!(near > far);
    }

    #[test]
    fn round_robin_breaks_ties_by_created_at() {
        let now = Utc::now();
        let earlier = task(30, 3, 0);
        let later = task(30, 3, 100);
        assert_eq!(OrderingPolicy::RoundRobin.compare(&earlier, &later, now), Ordering::Less);
    }

    #[test]
    fn round_robin_breaks_equal_score_ties_by_deadline_before_created_at() {
        let now = Utc::now();
        // Equal priority and no pending deadline pressure (one deadline
        // already past, one never set) give both tasks the same composite
        // score, so the earlier deadline must win before created_at does.
        let mut has_deadline = task(30, 3, 100);
        has_deadline.deadline = Some(now - chrono::Duration::hours(1));
        let no_deadline = task(30, 3, 0);
        assert_eq!(
            OrderingPolicy::RoundRobin.compare(&has_deadline, &no_deadline, now),
            Ordering::Less
        );
    }
}
