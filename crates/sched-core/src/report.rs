//! `Report`, `TaskSummary`, and `ProductivityMetrics` (spec.md §3, §4.8).

use crate::ids::{ReportId, TaskId, UserId};
use crate::task::TaskStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Derived, immutable per-task summary row (spec.md §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskSummary {
    pub task_id: TaskId,
    pub name: String,
    pub scheduled_duration: i64,
    pub actual_duration: Option<i64>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: u8,
    /// Signed minutes, positive = late (spec.md §4.8 step 3).
    pub delay: Option<i64>,
}

/// Derived productivity metrics for a day (spec.md §3, §4.8 step 4).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductivityMetrics {
    pub completion_rate: f64,
    pub on_time_rate: f64,
    pub avg_delay: f64,
    pub productivity_score: f64,
    pub total_scheduled_time: i64,
    pub total_actual_time: i64,
    pub time_efficiency: f64,
}

impl Default for ProductivityMetrics {
    fn default() -> Self {
        Self {
            completion_rate: 0.0,
            on_time_rate: 0.0,
            avg_delay: 0.0,
            productivity_score: 0.0,
            total_scheduled_time: 0,
            total_actual_time: 0,
            time_efficiency: 0.0,
        }
    }
}

impl ProductivityMetrics {
    /// Compute metrics over the non-break subset of a day's tasks (spec.md
    /// §4.8 step 4). `summaries` must already exclude `break` tasks.
    pub fn compute(summaries: &[TaskSummary]) -> Self {
        let n = summaries.len();
        if n == 0 {
            return Self::default();
        }

        let completed: Vec<&TaskSummary> = summaries
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();

        let completion_rate = 100.0 * completed.len() as f64 / n as f64;

        let on_time = completed
            .iter()
            .filter(|t| t.delay.map_or(true, |d| d <= 0))
            .count();
        let on_time_rate = 100.0 * on_time as f64 / n as f64;

        let delays: Vec<i64> = completed.iter().filter_map(|t| t.delay).collect();
        let avg_delay = if delays.is_empty() {
            0.0
        } else {
            delays.iter().sum::<i64>() as f64 / delays.len() as f64
        };

        let total_scheduled_time: i64 = summaries.iter().map(|t| t.scheduled_duration).sum();
        let total_actual_time: i64 = summaries.iter().filter_map(|t| t.actual_duration).sum();

        let time_efficiency = if total_actual_time > 0 {
            total_scheduled_time as f64 / total_actual_time as f64
        } else {
            0.0
        };

        let productivity_score = (completion_rate * 0.5
            + on_time_rate * 0.3
            + (time_efficiency.min(2.0) / 2.0) * 100.0 * 0.2)
            .clamp(0.0, 100.0);

        Self {
            completion_rate,
            on_time_rate,
            avg_delay,
            productivity_score,
            total_scheduled_time,
            total_actual_time,
            time_efficiency,
        }
    }
}

/// A generated daily report (spec.md §3). Immutable once stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<TaskSummary>,
    pub metrics: ProductivityMetrics,
    pub ai_summary: Option<String>,
}

/// Read-side projection bundling a day's scheduled tasks with simple counts
/// (SPEC_FULL.md §3 supplement). Not persisted; derived on demand from
/// `ScheduleService::daily`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub scheduled_count: usize,
    pub break_count: usize,
    pub unscheduled_count: usize,
}

/// Deterministic fallback summary (spec.md §4.8 step 5): counts,
/// percentages, and an encouragement tier on score thresholds 80/60/below.
pub fn template_summary(metrics: &ProductivityMetrics, tasks: &[TaskSummary]) -> String {
    let completed = tasks.iter().filter(|t| t.status == TaskStatus::Completed).count();
    let tier = if metrics.productivity_score >= 80.0 {
        "Excellent work today — keep the momentum going."
    } else if metrics.productivity_score >= 60.0 {
        "Solid progress today, with room to tighten up timing."
    } else {
        "A tougher day — consider lighter scheduling tomorrow."
    };
    format!(
        "Completed {completed} of {total} tasks ({completion_rate:.0}% completion, {on_time_rate:.0}% on time). \
Productivity score: {score:.0}/100. {tier}",
        completed = completed,
        total = tasks.len(),
        completion_rate = metrics.completion_rate,
        on_time_rate = metrics.on_time_rate,
        score = metrics.productivity_score,
        tier = tier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(status: TaskStatus, scheduled: i64, actual: Option<i64>, delay: Option<i64>) -> TaskSummary {
        TaskSummary {
            task_id: TaskId::new(),
            name: "t".into(),
            scheduled_duration: scheduled,
            actual_duration: actual,
            scheduled_start: None,
            scheduled_end: None,
            actual_start: None,
            actual_end: None,
            status,
            priority: 3,
            delay,
        }
    }

    #[test]
    fn empty_set_yields_zeroed_metrics() {
        let m = ProductivityMetrics::compute(&[]);
        assert_eq!(m, ProductivityMetrics::default());
    }

    #[test]
    fn scenario_s5_from_spec() {
        // A: scheduled [09:00,10:00] actual [09:15,10:20] -> delay +15
        // B: scheduled [10:00,10:30] actual [10:30,10:55] -> delay +30
        let a = summary(TaskStatus::Completed, 60, Some(65), Some(15));
        let b = summary(TaskStatus::Completed, 30, Some(25), Some(30));
        let metrics = ProductivityMetrics::compute(&[a, b]);

        assert_eq!(metrics.completion_rate, 100.0);
        assert_eq!(metrics.on_time_rate, 0.0);
        assert_eq!(metrics.avg_delay, 22.5);
        assert_eq!(metrics.total_scheduled_time, 90);
        assert_eq!(metrics.total_actual_time, 90);
        assert_eq!(metrics.time_efficiency, 1.0);
        assert_eq!(metrics.productivity_score, 60.0);
    }

    #[test]
    fn metrics_bounds_p7() {
        let tasks: Vec<TaskSummary> = (0..5)
            .map(|i| summary(TaskStatus::Completed, 30, Some(10 + i * 5), Some(-5)))
            .collect();
        let m = ProductivityMetrics::compute(&tasks);
        assert!((0.0..=100.0).contains(&m.completion_rate));
        assert!((0.0..=100.0).contains(&m.on_time_rate));
        assert!((0.0..=100.0).contains(&m.productivity_score));
        assert!(m.time_efficiency >= 0.0);
    }

    #[test]
    fn template_summary_never_empty() {
        let metrics = ProductivityMetrics::default();
        let text = template_summary(&metrics, &[]);
        assert!(!text.is_empty());
    }
}
