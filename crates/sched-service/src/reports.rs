//! `ReportGenerator` (spec.md §4.8): turns a day's scheduled tasks into an
//! immutable [`Report`], falling back to the deterministic template summary
//! whenever the injected [`SummaryProvider`] fails or times out.

use chrono::NaiveDate;
use sched_core::{
    time::to_local_date, Clock, ProductivityMetrics, Report, ReportError, ReportId, SchedulerConfig,
    SummaryProvider, Task, TaskStore, TaskSummary, UserId,
};
use std::sync::Arc;
use tracing::warn;

pub struct ReportGenerator {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    summary_provider: Arc<dyn SummaryProvider>,
}

impl ReportGenerator {
    pub fn new(
        store: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
        summary_provider: Arc<dyn SummaryProvider>,
    ) -> Self {
        Self { store, clock, config, summary_provider }
    }

    /// Generate and persist a report for `user_id` on `date` (spec.md §4.8
    /// steps 1-5). If a report already exists for this `(user_id, date)`,
    /// it is returned unchanged (step 1; P8 report immutability) rather
    /// than recomputed.
    pub fn generate(&self, user_id: UserId, date: NaiveDate) -> Result<Report, ReportError> {
        if let Some(existing) = self.store.find_report(&user_id, date) {
            return Ok(existing);
        }

        let all = self.store.list_by_user(&user_id);
        // spec.md §4.8 step 2: union of tasks scheduled on `date`, with a
        // deadline on `date`, or created on `date`. Breaks are kept as
        // TaskSummary rows if scheduled but excluded from the metrics set.
        let candidates: Vec<Task> = all
            .into_iter()
            .filter(|t| {
                let on_date = |at: chrono::DateTime<chrono::Utc>| to_local_date(at, self.config.zone_offset_minutes) == date;
                t.scheduled_start_time.is_some_and(on_date)
                    || t.deadline.is_some_and(on_date)
                    || on_date(t.created_at)
            })
            .collect();

        if candidates.is_empty() {
            return Err(ReportError::NoTasksForDate);
        }

        let summaries: Vec<TaskSummary> = candidates.iter().map(task_summary).collect();
        let metrics_summaries: Vec<TaskSummary> =
            candidates.iter().filter(|t| !t.is_break()).map(task_summary).collect();
        let metrics = ProductivityMetrics::compute(&metrics_summaries);

        let ai_summary = match self.summary_provider.summarize(&metrics, &summaries) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(error = %err, "summary provider failed, falling back to template");
                Some(sched_core::report::template_summary(&metrics, &summaries))
            }
        };

        let report = Report {
            id: ReportId::new(),
            user_id,
            date,
            created_at: self.clock.now(),
            tasks: summaries,
            metrics,
            ai_summary,
        };

        Ok(self.store.create_report(report))
    }
}

/// Derive a [`TaskSummary`] row (spec.md §4.8 steps 1-3: delay is measured
/// on the start edge, positive meaning "started late").
fn task_summary(task: &Task) -> TaskSummary {
    let delay = match (task.scheduled_start_time, task.actual_start_time) {
        (Some(scheduled), Some(actual)) => Some((actual - scheduled).num_minutes()),
        _ => None,
    };
    let actual_duration = match (task.actual_start_time, task.actual_end_time) {
        (Some(s), Some(e)) => Some((e - s).num_minutes()),
        _ => None,
    };

    TaskSummary {
        task_id: task.id,
        name: task.name.clone(),
        scheduled_duration: task.duration_minutes,
        actual_duration,
        scheduled_start: task.scheduled_start_time,
        scheduled_end: task.scheduled_end_time,
        actual_start: task.actual_start_time,
        actual_end: task.actual_end_time,
        status: task.status,
        priority: task.priority,
        delay,
    }
}
