//! daytrack CLI - Personal Task-Scheduling Engine
//!
//! Command-line interface over the `sched-core`/`sched-solver`/
//! `sched-service` stack. Since a persistence layer is out of scope for the
//! engine itself (spec.md §1 Non-goals), this binary keeps its own
//! between-invocation state as a JSON snapshot file, the same way the
//! teacher CLI reads and writes a project file end to end.

mod snapshot;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sched_core::{Clock, SchedulerConfig, TaskId, TaskStore, UserId};
use sched_service::{ExecutionTracker, ReportGenerator, ScheduleService, TaskPatch};
use sched_solver::OrderingPolicy;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "daytrack")]
#[command(author, version, about = "Personal task-scheduling engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the JSON state snapshot (created on first use)
    #[arg(long, default_value = "daytrack-state.json", global = true)]
    state: PathBuf,

    /// Path to a TOML deployment configuration (defaults are UTC, 09:00-17:00)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Generate, inspect, and adjust a day's timeline
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Record execution progress against a task
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },
    /// Generate and inspect productivity reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Create a new task
    Add {
        /// Owning user id, or "new" to mint one
        #[arg(long, default_value = "new")]
        user: String,
        /// Task name
        name: String,
        /// Duration in minutes
        #[arg(long, default_value = "30")]
        duration: i64,
        /// Priority 1..=5, 5 highest
        #[arg(long, default_value = "3")]
        priority: u8,
        /// RFC3339 deadline
        #[arg(long)]
        deadline: Option<String>,
        /// Ids of tasks this one depends on
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },
    /// List a user's tasks
    List {
        #[arg(long)]
        user: String,
    },
    /// Show one task
    Get { id: String },
    /// Cancel a pending or in-progress task
    Cancel { id: String },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// Regenerate a day's schedule from the candidate task pool
    Generate {
        #[arg(long)]
        user: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// round-robin, fcfs, sjf, ljf, priority
        #[arg(long, default_value = "round-robin")]
        policy: String,
    },
    /// Clear a day's schedule without rebuilding it
    Reset {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: String,
    },
    /// List a day's scheduled tasks, ordered by start time
    Daily {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: String,
    },
    /// Summarize a day's schedule (scheduled/break/unscheduled counts)
    DaySummary {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: String,
    },
    /// Insert a break after a scheduled task, shifting later tasks forward
    InsertBreak {
        #[arg(long)]
        anchor: String,
        #[arg(long, default_value = "15")]
        duration: i64,
    },
}

#[derive(Subcommand)]
enum TrackCommands {
    /// pending -> in_progress
    Start { id: String },
    /// in_progress -> completed
    Complete {
        id: String,
        /// RFC3339 actual end time; defaults to now unless --no-actuals
        #[arg(long)]
        actual_end: Option<String>,
        /// Complete without recording actuals; metrics treat this task as not measured
        #[arg(long)]
        no_actuals: bool,
    },
    /// {pending, in_progress} -> cancelled
    Cancel { id: String },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Generate a new report for a day
    Generate {
        #[arg(long)]
        user: String,
        #[arg(long)]
        date: String,
    },
    /// Show one report
    Get { id: String },
    /// List a user's reports
    List {
        #[arg(long)]
        user: String,
    },
}

fn parse_policy(raw: &str) -> Result<OrderingPolicy> {
    match raw {
        "round-robin" => Ok(OrderingPolicy::RoundRobin),
        "fcfs" => Ok(OrderingPolicy::Fcfs),
        "sjf" => Ok(OrderingPolicy::Sjf),
        "ljf" => Ok(OrderingPolicy::Ljf),
        "priority" => Ok(OrderingPolicy::Priority),
        other => anyhow::bail!("unknown ordering policy '{other}'"),
    }
}

fn parse_user(raw: &str) -> Result<UserId> {
    UserId::from_str(raw).with_context(|| format!("'{raw}' is not a valid user id"))
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("'{raw}' is not a valid task id"))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

fn parse_instant(raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .with_context(|| format!("'{raw}' is not an RFC3339 timestamp"))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            SchedulerConfig::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SchedulerConfig::default(),
    };

    let store = Arc::new(snapshot::load(&cli.state)?);
    let clock = Arc::new(sched_core::time::SystemClock);

    let result = run(&cli.command, &store, clock, config);

    snapshot::save(&cli.state, &store)?;
    result
}

fn run(
    command: &Commands,
    store: &Arc<sched_service::InMemoryTaskStore>,
    clock: Arc<sched_core::time::SystemClock>,
    config: SchedulerConfig,
) -> Result<()> {
    match command {
        Commands::Task { command } => run_task(command, store, clock.as_ref()),
        Commands::Schedule { command } => run_schedule(command, store, clock, config),
        Commands::Track { command } => run_track(command, store, clock),
        Commands::Report { command } => run_report(command, store, clock, config),
    }
}

fn run_task(command: &TaskCommands, store: &Arc<sched_service::InMemoryTaskStore>, clock: &sched_core::time::SystemClock) -> Result<()> {
    match command {
        TaskCommands::Add { user, name, duration, priority, deadline, depends_on } => {
            let user_id = if user == "new" {
                let id = UserId::new();
                println!("user: {id}");
                id
            } else {
                parse_user(user)?
            };

            // created_at is stamped here, at the boundary where a task is
            // first created, rather than by the store (spec.md §3 "set by
            // store") so reloading a JSON snapshot never re-stamps it.
            let mut task = sched_core::Task::new(user_id, name.clone())
                .duration(*duration)
                .priority(*priority)
                .created_at(clock.now());
            if let Some(deadline) = deadline {
                task = task.deadline(parse_instant(deadline)?);
            }
            for dep in depends_on {
                task = task.depends_on(parse_task_id(dep)?);
            }
            task.validate()?;

            let created = store.create(task);
            println!("task: {}", created.id);
            Ok(())
        }
        TaskCommands::List { user } => {
            let user_id = parse_user(user)?;
            for task in store.list_by_user(&user_id) {
                println!("{}\t{}\t{:?}\t{}m", task.id, task.name, task.status, task.duration_minutes);
            }
            Ok(())
        }
        TaskCommands::Get { id } => {
            let task_id = parse_task_id(id)?;
            let task = store.get(&task_id).with_context(|| format!("task {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
            Ok(())
        }
        TaskCommands::Cancel { id } => {
            let task_id = parse_task_id(id)?;
            let mut task = store.get(&task_id).with_context(|| format!("task {id} not found"))?;
            if !task.status.can_transition_to(sched_core::TaskStatus::Cancelled) {
                anyhow::bail!("task {id} cannot be cancelled from status {:?}", task.status);
            }
            task.status = sched_core::TaskStatus::Cancelled;
            store.update(task);
            println!("cancelled {id}");
            Ok(())
        }
    }
}

fn run_schedule(
    command: &ScheduleCommands,
    store: &Arc<sched_service::InMemoryTaskStore>,
    clock: Arc<sched_core::time::SystemClock>,
    config: SchedulerConfig,
) -> Result<()> {
    let service = ScheduleService::new(store.clone(), clock, config);
    match command {
        ScheduleCommands::Generate { user, date, policy } => {
            let result = service.generate(parse_user(user)?, parse_date(date)?, parse_policy(policy)?)?;
            println!("scheduled {} task(s), skipped {}", result.scheduled.len(), result.skipped.len());
            for task in &result.scheduled {
                println!(
                    "{}\t{}\t{} - {}",
                    task.id,
                    task.name,
                    task.scheduled_start_time.expect("just scheduled"),
                    task.scheduled_end_time.expect("just scheduled"),
                );
            }
            Ok(())
        }
        ScheduleCommands::Reset { user, date } => {
            service.reset(parse_user(user)?, parse_date(date)?);
            println!("reset schedule");
            Ok(())
        }
        ScheduleCommands::Daily { user, date } => {
            let tasks = service.daily(parse_user(user)?, parse_date(date)?);
            println!("{}", serde_json::to_string_pretty(&tasks)?);
            Ok(())
        }
        ScheduleCommands::DaySummary { user, date } => {
            let summary = service.day_summary(parse_user(user)?, parse_date(date)?);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        ScheduleCommands::InsertBreak { anchor, duration } => {
            let result = service.insert_break(
                store.get(&parse_task_id(anchor)?).context("anchor task not found")?.user_id,
                parse_task_id(anchor)?,
                *duration,
            )?;
            println!("break: {}", result.break_task.id);
            if result.exceeds_window {
                eprintln!("warning: later tasks were shifted past the working window");
            }
            for task in &result.shifted {
                println!("shifted: {} -> {}", task.id, task.scheduled_start_time.expect("shifted tasks are scheduled"));
            }
            Ok(())
        }
    }
}

fn run_track(command: &TrackCommands, store: &Arc<sched_service::InMemoryTaskStore>, clock: Arc<sched_core::time::SystemClock>) -> Result<()> {
    let tracker = ExecutionTracker::new(store.clone(), clock);
    match command {
        TrackCommands::Start { id } => {
            tracker.apply(parse_task_id(id)?, TaskPatch::Start)?;
            println!("started {id}");
            Ok(())
        }
        TrackCommands::Complete { id, actual_end, no_actuals } => {
            let actual_end = if *no_actuals {
                None
            } else {
                Some(match actual_end {
                    Some(raw) => parse_instant(raw)?,
                    None => chrono::Utc::now(),
                })
            };
            tracker.apply(parse_task_id(id)?, TaskPatch::Complete { actual_end })?;
            println!("completed {id}");
            Ok(())
        }
        TrackCommands::Cancel { id } => {
            tracker.apply(parse_task_id(id)?, TaskPatch::Cancel)?;
            println!("cancelled {id}");
            Ok(())
        }
    }
}

fn run_report(
    command: &ReportCommands,
    store: &Arc<sched_service::InMemoryTaskStore>,
    clock: Arc<sched_core::time::SystemClock>,
    config: SchedulerConfig,
) -> Result<()> {
    match command {
        ReportCommands::Generate { user, date } => {
            let generator = ReportGenerator::new(store.clone(), clock, config, Arc::new(sched_core::TemplateSummaryProvider));
            let report = generator.generate(parse_user(user)?, parse_date(date)?)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        ReportCommands::Get { id } => {
            let report_id = sched_core::ReportId::from_str(id).with_context(|| format!("'{id}' is not a valid report id"))?;
            let report = store.get_report(&report_id).with_context(|| format!("report {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        ReportCommands::List { user } => {
            for report in store.list_reports(&parse_user(user)?) {
                println!("{}\t{}\t{:.0}/100", report.id, report.date, report.metrics.productivity_score);
            }
            Ok(())
        }
    }
}
