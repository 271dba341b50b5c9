//! # sched-service
//!
//! Orchestration layer for the daytrack scheduling engine: wires
//! [`sched_solver`]'s pure resolution/ordering/packing functions to a
//! [`sched_core::TaskStore`] under per-user locking (spec.md §4.4, §4.5,
//! §4.8, §5).

pub mod locks;
pub mod reports;
pub mod schedule_service;
pub mod store;
pub mod tracker;

pub use locks::UserLockRegistry;
pub use reports::ReportGenerator;
pub use schedule_service::{GenerateResult, InsertBreakResult, ScheduleService};
pub use store::InMemoryTaskStore;
pub use tracker::{ExecutionTracker, TaskPatch};
