//! # sched-solver
//!
//! Dependency resolution, ordering policies, and timeline packing for the
//! daytrack scheduling engine (spec.md §4.1-§4.3).
//!
//! ```rust
//! use chrono::Utc;
//! use sched_core::UserId;
//! use sched_solver::{resolve, OrderingPolicy};
//!
//! let user = UserId::new();
//! let tasks = vec![sched_core::Task::new(user, "draft outline").duration(30)];
//! let ordered = resolve(&tasks, |_| false, OrderingPolicy::Fcfs, Utc::now()).unwrap();
//! assert_eq!(ordered.len(), 1);
//! ```

pub mod packer;
pub mod policies;
pub mod reflow;
pub mod resolver;

pub use packer::{pack, PackResult, Placement};
pub use policies::{composite_score, deadline_pressure, OrderingPolicy};
pub use reflow::{insert_break, validate_duration, BreakInsertion, Shifted};
pub use resolver::{is_done, resolve};
