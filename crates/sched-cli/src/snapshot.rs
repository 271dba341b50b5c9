//! JSON snapshot load/save for the CLI's in-memory store, filling in for the
//! persistence layer spec.md §1 explicitly leaves out of the engine itself.

use anyhow::{Context, Result};
use sched_core::{Report, Task, TaskStore};
use sched_service::InMemoryTaskStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
    tasks: Vec<Task>,
    reports: Vec<Report>,
}

pub fn load(path: &Path) -> Result<InMemoryTaskStore> {
    let store = InMemoryTaskStore::new();
    if !path.exists() {
        return Ok(store);
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    for task in snapshot.tasks {
        store.create(task);
    }
    for report in snapshot.reports {
        store.create_report(report);
    }
    Ok(store)
}

pub fn save(path: &Path, store: &InMemoryTaskStore) -> Result<()> {
    let snapshot = Snapshot { tasks: store.all_tasks(), reports: store.all_reports() };
    let text = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::UserId;
    use tempfile::tempdir;

    #[test]
    fn round_trips_tasks_through_a_snapshot_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let user = UserId::new();

        let store = InMemoryTaskStore::new();
        let created = store.create(Task::new(user, "draft").duration(45));
        save(&path, &store).unwrap();

        let reloaded = load(&path).unwrap();
        let task = reloaded.get(&created.id).unwrap();
        assert_eq!(task.name, "draft");
    }

    #[test]
    fn missing_snapshot_file_yields_an_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let store = load(&path).unwrap();
        assert!(store.all_tasks().is_empty());
    }
}
