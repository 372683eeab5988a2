//! # Task-set Loader
//!
//! Reads the line-oriented `(id, deadline_ms, weight)` task-set file into a
//! `Vec<Task>`.
//!
//! Each row is deserialized through `serde` into a typed [`TaskRecord`];
//! a `weight` outside `(0, 1]` or a non-positive `deadline_ms` is rejected
//! with a typed [`LoaderError::InvalidRow`] rather than constructing a
//! `Task` the schedule builder could never satisfy.

use std::path::Path;

use serde::Deserialize;

use crate::error::LoaderError;
use crate::task::Task;

/// One row of the task-set file: `id, deadline_ms, weight`. No header row
/// is expected.
#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: u64,
    deadline_ms: f64,
    weight: f64,
}

/// Load a task set from `path`.
///
/// Every row must parse as `(id, deadline_ms, weight)` with `deadline_ms >
/// 0` and `weight` in `(0, 1]`; the first offending row aborts the load
/// with [`LoaderError::InvalidRow`] carrying its 1-based line number.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut tasks = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let line = i as u64 + 1;
        let record: TaskRecord = result?;

        if record.deadline_ms <= 0.0 {
            return Err(LoaderError::InvalidRow {
                line,
                reason: format!("deadline_ms must be positive, got {}", record.deadline_ms),
            });
        }
        if !(record.weight > 0.0 && record.weight <= 1.0) {
            return Err(LoaderError::InvalidRow {
                line,
                reason: format!("weight must lie in (0, 1], got {}", record.weight),
            });
        }

        tasks.push(Task::new(record.id, record.deadline_ms, record.weight));
    }

    Ok(tasks)
}
