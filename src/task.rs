//! # Task Model
//!
//! Defines the periodic real-time task model for the scheduling engine:
//! immutable identity and deadline/weight, plus the mutable per-window
//! state written by the schedule builder and simulator.
//!
//! The task set size is only known at load time, so tasks live in an
//! ordinary `Vec<Task>` and per-window state is appended one entry per
//! window as the builder visits windows, growing rather than pre-sized.

use crate::error::TaskError;

/// Per-window quota and scheduling state for one task, appended in window
/// order. Index `i` of a task's `Vec<WindowQuota>` corresponds to window
/// `i` — a task retired after window `i` has no entry for windows beyond
/// that, and querying one is an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowQuota {
    /// Primary (LP) execution time in this window.
    pub workload_quota: f64,
    /// Backup (HP) execution time in this window; `< workload_quota`.
    pub backup_workload_quota: f64,
    /// Start time of the primary copy on its LP core, set during
    /// simulation dispatch.
    pub start_time: Option<f64>,
    /// Start time of the backup copy on the HP core, set when dispatched.
    pub backup_start_time: Option<f64>,
    /// Whether this task encountered a fault in this window.
    pub encountered_fault: bool,
    /// Fault time relative to `start_time`, valid only if
    /// `encountered_fault` is set.
    pub relative_fault_time: Option<f64>,
    /// Whether the task's work (primary or backup) completed successfully
    /// in this window.
    pub completed: bool,
}

impl WindowQuota {
    fn new(workload_quota: f64, backup_workload_quota: f64) -> Self {
        Self {
            workload_quota,
            backup_workload_quota,
            start_time: None,
            backup_start_time: None,
            encountered_fault: false,
            relative_fault_time: None,
            completed: false,
        }
    }

    /// Reset the fault/completion state for a fresh pass over this window.
    /// Quotas and the id are never touched here.
    fn reset_for_window(&mut self) {
        self.start_time = None;
        self.backup_start_time = None;
        self.encountered_fault = false;
        self.relative_fault_time = None;
        self.completed = false;
    }
}

/// A periodic real-time task.
///
/// `id`, `deadline_ms`, and `weight` are fixed at construction. Per-window
/// state lives in `windows`, appended by the schedule builder one entry per
/// window the task is active in.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: u64,
    deadline_ms: f64,
    weight: f64,
    windows: Vec<WindowQuota>,
}

impl Task {
    /// Construct a task. `weight` must lie in `(0, 1]`; this is asserted by
    /// callers constructing from validated input (the CSV loader) rather
    /// than re-validated here, since `Task` itself carries no `Config` to
    /// report a `ConfigError` against.
    pub fn new(id: u64, deadline_ms: f64, weight: f64) -> Self {
        Self {
            id,
            deadline_ms,
            weight,
            windows: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn deadline_ms(&self) -> f64 {
        self.deadline_ms
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of windows this task currently has recorded quotas for.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Append a new window's quotas. Called by the schedule builder once
    /// per window, in ascending window order, for every task still active
    /// in that window.
    pub fn push_window(&mut self, workload_quota: f64, backup_workload_quota: f64) {
        self.windows.push(WindowQuota::new(workload_quota, backup_workload_quota));
    }

    fn window(&self, w: usize) -> Result<&WindowQuota, TaskError> {
        self.windows.get(w).ok_or(TaskError::WindowNotScheduled {
            task_id: self.id,
            window: w,
        })
    }

    fn window_mut(&mut self, w: usize) -> Result<&mut WindowQuota, TaskError> {
        let id = self.id;
        self.windows
            .get_mut(w)
            .ok_or(TaskError::WindowNotScheduled { task_id: id, window: w })
    }

    /// `wq` for window `w`. Returns [`TaskError::WindowNotScheduled`] if
    /// this task was retired before window `w` or the window hasn't been
    /// built yet — the spec's open question on stale-index reads resolved
    /// in favor of a typed error rather than silently returning stale
    /// values.
    pub fn workload_quota(&self, w: usize) -> Result<f64, TaskError> {
        self.window(w).map(|q| q.workload_quota)
    }

    pub fn backup_workload_quota(&self, w: usize) -> Result<f64, TaskError> {
        self.window(w).map(|q| q.backup_workload_quota)
    }

    pub fn start_time(&self, w: usize) -> Result<Option<f64>, TaskError> {
        self.window(w).map(|q| q.start_time)
    }

    pub fn set_start_time(&mut self, w: usize, t: f64) -> Result<(), TaskError> {
        self.window_mut(w).map(|q| q.start_time = Some(t))
    }

    pub fn backup_start_time(&self, w: usize) -> Result<Option<f64>, TaskError> {
        self.window(w).map(|q| q.backup_start_time)
    }

    pub fn set_backup_start_time(&mut self, w: usize, t: f64) -> Result<(), TaskError> {
        self.window_mut(w).map(|q| q.backup_start_time = Some(t))
    }

    pub fn encountered_fault(&self, w: usize) -> Result<bool, TaskError> {
        self.window(w).map(|q| q.encountered_fault)
    }

    /// Mark this task as having encountered a fault at `relative_time`
    /// (offset from the task's primary start time) in window `w`.
    pub fn set_encountered_fault(&mut self, w: usize, relative_time: f64) -> Result<(), TaskError> {
        self.window_mut(w).map(|q| {
            q.encountered_fault = true;
            q.relative_fault_time = Some(relative_time);
        })
    }

    pub fn relative_fault_time(&self, w: usize) -> Result<Option<f64>, TaskError> {
        self.window(w).map(|q| q.relative_fault_time)
    }

    pub fn completed(&self, w: usize) -> Result<bool, TaskError> {
        self.window(w).map(|q| q.completed)
    }

    pub fn set_completed(&mut self, w: usize, completed: bool) -> Result<(), TaskError> {
        self.window_mut(w).map(|q| q.completed = completed)
    }

    /// Reset the fault/completion state for window `w` at the start of a
    /// fresh simulation pass.
    pub fn reset_for_window(&mut self, w: usize) -> Result<(), TaskError> {
        self.window_mut(w).map(WindowQuota::reset_for_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn querying_unscheduled_window_errors() {
        let task = Task::new(0, 10.0, 0.5);
        assert_eq!(
            task.workload_quota(0),
            Err(TaskError::WindowNotScheduled { task_id: 0, window: 0 })
        );
    }

    #[test]
    fn push_window_then_query_roundtrips() {
        let mut task = Task::new(0, 10.0, 0.5);
        task.push_window(5.0, 4.0);
        assert_eq!(task.workload_quota(0), Ok(5.0));
        assert_eq!(task.backup_workload_quota(0), Ok(4.0));
        assert_eq!(task.window_count(), 1);
    }

    #[test]
    fn retired_task_has_no_later_window() {
        let mut task = Task::new(0, 10.0, 0.5);
        task.push_window(5.0, 4.0);
        assert_eq!(
            task.workload_quota(1),
            Err(TaskError::WindowNotScheduled { task_id: 0, window: 1 })
        );
    }

    #[test]
    fn fault_marking_roundtrips() {
        let mut task = Task::new(0, 10.0, 0.5);
        task.push_window(5.0, 4.0);
        task.set_encountered_fault(0, 2.0).unwrap();
        assert_eq!(task.encountered_fault(0), Ok(true));
        assert_eq!(task.relative_fault_time(0), Ok(Some(2.0)));
    }

    #[test]
    fn reset_for_window_clears_fault_and_times() {
        let mut task = Task::new(0, 10.0, 0.5);
        task.push_window(5.0, 4.0);
        task.set_start_time(0, 1.0).unwrap();
        task.set_encountered_fault(0, 0.5).unwrap();
        task.set_completed(0, true).unwrap();

        task.reset_for_window(0).unwrap();

        assert_eq!(task.start_time(0), Ok(None));
        assert_eq!(task.encountered_fault(0), Ok(false));
        assert_eq!(task.relative_fault_time(0), Ok(None));
        assert_eq!(task.completed(0), Ok(false));
    }
}
