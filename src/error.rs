//! # Error Types
//!
//! Error kinds produced by the scheduling core, the task-set loader and the
//! configuration layer. Every fallible operation in this crate returns a
//! `Result` with one of these enums — no `unwrap`/`expect` outside of
//! tests.

use thiserror::Error;

/// Errors raised while validating a [`crate::config::SchedulerConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("lp_hp_ratio must lie in (0, 1), got {0}")]
    RatioOutOfRange(f64),
}

/// Errors raised by [`crate::schedule::ScheduleBuilder::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error(
        "not schedulable: workload exceeds capacity in window {window} \
         (total_wq={total_wq}, capacity={capacity})"
    )]
    CapacityExceeded {
        window: usize,
        total_wq: f64,
        capacity: f64,
    },

    #[error("not schedulable on LP cores: task {task_id} in window {window}")]
    LpPackingFailed { window: usize, task_id: u64 },
}

/// Errors surfaced while replaying a schedule in [`crate::simulator::Simulator`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("fault placement exhausted in window {window} after {attempts} attempts")]
    FaultPlacementExhausted { window: usize, attempts: u32 },
}

/// Errors raised while querying per-window task state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    #[error("task {task_id} has no quota recorded for window {window}")]
    WindowNotScheduled { task_id: u64, window: usize },
}

/// Errors raised while loading a task set from disk.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}
