//! # Fault Generator
//!
//! Injects `L = min(k, |primary map|)` faults into distinct tasks of a
//! window by uniform resampling.
//!
//! A sampled `fault_time` can overlap more than one primary slot (LPT
//! round-robin packing routinely gives two tasks on different cores the
//! same `start_offset_ms`, nesting the shorter task's interval inside the
//! longer one's); every overlapping slot is checked and the first
//! not-yet-faulted one is marked, mirroring the fall-through-to-next-key
//! behavior of the original `generate_fault_occurrences`. A fresh
//! `fault_time` is only resampled once none of the overlapping slots
//! qualify.
//!
//! Resampling is bounded by [`crate::config::MAX_FAULT_PLACEMENT_ATTEMPTS`];
//! exceeding the cap reports [`SimError::FaultPlacementExhausted`] rather
//! than looping forever.

use rand::Rng;

use crate::config::MAX_FAULT_PLACEMENT_ATTEMPTS;
use crate::error::SimError;
use crate::schedule::Window;
use crate::task::Task;

/// Stateless fault injector.
pub struct FaultGenerator;

impl FaultGenerator {
    /// Inject faults into window `window_index`, marking up to `k` distinct
    /// tasks (capped by the number of primary slots in the window) as
    /// faulty in `tasks`. `time_step_ms` is the scheduler's `Δ`, used to
    /// discretize the uniform sample over the window to a whole number of
    /// steps.
    ///
    /// On [`SimError::FaultPlacementExhausted`] any faults already placed
    /// before the cap was hit remain marked — the simulator proceeds with a
    /// partial fault set for this window rather than aborting the run.
    pub fn inject(
        window: &Window,
        tasks: &mut [Task],
        k: u32,
        window_index: usize,
        time_step_ms: f64,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let l = (k as usize).min(window.primary.len());
        if l == 0 {
            return Ok(());
        }

        let max_step = (window.len_ms() / time_step_ms).floor() as u64;
        let mut faulted = 0usize;
        let mut attempts = 0u32;

        while faulted < l {
            if attempts >= MAX_FAULT_PLACEMENT_ATTEMPTS {
                return Err(SimError::FaultPlacementExhausted {
                    window: window_index,
                    attempts,
                });
            }
            attempts += 1;

            let step = rng.gen_range(0..=max_step);
            let fault_time = window.start_ms + (step as f64) * time_step_ms;

            // Several primary slots can overlap the same `fault_time` (two
            // tasks dispatched at the same `start_offset_ms` on different
            // cores, one interval nested in the other). Scan every
            // overlapping slot in `(start_offset, core_id)` order and take
            // the first one not already faulted; only resample a fresh
            // `fault_time` when none of the overlapping slots qualify.
            let target = window.primary.iter().find(|s| {
                let task = tasks
                    .iter()
                    .find(|t| t.id() == s.task_id)
                    .expect("primary slot task id must exist in the task set");
                let wq = task
                    .workload_quota(window_index)
                    .expect("task scheduled in this window");
                let in_range = fault_time >= s.start_offset_ms && fault_time <= s.start_offset_ms + wq;
                in_range
                    && !task
                        .encountered_fault(window_index)
                        .expect("task scheduled in this window")
            });

            let Some(slot) = target else { continue };

            let relative = fault_time - slot.start_offset_ms;
            let task_id = slot.task_id;
            tasks
                .iter_mut()
                .find(|t| t.id() == task_id)
                .expect("primary slot task id must exist in the task set")
                .set_encountered_fault(window_index, relative)
                .expect("task scheduled in this window");
            faulted += 1;
        }

        Ok(())
    }
}
