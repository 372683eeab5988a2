//! # Schedule Builder
//!
//! Partitions the frame into deadline-separated windows, computes
//! per-task/per-window workload quotas, checks system capacity, packs
//! primary copies onto LP cores, and emits a per-window backup list and
//! BB-overloading reservation.
//!
//! The builder never partially commits: on any `Err` the caller's `tasks`
//! may have partially-appended window quotas for windows already visited,
//! but no `Schedule` is returned and the caller is expected to discard the
//! attempt.

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::reservation;
use crate::task::Task;
use crate::time::round_up_to_step;

/// One task's placement on an LP core within a window:
/// `(start_offset_ms, core_id) -> task`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimarySlot {
    pub start_offset_ms: f64,
    pub core_id: usize,
    pub task_id: u64,
}

/// One deadline-separated time window: its bounds, the primary placement
/// map (sorted ascending by `(start_offset, core_id)`), the backup list
/// (ordered non-increasing by primary `wq`), and the BB-overloading
/// reservation instant.
#[derive(Debug, Clone)]
pub struct Window {
    pub start_ms: f64,
    pub end_ms: f64,
    pub primary: Vec<PrimarySlot>,
    pub backup_list: Vec<u64>,
    pub backup_start_ms: f64,
}

impl Window {
    pub fn len_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// A complete, feasibility-checked primary schedule plus per-window backup
/// state, as produced by [`ScheduleBuilder::build`].
#[derive(Debug, Clone)]
pub struct Schedule {
    pub windows: Vec<Window>,
}

/// Stateless schedule construction entry point.
pub struct ScheduleBuilder;

impl ScheduleBuilder {
    /// Build a feasible schedule for `tasks` under `config`.
    ///
    /// `tasks` is sorted in place by ascending deadline and has per-window
    /// quotas appended to each task as windows are visited. On success,
    /// every task still active at the end
    /// of the frame has been retired and `tasks` reflects its full
    /// per-window history.
    pub fn build(tasks: &mut Vec<Task>, config: &SchedulerConfig) -> Result<Schedule, ScheduleError> {
        tasks.sort_by(|a, b| {
            a.deadline_ms()
                .partial_cmp(&b.deadline_ms())
                .expect("deadlines are finite")
        });

        let mut deadlines: Vec<f64> = Vec::new();
        for t in tasks.iter() {
            if !deadlines.iter().any(|d| *d == t.deadline_ms()) {
                deadlines.push(t.deadline_ms());
            }
        }

        let dp = config.precision_dp();
        let mut active: Vec<usize> = (0..tasks.len()).collect();
        let mut windows = Vec::with_capacity(deadlines.len());

        for (w, &d_w) in deadlines.iter().enumerate() {
            let start_w = if w == 0 { 0.0 } else { deadlines[w - 1] };
            let len_w = d_w - start_w;

            // a. per-task workload quotas for every task still active.
            let mut total_wq = 0.0;
            for &idx in &active {
                let weight = tasks[idx].weight();
                let wq = round_up_to_step(weight * len_w, config.time_step_ms(), dp);
                let bwq = round_up_to_step(
                    config.lp_hp_ratio() * weight * len_w,
                    config.time_step_ms(),
                    dp,
                );
                tasks[idx].push_window(wq, bwq);
                total_wq += wq;
            }

            // b. capacity test.
            let capacity = len_w * config.m_pri() as f64;
            if total_wq > capacity {
                return Err(ScheduleError::CapacityExceeded {
                    window: w,
                    total_wq,
                    capacity,
                });
            }

            // c. LP packing: deep-copy the active order, then sort the
            // copy by non-increasing wq (longest-processing-time first).
            // `active` itself is left in deadline/insertion order so
            // retirement (step f) is unaffected by the packing sort.
            let mut packing_order = active.clone();
            packing_order.sort_by(|&a, &b| {
                let wq_a = tasks[a].workload_quota(w).expect("quota just computed");
                let wq_b = tasks[b].workload_quota(w).expect("quota just computed");
                wq_b.partial_cmp(&wq_a).expect("quotas are finite")
            });

            let m = config.m_pri();
            let mut cursors = vec![start_w; m];
            let mut current_core = 0usize;
            let mut primary = Vec::with_capacity(packing_order.len());

            for &idx in &packing_order {
                let lp_time = tasks[idx].workload_quota(w).expect("quota just computed");
                let mut tries = 0usize;
                while cursors[current_core] + lp_time > start_w + len_w {
                    current_core = (current_core + 1) % m;
                    tries += 1;
                    if tries > m {
                        return Err(ScheduleError::LpPackingFailed {
                            window: w,
                            task_id: tasks[idx].id(),
                        });
                    }
                }

                let start_offset = cursors[current_core];
                primary.push(PrimarySlot {
                    start_offset_ms: start_offset,
                    core_id: current_core,
                    task_id: tasks[idx].id(),
                });
                tasks[idx]
                    .set_start_time(w, start_offset)
                    .expect("quota just computed");
                cursors[current_core] += lp_time;
                current_core = (current_core + 1) % m;
            }

            // step 3: sort the primary map by ascending (start_offset, core_id).
            primary.sort_by(|a, b| {
                a.start_offset_ms
                    .partial_cmp(&b.start_offset_ms)
                    .expect("start offsets are finite")
                    .then(a.core_id.cmp(&b.core_id))
            });

            // d. the LP-packed order is the window's backup list.
            let backup_list: Vec<u64> = packing_order.iter().map(|&idx| tasks[idx].id()).collect();

            let mut window = Window {
                start_ms: start_w,
                end_ms: d_w,
                primary,
                backup_list,
                backup_start_ms: 0.0,
            };

            // e. backup reservation at construction time (sim_time = 0).
            reservation::update(&mut window, tasks, config.k(), w, 0.0);
            windows.push(window);

            // f. retire tasks whose deadline is this window's deadline.
            active.retain(|&idx| tasks[idx].deadline_ms() != d_w);
        }

        Ok(Schedule { windows })
    }
}
