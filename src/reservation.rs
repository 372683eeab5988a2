//! # BB-Overloading Reservation
//!
//! Computes the latest instant the HP core may begin backup execution in a
//! window such that up to `k` of its longest backups still fit before the
//! window's deadline.
//!
//! This must be called after every mutation of a window's backup list
//! (construction-time retirement of a completing task and simulation-time
//! completion/cancellation alike) so the reservation always covers exactly
//! the `k` longest remaining backups.

use crate::schedule::Window;
use crate::task::Task;

/// Recompute `window.backup_start_ms` from its current `backup_list`.
///
/// `window_index` selects which per-window quota to read off each backup
/// task. `sim_time_ms` clamps the reservation forward so it never falls
/// into the past as the simulation clock advances; at construction time
/// (`sim_time_ms = 0.0`) this clamp is a no-op.
pub fn update(window: &mut Window, tasks: &[Task], k: u32, window_index: usize, sim_time_ms: f64) {
    let l = (k as usize).min(window.backup_list.len());
    let reserve_cap: f64 = window.backup_list[..l]
        .iter()
        .map(|&task_id| {
            find_task(tasks, task_id)
                .backup_workload_quota(window_index)
                .expect("backup list only ever contains tasks scheduled in this window")
        })
        .sum();

    let new_backup_start = window.end_ms - reserve_cap;
    window.backup_start_ms = sim_time_ms.max(new_backup_start);
}

fn find_task<'a>(tasks: &'a [Task], task_id: u64) -> &'a Task {
    tasks
        .iter()
        .find(|t| t.id() == task_id)
        .expect("backup list task id must exist in the task set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PrimarySlot;

    fn window(backup_list: Vec<u64>, end_ms: f64) -> Window {
        Window {
            start_ms: 0.0,
            end_ms,
            primary: backup_list
                .iter()
                .map(|&id| PrimarySlot {
                    start_offset_ms: 0.0,
                    core_id: 0,
                    task_id: id,
                })
                .collect(),
            backup_list,
            backup_start_ms: 0.0,
        }
    }

    #[test]
    fn k_zero_reserves_nothing() {
        let mut t0 = Task::new(0, 10.0, 0.5);
        t0.push_window(5.0, 4.0);
        let mut w = window(vec![0], 10.0);
        update(&mut w, &[t0], 0, 0, 0.0);
        assert_eq!(w.backup_start_ms, 10.0);
    }

    #[test]
    fn reserves_only_k_longest_backups() {
        let mut t0 = Task::new(0, 10.0, 0.4);
        t0.push_window(4.0, 3.2);
        let mut t1 = Task::new(1, 10.0, 0.3);
        t1.push_window(3.0, 2.4);
        let mut w = window(vec![0, 1], 10.0);
        update(&mut w, &[t0, t1], 1, 0, 0.0);
        assert_eq!(w.backup_start_ms, 6.8);
    }

    #[test]
    fn sim_time_clamps_reservation_forward() {
        let mut t0 = Task::new(0, 10.0, 0.4);
        t0.push_window(4.0, 3.2);
        let mut w = window(vec![0], 10.0);
        update(&mut w, &[t0], 1, 0, 9.0);
        // raw new_backup_start = 10 - 3.2 = 6.8, but sim_time has already
        // advanced past that, so the clamp wins.
        assert_eq!(w.backup_start_ms, 9.0);
    }
}
