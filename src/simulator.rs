//! # Simulator (time-stepped)
//!
//! Replays a built [`Schedule`] against a fixed-step discrete clock,
//! injecting faults per window and accumulating per-core active time and
//! energy.
//!
//! `sim_time` is a single clock threaded across every window — it is never
//! reset between windows.

use rand::Rng;

use crate::config::SchedulerConfig;
use crate::core_model::Core;
use crate::fault::FaultGenerator;
use crate::reservation;
use crate::schedule::{Schedule, Window};
use crate::task::Task;

/// Per-core active-time and energy tally, plus any tasks whose backup list
/// entry survived to the end of its window (should not happen under the
/// stated fault model, but is reported rather than panicked on).
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub lp_active_ms: Vec<f64>,
    pub lp_energy: Vec<f64>,
    pub hp_active_ms: f64,
    pub hp_energy: f64,
    pub total_energy: f64,
    pub unresolved_tasks: Vec<u64>,
}

/// Stateless time-stepped simulator.
pub struct Simulator;

impl Simulator {
    /// Replay `schedule` end to end against `lp_cores` and `hp_core`,
    /// injecting random faults via `rng` and mutating `tasks`' per-window
    /// fault/completion state as the clock advances.
    pub fn run(
        schedule: &mut Schedule,
        tasks: &mut [Task],
        lp_cores: &mut [Core],
        hp_core: &mut Core,
        config: &SchedulerConfig,
        rng: &mut impl Rng,
    ) -> SimulationReport {
        let mut sim_time = 0.0;
        let mut unresolved_tasks = Vec::new();

        for w in 0..schedule.windows.len() {
            for slot in schedule.windows[w].primary.clone() {
                find_task_mut(tasks, slot.task_id)
                    .reset_for_window(w)
                    .expect("task scheduled in this window");
            }

            // Fault placement exhaustion is window-scoped and non-fatal: the
            // simulator proceeds with whatever faults were placed before the
            // attempt cap was hit.
            let _ = FaultGenerator::inject(
                &schedule.windows[w],
                tasks,
                config.k(),
                w,
                config.time_step_ms(),
                rng,
            );

            sim_time = Self::run_window(
                &mut schedule.windows[w],
                tasks,
                lp_cores,
                hp_core,
                config.time_step_ms(),
                config.k(),
                w,
                sim_time,
            );

            if !schedule.windows[w].backup_list.is_empty() {
                unresolved_tasks.extend(schedule.windows[w].backup_list.iter().copied());
            }
        }

        for core in lp_cores.iter_mut() {
            core.finalize_energy(config.frame_ms());
        }
        hp_core.finalize_energy(config.frame_ms());

        SimulationReport {
            lp_active_ms: lp_cores.iter().map(Core::active_duration_ms).collect(),
            lp_energy: lp_cores.iter().map(Core::energy_consumed).collect(),
            hp_active_ms: hp_core.active_duration_ms(),
            hp_energy: hp_core.energy_consumed(),
            total_energy: lp_cores.iter().map(Core::energy_consumed).sum::<f64>() + hp_core.energy_consumed(),
            unresolved_tasks,
        }
    }

    /// Step `window` from `sim_time_start` through its deadline, running
    /// six sub-steps per tick in order: accrue active time, primary
    /// completion, backup completion, primary dispatch, backup dispatch,
    /// clock advance.
    /// Returns the clock value at which the `while sim_time <= deadline`
    /// loop exited, to be threaded into the next window unmodified.
    ///
    /// Exposed separately from [`Simulator::run`] so tests can drive a
    /// single window with hand-placed faults instead of the random
    /// generator.
    pub fn run_window(
        window: &mut Window,
        tasks: &mut [Task],
        lp_cores: &mut [Core],
        hp_core: &mut Core,
        time_step_ms: f64,
        k: u32,
        w: usize,
        sim_time_start: f64,
    ) -> f64 {
        let m = lp_cores.len();
        let mut lp_assigned: Vec<Option<u64>> = vec![None; m];
        let mut hp_assigned: Option<u64> = None;
        let mut key_idx = 0usize;
        let mut sim_time = sim_time_start;

        while sim_time <= window.end_ms {
            // i. accrue active time.
            for (c, slot) in lp_assigned.iter().enumerate() {
                if slot.is_some() {
                    lp_cores[c].update_active_duration(time_step_ms);
                }
            }
            if hp_assigned.is_some() {
                hp_core.update_active_duration(time_step_ms);
            }

            // ii. primary completion sweep.
            for c in 0..m {
                if let Some(task_id) = lp_assigned[c] {
                    let start = find_task(tasks, task_id)
                        .start_time(w)
                        .expect("task scheduled in this window")
                        .expect("dispatched task has a start time");
                    let wq = find_task(tasks, task_id)
                        .workload_quota(w)
                        .expect("task scheduled in this window");
                    if sim_time >= start + wq {
                        let faulted = find_task(tasks, task_id)
                            .encountered_fault(w)
                            .expect("task scheduled in this window");
                        if !faulted {
                            find_task_mut(tasks, task_id)
                                .set_completed(w, true)
                                .expect("task scheduled in this window");
                            window.backup_list.retain(|&id| id != task_id);
                            reservation::update(window, tasks, k, w, sim_time);
                            if hp_assigned == Some(task_id) {
                                hp_assigned = None;
                            }
                        }
                        lp_assigned[c] = None;
                    }
                }
            }

            // iii. backup completion.
            if let Some(task_id) = hp_assigned {
                let bstart = find_task(tasks, task_id)
                    .backup_start_time(w)
                    .expect("task scheduled in this window")
                    .expect("dispatched backup has a start time");
                let bwq = find_task(tasks, task_id)
                    .backup_workload_quota(w)
                    .expect("task scheduled in this window");
                if sim_time >= bstart + bwq {
                    find_task_mut(tasks, task_id)
                        .set_completed(w, true)
                        .expect("task scheduled in this window");
                    window.backup_list.retain(|&id| id != task_id);
                    reservation::update(window, tasks, k, w, sim_time);
                    hp_assigned = None;
                }
            }

            // iv. primary dispatch.
            while key_idx < window.primary.len() && sim_time >= window.primary[key_idx].start_offset_ms {
                let slot = window.primary[key_idx];
                if let Some(stale_id) = lp_assigned[slot.core_id] {
                    if stale_id != slot.task_id {
                        let faulted = find_task(tasks, stale_id)
                            .encountered_fault(w)
                            .expect("task scheduled in this window");
                        if !faulted {
                            find_task_mut(tasks, stale_id)
                                .set_completed(w, true)
                                .expect("task scheduled in this window");
                            window.backup_list.retain(|&id| id != stale_id);
                            reservation::update(window, tasks, k, w, sim_time);
                            if hp_assigned == Some(stale_id) {
                                hp_assigned = None;
                            }
                        }
                        lp_assigned[slot.core_id] = None;
                    }
                }

                if lp_assigned[slot.core_id] != Some(slot.task_id) {
                    lp_assigned[slot.core_id] = Some(slot.task_id);
                    find_task_mut(tasks, slot.task_id)
                        .set_start_time(w, sim_time)
                        .expect("task scheduled in this window");
                }

                key_idx += 1;
            }

            // v. backup dispatch.
            if sim_time >= window.backup_start_ms {
                if let Some(&head) = window.backup_list.first() {
                    if hp_assigned != Some(head) {
                        hp_assigned = Some(head);
                        find_task_mut(tasks, head)
                            .set_backup_start_time(w, sim_time)
                            .expect("task scheduled in this window");
                    }
                } else {
                    hp_assigned = None;
                }
            }

            // vi. clock advance.
            sim_time += time_step_ms;
        }

        sim_time
    }
}

fn find_task<'a>(tasks: &'a [Task], task_id: u64) -> &'a Task {
    tasks
        .iter()
        .find(|t| t.id() == task_id)
        .expect("task id must exist in the task set")
}

fn find_task_mut<'a>(tasks: &'a mut [Task], task_id: u64) -> &'a mut Task {
    tasks
        .iter_mut()
        .find(|t| t.id() == task_id)
        .expect("task id must exist in the task set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cfg(k: u32, frame: f64, step: f64, m: usize, ratio: f64) -> SchedulerConfig {
        SchedulerConfig::new(k, frame, step, m, ratio, false).unwrap()
    }

    fn one_lp(ai: f64) -> Vec<Core> {
        vec![Core::lp("LP0", ai, 0.03, 0.02)]
    }

    fn one_hp(ratio: f64) -> Core {
        Core::hp("HP", ratio, 1.0, 0.1, 0.05)
    }

    #[test]
    fn single_window_single_task_no_fault_scenario() {
        // single window, single task, no fault
        let config = cfg(0, 10.0, 0.01, 1, 0.8);
        let mut tasks = vec![Task::new(0, 10.0, 0.5)];
        let mut schedule = ScheduleBuilder::build(&mut tasks, &config).unwrap();
        let mut lp = one_lp(0.3);
        let mut hp = one_hp(0.8);
        let mut rng = StdRng::seed_from_u64(1);

        let report = Simulator::run(&mut schedule, &mut tasks, &mut lp, &mut hp, &config, &mut rng);

        assert!((report.hp_active_ms - 0.0).abs() < 1e-9);
        assert!((report.lp_active_ms[0] - 5.0).abs() < 1e-6);
        assert!(report.unresolved_tasks.is_empty());
    }

    #[test]
    fn fault_triggers_backup_scenario() {
        // drive a single window directly with a hand-placed fault instead
        // of the random generator, to pin down an exact relative fault time.
        let config = cfg(1, 10.0, 0.01, 1, 0.8);
        let mut tasks = vec![Task::new(0, 10.0, 0.5)];
        let mut schedule = ScheduleBuilder::build(&mut tasks, &config).unwrap();
        tasks[0].reset_for_window(0).unwrap();
        tasks[0].set_encountered_fault(0, 2.0).unwrap();

        let mut lp = one_lp(0.3);
        let mut hp = one_hp(0.8);

        Simulator::run_window(&mut schedule.windows[0], &mut tasks, &mut lp, &mut hp, 0.01, 1, 0, 0.0);

        assert!((tasks[0].workload_quota(0).unwrap() - 5.0).abs() < 1e-9);
        assert!((lp[0].active_duration_ms() - 5.0).abs() < 1e-6);
        assert!((hp.active_duration_ms() - 4.0).abs() < 1e-6);
        assert!(schedule.windows[0].backup_list.is_empty());
    }

    #[test]
    fn fault_free_primary_cancels_backup_scenario() {
        // a fault-free primary completion should cancel its backup
        let config = cfg(1, 20.0, 0.01, 1, 0.8);
        let mut tasks = vec![Task::new(0, 10.0, 0.4), Task::new(1, 20.0, 0.3)];
        let mut schedule = ScheduleBuilder::build(&mut tasks, &config).unwrap();

        for slot in schedule.windows[0].primary.clone() {
            tasks
                .iter_mut()
                .find(|t| t.id() == slot.task_id)
                .unwrap()
                .reset_for_window(0)
                .unwrap();
        }
        // task 1 is faulty, task 0 is fault-free.
        tasks[1].set_encountered_fault(0, 1.0).unwrap();

        let mut lp = one_lp(0.3);
        let mut hp = one_hp(0.8);

        Simulator::run_window(&mut schedule.windows[0], &mut tasks, &mut lp, &mut hp, 0.01, 1, 0, 0.0);

        // T0 finishes fault-free at t=4.0 and is dropped from the backup
        // list; the reservation recomputes to max(4.0, 10 - 2.4) = 7.6,
        // and the HP core runs T1's backup on [7.6, 10.0].
        assert!((hp.active_duration_ms() - 2.4).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_task_count_scenario() {
        // k exceeds the number of tasks in the window
        let config = cfg(5, 10.0, 0.01, 1, 0.8);
        let mut tasks = vec![Task::new(0, 10.0, 0.5)];
        let mut schedule = ScheduleBuilder::build(&mut tasks, &config).unwrap();
        let mut lp = one_lp(0.3);
        let mut hp = one_hp(0.8);
        let mut rng = StdRng::seed_from_u64(3);

        Simulator::run(&mut schedule, &mut tasks, &mut lp, &mut hp, &config, &mut rng);
        // only one task exists in the window, so at most one fault can be
        // placed regardless of k; querying its fault state must not error.
        tasks[0].encountered_fault(0).unwrap();
    }

    #[test]
    fn k_zero_means_empty_backup_reservation() {
        // k = 0 reserves no backup capacity at all
        let config = cfg(0, 10.0, 0.01, 1, 0.8);
        let mut tasks = vec![Task::new(0, 10.0, 0.5)];
        let mut schedule = ScheduleBuilder::build(&mut tasks, &config).unwrap();
        assert_eq!(schedule.windows[0].backup_start_ms, 10.0);

        let mut lp = one_lp(0.3);
        let mut hp = one_hp(0.8);
        let mut rng = StdRng::seed_from_u64(9);
        let report = Simulator::run(&mut schedule, &mut tasks, &mut lp, &mut hp, &config, &mut rng);
        assert_eq!(report.hp_active_ms, 0.0);
    }

    #[test]
    fn simulation_is_deterministic_given_a_fixed_seed() {
        let config = cfg(1, 20.0, 0.01, 2, 0.8);
        let build_tasks = || {
            vec![
                Task::new(0, 10.0, 0.2),
                Task::new(1, 10.0, 0.3),
                Task::new(2, 20.0, 0.25),
            ]
        };

        let mut tasks_a = build_tasks();
        let mut schedule_a = ScheduleBuilder::build(&mut tasks_a, &config).unwrap();
        let mut lp_a = vec![Core::lp("LP0", 0.3, 0.03, 0.02), Core::lp("LP1", 0.3, 0.03, 0.02)];
        let mut hp_a = one_hp(0.8);
        let mut rng_a = StdRng::seed_from_u64(123);
        let report_a = Simulator::run(&mut schedule_a, &mut tasks_a, &mut lp_a, &mut hp_a, &config, &mut rng_a);

        let mut tasks_b = build_tasks();
        let mut schedule_b = ScheduleBuilder::build(&mut tasks_b, &config).unwrap();
        let mut lp_b = vec![Core::lp("LP0", 0.3, 0.03, 0.02), Core::lp("LP1", 0.3, 0.03, 0.02)];
        let mut hp_b = one_hp(0.8);
        let mut rng_b = StdRng::seed_from_u64(123);
        let report_b = Simulator::run(&mut schedule_b, &mut tasks_b, &mut lp_b, &mut hp_b, &config, &mut rng_b);

        assert_eq!(report_a.lp_active_ms, report_b.lp_active_ms);
        assert_eq!(report_a.hp_active_ms, report_b.hp_active_ms);
        assert_eq!(report_a.total_energy, report_b.total_energy);
    }
}
