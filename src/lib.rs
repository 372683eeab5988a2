//! # EnSuRe-sched — fault-tolerant, energy-aware scheduling engine
//!
//! An offline scheduler and discrete-time simulator for heterogeneous
//! multi-core embedded systems: a bank of low-power (LP) primary cores plus
//! a single high-power (HP) backup core. Given a set of periodic real-time
//! tasks with individual deadlines and weights, the [`schedule`] builder
//! constructs a feasibility-checked primary schedule and a per-window
//! backup reservation such that up to `k` task faults per window can be
//! recovered without missing a deadline; the [`simulator`] then replays
//! that schedule against randomly injected faults and tallies per-core
//! active time and energy.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     loader (CSV task set)                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  task / core_model          Value types: Task, Core            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  schedule                   ScheduleBuilder::build()           │
//! │    └─ reservation             BB-overloading update()          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  fault                      FaultGenerator::inject()            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  simulator                  Simulator::run() (time-stepped)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `config` and `error` are threaded through every layer above instead of
//! living as file-scope globals; `time` centralizes the step-rounding rules
//! shared by the builder and the simulator.
//!
//! Single-threaded and deterministic given a fixed RNG seed: every random
//! draw in [`fault`] goes through an `impl rand::Rng` passed in by the
//! caller, never a thread-local or global generator.

pub mod config;
pub mod core_model;
pub mod error;
pub mod fault;
pub mod loader;
pub mod reservation;
pub mod schedule;
pub mod simulator;
pub mod task;
pub mod time;
