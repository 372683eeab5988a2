//! # Configuration
//!
//! Runtime parameters governing the scheduler and simulator. These vary
//! per task set and per invocation, so they are threaded through the
//! builder and simulator as a validated `SchedulerConfig` value rather
//! than living as file-scope globals.

use crate::error::ConfigError;

/// Validated configuration for a single scheduling run.
///
/// Construct via [`SchedulerConfig::new`], which validates every field.
/// There is no `Default` impl — every field materially changes scheduler
/// behavior and must be supplied explicitly (by the CLI, or by a test).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// Number of faults the system must tolerate per window (`k`).
    /// `k = 0` is a valid boundary case: an empty backup reservation.
    k: u32,

    /// Total frame length in milliseconds (`F`).
    frame_ms: f64,

    /// Fidelity of each time step, in milliseconds (`Δ`).
    time_step_ms: f64,

    /// Number of primary (LP) cores (`m`).
    m_pri: usize,

    /// LP:HP speed ratio, `r = t_HP / t_LP`, strictly in `(0, 1)`.
    lp_hp_ratio: f64,

    /// Whether to emit `tracing` debug events while scheduling/simulating.
    log_debug: bool,
}

impl SchedulerConfig {
    /// Validate and construct a `SchedulerConfig`.
    ///
    /// Returns [`ConfigError`] for a non-positive `frame_ms`, `time_step_ms`,
    /// or `m_pri`, or for `lp_hp_ratio` outside `(0, 1)`.
    pub fn new(
        k: u32,
        frame_ms: f64,
        time_step_ms: f64,
        m_pri: usize,
        lp_hp_ratio: f64,
        log_debug: bool,
    ) -> Result<Self, ConfigError> {
        if frame_ms <= 0.0 {
            return Err(ConfigError::NonPositive("frame"));
        }
        if time_step_ms <= 0.0 {
            return Err(ConfigError::NonPositive("time_step"));
        }
        if m_pri == 0 {
            return Err(ConfigError::NonPositive("m_pri"));
        }
        if !(lp_hp_ratio > 0.0 && lp_hp_ratio < 1.0) {
            return Err(ConfigError::RatioOutOfRange(lp_hp_ratio));
        }

        Ok(Self {
            k,
            frame_ms,
            time_step_ms,
            m_pri,
            lp_hp_ratio,
            log_debug,
        })
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    pub fn time_step_ms(&self) -> f64 {
        self.time_step_ms
    }

    pub fn m_pri(&self) -> usize {
        self.m_pri
    }

    pub fn lp_hp_ratio(&self) -> f64 {
        self.lp_hp_ratio
    }

    pub fn log_debug(&self) -> bool {
        self.log_debug
    }

    /// Decimal places to round durations and start times to, derived from
    /// `time_step_ms`.
    pub fn precision_dp(&self) -> i32 {
        crate::time::precision_dp(self.time_step_ms)
    }
}

/// Upper bound on resampling attempts in [`crate::fault::FaultGenerator`]
/// before a window's fault placement is abandoned.
pub const MAX_FAULT_PLACEMENT_ATTEMPTS: u32 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_frame() {
        assert_eq!(
            SchedulerConfig::new(1, 0.0, 0.01, 1, 0.8, false),
            Err(ConfigError::NonPositive("frame"))
        );
    }

    #[test]
    fn rejects_ratio_out_of_range() {
        assert_eq!(
            SchedulerConfig::new(1, 100.0, 0.01, 1, 1.2, false),
            Err(ConfigError::RatioOutOfRange(1.2))
        );
    }

    #[test]
    fn accepts_k_equals_zero() {
        assert!(SchedulerConfig::new(0, 10.0, 0.01, 1, 0.8, false).is_ok());
    }

    #[test]
    fn precision_dp_matches_time_step() {
        let cfg = SchedulerConfig::new(1, 10.0, 0.01, 1, 0.8, false).unwrap();
        assert_eq!(cfg.precision_dp(), 2);
    }
}
