//! # Time Arithmetic
//!
//! Millisecond-precision helpers shared by the schedule builder and the
//! simulator. All durations in this crate are `f64` milliseconds; this
//! module centralizes the rounding rules so that every quota and start
//! time is rounded the same way.
//!
//! ## Rounding policy
//!
//! - **Durations** (workload quotas) round up to the next multiple of the
//!   time step `Δ`, never below `Δ` itself.
//! - **Start times** are exact — they are sums of already-rounded
//!   durations and window boundaries, so no further rounding is applied
//!   beyond clamping to `precision_dp` decimal places to suppress
//!   floating-point drift at window boundaries.

/// Number of decimal places to retain given a time step `Δ`, i.e.
/// `-floor(log10(Δ))`. For `Δ = 0.01` this is `2`.
pub fn precision_dp(time_step_ms: f64) -> i32 {
    -(time_step_ms.log10().floor() as i32)
}

/// Round `value` to `dp` decimal places.
pub fn round_to_precision(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

/// Round a duration up to the next multiple of `time_step_ms`, with a floor
/// of one time step. Mirrors `EnSuRe_Scheduler.roundUpTimeStep`.
pub fn round_up_to_step(value: f64, time_step_ms: f64, dp: i32) -> f64 {
    let stepped = (value / time_step_ms).ceil() * time_step_ms;
    let rounded = round_to_precision(stepped, dp);
    if rounded < time_step_ms {
        time_step_ms
    } else {
        rounded
    }
}
