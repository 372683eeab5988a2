//! # Core Model
//!
//! Value type for a physical processing core — either a low-power (LP)
//! primary core or the single high-power (HP) backup core — and its energy
//! bookkeeping.
//!
//! The module is named `core_model` (rather than `core`) to avoid shadowing
//! the `core` crate inside the crate root's `use` graph.

/// Whether a [`Core`] is a low-power primary core or the high-power backup
/// core. The system has exactly one HP core; LP cores are a bank of
/// `m_pri` identical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreKind {
    Lp,
    Hp,
}

/// A single processing core. Energy is modeled as two linear functions of
/// time: `energy_active(t) = xi * t` and `energy_idle(t) = p_idle * t`.
/// The coefficients `ai`/`f` are carried for
/// reporting and for implementors who want to derive `xi` from them, but the
/// scheduler and simulator never interpret them — they only ever call
/// `energy_active`/`energy_idle`.
#[derive(Debug, Clone)]
pub struct Core {
    pub name: String,
    pub kind: CoreKind,

    /// Operating frequency, normalized to the LP core's frequency (`f = 1.0`
    /// for LP, `f = 1.0 / lp_hp_ratio` for HP).
    pub f: f64,

    /// Activity index, an opaque workload-intensity coefficient.
    pub ai: f64,

    /// Active-energy coefficient: `energy_active(t) = xi * t`.
    pub xi: f64,

    /// Idle power draw: `energy_idle(t) = p_idle * t`.
    pub p_idle: f64,

    /// Cumulative time this core spent executing any task, in milliseconds.
    active_duration_ms: f64,

    /// Cumulative energy consumed across active and idle time.
    energy_consumed: f64,
}

impl Core {
    pub fn new(name: impl Into<String>, kind: CoreKind, f: f64, ai: f64, xi: f64, p_idle: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            f,
            ai,
            xi,
            p_idle,
            active_duration_ms: 0.0,
            energy_consumed: 0.0,
        }
    }

    /// Convenience constructor for a low-power primary core.
    pub fn lp(name: impl Into<String>, ai: f64, xi: f64, p_idle: f64) -> Self {
        Self::new(name, CoreKind::Lp, 1.0, ai, xi, p_idle)
    }

    /// Convenience constructor for the high-power backup core, whose
    /// frequency is derived from the LP:HP speed ratio (`f = 1 / r`).
    pub fn hp(name: impl Into<String>, lp_hp_ratio: f64, ai: f64, xi: f64, p_idle: f64) -> Self {
        Self::new(name, CoreKind::Hp, 1.0 / lp_hp_ratio, ai, xi, p_idle)
    }

    /// Accrue `duration_ms` of active execution time on this core.
    pub fn update_active_duration(&mut self, duration_ms: f64) {
        self.active_duration_ms += duration_ms;
    }

    pub fn active_duration_ms(&self) -> f64 {
        self.active_duration_ms
    }

    /// `energy_active(t) = xi * t`.
    pub fn energy_consumption_active(&self, duration_ms: f64) -> f64 {
        self.xi * duration_ms
    }

    /// `energy_idle(t) = p_idle * t`.
    pub fn energy_consumption_idle(&self, duration_ms: f64) -> f64 {
        self.p_idle * duration_ms
    }

    /// Accrue `delta` units of energy onto this core's running total.
    pub fn update_energy_consumption(&mut self, delta: f64) {
        self.energy_consumed += delta;
    }

    pub fn energy_consumed(&self) -> f64 {
        self.energy_consumed
    }

    /// Apply the end-of-frame energy tally: active energy over
    /// `active_duration_ms`, plus idle energy over the remainder of the
    /// frame.
    pub fn finalize_energy(&mut self, frame_ms: f64) {
        let active = self.energy_consumption_active(self.active_duration_ms);
        self.update_energy_consumption(active);
        let idle = self.energy_consumption_idle((frame_ms - self.active_duration_ms).max(0.0));
        self.update_energy_consumption(idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lp_core_defaults_to_unit_frequency() {
        let lp = Core::lp("LP0", 0.3, 0.03, 0.02);
        assert_eq!(lp.f, 1.0);
        assert_eq!(lp.kind, CoreKind::Lp);
    }

    #[test]
    fn hp_core_frequency_derives_from_ratio() {
        let hp = Core::hp("HP", 0.8, 1.0, 0.1, 0.05);
        assert_eq!(hp.f, 1.25);
        assert_eq!(hp.kind, CoreKind::Hp);
    }

    #[test]
    fn finalize_energy_splits_active_and_idle() {
        let mut lp = Core::lp("LP0", 0.3, 0.03, 0.02);
        lp.update_active_duration(5.0);
        lp.finalize_energy(10.0);
        // active: 0.03 * 5.0 = 0.15, idle: 0.02 * 5.0 = 0.10
        assert!((lp.energy_consumed() - 0.25).abs() < 1e-9);
    }
}
