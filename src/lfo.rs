//! Low frequency oscillator, as used by FM operators.

use crate::waveform::{phase_increment, wrap_phase};

// -------------------------------------------------------------------------------------------------

/// Simple non bandlimited sine oscillator which modulates an operator's phase.
///
/// The LFO's phase is kept in range \[0, 2π) at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Lfo {
    phase: f64,
    rate: f32,
    amount: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Lfo {
    /// Create a new LFO with the given rate in Hz and amount in range \[0, 1\].
    pub fn new(rate: f32, amount: f32) -> Self {
        Self {
            phase: 0.0,
            rate,
            amount,
        }
    }

    /// The LFO's rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate
    }
    /// Set a new rate in Hz.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    /// The LFO's modulation amount.
    pub fn amount(&self) -> f32 {
        self.amount
    }
    /// Set a new modulation amount.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }
    /// Set or reset the LFO's phase in radians.
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(phase);
    }

    /// Returns the current value `sin(phase) * amount`, then advances the phase.
    #[inline]
    pub fn run(&mut self, sample_rate: u32) -> f64 {
        let value = self.phase.sin() * self.amount as f64;
        self.phase = wrap_phase(self.phase + phase_increment(self.rate as f64, sample_rate));
        value
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::TAU;

    #[test]
    fn value_before_advance() {
        let mut lfo = Lfo::new(1.0, 0.5);
        // first value is taken at phase 0
        assert_eq!(lfo.run(44100), 0.0);
        assert!(lfo.phase() > 0.0);

        lfo.set_phase(std::f64::consts::FRAC_PI_2);
        assert!((lfo.run(44100) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_amount_is_silent() {
        let mut lfo = Lfo::new(5.0, 0.0);
        for _ in 0..1000 {
            assert_eq!(lfo.run(44100), 0.0);
        }
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut lfo = Lfo::new(20.0, 1.0);
        for _ in 0..100_000 {
            lfo.run(44100);
            assert!((0.0..TAU).contains(&lfo.phase()));
        }
        let mut lfo = Lfo::new(-3.0, 1.0);
        for _ in 0..10_000 {
            lfo.run(44100);
            assert!((0.0..TAU).contains(&lfo.phase()));
        }
    }
}
