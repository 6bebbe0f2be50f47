//! Stateless operator waveform generators.

use std::f64::consts::{PI, TAU};

use rand::Rng;

// -------------------------------------------------------------------------------------------------

/// Waveform types of an FM operator.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
    /// White noise: ignores the phase and returns a new random value on every call.
    Noise,
}

impl Waveform {
    /// Generate a single sample in range \[-1, 1\] at the given phase in radians.
    ///
    /// The phase may lie outside of \[0, 2π): it gets wrapped before the shape is evaluated.
    /// `rng` is only consumed by [`Waveform::Noise`].
    #[inline]
    pub fn generate<R: Rng>(self, phase: f64, rng: &mut R) -> f64 {
        let phase = wrap_phase(phase);
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
            Waveform::Square => {
                if phase.sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => (4.0 * (phase / TAU) - 2.0).abs() - 1.0,
            Waveform::Noise => rng.random_range(-1.0..=1.0),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Wrap the given phase in radians into range \[0, 2π).
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if (0.0..TAU).contains(&phase) {
        phase
    } else if phase.is_finite() {
        let wrapped = phase.rem_euclid(TAU);
        // rem_euclid may round up to exactly TAU for tiny negative inputs
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    } else {
        0.0
    }
}

/// Phase increment in radians per sample for the given frequency.
#[inline]
pub fn phase_increment(frequency: f64, sample_rate: u32) -> f64 {
    2.0 * PI * frequency / sample_rate as f64
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::SmallRng, SeedableRng};
    use strum::IntoEnumIterator;

    #[test]
    fn shapes() {
        let mut rng = SmallRng::seed_from_u64(0x1234);
        assert!((Waveform::Sine.generate(PI / 2.0, &mut rng) - 1.0).abs() < 1e-12);
        assert!((Waveform::Saw.generate(0.0, &mut rng) + 1.0).abs() < 1e-12);
        assert!(Waveform::Saw.generate(PI, &mut rng).abs() < 1e-12);
        assert_eq!(Waveform::Square.generate(PI / 2.0, &mut rng), 1.0);
        assert_eq!(Waveform::Square.generate(3.0 * PI / 2.0, &mut rng), -1.0);
        assert!((Waveform::Triangle.generate(0.0, &mut rng) - 1.0).abs() < 1e-12);
        assert!((Waveform::Triangle.generate(PI, &mut rng) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn bounded_for_any_phase() {
        let mut rng = SmallRng::seed_from_u64(0x5678);
        for waveform in Waveform::iter() {
            for step in -2000..2000 {
                let phase = step as f64 * 0.0137;
                let value = waveform.generate(phase, &mut rng);
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "{waveform} out of range at phase {phase}: {value}"
                );
            }
        }
    }

    #[test]
    fn noise_ignores_phase() {
        let mut rng = SmallRng::seed_from_u64(42);
        let values = (0..64)
            .map(|_| Waveform::Noise.generate(0.0, &mut rng))
            .collect::<Vec<_>>();
        assert!(values.iter().any(|v| *v != values[0]));
    }

    #[test]
    fn phase_wrapping() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert_eq!(wrap_phase(TAU), 0.0);
        assert!((wrap_phase(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_phase(-1.0) - (TAU - 1.0)).abs() < 1e-12);
        assert!((0.0..TAU).contains(&wrap_phase(-1e-18)));
        assert_eq!(wrap_phase(f64::NAN), 0.0);
        assert_eq!(wrap_phase(f64::INFINITY), 0.0);
    }

    #[test]
    fn names() {
        assert_eq!(Waveform::Triangle.to_string(), "Triangle");
        assert_eq!("Noise".parse::<Waveform>(), Ok(Waveform::Noise));
    }
}
