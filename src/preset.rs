//! Voice engine presets and the factory preset library.

use crate::{algorithm::Algorithm, operator::OperatorSettings};

// -------------------------------------------------------------------------------------------------

/// Category of a [`FactoryPreset`].
#[derive(
    Debug,
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
#[strum(serialize_all = "UPPERCASE")]
pub enum PresetCategory {
    Bass,
    Lead,
    Pad,
    Bell,
    Brass,
    Digital,
    Chaos,
    Experimental,
}

// -------------------------------------------------------------------------------------------------

/// Snapshot of all sound parameters of a [`VoiceEngine`](crate::VoiceEngine).
///
/// Presets are plain `Copy` values, so they can be sent to the audio thread without allocating.
/// Serialization is left to the preset store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Algorithm id in range \[0, 31\].
    pub algorithm: usize,
    pub operators: [OperatorSettings; 4],
    /// Operator 1's self feedback amount.
    pub feedback: f32,
    /// Global modulation depth.
    pub fm_depth: f32,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::DEFAULT_ID,
            operators: [OperatorSettings::default(); 4],
            feedback: 0.0,
            fm_depth: 1.0,
        }
    }
}

impl Preset {
    /// Create a new preset with the given algorithm, operator ratios and levels. All other
    /// settings are set to their defaults.
    pub const fn new(algorithm: usize, ratios: [f32; 4], levels: [f32; 4]) -> Self {
        Self {
            algorithm,
            operators: [
                OperatorSettings::new(ratios[0], levels[0]),
                OperatorSettings::new(ratios[1], levels[1]),
                OperatorSettings::new(ratios[2], levels[2]),
                OperatorSettings::new(ratios[3], levels[3]),
            ],
            feedback: 0.0,
            fm_depth: 1.0,
        }
    }

    /// Return a preset with the given feedback and modulation depth.
    pub const fn with_feedback_and_depth(mut self, feedback: f32, fm_depth: f32) -> Self {
        self.feedback = feedback;
        self.fm_depth = fm_depth;
        self
    }
}

// -------------------------------------------------------------------------------------------------

/// A named, categorized [`Preset`] from the factory library.
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryPreset {
    pub name: &'static str,
    pub category: PresetCategory,
    pub preset: Preset,
}

// -------------------------------------------------------------------------------------------------

mod factory;
pub use factory::{factory_preset, factory_presets};
