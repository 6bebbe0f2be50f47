//! FM operator: an oscillator with its own envelope and LFO.

use std::{f64::consts::PI, fmt};

use rand::Rng;

use crate::{
    envelope::{AdsrEnvelope, AdsrParameters},
    lfo::Lfo,
    waveform::{phase_increment, wrap_phase, Waveform},
    Error,
};

// -------------------------------------------------------------------------------------------------

/// Index of one of the four operators of a voice. Can only hold values in range \[0, 3\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorIndex(usize);

impl OperatorIndex {
    /// Number of operators in a voice.
    pub const COUNT: usize = 4;

    /// Create a new operator index. Returns `None` for indices outside of \[0, 3\].
    pub const fn new(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The zero based index of the operator.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Iterate over all operator indices.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}

impl TryFrom<usize> for OperatorIndex {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| {
            Error::ParameterError(format!(
                "Operator index must be < {}, but is {index}",
                Self::COUNT
            ))
        })
    }
}

impl From<OperatorIndex> for usize {
    fn from(index: OperatorIndex) -> Self {
        index.0
    }
}

impl fmt::Display for OperatorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // operators are displayed one-based
        write!(f, "OP{}", self.0 + 1)
    }
}

// -------------------------------------------------------------------------------------------------

/// Static settings of an [`Operator`]: everything but its running state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorSettings {
    /// Frequency as multiple of the voice's fundamental.
    pub ratio: f32,
    /// Output level in range \[0, 1\].
    pub level: f32,
    pub waveform: Waveform,
    pub envelope: AdsrParameters,
    /// LFO rate in Hz.
    pub lfo_rate: f32,
    /// LFO amount in range \[0, 1\].
    pub lfo_amount: f32,
    /// Scales the note velocity's effect on the operator's amplitude.
    pub velocity_sensitivity: f32,
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            level: 1.0,
            waveform: Waveform::default(),
            envelope: AdsrParameters::default(),
            lfo_rate: 1.0,
            lfo_amount: 0.0,
            velocity_sensitivity: 1.0,
        }
    }
}

impl OperatorSettings {
    /// Create new default settings with the given ratio and level.
    pub const fn new(ratio: f32, level: f32) -> Self {
        Self {
            ratio,
            level,
            waveform: Waveform::Sine,
            envelope: AdsrParameters::new(0.01, 0.1, 0.7, 0.5),
            lfo_rate: 1.0,
            lfo_amount: 0.0,
            velocity_sensitivity: 1.0,
        }
    }

    /// Return settings with the given waveform.
    pub const fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Return settings with the given envelope.
    pub const fn with_envelope(
        mut self,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Self {
        self.envelope = AdsrParameters::new(attack, decay, sustain, release);
        self
    }

    /// Return settings with the given LFO rate and amount.
    pub const fn with_lfo(mut self, rate: f32, amount: f32) -> Self {
        self.lfo_rate = rate;
        self.lfo_amount = amount;
        self
    }

    /// Return settings with the given velocity sensitivity.
    pub const fn with_velocity_sensitivity(mut self, sensitivity: f32) -> Self {
        self.velocity_sensitivity = sensitivity;
        self
    }
}

// -------------------------------------------------------------------------------------------------

/// A single FM operator: phase accumulator, waveform, envelope and LFO.
///
/// The operator's phase is kept in range \[0, 2π) at all times.
#[derive(Debug, Clone)]
pub struct Operator {
    ratio: f32,
    level: f32,
    waveform: Waveform,
    velocity_sensitivity: f32,
    phase: f64,
    envelope: AdsrEnvelope,
    lfo: Lfo,
}

impl Default for Operator {
    fn default() -> Self {
        Self::new(OperatorSettings::default())
    }
}

impl Operator {
    /// Create a new, silent operator with the given settings.
    pub fn new(settings: OperatorSettings) -> Self {
        Self {
            ratio: settings.ratio,
            level: settings.level,
            waveform: settings.waveform,
            velocity_sensitivity: settings.velocity_sensitivity,
            phase: 0.0,
            envelope: AdsrEnvelope::new(settings.envelope),
            lfo: Lfo::new(settings.lfo_rate, settings.lfo_amount),
        }
    }

    /// The operator's current settings.
    pub fn settings(&self) -> OperatorSettings {
        OperatorSettings {
            ratio: self.ratio,
            level: self.level,
            waveform: self.waveform,
            envelope: *self.envelope.parameters(),
            lfo_rate: self.lfo.rate(),
            lfo_amount: self.lfo.amount(),
            velocity_sensitivity: self.velocity_sensitivity,
        }
    }

    /// Apply new settings. Keeps the running phases and envelope state.
    pub fn apply_settings(&mut self, settings: &OperatorSettings) {
        self.ratio = settings.ratio;
        self.level = settings.level;
        self.waveform = settings.waveform;
        self.velocity_sensitivity = settings.velocity_sensitivity;
        self.envelope.set_parameters(settings.envelope);
        self.lfo.set_rate(settings.lfo_rate);
        self.lfo.set_amount(settings.lfo_amount);
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
    }

    pub fn level(&self) -> f32 {
        self.level
    }
    pub fn set_level(&mut self, level: f32) {
        self.level = level;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn velocity_sensitivity(&self) -> f32 {
        self.velocity_sensitivity
    }
    pub fn set_velocity_sensitivity(&mut self, sensitivity: f32) {
        self.velocity_sensitivity = sensitivity;
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }
    pub fn envelope_mut(&mut self) -> &mut AdsrEnvelope {
        &mut self.envelope
    }

    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }
    pub fn lfo_mut(&mut self) -> &mut Lfo {
        &mut self.lfo
    }

    /// Absolute frequency of the operator for the given fundamental.
    #[inline]
    pub fn frequency(&self, fundamental: f64) -> f64 {
        fundamental * self.ratio as f64
    }

    /// Trigger the envelope. Phases are not reset.
    pub fn note_on(&mut self) {
        self.envelope.note_on();
    }

    /// Release the envelope.
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Compute one output sample with the given phase modulation in radians, then advance
    /// the operator's LFO, envelope and phase by one sample.
    #[inline]
    pub fn run<R: Rng>(
        &mut self,
        modulation: f64,
        fundamental: f64,
        velocity: f32,
        sample_rate: u32,
        rng: &mut R,
    ) -> f64 {
        let lfo = self.lfo.run(sample_rate);
        let envelope = self.envelope.run(sample_rate) as f64;
        let amplitude =
            self.level as f64 * envelope * velocity as f64 * self.velocity_sensitivity as f64;

        let modulated_phase = self.phase + modulation + lfo * PI;
        let output = self.waveform.generate(modulated_phase, rng) * amplitude;

        let phase_inc = phase_increment(self.frequency(fundamental), sample_rate);
        self.phase = wrap_phase(self.phase + phase_inc);
        output
    }
}

// -------------------------------------------------------------------------------------------------
