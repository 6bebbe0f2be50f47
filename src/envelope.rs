//! Classic linear ADSR envelope, as used by FM operators.

// -------------------------------------------------------------------------------------------------

/// Current processing stage in a [`AdsrEnvelope`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AdsrStage {
    #[default]
    /// Before attack and after release (zero volume).
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

// -------------------------------------------------------------------------------------------------

/// ADSR envelope parameters that define the envelope shape for a [`AdsrEnvelope`].
///
/// Times are specified in seconds and are stored as they are given. Times below
/// [`AdsrParameters::MIN_TIME`] get clamped while processing only, so parameters always
/// read back exactly as they were set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParameters {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level in range \[0, 1\].
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl AdsrParameters {
    /// Shortest possible stage time in seconds.
    pub const MIN_TIME: f32 = 0.001;

    /// Create new ADSR parameters.
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Per sample level increment in the attack stage.
    #[inline]
    fn attack_rate(&self, sample_rate: u32) -> f32 {
        1.0 / (Self::clamp_time(self.attack) * sample_rate as f32)
    }

    /// Per sample level decrement in the decay stage.
    #[inline]
    fn decay_rate(&self, sample_rate: u32) -> f32 {
        (1.0 - self.sustain_level()) / (Self::clamp_time(self.decay) * sample_rate as f32)
    }

    /// Per sample level decrement in the release stage.
    ///
    /// NB: the release slope is based on the sustain level and not on the level the release
    /// started from, so releasing from a level above sustain takes longer than configured.
    /// With a zero sustain level the slope would be zero and the level would be held forever,
    /// so the release stage then deliberately ends immediately instead.
    #[inline]
    fn release_rate(&self, sample_rate: u32) -> f32 {
        self.sustain_level() / (Self::clamp_time(self.release) * sample_rate as f32)
    }

    #[inline]
    fn sustain_level(&self) -> f32 {
        if self.sustain.is_nan() {
            0.0
        } else {
            self.sustain.clamp(0.0, 1.0)
        }
    }

    #[inline]
    fn clamp_time(time: f32) -> f32 {
        if time.is_nan() {
            Self::MIN_TIME
        } else {
            time.max(Self::MIN_TIME)
        }
    }
}

impl Default for AdsrParameters {
    fn default() -> Self {
        Self::new(0.01, 0.1, 0.7, 0.5)
    }
}

// -------------------------------------------------------------------------------------------------

/// Classic linear ADSR envelope with owned parameter state.
///
/// Retriggering an envelope does not reset its level: a new attack continues from the
/// current level, which avoids clicks when retriggering while a note is still sounding.
#[derive(Debug, Default, Clone)]
pub struct AdsrEnvelope {
    parameters: AdsrParameters,
    stage: AdsrStage,
    level: f32,
}

impl AdsrEnvelope {
    /// Create a new idle ADSR envelope with the given parameters.
    pub fn new(parameters: AdsrParameters) -> Self {
        Self {
            parameters,
            stage: AdsrStage::Idle,
            level: 0.0,
        }
    }

    /// Access the envelope's parameters.
    pub fn parameters(&self) -> &AdsrParameters {
        &self.parameters
    }
    /// Set new envelope parameters. Applies to the running stage too.
    pub fn set_parameters(&mut self, parameters: AdsrParameters) {
        self.parameters = parameters;
    }

    /// Return the envelope's current stage.
    #[inline(always)]
    pub fn stage(&self) -> AdsrStage {
        self.stage
    }

    /// Return the envelope's current (last processed) output value.
    #[inline(always)]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Start the attack stage. Keeps the current level.
    pub fn note_on(&mut self) {
        self.stage = AdsrStage::Attack;
    }

    /// Start the release stage, regardless of the current stage.
    pub fn note_off(&mut self) {
        self.stage = AdsrStage::Release;
    }

    /// Immediately silence the envelope and set state to Idle.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.stage = AdsrStage::Idle;
    }

    /// Compute and return one output sample in range \[0, 1\].
    #[inline]
    pub fn run(&mut self, sample_rate: u32) -> f32 {
        debug_assert!(sample_rate > 0, "Invalid sample rate");
        let parameters = &self.parameters;
        match self.stage {
            AdsrStage::Idle => {
                self.level = 0.0;
            }

            AdsrStage::Attack => {
                self.level += parameters.attack_rate(sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = AdsrStage::Decay;
                }
            }

            AdsrStage::Decay => {
                let sustain = parameters.sustain_level();
                self.level -= parameters.decay_rate(sample_rate);
                if self.level <= sustain {
                    self.level = sustain;
                    self.stage = AdsrStage::Sustain;
                }
            }

            AdsrStage::Sustain => {
                self.level = parameters.sustain_level();
            }

            AdsrStage::Release => {
                let rate = parameters.release_rate(sample_rate);
                self.level -= rate;
                if self.level <= 0.0 || rate <= 0.0 {
                    self.level = 0.0;
                    self.stage = AdsrStage::Idle;
                }
            }
        }
        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    /// Process a buffer of samples, writing envelope values to output.
    /// This can be more efficient than calling `run()` per sample, especially
    /// in idle and sustain stages.
    #[inline]
    pub fn process(&mut self, sample_rate: u32, output: &mut [f32]) {
        match self.stage {
            AdsrStage::Idle => {
                self.level = 0.0;
                output.fill(0.0);
            }
            AdsrStage::Sustain => {
                self.level = self.parameters.sustain_level();
                output.fill(self.level);
            }
            _ => {
                for sample in output.iter_mut() {
                    *sample = self.run(sample_rate);
                }
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
