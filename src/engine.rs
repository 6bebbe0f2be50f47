//! Four operator FM voice engine.

use std::sync::Arc;

use crossbeam_queue::ArrayQueue;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    algorithm::{Algorithm, AlgorithmMatrix},
    envelope::AdsrParameters,
    operator::{Operator, OperatorIndex},
    parameter::{FmParameter, ParameterValueUpdate},
    preset::Preset,
    source::Source,
    utils::{note_to_frequency, soft_clip},
    Error, Waveform,
};

// -------------------------------------------------------------------------------------------------

mod handle;
mod message;
mod options;

pub use handle::VoiceEngineHandle;
pub use message::VoiceEngineMessage;
pub use options::VoiceEngineOptions;

// -------------------------------------------------------------------------------------------------

const OPS: usize = OperatorIndex::COUNT;

// -------------------------------------------------------------------------------------------------

/// A monophonic four operator FM synthesizer voice.
///
/// The engine owns four [`Operator`]s whose outputs modulate each other as defined by the
/// routing matrix of the selected [`Algorithm`]. Modulation is one sample delayed: each
/// operator gets modulated by the outputs of the previous sample frame. Operator 1 additionally
/// receives its own previous output, scaled by the engine's feedback amount.
///
/// The engine can be driven directly via `&mut` methods, e.g. for offline rendering, or from
/// other threads via a [`VoiceEngineHandle`]. Handle messages get applied at the start of each
/// [`render`](Self::render) call. Rendering never allocates, blocks or fails.
pub struct VoiceEngine {
    operators: [Operator; OPS],
    algorithm: usize,
    matrix: AlgorithmMatrix,
    carriers: [bool; OPS],
    fundamental: f64,
    feedback: f32,
    fm_depth: f32,
    feedback_register: f64,
    prior_outputs: [f64; OPS],
    is_note_on: bool,
    note: u8,
    velocity: f32,
    sample_rate: u32,
    rng: SmallRng,
    message_queue: Arc<ArrayQueue<VoiceEngineMessage>>,
}

impl Default for VoiceEngine {
    fn default() -> Self {
        Self::with_validated_options(VoiceEngineOptions::default())
    }
}

impl VoiceEngine {
    /// Initial note, before the first note on event.
    const INITIAL_NOTE: u8 = 60;

    /// Create a new engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new engine with the given options.
    pub fn with_options(options: VoiceEngineOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self::with_validated_options(options))
    }

    fn with_validated_options(options: VoiceEngineOptions) -> Self {
        let algorithm = Algorithm::select(Algorithm::DEFAULT_ID);
        Self {
            operators: Default::default(),
            algorithm: algorithm.id(),
            matrix: *algorithm.matrix(),
            carriers: *algorithm.carriers(),
            fundamental: note_to_frequency(Self::INITIAL_NOTE),
            feedback: 0.0,
            fm_depth: 1.0,
            feedback_register: 0.0,
            prior_outputs: [0.0; OPS],
            is_note_on: false,
            note: Self::INITIAL_NOTE,
            velocity: 1.0,
            sample_rate: options.sample_rate,
            rng: SmallRng::from_rng(&mut rand::rng()),
            message_queue: Arc::new(ArrayQueue::new(options.message_queue_size)),
        }
    }

    /// Create a new handle to control this engine from other threads.
    pub fn handle(&self) -> VoiceEngineHandle {
        VoiceEngineHandle::new(Arc::clone(&self.message_queue))
    }

    // ---------------------------------------------------------------------------------------------

    /// The engine's output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Id of the selected algorithm.
    pub fn algorithm(&self) -> usize {
        self.algorithm
    }

    /// The currently applied, possibly morphed, routing matrix.
    pub fn matrix(&self) -> &AlgorithmMatrix {
        &self.matrix
    }

    /// The currently applied carrier mask.
    pub fn carriers(&self) -> &[bool; OPS] {
        &self.carriers
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn fm_depth(&self) -> f32 {
        self.fm_depth
    }

    /// Fundamental frequency of the last triggered note in Hz.
    pub fn fundamental(&self) -> f64 {
        self.fundamental
    }

    /// Last triggered MIDI note.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Last triggered note velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// True after a note on and before the following note off.
    pub fn is_note_on(&self) -> bool {
        self.is_note_on
    }

    pub fn operators(&self) -> &[Operator; OPS] {
        &self.operators
    }

    /// Access a single operator. Returns `None` for invalid indices.
    pub fn operator(&self, index: usize) -> Option<&Operator> {
        self.operators.get(index)
    }

    /// Absolute frequency of the given operator in Hz. Returns `None` for invalid indices.
    pub fn operator_frequency(&self, index: usize) -> Option<f64> {
        self.operator(index)
            .map(|operator| operator.frequency(self.fundamental))
    }

    // ---------------------------------------------------------------------------------------------

    /// Select an algorithm. Invalid ids fall back to the default algorithm.
    pub fn set_algorithm(&mut self, algorithm: usize) {
        let algorithm = Algorithm::select(algorithm);
        self.algorithm = algorithm.id();
        self.matrix = *algorithm.matrix();
        self.carriers = *algorithm.carriers();
    }

    /// Interpolate the routing matrix between the selected algorithm and the given target
    /// algorithm. `amount` is clamped to \[0, 1\], where 0 applies the selected algorithm's and
    /// 1 the target algorithm's routing.
    ///
    /// The carrier mask of the selected algorithm is kept. Morphs always start from the
    /// selected algorithm's matrix, so they do not accumulate.
    pub fn morph_to_algorithm(&mut self, target: usize, amount: f32) {
        let amount = if amount.is_nan() {
            0.0
        } else {
            amount.clamp(0.0, 1.0)
        };
        let current = Algorithm::select(self.algorithm).matrix();
        let target = Algorithm::select(target).matrix();
        for (row, (current_row, target_row)) in
            self.matrix.iter_mut().zip(current.iter().zip(target))
        {
            for (cell, (from, to)) in row.iter_mut().zip(current_row.iter().zip(target_row)) {
                *cell = from + (to - from) * amount;
            }
        }
    }

    /// Set the feedback amount of operator 1.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Set the global modulation depth.
    pub fn set_fm_depth(&mut self, fm_depth: f32) {
        self.fm_depth = fm_depth;
    }

    /// Set an operator's frequency ratio. Invalid operator indices are ignored.
    pub fn set_operator_ratio(&mut self, index: usize, ratio: f32) {
        if let Some(operator) = self.operators.get_mut(index) {
            operator.set_ratio(ratio);
        }
    }

    /// Set an operator's output level. Invalid operator indices are ignored.
    pub fn set_operator_level(&mut self, index: usize, level: f32) {
        if let Some(operator) = self.operators.get_mut(index) {
            operator.set_level(level);
        }
    }

    /// Set an operator's waveform. Invalid operator indices are ignored.
    pub fn set_operator_waveform(&mut self, index: usize, waveform: Waveform) {
        if let Some(operator) = self.operators.get_mut(index) {
            operator.set_waveform(waveform);
        }
    }

    /// Set an operator's envelope times in seconds and sustain level. Invalid operator
    /// indices are ignored.
    pub fn set_operator_envelope(
        &mut self,
        index: usize,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) {
        if let Some(operator) = self.operators.get_mut(index) {
            let parameters = AdsrParameters::new(attack, decay, sustain, release);
            operator.envelope_mut().set_parameters(parameters);
        }
    }

    /// Set an operator's LFO rate in Hz and amount. Invalid operator indices are ignored.
    pub fn set_operator_lfo(&mut self, index: usize, rate: f32, amount: f32) {
        if let Some(operator) = self.operators.get_mut(index) {
            operator.lfo_mut().set_rate(rate);
            operator.lfo_mut().set_amount(amount);
        }
    }

    /// Set an operator's velocity sensitivity. Invalid operator indices are ignored.
    pub fn set_operator_velocity_sensitivity(&mut self, index: usize, sensitivity: f32) {
        if let Some(operator) = self.operators.get_mut(index) {
            operator.set_velocity_sensitivity(sensitivity);
        }
    }

    // ---------------------------------------------------------------------------------------------

    /// Start a note: sets the fundamental from the given MIDI note and triggers all operator
    /// envelopes. Velocity is clamped to \[0, 1\]. Oscillator phases are not reset.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let note = note.min(127);
        self.note = note;
        self.velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(0.0, 1.0)
        };
        self.is_note_on = true;
        self.fundamental = note_to_frequency(note);
        for operator in &mut self.operators {
            operator.note_on();
        }
    }

    /// Release all operator envelopes. Rendering continues through the release tails.
    pub fn note_off(&mut self) {
        self.is_note_on = false;
        for operator in &mut self.operators {
            operator.note_off();
        }
    }

    // ---------------------------------------------------------------------------------------------

    /// Apply a parameter lock with a normalized value in range \[0, 1\].
    pub fn apply_parameter_lock(&mut self, parameter: FmParameter, normalized: f32) {
        self.apply_parameter_update(parameter, ParameterValueUpdate::Normalized(normalized));
    }

    /// Apply a parameter lock, addressed by its string key, e.g. `"FM_ALG"` or `"OP3_LVL"`.
    ///
    /// Unknown keys are silently ignored.
    pub fn apply_parameter_lock_by_key(&mut self, key: &str, normalized: f32) {
        if let Ok(parameter) = key.parse::<FmParameter>() {
            self.apply_parameter_lock(parameter, normalized);
        }
    }

    /// Apply a plain or normalized parameter value update.
    pub fn apply_parameter_update(
        &mut self,
        parameter: FmParameter,
        value: ParameterValueUpdate,
    ) {
        match parameter {
            FmParameter::Algorithm => {
                let algorithm = FmParameter::ALGORITHM.value_from_update(value);
                self.set_algorithm(algorithm.max(0) as usize);
            }
            FmParameter::FmDepth => {
                self.fm_depth = FmParameter::FM_DEPTH.value_from_update(value);
            }
            FmParameter::Feedback => {
                self.feedback = FmParameter::FEEDBACK.value_from_update(value);
            }
            FmParameter::OperatorRatio(op) => {
                let ratio = FmParameter::OPERATOR_RATIO.value_from_update(value);
                self.operators[op.index()].set_ratio(ratio);
            }
            FmParameter::OperatorLevel(op) => {
                let level = FmParameter::OPERATOR_LEVEL.value_from_update(value);
                self.operators[op.index()].set_level(level);
            }
            FmParameter::OperatorWaveform(op) => {
                if let Some(waveform) = FmParameter::OPERATOR_WAVEFORM.value_from_update(value) {
                    self.operators[op.index()].set_waveform(waveform);
                }
            }
            FmParameter::OperatorAttack(op) => {
                let attack = FmParameter::OPERATOR_ATTACK.value_from_update(value);
                self.update_envelope(op, |parameters| parameters.attack = attack);
            }
            FmParameter::OperatorDecay(op) => {
                let decay = FmParameter::OPERATOR_DECAY.value_from_update(value);
                self.update_envelope(op, |parameters| parameters.decay = decay);
            }
            FmParameter::OperatorSustain(op) => {
                let sustain = FmParameter::OPERATOR_SUSTAIN.value_from_update(value);
                self.update_envelope(op, |parameters| parameters.sustain = sustain);
            }
            FmParameter::OperatorRelease(op) => {
                let release = FmParameter::OPERATOR_RELEASE.value_from_update(value);
                self.update_envelope(op, |parameters| parameters.release = release);
            }
            FmParameter::OperatorLfoRate(op) => {
                let rate = FmParameter::OPERATOR_LFO_RATE.value_from_update(value);
                self.operators[op.index()].lfo_mut().set_rate(rate);
            }
            FmParameter::OperatorLfoAmount(op) => {
                let amount = FmParameter::OPERATOR_LFO_AMOUNT.value_from_update(value);
                self.operators[op.index()].lfo_mut().set_amount(amount);
            }
        }
    }

    fn update_envelope<F: FnOnce(&mut AdsrParameters)>(&mut self, op: OperatorIndex, update: F) {
        let envelope = self.operators[op.index()].envelope_mut();
        let mut parameters = *envelope.parameters();
        update(&mut parameters);
        envelope.set_parameters(parameters);
    }

    // ---------------------------------------------------------------------------------------------

    /// Replace the algorithm and all operator, envelope, LFO and global settings at once.
    /// Running phases and envelope stages are kept.
    pub fn load_preset(&mut self, preset: &Preset) {
        self.set_algorithm(preset.algorithm);
        for (operator, settings) in self.operators.iter_mut().zip(&preset.operators) {
            operator.apply_settings(settings);
        }
        self.feedback = preset.feedback;
        self.fm_depth = preset.fm_depth;
    }

    /// Create a preset from the engine's current settings.
    pub fn capture_preset(&self) -> Preset {
        Preset {
            algorithm: self.algorithm,
            operators: [
                self.operators[0].settings(),
                self.operators[1].settings(),
                self.operators[2].settings(),
                self.operators[3].settings(),
            ],
            feedback: self.feedback,
            fm_depth: self.fm_depth,
        }
    }

    // ---------------------------------------------------------------------------------------------

    /// Apply all pending handle messages, then render mono samples into the given buffer.
    pub fn render(&mut self, output: &mut [f32]) {
        self.process_messages();
        for sample in output.iter_mut() {
            *sample = self.run();
        }
    }

    /// Process pending messages from the queue.
    fn process_messages(&mut self) {
        while let Some(message) = self.message_queue.pop() {
            match message {
                VoiceEngineMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
                VoiceEngineMessage::NoteOff => self.note_off(),
                VoiceEngineMessage::SetAlgorithm(algorithm) => self.set_algorithm(algorithm),
                VoiceEngineMessage::MorphToAlgorithm { target, amount } => {
                    self.morph_to_algorithm(target, amount)
                }
                VoiceEngineMessage::SetParameter { parameter, value } => {
                    self.apply_parameter_update(parameter, value)
                }
                VoiceEngineMessage::LoadPreset(preset) => self.load_preset(&preset),
            }
        }
    }

    /// Compute a single output sample.
    #[inline]
    fn run(&mut self) -> f32 {
        // route previous frame's operator outputs
        let fm_depth = self.fm_depth as f64;
        let mut modulation = [0.0; OPS];
        for (prior_output, weights) in self.prior_outputs.iter().zip(&self.matrix) {
            for (target, weight) in modulation.iter_mut().zip(weights) {
                if *weight > 0.0 {
                    *target += prior_output * *weight as f64 * fm_depth;
                }
            }
        }
        modulation[0] += self.feedback_register * self.feedback as f64;

        let mut output = 0.0;
        for (index, operator) in self.operators.iter_mut().enumerate() {
            let mut sample = operator.run(
                modulation[index],
                self.fundamental,
                self.velocity,
                self.sample_rate,
                &mut self.rng,
            );
            if !sample.is_finite() {
                sample = 0.0;
            }
            self.prior_outputs[index] = sample;
            if self.carriers[index] {
                output += sample;
            }
        }
        self.feedback_register = self.prior_outputs[0];

        soft_clip(output)
    }
}

// -------------------------------------------------------------------------------------------------

impl Source for VoiceEngine {
    fn write(&mut self, output: &mut [f32]) -> usize {
        self.render(output);
        output.len()
    }

    fn channel_count(&self) -> usize {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::{PI, TAU};

    use crate::preset::factory_presets;

    fn all_operators_at_level(engine: &mut VoiceEngine, levels: [f32; OPS]) {
        for (index, level) in levels.into_iter().enumerate() {
            engine.set_operator_level(index, level);
        }
    }

    #[test]
    fn frequencies() {
        let mut engine = VoiceEngine::new();
        engine.note_on(69, 1.0);
        assert_eq!(engine.fundamental(), 440.0);
        engine.set_operator_ratio(0, 2.0);
        assert_eq!(engine.operator_frequency(0), Some(880.0));
        assert_eq!(engine.operator_frequency(4), None);

        let mut buffer = [0.0; 1];
        engine.render(&mut buffer);
        let increment = engine.operators()[0].phase();
        assert!((increment - 0.12533).abs() < 1e-4);
        assert!((increment - 2.0 * PI * 880.0 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_operator_indices_are_ignored() {
        let mut engine = VoiceEngine::new();
        let preset = engine.capture_preset();
        engine.set_operator_ratio(4, 3.0);
        engine.set_operator_level(17, 0.1);
        engine.set_operator_waveform(4, Waveform::Noise);
        engine.set_operator_envelope(4, 1.0, 1.0, 1.0, 1.0);
        engine.set_operator_lfo(99, 1.0, 1.0);
        engine.set_operator_velocity_sensitivity(4, 0.0);
        assert_eq!(engine.capture_preset(), preset);
    }

    #[test]
    fn algorithm_selection() {
        let mut engine = VoiceEngine::new();
        engine.set_algorithm(5);
        assert_eq!(engine.algorithm(), 5);
        assert_eq!(engine.matrix(), Algorithm::select(5).matrix());
        assert_eq!(engine.carriers(), Algorithm::select(5).carriers());

        engine.set_algorithm(100);
        assert_eq!(engine.algorithm(), Algorithm::DEFAULT_ID);
        assert_eq!(engine.matrix(), Algorithm::select(0).matrix());
    }

    #[test]
    fn morphing() {
        let mut engine = VoiceEngine::new();
        engine.set_algorithm(1);
        engine.morph_to_algorithm(19, 1.0);

        let target = Algorithm::select(19);
        for (row, target_row) in engine.matrix().iter().zip(target.matrix()) {
            for (cell, target_cell) in row.iter().zip(target_row) {
                assert!((cell - target_cell).abs() < 1e-6);
            }
        }
        // carriers are not morphed
        assert_eq!(engine.carriers(), Algorithm::select(1).carriers());

        // morphs do not accumulate
        engine.morph_to_algorithm(19, 0.5);
        engine.morph_to_algorithm(19, 0.5);
        assert!((engine.matrix()[0][1] - 1.5).abs() < 1e-6);

        engine.morph_to_algorithm(19, 0.0);
        assert_eq!(engine.matrix(), Algorithm::select(1).matrix());
    }

    #[test]
    fn parameter_locks() {
        let mut engine = VoiceEngine::new();
        engine.apply_parameter_lock(FmParameter::Algorithm, 1.0);
        assert_eq!(engine.algorithm(), 31);
        engine.apply_parameter_lock_by_key("FM_ALG", 0.5);
        assert_eq!(engine.algorithm(), 15);
        engine.apply_parameter_lock_by_key("FM_ALG", 0.99);
        assert_eq!(engine.algorithm(), 30);
        engine.apply_parameter_lock_by_key("FM_ALG", 15.0 / 31.0);
        assert_eq!(engine.algorithm(), 15);
        engine.apply_parameter_lock_by_key("FM_DEPTH", 0.5);
        assert_eq!(engine.fm_depth(), 5.0);
        engine.apply_parameter_lock_by_key("FM_FB", 0.25);
        assert_eq!(engine.feedback(), 0.25);
        engine.apply_parameter_lock_by_key("OP2_RATIO", 0.25);
        assert_eq!(engine.operators()[1].ratio(), 2.0);
        engine.apply_parameter_lock_by_key("OP3_LVL", 0.3);
        assert_eq!(engine.operators()[2].level(), 0.3);
        engine.apply_parameter_lock_by_key("OP4_WAVE", 1.0);
        assert_eq!(engine.operators()[3].waveform(), Waveform::Noise);
        engine.apply_parameter_lock_by_key("OP1_SUS", 0.5);
        assert_eq!(engine.operators()[0].envelope().parameters().sustain, 0.5);
        engine.apply_parameter_lock_by_key("OP1_LFO_RATE", 0.5);
        assert_eq!(engine.operators()[0].lfo().rate(), 10.0);
        // out of range values are clamped
        engine.apply_parameter_lock_by_key("OP3_LVL", 7.0);
        assert_eq!(engine.operators()[2].level(), 1.0);

        // invalid plain enum indices are ignored
        let op = OperatorIndex::new(3).unwrap();
        engine.apply_parameter_update(
            FmParameter::OperatorWaveform(op),
            ParameterValueUpdate::Plain(9.0),
        );
        assert_eq!(engine.operators()[3].waveform(), Waveform::Noise);

        // unknown keys are ignored
        let preset = engine.capture_preset();
        engine.apply_parameter_lock_by_key("FILTER_CUTOFF", 0.5);
        engine.apply_parameter_lock_by_key("OP5_RATIO", 0.5);
        assert_eq!(engine.capture_preset(), preset);
    }

    #[test]
    fn preset_round_trip() {
        let mut engine = VoiceEngine::new();
        for factory in factory_presets() {
            engine.load_preset(&factory.preset);
            assert_eq!(engine.capture_preset(), factory.preset, "{}", factory.name);
        }
    }

    #[test]
    fn parallel_carriers() {
        let mut engine = VoiceEngine::new();
        engine.set_algorithm(2);
        all_operators_at_level(&mut engine, [1.0, 0.0, 0.0, 0.0]);
        // instant attack, full sustain
        engine.set_operator_envelope(0, 0.001, 0.001, 1.0, 0.5);
        engine.note_on(69, 1.0);

        let mut buffer = vec![0.0; 1024];
        engine.render(&mut buffer);

        // after the attack the operator runs at full level
        let increment = 2.0 * PI * 440.0 / 44100.0;
        for (frame, sample) in buffer.iter().enumerate().skip(100) {
            let phase = (frame as f64 * increment) % TAU;
            let expected = (phase.sin() * 0.7).tanh() * 0.8;
            assert!(
                (*sample as f64 - expected).abs() < 1e-4,
                "frame {frame}: {sample} != {expected}"
            );
        }
    }

    /// Render a single frame.
    fn render_frame(engine: &mut VoiceEngine) -> f32 {
        let mut frame = [0.0; 1];
        engine.render(&mut frame);
        frame[0]
    }

    #[test]
    fn modulation_is_delayed_by_one_frame() {
        let mut engine = VoiceEngine::new();
        // operator 1 modulates the carrier operator 2
        engine.set_algorithm(18);
        engine.set_fm_depth(2.0);
        engine.set_operator_ratio(0, 3.0);
        all_operators_at_level(&mut engine, [1.0, 1.0, 0.0, 0.0]);
        engine.note_on(69, 1.0);

        let mut prior_modulator = 0.0;
        let mut max_modulation_effect = 0.0_f64;
        for frame in 0..2000 {
            let modulator_phase = engine.operators()[0].phase();
            let carrier_phase = engine.operators()[1].phase();
            let sample = render_frame(&mut engine);
            let modulator_env = engine.operators()[0].envelope().level() as f64;
            let carrier_env = engine.operators()[1].envelope().level() as f64;

            let modulated = (carrier_phase + prior_modulator * 2.0).sin() * carrier_env;
            let expected = soft_clip(modulated);
            assert!(
                (sample - expected).abs() < 1e-6,
                "frame {frame}: {sample} != {expected}"
            );
            if frame == 0 {
                // nothing got modulated yet
                assert_eq!(sample, soft_clip(carrier_phase.sin() * carrier_env));
            }
            let unmodulated = carrier_phase.sin() * carrier_env;
            max_modulation_effect = max_modulation_effect.max((modulated - unmodulated).abs());

            prior_modulator = modulator_phase.sin() * modulator_env;
        }
        assert!(max_modulation_effect > 0.1);
    }

    #[test]
    fn feedback_uses_prior_output() {
        let mut engine = VoiceEngine::new();
        engine.set_algorithm(2);
        engine.set_feedback(0.8);
        all_operators_at_level(&mut engine, [1.0, 0.0, 0.0, 0.0]);
        engine.note_on(57, 1.0);

        let feedback = 0.8_f32 as f64;
        let mut prior_output = 0.0;
        let mut max_feedback_effect = 0.0_f64;
        for frame in 0..2000 {
            let phase = engine.operators()[0].phase();
            let sample = render_frame(&mut engine);
            let env = engine.operators()[0].envelope().level() as f64;

            let output = (phase + prior_output * feedback).sin() * env;
            let expected = soft_clip(output);
            assert!(
                (sample - expected).abs() < 1e-6,
                "frame {frame}: {sample} != {expected}"
            );
            max_feedback_effect = max_feedback_effect.max((output - phase.sin() * env).abs());
            prior_output = output;
        }
        assert!(max_feedback_effect > 0.1);
    }

    #[test]
    fn lfo_shifts_operator_phase() {
        let mut engine = VoiceEngine::new();
        engine.set_algorithm(2);
        all_operators_at_level(&mut engine, [1.0, 0.0, 0.0, 0.0]);
        engine.set_operator_lfo(0, 5.0, 0.5);
        engine.note_on(60, 1.0);

        let mut max_lfo_effect = 0.0_f64;
        for frame in 0..4410 {
            let phase = engine.operators()[0].phase();
            let lfo_phase = engine.operators()[0].lfo().phase();
            let sample = render_frame(&mut engine);
            let env = engine.operators()[0].envelope().level() as f64;

            let lfo = lfo_phase.sin() * 0.5_f32 as f64;
            let output = (phase + lfo * PI).sin() * env;
            let expected = soft_clip(output);
            assert!(
                (sample - expected).abs() < 1e-6,
                "frame {frame}: {sample} != {expected}"
            );
            max_lfo_effect = max_lfo_effect.max((output - phase.sin() * env).abs());
        }
        assert!(max_lfo_effect > 0.1);
    }

    #[test]
    fn bounded_output() {
        let mut engine = VoiceEngine::new();
        let mut buffer = vec![0.0; 512];
        for algorithm in 0..Algorithm::COUNT {
            engine.set_algorithm(algorithm);
            engine.set_fm_depth(10.0);
            engine.set_feedback(1.0);
            for index in 0..OPS {
                engine.set_operator_ratio(index, 8.0 - index as f32);
                engine.set_operator_lfo(index, 20.0, 1.0);
            }
            engine.note_on(127, 1.0);
            engine.render(&mut buffer);
            engine.note_off();
            engine.render(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite() && (-1.0..=1.0).contains(s)));
            for operator in engine.operators() {
                assert!((0.0..TAU).contains(&operator.phase()));
                assert!((0.0..TAU).contains(&operator.lfo().phase()));
            }
        }
    }

    #[test]
    fn invalid_values_render_silence() {
        let mut engine = VoiceEngine::new();
        engine.set_fm_depth(f32::NAN);
        engine.set_operator_ratio(0, f32::INFINITY);
        engine.note_on(60, 1.0);
        let mut buffer = vec![0.0; 256];
        engine.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite() && (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn release_tail() {
        let mut engine = VoiceEngine::new();
        engine.note_on(60, 1.0);
        let mut buffer = vec![0.0; 4410];
        engine.render(&mut buffer);
        engine.note_off();
        assert!(!engine.is_note_on());
        engine.render(&mut buffer);
        // default release is 0.5 seconds: still sounding
        assert!(buffer.iter().any(|s| s.abs() > 0.01));
        for _ in 0..10 {
            engine.render(&mut buffer);
        }
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn messages_apply_on_next_render() -> Result<(), Box<Error>> {
        let mut engine = VoiceEngine::new();
        let handle = engine.handle();
        handle.set_algorithm(7)?;
        handle.set_parameter_lock(FmParameter::FmDepth, 0.2)?;
        handle.note_on(69, 0.5)?;
        assert_eq!(engine.algorithm(), Algorithm::DEFAULT_ID);
        assert!(!engine.is_note_on());

        let mut buffer = [0.0; 16];
        engine.render(&mut buffer);
        assert_eq!(engine.algorithm(), 7);
        assert_eq!(engine.fm_depth(), 2.0);
        assert!(engine.is_note_on());
        assert_eq!(engine.velocity(), 0.5);
        assert_eq!(handle.pending_message_count(), 0);

        let preset = factory_presets()[9].preset;
        handle.load_preset(&preset)?;
        handle.note_off()?;
        engine.render(&mut buffer);
        assert_eq!(engine.capture_preset(), preset);
        assert!(!engine.is_note_on());
        Ok(())
    }

    #[test]
    fn full_queue_reports_send_error() -> Result<(), Box<Error>> {
        let options = VoiceEngineOptions::default().message_queue_size(1);
        let engine = VoiceEngine::with_options(options)?;
        let handle = engine.handle();
        handle.note_on(60, 1.0)?;
        assert!(matches!(handle.note_on(61, 1.0), Err(Error::SendError(_))));
        Ok(())
    }

    #[test]
    fn source_interface() {
        let options = VoiceEngineOptions::default().sample_rate(48000);
        let mut engine = VoiceEngine::with_options(options).unwrap();
        assert_eq!(Source::sample_rate(&engine), 48000);
        assert_eq!(engine.channel_count(), 1);
        let mut buffer = [1.0; 64];
        assert_eq!(engine.write(&mut buffer), 64);
        // silent before the first note
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[cfg(all(feature = "assert-allocs", debug_assertions))]
    #[test]
    fn render_does_not_allocate() {
        let mut engine = VoiceEngine::new();
        let handle = engine.handle();
        let preset = factory_presets()[18].preset;
        let mut buffer = vec![0.0; 1024];

        handle.load_preset(&preset).unwrap();
        handle.note_on(48, 0.8).unwrap();
        handle.morph_to_algorithm(3, 0.5).unwrap();
        handle.set_parameter_lock(FmParameter::Feedback, 0.5).unwrap();
        handle
            .set_parameter(
                FmParameter::OperatorWaveform(OperatorIndex::new(1).unwrap()),
                ParameterValueUpdate::Plain(4.0),
            )
            .unwrap();

        // violations only get counted with assert_no_alloc's `warn_debug` feature
        assert_no_alloc::reset_violation_count();
        assert_no_alloc::assert_no_alloc(|| {
            engine.render(&mut buffer);
        });
        handle.note_off().unwrap();
        assert_no_alloc::assert_no_alloc(|| {
            engine.render(&mut buffer);
        });
        assert_eq!(assert_no_alloc::violation_count(), 0);

        // make sure violations actually get detected
        assert_no_alloc::assert_no_alloc(|| {
            std::hint::black_box(vec![0_u8; 1024]);
        });
        assert!(assert_no_alloc::violation_count() > 0);
        assert_no_alloc::reset_violation_count();
    }
}
