use crate::{
    parameter::{FmParameter, ParameterValueUpdate},
    preset::Preset,
};

// -------------------------------------------------------------------------------------------------

/// Messages to control a [`VoiceEngine`](crate::VoiceEngine) from other threads, sent via a
/// [`VoiceEngineHandle`](crate::VoiceEngineHandle).
///
/// Messages are applied at the start of the next render call in the order they were sent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum VoiceEngineMessage {
    /// Trigger all operator envelopes with the given MIDI note and velocity.
    NoteOn { note: u8, velocity: f32 },
    /// Release all operator envelopes.
    NoteOff,
    /// Select a new algorithm.
    SetAlgorithm(usize),
    /// Interpolate the selected algorithm's routing towards the target algorithm's routing.
    MorphToAlgorithm { target: usize, amount: f32 },
    /// Update a single engine parameter.
    SetParameter {
        parameter: FmParameter,
        value: ParameterValueUpdate,
    },
    /// Replace all sound parameters at once.
    LoadPreset(Preset),
}
