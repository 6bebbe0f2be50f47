use std::sync::Arc;

use crossbeam_queue::ArrayQueue;

use super::message::VoiceEngineMessage;
use crate::{
    error::Error,
    parameter::{FmParameter, ParameterValueUpdate},
    preset::Preset,
};

// -------------------------------------------------------------------------------------------------

/// A cloneable, `Send`able handle to control a [`VoiceEngine`](crate::VoiceEngine) from
/// control threads, e.g. a sequencer or UI, while the engine renders on the audio thread.
///
/// All messages are queued and get applied at the start of the engine's next render call.
#[derive(Clone)]
pub struct VoiceEngineHandle {
    message_queue: Arc<ArrayQueue<VoiceEngineMessage>>,
}

impl VoiceEngineHandle {
    pub(crate) fn new(message_queue: Arc<ArrayQueue<VoiceEngineMessage>>) -> Self {
        Self { message_queue }
    }

    /// Number of messages which are waiting to be applied by the engine.
    pub fn pending_message_count(&self) -> usize {
        self.message_queue.len()
    }

    /// Trigger a note on event with the given MIDI note and velocity in range \[0, 1\].
    pub fn note_on(&self, note: u8, velocity: f32) -> Result<(), Error> {
        self.send(VoiceEngineMessage::NoteOn { note, velocity }, "note_on")
    }

    /// Trigger a note off event.
    ///
    /// Note offs are force pushed into the queue: when the queue is full, the oldest pending
    /// message gets dropped to avoid hanging notes.
    pub fn note_off(&self) -> Result<(), Error> {
        if self
            .message_queue
            .force_push(VoiceEngineMessage::NoteOff)
            .is_some()
        {
            log::warn!("Voice engine message queue is full. Dropped a message to send a note off.");
            log::warn!("Increase the message queue size to prevent this from happening...");
        }
        Ok(())
    }

    /// Select a new algorithm. Invalid ids fall back to the default algorithm.
    pub fn set_algorithm(&self, algorithm: usize) -> Result<(), Error> {
        self.send(VoiceEngineMessage::SetAlgorithm(algorithm), "set_algorithm")
    }

    /// Morph the selected algorithm's routing towards the given target algorithm.
    pub fn morph_to_algorithm(&self, target: usize, amount: f32) -> Result<(), Error> {
        self.send(
            VoiceEngineMessage::MorphToAlgorithm { target, amount },
            "morph_to_algorithm",
        )
    }

    /// Update a single parameter. Plain enum values must be valid variant indices, else
    /// `Error::ParameterError` is returned and nothing is sent.
    pub fn set_parameter(
        &self,
        parameter: FmParameter,
        value: ParameterValueUpdate,
    ) -> Result<(), Error> {
        parameter.validate_update(value)?;
        self.send(
            VoiceEngineMessage::SetParameter { parameter, value },
            "set_parameter",
        )
    }

    /// Apply a parameter lock with a normalized value in range \[0, 1\].
    pub fn set_parameter_lock(&self, parameter: FmParameter, normalized: f32) -> Result<(), Error> {
        self.set_parameter(parameter, ParameterValueUpdate::Normalized(normalized))
    }

    /// Apply a parameter lock, addressed by its string key, e.g. `"OP1_RATIO"`.
    ///
    /// Unknown keys are ignored and do not fail.
    pub fn set_parameter_lock_by_key(&self, key: &str, normalized: f32) -> Result<(), Error> {
        match key.parse::<FmParameter>() {
            Ok(parameter) => self.set_parameter_lock(parameter, normalized),
            Err(err) => {
                log::debug!("Ignoring parameter lock: {err}");
                Ok(())
            }
        }
    }

    /// Replace all sound parameters with the given preset.
    pub fn load_preset(&self, preset: &Preset) -> Result<(), Error> {
        self.send(VoiceEngineMessage::LoadPreset(*preset), "load_preset")
    }

    fn send(&self, message: VoiceEngineMessage, event_name: &str) -> Result<(), Error> {
        if self.message_queue.push(message).is_err() {
            log::warn!("Voice engine message queue is full. Failed to send a {event_name} event.");
            return Err(Error::SendError(
                "Voice engine message queue is full".to_string(),
            ));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
