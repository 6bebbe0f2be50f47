use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Options to create a [`VoiceEngine`](crate::VoiceEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceEngineOptions {
    /// By default 44100. The output sample rate of the engine in Hz.
    pub sample_rate: u32,

    /// By default 256. Number of messages the engine's message queue can hold, before
    /// handles fail to send new messages. Messages are consumed at the start of each
    /// render call, so this should be large enough to hold all messages that get sent
    /// in between two render calls.
    pub message_queue_size: usize,
}

impl Default for VoiceEngineOptions {
    fn default() -> Self {
        Self {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            message_queue_size: 256,
        }
    }
}

impl VoiceEngineOptions {
    /// Default output sample rate in Hz.
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn message_queue_size(mut self, size: usize) -> Self {
        self.message_queue_size = size;
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rate == 0 {
            return Err(Error::ParameterError(format!(
                "engine options 'sample_rate' value is '{}'",
                self.sample_rate
            )));
        }
        if self.message_queue_size == 0 {
            return Err(Error::ParameterError(format!(
                "engine options 'message_queue_size' value is '{}'",
                self.message_queue_size
            )));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
