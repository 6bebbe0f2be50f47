//! Pull interface through which an external mixing graph consumes audio.

// -------------------------------------------------------------------------------------------------

/// Types that can produce audio samples in `f32` format. `Send`able across threads.
pub trait Source: Send + 'static {
    /// Write at most of `output.len()` samples into the `output`. Returns the number of
    /// written samples. Should take care to always output a full frame, and should _never_
    /// block or allocate.
    fn write(&mut self, output: &mut [f32]) -> usize;
    /// The source's output channel count. Channels are interleaved in `write`.
    fn channel_count(&self) -> usize;
    /// The source's output sample rate in Hz.
    fn sample_rate(&self) -> u32;
}
