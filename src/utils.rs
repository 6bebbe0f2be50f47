//! Small helper functions shared by the FM engine and its tests.

// -------------------------------------------------------------------------------------------------

/// Frequency of the A4 reference note in Hz.
pub const A4_FREQUENCY: f64 = 440.0;
/// MIDI note number of the A4 reference note.
pub const A4_NOTE: u8 = 69;

/// Convert a MIDI note number into an equal tempered frequency in Hz.
pub fn note_to_frequency(note: u8) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((note as f64 - A4_NOTE as f64) / 12.0)
}

// -------------------------------------------------------------------------------------------------

/// Musical soft clipping: `tanh(x * 0.7) * 0.8`, hard clamped to \[-1, 1\].
/// Non finite input values result in silence.
#[inline]
pub fn soft_clip(sample: f64) -> f32 {
    let clipped = ((sample * 0.7).tanh() * 0.8).clamp(-1.0, 1.0);
    if clipped.is_finite() {
        clipped as f32
    } else {
        0.0
    }
}

// -------------------------------------------------------------------------------------------------
