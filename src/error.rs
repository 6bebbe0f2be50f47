use std::{error, fmt};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by opal-fm.
///
/// Note that the real-time parts of the engine never fail: invalid values are clamped or
/// replaced with defaults there. Errors are only reported by the control surface.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    ParameterError(String),
    SendError(String),
    TrackNotFound(usize),
    PresetNotFound(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::SendError(str) => write!(f, "Failed to send engine message: {str}"),
            Self::TrackNotFound(track) => write!(f, "Track with index {track} not found"),
            Self::PresetNotFound(name) => write!(f, "Preset '{name}' not found"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
