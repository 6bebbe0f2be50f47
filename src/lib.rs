#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod algorithm;
mod engine;
mod envelope;
mod error;
mod lfo;
mod operator;
mod preset;
mod source;
mod tracks;
mod waveform;

// public, flat re-exports
pub use error::Error;

pub use waveform::Waveform;

pub use envelope::{AdsrEnvelope, AdsrParameters, AdsrStage};
pub use lfo::Lfo;
pub use operator::{Operator, OperatorIndex, OperatorSettings};

pub use algorithm::{Algorithm, AlgorithmMatrix};

pub use preset::{factory_preset, factory_presets, FactoryPreset, Preset, PresetCategory};

pub use engine::{VoiceEngine, VoiceEngineHandle, VoiceEngineMessage, VoiceEngineOptions};
pub use tracks::TrackEngines;

pub use source::Source;

// public mods
pub mod parameter;
pub mod utils;

// -------------------------------------------------------------------------------------------------

#[cfg(all(test, debug_assertions, feature = "assert-allocs"))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;
