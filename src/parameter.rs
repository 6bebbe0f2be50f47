//! Parameter descriptors and value updates for the FM voice engine.

use std::fmt::Debug;

use four_cc::FourCC;

// -------------------------------------------------------------------------------------------------

/// Describes the type of a [`Parameter`] to e.g. select a proper visual representation in a UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterType {
    /// A continuous floating-point value.
    Float {
        range: std::ops::RangeInclusive<f32>,
        default: f32,
    },
    /// A discrete integer value.
    Integer {
        range: std::ops::RangeInclusive<i32>,
        default: i32,
    },
    /// A choice from a list of strings (an enum).
    Enum {
        values: &'static [&'static str],
        default_index: usize,
    },
}

// -------------------------------------------------------------------------------------------------

/// Describes a single parameter of a [`VoiceEngine`](crate::VoiceEngine) for use in UIs, for
/// automation or parameter locks.
pub trait Parameter: Debug + Send + Sync {
    /// The unique id of the parameter.
    fn id(&self) -> FourCC;

    /// The name of the parameter.
    fn name(&self) -> &'static str;

    /// The parameter type.
    fn parameter_type(&self) -> ParameterType;

    /// Default value of parameter, expressed as normalized floating point value in range \[0,1\].
    fn default_normalized_value(&self) -> f32;

    /// Convert the given normalized floating point value to a string value.
    fn normalized_value_to_string(&self, normalized: f32, include_unit: bool) -> String;

    /// Convert the given string value to a normalized floating point value.
    /// Returns `None` when conversion failed, else a valid normalized value.
    fn string_to_normalized_value(&self, string: &str) -> Option<f32>;
}

// -------------------------------------------------------------------------------------------------

/// An update for a parameter's value, consumed by the [`VoiceEngine`](crate::VoiceEngine) in
/// audio time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValueUpdate {
    /// A plain value in the parameter's native range. Enum values are variant indices.
    Plain(f32),
    /// A float value in range `0.0..=1.0`. Values outside of this range get clamped.
    Normalized(f32),
}

// -------------------------------------------------------------------------------------------------

mod float;
pub use float::FloatParameter;

mod integer;
pub use integer::IntegerParameter;

mod r#enum;
pub use r#enum::EnumParameter;

mod fm;
pub use fm::FmParameter;
