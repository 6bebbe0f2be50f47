use std::ops::RangeInclusive;

use four_cc::FourCC;

use super::{Parameter, ParameterType, ParameterValueUpdate};

// -------------------------------------------------------------------------------------------------

/// A discrete (integer) parameter descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerParameter {
    id: FourCC,
    name: &'static str,
    range: RangeInclusive<i32>,
    default: i32,
    truncate: bool,
}

impl IntegerParameter {
    const TRUNCATION_EPSILON: f32 = 1.0e-3;

    pub const fn new(
        id: FourCC,
        name: &'static str,
        range: RangeInclusive<i32>,
        default: i32,
    ) -> Self {
        Self {
            id,
            name,
            range,
            default,
            truncate: false,
        }
    }

    /// Denormalize values by truncating instead of rounding to the nearest integer. Only
    /// normalized values close to `1.0` then map to the range's end.
    pub const fn with_truncation(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn range(&self) -> &RangeInclusive<i32> {
        &self.range
    }

    pub fn default_value(&self) -> i32 {
        self.default
    }

    pub fn clamp_value(&self, value: i32) -> i32 {
        value.clamp(*self.range.start(), *self.range.end())
    }

    pub fn normalize_value(&self, value: i32) -> f32 {
        (self.clamp_value(value) as f32 - *self.range.start() as f32)
            / (*self.range.end() as f32 - *self.range.start() as f32)
    }

    /// Denormalize a 0.0-1.0 ranged value to the nearest, or when truncating the next lower,
    /// integer value.
    pub fn denormalize_value(&self, normalized: f32) -> i32 {
        let normalized = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let value = *self.range.start() as f32
            + normalized * (*self.range.end() as f32 - *self.range.start() as f32);
        if self.truncate {
            // keep normalized values of exact integers, e.g. `15.0 / 31.0`, on their integer
            (value + Self::TRUNCATION_EPSILON).floor() as i32
        } else {
            value.round() as i32
        }
    }

    /// Resolve the given update into a plain, clamped value.
    pub fn value_from_update(&self, update: ParameterValueUpdate) -> i32 {
        match update {
            ParameterValueUpdate::Plain(value) => self.clamp_value(value.round() as i32),
            ParameterValueUpdate::Normalized(normalized) => self.denormalize_value(normalized),
        }
    }
}

impl Parameter for IntegerParameter {
    fn id(&self) -> FourCC {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn parameter_type(&self) -> ParameterType {
        ParameterType::Integer {
            range: self.range.clone(),
            default: self.default,
        }
    }
    fn default_normalized_value(&self) -> f32 {
        self.normalize_value(self.default)
    }
    fn normalized_value_to_string(&self, normalized: f32, _include_unit: bool) -> String {
        self.denormalize_value(normalized).to_string()
    }
    fn string_to_normalized_value(&self, string: &str) -> Option<f32> {
        let value = string.trim().parse::<i32>().ok()?;
        Some(self.normalize_value(value))
    }
}

// -------------------------------------------------------------------------------------------------
