use std::ops::RangeInclusive;

use four_cc::FourCC;

use super::{Parameter, ParameterType, ParameterValueUpdate};

// -------------------------------------------------------------------------------------------------

/// A continuous (float) parameter descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatParameter {
    id: FourCC,
    name: &'static str,
    range: RangeInclusive<f32>,
    default: f32,
    unit: &'static str,
}

impl FloatParameter {
    /// Create a new float parameter descriptor.
    pub const fn new(
        id: FourCC,
        name: &'static str,
        range: RangeInclusive<f32>,
        default: f32,
    ) -> Self {
        Self {
            id,
            name,
            range,
            default,
            unit: "",
        }
    }

    /// Optional unit for string displays.
    pub const fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Return a copy of this descriptor with the given id.
    pub fn with_id(&self, id: FourCC) -> Self {
        Self { id, ..self.clone() }
    }

    /// The parameter's value range.
    pub fn range(&self) -> &RangeInclusive<f32> {
        &self.range
    }

    /// The parameter's default value.
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// The parameter's unit, if any.
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Clamp the given plain value to the parameter's range.
    pub fn clamp_value(&self, value: f32) -> f32 {
        value.clamp(*self.range.start(), *self.range.end())
    }

    /// Normalize the given plain value to a 0.0-1.0 range.
    pub fn normalize_value(&self, value: f32) -> f32 {
        (self.clamp_value(value) - *self.range.start())
            / (*self.range.end() - *self.range.start())
    }

    /// Denormalize a 0.0-1.0 ranged value to the corresponding plain value.
    /// Normalized values outside of 0.0-1.0 are clamped.
    pub fn denormalize_value(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        *self.range.start() + normalized * (*self.range.end() - *self.range.start())
    }

    /// Resolve the given update into a plain, clamped value.
    pub fn value_from_update(&self, update: ParameterValueUpdate) -> f32 {
        match update {
            ParameterValueUpdate::Plain(value) => self.clamp_value(value),
            ParameterValueUpdate::Normalized(normalized) => self.denormalize_value(normalized),
        }
    }

    /// Convert the given plain value to a string.
    pub fn value_to_string(&self, value: f32, include_unit: bool) -> String {
        if include_unit && !self.unit.is_empty() {
            format!("{:.2} {}", value, self.unit)
        } else {
            format!("{:.2}", value)
        }
    }

    /// Convert the given string to a clamped plain value.
    pub fn string_to_value(&self, string: &str) -> Option<f32> {
        let value = string
            .trim()
            .trim_end_matches(self.unit)
            .trim()
            .parse::<f32>()
            .ok()?;
        Some(self.clamp_value(value))
    }
}

impl Parameter for FloatParameter {
    fn id(&self) -> FourCC {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn parameter_type(&self) -> ParameterType {
        ParameterType::Float {
            range: self.range.clone(),
            default: self.default,
        }
    }

    fn default_normalized_value(&self) -> f32 {
        self.normalize_value(self.default)
    }

    fn normalized_value_to_string(&self, normalized: f32, include_unit: bool) -> String {
        self.value_to_string(self.denormalize_value(normalized), include_unit)
    }

    fn string_to_normalized_value(&self, string: &str) -> Option<f32> {
        let value = self.string_to_value(string)?;
        Some(self.normalize_value(value))
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RATIO: FloatParameter =
        FloatParameter::new(FourCC(*b"TRAT"), "Ratio", 0.0..=8.0, 1.0).with_unit("x");

    #[test]
    fn normalization() {
        assert_eq!(RATIO.denormalize_value(0.5), 4.0);
        assert_eq!(RATIO.denormalize_value(2.0), 8.0);
        assert_eq!(RATIO.denormalize_value(-1.0), 0.0);
        assert_eq!(RATIO.denormalize_value(f32::NAN), 0.0);
        assert_eq!(RATIO.normalize_value(2.0), 0.25);
        assert_eq!(RATIO.default_normalized_value(), 0.125);
    }

    #[test]
    fn updates() {
        assert_eq!(RATIO.value_from_update(ParameterValueUpdate::Plain(3.0)), 3.0);
        assert_eq!(RATIO.value_from_update(ParameterValueUpdate::Plain(30.0)), 8.0);
        assert_eq!(
            RATIO.value_from_update(ParameterValueUpdate::Normalized(0.25)),
            2.0
        );
    }

    #[test]
    fn strings() {
        assert_eq!(RATIO.normalized_value_to_string(0.5, true), "4.00 x");
        assert_eq!(RATIO.normalized_value_to_string(0.5, false), "4.00");
        assert_eq!(RATIO.string_to_value(" 2.5 x"), Some(2.5));
        assert_eq!(RATIO.string_to_value("12"), Some(8.0));
        assert_eq!(RATIO.string_to_normalized_value("2"), Some(0.25));
        assert_eq!(RATIO.string_to_value("fast"), None);
    }
}
