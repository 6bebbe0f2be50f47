use std::str::FromStr;

use four_cc::FourCC;

use super::{Parameter, ParameterType, ParameterValueUpdate};

// -------------------------------------------------------------------------------------------------

/// An enum parameter descriptor.
///
/// Values are the enum's variant names, as provided by strum's `VariantNames`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumParameter {
    id: FourCC,
    name: &'static str,
    values: &'static [&'static str],
    default_index: usize,
}

impl EnumParameter {
    pub const fn new(
        id: FourCC,
        name: &'static str,
        values: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        Self {
            id,
            name,
            values,
            default_index,
        }
    }

    /// Return a copy of this descriptor with the given id.
    pub fn with_id(&self, id: FourCC) -> Self {
        Self { id, ..self.clone() }
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn default_value(&self) -> &'static str {
        self.values[self.default_index]
    }

    pub fn normalize_index(&self, index: usize) -> f32 {
        if self.values.len() <= 1 {
            return 0.0;
        }
        index.min(self.values.len() - 1) as f32 / (self.values.len() - 1) as f32
    }

    pub fn normalize_value(&self, value: &str) -> f32 {
        if let Some(index) = self.values.iter().position(|v| *v == value) {
            return self.normalize_index(index);
        }
        0.0
    }

    /// Denormalize a 0.0-1.0 ranged value to the nearest variant index.
    pub fn denormalize_index(&self, normalized: f32) -> usize {
        let normalized = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let last = self.values.len().saturating_sub(1);
        ((normalized * last as f32).round() as usize).min(last)
    }

    pub fn denormalize_value(&self, normalized: f32) -> &'static str {
        self.values[self.denormalize_index(normalized)]
    }

    /// Convert a plain variant index value into a valid index. Returns `None` for negative,
    /// non finite or out of range indices.
    pub fn index_from_plain(&self, value: f32) -> Option<usize> {
        let index = value.round();
        if !index.is_finite() || index < 0.0 || index as usize >= self.values.len() {
            return None;
        }
        Some(index as usize)
    }

    /// Resolve the given update into an enum value. Plain values are variant indices:
    /// invalid indices resolve to `None`.
    pub fn value_from_update<E: FromStr>(&self, update: ParameterValueUpdate) -> Option<E> {
        let index = match update {
            ParameterValueUpdate::Plain(value) => self.index_from_plain(value)?,
            ParameterValueUpdate::Normalized(normalized) => self.denormalize_index(normalized),
        };
        E::from_str(self.values[index]).ok()
    }
}

impl Parameter for EnumParameter {
    fn id(&self) -> FourCC {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn parameter_type(&self) -> ParameterType {
        ParameterType::Enum {
            values: self.values,
            default_index: self.default_index,
        }
    }
    fn default_normalized_value(&self) -> f32 {
        self.normalize_index(self.default_index)
    }
    fn normalized_value_to_string(&self, normalized: f32, _include_unit: bool) -> String {
        self.denormalize_value(normalized).to_string()
    }
    fn string_to_normalized_value(&self, string: &str) -> Option<f32> {
        let string = string.trim();
        let index = self
            .values
            .iter()
            .position(|v| v.eq_ignore_ascii_case(string))?;
        Some(self.normalize_index(index))
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use strum::VariantNames;

    use crate::Waveform;

    #[test]
    fn waveform_choices() {
        let param = EnumParameter::new(FourCC(*b"TWAV"), "Waveform", Waveform::VARIANTS, 0);
        assert_eq!(param.default_value(), "Sine");
        assert_eq!(param.denormalize_value(1.0), "Noise");
        assert_eq!(param.normalize_value("Square"), 0.5);
        assert_eq!(
            param.value_from_update::<Waveform>(ParameterValueUpdate::Normalized(0.25)),
            Some(Waveform::Saw)
        );
        assert_eq!(
            param.value_from_update::<Waveform>(ParameterValueUpdate::Plain(3.0)),
            Some(Waveform::Triangle)
        );
        assert_eq!(
            param.value_from_update::<Waveform>(ParameterValueUpdate::Plain(9.0)),
            None
        );
        assert_eq!(param.string_to_normalized_value("noise"), Some(1.0));
    }

    #[test]
    fn plain_indices() {
        let param = EnumParameter::new(FourCC(*b"TWAV"), "Waveform", Waveform::VARIANTS, 0);
        assert_eq!(param.index_from_plain(0.0), Some(0));
        assert_eq!(param.index_from_plain(3.6), Some(4));
        assert_eq!(param.index_from_plain(5.0), None);
        assert_eq!(param.index_from_plain(-1.0), None);
        assert_eq!(param.index_from_plain(f32::NAN), None);
        assert_eq!(param.index_from_plain(f32::INFINITY), None);
    }
}
