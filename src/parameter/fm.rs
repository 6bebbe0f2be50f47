use std::{fmt, str::FromStr};

use four_cc::FourCC;
use strum::VariantNames;

use super::{EnumParameter, FloatParameter, IntegerParameter, Parameter, ParameterValueUpdate};
use crate::{operator::OperatorIndex, Error, Waveform};

// -------------------------------------------------------------------------------------------------

/// All automatable parameters of a [`VoiceEngine`](crate::VoiceEngine).
///
/// Parameters are addressed by this closed enum internally. String keys, as used by external
/// parameter lock stores (e.g. `"FM_ALG"` or `"OP2_RATIO"`), and [`FourCC`] ids only get
/// resolved at the boundary via [`FromStr`] and [`FmParameter::from_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FmParameter {
    Algorithm,
    FmDepth,
    Feedback,
    OperatorRatio(OperatorIndex),
    OperatorLevel(OperatorIndex),
    OperatorWaveform(OperatorIndex),
    OperatorAttack(OperatorIndex),
    OperatorDecay(OperatorIndex),
    OperatorSustain(OperatorIndex),
    OperatorRelease(OperatorIndex),
    OperatorLfoRate(OperatorIndex),
    OperatorLfoAmount(OperatorIndex),
}

impl FmParameter {
    pub const ALGORITHM: IntegerParameter =
        IntegerParameter::new(FourCC(*b"FALG"), "Algorithm", 0..=31, 0).with_truncation();
    pub const FM_DEPTH: FloatParameter =
        FloatParameter::new(FourCC(*b"FDPT"), "FM Depth", 0.0..=10.0, 1.0).with_unit("x");
    pub const FEEDBACK: FloatParameter =
        FloatParameter::new(FourCC(*b"FFDB"), "Feedback", 0.0..=1.0, 0.0);

    // Operator parameter templates: the leading `O` of the id gets replaced with the
    // operator's one-based number, e.g. `ORAT` -> `2RAT` for the second operator.
    const MIN_TIME_SEC: f32 = 0.001;
    const MAX_TIME_SEC: f32 = 10.0;

    pub const OPERATOR_RATIO: FloatParameter =
        FloatParameter::new(FourCC(*b"ORAT"), "Ratio", 0.0..=8.0, 1.0).with_unit("x");
    pub const OPERATOR_LEVEL: FloatParameter =
        FloatParameter::new(FourCC(*b"OLVL"), "Level", 0.0..=1.0, 1.0);
    pub const OPERATOR_WAVEFORM: EnumParameter =
        EnumParameter::new(FourCC(*b"OWAV"), "Waveform", Waveform::VARIANTS, 0);
    pub const OPERATOR_ATTACK: FloatParameter = FloatParameter::new(
        FourCC(*b"OATK"),
        "Attack",
        Self::MIN_TIME_SEC..=Self::MAX_TIME_SEC,
        0.01,
    )
    .with_unit("s");
    pub const OPERATOR_DECAY: FloatParameter = FloatParameter::new(
        FourCC(*b"ODEC"),
        "Decay",
        Self::MIN_TIME_SEC..=Self::MAX_TIME_SEC,
        0.1,
    )
    .with_unit("s");
    pub const OPERATOR_SUSTAIN: FloatParameter =
        FloatParameter::new(FourCC(*b"OSUS"), "Sustain", 0.0..=1.0, 0.7);
    pub const OPERATOR_RELEASE: FloatParameter = FloatParameter::new(
        FourCC(*b"OREL"),
        "Release",
        Self::MIN_TIME_SEC..=Self::MAX_TIME_SEC,
        0.5,
    )
    .with_unit("s");
    pub const OPERATOR_LFO_RATE: FloatParameter =
        FloatParameter::new(FourCC(*b"OLFR"), "LFO Rate", 0.0..=20.0, 1.0).with_unit("Hz");
    pub const OPERATOR_LFO_AMOUNT: FloatParameter =
        FloatParameter::new(FourCC(*b"OLFA"), "LFO Amount", 0.0..=1.0, 0.0);

    /// Number of parameters.
    pub const COUNT: usize = 3 + 9 * OperatorIndex::COUNT;

    /// Iterate over all parameters: global ones first, then all operator parameters ordered
    /// by operator.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Algorithm, Self::FmDepth, Self::Feedback]
            .into_iter()
            .chain(OperatorIndex::all().flat_map(|op| {
                [
                    Self::OperatorRatio(op),
                    Self::OperatorLevel(op),
                    Self::OperatorWaveform(op),
                    Self::OperatorAttack(op),
                    Self::OperatorDecay(op),
                    Self::OperatorSustain(op),
                    Self::OperatorRelease(op),
                    Self::OperatorLfoRate(op),
                    Self::OperatorLfoAmount(op),
                ]
            }))
    }

    /// The operator this parameter applies to, if any.
    pub fn operator(&self) -> Option<OperatorIndex> {
        match *self {
            Self::Algorithm | Self::FmDepth | Self::Feedback => None,
            Self::OperatorRatio(op)
            | Self::OperatorLevel(op)
            | Self::OperatorWaveform(op)
            | Self::OperatorAttack(op)
            | Self::OperatorDecay(op)
            | Self::OperatorSustain(op)
            | Self::OperatorRelease(op)
            | Self::OperatorLfoRate(op)
            | Self::OperatorLfoAmount(op) => Some(op),
        }
    }

    /// The parameter's unique id.
    pub fn id(&self) -> FourCC {
        let template = match self {
            Self::Algorithm => return Self::ALGORITHM.id(),
            Self::FmDepth => return Self::FM_DEPTH.id(),
            Self::Feedback => return Self::FEEDBACK.id(),
            Self::OperatorRatio(_) => Self::OPERATOR_RATIO.id(),
            Self::OperatorLevel(_) => Self::OPERATOR_LEVEL.id(),
            Self::OperatorWaveform(_) => Self::OPERATOR_WAVEFORM.id(),
            Self::OperatorAttack(_) => Self::OPERATOR_ATTACK.id(),
            Self::OperatorDecay(_) => Self::OPERATOR_DECAY.id(),
            Self::OperatorSustain(_) => Self::OPERATOR_SUSTAIN.id(),
            Self::OperatorRelease(_) => Self::OPERATOR_RELEASE.id(),
            Self::OperatorLfoRate(_) => Self::OPERATOR_LFO_RATE.id(),
            Self::OperatorLfoAmount(_) => Self::OPERATOR_LFO_AMOUNT.id(),
        };
        let mut bytes = template.0;
        if let Some(op) = self.operator() {
            bytes[0] = b'1' + op.index() as u8;
        }
        FourCC(bytes)
    }

    /// Resolve a parameter from its unique id.
    pub fn from_id(id: FourCC) -> Option<Self> {
        Self::all().find(|parameter| parameter.id() == id)
    }

    /// The parameter's descriptor, for use in UIs or for value conversions.
    pub fn descriptor(&self) -> Box<dyn Parameter> {
        let id = self.id();
        match self {
            Self::Algorithm => Box::new(Self::ALGORITHM),
            Self::FmDepth => Box::new(Self::FM_DEPTH),
            Self::Feedback => Box::new(Self::FEEDBACK),
            Self::OperatorRatio(_) => Box::new(Self::OPERATOR_RATIO.with_id(id)),
            Self::OperatorLevel(_) => Box::new(Self::OPERATOR_LEVEL.with_id(id)),
            Self::OperatorWaveform(_) => Box::new(Self::OPERATOR_WAVEFORM.with_id(id)),
            Self::OperatorAttack(_) => Box::new(Self::OPERATOR_ATTACK.with_id(id)),
            Self::OperatorDecay(_) => Box::new(Self::OPERATOR_DECAY.with_id(id)),
            Self::OperatorSustain(_) => Box::new(Self::OPERATOR_SUSTAIN.with_id(id)),
            Self::OperatorRelease(_) => Box::new(Self::OPERATOR_RELEASE.with_id(id)),
            Self::OperatorLfoRate(_) => Box::new(Self::OPERATOR_LFO_RATE.with_id(id)),
            Self::OperatorLfoAmount(_) => Box::new(Self::OPERATOR_LFO_AMOUNT.with_id(id)),
        }
    }

    /// Check if the given update can be applied to this parameter. Normalized values and plain
    /// numeric values always get clamped, but plain enum indices must address a variant.
    pub fn validate_update(&self, value: ParameterValueUpdate) -> Result<(), Error> {
        match (self, value) {
            (Self::OperatorWaveform(_), ParameterValueUpdate::Plain(index)) => {
                if Self::OPERATOR_WAVEFORM.index_from_plain(index).is_none() {
                    return Err(Error::ParameterError(format!(
                        "invalid waveform index '{index}' for parameter '{self}'"
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn key_suffix(&self) -> &'static str {
        match self {
            Self::Algorithm => "ALG",
            Self::FmDepth => "DEPTH",
            Self::Feedback => "FB",
            Self::OperatorRatio(_) => "RATIO",
            Self::OperatorLevel(_) => "LVL",
            Self::OperatorWaveform(_) => "WAVE",
            Self::OperatorAttack(_) => "ATK",
            Self::OperatorDecay(_) => "DEC",
            Self::OperatorSustain(_) => "SUS",
            Self::OperatorRelease(_) => "REL",
            Self::OperatorLfoRate(_) => "LFO_RATE",
            Self::OperatorLfoAmount(_) => "LFO_AMT",
        }
    }
}

/// Writes the parameter's lock key, e.g. `FM_ALG` or `OP1_RATIO`.
impl fmt::Display for FmParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator() {
            Some(op) => write!(f, "OP{}_{}", op.index() + 1, self.key_suffix()),
            None => write!(f, "FM_{}", self.key_suffix()),
        }
    }
}

/// Parses parameter lock keys, e.g. `FM_ALG` or `OP1_RATIO`.
impl FromStr for FmParameter {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let unknown_key = || Error::ParameterError(format!("Unknown parameter key '{key}'"));
        if let Some(suffix) = key.strip_prefix("FM_") {
            return match suffix {
                "ALG" => Ok(Self::Algorithm),
                "DEPTH" => Ok(Self::FmDepth),
                "FB" => Ok(Self::Feedback),
                _ => Err(unknown_key()),
            };
        }
        let rest = key.strip_prefix("OP").ok_or_else(unknown_key)?;
        let (number, suffix) = rest.split_once('_').ok_or_else(unknown_key)?;
        let op = number
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(OperatorIndex::new)
            .ok_or_else(unknown_key)?;
        match suffix {
            "RATIO" => Ok(Self::OperatorRatio(op)),
            "LVL" => Ok(Self::OperatorLevel(op)),
            "WAVE" => Ok(Self::OperatorWaveform(op)),
            "ATK" => Ok(Self::OperatorAttack(op)),
            "DEC" => Ok(Self::OperatorDecay(op)),
            "SUS" => Ok(Self::OperatorSustain(op)),
            "REL" => Ok(Self::OperatorRelease(op)),
            "LFO_RATE" => Ok(Self::OperatorLfoRate(op)),
            "LFO_AMT" => Ok(Self::OperatorLfoAmount(op)),
            _ => Err(unknown_key()),
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::parameter::ParameterType;

    #[test]
    fn keys() -> Result<(), Box<Error>> {
        assert_eq!("FM_ALG".parse::<FmParameter>()?, FmParameter::Algorithm);
        assert_eq!("FM_DEPTH".parse::<FmParameter>()?, FmParameter::FmDepth);
        assert_eq!(
            "OP4_LFO_AMT".parse::<FmParameter>()?,
            FmParameter::OperatorLfoAmount(OperatorIndex::new(3).unwrap())
        );
        for key in ["", "FM_", "OP0_RATIO", "OP5_LVL", "OP1_FOO", "op1_ratio", "OP1RATIO"] {
            assert!(key.parse::<FmParameter>().is_err(), "{key} should not parse");
        }
        Ok(())
    }

    #[test]
    fn keys_and_ids_round_trip() {
        let all = FmParameter::all().collect::<Vec<_>>();
        assert_eq!(all.len(), FmParameter::COUNT);

        let ids = all.iter().map(|p| p.id().0).collect::<HashSet<_>>();
        assert_eq!(ids.len(), FmParameter::COUNT);
        let keys = all.iter().map(|p| p.to_string()).collect::<HashSet<_>>();
        assert_eq!(keys.len(), FmParameter::COUNT);

        for parameter in all {
            assert_eq!(parameter.to_string().parse::<FmParameter>(), Ok(parameter));
            assert_eq!(FmParameter::from_id(parameter.id()), Some(parameter));
            assert_eq!(parameter.descriptor().id(), parameter.id());
        }
        assert_eq!(FmParameter::from_id(FourCC(*b"NOPE")), None);
    }

    #[test]
    fn update_validation() {
        let waveform = FmParameter::OperatorWaveform(OperatorIndex::new(2).unwrap());
        assert!(waveform
            .validate_update(ParameterValueUpdate::Plain(4.0))
            .is_ok());
        assert!(waveform
            .validate_update(ParameterValueUpdate::Normalized(7.0))
            .is_ok());
        assert!(matches!(
            waveform.validate_update(ParameterValueUpdate::Plain(9.0)),
            Err(Error::ParameterError(_))
        ));
        assert!(FmParameter::FmDepth
            .validate_update(ParameterValueUpdate::Plain(100.0))
            .is_ok());
    }

    #[test]
    fn descriptors() {
        let op = OperatorIndex::new(1).unwrap();
        assert_eq!(FmParameter::OperatorRatio(op).id(), FourCC(*b"2RAT"));
        assert_eq!(FmParameter::OperatorRatio(op).to_string(), "OP2_RATIO");
        assert_eq!(
            FmParameter::Algorithm.descriptor().parameter_type(),
            ParameterType::Integer {
                range: 0..=31,
                default: 0
            }
        );
        assert_eq!(FmParameter::FM_DEPTH.denormalize_value(0.5), 5.0);
        assert_eq!(FmParameter::OPERATOR_RATIO.denormalize_value(0.25), 2.0);
        assert_eq!(
            FmParameter::OperatorWaveform(op)
                .descriptor()
                .normalized_value_to_string(1.0, false),
            "Noise"
        );
    }
}
