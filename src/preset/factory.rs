use super::{FactoryPreset, Preset, PresetCategory};
use crate::{Error, Waveform};

// -------------------------------------------------------------------------------------------------

/// Create the factory preset library: 24 presets in 8 categories.
pub fn factory_presets() -> Vec<FactoryPreset> {
    use PresetCategory::*;
    vec![
        // Bass
        factory("SUB BASS", Bass, sub_bass()),
        factory("REESE BASS", Bass, reese_bass()),
        factory("ACID BASS", Bass, acid_bass()),
        // Lead
        factory("DIGITAL LEAD", Lead, digital_lead()),
        factory("SCREAM LEAD", Lead, scream_lead()),
        factory("BRIGHT LEAD", Lead, bright_lead()),
        // Pad
        factory("WARM PAD", Pad, warm_pad()),
        factory("ETHEREAL PAD", Pad, ethereal_pad()),
        factory("HARSH PAD", Pad, harsh_pad()),
        // Bell
        factory("CLASSIC BELL", Bell, classic_bell()),
        factory("METALLIC BELL", Bell, metallic_bell()),
        factory("GLASS BELL", Bell, glass_bell()),
        // Brass
        factory("HORN SECTION", Brass, horn_section()),
        factory("SYN BRASS", Brass, syn_brass()),
        factory("DISTORTED BRASS", Brass, distorted_brass()),
        // Digital
        factory("DIGITAL SCREAM", Digital, digital_scream()),
        factory("BIT CRUSHER", Digital, bit_crusher()),
        factory("GLITCH TONE", Digital, glitch_tone()),
        // Chaos
        factory("PURE CHAOS", Chaos, pure_chaos()),
        factory("CROSS MOD", Chaos, cross_mod()),
        factory("FEEDBACK HELL", Chaos, feedback_hell()),
        // Experimental
        factory("MORPHING TEXTURE", Experimental, morphing_texture()),
        factory("RING MODULATOR", Experimental, ring_modulator()),
        factory("FREQ SHIFTER", Experimental, frequency_shifter()),
    ]
}

/// Look up a factory preset by name. Names are compared case-insensitively.
pub fn factory_preset(name: &str) -> Result<FactoryPreset, Error> {
    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| Error::PresetNotFound(name.to_string()))
}

// -------------------------------------------------------------------------------------------------

fn factory(name: &'static str, category: PresetCategory, preset: Preset) -> FactoryPreset {
    FactoryPreset {
        name,
        category,
        preset,
    }
}

fn set_waveforms(preset: &mut Preset, waveforms: [Waveform; 4]) {
    for (operator, waveform) in preset.operators.iter_mut().zip(waveforms) {
        operator.waveform = waveform;
    }
}

fn set_lfos(preset: &mut Preset, rates: [f32; 4], amounts: [f32; 4]) {
    for (index, operator) in preset.operators.iter_mut().enumerate() {
        operator.lfo_rate = rates[index];
        operator.lfo_amount = amounts[index];
    }
}

// -------------------------------------------------------------------------------------------------

fn sub_bass() -> Preset {
    let mut preset = Preset::new(1, [0.5, 1.0, 2.0, 1.0], [0.8, 0.6, 0.3, 1.0])
        .with_feedback_and_depth(0.1, 0.5);
    // fast attack, long release
    preset.operators[3].envelope.attack = 0.001;
    preset.operators[3].envelope.release = 2.0;
    preset
}

fn reese_bass() -> Preset {
    let mut preset = Preset::new(14, [0.99, 1.01, 2.0, 1.0], [0.9, 0.9, 0.4, 1.0])
        .with_feedback_and_depth(0.3, 1.5);
    set_lfos(&mut preset, [0.2, 0.3, 0.0, 0.0], [0.1, 0.1, 0.0, 0.0]);
    preset
}

fn acid_bass() -> Preset {
    let mut preset = Preset::new(7, [1.0, 3.0, 1.0, 1.0], [1.0, 0.7, 0.8, 1.0])
        .with_feedback_and_depth(0.4, 2.0);
    set_waveforms(
        &mut preset,
        [Waveform::Square, Waveform::Sine, Waveform::Saw, Waveform::Sine],
    );
    preset
}

fn digital_lead() -> Preset {
    let mut preset = Preset::new(19, [1.0, 2.0, 3.0, 1.0], [1.0, 0.8, 0.6, 1.0])
        .with_feedback_and_depth(0.2, 1.8);
    preset.operators[3] = preset.operators[3].with_envelope(0.01, 0.3, 0.6, 0.8);
    preset
}

fn scream_lead() -> Preset {
    let mut preset = Preset::new(31, [1.0, 7.0, 11.0, 1.0], [1.0, 0.9, 0.7, 1.0])
        .with_feedback_and_depth(0.6, 3.0);
    set_waveforms(
        &mut preset,
        [Waveform::Saw, Waveform::Saw, Waveform::Square, Waveform::Sine],
    );
    preset
}

fn bright_lead() -> Preset {
    Preset::new(0, [1.0, 4.0, 8.0, 1.0], [1.0, 0.5, 0.3, 1.0]).with_feedback_and_depth(0.0, 1.2)
}

fn warm_pad() -> Preset {
    let mut preset = Preset::new(2, [1.0, 1.0, 2.0, 3.0], [0.8, 0.6, 0.4, 0.3])
        .with_feedback_and_depth(0.1, 0.8);
    // slow attacks
    for (operator, attack) in preset.operators.iter_mut().zip([1.0, 1.2, 0.8, 1.5]) {
        operator.envelope.attack = attack;
    }
    preset
}

fn ethereal_pad() -> Preset {
    Preset::new(24, [1.0, 1.5, 2.25, 3.375], [0.6, 0.5, 0.4, 0.3])
        .with_feedback_and_depth(0.05, 0.6)
}

fn harsh_pad() -> Preset {
    Preset::new(26, [1.0, 1.99, 3.01, 1.0], [0.8, 0.7, 0.6, 0.9]).with_feedback_and_depth(0.3, 2.0)
}

fn classic_bell() -> Preset {
    let mut preset = Preset::new(5, [1.0, 2.4, 3.7, 1.0], [0.8, 0.6, 0.4, 1.0])
        .with_feedback_and_depth(0.1, 1.0);
    preset.operators[3] = preset.operators[3].with_envelope(0.001, 2.0, 0.3, 3.0);
    preset
}

fn metallic_bell() -> Preset {
    Preset::new(17, [1.0, 3.14, 7.83, 1.0], [0.9, 0.7, 0.5, 1.0]).with_feedback_and_depth(0.2, 1.5)
}

fn glass_bell() -> Preset {
    Preset::new(15, [1.0, 5.04, 8.16, 1.0], [0.7, 0.5, 0.3, 1.0])
        .with_feedback_and_depth(0.05, 0.8)
}

fn horn_section() -> Preset {
    Preset::new(6, [1.0, 2.0, 3.0, 1.0], [0.9, 0.7, 0.5, 1.0]).with_feedback_and_depth(0.3, 1.5)
}

fn syn_brass() -> Preset {
    let mut preset = Preset::new(7, [1.0, 2.0, 4.0, 1.0], [1.0, 0.8, 0.4, 1.0])
        .with_feedback_and_depth(0.4, 2.0);
    set_waveforms(
        &mut preset,
        [Waveform::Saw, Waveform::Sine, Waveform::Square, Waveform::Sine],
    );
    preset
}

fn distorted_brass() -> Preset {
    Preset::new(28, [1.0, 1.99, 3.01, 1.0], [1.0, 0.9, 0.6, 1.0]).with_feedback_and_depth(0.6, 3.0)
}

fn digital_scream() -> Preset {
    let mut preset = Preset::new(19, [1.0, 7.0, 13.0, 1.0], [1.0, 0.9, 0.7, 1.0])
        .with_feedback_and_depth(0.7, 4.0);
    set_waveforms(
        &mut preset,
        [Waveform::Square, Waveform::Saw, Waveform::Square, Waveform::Sine],
    );
    preset
}

fn bit_crusher() -> Preset {
    let mut preset = Preset::new(27, [1.0, 16.0, 32.0, 1.0], [1.0, 0.6, 0.4, 1.0])
        .with_feedback_and_depth(0.5, 2.5);
    set_waveforms(
        &mut preset,
        [Waveform::Square, Waveform::Square, Waveform::Square, Waveform::Sine],
    );
    preset
}

fn glitch_tone() -> Preset {
    let mut preset = Preset::new(29, [1.0, 1.003, 2.007, 4.011], [0.9, 0.8, 0.6, 1.0])
        .with_feedback_and_depth(0.4, 1.8);
    set_lfos(&mut preset, [23.7, 17.3, 0.0, 0.0], [0.2, 0.15, 0.0, 0.0]);
    preset
}

fn pure_chaos() -> Preset {
    let mut preset = Preset::new(31, [1.0, 1.618, 2.718, 3.14159], [1.0, 0.9, 0.8, 1.0])
        .with_feedback_and_depth(0.8, 4.0);
    set_waveforms(
        &mut preset,
        [Waveform::Noise, Waveform::Square, Waveform::Saw, Waveform::Sine],
    );
    set_lfos(&mut preset, [1.3, 2.7, 4.1, 0.8], [0.3, 0.2, 0.4, 0.1]);
    preset
}

fn cross_mod() -> Preset {
    Preset::new(21, [0.99, 1.01, 1.98, 2.02], [1.0, 1.0, 0.8, 0.8])
        .with_feedback_and_depth(0.7, 3.5)
}

fn feedback_hell() -> Preset {
    Preset::new(16, [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 0.8, 0.8]).with_feedback_and_depth(0.9, 5.0)
}

fn morphing_texture() -> Preset {
    let mut preset = Preset::new(24, [1.0, 1.618, 2.618, 4.236], [0.8, 0.7, 0.6, 0.5])
        .with_feedback_and_depth(0.3, 1.8);
    set_lfos(&mut preset, [0.13, 0.17, 0.23, 0.29], [0.2, 0.15, 0.1, 0.05]);
    preset
}

fn ring_modulator() -> Preset {
    Preset::new(23, [1.0, 1.414, 1.0, 1.0], [0.8, 0.8, 0.9, 1.0]).with_feedback_and_depth(0.2, 1.5)
}

fn frequency_shifter() -> Preset {
    Preset::new(22, [1.0, 1.1, 1.2, 1.0], [0.9, 0.8, 0.7, 1.0]).with_feedback_and_depth(0.1, 1.2)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use crate::algorithm::Algorithm;

    #[test]
    fn library() {
        let presets = factory_presets();
        assert_eq!(presets.len(), 24);

        let names = presets.iter().map(|p| p.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), presets.len());

        for category in PresetCategory::iter() {
            assert_eq!(presets.iter().filter(|p| p.category == category).count(), 3);
        }
        for preset in &presets {
            assert!(preset.preset.algorithm < Algorithm::COUNT, "{}", preset.name);
            assert!(preset.preset.fm_depth > 0.0);
        }
    }

    #[test]
    fn lookup() -> Result<(), Box<Error>> {
        let bell = factory_preset("classic bell")?;
        assert_eq!(bell.name, "CLASSIC BELL");
        assert_eq!(bell.category, PresetCategory::Bell);
        assert_eq!(bell.preset.algorithm, 5);
        assert_eq!(bell.preset.operators[3].envelope.decay, 2.0);
        // untouched operators keep their default envelopes
        assert_eq!(bell.preset.operators[0].envelope.decay, 0.1);

        assert_eq!(
            factory_preset("NOPE"),
            Err(Error::PresetNotFound("NOPE".to_string()))
        );
        Ok(())
    }

    #[test]
    fn category_names() {
        assert_eq!(PresetCategory::Experimental.to_string(), "EXPERIMENTAL");
        assert_eq!("BASS".parse::<PresetCategory>(), Ok(PresetCategory::Bass));
    }
}
