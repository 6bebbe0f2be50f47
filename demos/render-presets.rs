//! Renders a note with each factory preset, or a single preset, into wave files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use arg::{parse_args, Args};
use hound::{SampleFormat, WavSpec, WavWriter};

use opal_fm::{factory_preset, factory_presets, FactoryPreset, VoiceEngine, VoiceEngineOptions};

// -------------------------------------------------------------------------------------------------

#[cfg(all(debug_assertions, feature = "assert-allocs"))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

const BLOCK_SIZE: usize = 256;

// -------------------------------------------------------------------------------------------------

/// Arguments for the preset renderer.
#[derive(Args, Debug)]
struct RenderArguments {
    #[arg(short = "o", long = "output-dir")]
    /// Directory the wave files get written to (default: current directory)
    output_dir: Option<PathBuf>,
    #[arg(short = "p", long = "preset")]
    /// Name of a single factory preset to render (default: all presets)
    preset: Option<String>,
    #[arg(short = "n", long = "note")]
    /// MIDI note to play (default: 48)
    note: Option<u8>,
    #[arg(long = "velocity")]
    /// Note velocity in range [0, 1] (default: 1.0)
    velocity: Option<f32>,
    #[arg(long = "duration")]
    /// Note duration in seconds, excluding the release tail (default: 2.0)
    duration: Option<f32>,
    #[arg(long = "sample-rate")]
    /// Output sample rate (default: 44100)
    sample_rate: Option<u32>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level
    log_level: Option<log::Level>,
}

// -------------------------------------------------------------------------------------------------

fn file_name(preset: &FactoryPreset) -> String {
    format!(
        "{}_{}.wav",
        preset.category.to_string().to_lowercase(),
        preset.name.to_lowercase().replace(' ', "-")
    )
}

fn render_block(engine: &mut VoiceEngine, block: &mut [f32]) {
    #[cfg(all(debug_assertions, feature = "assert-allocs"))]
    assert_no_alloc::assert_no_alloc(|| engine.render(block));
    #[cfg(not(all(debug_assertions, feature = "assert-allocs")))]
    engine.render(block);
}

fn render_preset(
    preset: &FactoryPreset,
    args: &RenderArguments,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = VoiceEngineOptions::default()
        .sample_rate(args.sample_rate.unwrap_or(VoiceEngineOptions::DEFAULT_SAMPLE_RATE));
    let mut engine = VoiceEngine::with_options(options)?;
    engine.load_preset(&preset.preset);

    let sample_rate = engine.sample_rate() as f32;
    let hold_frames = (args.duration.unwrap_or(2.0).max(0.0) * sample_rate) as usize;
    // longest possible release time
    let release_frames = (10.0 * sample_rate) as usize;

    let path = output_dir.join(file_name(preset));
    let spec = WavSpec {
        channels: 1,
        sample_rate: engine.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec)?;

    let handle = engine.handle();
    handle.note_on(args.note.unwrap_or(48), args.velocity.unwrap_or(1.0))?;

    let mut block = [0.0; BLOCK_SIZE];
    let mut written = 0;
    while written < hold_frames + release_frames {
        if written >= hold_frames && engine.is_note_on() {
            handle.note_off()?;
        }
        render_block(&mut engine, &mut block);
        for sample in block {
            writer.write_sample(sample)?;
        }
        written += block.len();
        // stop as soon as the release tail faded out
        if !engine.is_note_on()
            && written > hold_frames
            && engine.operators().iter().all(|op| op.envelope().level() == 0.0)
        {
            break;
        }
    }
    writer.finalize()?;

    log::info!("Rendered '{}' into '{}'", preset.name, path.display());
    Ok(())
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args = parse_args::<RenderArguments>();

    // Init logger
    simple_logger::SimpleLogger::new()
        .with_level(args.log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        .init()?;

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let presets = match &args.preset {
        Some(name) => vec![factory_preset(name)?],
        None => factory_presets(),
    };

    println!(
        "Rendering {} preset(s) into '{}'...",
        presets.len(),
        output_dir.display()
    );
    for preset in &presets {
        render_preset(preset, &args, &output_dir)?;
    }
    println!("Done.");

    Ok(())
}
