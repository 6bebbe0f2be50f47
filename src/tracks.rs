//! A fixed bank of voice engines, one per sequencer track.

use crate::{
    engine::{VoiceEngine, VoiceEngineHandle, VoiceEngineOptions},
    preset::factory_preset,
    Error,
};

// -------------------------------------------------------------------------------------------------

/// Owns exactly one [`VoiceEngine`] per track.
///
/// Engines are addressed by zero based track indices. Each engine can be rendered from the
/// audio thread while control threads drive it via its [`VoiceEngineHandle`].
pub struct TrackEngines {
    engines: Vec<VoiceEngine>,
}

impl TrackEngines {
    /// Default number of tracks.
    pub const DEFAULT_TRACK_COUNT: usize = 16;

    /// Factory presets which get assigned to the last eight tracks by
    /// [`load_factory_defaults`](Self::load_factory_defaults).
    pub const FACTORY_DEFAULTS: [&'static str; 8] = [
        "SUB BASS",
        "DIGITAL LEAD",
        "CLASSIC BELL",
        "PURE CHAOS",
        "REESE BASS",
        "SCREAM LEAD",
        "HORN SECTION",
        "DIGITAL SCREAM",
    ];

    /// Create a new bank of `track_count` engines with the given engine options.
    pub fn new(track_count: usize, options: VoiceEngineOptions) -> Result<Self, Error> {
        options.validate()?;
        let engines = (0..track_count)
            .map(|_| VoiceEngine::with_options(options))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Created {track_count} track engines");
        Ok(Self { engines })
    }

    /// Number of tracks in the bank.
    pub fn track_count(&self) -> usize {
        self.engines.len()
    }

    /// Access a track's engine. Returns `None` for invalid track indices.
    pub fn engine(&self, track: usize) -> Option<&VoiceEngine> {
        self.engines.get(track)
    }

    /// Mutable access to a track's engine. Returns `None` for invalid track indices.
    pub fn engine_mut(&mut self, track: usize) -> Option<&mut VoiceEngine> {
        self.engines.get_mut(track)
    }

    /// Iterate over all engines, ordered by track.
    pub fn engines_mut(&mut self) -> impl Iterator<Item = &mut VoiceEngine> {
        self.engines.iter_mut()
    }

    /// Create a handle to control the given track's engine from other threads.
    pub fn handle(&self, track: usize) -> Result<VoiceEngineHandle, Error> {
        self.engine(track)
            .map(VoiceEngine::handle)
            .ok_or(Error::TrackNotFound(track))
    }

    /// Render the given track's engine into `output`. Invalid track indices render silence.
    pub fn render(&mut self, track: usize, output: &mut [f32]) {
        match self.engines.get_mut(track) {
            Some(engine) => engine.render(output),
            None => output.fill(0.0),
        }
    }

    /// Load the default factory presets into the last eight tracks: tracks 9-16 in a bank of
    /// 16 tracks. Banks with fewer than eight tracks get the leading presets only.
    pub fn load_factory_defaults(&mut self) -> Result<(), Error> {
        let first_track = self.engines.len().saturating_sub(Self::FACTORY_DEFAULTS.len());
        for (engine, (track, name)) in self.engines[first_track..]
            .iter_mut()
            .zip(Self::FACTORY_DEFAULTS.iter().enumerate())
        {
            let factory = factory_preset(name)?;
            engine.load_preset(&factory.preset);
            log::debug!(
                "Loaded preset '{}' into track {}",
                factory.name,
                first_track + track + 1
            );
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
