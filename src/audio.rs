//! Audio service: one-shot sound cues and looping background music.
//!
//! The session plays sounds through the [`AudioSink`] trait and never sees
//! a device handle; [`AudioService`] is the rodio-backed implementation,
//! created once at process start and dropped at exit. A missing audio
//! device or missing sound files degrade to silence rather than stopping
//! the game.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::mixer::Mixer;
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Where cue and music files are looked up, relative to the working
/// directory.
pub const SOUND_DIR: &str = "assets/sounds";

/// Extensions tried for each sound file, in order.
const SOUND_EXTENSIONS: [&str; 2] = ["wav", "ogg"];

/// Candidate background-music files, tried in order.
pub const MUSIC_FILES: [&str; 2] = ["music.ogg", "music.mp3"];

/// The one-shot sounds the session can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Fire,
    Explosion,
    PlayerHit,
}

impl SoundCue {
    fn file_stem(self) -> &'static str {
        match self {
            SoundCue::Fire => "fire",
            SoundCue::Explosion => "explosion",
            SoundCue::PlayerHit => "hit",
        }
    }
}

/// The seam the session plays sounds through.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

// ── Volume rules ─────────────────────────────────────────────────────────────

/// Volume is kept to one decimal place.
pub fn round_volume(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Apply a ±step to a volume, clamping into [0.0, 1.0] and rounding to
/// one decimal place. A zero step leaves the volume untouched.
pub fn step_volume(current: f32, delta: f32) -> f32 {
    if delta > 0.0 {
        round_volume((current + delta).min(1.0))
    } else if delta < 0.0 {
        round_volume((current + delta).max(0.0))
    } else {
        current
    }
}

// ── Rodio-backed service ─────────────────────────────────────────────────────

type CueSource = Buffered<Decoder<BufReader<File>>>;

pub struct AudioService {
    /// Keeps the output device open for the lifetime of the service.
    _stream: Option<OutputStream>,
    mixer: Option<Mixer>,
    music: Option<Sink>,
    cues: HashMap<SoundCue, CueSource>,
    volume: f32,
}

impl AudioService {
    /// Open the default output device and pre-decode the cue files.
    /// Failures leave a silent service behind.
    pub fn new() -> Self {
        let mut service = AudioService {
            _stream: None,
            mixer: None,
            music: None,
            cues: HashMap::new(),
            volume: 1.0,
        };

        let stream = match rodio::OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(_) => return service,
        };
        service.mixer = Some(stream.mixer().clone());
        service._stream = Some(stream);

        for cue in [SoundCue::Fire, SoundCue::Explosion, SoundCue::PlayerHit] {
            if let Some(source) = load_sound(cue.file_stem()) {
                service.cues.insert(cue, source);
            }
        }

        service
    }

    /// Start looping background music from the first candidate under
    /// [`SOUND_DIR`] that decodes. Replaces any music already playing.
    pub fn play_music(&mut self) {
        let Some(mixer) = &self.mixer else { return };

        for name in MUSIC_FILES {
            let path = Path::new(SOUND_DIR).join(name);
            let Ok(file) = File::open(&path) else { continue };
            let Ok(decoder) = Decoder::try_from(file) else { continue };

            let sink = Sink::connect_new(mixer);
            sink.set_volume(self.volume);
            sink.append(decoder.repeat_infinite());
            // Dropping the previous sink stops the old track.
            self.music = Some(sink);
            return;
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(music) = &self.music {
            music.stop();
        }
        self.music = None;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Adjust the shared volume by ±`delta` and return the new value.
    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(step_volume(self.volume, delta));
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = round_volume(volume);
        if let Some(music) = &self.music {
            music.set_volume(self.volume);
        }
    }
}

impl Default for AudioService {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for AudioService {
    fn play(&mut self, cue: SoundCue) {
        if let (Some(mixer), Some(source)) = (&self.mixer, self.cues.get(&cue)) {
            let sink = Sink::connect_new(mixer);
            sink.set_volume(self.volume);
            sink.append(source.clone());
            sink.detach();
        }
    }
}

fn load_sound(stem: &str) -> Option<CueSource> {
    for ext in SOUND_EXTENSIONS {
        let path: PathBuf = Path::new(SOUND_DIR).join(format!("{stem}.{ext}"));
        let Ok(file) = File::open(&path) else { continue };
        if let Ok(decoder) = Decoder::try_from(file) {
            return Some(decoder.buffered());
        }
    }
    None
}
