// THEORY:
// The `actuator_map` module is the deterministic end of the engine: a pure,
// total lookup from any committable mood to the physical parameters the
// actuators should assume. It holds no state and performs no I/O; the same
// mood always yields the same light command and the same track.
//
// Totality matters more than the individual numbers. Every mood the pipeline
// can possibly commit, raw or derived, has a defined row, and the
// string-keyed convenience lookup falls back to a fixed default entry for
// labels outside the vocabulary, so the mapping can never fail at runtime.
// The numbers themselves are product decisions (warm light for joy, dim cool
// light for low mood, full white for focus) baked in as literals.

use crate::core_modules::emotion::Mood;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The full parameter set for the ambient light: brightness percentage plus
/// color. Derived from the committed mood, never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightCommand {
    /// Brightness percentage, 0-100.
    pub brightness: u8,
    pub color: Rgb,
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.color;
        write!(f, "{}% rgb({r},{g},{b})", self.brightness)
    }
}

/// A label-addressed audio asset, relative to the configured music directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackId(pub &'static str);

impl TrackId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The entry used when a label falls outside the known vocabulary.
pub const DEFAULT_LIGHT: LightCommand = LightCommand {
    brightness: 65,
    color: Rgb(255, 255, 255),
};

/// The track used when a label falls outside the known vocabulary.
pub const DEFAULT_TRACK: TrackId = TrackId("music/neutral.mp3");

/// Maps a mood to its light parameters. Total over the mood vocabulary.
pub fn light_for(mood: Mood) -> LightCommand {
    use crate::core_modules::emotion::RawEmotion::*;
    let (brightness, color) = match mood {
        Mood::Raw(Happy) => (85, Rgb(255, 200, 100)),
        Mood::Raw(Neutral) => (65, Rgb(220, 230, 255)),
        Mood::Raw(Sad) => (45, Rgb(150, 180, 255)),
        Mood::Raw(Angry) => (55, Rgb(255, 100, 100)),
        Mood::Raw(Surprise) => (70, Rgb(255, 255, 200)),
        Mood::Raw(Fear) => (40, Rgb(100, 100, 200)),
        Mood::Raw(Disgust) => (50, Rgb(150, 200, 100)),
        Mood::Focused => (95, Rgb(255, 255, 255)),
        Mood::Tired => (45, Rgb(255, 180, 80)),
    };
    LightCommand { brightness, color }
}

/// Maps a mood to its looping audio track. Total over the mood vocabulary.
pub fn track_for(mood: Mood) -> TrackId {
    use crate::core_modules::emotion::RawEmotion::*;
    match mood {
        Mood::Raw(Happy) => TrackId("music/happy.mp3"),
        Mood::Raw(Neutral) => TrackId("music/neutral.mp3"),
        Mood::Raw(Sad) => TrackId("music/sad.mp3"),
        Mood::Raw(Angry) => TrackId("music/angry.mp3"),
        Mood::Raw(Surprise) => TrackId("music/surprise.mp3"),
        Mood::Raw(Fear) => TrackId("music/fear.mp3"),
        Mood::Raw(Disgust) => TrackId("music/disgust.mp3"),
        Mood::Focused => TrackId("music/focused.mp3"),
        Mood::Tired => TrackId("music/tired.mp3"),
    }
}

/// String-keyed lookup for callers holding an unparsed label; unknown labels
/// map to the default entry rather than failing.
pub fn light_for_label(label: &str) -> LightCommand {
    Mood::parse(label).map(light_for).unwrap_or(DEFAULT_LIGHT)
}

/// String-keyed track lookup with the same default-entry fallback.
pub fn track_for_label(label: &str) -> TrackId {
    Mood::parse(label).map(track_for).unwrap_or(DEFAULT_TRACK)
}
