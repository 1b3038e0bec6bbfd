// THEORY:
// The `emotion` module defines the vocabulary of the entire engine. It draws a
// hard, type-level line between the two kinds of labels the system deals with:
//
// 1.  **Raw emotions** (`RawEmotion`): the closed set of labels an upstream
//     face classifier can actually report. These are the only values allowed
//     into the history buffer.
// 2.  **Moods** (`Mood`): the labels the rest of the system acts on. A mood is
//     either a raw emotion passed straight through, or one of two *derived*
//     meta-states (`Focused`, `Tired`) that the pattern detector computes from
//     recent raw-label history.
//
// Keeping these as two separate types (rather than one enum with a "derived"
// flag) makes an important invariant unrepresentable: a derived mood can never
// be pushed back into the history buffer, so the pattern detector can never
// feed on its own output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An emotion label as reported directly by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawEmotion {
    Happy,
    Sad,
    Angry,
    Surprise,
    Neutral,
    Fear,
    Disgust,
}

impl RawEmotion {
    /// Every raw emotion the classifier vocabulary contains.
    pub const ALL: [RawEmotion; 7] = [
        RawEmotion::Happy,
        RawEmotion::Sad,
        RawEmotion::Angry,
        RawEmotion::Surprise,
        RawEmotion::Neutral,
        RawEmotion::Fear,
        RawEmotion::Disgust,
    ];

    /// Parses a classifier label string. Classifier vocabularies are lowercase;
    /// anything outside the known set does not parse.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "happy" => Some(RawEmotion::Happy),
            "sad" => Some(RawEmotion::Sad),
            "angry" => Some(RawEmotion::Angry),
            "surprise" => Some(RawEmotion::Surprise),
            "neutral" => Some(RawEmotion::Neutral),
            "fear" => Some(RawEmotion::Fear),
            "disgust" => Some(RawEmotion::Disgust),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RawEmotion::Happy => "happy",
            RawEmotion::Sad => "sad",
            RawEmotion::Angry => "angry",
            RawEmotion::Surprise => "surprise",
            RawEmotion::Neutral => "neutral",
            RawEmotion::Fear => "fear",
            RawEmotion::Disgust => "disgust",
        }
    }
}

impl fmt::Display for RawEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The externally visible state the actuators are driven by: either a raw
/// emotion passed through unchanged, or a meta-state derived from history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    /// A raw classifier emotion used as-is.
    Raw(RawEmotion),
    /// Sustained calm over the recent window; never reported by the classifier.
    Focused,
    /// Sustained low mood over the recent window; never reported by the classifier.
    Tired,
}

impl Mood {
    /// Parses any label the system can commit to, raw or derived.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "focused" => Some(Mood::Focused),
            "tired" => Some(Mood::Tired),
            other => RawEmotion::parse(other).map(Mood::Raw),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Raw(emotion) => emotion.as_str(),
            Mood::Focused => "focused",
            Mood::Tired => "tired",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RawEmotion> for Mood {
    fn from(emotion: RawEmotion) -> Self {
        Mood::Raw(emotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_raw_label_round_trips() {
        for emotion in RawEmotion::ALL {
            assert_eq!(RawEmotion::parse(emotion.as_str()), Some(emotion));
        }
    }

    #[test]
    fn derived_labels_parse_only_as_moods() {
        assert_eq!(RawEmotion::parse("focused"), None);
        assert_eq!(RawEmotion::parse("tired"), None);
        assert_eq!(Mood::parse("focused"), Some(Mood::Focused));
        assert_eq!(Mood::parse("tired"), Some(Mood::Tired));
    }

    #[test]
    fn unknown_labels_do_not_parse() {
        assert_eq!(Mood::parse("confused"), None);
        assert_eq!(Mood::parse("HAPPY"), None);
    }
}
