// THEORY:
// The `pattern` module is the meta-state layer: it watches the recent history
// window and decides whether the subject's *sustained* condition should
// override the instantaneous frame label. Two meta-states exist today:
//
// - **Focused**: the subject has been overwhelmingly calm (neutral or happy)
//   across the recent window. Calm frames individually mean little; eight of
//   them out of ten mean concentration.
// - **Tired**: low mood dominates the window. A single sad frame is noise;
//   six out of ten is fatigue.
//
// The detector is a pure function of the last-`window` entries: identical
// windows always yield identical verdicts, which is what makes the rules unit
// testable without a camera. Rules are evaluated in a fixed order (focus
// before fatigue) and the first match wins, so a window that satisfies both
// rules resolves to `Focused`.

use crate::core_modules::emotion::{Mood, RawEmotion};
use crate::core_modules::history::EmotionHistory;

/// How many recent entries the rules inspect.
pub const PATTERN_WINDOW: usize = 10;
/// Minimum calm (neutral + happy) entries in the window to call it focus.
pub const FOCUS_CALM_MIN: usize = 8;
/// Minimum sad entries in the window to call it fatigue.
pub const FATIGUE_SAD_MIN: usize = 6;

/// Tunable thresholds for the meta-state rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRules {
    /// Size of the recency window the rules inspect.
    pub window: usize,
    /// Calm-entry count at or above which the window reads as focus.
    pub focus_min: usize,
    /// Sad-entry count at or above which the window reads as fatigue.
    pub fatigue_min: usize,
}

impl Default for PatternRules {
    fn default() -> Self {
        Self {
            window: PATTERN_WINDOW,
            focus_min: FOCUS_CALM_MIN,
            fatigue_min: FATIGUE_SAD_MIN,
        }
    }
}

/// Inspects the history and returns a derived mood, or `None` when no rule
/// fires and the caller should fall back to the instantaneous label.
///
/// The detector only runs once at least `rules.window` entries exist; before
/// that there is not enough evidence to call anything "sustained."
pub fn detect(history: &EmotionHistory, rules: &PatternRules) -> Option<Mood> {
    if history.len() < rules.window {
        return None;
    }

    let mut calm = 0usize;
    let mut sad = 0usize;
    for emotion in history.window(rules.window) {
        match emotion {
            RawEmotion::Neutral | RawEmotion::Happy => calm += 1,
            RawEmotion::Sad => sad += 1,
            _ => {}
        }
    }

    // Focus before fatigue; first match wins.
    if calm >= rules.focus_min {
        return Some(Mood::Focused);
    }
    if sad >= rules.fatigue_min {
        return Some(Mood::Tired);
    }
    None
}
