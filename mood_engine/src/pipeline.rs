// THEORY:
// The `pipeline` module is the top-level API for the whole engine and the
// home of the state stabilizer. It wires the per-frame stages together
// (adapter, history, pattern detector, actuator mapper) and owns the one
// piece of state the outside world cares about: the committed mood.
//
// The stabilizer's job is noise suppression through transition gating. Every
// sampled frame produces an *effective* mood (a derived meta-state when the
// pattern detector fires, the instantaneous label otherwise), but only a
// frame whose effective mood differs from the committed one produces any
// output. Identical frames are idempotent no-ops, which is what keeps the
// actuators from thrashing at camera frame rate.
//
// The pipeline performs no I/O. On a transition it returns the fully mapped
// actuator parameters and leaves delivery to the caller; a failed delivery is
// the caller's problem and is deliberately *not* rolled back here: the
// committed state reflects the intended target, so the next differing frame
// retries implicitly.

use crate::core_modules::actuator_map;
use crate::core_modules::classifier;
use crate::core_modules::history::{EmotionHistory, HISTORY_CAPACITY};
use crate::core_modules::pattern::{self, FATIGUE_SAD_MIN, FOCUS_CALM_MIN, PATTERN_WINDOW, PatternRules};
use std::time::Instant;
use tracing::info;

// Re-export key data structures for the public API.
pub use crate::core_modules::actuator_map::{DEFAULT_LIGHT, DEFAULT_TRACK, LightCommand, Rgb, TrackId};
pub use crate::core_modules::classifier::{
    ACCEPTANCE_THRESHOLD, BoundingBox, ClassifierError, EmotionClassifier, EmotionSample,
    FaceDetection,
};
pub use crate::core_modules::emotion::{Mood, RawEmotion};

/// Configuration for the MoodPipeline, allowing for tunable behavior.
/// Defaults reproduce the fixed constants the system ships with.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Confidence percentage a scored sample must exceed to be accepted.
    pub acceptance_threshold: f64,
    /// How many accepted samples the history buffer retains.
    pub history_capacity: usize,
    /// Size of the recency window the meta-state rules inspect.
    pub pattern_window: usize,
    /// Calm-entry count at or above which the window reads as focus.
    pub focus_min: usize,
    /// Sad-entry count at or above which the window reads as fatigue.
    pub fatigue_min: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: classifier::ACCEPTANCE_THRESHOLD,
            history_capacity: HISTORY_CAPACITY,
            pattern_window: PATTERN_WINDOW,
            focus_min: FOCUS_CALM_MIN,
            fatigue_min: FATIGUE_SAD_MIN,
        }
    }
}

/// The detailed data package for a confirmed mood transition: the new
/// committed mood and the actuator parameters mapped from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionData {
    pub mood: Mood,
    pub light: LightCommand,
    pub track: TrackId,
}

/// The primary output of the pipeline for a single sampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// No face, low confidence, or classifier failure: the committed mood
    /// persists untouched and no history was recorded.
    NoSignal,
    /// A sample was accepted but the effective mood matches the committed
    /// one. The core noise-suppression outcome.
    Steady,
    /// The effective mood differs from the committed one; the caller should
    /// forward these parameters to the actuator gateways.
    Transition(TransitionData),
}

/// The main, top-level struct for the mood engine.
pub struct MoodPipeline {
    config: PipelineConfig,
    history: EmotionHistory,
    committed: Option<Mood>,
    last_transition_at: Option<Instant>,
}

impl MoodPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let history = EmotionHistory::with_capacity(config.history_capacity);
        Self {
            config,
            history,
            committed: None,
            last_transition_at: None,
        }
    }

    /// Processes the classifier output for one sampled frame.
    ///
    /// Stage order: normalize the detections into at most one sample, record
    /// it, derive a meta-state if the history supports one, then gate on the
    /// committed mood. Only a genuine transition maps actuator parameters.
    pub fn observe(&mut self, detections: &[FaceDetection]) -> Report {
        // Stage 1: Normalization. A rejected frame leaves all state untouched.
        let sample = match classifier::normalize(detections, self.config.acceptance_threshold) {
            Some(sample) => sample,
            None => return Report::NoSignal,
        };

        // Stage 2: History. Only raw emotions are ever recorded.
        self.history.push(sample.emotion);

        // Stage 3: Meta-state detection, falling back to the frame label.
        let rules = PatternRules {
            window: self.config.pattern_window,
            focus_min: self.config.focus_min,
            fatigue_min: self.config.fatigue_min,
        };
        let effective = pattern::detect(&self.history, &rules)
            .unwrap_or(Mood::Raw(sample.emotion));

        // Stage 4: Transition gating.
        if self.committed == Some(effective) {
            return Report::Steady;
        }

        self.committed = Some(effective);
        self.last_transition_at = Some(Instant::now());

        let light = actuator_map::light_for(effective);
        let track = actuator_map::track_for(effective);
        info!(mood = %effective, %light, track = %track, "mood transition committed");

        Report::Transition(TransitionData {
            mood: effective,
            light,
            track,
        })
    }

    /// Convenience wrapper for callers that only care whether the frame
    /// changed anything.
    pub fn mood_changed(&mut self, detections: &[FaceDetection]) -> bool {
        matches!(self.observe(detections), Report::Transition(_))
    }

    /// The currently committed mood, if any frame has ever been accepted.
    pub fn committed_mood(&self) -> Option<Mood> {
        self.committed
    }

    /// Monotonic timestamp of the most recent transition, for diagnostics.
    pub fn last_transition_at(&self) -> Option<Instant> {
        self.last_transition_at
    }

    /// How many accepted samples the history currently holds.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::classifier::FaceDetection;

    fn face(label: &str, confidence: f64) -> Vec<FaceDetection> {
        vec![FaceDetection {
            bounding_box: None,
            dominant_emotion: Some(label.to_string()),
            scores: vec![(label.to_string(), confidence)],
        }]
    }

    fn transitions_only(reports: &[Report]) -> usize {
        reports
            .iter()
            .filter(|r| matches!(r, Report::Transition(_)))
            .count()
    }

    #[test]
    fn repeated_identical_labels_transition_exactly_once() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        let reports: Vec<_> = (0..3).map(|_| pipeline.observe(&face("happy", 90.0))).collect();

        assert_eq!(transitions_only(&reports), 1);
        assert!(matches!(reports[0], Report::Transition(_)));
        assert_eq!(reports[1], Report::Steady);
        assert_eq!(reports[2], Report::Steady);
        assert_eq!(pipeline.committed_mood(), Some(Mood::Raw(RawEmotion::Happy)));
    }

    #[test]
    fn each_distinct_label_transitions_again() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        let first = pipeline.observe(&face("happy", 90.0));
        let second = pipeline.observe(&face("sad", 90.0));

        match (first, second) {
            (Report::Transition(a), Report::Transition(b)) => {
                assert_eq!(a.mood, Mood::Raw(RawEmotion::Happy));
                assert_eq!(b.mood, Mood::Raw(RawEmotion::Sad));
                assert_ne!(a.light, b.light);
            }
            other => panic!("expected two transitions, got {other:?}"),
        }
    }

    #[test]
    fn low_confidence_frames_leave_state_untouched() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        pipeline.observe(&face("happy", 90.0));

        assert_eq!(pipeline.observe(&face("sad", 15.0)), Report::NoSignal);
        assert_eq!(pipeline.observe(&[]), Report::NoSignal);
        assert_eq!(pipeline.committed_mood(), Some(Mood::Raw(RawEmotion::Happy)));
        // Rejected frames never enter the history either.
        assert_eq!(pipeline.history_len(), 1);
    }

    #[test]
    fn sustained_calm_commits_focus_and_maps_full_white() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        let mut last = Report::NoSignal;
        for _ in 0..10 {
            last = pipeline.observe(&face("neutral", 80.0));
        }

        assert_eq!(pipeline.committed_mood(), Some(Mood::Focused));
        match last {
            Report::Transition(data) => {
                assert_eq!(data.mood, Mood::Focused);
                assert_eq!(data.light.brightness, 95);
                assert_eq!(data.light.color, Rgb(255, 255, 255));
                assert_eq!(data.track.as_str(), "music/focused.mp3");
            }
            other => panic!("expected the focus transition, got {other:?}"),
        }
        // Once focused, further calm frames are steady, not re-transitions.
        assert_eq!(pipeline.observe(&face("neutral", 80.0)), Report::Steady);
    }

    #[test]
    fn sustained_low_mood_commits_fatigue() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        // 4 angry then 6 sad: the window holds exactly 6 sad entries, below
        // the calm threshold, so the fatigue rule fires.
        for _ in 0..4 {
            pipeline.observe(&face("angry", 80.0));
        }
        for _ in 0..6 {
            pipeline.observe(&face("sad", 80.0));
        }

        assert_eq!(pipeline.committed_mood(), Some(Mood::Tired));
    }

    #[test]
    fn derived_mood_overrides_the_instantaneous_label() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        for _ in 0..9 {
            pipeline.observe(&face("neutral", 80.0));
        }
        // The tenth frame is happy: instantaneously "happy," but the window
        // now reads as focus and the derived mood wins.
        let report = pipeline.observe(&face("happy", 80.0));

        match report {
            Report::Transition(data) => assert_eq!(data.mood, Mood::Focused),
            other => panic!("expected a focus transition, got {other:?}"),
        }
    }

    #[test]
    fn transition_timestamp_is_recorded() {
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        assert!(pipeline.last_transition_at().is_none());

        pipeline.observe(&face("happy", 90.0));
        let first = pipeline.last_transition_at().expect("transition timestamp");

        pipeline.observe(&face("happy", 90.0));
        // A steady frame must not touch the timestamp.
        assert_eq!(pipeline.last_transition_at(), Some(first));
    }
}
