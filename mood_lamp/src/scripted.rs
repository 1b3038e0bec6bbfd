// THEORY:
// The `ScriptedClassifier` is the runner's stand-in for a real detection
// backend: it replays a canned sequence of per-frame detections. It serves as
// the default demo (exercising every interesting pipeline behavior without a
// camera) and as the placeholder a real backend slots in for; anything
// implementing `EmotionClassifier` can take its seat in the frame loop.

use mood_engine::pipeline::{ClassifierError, EmotionClassifier, FaceDetection};
use std::collections::VecDeque;

/// A classifier that replays a fixed per-frame detection script.
pub struct ScriptedClassifier {
    frames: VecDeque<Vec<FaceDetection>>,
}

impl ScriptedClassifier {
    pub fn new(frames: Vec<Vec<FaceDetection>>) -> Self {
        Self { frames: frames.into() }
    }

    /// A single-face, dominant-emotion-shaped detection.
    pub fn face(label: &str, confidence: f64) -> Vec<FaceDetection> {
        vec![FaceDetection {
            bounding_box: None,
            dominant_emotion: Some(label.to_string()),
            scores: vec![(label.to_string(), confidence)],
        }]
    }

    /// The demo script: transitions, suppression, a rejected low-confidence
    /// frame, an empty frame, a sustained-calm run that derives focus, and a
    /// sustained-sad run that derives fatigue.
    pub fn demo() -> Self {
        let mut frames: Vec<Vec<FaceDetection>> = Vec::new();

        frames.push(Self::face("happy", 88.0));
        frames.push(Self::face("happy", 91.0)); // steady, no actuator traffic
        frames.push(Self::face("sad", 14.0)); // below threshold, ignored
        frames.push(Vec::new()); // no face, ignored
        frames.push(Self::face("surprise", 64.0));

        for _ in 0..10 {
            frames.push(Self::face("neutral", 75.0)); // window fills, focus derives
        }
        for _ in 0..4 {
            frames.push(Self::face("angry", 70.0));
        }
        for _ in 0..6 {
            frames.push(Self::face("sad", 82.0)); // six sad of ten, fatigue derives
        }

        Self::new(frames)
    }

    /// The next scripted frame, or `None` once the script is exhausted.
    pub fn next_frame(&mut self) -> Option<Vec<FaceDetection>> {
        self.frames.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl EmotionClassifier for ScriptedClassifier {
    fn detect(&mut self, _frame: &[u8]) -> Result<Vec<FaceDetection>, ClassifierError> {
        Ok(self.next_frame().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mood_engine::pipeline::{Mood, MoodPipeline, PipelineConfig, Report};

    #[test]
    fn frames_replay_in_script_order_then_fall_silent() {
        let mut classifier = ScriptedClassifier::new(vec![
            ScriptedClassifier::face("happy", 90.0),
            Vec::new(),
        ]);

        let first = classifier.detect(&[]).unwrap();
        assert_eq!(first[0].dominant_emotion.as_deref(), Some("happy"));
        assert!(classifier.detect(&[]).unwrap().is_empty());
        // Exhausted scripts report empty frames, not errors.
        assert!(classifier.detect(&[]).unwrap().is_empty());
    }

    #[test]
    fn demo_script_walks_the_pipeline_through_focus_and_fatigue() {
        let mut classifier = ScriptedClassifier::demo();
        let mut pipeline = MoodPipeline::new(PipelineConfig::default());
        let mut committed = Vec::new();

        while let Some(detections) = classifier.next_frame() {
            if let Report::Transition(data) = pipeline.observe(&detections) {
                committed.push(data.mood);
            }
        }

        assert!(committed.contains(&Mood::Focused));
        assert_eq!(committed.last(), Some(&Mood::Tired));
    }
}
