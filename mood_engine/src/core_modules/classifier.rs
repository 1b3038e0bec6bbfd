// THEORY:
// The `classifier` module is the boundary between the engine and the opaque
// face/emotion classifier it sits on top of. Upstream classifiers are wildly
// inconsistent: one backend reports a bounding box plus a per-emotion score
// table, another reports a "dominant emotion" field with confidence
// percentages, and both occasionally return garbage. This module exists so
// that every one of those quirks is absorbed in exactly one place.
//
// Key architectural principles:
// 1.  **One normalized sample type**: everything downstream sees either an
//     `EmotionSample` (one label, one confidence) or nothing at all. No other
//     module ever branches on the shape of the classifier output.
// 2.  **Deterministic selection**: both the choice among multiple detected
//     faces (first in detection order) and the arg-max among tied scores
//     (first-encountered key wins) are deterministic and reproducible. They
//     are documented policy choices, not accidents.
// 3.  **Failure degrades to silence**: a classifier error, an unrecognized
//     output shape, or a sub-threshold confidence all resolve to "no sample
//     this frame." The committed state upstream simply persists.

use crate::core_modules::emotion::RawEmotion;
use thiserror::Error;
use tracing::debug;

/// Confidence percentage below or at which a scored detection is discarded.
pub const ACCEPTANCE_THRESHOLD: f64 = 20.0;

/// A face location in frame pixel coordinates, as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One detected face, in whichever shape the upstream backend emits.
///
/// The box-style backend fills `bounding_box` and `scores`; the dominant-style
/// backend fills `dominant_emotion` and `scores`. `scores` preserves the
/// backend's emission order, which matters for tie-breaking. Scores are
/// percentages in [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    pub bounding_box: Option<BoundingBox>,
    pub dominant_emotion: Option<String>,
    pub scores: Vec<(String, f64)>,
}

/// Failure reported by a classifier backend. Callers degrade to "no sample"
/// rather than propagating this into the frame loop.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier backend failure: {0}")]
    Backend(String),
    #[error("frame not analyzable: {0}")]
    BadFrame(String),
}

/// The opaque per-frame classifier the engine is driven by. Implementations
/// wrap whatever detection backend is available; the engine only ever calls
/// this one method.
pub trait EmotionClassifier {
    /// Analyzes one frame buffer and returns zero or more face detections.
    fn detect(&mut self, frame: &[u8]) -> Result<Vec<FaceDetection>, ClassifierError>;
}

/// The normalized per-frame output of the adapter: one best-guess label with
/// its confidence percentage. Ephemeral; one per sampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionSample {
    pub emotion: RawEmotion,
    pub confidence: f64,
}

/// Normalizes raw classifier output into at most one accepted sample.
///
/// Policy, in order:
/// - no detections: no sample;
/// - multiple faces: the first detection in detection order is used;
/// - per face: arg-max over the score table with strict `>` comparison, so a
///   tie resolves to the first-encountered key in emission order;
/// - if the detection carries a dominant-emotion field, the winning score must
///   exceed `acceptance_threshold`; a box-only detection has no confidence
///   semantics and is accepted unconditionally;
/// - a label outside the known vocabulary, or a shape with neither scores nor
///   a dominant label, yields no sample.
pub fn normalize(
    detections: &[FaceDetection],
    acceptance_threshold: f64,
) -> Option<EmotionSample> {
    let face = detections.first()?;

    let mut best: Option<(&str, f64)> = None;
    for (label, score) in &face.scores {
        if best.is_none_or(|(_, top)| *score > top) {
            best = Some((label.as_str(), *score));
        }
    }

    let (label, confidence) = match best {
        Some(winner) => winner,
        // Degenerate shape with no score table: only a dominant label can
        // rescue the frame, and it carries zero confidence.
        None => (face.dominant_emotion.as_deref()?, 0.0),
    };

    // A dominant-emotion shape carries confidence semantics; a box-only shape
    // does not, and is accepted as-is.
    if face.dominant_emotion.is_some() && confidence <= acceptance_threshold {
        debug!(label, confidence, "sample rejected below acceptance threshold");
        return None;
    }

    match RawEmotion::parse(label) {
        Some(emotion) => Some(EmotionSample { emotion, confidence }),
        None => {
            debug!(label, "classifier emitted a label outside the known vocabulary");
            None
        }
    }
}
