// THEORY:
// The `history` module is the engine's only memory of the recent past: a
// bounded FIFO log of the raw emotions that survived the adapter's acceptance
// checks. It is deliberately dumb (append at the tail, evict at the head,
// hand out recency windows) because all interpretation of that history
// belongs to the pattern detector.
//
// The element type is `RawEmotion`, not `Mood`. That is the load-bearing
// choice: derived meta-states physically cannot be recorded here, so a
// sustained "focused" verdict can never reinforce itself through the buffer.
//
// The buffer is intentionally not thread-safe. There is exactly one writer
// and one reader, both inside the same frame-loop iteration.

use crate::core_modules::emotion::RawEmotion;
use std::collections::VecDeque;

/// How many accepted samples the buffer retains before evicting the oldest.
pub const HISTORY_CAPACITY: usize = 20;

/// A bounded, ordered log of recently accepted raw emotions.
#[derive(Debug, Clone)]
pub struct EmotionHistory {
    entries: VecDeque<RawEmotion>,
    capacity: usize,
}

impl EmotionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an accepted raw emotion, evicting the oldest entry once the
    /// buffer is full. Eviction is the only way entries ever leave.
    pub fn push(&mut self, emotion: RawEmotion) {
        self.entries.push_back(emotion);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `k` entries in order from oldest to newest, or all entries if
    /// fewer than `k` have been recorded.
    pub fn window(&self, k: usize) -> impl Iterator<Item = RawEmotion> + '_ {
        let skip = self.entries.len().saturating_sub(k);
        self.entries.iter().skip(skip).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EmotionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_is_fifo_and_length_is_capped() {
        let mut history = EmotionHistory::with_capacity(4);
        let sequence = [
            RawEmotion::Happy,
            RawEmotion::Sad,
            RawEmotion::Angry,
            RawEmotion::Fear,
            RawEmotion::Neutral, // pushes Happy out
        ];
        for emotion in sequence {
            history.push(emotion);
        }

        assert_eq!(history.len(), 4);
        let contents: Vec<_> = history.window(4).collect();
        assert_eq!(
            contents,
            vec![
                RawEmotion::Sad,
                RawEmotion::Angry,
                RawEmotion::Fear,
                RawEmotion::Neutral,
            ]
        );
    }

    #[test]
    fn window_returns_fewer_entries_before_fill() {
        let mut history = EmotionHistory::new();
        history.push(RawEmotion::Neutral);
        history.push(RawEmotion::Happy);

        let recent: Vec<_> = history.window(10).collect();
        assert_eq!(recent, vec![RawEmotion::Neutral, RawEmotion::Happy]);
    }

    #[test]
    fn window_reflects_only_the_most_recent_entries() {
        let mut history = EmotionHistory::new();
        for _ in 0..15 {
            history.push(RawEmotion::Sad);
        }
        history.push(RawEmotion::Happy);

        let recent: Vec<_> = history.window(1).collect();
        assert_eq!(recent, vec![RawEmotion::Happy]);
    }
}
