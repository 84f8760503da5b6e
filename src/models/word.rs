use serde::{Deserialize, Serialize};

/// Sentinel written into `Word::score` once a word's confidence is no
/// longer meaningful (it was synthesized or its timing was stretched
/// during reconciliation).
pub const ADJUSTED_SCORE: f64 = -1.0;

/// An atomic transcript unit: a surface token with optional timing,
/// speaker, and confidence.
///
/// `text` includes any trailing punctuation ("Hello,", "Bytes.");
/// whitespace is never part of a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Surface form, non-empty.
    pub text: String,
    /// Start time in seconds, monotone non-decreasing within a segment
    /// when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Speaker label, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Confidence in `[0,1]`, or `Some(ADJUSTED_SCORE)` once the word's
    /// timing/text has been synthesized by reconciliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            end: None,
            speaker: None,
            score: None,
        }
    }

    /// Whether this word carries a usable `[start, end]` envelope.
    pub fn has_valid_timing(&self) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => e > s,
            _ => false,
        }
    }

    pub fn mark_adjusted(&mut self) {
        self.score = Some(ADJUSTED_SCORE);
    }
}

/// An ordered, non-empty sequence of words with segment-level timing,
/// derived text, and an optional speaker label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start in seconds.
    #[serde(default)]
    pub start: f64,
    /// Segment end in seconds; `0.0` means invalid/unknown, handled
    /// specially by the caption renderers.
    #[serde(default)]
    pub end: f64,
    /// Derivative text field. Source of truth is `words` when present;
    /// this may be stale on input and is recomputed by every step that
    /// reconciles `words`.
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Segment {
    /// `segment.speaker`, falling back to the first word's speaker, then
    /// the default placeholder label.
    pub fn effective_speaker(&self) -> String {
        self.speaker
            .clone()
            .or_else(|| self.words.first().and_then(|w| w.speaker.clone()))
            .unwrap_or_else(|| "SPEAKER_00".to_string())
    }

    /// Whether `end` is a usable envelope bound (spec: `end == 0` means
    /// invalid/unknown).
    pub fn has_valid_envelope(&self) -> bool {
        self.end > 0.0 && self.end > self.start
    }
}

/// An ordered sequence of segments. Time ranges are trusted ordered by
/// the caller; the core does not enforce non-overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_valid_timing_requires_end_after_start() {
        let mut w = Word::new("hi");
        assert!(!w.has_valid_timing());
        w.start = Some(1.0);
        w.end = Some(1.0);
        assert!(!w.has_valid_timing());
        w.end = Some(1.5);
        assert!(w.has_valid_timing());
    }

    #[test]
    fn segment_effective_speaker_falls_back_to_first_word() {
        let mut seg = Segment {
            start: 0.0,
            end: 1.0,
            text: "hi".into(),
            speaker: None,
            words: vec![Word {
                speaker: Some("Alice".into()),
                ..Word::new("hi")
            }],
        };
        assert_eq!(seg.effective_speaker(), "Alice");
        seg.words.clear();
        assert_eq!(seg.effective_speaker(), "SPEAKER_00");
    }
}
