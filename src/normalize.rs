//! Segment Normalizer: splits long segments into caption-sized units
//! honoring speaker boundaries and punctuation affinity.
//!
//! Grounded on `other_examples/0a00ae7f_drmckay-homeflix__...-whisper-
//! adapter.rs`'s `split_long_segments`/`format_subtitle_lines` split-
//! point preferences, reshaped into the single left-to-right
//! accumulator pass spec.md §4.7 specifies.

use crate::models::{NormalizationConfig, Segment, Word};
use crate::numerics::reconstruct_text;

/// Distribution stats over the normalized segment set.
#[derive(Debug, Clone, Default)]
pub struct NormalizationStats {
    pub splits: usize,
    pub min_words_per_segment: usize,
    pub max_words_per_segment: usize,
    pub avg_words_per_segment: f64,
    pub p95_words_per_segment: usize,
    pub min_chars_per_segment: usize,
    pub max_chars_per_segment: usize,
    pub avg_chars_per_segment: f64,
    pub p95_chars_per_segment: usize,
}

struct Accumulator {
    words: Vec<Word>,
    speaker: Option<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            words: Vec::new(),
            speaker: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length of the joined text this accumulator would render as
    /// (word lengths plus one separator space per gap).
    fn joined_len(&self) -> usize {
        if self.words.is_empty() {
            0
        } else {
            self.words.iter().map(|w| w.text.chars().count()).sum::<usize>() + self.words.len() - 1
        }
    }
}

fn emit(cur: Accumulator) -> Segment {
    let start = cur.words.first().and_then(|w| w.start).unwrap_or(0.0);
    let end = cur.words.last().and_then(|w| w.end).unwrap_or(0.0);
    let texts: Vec<&str> = cur.words.iter().map(|w| w.text.as_str()).collect();
    Segment {
        start,
        end,
        text: reconstruct_text(&texts),
        speaker: cur.speaker.clone(),
        words: cur.words,
    }
}

/// Normalize a single segment into 1..N caption-sized output segments.
/// Segments with an empty words array pass through unchanged.
fn normalize_segment(segment: &Segment, config: &NormalizationConfig) -> Vec<Segment> {
    if segment.words.is_empty() {
        return vec![segment.clone()];
    }

    let mut outputs = Vec::new();
    let mut cur = Accumulator::new();
    let n = segment.words.len();

    for (i, w) in segment.words.iter().enumerate() {
        // 1. Speaker-change flush.
        if config.split_segment_at_speaker_change && !cur.is_empty() && w.speaker != cur.speaker {
            outputs.push(emit(std::mem::replace(&mut cur, Accumulator::new())));
        }

        // 2. Hard-limit flush: project the sizes after appending `w`.
        let projected_chars =
            cur.joined_len() + if cur.is_empty() { 0 } else { 1 } + w.text.chars().count();
        let projected_words = cur.words.len() + 1;
        if !cur.is_empty()
            && (projected_words > config.max_words_per_segment
                || projected_chars > config.max_chars_per_segment)
        {
            outputs.push(emit(std::mem::replace(&mut cur, Accumulator::new())));
        }

        // 3. Append.
        cur.words.push(w.clone());
        if w.speaker.is_some() {
            cur.speaker = w.speaker.clone();
        }

        // 4. Soft punctuation flush.
        let is_last = i == n - 1;
        if !is_last {
            let progress = (cur.joined_len() as f64 / config.max_chars_per_segment.max(1) as f64)
                .max(cur.words.len() as f64 / config.max_words_per_segment.max(1) as f64);
            let ends_with_punct = w
                .text
                .chars()
                .last()
                .is_some_and(|c| config.punctuation_chars.contains(&c));
            if progress >= config.punctuation_split_threshold && ends_with_punct {
                outputs.push(emit(std::mem::replace(&mut cur, Accumulator::new())));
            }
        }
    }

    if !cur.is_empty() {
        outputs.push(emit(cur));
    }

    outputs
}

fn percentile(mut values: Vec<usize>, p: f64) -> usize {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let rank = (p * (values.len() - 1) as f64).round() as usize;
    values[rank.min(values.len() - 1)]
}

/// Normalize every segment in `transcript`, replacing it with the
/// flattened sequence of normalized segments. When `config.normalize`
/// is false, passes the transcript through unchanged.
pub fn normalize_segments(
    segments: &[Segment],
    config: &NormalizationConfig,
) -> (Vec<Segment>, NormalizationStats) {
    if !config.normalize {
        return (segments.to_vec(), NormalizationStats::default());
    }

    let mut result = Vec::new();
    let mut splits = 0;

    for segment in segments {
        let chunks = normalize_segment(segment, config);
        if chunks.len() > 1 {
            splits += chunks.len() - 1;
        }
        result.extend(chunks);
    }

    let word_counts: Vec<usize> = result.iter().map(|s| s.words.len()).collect();
    let char_counts: Vec<usize> = result.iter().map(|s| s.text.chars().count()).collect();

    let stats = if result.is_empty() {
        NormalizationStats::default()
    } else {
        NormalizationStats {
            splits,
            min_words_per_segment: *word_counts.iter().min().unwrap(),
            max_words_per_segment: *word_counts.iter().max().unwrap(),
            avg_words_per_segment: word_counts.iter().sum::<usize>() as f64 / word_counts.len() as f64,
            p95_words_per_segment: percentile(word_counts.clone(), 0.95),
            min_chars_per_segment: *char_counts.iter().min().unwrap(),
            max_chars_per_segment: *char_counts.iter().max().unwrap(),
            avg_chars_per_segment: char_counts.iter().sum::<usize>() as f64 / char_counts.len() as f64,
            p95_chars_per_segment: percentile(char_counts.clone(), 0.95),
        }
    };

    (result, stats)
}
