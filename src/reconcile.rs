//! Segment Reconciler: the hardest algorithm in the core. Applies a new
//! word sequence onto a segment while preserving/reshaping per-word
//! timing, speaker, and score.
//!
//! Grounded in the teacher's mutate-in-place-then-rebuild style
//! (`stages/stage2_reconcile.rs`'s relabel-then-`rebuild_turns` shape),
//! generalized from speaker-id voting to word-sequence reconciliation.

use crate::diff::{compute_diff, DiffOp};
use crate::models::{Segment, Word, ADJUSTED_SCORE};
use crate::numerics::reconstruct_text;

/// Timing buffer accumulated across REMOVE operations that precede the
/// first surviving word, donated to the next KEEP or ADD. This "extend
/// next" policy is intentionally asymmetric with the "extend previous"
/// policy used once a surviving word exists (see DESIGN.md).
#[derive(Debug, Clone, Default)]
struct PendingRemoval {
    start: Option<f64>,
    end: Option<f64>,
    speaker: Option<String>,
}

/// Reconcile `segment` against a new flat word-text sequence, rewriting
/// `segment.words` and `segment.text` in place. Deterministic and
/// idempotent: reconciling twice with the same `patched` yields
/// identical output, since the second pass sees `patched` as both the
/// original and new sequence and emits an all-KEEP diff.
pub fn reconcile_segment(segment: &mut Segment, patched: &[String]) {
    if segment.words.is_empty() {
        segment.text = reconstruct_text(patched);
        return;
    }

    if segment.words.len() == patched.len() {
        for (word, text) in segment.words.iter_mut().zip(patched.iter()) {
            word.text = text.clone();
        }
        segment.text = reconstruct_text(patched);
        return;
    }

    let orig_texts: Vec<&str> = segment.words.iter().map(|w| w.text.as_str()).collect();
    let ops = compute_diff(&orig_texts, patched);

    let mut new_words: Vec<Word> = Vec::with_capacity(patched.len());
    let mut pending: Option<PendingRemoval> = None;

    for op in ops {
        match op {
            DiffOp::Keep { orig_idx, word, .. } => {
                let mut new_word = segment.words[orig_idx].clone();
                new_word.text = word;

                if let Some(pr) = pending.take() {
                    new_word.start = pr.start.or(new_word.start);
                    new_word.score = Some(ADJUSTED_SCORE);
                }

                new_words.push(new_word);
            }
            DiffOp::Remove { orig_idx, .. } => {
                let removed = &segment.words[orig_idx];

                if let Some(last) = new_words.last_mut() {
                    last.end = removed.end.or(last.end);
                    last.score = Some(ADJUSTED_SCORE);
                } else {
                    pending = Some(match pending.take() {
                        Some(mut pr) => {
                            pr.end = removed.end.or(pr.end);
                            pr
                        }
                        None => PendingRemoval {
                            start: removed.start,
                            end: removed.end,
                            speaker: removed.speaker.clone(),
                        },
                    });
                }
            }
            DiffOp::Add { word, .. } => {
                let mut new_word = Word::new(word);
                new_word.score = Some(ADJUSTED_SCORE);

                if let Some(prev) = new_words.last_mut() {
                    if prev.has_valid_timing() {
                        let mid = (prev.start.unwrap() + prev.end.unwrap()) / 2.0;
                        new_word.start = Some(mid);
                        new_word.end = prev.end;
                        new_word.speaker = prev.speaker.clone();
                        prev.end = Some(mid);
                        new_words.push(new_word);
                        continue;
                    }
                }

                if let Some(pr) = pending.take() {
                    new_word.start = pr.start;
                    new_word.end = pr.end;
                    new_word.speaker = pr.speaker;
                } else {
                    new_word.start = Some(segment.start);
                    new_word.end = Some(segment.start);
                }

                new_words.push(new_word);
            }
        }
    }

    segment.words = new_words;
    segment.text = reconstruct_text(patched);
}
