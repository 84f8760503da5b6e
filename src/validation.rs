//! Suggestion Validator: decides whether a proposed rewrite of a
//! segment's text should be accepted, generalizing the teacher's
//! `llm::validation::validate_patch` shape (a `*Config` struct plus a
//! free `validate_*` function producing an ordered-priority result)
//! from token-relabel validation to text-suggestion validation.

use crate::diff::{compute_diff, DiffOp};
use crate::models::SuggestionValidationConfig;
use crate::numerics::{normalized_edit_distance, split_words};

/// Why a suggestion was rejected, in spec-mandated priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoChange,
    WordChangeRatio,
    EditDistance,
    ConsecutiveChanges,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::NoChange => "no-change",
            RejectReason::WordChangeRatio => "word-change-ratio",
            RejectReason::EditDistance => "edit-distance",
            RejectReason::ConsecutiveChanges => "consecutive-changes",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}

/// Longest consecutive run of non-KEEP operations in a diff stream.
fn max_consecutive_changes(ops: &[DiffOp]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for op in ops {
        if matches!(op, DiffOp::Keep { .. }) {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}

/// Word-change ratio via LCS over lowercased word arrays:
/// `(max(|o|,|c|) - |lcs(o,c)|) / max(|o|,|c|)`. LCS (not positional
/// compare) is load-bearing — it treats "lambda land" -> "LambdaLith" as
/// two removes plus one add rather than a cascading mismatch.
pub fn word_change_ratio(original: &str, corrected: &str) -> f64 {
    let o = split_words(original);
    let c = split_words(corrected);
    let max_len = o.len().max(c.len());
    if max_len == 0 {
        return 0.0;
    }
    let lcs = crate::diff::compute_lcs(&o, &c);
    (max_len - lcs.lcs.len()) as f64 / max_len as f64
}

/// Validate a proposed rewrite of `original` to `corrected` against the
/// configured thresholds.
pub fn validate_suggestion(
    original: &str,
    corrected: &str,
    config: &SuggestionValidationConfig,
) -> ValidationOutcome {
    if !config.enabled {
        return ValidationOutcome::Accepted;
    }

    if original == corrected {
        return ValidationOutcome::Rejected(RejectReason::NoChange);
    }

    let orig_words = split_words(original);
    let corrected_words = split_words(corrected);
    let diff_ops = compute_diff(&orig_words, &corrected_words);
    let consecutive = max_consecutive_changes(&diff_ops);

    if orig_words.len() < config.min_words_for_ratio_check {
        return if consecutive > config.max_consecutive_changes {
            ValidationOutcome::Rejected(RejectReason::ConsecutiveChanges)
        } else {
            ValidationOutcome::Accepted
        };
    }

    let ratio = word_change_ratio(original, corrected);
    if ratio > config.max_word_change_ratio {
        return ValidationOutcome::Rejected(RejectReason::WordChangeRatio);
    }

    let edit_distance = normalized_edit_distance(original, corrected);
    if edit_distance > config.max_normalized_edit_distance {
        return ValidationOutcome::Rejected(RejectReason::EditDistance);
    }

    if consecutive > config.max_consecutive_changes {
        return ValidationOutcome::Rejected(RejectReason::ConsecutiveChanges);
    }

    ValidationOutcome::Accepted
}
