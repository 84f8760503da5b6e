//! Replacement Engine: compiles literal/regex rules once and applies
//! them over each segment's word-joined text, then hands the result to
//! the reconciler.
//!
//! Grounded on `other_examples/f1e48aac_tigrerol-BJJ-Analyzer-Rust__...
//! -llm-correction.rs`'s `TextReplacement`/`apply_replacements` shape,
//! generalized to rule-keyed counting and reconciled (rather than blind
//! substring) application.

use std::collections::HashMap;

use regex::Regex;

use crate::models::{ReplacementRule, Transcript};
use crate::numerics::text_to_words;
use crate::reconcile::reconcile_segment;

/// Statistics returned by a replacement pass.
#[derive(Debug, Clone, Default)]
pub struct ReplacementStats {
    pub segments_modified: usize,
    pub word_change_count: usize,
    pub rule_counts: HashMap<String, usize>,
}

enum CompiledRule {
    Literal {
        search: String,
        replacement: String,
        key: String,
    },
    Regex {
        pattern: Regex,
        replacement: String,
        key: String,
    },
}

impl CompiledRule {
    fn compile(rule: &ReplacementRule) -> Option<Self> {
        let key = rule.key();
        match rule {
            ReplacementRule::Literal { search, replacement } => Some(CompiledRule::Literal {
                search: search.clone(),
                replacement: replacement.clone(),
                key,
            }),
            ReplacementRule::Regex { search, replacement } => {
                Regex::new(search).ok().map(|pattern| CompiledRule::Regex {
                    pattern,
                    replacement: replacement.clone(),
                    key,
                })
            }
        }
    }

    fn key(&self) -> &str {
        match self {
            CompiledRule::Literal { key, .. } => key,
            CompiledRule::Regex { key, .. } => key,
        }
    }

    /// Non-overlapping match count: literal counting advances past the
    /// end of each match; regex counting uses a global find pass.
    fn count_matches(&self, text: &str) -> usize {
        match self {
            CompiledRule::Literal { search, .. } => {
                if search.is_empty() {
                    return 0;
                }
                let mut count = 0;
                let mut idx = 0;
                while let Some(pos) = text[idx..].find(search.as_str()) {
                    count += 1;
                    idx += pos + search.len();
                    if idx > text.len() {
                        break;
                    }
                }
                count
            }
            CompiledRule::Regex { pattern, .. } => pattern.find_iter(text).count(),
        }
    }

    fn apply(&self, text: &str) -> String {
        match self {
            CompiledRule::Literal { search, replacement, .. } => text.replace(search, replacement),
            CompiledRule::Regex { pattern, replacement, .. } => {
                pattern.replace_all(text, replacement.as_str()).into_owned()
            }
        }
    }
}

/// Compile and apply `rules` in order over every segment of
/// `transcript`. Rules are order-sensitive (later rules see earlier
/// rules' output) but per-segment outcomes are independent of segment
/// order.
pub fn apply_replacement_rules(transcript: &mut Transcript, rules: &[ReplacementRule]) -> ReplacementStats {
    let compiled: Vec<CompiledRule> = rules.iter().filter_map(CompiledRule::compile).collect();
    let mut stats = ReplacementStats::default();

    for segment in transcript.segments.iter_mut() {
        let source: String = segment
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut text = source.clone();

        for rule in &compiled {
            let count = rule.count_matches(&text);
            if count == 0 {
                continue;
            }
            text = rule.apply(&text);
            *stats.rule_counts.entry(rule.key().to_string()).or_insert(0) += count;
            stats.word_change_count += count;
        }

        if text != source {
            let patched = text_to_words(&text);
            reconcile_segment(segment, &patched);
            stats.segments_modified += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Segment, Word};

    fn segment_from(words: &[&str]) -> Segment {
        Segment {
            start: 0.0,
            end: words.len() as f64,
            text: words.join(" "),
            speaker: None,
            words: words
                .iter()
                .enumerate()
                .map(|(i, w)| Word {
                    text: w.to_string(),
                    start: Some(i as f64),
                    end: Some(i as f64 + 1.0),
                    speaker: None,
                    score: Some(0.9),
                })
                .collect(),
        }
    }

    #[test]
    fn literal_multi_word_collapse_with_stats() {
        let mut transcript = Transcript {
            segments: vec![segment_from(&["sage", "maker", "rocks"])],
        };
        let rules = vec![ReplacementRule::Literal {
            search: "sage maker".into(),
            replacement: "SageMaker".into(),
        }];
        let stats = apply_replacement_rules(&mut transcript, &rules);

        assert_eq!(stats.segments_modified, 1);
        assert_eq!(
            stats.rule_counts.get("sage maker->SageMaker"),
            Some(&1)
        );
        assert_eq!(transcript.segments[0].text, "SageMaker rocks");
    }

    #[test]
    fn regex_rule_removes_filler_words() {
        let mut transcript = Transcript {
            segments: vec![segment_from(&["so", "um", "yeah", "ok"])],
        };
        let rules = vec![ReplacementRule::Regex {
            search: r"\bum\b".into(),
            replacement: "".into(),
        }];
        let stats = apply_replacement_rules(&mut transcript, &rules);
        assert_eq!(stats.segments_modified, 1);
        assert!(!transcript.segments[0].text.contains("um"));
    }

    #[test]
    fn no_match_leaves_segment_untouched() {
        let mut transcript = Transcript {
            segments: vec![segment_from(&["hello", "world"])],
        };
        let rules = vec![ReplacementRule::Literal {
            search: "xyz".into(),
            replacement: "abc".into(),
        }];
        let stats = apply_replacement_rules(&mut transcript, &rules);
        assert_eq!(stats.segments_modified, 0);
        assert_eq!(transcript.segments[0].text, "hello world");
    }

    #[test]
    fn outcome_independent_of_segment_order() {
        let seg_a = segment_from(&["sage", "maker", "rocks"]);
        let seg_b = segment_from(&["hello", "world"]);
        let rules = vec![ReplacementRule::Literal {
            search: "sage maker".into(),
            replacement: "SageMaker".into(),
        }];

        let mut forward = Transcript {
            segments: vec![seg_a.clone(), seg_b.clone()],
        };
        let mut reversed = Transcript {
            segments: vec![seg_b, seg_a],
        };

        apply_replacement_rules(&mut forward, &rules);
        apply_replacement_rules(&mut reversed, &rules);

        assert_eq!(forward.segments[0].text, reversed.segments[1].text);
        assert_eq!(forward.segments[1].text, reversed.segments[0].text);
    }
}
