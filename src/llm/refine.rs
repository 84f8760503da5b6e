//! LLM Refinement: serialize the transcript, invoke the injected LLM
//! capability, parse its reply, remap speakers, and apply
//! validator-gated per-segment rewrites.
//!
//! Grounded on the teacher's `stages/stage1_llm_edit.rs` orchestration
//! shape (build prompt → invoke → parse → apply), generalized from
//! token-relabel patches to whole-line text corrections.

use std::collections::HashMap;
use std::time::Instant;

use serde::Deserialize;

use crate::llm::client::LlmClient;
use crate::llm::prompts::{build_refinement_prompt, SYSTEM_PROMPT};
use crate::models::{LlmRefinementConfig, Transcript};
use crate::numerics::text_to_words;
use crate::reconcile::reconcile_segment;
use crate::validation::{validate_suggestion, ValidationOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct IgnoredSuggestion {
    pub idx: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedUpdate {
    pub idx: usize,
    pub original_text: String,
    pub corrected_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct RefinementStats {
    pub segments_processed: usize,
    pub segments_updated: usize,
    pub speakers_identified: usize,
    pub speaker_map: HashMap<String, String>,
    pub applied_updates: Vec<AppliedUpdate>,
    pub ignored_suggestions: Vec<IgnoredSuggestion>,
    pub llm_response_time_ms: u128,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefinementReply {
    #[serde(default)]
    identified_speakers: HashMap<String, String>,
    #[serde(default)]
    updates: Vec<SuggestedUpdate>,
}

#[derive(Debug, Deserialize)]
struct SuggestedUpdate {
    idx: usize,
    text: String,
}

/// Locate the first `{` and last `}` in `reply` and return that slice.
/// `None` if either brace is missing or they are out of order.
fn extract_json_slice(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Rewrite `segment.speaker` and every matching `word.speaker` for each
/// non-identity mapping in `speaker_map`.
pub(crate) fn apply_speaker_remap(transcript: &mut Transcript, speaker_map: &HashMap<String, String>) {
    for (original, mapped) in speaker_map {
        if mapped == original {
            continue;
        }
        for segment in transcript.segments.iter_mut() {
            if segment.speaker.as_deref() == Some(original.as_str()) {
                segment.speaker = Some(mapped.clone());
            }
            for word in segment.words.iter_mut() {
                if word.speaker.as_deref() == Some(original.as_str()) {
                    word.speaker = Some(mapped.clone());
                }
            }
        }
    }
}

/// Run the LLM refinement step over `transcript` in place.
pub async fn refine_transcript(
    transcript: &mut Transcript,
    config: &LlmRefinementConfig,
    client: &dyn LlmClient,
) -> RefinementStats {
    let mut stats = RefinementStats::default();
    let user_prompt = build_refinement_prompt(transcript, config.additional_context.as_deref());

    let started = Instant::now();
    let reply = client.complete(SYSTEM_PROMPT, &user_prompt).await;
    stats.llm_response_time_ms = started.elapsed().as_millis();

    let reply_text = match reply {
        Ok(text) => text,
        Err(_) => return stats,
    };

    let Some(json_slice) = extract_json_slice(&reply_text) else {
        return stats;
    };

    let parsed: RefinementReply = match serde_json::from_str(json_slice) {
        Ok(p) => p,
        Err(_) => return stats,
    };

    stats.speakers_identified = parsed
        .identified_speakers
        .iter()
        .filter(|(original, mapped)| mapped != original)
        .count();
    stats.speaker_map = parsed.identified_speakers.clone();
    apply_speaker_remap(transcript, &parsed.identified_speakers);

    stats.segments_processed = transcript.segments.len();

    for update in &parsed.updates {
        let Some(segment) = transcript.segments.get_mut(update.idx) else {
            continue;
        };

        let current_text: String = segment
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if update.text == current_text {
            stats.ignored_suggestions.push(IgnoredSuggestion {
                idx: update.idx,
                reason: "no-change".to_string(),
            });
            continue;
        }

        match validate_suggestion(&current_text, &update.text, &config.suggestion_validation) {
            ValidationOutcome::Accepted => {
                let patched = text_to_words(&update.text);
                reconcile_segment(segment, &patched);
                stats.segments_updated += 1;
                stats.applied_updates.push(AppliedUpdate {
                    idx: update.idx,
                    original_text: current_text,
                    corrected_text: update.text.clone(),
                });
            }
            ValidationOutcome::Rejected(reason) => {
                stats.ignored_suggestions.push(IgnoredSuggestion {
                    idx: update.idx,
                    reason: reason.as_str().to_string(),
                });
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::FakeLlmClient;
    use crate::models::{Segment, Word};

    fn segment(text: &str) -> Segment {
        let words: Vec<Word> = text.split_whitespace().map(Word::new).collect();
        Segment {
            start: 0.0,
            end: words.len() as f64,
            text: text.to_string(),
            speaker: Some("SPEAKER_00".into()),
            words,
        }
    }

    #[tokio::test]
    async fn applies_accepted_update_and_remaps_speaker() {
        let mut transcript = Transcript {
            segments: vec![segment("set the um main execution")],
        };
        let reply = r#"{"identifiedSpeakers":{"SPEAKER_00":"Luciano"},"updates":[{"idx":0,"text":"set the min execution"}]}"#;
        let client = FakeLlmClient::ok(reply);
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;

        assert_eq!(stats.segments_updated, 1);
        assert_eq!(stats.speakers_identified, 1);
        assert_eq!(transcript.segments[0].speaker.as_deref(), Some("Luciano"));
        assert_eq!(transcript.segments[0].text, "set the min execution");
    }

    #[tokio::test]
    async fn rejects_suggestion_failing_validation() {
        let mut transcript = Transcript {
            segments: vec![segment(
                "So default in Lambda, that would be a one-to-one ratio",
            )],
        };
        let reply = r#"{"identifiedSpeakers":{},"updates":[{"idx":0,"text":"So you can have up to 64 concurrent invocations"}]}"#;
        let client = FakeLlmClient::ok(reply);
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;

        assert_eq!(stats.segments_updated, 0);
        assert_eq!(stats.ignored_suggestions.len(), 1);
        assert_eq!(stats.ignored_suggestions[0].reason, "word-change-ratio");
    }

    #[tokio::test]
    async fn ignores_update_with_no_change() {
        let mut transcript = Transcript {
            segments: vec![segment("hello world")],
        };
        let reply = r#"{"identifiedSpeakers":{},"updates":[{"idx":0,"text":"hello world"}]}"#;
        let client = FakeLlmClient::ok(reply);
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;
        assert_eq!(stats.ignored_suggestions[0].reason, "no-change");
    }

    #[tokio::test]
    async fn skips_out_of_range_idx() {
        let mut transcript = Transcript {
            segments: vec![segment("hello world")],
        };
        let reply = r#"{"identifiedSpeakers":{},"updates":[{"idx":7,"text":"nonsense"}]}"#;
        let client = FakeLlmClient::ok(reply);
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;
        assert_eq!(stats.segments_updated, 0);
        assert!(stats.ignored_suggestions.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_yields_empty_effect() {
        let mut transcript = Transcript {
            segments: vec![segment("hello world")],
        };
        let client = FakeLlmClient::failing();
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;
        assert_eq!(stats.segments_updated, 0);
        assert_eq!(stats.speakers_identified, 0);
        assert_eq!(transcript.segments[0].text, "hello world");
    }

    #[tokio::test]
    async fn parses_reply_with_surrounding_prose() {
        let mut transcript = Transcript {
            segments: vec![segment("hello world")],
        };
        let reply = format!(
            "Here is my analysis:\n{}\nLet me know if you need anything else.",
            r#"{"identifiedSpeakers":{},"updates":[{"idx":0,"text":"hi world"}]}"#
        );
        let client = FakeLlmClient::ok(reply);
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;
        assert_eq!(stats.segments_updated, 1);
        assert_eq!(transcript.segments[0].text, "hi world");
    }

    #[tokio::test]
    async fn malformed_json_yields_empty_effect() {
        let mut transcript = Transcript {
            segments: vec![segment("hello world")],
        };
        let client = FakeLlmClient::ok("not even json");
        let config = LlmRefinementConfig::default();

        let stats = refine_transcript(&mut transcript, &config, &client).await;
        assert_eq!(stats.segments_updated, 0);
        assert_eq!(transcript.segments[0].text, "hello world");
    }
}
