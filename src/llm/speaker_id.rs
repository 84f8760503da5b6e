//! Supplemental opt-in speaker-identification pre-pass: derives display
//! names for numeric/default speaker labels from transcript content,
//! before the main refinement pass's own suggestion-driven remapping
//! runs.
//!
//! Grounded on the teacher's `stages/stage_speaker_id.rs`
//! (`build_speaker_context` excerpt selection: first turns plus longest
//! turns, capped by a context-char budget) and
//! `llm/speaker_id_prompt.rs`'s prompt shape, retargeted from
//! turn/token excerpts to segment excerpts.

use std::collections::HashMap;

use serde::Deserialize;

use crate::llm::client::LlmClient;
use crate::llm::refine::apply_speaker_remap;
use crate::models::Transcript;

const MAX_EXCERPTS_PER_SPEAKER: usize = 3;
const MAX_CONTEXT_CHARS: usize = 4000;

const SPEAKER_ID_SYSTEM_PROMPT: &str = r#"You are identifying speakers in a podcast transcript from context clues.

Guidelines:
1. Look for self-introductions ("Hi, I'm Alice") and name mentions by others ("Thanks, Bob").
2. Only identify a speaker with clear evidence; otherwise leave their label unchanged.
3. Do not guess based on stereotypes or assumptions.

Reply with exactly this JSON shape and no other text:
{ "identifiedSpeakers": { "<original label>": "<name or the original label>", ... } }"#;

/// Build representative excerpts per speaker label: the first two
/// segments (likely introductions) plus the longest remaining segments,
/// restored to chronological order, capped by a total character budget.
fn build_speaker_excerpts(transcript: &Transcript) -> Vec<(String, Vec<String>)> {
    let mut by_speaker: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, segment) in transcript.segments.iter().enumerate() {
        by_speaker.entry(segment.effective_speaker()).or_default().push(i);
    }

    let mut total_chars = 0;
    let mut result = Vec::new();

    let mut speakers: Vec<&String> = by_speaker.keys().collect();
    speakers.sort();

    for speaker in speakers {
        let indices = &by_speaker[speaker];
        let mut selected: Vec<usize> = indices.iter().take(2).copied().collect();

        if indices.len() > 2 {
            let mut by_length: Vec<(usize, usize)> = indices[2..]
                .iter()
                .map(|&i| (i, transcript.segments[i].text.chars().count()))
                .collect();
            by_length.sort_by(|a, b| b.1.cmp(&a.1));
            for (idx, _) in by_length
                .into_iter()
                .take(MAX_EXCERPTS_PER_SPEAKER.saturating_sub(2))
            {
                if !selected.contains(&idx) {
                    selected.push(idx);
                }
            }
        }
        selected.sort_unstable();

        let mut excerpts = Vec::new();
        for idx in selected {
            if excerpts.len() >= MAX_EXCERPTS_PER_SPEAKER {
                break;
            }
            let text = transcript.segments[idx].text.clone();
            if total_chars + text.len() > MAX_CONTEXT_CHARS {
                break;
            }
            total_chars += text.len();
            excerpts.push(text);
        }

        if !excerpts.is_empty() {
            result.push((speaker.clone(), excerpts));
        }
    }

    result
}

fn build_speaker_id_prompt(excerpts: &[(String, Vec<String>)]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Speakers and Excerpts\n\n");
    for (speaker, lines) in excerpts {
        prompt.push_str(&format!("## {}\n", speaker));
        for line in lines {
            prompt.push_str(&format!("- {}\n", line));
        }
        prompt.push('\n');
    }
    prompt
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeakerIdReply {
    #[serde(default)]
    identified_speakers: HashMap<String, String>,
}

fn extract_json_slice(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Identify speaker display names and apply the resulting remap
/// in-place. Returns the identified label map (empty on any transport
/// or parse failure).
pub async fn identify_speakers(transcript: &mut Transcript, client: &dyn LlmClient) -> HashMap<String, String> {
    let excerpts = build_speaker_excerpts(transcript);
    if excerpts.is_empty() {
        return HashMap::new();
    }

    let user_prompt = build_speaker_id_prompt(&excerpts);
    let Ok(reply) = client.complete(SPEAKER_ID_SYSTEM_PROMPT, &user_prompt).await else {
        return HashMap::new();
    };

    let Some(json_slice) = extract_json_slice(&reply) else {
        return HashMap::new();
    };

    let Ok(parsed) = serde_json::from_str::<SpeakerIdReply>(json_slice) else {
        return HashMap::new();
    };

    apply_speaker_remap(transcript, &parsed.identified_speakers);
    parsed.identified_speakers
}
