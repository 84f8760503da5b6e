//! Prompt construction for the refinement pass: fixed instructions plus
//! an indexed-line serialization of the transcript.
//!
//! Grounded on the teacher's `build_window_prompt` shape (header, body,
//! instructions sections assembled into one string) and
//! `SYSTEM_PROMPT`'s "non-negotiable constraints" framing, retargeted
//! from speaker-relabel windows to segment-text correction.

use crate::models::Transcript;

/// Non-negotiable constraints for the correction pass.
pub const SYSTEM_PROMPT: &str = r#"You are correcting machine-transcription errors in a podcast transcript. You MUST follow these rules:

1. Fix only clear transcription errors: misheard words, garbled names, mis-split compound terms.
2. Do NOT rephrase, re-grammar, or otherwise rewrite a segment's meaning.
3. Do NOT add or remove sentences or ideas.
4. If a line has no transcription error, omit it from "updates" entirely.
5. Output MUST be valid JSON matching the schema below, with no prose before or after it.

Reply with exactly this shape:
{ "identifiedSpeakers": { "SPEAKER_00": "Name or SPEAKER_00", ... },
  "updates": [ { "idx": <line number>, "text": "<corrected line text>" }, ... ] }"#;

/// Serialize one indexed line per segment: `"[{i}] [{speaker}] {text}"`,
/// with `text` built from the words array (the source of truth).
pub fn serialize_indexed_lines(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let words_text: String = segment
                .words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let speaker = segment.effective_speaker();
            format!("[{}] [{}] {}", i, speaker, words_text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full user prompt: indexed transcript lines plus optional
/// additional context supplied by the caller.
pub fn build_refinement_prompt(transcript: &Transcript, additional_context: Option<&str>) -> String {
    let mut prompt = String::new();

    if let Some(context) = additional_context {
        prompt.push_str("## Additional Context\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str("## Transcript\n");
    prompt.push_str(&serialize_indexed_lines(transcript));
    prompt.push('\n');

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Segment, Word};

    #[test]
    fn serializes_one_line_per_segment_with_effective_speaker() {
        let transcript = Transcript {
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                text: "hi there".into(),
                speaker: Some("Alice".into()),
                words: vec![
                    Word {
                        speaker: Some("Alice".into()),
                        ..Word::new("hi")
                    },
                    Word {
                        speaker: Some("Alice".into()),
                        ..Word::new("there")
                    },
                ],
            }],
        };

        let lines = serialize_indexed_lines(&transcript);
        assert_eq!(lines, "[0] [Alice] hi there");
    }

    #[test]
    fn falls_back_to_default_speaker_label() {
        let transcript = Transcript {
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                text: "hi".into(),
                speaker: None,
                words: vec![Word::new("hi")],
            }],
        };
        let lines = serialize_indexed_lines(&transcript);
        assert_eq!(lines, "[0] [SPEAKER_00] hi");
    }

    #[test]
    fn prompt_includes_additional_context_when_present() {
        let transcript = Transcript { segments: vec![] };
        let prompt = build_refinement_prompt(&transcript, Some("This is a cooking podcast."));
        assert!(prompt.contains("This is a cooking podcast."));
    }
}
