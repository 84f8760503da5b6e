//! Orchestrates the fixed stage order spec.md lays out: replacement
//! rules, then optional LLM refinement (with its own optional speaker
//! identification pre-pass), then segment normalization. Caption
//! rendering is a separate, pure step the caller invokes afterward on
//! the normalized transcript (see `io::output::CaptionBundle`).
//!
//! Grounded on the teacher's `main.rs::process_transcript`, which logs
//! one `tracing::info!` per stage and threads a mutable transcript
//! through them in sequence.

use std::collections::HashMap;

use tracing::info;

use crate::llm::{identify_speakers, refine_transcript, LlmClient, RefinementStats};
use crate::models::{PipelineConfig, Transcript};
use crate::normalize::{normalize_segments, NormalizationStats};
use crate::replace::{apply_replacement_rules, ReplacementStats};

/// Aggregate stats across every stage that ran. `refinement` is `None`
/// when the config has no `llm_refinement` section.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub replacement: ReplacementStats,
    pub refinement: Option<RefinementStats>,
    pub speaker_identification: Option<HashMap<String, String>>,
    pub normalization: NormalizationStats,
}

/// Run the full refinement pipeline over `transcript` in place:
/// Replacement Engine → LLM Refinement (+ optional speaker
/// identification) → Segment Normalizer.
///
/// `client` is only consulted when `config.llm_refinement` is present;
/// passing `None` in that case skips the LLM stage entirely rather than
/// failing, since the stage is opt-in per spec.md.
pub async fn run_pipeline(
    transcript: &mut Transcript,
    config: &PipelineConfig,
    client: Option<&dyn LlmClient>,
) -> PipelineStats {
    info!("Replacement: applying {} rule(s)", config.replacement_rules.len());
    let replacement = apply_replacement_rules(transcript, &config.replacement_rules);
    info!(
        "Replacement: {} segment(s) touched, {} word(s) changed",
        replacement.segments_modified, replacement.word_change_count
    );

    let mut refinement = None;
    let mut speaker_identification = None;

    if let (Some(llm_config), Some(client)) = (&config.llm_refinement, client) {
        if llm_config.speaker_identification {
            info!("LLM refinement: identifying speakers");
            let speaker_map = identify_speakers(transcript, client).await;
            info!("LLM refinement: identified {} speaker(s)", speaker_map.len());
            speaker_identification = Some(speaker_map);
        }

        info!("LLM refinement: requesting suggested corrections");
        let stats = refine_transcript(transcript, llm_config, client).await;
        info!(
            "LLM refinement: {}/{} segment(s) updated, {} suggestion(s) ignored",
            stats.segments_updated,
            stats.segments_processed,
            stats.ignored_suggestions.len()
        );
        refinement = Some(stats);
    } else if config.llm_refinement.is_some() {
        info!("LLM refinement: configured but no client supplied, skipping");
    }

    info!("Normalization: splitting segments to caption-sized units");
    let input_segments = transcript.segments.len();
    let (segments, normalization) = normalize_segments(&transcript.segments, &config.normalization);
    transcript.segments = segments;
    info!(
        "Normalization: {} input segment(s) -> {} output segment(s), {} split(s)",
        input_segments,
        transcript.segments.len(),
        normalization.splits
    );

    PipelineStats {
        replacement,
        refinement,
        speaker_identification,
        normalization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeLlmClient;
    use crate::models::{LlmRefinementConfig, Segment, Word};

    fn sample_transcript() -> Transcript {
        Transcript {
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                text: "sage maker is great".into(),
                speaker: Some("A".into()),
                words: vec![
                    Word::new("sage"),
                    Word::new("maker"),
                    Word::new("is"),
                    Word::new("great"),
                ],
            }],
        }
    }

    #[tokio::test]
    async fn runs_replacement_and_normalization_without_llm() {
        let mut transcript = sample_transcript();
        let mut config = PipelineConfig::default();
        config.replacement_rules = vec![crate::models::ReplacementRule::Literal {
            search: "sage maker".into(),
            replacement: "SageMaker".into(),
        }];

        let stats = run_pipeline(&mut transcript, &config, None).await;
        assert_eq!(stats.replacement.segments_modified, 1);
        assert!(stats.refinement.is_none());
        assert!(transcript.segments[0].text.contains("SageMaker"));
    }

    #[tokio::test]
    async fn skips_llm_stage_when_configured_but_no_client_given() {
        let mut transcript = sample_transcript();
        let mut config = PipelineConfig::default();
        config.llm_refinement = Some(LlmRefinementConfig::default());

        let stats = run_pipeline(&mut transcript, &config, None).await;
        assert!(stats.refinement.is_none());
    }

    #[tokio::test]
    async fn runs_llm_stage_when_client_and_config_present() {
        let mut transcript = sample_transcript();
        let mut config = PipelineConfig::default();
        config.llm_refinement = Some(LlmRefinementConfig::default());
        let client = FakeLlmClient::ok(r#"{"updates":[],"identifiedSpeakers":{}}"#);

        let stats = run_pipeline(&mut transcript, &config, Some(&client)).await;
        assert!(stats.refinement.is_some());
    }

    #[tokio::test]
    async fn end_to_end_over_the_sample_fixture() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sample_transcript.json");
        let mut transcript = crate::io::parse_transcript_file(&path).unwrap();
        let mut config = PipelineConfig::default();
        config.replacement_rules = vec![crate::models::ReplacementRule::Literal {
            search: "sage maker".into(),
            replacement: "SageMaker".into(),
        }];

        let stats = run_pipeline(&mut transcript, &config, None).await;
        assert!(stats.replacement.segments_modified >= 1);
        assert!(transcript.segments.iter().any(|s| s.text.contains("SageMaker")));

        let vtt = crate::captions::render_vtt(&transcript.segments, &config.captions);
        assert!(vtt.starts_with("WEBVTT"));
        let srt = crate::captions::render_srt(&transcript.segments, &config.captions);
        assert!(srt.contains("-->"));
    }
}
