use serde::{Deserialize, Serialize};

use super::rule::ReplacementRule;

/// Thresholds governing whether a proposed LLM rewrite of a segment is
/// accepted or rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionValidationConfig {
    pub enabled: bool,
    pub max_word_change_ratio: f64,
    pub max_normalized_edit_distance: f64,
    pub max_consecutive_changes: usize,
    /// Below this original word count, only the consecutive-changes
    /// check applies; short segments commonly need proportionally
    /// larger edits.
    pub min_words_for_ratio_check: usize,
}

impl Default for SuggestionValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_word_change_ratio: 0.4,
            max_normalized_edit_distance: 0.5,
            max_consecutive_changes: 3,
            min_words_for_ratio_check: 5,
        }
    }
}

/// Tag style for highlighted words in the rendered captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStyle {
    Underline,
    Bold,
    Italic,
}

impl HighlightStyle {
    pub fn tag(self) -> &'static str {
        match self {
            HighlightStyle::Underline => "u",
            HighlightStyle::Bold => "b",
            HighlightStyle::Italic => "i",
        }
    }
}

/// When to prefix a cue's text with the speaker's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeakerNameMode {
    Never,
    Always,
    WhenChanges,
}

/// Which caption formats to emit, and how to render per-word
/// highlighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptionsConfig {
    pub generate_vtt: bool,
    pub generate_srt: bool,
    pub generate_json: bool,
    pub highlight_words: bool,
    pub highlight_with: HighlightStyle,
    pub include_speaker_names: SpeakerNameMode,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            generate_vtt: true,
            generate_srt: true,
            generate_json: true,
            highlight_words: false,
            highlight_with: HighlightStyle::Underline,
            include_speaker_names: SpeakerNameMode::WhenChanges,
        }
    }
}

/// Limits and punctuation rules for splitting long segments into
/// caption-sized units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizationConfig {
    pub max_chars_per_segment: usize,
    pub max_words_per_segment: usize,
    pub split_segment_at_speaker_change: bool,
    pub punctuation_split_threshold: f64,
    pub punctuation_chars: Vec<char>,
    pub normalize: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            max_chars_per_segment: 48,
            max_words_per_segment: 10,
            split_segment_at_speaker_change: true,
            punctuation_split_threshold: 0.7,
            punctuation_chars: vec!['.', ',', '?', '!', ';', ':'],
            normalize: true,
        }
    }
}

/// Per-request knobs for the LLM refinement step. Model/region identity
/// is deliberately vendor-agnostic; the core only forwards these
/// through the injected `LlmClient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmRefinementConfig {
    /// Opaque model/inference-profile identifier forwarded to the
    /// injected LLM client; the core never inspects or validates it.
    pub bedrock_inference_profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub suggestion_validation: SuggestionValidationConfig,
    /// Opt-in pre-pass that derives speaker display names from the
    /// transcript before suggestion-driven speaker remapping.
    pub speaker_identification: bool,
}

impl Default for LlmRefinementConfig {
    fn default() -> Self {
        Self {
            bedrock_inference_profile_id: String::new(),
            additional_context: None,
            max_tokens: 4096,
            temperature: 0.1,
            suggestion_validation: SuggestionValidationConfig::default(),
            speaker_identification: false,
        }
    }
}

/// The full, defaulted configuration tree the core consumes. The core
/// trusts this once parsed; schema validation happens at `from_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub replacement_rules: Vec<ReplacementRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_refinement: Option<LlmRefinementConfig>,
    pub normalization: NormalizationConfig,
    pub captions: CaptionsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            replacement_rules: Vec::new(),
            llm_refinement: None,
            normalization: NormalizationConfig::default(),
            captions: CaptionsConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and default a configuration from JSON. This is the
    /// "declarative schema layer" spec.md calls for at the boundary —
    /// once parsed, the rest of the core trusts it.
    pub fn from_json(json: &str) -> Result<Self, crate::error::RefineError> {
        serde_json::from_str(json).map_err(|e| crate::error::RefineError::InputShape(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = SuggestionValidationConfig::default();
        assert_eq!(cfg.max_word_change_ratio, 0.4);
        assert_eq!(cfg.max_normalized_edit_distance, 0.5);
        assert_eq!(cfg.max_consecutive_changes, 3);
        assert_eq!(cfg.min_words_for_ratio_check, 5);

        let norm = NormalizationConfig::default();
        assert_eq!(norm.max_chars_per_segment, 48);
        assert_eq!(norm.max_words_per_segment, 10);
        assert_eq!(norm.punctuation_chars, vec!['.', ',', '?', '!', ';', ':']);
    }

    #[test]
    fn pipeline_config_parses_partial_json_with_defaults() {
        let json = r#"{"replacementRules": [{"type": "literal", "search": "a", "replacement": "b"}]}"#;
        let cfg = PipelineConfig::from_json(json).unwrap();
        assert_eq!(cfg.replacement_rules.len(), 1);
        // normalization/captions fall back to defaults since they're absent.
        assert_eq!(cfg.normalization.max_chars_per_segment, 48);
        assert!(cfg.captions.generate_vtt);
    }

    #[test]
    fn pipeline_config_round_trips() {
        let cfg = PipelineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = PipelineConfig::from_json(&json).unwrap();
        assert_eq!(parsed.normalization.max_chars_per_segment, 48);
    }
}
