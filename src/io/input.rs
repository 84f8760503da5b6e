use std::path::Path;

use anyhow::{Context, Result};

use crate::error::RefineError;
use crate::models::Transcript;

/// Parse a raw transcript JSON file into a `Transcript`.
pub fn parse_transcript_file(path: &Path) -> Result<Transcript> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_transcript_json(&content).context("Failed to parse input transcript")
}

/// Parse a raw transcript JSON string into a `Transcript`, applying the
/// schema-validation boundary spec.md §7 calls for: malformed shape
/// fails fast with `InputShape` before any pipeline step runs.
pub fn parse_transcript_json(json: &str) -> Result<Transcript, RefineError> {
    let transcript: Transcript =
        serde_json::from_str(json).map_err(|e| RefineError::InputShape(e.to_string()))?;
    validate_transcript_shape(&transcript)?;
    Ok(transcript)
}

fn validate_transcript_shape(transcript: &Transcript) -> Result<(), RefineError> {
    for (i, segment) in transcript.segments.iter().enumerate() {
        for word in &segment.words {
            if word.text.is_empty() {
                return Err(RefineError::InputShape(format!(
                    "segment {} carries an empty-text word",
                    i
                )));
            }
            if let (Some(start), Some(end)) = (word.start, word.end) {
                if end < start {
                    return Err(RefineError::InputShape(format!(
                        "segment {} carries a word with end < start",
                        i
                    )));
                }
            }
        }
    }
    Ok(())
}
