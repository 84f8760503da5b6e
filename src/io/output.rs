use std::path::Path;

use anyhow::{Context, Result};

use crate::captions::{render_json, render_srt, render_vtt};
use crate::models::{CaptionsConfig, Transcript};

/// The caption documents produced for one transcript, one field per
/// format spec.md's `CaptionsConfig` can enable.
#[derive(Debug, Clone, Default)]
pub struct CaptionBundle {
    pub vtt: Option<String>,
    pub srt: Option<String>,
    pub json: Option<String>,
}

impl CaptionBundle {
    /// Render whichever formats `config` enables from the final
    /// (post-normalization) segments.
    pub fn render(transcript: &Transcript, config: &CaptionsConfig) -> Self {
        Self {
            vtt: config.generate_vtt.then(|| render_vtt(&transcript.segments, config)),
            srt: config.generate_srt.then(|| render_srt(&transcript.segments, config)),
            json: config.generate_json.then(|| render_json(&transcript.segments)),
        }
    }

    /// Write each enabled document to `{stem}.vtt` / `{stem}.srt` /
    /// `{stem}.captions.json` beside `stem`.
    pub fn write_to_stem(&self, stem: &Path) -> Result<()> {
        if let Some(vtt) = &self.vtt {
            write_file(&with_extension(stem, "vtt"), vtt)?;
        }
        if let Some(srt) = &self.srt {
            write_file(&with_extension(stem, "srt"), srt)?;
        }
        if let Some(json) = &self.json {
            write_file(&with_extension(stem, "captions.json"), json)?;
        }
        Ok(())
    }
}

fn with_extension(stem: &Path, ext: &str) -> std::path::PathBuf {
    let mut path = stem.to_path_buf();
    path.set_extension(ext);
    path
}

/// Serialize the refined transcript as pretty JSON.
pub fn write_transcript_json(transcript: &Transcript, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, transcript).context("Failed to write transcript JSON")?;
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;

    fn sample_transcript() -> Transcript {
        Transcript {
            segments: vec![Segment {
                start: 0.0,
                end: 2.5,
                text: "Hello, welcome to the podcast.".into(),
                speaker: Some("Luciano".into()),
                words: vec![],
            }],
        }
    }

    #[test]
    fn render_respects_disabled_formats() {
        let transcript = sample_transcript();
        let config = CaptionsConfig {
            generate_vtt: true,
            generate_srt: false,
            generate_json: false,
            ..CaptionsConfig::default()
        };
        let bundle = CaptionBundle::render(&transcript, &config);
        assert!(bundle.vtt.is_some());
        assert!(bundle.srt.is_none());
        assert!(bundle.json.is_none());
    }

    #[test]
    fn write_to_stem_creates_expected_files() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("episode.json");
        let transcript = sample_transcript();
        let bundle = CaptionBundle::render(&transcript, &CaptionsConfig::default());
        bundle.write_to_stem(&stem).unwrap();

        assert!(dir.path().join("episode.vtt").exists());
        assert!(dir.path().join("episode.srt").exists());
        assert!(dir.path().join("episode.captions.json").exists());
    }

    #[test]
    fn write_transcript_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refined.json");
        let transcript = sample_transcript();
        write_transcript_json(&transcript, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Transcript = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.segments.len(), 1);
    }
}
