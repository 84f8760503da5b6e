use crate::captions::{build_cues, format_srt_ts};
use crate::models::{CaptionsConfig, Segment};

/// Render an SRT document: no header, each cue prefixed by a
/// monotonically increasing 1-based index line, comma timestamps.
pub fn render_srt(segments: &[Segment], config: &CaptionsConfig) -> String {
    let cues = build_cues(segments, config);
    if cues.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = cues
        .iter()
        .enumerate()
        .map(|(i, cue)| {
            format!(
                "{}\n{} --> {}\n{}",
                i + 1,
                format_srt_ts(cue.start),
                format_srt_ts(cue.end),
                cue.text
            )
        })
        .collect();

    let mut out = rendered.join("\n\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_numbering_matches_expected_transcript() {
        let segments = vec![
            Segment {
                start: 0.0,
                end: 2.5,
                text: "Hello, welcome to the podcast.".into(),
                speaker: Some("Luciano".into()),
                words: vec![],
            },
            Segment {
                start: 2.5,
                end: 5.0,
                text: "Thanks for having me!".into(),
                speaker: Some("Eoin".into()),
                words: vec![],
            },
        ];
        let srt = render_srt(&segments, &CaptionsConfig::default());
        let expected = "1\n00:00:00,000 --> 00:00:02,500\nLuciano: Hello, welcome to the podcast.\n\n2\n00:00:02,500 --> 00:00:05,000\nEoin: Thanks for having me!\n";
        assert_eq!(srt, expected);
    }
}
