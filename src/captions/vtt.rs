use crate::captions::{build_cues, format_vtt_ts};
use crate::models::{CaptionsConfig, Segment};

/// Render a WebVTT document: a `WEBVTT` header followed by blank-line-
/// separated cues, each `{start} --> {end}\n{text}`.
pub fn render_vtt(segments: &[Segment], config: &CaptionsConfig) -> String {
    let cues = build_cues(segments, config);

    let mut out = String::from("WEBVTT\n");
    if cues.is_empty() {
        return out;
    }
    out.push('\n');

    let rendered: Vec<String> = cues
        .iter()
        .map(|cue| format!("{} --> {}\n{}", format_vtt_ts(cue.start), format_vtt_ts(cue.end), cue.text))
        .collect();

    out.push_str(&rendered.join("\n\n"));
    out.push('\n');
    out
}
