//! Caption Renderers: shared timestamp/escaping/prefix helpers plus a
//! segment-to-cue builder reused by the VTT and SRT formatters.
//!
//! Grounded on `other_examples/074bdd16_hongkongkiwi-elevenlabs-cli__...
//! -stt.rs`'s `format_srt`/`format_vtt` (hours/minutes/seconds/millis
//! split from a millisecond count, one cue per timed unit), extended
//! per the highlight/filler-cue and speaker-prefix rules the teacher
//! has no equivalent for.

pub mod json;
pub mod srt;
pub mod vtt;

pub use json::render_json;
pub use srt::render_srt;
pub use vtt::render_vtt;

use crate::models::{CaptionsConfig, HighlightStyle, Segment, SpeakerNameMode, Word};

/// One rendered cue: a time span plus its already-escaped/prefixed text.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// `HH:MM:SS.mmm`, milliseconds rounded half-up.
pub fn format_vtt_ts(seconds: f64) -> String {
    let (h, m, s, ms) = split_hms(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// `HH:MM:SS,mmm`, milliseconds rounded half-up.
pub fn format_srt_ts(seconds: f64) -> String {
    let (h, m, s, ms) = split_hms(seconds);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

fn split_hms(seconds: f64) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    (h, m, s, ms)
}

/// Replace `&<>` with their named entities. Applied to every emitted
/// text slice.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn highlight_tag(style: HighlightStyle) -> &'static str {
    style.tag()
}

/// `""` for `never`; `"{current}: "` for `always` when `current` is
/// non-empty; for `when-changes`, only when `current` differs from
/// `previous` or `previous` is `None`.
pub fn speaker_prefix(current: &str, previous: Option<&str>, mode: SpeakerNameMode) -> String {
    match mode {
        SpeakerNameMode::Never => String::new(),
        SpeakerNameMode::Always => {
            if current.is_empty() {
                String::new()
            } else {
                format!("{}: ", current)
            }
        }
        SpeakerNameMode::WhenChanges => {
            if previous.is_none_or(|p| p != current) {
                format!("{}: ", current)
            } else {
                String::new()
            }
        }
    }
}

fn render_highlighted_line(words: &[&str], highlight_idx: usize, style: HighlightStyle) -> String {
    let tag = highlight_tag(style);
    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let escaped = escape_html(w);
            if i == highlight_idx {
                format!("<{0}>{1}</{0}>", tag, escaped)
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fill missing per-word timing by evenly dividing `[seg_start,
/// seg_end]` across `words`. Operates on a local clone; never mutates
/// the transcript, keeping caption generation a pure function.
fn distribute_missing_timing(words: &mut [Word], seg_start: f64, seg_end: f64) {
    let n = words.len();
    if n == 0 {
        return;
    }
    let slice = (seg_end - seg_start) / n as f64;
    for (i, w) in words.iter_mut().enumerate() {
        if !w.has_valid_timing() {
            w.start = Some(seg_start + i as f64 * slice);
            w.end = Some(seg_start + (i + 1) as f64 * slice);
        }
    }
}

fn basic_cue(segment: &Segment, current_speaker: &str, previous_speaker: Option<&str>, config: &CaptionsConfig) -> Cue {
    let prefix = speaker_prefix(current_speaker, previous_speaker, config.include_speaker_names);
    Cue {
        start: segment.start,
        end: segment.end,
        text: format!("{}{}", prefix, escape_html(segment.text.trim())),
    }
}

fn highlighted_cues(segment: &Segment, current_speaker: &str, previous_speaker: Option<&str>, config: &CaptionsConfig) -> Vec<Cue> {
    let mut words = segment.words.clone();
    if segment.has_valid_envelope() {
        distribute_missing_timing(&mut words, segment.start, segment.end);
    }

    let Some(_) = words.iter().position(|w| w.has_valid_timing()) else {
        return Vec::new();
    };

    let prefix = speaker_prefix(current_speaker, previous_speaker, config.include_speaker_names);
    let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
    let filler_text = format!("{}{}", prefix, escape_html(segment.text.trim()));

    let mut cues = Vec::new();
    let mut last_end: Option<f64> = None;

    for (i, w) in words.iter().enumerate() {
        if !w.has_valid_timing() {
            continue;
        }
        let start = w.start.unwrap();
        let end = w.end.unwrap();

        if let Some(last) = last_end {
            if start > last {
                cues.push(Cue {
                    start: last,
                    end: start,
                    text: filler_text.clone(),
                });
            }
        }

        cues.push(Cue {
            start,
            end,
            text: format!("{}{}", prefix, render_highlighted_line(&texts, i, config.highlight_with)),
        });

        last_end = Some(end);
    }

    if segment.has_valid_envelope() {
        if let Some(last) = last_end {
            if segment.end > last {
                cues.push(Cue {
                    start: last,
                    end: segment.end,
                    text: filler_text,
                });
            }
        }
    }

    cues
}

/// Build the full cue list for `segments`, tracking the previous
/// speaker across (not within) segments.
pub(crate) fn build_cues(segments: &[Segment], config: &CaptionsConfig) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut previous_speaker: Option<String> = None;

    for segment in segments {
        let current_speaker = segment.effective_speaker();
        let use_highlight = config.highlight_words && !segment.words.is_empty();

        if use_highlight {
            cues.extend(highlighted_cues(segment, &current_speaker, previous_speaker.as_deref(), config));
        } else {
            cues.push(basic_cue(segment, &current_speaker, previous_speaker.as_deref(), config));
        }

        previous_speaker = Some(current_speaker);
    }

    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_round_half_up() {
        assert_eq!(format_vtt_ts(2.5), "00:00:02.500");
        assert_eq!(format_srt_ts(0.0005), "00:00:00,001");
        assert_eq!(format_vtt_ts(3661.999), "01:01:01.999");
    }

    #[test]
    fn escape_html_covers_three_entities() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn speaker_prefix_when_changes_fires_on_first_segment() {
        let prefix = speaker_prefix("Alice", None, SpeakerNameMode::WhenChanges);
        assert_eq!(prefix, "Alice: ");
        let prefix2 = speaker_prefix("Alice", Some("Alice"), SpeakerNameMode::WhenChanges);
        assert_eq!(prefix2, "");
    }

    #[test]
    fn speaker_prefix_never_is_always_empty() {
        assert_eq!(speaker_prefix("Alice", None, SpeakerNameMode::Never), "");
    }
}
