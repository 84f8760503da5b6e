use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::Segment;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSegment {
    speaker_label: String,
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Serialize)]
struct JsonBundle {
    speakers: BTreeMap<String, String>,
    segments: Vec<JsonSegment>,
}

/// Collect every speaker label seen at segment or word level, sorted
/// lexicographically; seeds `"SPEAKER_00"` when the transcript carries
/// no speaker information at all.
fn collect_speaker_labels(segments: &[Segment]) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();
    for segment in segments {
        if let Some(speaker) = &segment.speaker {
            labels.insert(speaker.clone());
        }
        for word in &segment.words {
            if let Some(speaker) = &word.speaker {
                labels.insert(speaker.clone());
            }
        }
    }
    if labels.is_empty() {
        labels.insert("SPEAKER_00".to_string());
    }
    labels
}

/// Render the simplified JSON caption bundle: a lexicographically
/// ordered `spk_N` mapping plus one entry per segment, pretty-printed
/// with 2-space indent.
pub fn render_json(segments: &[Segment]) -> String {
    let labels = collect_speaker_labels(segments);
    let label_to_key: BTreeMap<String, String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), format!("spk_{}", i)))
        .collect();
    let speakers: BTreeMap<String, String> = label_to_key
        .iter()
        .map(|(label, key)| (key.clone(), label.clone()))
        .collect();

    let json_segments = segments
        .iter()
        .map(|segment| {
            let label = segment.effective_speaker();
            let key = label_to_key.get(&label).cloned().unwrap_or_else(|| "spk_0".to_string());
            JsonSegment {
                speaker_label: key,
                start: segment.start,
                end: segment.end,
                text: segment.text.trim().to_string(),
            }
        })
        .collect();

    let bundle = JsonBundle {
        speakers,
        segments: json_segments,
    };

    serde_json::to_string_pretty(&bundle).unwrap_or_else(|_| "{}".to_string())
}
