pub mod input;
pub mod output;

pub use input::{parse_transcript_file, parse_transcript_json};
pub use output::{write_transcript_json, CaptionBundle};
