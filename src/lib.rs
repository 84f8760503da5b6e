pub mod captions;
pub mod diff;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod numerics;
pub mod pipeline;
pub mod reconcile;
pub mod replace;
pub mod validation;

pub use error::RefineError;
pub use io::{parse_transcript_file, parse_transcript_json, write_transcript_json, CaptionBundle};
pub use llm::{AnthropicClientConfig, AnthropicLlmClient, FakeLlmClient, LlmClient};
pub use models::{PipelineConfig, Segment, Transcript, Word};
pub use pipeline::{run_pipeline, PipelineStats};
