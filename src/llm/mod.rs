pub mod client;
pub mod prompts;
pub mod refine;
pub mod speaker_id;

pub use client::{AnthropicClientConfig, AnthropicLlmClient, FakeLlmClient, LlmClient};
pub use prompts::{build_refinement_prompt, serialize_indexed_lines, SYSTEM_PROMPT};
pub use refine::{refine_transcript, AppliedUpdate, IgnoredSuggestion, RefinementStats};
pub use speaker_id::identify_speakers;
