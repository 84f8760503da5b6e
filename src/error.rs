use thiserror::Error;

/// Typed errors surfaced by the refinement core. Library-internal
/// failures use this enum; the CLI front door wraps them in `anyhow`.
#[derive(Debug, Error)]
pub enum RefineError {
    /// Transcript or configuration failed schema validation. Fails fast
    /// before any pipeline step runs.
    #[error("input shape error: {0}")]
    InputShape(String),

    /// The injected LLM invocation capability returned an error instead
    /// of a reply string. Non-fatal to the overall pipeline: the
    /// refinement step produces no changes and the caller continues.
    #[error("LLM transport error: {0}")]
    LlmTransport(String),

    /// The LLM reply could not be parsed to the expected JSON shape.
    /// Non-fatal for the same reason as `LlmTransport`.
    #[error("LLM reply parse error: {0}")]
    LlmParse(String),
}
