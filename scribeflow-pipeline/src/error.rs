/// Pipeline error classification
///
/// Every stage failure is mapped to exactly one of these variants at the
/// orchestrator boundary. The variant — not an exception hierarchy — is what
/// decides whether a run aborts: all variants here are fatal, and the one
/// degradable stage (image fetch) never produces an error at all, only a
/// logged warning and empty output.

use scribeflow_shared::store::StoreError;

/// Fatal pipeline failure, tagged by the stage class that produced it
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// URL validation rejected the request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Content extraction failed (fetch error, bad status, unusable body)
    #[error("Content extraction failed: {0}")]
    ExtractionFailed(String),

    /// Cleaning left no usable text
    #[error("No usable content found after cleaning")]
    NoContent,

    /// Keyword extraction, topic analysis, or prompt construction failed
    #[error("Content analysis failed: {0}")]
    AnalysisFailed(String),

    /// The language model call failed
    #[error("Article generation failed: {0}")]
    GenerationFailed(String),

    /// SEO post-processing failed
    #[error("Post-processing failed: {0}")]
    PostProcessFailed(String),

    /// Persisting the assembled artifact failed
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages_are_short_and_generic() {
        let err = PipelineError::InvalidInput("scheme must be http or https".to_string());
        assert_eq!(err.to_string(), "Invalid input: scheme must be http or https");

        assert_eq!(
            PipelineError::NoContent.to_string(),
            "No usable content found after cleaning"
        );
    }
}
