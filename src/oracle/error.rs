use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the selection oracle.
///
/// All variants are recoverable per-attempt: the session retries with
/// reinforced instructions and routes exhaustion to fallback synthesis.
pub enum OracleError {
    /// Upstream completion service failed.
    #[error("oracle provider error: {message}")]
    Provider {
        /// Error message.
        message: String,
    },

    /// Provider returned a response with no text content.
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// Response text was not well-formed structured data, or required
    /// fields were missing.
    #[error("oracle response was malformed: {message}")]
    MalformedResponse {
        /// Parse error detail.
        message: String,
    },

    /// External call exceeded its deadline.
    #[error("oracle call timed out after {seconds}s")]
    Timeout {
        /// Configured timeout.
        seconds: u64,
    },
}
