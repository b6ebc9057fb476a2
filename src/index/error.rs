use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by similarity index operations.
///
/// All of these are recoverable from the session's point of view: retrieval
/// failures relax filters and ultimately route to fallback synthesis.
pub enum IndexError {
    /// Could not connect to the qdrant endpoint.
    #[error("failed to connect to qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection creation or existence check failed.
    #[error("failed to ensure collection '{collection}': {message}")]
    CreateCollectionFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Upsert failed while seeding.
    #[error("failed to upsert points to '{collection}': {message}")]
    UpsertFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Similarity search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Metadata retrieval failed.
    #[error("failed to retrieve metadata from '{collection}': {message}")]
    RetrieveFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// External call exceeded its deadline.
    #[error("index call timed out after {seconds}s")]
    Timeout {
        /// Configured timeout.
        seconds: u64,
    },
}
