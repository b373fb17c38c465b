//! Error types for the collection crate.

use thiserror::Error;

/// Errors raised when a caller violates a collection contract.
///
/// None of these are transient: they are reported at the call that
/// caused them and never retried.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Comparison operator string is not one of the supported operators.
    #[error("invalid comparison operator: '{0}'")]
    InvalidOperator(String),

    /// `then_by` was called on a collection with no sort chain.
    #[error("then_by requires a collection produced by sort_by or then_by")]
    UnchainedSort,

    /// A `*_or_fail` lookup found no matching item.
    #[error("no item matched the given predicate")]
    ItemNotFound,

    /// A lazy collection was built from a source that cannot be restarted.
    #[error("lazy collections need a restartable source, not a single-use iterator")]
    InvalidSource,

    /// No extension method with this name is registered for the target type.
    #[error("no extension method '{name}' registered for {target}")]
    UnknownMethod { target: &'static str, name: String },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// JSON encoding failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
