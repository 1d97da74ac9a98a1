//! Error types for designer operations.

use thiserror::Error;

use crate::markup::MarkupError;

/// Result type for designer operations.
pub type DesignerResult<T> = Result<T, DesignerError>;

/// Errors that can occur in designer operations.
///
/// Element-level mutations never produce these: an unknown element id is a
/// silent no-op. Errors are reserved for whole-document conversions.
#[derive(Debug, Error)]
pub enum DesignerError {
    /// The document violates a structural invariant.
    #[error("Document integrity violated: {0}")]
    Integrity(String),

    /// A tag or kind name outside the supported widget set.
    #[error("Unknown element kind: {0}")]
    UnknownKind(String),

    /// Markup could not be decoded in strict mode.
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// A project snapshot written by a newer format version.
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),

    /// Project snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
