//! Error types for the clip engine.

use thiserror::Error;

/// Errors surfaced by evaluation, authoring, and document loading.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ClipError {
    /// Evaluation or authoring attempted on a structurally invalid node
    /// (leaf with fewer than two keyframes, timeline with no slots, index
    /// out of range). Prevented by validating edits, not recovered at
    /// evaluation time.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A persisted record could not be turned into a node. `path` locates
    /// the offending record inside the document tree.
    #[error("deserialization error at {path}: {reason}")]
    Deserialization { path: String, reason: String },

    /// The injected resolver could not map a persisted target path to a
    /// live handle. Leaf nodes treat this as non-fatal and evaluate
    /// without applying their output.
    #[error("cannot resolve target '{path}'")]
    TargetResolution { path: String },
}

impl ClipError {
    #[inline]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub(crate) fn at(path: &str, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
