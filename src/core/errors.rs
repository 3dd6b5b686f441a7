//! Error types for boundary resolution.
//!
//! This module defines the errors that can occur while resolving letter
//! boundaries, along with utility constructors for creating them with
//! appropriate context. Local failures such as a merge candidate failing a
//! width or distance gate are never errors; they are simply excluded from
//! the candidate set. Errors are reserved for conditions the caller must
//! not silently continue from, such as geometrically impossible training
//! annotations.

use thiserror::Error;

/// Errors that can occur during boundary resolution.
#[derive(Error, Debug)]
pub enum BoundaryError {
    /// A ground-truth annotation on a shape cannot be reconciled with its
    /// geometry: more annotated letters than annotated split points can
    /// produce, an unresolvable mid-string `|` marker, or a continuation
    /// marker in a position the annotation format does not allow.
    ///
    /// This aborts processing of the affected shape; continuing would
    /// produce corrupted boundaries.
    #[error("invalid annotation on shape {shape}: {message}")]
    InvalidAnnotation {
        /// A short description of the offending shape (its rectangle).
        shape: String,
        /// What was wrong with the annotation.
        message: String,
    },

    /// Input that violates a structural precondition, such as a rectangle
    /// with `right < left`.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },
}

impl BoundaryError {
    /// Creates an error for an annotation that cannot be applied to the
    /// shape carrying it.
    pub fn invalid_annotation(shape: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::InvalidAnnotation {
            shape: shape.to_string(),
            message: message.into(),
        }
    }

    /// Creates an error for input violating a structural precondition.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Convenient result alias for boundary-resolution operations.
pub type BoundaryResult<T> = Result<T, BoundaryError>;
