//! Core capability errors (parsing, validation).
//!
//! These are bounded and stable: core errors represent domain/refusal states,
//! not library implementation details.

use thiserror::Error;

/// Invalid identifier.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("vehicle id `{raw}` is invalid: {reason}")]
    Vehicle { raw: String, reason: String },
    #[error("user email `{raw}` is invalid: {reason}")]
    UserEmail { raw: String, reason: String },
}

/// Invalid category filter string.
#[derive(Debug, Error, Clone)]
#[error("category filter `{raw}` is invalid")]
pub struct InvalidFilter {
    pub raw: String,
}

/// Core domain error.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilter),
}
