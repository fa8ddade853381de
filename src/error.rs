//! Error types shared by the instance and the annealing runner.

use thiserror::Error;

/// Errors reported by instance construction and annealing runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Clauses need at least two literals.
    #[error("clause arity must be at least 2, got {k}")]
    InvalidArity { k: usize },

    /// Not enough variables to fill a clause with distinct literals.
    #[error("cannot draw {k} distinct variables per clause from {n} variables")]
    TooFewVariables { n: usize, k: usize },

    /// An explicitly supplied clause table is inconsistent.
    #[error("malformed clause {clause}: {reason}")]
    MalformedClause { clause: usize, reason: String },

    /// An explicitly supplied assignment has the wrong length or values.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Rejected annealing configuration.
    #[error("invalid annealing configuration: {0}")]
    InvalidConfig(String),

    /// The incremental delta disagreed with full recomputation.
    #[error(
        "incremental delta cost {incremental} for move {mv} differs from recomputed delta {recomputed}"
    )]
    InternalInconsistency {
        mv: String,
        incremental: isize,
        recomputed: isize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
