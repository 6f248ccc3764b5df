//! error types for access trees and span programs

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A gate violates `1 <= threshold <= children`, a share id repeats,
    /// or a gate's fan-out wraps the field characteristic.
    #[error("malformed access tree: {reason}")]
    MalformedTree { reason: String },

    /// The presented rows cannot express the secret coordinate.
    #[error("share set does not satisfy the access structure")]
    NoSatisfyingSet,

    #[error("unsupported policy node: {0}")]
    UnsupportedPolicyKind(&'static str),

    // === lagrange errors ===
    #[error("empty interpolation set")]
    EmptySet,

    #[error("duplicate interpolation index: {0}")]
    DuplicateIndex(u32),

    #[error("index {0} is not in the interpolation set")]
    IndexNotInSet(u32),

    #[error("division by zero in field arithmetic")]
    DivisionByZero,

    // === policy parsing ===
    #[error("policy parse error at {position}: {message}")]
    PolicyParse { position: usize, message: String },
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::PolicyParse {
            position,
            message: message.into(),
        }
    }
}
