//! Error types for the sequin crate.

use thiserror::Error;

/// Errors raised by terminal operators and by the dynamic surface.
///
/// Deferred operators never fail on their own: an error only surfaces when a
/// terminal operator reaches the element that violates its contract.
#[derive(Debug, Error)]
pub enum SeqError {
    /// A value offered as a sequence source cannot be iterated.
    #[error("source is not iterable: {kind}")]
    InvalidSource { kind: &'static str },

    /// A generator was expected but the argument is not callable.
    #[error("generator is not a function: argument {position} of '{binding}'")]
    InvalidGenerator {
        binding: &'static str,
        position: usize,
    },

    /// The operator needs at least one qualifying element and found none.
    #[error("sequence contains no elements")]
    EmptySequence,

    /// `single` found a second qualifying element.
    #[error("sequence contains more than one element")]
    MultipleMatches,

    /// `to_map` produced the same key twice.
    #[error("duplicate key detected at position {position}")]
    DuplicateKey { position: usize },

    /// Object conversion met a key that does not serialize to a string.
    #[error("key type is not string: {key}")]
    NonStringKey { key: String },

    /// A dynamic binding was invoked with arguments of the wrong shape.
    #[error("invalid argument for '{binding}': {reason}")]
    InvalidArgument {
        binding: &'static str,
        reason: String,
    },

    /// No dynamic binding carries this name.
    #[error("unknown binding '{0}'")]
    UnknownBinding(String),

    /// A value could not be converted while building an object.
    #[error("value conversion failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for sequin operations.
pub type Result<T> = std::result::Result<T, SeqError>;
