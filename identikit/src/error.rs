//! Error taxonomy for registration, resolution, and per-call operations.
use thiserror::Error;

use crate::record::TypeTag;

/// Errors raised by the per-type operations (`equals`, `hash_code`,
/// `render`, `diff`).
#[derive(Debug, Error)]
pub enum KitError {
    /// An operation's required instance argument was null.
    #[error("{0} must not be null")]
    NullArgument(&'static str),

    /// Two types were compared that are not compatible for equality.
    #[error("{label} has type {actual} which is not compatible for equality with {expected}")]
    Incompatible {
        label: &'static str,
        actual: TypeTag,
        expected: TypeTag,
    },

    /// A caller-supplied accessor failed. The underlying failure is
    /// propagated, never swallowed.
    #[error("accessor for property '{property}' of type {tag} failed: {source}")]
    Accessor {
        property: String,
        tag: TypeTag,
        source: AccessError,
    },

    /// Lazy resolution of a participating type failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type KitResult<T> = Result<T, KitError>;

/// Fatal configuration errors raised while resolving a type's property set.
///
/// These abort bundle construction entirely; no partial result is cached,
/// and the next request retries from scratch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("type {0} has not been registered")]
    UnknownType(TypeTag),

    #[error("type {0} is already registered")]
    DuplicateType(TypeTag),

    #[error("duplicate property '{name}' declared on type {tag}")]
    DuplicateProperty { tag: TypeTag, name: String },

    #[error("no accessor registered for property '{name}' of type {tag}")]
    MissingAccessor { tag: TypeTag, name: String },

    #[error("property '{name}' of type {tag} participates in hashing but not equality")]
    HashOutsideEquals { tag: TypeTag, name: String },

    #[error("parent chain of type {0} contains a cycle")]
    ParentCycle(TypeTag),
}

/// Failure of a single accessor invocation.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The instance handed to a typed accessor was not of the expected
    /// concrete type.
    #[error("instance of type {actual} cannot be read as {expected}")]
    WrongInstanceType {
        expected: &'static str,
        actual: TypeTag,
    },

    /// A fallible accessor returned an error of its own.
    #[error(transparent)]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}
