//! Error types for queries and containers.
//!
//! Every engine-raised failure is a [`QueryError`]. Errors coming from
//! caller-supplied closures are never wrapped: closures are infallible Rust
//! functions and a panic inside one unwinds through the pipeline untouched.
//!
//! Errors are grouped into a small taxonomy, exposed through
//! [`QueryError::kind`], so callers can match on the class of failure
//! without depending on individual messages.
//!
//! # Examples
//!
//! ```rust
//! use quarry::{ErrorKind, Query};
//!
//! let query = Query::of([1, 2, 3]);
//! query.close();
//!
//! let error = query.to_list().unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::IllegalState);
//! assert_eq!(error.to_string(), "Query object already consumed");
//! ```

use std::error::Error;
use std::fmt;

/// The class of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value was requested from an empty container.
    EmptyValue,
    /// An absent value was passed where a present one is required.
    NilInput,
    /// The operation is not valid in the current state, such as reusing a
    /// consumed query or inserting a duplicate key.
    IllegalState,
    /// A value does not have the shape an operation needs.
    UnsupportedShape,
    /// An element has the wrong type for an operation.
    TypeMismatch,
    /// A count argument was negative.
    NegativeCount,
    /// An argument is outside the domain of the operation.
    InvalidArgument,
}

/// Errors raised by the query engine and the containers.
///
/// # Examples
///
/// ```rust
/// use quarry::{ErrorKind, QueryError};
///
/// let error = QueryError::NegativeCount { operation: "Skip" };
/// assert_eq!(error.kind(), ErrorKind::NegativeCount);
/// assert_eq!(format!("{error}"), "Skip count cannot be negative");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A value was taken out of an empty `Optional`.
    #[error("Optional is empty")]
    EmptyValue,

    /// An absent value was given to a strict constructor.
    #[error("{0}")]
    NilInput(&'static str),

    /// A terminal operation ran on a query whose lineage is already consumed.
    #[error("Query object already consumed")]
    AlreadyConsumed,

    /// A key was produced twice while building a map and no merger was given.
    #[error("Key {key} already exists")]
    DuplicateKey {
        /// Debug rendering of the offending key.
        key: String,
    },

    /// A collector produced a value that is not a key/value pair.
    #[error("Cannot create dict items from '{type_name}' type")]
    UnsupportedShape {
        /// Name of the type that was produced.
        type_name: String,
    },

    /// An element had the wrong type for the operation.
    #[error("{0}")]
    TypeMismatch(String),

    /// A count argument was negative.
    #[error("{operation} count cannot be negative")]
    NegativeCount {
        /// The operation that rejected the count, capitalised.
        operation: &'static str,
    },

    /// A range was requested with a step of zero.
    #[error("Range step cannot be zero")]
    ZeroStep,
}

impl QueryError {
    /// Returns the taxonomy class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyValue => ErrorKind::EmptyValue,
            Self::NilInput(_) => ErrorKind::NilInput,
            Self::AlreadyConsumed | Self::DuplicateKey { .. } => ErrorKind::IllegalState,
            Self::UnsupportedShape { .. } => ErrorKind::UnsupportedShape,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::NegativeCount { .. } => ErrorKind::NegativeCount,
            Self::ZeroStep => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn duplicate_key<K: fmt::Debug>(key: &K) -> Self {
        Self::DuplicateKey {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn not_iterable(type_name: &str) -> Self {
        Self::TypeMismatch(format!("'{type_name}' object is not iterable"))
    }

    pub(crate) fn non_numeric() -> Self {
        Self::TypeMismatch("Cannot apply sum on non-number elements".to_string())
    }
}

/// An error produced while handling another error, keeping the original as
/// its cause.
///
/// Returned by [`Outcome::or_else_raise_with`](crate::Outcome::or_else_raise_with).
///
/// # Examples
///
/// ```rust
/// use quarry::{ChainedError, QueryError};
/// use std::error::Error;
///
/// let chained = ChainedError::new("all gone sideways", QueryError::EmptyValue);
/// assert_eq!(chained.to_string(), "all gone sideways");
/// assert_eq!(chained.source().unwrap().to_string(), "Optional is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedError<E, C> {
    error: E,
    cause: C,
}

impl<E, C> ChainedError<E, C> {
    /// Pairs an error with the error that caused it.
    pub const fn new(error: E, cause: C) -> Self {
        Self { error, cause }
    }

    /// Returns the new error.
    pub const fn error(&self) -> &E {
        &self.error
    }

    /// Returns the original error.
    pub const fn cause(&self) -> &C {
        &self.cause
    }

    /// Splits into the new error and its cause.
    pub fn into_parts(self) -> (E, C) {
        (self.error, self.cause)
    }
}

impl<E: fmt::Display, C> fmt::Display for ChainedError<E, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.error)
    }
}

impl<E, C> Error for ChainedError<E, C>
where
    E: fmt::Debug + fmt::Display,
    C: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}
