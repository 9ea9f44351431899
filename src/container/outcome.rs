//! Outcome - a disjoint success/failure container.
//!
//! `Outcome<T, E>` holds exactly one of a success value or a failure error.
//! Unlike `std::result::Result` it is meant to be passed around as a value:
//! it offers `Optional`-returning projections, side-effecting handlers and
//! an error-chaining escape hatch back into `Result`.
//!
//! # Examples
//!
//! ```rust
//! use quarry::Outcome;
//!
//! let success: Outcome<i32, String> = Outcome::success(42);
//! assert_eq!(success.map_success(|x| x + 3).get(), Ok(45));
//!
//! let failure: Outcome<i32, String> = Outcome::failure("boom".to_string());
//! assert!(failure.map_success(|x| x + 3).is_empty());
//! ```

use std::fmt;

use crate::container::Optional;
use crate::error::ChainedError;

/// Either a success value or a failure error, never both and never neither.
///
/// Equality is only meaningful between two successes: two successes are
/// equal when their values are, and any comparison that involves a failure
/// is `false`. For that reason `Outcome` implements `PartialEq` but not `Eq`.
///
/// # Examples
///
/// ```rust
/// use quarry::Outcome;
///
/// let one: Outcome<i32, &str> = Outcome::success(1);
/// let failed: Outcome<i32, &str> = Outcome::failure("nope");
///
/// assert_eq!(one, Outcome::success(1));
/// assert_ne!(failed, Outcome::failure("nope"));
/// ```
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<T, E> {
    /// The computation succeeded with a value.
    Success(T),
    /// The computation failed with an error.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a successful outcome.
    #[inline]
    pub const fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Creates a failed outcome.
    #[inline]
    pub const fn failure(error: E) -> Self {
        Self::Failure(error)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns `true` if this outcome holds a value.
    #[inline]
    pub const fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this outcome holds an error.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns a reference to the value, if successful.
    #[inline]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns a reference to the error, if failed.
    #[inline]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    // =========================================================================
    // Projections
    // =========================================================================

    /// Maps the success value into an `Optional`; a failure gives an empty one
    /// and `function` is never invoked.
    pub fn map_success<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Optional::of(function(value)),
            Self::Failure(_) => Optional::empty(),
        }
    }

    /// Like [`map_success`](Self::map_success) for functions that may yield no value.
    pub fn map_success_nullable<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        match self {
            Self::Success(value) => Optional::of_nullable(function(value)),
            Self::Failure(_) => Optional::empty(),
        }
    }

    /// Maps the failure error into an `Optional`; a success gives an empty one.
    pub fn map_failure<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Success(_) => Optional::empty(),
            Self::Failure(error) => Optional::of(function(error)),
        }
    }

    /// Like [`map_failure`](Self::map_failure) for functions that may yield no value.
    pub fn map_failure_nullable<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(E) -> Option<U>,
    {
        match self {
            Self::Success(_) => Optional::empty(),
            Self::Failure(error) => Optional::of_nullable(function(error)),
        }
    }

    /// Eliminates the outcome by applying exactly one of two functions and
    /// returning its result unwrapped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Outcome;
    ///
    /// let failure: Outcome<i32, &str> = Outcome::failure("bad");
    /// let text = failure.fold(|x| x.to_string(), |e| format!("error: {e}"));
    /// assert_eq!(text, "error: bad");
    /// ```
    pub fn fold<R, F, G>(self, success_function: F, failure_function: G) -> R
    where
        F: FnOnce(T) -> R,
        G: FnOnce(E) -> R,
    {
        match self {
            Self::Success(value) => success_function(value),
            Self::Failure(error) => failure_function(error),
        }
    }

    // =========================================================================
    // Side Effects
    // =========================================================================

    /// Calls `consumer` with the value if successful.
    pub fn if_success<F>(&self, consumer: F)
    where
        F: FnOnce(&T),
    {
        if let Self::Success(value) = self {
            consumer(value);
        }
    }

    /// Calls `consumer` with the error if failed.
    pub fn if_failure<F>(&self, consumer: F)
    where
        F: FnOnce(&E),
    {
        if let Self::Failure(error) = self {
            consumer(error);
        }
    }

    /// Hands the value or the error to the matching handler. Exactly one
    /// handler runs.
    pub fn handle<F, G>(self, success_handler: F, failure_handler: G)
    where
        F: FnOnce(T),
        G: FnOnce(E),
    {
        match self {
            Self::Success(value) => success_handler(value),
            Self::Failure(error) => failure_handler(error),
        }
    }

    // =========================================================================
    // Fallbacks
    // =========================================================================

    /// Returns the value, or `other` on failure.
    pub fn or_else(self, other: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => other,
        }
    }

    /// Returns the value, or the result of `supplier` on failure.
    pub fn or_else_get<F>(self, supplier: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => supplier(),
        }
    }

    /// Returns the value, or raises the stored error.
    ///
    /// # Errors
    ///
    /// Returns the stored error when this outcome is a failure.
    pub fn or_else_raise(self) -> Result<T, E> {
        self.into_result()
    }

    /// Returns the value, or raises an error derived from the stored one.
    ///
    /// The stored error is kept as the cause of the new one.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainedError`] of the transformed error and the original
    /// error when this outcome is a failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{Outcome, QueryError};
    /// use std::error::Error;
    ///
    /// let failure: Outcome<i32, QueryError> = Outcome::failure(QueryError::EmptyValue);
    /// let error = failure
    ///     .or_else_raise_with(|_| "all gone sideways")
    ///     .unwrap_err();
    ///
    /// assert_eq!(error.to_string(), "all gone sideways");
    /// assert_eq!(error.source().unwrap().to_string(), "Optional is empty");
    /// ```
    pub fn or_else_raise_with<E2, F>(self, transform: F) -> Result<T, ChainedError<E2, E>>
    where
        F: FnOnce(&E) -> E2,
    {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(ChainedError::new(transform(&error), error)),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: PartialEq, E> PartialEq for Outcome<T, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Success(left), Self::Success(right)) => left == right,
            _ => false,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Outcome<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(formatter, "Result[value={value:?}, error=None]"),
            Self::Failure(error) => write!(formatter, "Result[value=None, error={error:?}]"),
        }
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(formatter, "Result[value={value}, error=None]"),
            Self::Failure(error) => write!(formatter, "Result[value=None, error={error}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    fn test_handle_invokes_only_failure_branch() {
        let calls = RefCell::new(Vec::new());
        Outcome::<i32, &str>::failure("bad").handle(
            |value| calls.borrow_mut().push(format!("success {value}")),
            |error| calls.borrow_mut().push(format!("failure {error}")),
        );
        assert_eq!(calls.into_inner(), vec!["failure bad".to_string()]);
    }

    #[rstest]
    fn test_handle_invokes_only_success_branch() {
        let calls = RefCell::new(Vec::new());
        Outcome::<i32, &str>::success(7).handle(
            |value| calls.borrow_mut().push(format!("success {value}")),
            |error| calls.borrow_mut().push(format!("failure {error}")),
        );
        assert_eq!(calls.into_inner(), vec!["success 7".to_string()]);
    }

    #[rstest]
    fn test_failures_never_compare_equal() {
        let failure: Outcome<i32, &str> = Outcome::failure("x");
        let same_failure = failure;
        let success: Outcome<i32, &str> = Outcome::success(1);
        assert_ne!(failure, same_failure);
        assert_ne!(failure, success);
        assert_ne!(success, failure);
    }

    #[rstest]
    fn test_display() {
        let success: Outcome<i32, &str> = Outcome::success(1);
        let failure: Outcome<i32, &str> = Outcome::failure("boom");
        assert_eq!(success.to_string(), "Result[value=1, error=None]");
        assert_eq!(failure.to_string(), "Result[value=None, error=boom]");
    }
}
