//! Adapters that turn plain functions into container-returning functions.
//!
//! - [`returns_optional`]: `Fn(A) -> Option<R>` into `Fn(A) -> Optional<R>`
//! - [`returns_outcome`]: `Fn(A) -> Result<R, E>` into `Fn(A) -> Outcome<R, E>`
//! - [`catching`]: intercepts any panic raised by the function and reports
//!   it as a failure
//! - [`catching_only`]: intercepts only panics carrying a payload of one
//!   type; every other panic keeps unwinding
//!
//! Functions of several arguments are adapted by taking a tuple.
//!
//! # Examples
//!
//! ```rust
//! use quarry::adapters::returns_optional;
//!
//! let fizz = returns_optional(|(x, y): (i32, i32)| (x != y).then_some(x + y));
//! assert_eq!(fizz((1, 2)).get(), Ok(3));
//! assert!(fizz((0, 0)).is_empty());
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, RefUnwindSafe};

use crate::container::{Optional, Outcome};

/// Adapts a function returning `Option` into one returning [`Optional`].
pub fn returns_optional<A, R, F>(function: F) -> impl Fn(A) -> Optional<R>
where
    F: Fn(A) -> Option<R>,
{
    move |argument| Optional::of_nullable(function(argument))
}

/// Adapts a function returning `Result` into one returning [`Outcome`].
///
/// # Examples
///
/// ```rust
/// use quarry::adapters::returns_outcome;
///
/// let parse = returns_outcome(|text: &str| text.parse::<i32>());
/// assert!(parse("12").is_successful());
/// assert!(parse("twelve").is_failure());
/// ```
pub fn returns_outcome<A, R, E, F>(function: F) -> impl Fn(A) -> Outcome<R, E>
where
    F: Fn(A) -> Result<R, E>,
{
    move |argument| Outcome::from(function(argument))
}

/// A panic intercepted by [`catching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caught {
    message: String,
}

impl Caught {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with a non-string payload".to_string());
        Self { message }
    }

    /// Returns the panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Caught {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for Caught {}

/// Adapts a function so that any panic it raises becomes a failed [`Outcome`].
///
/// The panic hook still runs, so the panic message is printed as usual.
///
/// # Examples
///
/// ```rust
/// use quarry::adapters::catching;
///
/// let buzz = catching(|(x, y): (i32, i32)| {
///     if x == y {
///         panic!("x == y");
///     }
///     x + y
/// });
///
/// assert_eq!(buzz((1, 2)).value(), Some(&3));
/// assert_eq!(buzz((0, 0)).error().map(|caught| caught.message()), Some("x == y"));
/// ```
pub fn catching<A, R, F>(function: F) -> impl Fn(A) -> Outcome<R, Caught>
where
    F: Fn(A) -> R + RefUnwindSafe,
{
    move |argument| {
        let argument = panic::AssertUnwindSafe(argument);
        match panic::catch_unwind(|| function({ argument }.0)) {
            Ok(value) => Outcome::success(value),
            Err(payload) => Outcome::failure(Caught::from_payload(payload.as_ref())),
        }
    }
}

/// Adapts a function so that panics carrying a `P` payload become failed
/// [`Outcome`]s; any other panic resumes unwinding unchanged.
///
/// Raise a typed payload with [`std::panic::panic_any`].
///
/// # Examples
///
/// ```rust
/// use quarry::adapters::catching_only;
///
/// #[derive(Debug, PartialEq)]
/// struct ArithmeticError(&'static str);
///
/// let checked = catching_only::<ArithmeticError, _, _, _>(|divisor: i32| {
///     if divisor == 0 {
///         std::panic::panic_any(ArithmeticError("division by zero"));
///     }
///     10 / divisor
/// });
///
/// assert_eq!(checked(2).value(), Some(&5));
/// assert_eq!(checked(0).error(), Some(&ArithmeticError("division by zero")));
/// ```
pub fn catching_only<P, A, R, F>(function: F) -> impl Fn(A) -> Outcome<R, P>
where
    P: Any + Send,
    F: Fn(A) -> R + RefUnwindSafe,
{
    move |argument| {
        let argument = panic::AssertUnwindSafe(argument);
        match panic::catch_unwind(|| function({ argument }.0)) {
            Ok(value) => Outcome::success(value),
            Err(payload) => match payload.downcast::<P>() {
                Ok(intercepted) => Outcome::failure(*intercepted),
                Err(other) => panic::resume_unwind(other),
            },
        }
    }
}
