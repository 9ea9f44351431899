//! Optional - a container holding zero or one value.
//!
//! `Optional<T>` is the value most terminal query operations return when a
//! result may be missing (`find_first`, `min`, `reduce`, ...). It wraps an
//! `Option<T>` and adds the strict/nullable construction pair and the
//! fallback combinators used throughout the crate.
//!
//! # Examples
//!
//! ```rust
//! use quarry::Optional;
//!
//! let present = Optional::of(3);
//! assert!(present.is_present());
//! assert_eq!(present.map(|x| x * 2).get(), Ok(6));
//!
//! let empty: Optional<i32> = Optional::of_nullable(None);
//! assert!(empty.is_empty());
//! assert_eq!(empty.or_else(4), 4);
//! ```

use std::fmt;

use crate::error::QueryError;

/// A container that holds either one value or nothing.
///
/// Two present containers are equal when their values are equal, and two
/// empty containers are equal to each other.
///
/// # Examples
///
/// ```rust
/// use quarry::Optional;
///
/// assert_eq!(Optional::of(1), Optional::of(1));
/// assert_ne!(Optional::of(1), Optional::of(2));
/// assert_ne!(Optional::of(1), Optional::empty());
/// assert_eq!(Optional::<i32>::empty(), Optional::empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Optional<T>(Option<T>);

impl<T> Optional<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Wraps a present value.
    #[inline]
    pub const fn of(value: T) -> Self {
        Self(Some(value))
    }

    /// Wraps a value that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NilInput`] when `value` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Optional;
    ///
    /// assert_eq!(Optional::try_of(Some(2)), Ok(Optional::of(2)));
    ///
    /// let error = Optional::<i32>::try_of(None).unwrap_err();
    /// assert_eq!(error.to_string(), "Value cannot be None");
    /// ```
    pub fn try_of(value: Option<T>) -> Result<Self, QueryError> {
        value
            .map(Self::of)
            .ok_or(QueryError::NilInput("Value cannot be None"))
    }

    /// Wraps a value that may be absent; `None` gives an empty container.
    #[inline]
    pub const fn of_nullable(value: Option<T>) -> Self {
        Self(value)
    }

    /// Returns an empty container.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns `true` if a value is present.
    #[inline]
    pub const fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Returns `true` if no value is present.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the value, consuming the container.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyValue`] when the container is empty.
    pub fn get(self) -> Result<T, QueryError> {
        self.0.ok_or(QueryError::EmptyValue)
    }

    /// Returns a reference to the value.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyValue`] when the container is empty.
    pub fn get_ref(&self) -> Result<&T, QueryError> {
        self.0.as_ref().ok_or(QueryError::EmptyValue)
    }

    /// Borrows the contents as `Optional<&T>`.
    #[inline]
    pub const fn as_ref(&self) -> Optional<&T> {
        Optional(self.0.as_ref())
    }

    /// Converts into the underlying `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    // =========================================================================
    // Side Effects
    // =========================================================================

    /// Calls `action` with the value if one is present.
    pub fn if_present<F>(&self, action: F)
    where
        F: FnOnce(&T),
    {
        if let Some(value) = &self.0 {
            action(value);
        }
    }

    /// Calls `action` with the value if present, otherwise calls `empty_action`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Optional;
    /// use std::cell::RefCell;
    ///
    /// let seen = RefCell::new(String::new());
    /// Optional::<i32>::empty().if_present_or_else(
    ///     |value| seen.borrow_mut().push_str(&value.to_string()),
    ///     || seen.borrow_mut().push_str("BANG!"),
    /// );
    /// assert_eq!(*seen.borrow(), "BANG!");
    /// ```
    pub fn if_present_or_else<F, G>(&self, action: F, empty_action: G)
    where
        F: FnOnce(&T),
        G: FnOnce(),
    {
        match &self.0 {
            Some(value) => action(value),
            None => empty_action(),
        }
    }

    // =========================================================================
    // Transformation
    // =========================================================================

    /// Applies `function` to the value if present.
    ///
    /// A panic inside `function` propagates to the caller.
    #[inline]
    pub fn map<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(T) -> U,
    {
        Optional(self.0.map(function))
    }

    /// Applies a function that may produce no value; an absent result gives an
    /// empty container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Optional;
    ///
    /// assert!(Optional::of(42).map_nullable(|_| None::<i32>).is_empty());
    /// assert_eq!(Optional::of(42).map_nullable(|x| Some(x + 1)).get(), Ok(43));
    /// ```
    #[inline]
    pub fn map_nullable<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        Optional(self.0.and_then(function))
    }

    /// Applies a function that itself returns an `Optional` and flattens the result.
    #[inline]
    pub fn flat_map<U, F>(self, function: F) -> Optional<U>
    where
        F: FnOnce(T) -> Optional<U>,
    {
        Optional(self.0.and_then(|value| function(value).0))
    }

    /// Keeps the value only if `predicate` holds for it.
    #[inline]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        Self(self.0.filter(predicate))
    }

    // =========================================================================
    // Fallbacks
    // =========================================================================

    /// Returns the value, or `other` if empty.
    #[inline]
    pub fn or_else(self, other: T) -> T {
        self.0.unwrap_or(other)
    }

    /// Returns the value, or the result of `supplier` if empty.
    #[inline]
    pub fn or_else_get<F>(self, supplier: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.0.unwrap_or_else(supplier)
    }

    /// Returns this container if present, otherwise `other`.
    #[inline]
    pub fn or(self, other: Self) -> Self {
        Self(self.0.or(other.0))
    }

    /// Returns the value or fails.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyValue`] when the container is empty.
    #[inline]
    pub fn or_else_raise(self) -> Result<T, QueryError> {
        self.get()
    }

    /// Returns the value, or the error built by `error_supplier` if empty.
    ///
    /// # Errors
    ///
    /// Returns the supplied error when the container is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Optional;
    ///
    /// let result = Optional::<i32>::empty().or_else_raise_with(|| "Yo Mr. White...!");
    /// assert_eq!(result, Err("Yo Mr. White...!"));
    /// ```
    #[inline]
    pub fn or_else_raise_with<E, F>(self, error_supplier: F) -> Result<T, E>
    where
        F: FnOnce() -> E,
    {
        self.0.ok_or_else(error_supplier)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(optional: Optional<T>) -> Self {
        optional.0
    }
}

impl<T> IntoIterator for Optional<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(formatter, "Optional[{value:?}]"),
            None => formatter.write_str("Optional.empty"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Optional<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(formatter, "Optional[{value}]"),
            None => formatter.write_str("Optional.empty"),
        }
    }
}
