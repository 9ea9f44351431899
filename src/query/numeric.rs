//! Capabilities the aggregate operations rely on.
//!
//! - [`Numeric`]: checked addition and conversion to `f64`, used by `sum`
//!   and `average`
//! - [`Truthy`]: a truth value, used by `quantify` and `filter_map_truthy`

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};

use crate::container::{DictItem, Optional};

/// A value that can be summed and averaged.
///
/// Primitive numbers implement this trait. Dynamically typed values may be
/// non-numeric at run time, which `try_add` and `to_f64` report as `None`.
pub trait Numeric: Sized {
    /// The additive identity.
    fn zero() -> Self;

    /// Adds two values, or returns `None` if either is not a number or the
    /// addition overflows.
    fn try_add(self, other: Self) -> Option<Self>;

    /// Converts the value to `f64`, or returns `None` if it is not a number.
    fn to_f64(&self) -> Option<f64>;
}

macro_rules! integer_numeric {
    ($($number:ty),* $(,)?) => {
        $(
            impl Numeric for $number {
                fn zero() -> Self {
                    0
                }

                fn try_add(self, other: Self) -> Option<Self> {
                    self.checked_add(other)
                }

                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

integer_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_numeric {
    ($($number:ty),* $(,)?) => {
        $(
            impl Numeric for $number {
                fn zero() -> Self {
                    0.0
                }

                fn try_add(self, other: Self) -> Option<Self> {
                    Some(self + other)
                }

                #[allow(clippy::cast_lossless)]
                fn to_f64(&self) -> Option<f64> {
                    Some(f64::from(*self))
                }
            }
        )*
    };
}

float_numeric!(f32, f64);

/// A value with a truth value.
///
/// Numbers are truthy when non-zero, text and collections when non-empty,
/// and optional values when present.
///
/// # Examples
///
/// ```rust
/// use quarry::Truthy;
///
/// assert!(1_i32.is_truthy());
/// assert!(!0.0_f64.is_truthy());
/// assert!(!"".is_truthy());
/// assert!(vec![0].is_truthy());
/// ```
pub trait Truthy {
    /// Returns the truth value.
    fn is_truthy(&self) -> bool;
}

macro_rules! zero_is_falsy {
    ($($number:ty),* $(,)?) => {
        $(
            impl Truthy for $number {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

zero_is_falsy!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for () {
    fn is_truthy(&self) -> bool {
        false
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

macro_rules! non_empty_is_truthy {
    ($($collection:ty => [$($parameter:ident),*]),* $(,)?) => {
        $(
            impl<$($parameter),*> Truthy for $collection {
                fn is_truthy(&self) -> bool {
                    !self.is_empty()
                }
            }
        )*
    };
}

non_empty_is_truthy!(
    [T] => [T],
    Vec<T> => [T],
    VecDeque<T> => [T],
    BTreeSet<T> => [T],
    HashSet<T, S> => [T, S],
    IndexSet<T, S> => [T, S],
    BTreeMap<K, V> => [K, V],
    HashMap<K, V, S> => [K, V, S],
    IndexMap<K, V, S> => [K, V, S],
);

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T> Truthy for Optional<T> {
    fn is_truthy(&self) -> bool {
        self.is_present()
    }
}

impl<K, V> Truthy for DictItem<K, V> {
    fn is_truthy(&self) -> bool {
        true
    }
}
