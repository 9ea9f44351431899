//! Recursive flattening for [`Query::flatten`](crate::Query::flatten).
//!
//! A [`Nested`] value is either a leaf, which flattens to itself, or a branch
//! whose children are flattened in order. Collections are branches. Scalars,
//! strings and [`DictItem`]s are leaves, so text is never split into
//! characters.
//!
//! Homogeneous nesting (`Vec<Vec<i32>>`) flattens through the collection
//! impls. For ragged nesting, such as `[1, [2, [3]]]`, use [`Nest`].

use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::iter;

use crate::container::DictItem;

/// Boxed iterator over the leaves of a nested value.
pub type Leaves<'a, L> = Box<dyn Iterator<Item = L> + 'a>;

/// A value that can be flattened recursively to its leaves.
pub trait Nested: Sized {
    /// The type of the innermost elements.
    type Leaf;

    /// Returns every leaf in depth-first order.
    fn leaves<'a>(self) -> Leaves<'a, Self::Leaf>
    where
        Self: 'a;
}

macro_rules! leaf {
    ($($leaf:ty),* $(,)?) => {
        $(
            impl Nested for $leaf {
                type Leaf = Self;

                fn leaves<'a>(self) -> Leaves<'a, Self>
                where
                    Self: 'a,
                {
                    Box::new(iter::once(self))
                }
            }
        )*
    };
}

leaf!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl<'s> Nested for &'s str {
    type Leaf = Self;

    fn leaves<'a>(self) -> Leaves<'a, Self>
    where
        Self: 'a,
    {
        Box::new(iter::once(self))
    }
}

impl<K, V> Nested for DictItem<K, V> {
    type Leaf = Self;

    fn leaves<'a>(self) -> Leaves<'a, Self>
    where
        Self: 'a,
    {
        Box::new(iter::once(self))
    }
}

macro_rules! branch {
    ($($collection:ident),* $(,)?) => {
        $(
            impl<T: Nested> Nested for $collection<T> {
                type Leaf = T::Leaf;

                fn leaves<'a>(self) -> Leaves<'a, T::Leaf>
                where
                    Self: 'a,
                {
                    Box::new(self.into_iter().flat_map(|child| child.leaves()))
                }
            }
        )*
    };
}

branch!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Nested, S> Nested for HashSet<T, S> {
    type Leaf = T::Leaf;

    fn leaves<'a>(self) -> Leaves<'a, T::Leaf>
    where
        Self: 'a,
    {
        Box::new(self.into_iter().flat_map(|child| child.leaves()))
    }
}

impl<T: Nested, const N: usize> Nested for [T; N] {
    type Leaf = T::Leaf;

    fn leaves<'a>(self) -> Leaves<'a, T::Leaf>
    where
        Self: 'a,
    {
        Box::new(self.into_iter().flat_map(|child| child.leaves()))
    }
}

/// A ragged tree: every node is either a single value or a list of nodes.
///
/// # Examples
///
/// ```rust
/// use quarry::{Nest, Query};
///
/// // [1, [2, [3, 4]], 5]
/// let ragged = Query::of([
///     Nest::item(1),
///     Nest::list([Nest::item(2), Nest::list([Nest::item(3), Nest::item(4)])]),
///     Nest::item(5),
/// ]);
/// assert_eq!(ragged.flatten().to_list(), Ok(vec![1, 2, 3, 4, 5]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nest<T> {
    /// A single leaf value.
    Item(T),
    /// A list of nested nodes.
    List(Vec<Nest<T>>),
}

impl<T> Nest<T> {
    /// Creates a leaf node.
    pub const fn item(value: T) -> Self {
        Self::Item(value)
    }

    /// Creates a list node from any collection of nodes.
    pub fn list<I: IntoIterator<Item = Self>>(children: I) -> Self {
        Self::List(children.into_iter().collect())
    }
}

impl<T> Nested for Nest<T> {
    type Leaf = T;

    fn leaves<'a>(self) -> Leaves<'a, T>
    where
        Self: 'a,
    {
        match self {
            Self::Item(value) => Box::new(iter::once(value)),
            Self::List(children) => Box::new(children.into_iter().flat_map(|child| child.leaves())),
        }
    }
}
