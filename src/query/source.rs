//! Normalization of heterogeneous sources into queries.
//!
//! Anything a [`Query`] can be built from implements [`Source`]. The set of
//! accepted shapes is closed and tagged by [`SourceShape`]:
//!
//! - **Sequence**: vectors, deques, arrays, slices, sets, strings (as
//!   `char`s) and integer ranges yield their elements in iteration order.
//! - **Mapping**: `HashMap`, `BTreeMap` and `IndexMap` yield one
//!   [`DictItem`] per entry; raw `(key, value)` tuples are never exposed.
//! - **Producer**: an existing [`Query`], whose lineage is absorbed by the
//!   query that consumes it. Arbitrary iterators become producers through
//!   [`Query::from_iterator`].
//!
//! # Examples
//!
//! ```rust
//! use quarry::{DictItem, Query};
//! use std::collections::BTreeMap;
//!
//! let scores = BTreeMap::from([("x", 1), ("y", 2)]);
//! let items = Query::new(scores).to_list().unwrap();
//! assert_eq!(items, vec![DictItem::new("x", 1), DictItem::new("y", 2)]);
//!
//! let letters = Query::new("abc").to_list().unwrap();
//! assert_eq!(letters, vec!['a', 'b', 'c']);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::ops::{Range, RangeInclusive};

use indexmap::{IndexMap, IndexSet};

use crate::container::DictItem;
use crate::query::Query;

/// The classification of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceShape {
    /// A linear collection whose elements are yielded as they are.
    Sequence,
    /// A key/value collection whose entries are yielded as [`DictItem`]s.
    Mapping,
    /// A lazy producer, such as another query.
    Producer,
    /// A dynamically typed value whose shape is only known at run time.
    Dynamic,
}

/// A value a [`Query`] can be built from.
///
/// Implementations decide how the value is linearized; the resulting query
/// starts a fresh lineage, except for `Query` itself which is passed through.
pub trait Source<'a> {
    /// The element type of the resulting query.
    type Item: 'a;

    /// How this source is normalized.
    const SHAPE: SourceShape;

    /// Converts the source into a query.
    fn into_query(self) -> Query<'a, Self::Item>;
}

// =============================================================================
// Sequences
// =============================================================================

macro_rules! sequence_source {
    ($($collection:ident),* $(,)?) => {
        $(
            impl<'a, T: 'a> Source<'a> for $collection<T> {
                type Item = T;
                const SHAPE: SourceShape = SourceShape::Sequence;

                fn into_query(self) -> Query<'a, T> {
                    Query::from_iterator(self)
                }
            }
        )*
    };
}

sequence_source!(Vec, VecDeque, LinkedList, BTreeSet);

impl<'a, T: 'a, const N: usize> Source<'a> for [T; N] {
    type Item = T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, T> {
        Query::from_iterator(self)
    }
}

impl<'a, T: 'a> Source<'a> for Box<[T]> {
    type Item = T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, T> {
        Query::from_iterator(self.into_vec())
    }
}

impl<'a, T: 'a> Source<'a> for &'a [T] {
    type Item = &'a T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, &'a T> {
        Query::from_iterator(self.iter())
    }
}

impl<'a, T: 'a> Source<'a> for &'a Vec<T> {
    type Item = &'a T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, &'a T> {
        Query::from_iterator(self.iter())
    }
}

impl<'a, T: 'a, S> Source<'a> for HashSet<T, S> {
    type Item = T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, T> {
        Query::from_iterator(self)
    }
}

impl<'a, T: 'a, S> Source<'a> for IndexSet<T, S> {
    type Item = T;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, T> {
        Query::from_iterator(self)
    }
}

impl<'a> Source<'a> for String {
    type Item = char;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, char> {
        Query::from_iterator(self.chars().collect::<Vec<_>>())
    }
}

impl<'a> Source<'a> for &'a str {
    type Item = char;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, char> {
        Query::from_iterator(self.chars())
    }
}

impl<'a, A: 'a> Source<'a> for Range<A>
where
    Self: Iterator<Item = A>,
{
    type Item = A;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, A> {
        Query::from_iterator(self)
    }
}

impl<'a, A: 'a> Source<'a> for RangeInclusive<A>
where
    Self: Iterator<Item = A>,
{
    type Item = A;
    const SHAPE: SourceShape = SourceShape::Sequence;

    fn into_query(self) -> Query<'a, A> {
        Query::from_iterator(self)
    }
}

// =============================================================================
// Mappings
// =============================================================================

impl<'a, K: 'a, V: 'a, S> Source<'a> for HashMap<K, V, S> {
    type Item = DictItem<K, V>;
    const SHAPE: SourceShape = SourceShape::Mapping;

    fn into_query(self) -> Query<'a, DictItem<K, V>> {
        Query::from_iterator(self.into_iter().map(DictItem::from))
    }
}

impl<'a, K: 'a, V: 'a> Source<'a> for BTreeMap<K, V> {
    type Item = DictItem<K, V>;
    const SHAPE: SourceShape = SourceShape::Mapping;

    fn into_query(self) -> Query<'a, DictItem<K, V>> {
        Query::from_iterator(self.into_iter().map(DictItem::from))
    }
}

impl<'a, K: 'a, V: 'a, S> Source<'a> for IndexMap<K, V, S> {
    type Item = DictItem<K, V>;
    const SHAPE: SourceShape = SourceShape::Mapping;

    fn into_query(self) -> Query<'a, DictItem<K, V>> {
        Query::from_iterator(self.into_iter().map(DictItem::from))
    }
}

// =============================================================================
// Producers
// =============================================================================

impl<'a, T: 'a> Source<'a> for Query<'a, T> {
    type Item = T;
    const SHAPE: SourceShape = SourceShape::Producer;

    fn into_query(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shape_of<'a, S: Source<'a>>(_source: &S) -> SourceShape {
        S::SHAPE
    }

    #[rstest]
    fn test_shapes() {
        assert_eq!(shape_of(&vec![1]), SourceShape::Sequence);
        assert_eq!(shape_of(&HashMap::from([(1, 2)])), SourceShape::Mapping);
        assert_eq!(shape_of(&Query::of([1])), SourceShape::Producer);
    }

    #[rstest]
    fn test_index_map_keeps_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("z", 1);
        map.insert("a", 2);
        let keys = Query::new(map).map(DictItem::into_key).to_list();
        assert_eq!(keys, Ok(vec!["z", "a"]));
    }

    #[rstest]
    fn test_range_inclusive() {
        assert_eq!(Query::new(1..=3).to_list(), Ok(vec![1, 2, 3]));
    }

    #[rstest]
    fn test_slice_yields_references() {
        let values = vec![String::from("a"), String::from("b")];
        let lengths = Query::new(values.as_slice()).map(String::len).sum();
        assert_eq!(lengths, Ok(2));
    }
}
