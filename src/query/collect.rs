//! Collection targets for [`Query::collect`](crate::Query::collect) and
//! key/value shapes for the dictionary-building operations.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use indexmap::{IndexMap, IndexSet};

use crate::container::DictItem;
use crate::error::QueryError;

/// A value that can be read as one key/value entry.
///
/// Collectors passed to `to_dict_by` and `group_by_collecting` return an
/// `IntoEntry` value. Tuples and [`DictItem`]s always succeed; dynamically
/// typed values are checked at run time.
pub trait IntoEntry<K, V> {
    /// Converts the value into an entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedShape`] when the value is not a
    /// key/value pair.
    fn into_entry(self) -> Result<DictItem<K, V>, QueryError>;
}

impl<K, V> IntoEntry<K, V> for (K, V) {
    fn into_entry(self) -> Result<DictItem<K, V>, QueryError> {
        Ok(DictItem::from(self))
    }
}

impl<K, V> IntoEntry<K, V> for DictItem<K, V> {
    fn into_entry(self) -> Result<Self, QueryError> {
        Ok(self)
    }
}

/// Builds an insertion-ordered map, rejecting duplicate keys unless a
/// `merger` is given. A merged value keeps the position of the first key.
pub(crate) fn collect_entries<K, V, C, I, M>(
    entries: I,
    mut merger: Option<M>,
) -> Result<IndexMap<K, V>, QueryError>
where
    K: Hash + Eq + fmt::Debug,
    C: IntoEntry<K, V>,
    I: Iterator<Item = C>,
    M: FnMut(V, V) -> V,
{
    // Values sit in an `Option` so a merge can move the old value out.
    let mut map: IndexMap<K, Option<V>> = IndexMap::new();
    for entry in entries {
        let (key, value) = entry.into_entry()?.into_pair();
        match map.get_mut(&key) {
            None => {
                map.insert(key, Some(value));
            }
            Some(slot) => {
                let Some(merge) = merger.as_mut() else {
                    return Err(QueryError::duplicate_key(&key));
                };
                *slot = slot.take().map(|previous| merge(previous, value));
            }
        }
    }
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect())
}

/// A collection that can be built from the elements of a query.
///
/// # Examples
///
/// ```rust
/// use quarry::Query;
/// use std::collections::BTreeSet;
///
/// let letters: BTreeSet<char> = Query::new("banana").collect().unwrap();
/// assert_eq!(letters.into_iter().collect::<String>(), "abn");
///
/// let listed: String = Query::of([1, 2, 3]).collect().unwrap();
/// assert_eq!(listed, "1, 2, 3");
/// ```
pub trait FromQuery<T>: Sized {
    /// Builds the collection.
    ///
    /// # Errors
    ///
    /// Map targets fail on duplicate keys and on elements that are not
    /// key/value pairs.
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = T>;
}

macro_rules! infallible_target {
    ($($collection:ty => [$($bound:tt)*]),* $(,)?) => {
        $(
            impl<$($bound)*> FromQuery<T> for $collection {
                fn from_elements<I>(elements: I) -> Result<Self, QueryError>
                where
                    I: Iterator<Item = T>,
                {
                    Ok(elements.collect())
                }
            }
        )*
    };
}

infallible_target!(
    Vec<T> => [T],
    VecDeque<T> => [T],
    LinkedList<T> => [T],
    Box<[T]> => [T],
    BTreeSet<T> => [T: Ord],
    HashSet<T, S> => [T: Eq + Hash, S: BuildHasher + Default],
    IndexSet<T, S> => [T: Eq + Hash, S: BuildHasher + Default],
);

impl<T: fmt::Display> FromQuery<T> for String {
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = T>,
    {
        Ok(join_displayed(elements, ", "))
    }
}

impl<T, K, V, S> FromQuery<T> for IndexMap<K, V, S>
where
    T: IntoEntry<K, V>,
    K: Hash + Eq + fmt::Debug,
    S: BuildHasher + Default,
{
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = T>,
    {
        Ok(collect_entries(elements, None::<fn(V, V) -> V>)?
            .into_iter()
            .collect())
    }
}

impl<T, K, V, S> FromQuery<T> for HashMap<K, V, S>
where
    T: IntoEntry<K, V>,
    K: Hash + Eq + fmt::Debug,
    S: BuildHasher + Default,
{
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = T>,
    {
        Ok(collect_entries(elements, None::<fn(V, V) -> V>)?
            .into_iter()
            .collect())
    }
}

impl<T, K, V> FromQuery<T> for BTreeMap<K, V>
where
    T: IntoEntry<K, V>,
    K: Ord + fmt::Debug,
{
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = T>,
    {
        let mut map = Self::new();
        for element in elements {
            let (key, value) = element.into_entry()?.into_pair();
            if map.contains_key(&key) {
                return Err(QueryError::duplicate_key(&key));
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}

pub(crate) fn join_displayed<T, I>(elements: I, delimiter: &str) -> String
where
    T: fmt::Display,
    I: Iterator<Item = T>,
{
    use fmt::Write;

    let mut joined = String::new();
    for (index, element) in elements.enumerate() {
        if index > 0 {
            joined.push_str(delimiter);
        }
        // Writing into a `String` cannot fail.
        let _ = write!(joined, "{element}");
    }
    joined
}
