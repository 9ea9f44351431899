//! `DictItem` - an immutable key/value record.
//!
//! Mapping sources (`HashMap`, `BTreeMap`, `IndexMap`, ...) are normalized
//! into a sequence of `DictItem`s when a [`Query`](crate::Query) is built
//! from them, so that mapping entries flow through the same operators as any
//! other element. `DictItem` is also an accepted collector output when
//! building maps back up with `to_dict_by`.

use std::fmt;

/// An immutable key/value pair with structural equality, hashing and ordering.
///
/// # Examples
///
/// ```rust
/// use quarry::DictItem;
///
/// let item = DictItem::new("x", 1);
/// assert_eq!(item.key(), &"x");
/// assert_eq!(item.value(), &1);
/// assert_eq!(item, DictItem::from(("x", 1)));
/// assert_eq!(format!("{item:?}"), "DictItem(key=\"x\", value=1)");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DictItem<K, V> {
    key: K,
    value: V,
}

impl<K, V> DictItem<K, V> {
    /// Creates a new item.
    #[inline]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[inline]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the item, returning the key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Consumes the item, returning the value.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Consumes the item, returning `(key, value)`.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Returns a new item with the value transformed.
    pub fn map_value<W, F>(self, function: F) -> DictItem<K, W>
    where
        F: FnOnce(V) -> W,
    {
        DictItem::new(self.key, function(self.value))
    }
}

impl<K, V> From<(K, V)> for DictItem<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> From<DictItem<K, V>> for (K, V) {
    fn from(item: DictItem<K, V>) -> Self {
        item.into_pair()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DictItem<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "DictItem(key={:?}, value={:?})", self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for DictItem<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "DictItem(key={}, value={})", self.key, self.value)
    }
}
