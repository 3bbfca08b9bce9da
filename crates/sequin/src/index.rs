//! Insertion-ordered hashed index, the default backing of sets, maps and
//! lookups.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Keys and values in first-insertion order, with hashed key positions.
///
/// ```
/// use sequin::{IndexedMap, SeqMap};
///
/// let mut index = IndexedMap::new();
/// index.insert("b", 1);
/// index.insert("a", 2);
/// let map = SeqMap::from_backing(index);
/// assert_eq!(map.keys().to_vec(), vec!["b", "a"]);
/// ```
#[derive(Debug, Clone)]
pub struct IndexedMap<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    positions: HashMap<K, usize>,
}

impl<K, V> IndexedMap<K, V> {
    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// `true` when no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn entry_at(&self, pos: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(pos)?, self.values.get(pos)?))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.values.iter())
    }
}

impl<K, V> IndexedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// An empty index.
    pub fn new() -> Self {
        IndexedMap {
            keys: Vec::new(),
            values: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// The value under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        self.values.get(pos)
    }

    /// Inserts or replaces. A replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.positions.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.values[pos], value)),
            None => {
                self.positions.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(value);
                None
            }
        }
    }

    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let pos = match self.positions.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.keys.len();
                self.positions.insert(key.clone(), pos);
                self.keys.push(key);
                self.values.push(make());
                pos
            }
        };
        &mut self.values[pos]
    }

    pub(crate) fn map_values<W, F>(self, f: F) -> IndexedMap<K, W>
    where
        F: FnMut(V) -> W,
    {
        IndexedMap {
            keys: self.keys,
            values: self.values.into_iter().map(f).collect(),
            positions: self.positions,
        }
    }
}

impl<K, V> Default for IndexedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        IndexedMap::new()
    }
}

impl<K, V> FromIterator<(K, V)> for IndexedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = IndexedMap::new();
        for (key, value) in iter {
            index.insert(key, value);
        }
        index
    }
}
