//! Map-backed sequences and lookups.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::backing::{KeyedAccess, MapBacking};
use crate::error::{Result, SeqError};
use crate::index::IndexedMap;
use crate::seq::Seq;

/// A sequence of `(key, value)` entries with keyed access.
///
/// `S` holds the entries. Maps built by sequin use an [`IndexedMap`] and
/// iterate in first-insertion order of the keys. Wrapping a std map keeps
/// that map, so `get` and `has` are its own lookups.
pub struct SeqMap<K, V, S = IndexedMap<K, V>> {
    backing: Rc<S>,
    seq: Seq<(K, V)>,
}

/// Key to group index produced by [`Seq::to_lookup`].
///
/// Each value is the sequence of items that share the key, in the order
/// they were met.
pub type Lookup<K, V> = SeqMap<K, Seq<V>>;

impl<K, V, S> SeqMap<K, V, S>
where
    K: 'static,
    V: 'static,
    S: MapBacking<K, V>,
{
    /// Wraps `backing` without copying it.
    pub fn from_backing(backing: S) -> Self {
        let backing = Rc::new(backing);
        let shared = Rc::clone(&backing);
        let seq = Seq::from_fn(move || S::pass(&shared));
        SeqMap { backing, seq }
    }

    /// Returns `true` if `key` is present.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        S: KeyedAccess<Q, V>,
    {
        self.backing.lookup(key).is_some()
    }

    /// Returns the value stored under `key`, or `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        S: KeyedAccess<Q, V>,
    {
        self.backing.lookup(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    /// `true` when the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.backing.len() == 0
    }

    /// The keys in iteration order.
    pub fn keys(&self) -> Seq<K> {
        self.seq.select(|(key, _)| key)
    }

    /// The values in iteration order.
    pub fn values(&self) -> Seq<V> {
        self.seq.select(|(_, value)| value)
    }

    /// The entries as a plain sequence.
    pub fn entries(&self) -> Seq<(K, V)> {
        self.seq.clone()
    }

    /// The entries as a borrowed sequence.
    pub fn as_seq(&self) -> &Seq<(K, V)> {
        &self.seq
    }

    /// The collection holding the entries.
    pub fn backing(&self) -> &S {
        &self.backing
    }
}

impl<K, V, S> SeqMap<K, V, S>
where
    K: Serialize + 'static,
    V: Serialize + 'static,
    S: MapBacking<K, V>,
{
    /// Converts the entries into a JSON object.
    ///
    /// Every key must serialize to a JSON string; the first one that does
    /// not fails the whole conversion with [`SeqError::NonStringKey`].
    /// Object keys keep the map's iteration order.
    ///
    /// ```
    /// use sequin::seq;
    ///
    /// let people = seq(vec![(1, "chris"), (2, "aimee")]);
    /// let by_name = people.to_object(|(_, name)| *name, |(id, _)| id).unwrap();
    /// assert_eq!(by_name["aimee"], 2);
    ///
    /// assert!(people.to_object(|(id, _)| *id, |(_, name)| name).is_err());
    /// ```
    pub fn convert_to_object(&self) -> Result<Map<String, Value>> {
        let mut object = Map::new();
        for (key, value) in self.seq.iter() {
            let key = match serde_json::to_value(&key)? {
                Value::String(key) => key,
                other => {
                    return Err(SeqError::NonStringKey {
                        key: other.to_string(),
                    })
                }
            };
            object.insert(key, serde_json::to_value(&value)?);
        }
        Ok(object)
    }
}

impl<K, V, S> Clone for SeqMap<K, V, S> {
    fn clone(&self) -> Self {
        SeqMap {
            backing: Rc::clone(&self.backing),
            seq: self.seq.clone(),
        }
    }
}

impl<K, V, S: MapBacking<K, V>> fmt::Debug for SeqMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqMap")
            .field("len", &self.backing.len())
            .finish_non_exhaustive()
    }
}

impl<K, V, S> Deref for SeqMap<K, V, S> {
    type Target = Seq<(K, V)>;

    fn deref(&self) -> &Seq<(K, V)> {
        &self.seq
    }
}

impl<K, V, S> From<SeqMap<K, V, S>> for Seq<(K, V)> {
    fn from(map: SeqMap<K, V, S>) -> Self {
        map.seq
    }
}

impl<K, V> FromIterator<(K, V)> for SeqMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Later entries replace the value of an earlier equal key in place.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SeqMap::from_backing(iter.into_iter().collect())
    }
}

impl<K, V> From<HashMap<K, V>> for SeqMap<K, V, HashMap<K, V>>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fn from(map: HashMap<K, V>) -> Self {
        SeqMap::from_backing(map)
    }
}

impl<K, V> From<BTreeMap<K, V>> for SeqMap<K, V, BTreeMap<K, V>>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        SeqMap::from_backing(map)
    }
}

impl<K: 'static, V: 'static, S> IntoIterator for SeqMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = crate::seq::Iter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.seq.iter()
    }
}
