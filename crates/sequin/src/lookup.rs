//! Lookup construction and the operators built on it.
//!
//! A lookup is built in one pass: each item's key is computed, the first
//! time a key is met it gets a new value list (so keys keep discovery
//! order), and the item is appended to its key's list. Grouping, distinct
//! and both joins share this builder.

use std::hash::Hash;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SeqError};
use crate::grouped::Grouping;
use crate::index::IndexedMap;
use crate::map::{Lookup, SeqMap};
use crate::seq::{deferred, Seq};

pub(crate) struct LookupBuilder<K, V> {
    index: IndexedMap<K, Vec<V>>,
}

impl<K, V> LookupBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        LookupBuilder {
            index: IndexedMap::new(),
        }
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        self.index.get_or_insert_with(key, Vec::new).push(value);
    }

    pub(crate) fn finish(self) -> Lookup<K, V>
    where
        K: 'static,
        V: Clone + 'static,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(keys = self.index.len(), "built lookup");
        SeqMap::from_backing(self.index.map_values(Seq::from_vec))
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// Groups the items by key in one eager pass.
    ///
    /// ```
    /// use sequin::seq;
    ///
    /// let lookup = seq(vec![1, 2, 2, 3, 3, 3]).to_lookup(|n| *n);
    /// assert_eq!(lookup.get(&3).map(|g| g.count()), Some(3));
    /// assert!(lookup.get(&4).is_none());
    /// ```
    pub fn to_lookup<K, F>(&self, key: F) -> Lookup<K, T>
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K,
    {
        self.to_lookup_by(key, |item| item)
    }

    /// Groups projected values by key in one eager pass.
    pub fn to_lookup_by<K, V, FK, FV>(&self, key: FK, value: FV) -> Lookup<K, V>
    where
        K: Eq + Hash + Clone + 'static,
        V: Clone + 'static,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        let mut builder = LookupBuilder::new();
        for item in self.iter() {
            let k = key(&item);
            builder.push(k, value(item));
        }
        builder.finish()
    }

    /// Builds a map with one entry per item.
    ///
    /// Fails with [`SeqError::DuplicateKey`] as soon as a key repeats.
    pub fn to_map<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<SeqMap<K, V>>
    where
        K: Eq + Hash + Clone + 'static,
        V: Clone + 'static,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        let mut index = IndexedMap::new();
        for (position, item) in self.iter().enumerate() {
            let k = key(&item);
            if index.contains_key(&k) {
                return Err(SeqError::DuplicateKey { position });
            }
            index.insert(k, value(item));
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(entries = index.len(), "built map");
        Ok(SeqMap::from_backing(index))
    }

    /// Builds a map, then converts it into a JSON object.
    pub fn to_object<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<Map<String, Value>>
    where
        K: Eq + Hash + Clone + Serialize + 'static,
        V: Clone + Serialize + 'static,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        self.to_map(key, value)?.convert_to_object()
    }

    /// Groups the items by key.
    ///
    /// The lookup is built on the first pull and reused by later passes.
    /// Groups come out in the order their keys were first met.
    ///
    /// # Panics
    ///
    /// Panics if `key` iterates this same query while its lookup is being
    /// built, since the lookup cannot be read before it exists.
    pub fn group_by<K, F>(&self, key: F) -> Seq<Grouping<K, T>>
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let src = self.clone();
        let lookup = deferred(move || src.to_lookup(key));
        Seq::from_fn(move || {
            lookup
                .entries()
                .iter()
                .map(|(key, members)| Grouping::new(key, members))
        })
    }

    /// Keeps the first item of each key, in first-seen order.
    ///
    /// # Panics
    ///
    /// Panics under the same reentrant `key` as [`Seq::group_by`].
    pub fn distinct_by<K, F>(&self, key: F) -> Seq<T>
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.group_by(key).select_many(|group| group.iter().take(1))
    }

    /// Keeps the first occurrence of each value.
    pub fn distinct(&self) -> Seq<T>
    where
        T: Eq + Hash,
    {
        self.distinct_by(|item| item.clone())
    }

    /// Correlates items with the inner items sharing their key.
    ///
    /// Emits one result per matching pair, inner matches in arrival order.
    /// Outer items without a match emit nothing.
    pub fn join<I, K, R, FO, FI, FR>(
        &self,
        inner: impl Into<Seq<I>>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Seq<R>
    where
        I: Clone + 'static,
        K: Eq + Hash + Clone + 'static,
        R: 'static,
        FO: Fn(&T) -> K + 'static,
        FI: Fn(&I) -> K + 'static,
        FR: Fn(T, I) -> R + 'static,
    {
        let inner = inner.into();
        let lookup = deferred(move || inner.to_lookup(inner_key));
        let outer = self.clone();
        let outer_key = Rc::new(outer_key);
        let result = Rc::new(result);
        Seq::from_fn(move || {
            let lookup = Rc::clone(&lookup);
            let outer_key = Rc::clone(&outer_key);
            let result = Rc::clone(&result);
            outer.iter().flat_map(move |item| {
                let matches = lookup.get(&outer_key(&item)).cloned().unwrap_or_default();
                let result = Rc::clone(&result);
                matches.iter().map(move |m| result(item.clone(), m))
            })
        })
    }

    /// Pairs every item with the (possibly empty) group of inner items
    /// sharing its key.
    pub fn group_join<I, K, R, FO, FI, FR>(
        &self,
        inner: impl Into<Seq<I>>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Seq<R>
    where
        I: Clone + 'static,
        K: Eq + Hash + Clone + 'static,
        R: 'static,
        FO: Fn(&T) -> K + 'static,
        FI: Fn(&I) -> K + 'static,
        FR: Fn(T, Seq<I>) -> R + 'static,
    {
        let inner = inner.into();
        let lookup = deferred(move || inner.to_lookup(inner_key));
        let outer = self.clone();
        let outer_key = Rc::new(outer_key);
        let result = Rc::new(result);
        Seq::from_fn(move || {
            let lookup = Rc::clone(&lookup);
            let outer_key = Rc::clone(&outer_key);
            let result = Rc::clone(&result);
            outer.iter().map(move |item| {
                let group = lookup.get(&outer_key(&item)).cloned().unwrap_or_default();
                result(item, group)
            })
        })
    }
}
