//! Storage behind [`SeqSet`](crate::SeqSet) and [`SeqMap`](crate::SeqMap).
//!
//! A wrapper owns its backing behind an `Rc` and asks it for a fresh pass
//! whenever the sequence is iterated. Membership and keyed access go
//! straight to the backing, so wrapping a `HashSet` or a `BTreeMap` keeps
//! the collection as it is instead of copying it.
//!
//! | Backing              | Pass order        | Per pass                 |
//! |----------------------|-------------------|--------------------------|
//! | `IndexedMap`         | first insertion   | positional cursor        |
//! | `BTreeSet`/`BTreeMap`| key order         | range cursor             |
//! | `HashSet`/`HashMap`  | the hasher's      | snapshot of the members  |

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::ops::Bound;
use std::rc::Rc;

use crate::index::IndexedMap;
use crate::seq::Iter;

/// A collection that can back a [`SeqSet`](crate::SeqSet).
pub trait SetBacking<T>: 'static {
    /// Number of members.
    fn len(&self) -> usize;

    /// Starts a pass over the members.
    fn pass(this: &Rc<Self>) -> Iter<T>;
}

/// Membership test for values borrowed as `Q`.
pub trait Membership<Q: ?Sized> {
    /// Returns `true` if `value` is a member.
    fn contains(&self, value: &Q) -> bool;
}

/// A collection that can back a [`SeqMap`](crate::SeqMap).
pub trait MapBacking<K, V>: 'static {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Starts a pass over the entries.
    fn pass(this: &Rc<Self>) -> Iter<(K, V)>;
}

/// Keyed access for keys borrowed as `Q`.
pub trait KeyedAccess<Q: ?Sized, V> {
    /// The value under `key`.
    fn lookup(&self, key: &Q) -> Option<&V>;
}

// ============================================================================
// IndexedMap
// ============================================================================

impl<T: Clone + 'static> SetBacking<T> for IndexedMap<T, ()> {
    fn len(&self) -> usize {
        IndexedMap::len(self)
    }

    fn pass(this: &Rc<Self>) -> Iter<T> {
        let index = Rc::clone(this);
        Iter::new(
            (0..index.len()).filter_map(move |pos| index.entry_at(pos).map(|(v, _)| v.clone())),
        )
    }
}

impl<T, Q> Membership<Q> for IndexedMap<T, ()>
where
    T: Borrow<Q> + Eq + Hash + Clone,
    Q: Hash + Eq + ?Sized,
{
    fn contains(&self, value: &Q) -> bool {
        self.contains_key(value)
    }
}

impl<K, V> MapBacking<K, V> for IndexedMap<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    fn len(&self) -> usize {
        IndexedMap::len(self)
    }

    fn pass(this: &Rc<Self>) -> Iter<(K, V)> {
        let index = Rc::clone(this);
        Iter::new((0..index.len()).filter_map(move |pos| {
            index
                .entry_at(pos)
                .map(|(key, value)| (key.clone(), value.clone()))
        }))
    }
}

impl<K, V, Q> KeyedAccess<Q, V> for IndexedMap<K, V>
where
    K: Borrow<Q> + Eq + Hash + Clone,
    Q: Hash + Eq + ?Sized,
{
    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

// ============================================================================
// Hashed std collections
// ============================================================================

impl<T: Clone + 'static> SetBacking<T> for HashSet<T> {
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    // A hashed iterator cannot be resumed from a position, so each pass
    // clones the members up front.
    fn pass(this: &Rc<Self>) -> Iter<T> {
        let members: Vec<T> = this.iter().cloned().collect();
        Iter::new(members.into_iter())
    }
}

impl<T, Q> Membership<Q> for HashSet<T>
where
    T: Borrow<Q> + Eq + Hash,
    Q: Hash + Eq + ?Sized,
{
    fn contains(&self, value: &Q) -> bool {
        HashSet::contains(self, value)
    }
}

impl<K, V> MapBacking<K, V> for HashMap<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn pass(this: &Rc<Self>) -> Iter<(K, V)> {
        let entries: Vec<(K, V)> = this
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Iter::new(entries.into_iter())
    }
}

impl<K, V, Q> KeyedAccess<Q, V> for HashMap<K, V>
where
    K: Borrow<Q> + Eq + Hash,
    Q: Hash + Eq + ?Sized,
{
    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

// ============================================================================
// Ordered std collections
// ============================================================================

impl<T: Ord + Clone + 'static> SetBacking<T> for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn pass(this: &Rc<Self>) -> Iter<T> {
        let set = Rc::clone(this);
        let mut last: Option<T> = None;
        Iter::new(std::iter::from_fn(move || {
            let next = match &last {
                None => set.iter().next(),
                Some(prev) => set
                    .range::<T, _>((Bound::Excluded(prev), Bound::Unbounded))
                    .next(),
            }
            .cloned();
            last.clone_from(&next);
            next
        }))
    }
}

impl<T, Q> Membership<Q> for BTreeSet<T>
where
    T: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    fn contains(&self, value: &Q) -> bool {
        BTreeSet::contains(self, value)
    }
}

impl<K, V> MapBacking<K, V> for BTreeMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn pass(this: &Rc<Self>) -> Iter<(K, V)> {
        let map = Rc::clone(this);
        let mut last: Option<K> = None;
        Iter::new(std::iter::from_fn(move || {
            let (key, value) = match &last {
                None => map.iter().next(),
                Some(prev) => map
                    .range::<K, _>((Bound::Excluded(prev), Bound::Unbounded))
                    .next(),
            }?;
            let entry = (key.clone(), value.clone());
            last = Some(entry.0.clone());
            Some(entry)
        }))
    }
}

impl<K, V, Q> KeyedAccess<Q, V> for BTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btree_cursor_resumes_after_last_key() {
        let set = Rc::new(BTreeSet::from([5, 1, 3]));
        let mut pass = BTreeSet::pass(&set);
        assert_eq!(pass.next(), Some(1));
        assert_eq!(pass.next(), Some(3));
        assert_eq!(pass.next(), Some(5));
        assert_eq!(pass.next(), None);
        assert_eq!(pass.next(), None);
    }

    #[test]
    fn btree_map_cursor_yields_entries_in_key_order() {
        let map = Rc::new(BTreeMap::from([("b", 2), ("a", 1)]));
        let entries: Vec<_> = BTreeMap::pass(&map).collect();
        assert_eq!(entries, vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn lookups_go_to_the_collection() {
        let set = HashSet::from(["x".to_string()]);
        assert!(Membership::<str>::contains(&set, "x"));
        assert!(!Membership::<str>::contains(&set, "y"));

        let map = HashMap::from([(1, 'a')]);
        assert_eq!(KeyedAccess::lookup(&map, &1), Some(&'a'));
        assert_eq!(KeyedAccess::lookup(&map, &2), None);
    }
}
