//! Set-backed sequences.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::rc::Rc;

use crate::backing::{Membership, SetBacking};
use crate::index::IndexedMap;
use crate::seq::Seq;

/// A sequence of unique values with a membership test.
///
/// `S` is the collection that holds the members. Sets built by sequin use
/// an [`IndexedMap`] and iterate in first-insertion order. Wrapping a std
/// set keeps that set, along with its own iteration order.
///
/// ```
/// use std::collections::HashSet;
/// use sequin::seq;
///
/// let tags = seq(HashSet::from(["red", "blue"]));
/// assert!(tags.has("red"));
/// assert!(!tags.has("green"));
/// assert_eq!(tags.count(), 2);
/// ```
pub struct SeqSet<T, S = IndexedMap<T, ()>> {
    backing: Rc<S>,
    seq: Seq<T>,
}

impl<T, S> SeqSet<T, S>
where
    T: 'static,
    S: SetBacking<T>,
{
    /// Wraps `backing` without copying it.
    pub fn from_backing(backing: S) -> Self {
        let backing = Rc::new(backing);
        let shared = Rc::clone(&backing);
        let seq = Seq::from_fn(move || S::pass(&shared));
        SeqSet { backing, seq }
    }

    /// Returns `true` if the set holds `value`.
    pub fn has<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized,
        S: Membership<Q>,
    {
        self.backing.contains(value)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    /// `true` when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.backing.len() == 0
    }

    /// The members as a plain sequence.
    pub fn values(&self) -> Seq<T> {
        self.seq.clone()
    }

    /// Each member paired with itself.
    pub fn entries(&self) -> Seq<(T, T)>
    where
        T: Clone,
    {
        self.seq.select(|value| (value.clone(), value))
    }

    /// The members as a borrowed sequence.
    pub fn as_seq(&self) -> &Seq<T> {
        &self.seq
    }

    /// The collection holding the members.
    pub fn backing(&self) -> &S {
        &self.backing
    }
}

impl<T, S> Clone for SeqSet<T, S> {
    fn clone(&self) -> Self {
        SeqSet {
            backing: Rc::clone(&self.backing),
            seq: self.seq.clone(),
        }
    }
}

impl<T, S: SetBacking<T>> fmt::Debug for SeqSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqSet")
            .field("len", &self.backing.len())
            .finish_non_exhaustive()
    }
}

impl<T, S> Deref for SeqSet<T, S> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.seq
    }
}

impl<T, S> From<SeqSet<T, S>> for Seq<T> {
    fn from(set: SeqSet<T, S>) -> Self {
        set.seq
    }
}

impl<T> FromIterator<T> for SeqSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SeqSet::from_backing(iter.into_iter().map(|value| (value, ())).collect())
    }
}

impl<T> From<HashSet<T>> for SeqSet<T, HashSet<T>>
where
    T: Eq + Hash + Clone + 'static,
{
    fn from(set: HashSet<T>) -> Self {
        SeqSet::from_backing(set)
    }
}

impl<T> From<BTreeSet<T>> for SeqSet<T, BTreeSet<T>>
where
    T: Ord + Clone + 'static,
{
    fn from(set: BTreeSet<T>) -> Self {
        SeqSet::from_backing(set)
    }
}

impl<T: 'static, S> IntoIterator for SeqSet<T, S> {
    type Item = T;
    type IntoIter = crate::seq::Iter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.seq.iter()
    }
}
