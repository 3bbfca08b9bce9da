//! The lazy sequence handle and its deferred operators.
//!
//! A [`Seq`] is a cheaply clonable handle around a production step. Every
//! call to [`Seq::iter`] runs that step again and returns an independent,
//! pull-based [`Iter`]. Operators never touch their source when they are
//! called: they return a new `Seq` whose production step closes over a
//! clone of the upstream handle plus whatever per-pass state it needs.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use once_cell::unsync::Lazy;
use serde::{Serialize, Serializer};

/// A single pass over a [`Seq`].
pub struct Iter<T> {
    inner: Box<dyn Iterator<Item = T>>,
}

impl<T> Iter<T> {
    pub(crate) fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Iter {
            inner: Box::new(iter),
        }
    }
}

impl<T> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for Iter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

type Producer<T> = Rc<dyn Fn() -> Iter<T>>;

/// An index structure built on first demand, then shared by every pass.
pub(crate) type Deferred<V> = Rc<Lazy<V, Box<dyn FnOnce() -> V>>>;

pub(crate) fn deferred<V, F>(build: F) -> Deferred<V>
where
    F: FnOnce() -> V + 'static,
{
    let build: Box<dyn FnOnce() -> V> = Box::new(build);
    Rc::new(Lazy::new(build))
}

/// A lazy, re-iterable sequence of values.
///
/// # Example
///
/// ```
/// use sequin::seq;
///
/// let evens = seq(vec![1, 2, 3, 4, 5, 6])
///     .filter(|n| n % 2 == 0)
///     .select(|n| n * 10);
///
/// // Nothing has run yet; each pass pulls from the source on demand.
/// assert_eq!(evens.to_vec(), vec![20, 40, 60]);
/// assert_eq!(evens.count(), 3);
/// ```
pub struct Seq<T> {
    producer: Producer<T>,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Seq {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq").finish_non_exhaustive()
    }
}

struct Shared<T> {
    items: Rc<[T]>,
    pos: usize,
}

impl<T: Clone> Iterator for Shared<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.items.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl<T: 'static> Seq<T> {
    /// Creates a sequence from a production step.
    ///
    /// The step runs once per pass; whatever it returns is iterated lazily.
    pub fn from_fn<F, I>(produce: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Seq {
            producer: Rc::new(move || Iter::new(produce().into_iter())),
        }
    }

    /// Wraps any clonable iterable. Each pass iterates a fresh clone.
    pub fn from_iterable<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        Seq::from_fn(move || source.clone())
    }

    /// Starts a new pass over the sequence.
    pub fn iter(&self) -> Iter<T> {
        (self.producer)()
    }

    /// Returns `true` if both handles share the same production step.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.producer, &b.producer)
    }

    // ========================================================================
    // Projection and filtering
    // ========================================================================

    /// Projects each item, also passing its position in this pass.
    pub fn select_indexed<U, F>(&self, selector: F) -> Seq<U>
    where
        U: 'static,
        F: Fn(T, usize) -> U + 'static,
    {
        let src = self.clone();
        let selector = Rc::new(selector);
        Seq::from_fn(move || {
            let selector = Rc::clone(&selector);
            src.iter()
                .enumerate()
                .map(move |(i, item)| selector(item, i))
        })
    }

    /// Projects each item.
    pub fn select<U, F>(&self, selector: F) -> Seq<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        self.select_indexed(move |item, _| selector(item))
    }

    /// Keeps the items the predicate accepts. The index counts every item
    /// this operator pulls, accepted or not.
    pub fn filter_indexed<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let src = self.clone();
        let predicate = Rc::new(predicate);
        Seq::from_fn(move || {
            let predicate = Rc::clone(&predicate);
            src.iter()
                .enumerate()
                .filter(move |(i, item)| predicate(item, *i))
                .map(|(_, item)| item)
        })
    }

    /// Keeps the items the predicate accepts.
    pub fn filter<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter_indexed(move |item, _| predicate(item))
    }

    /// Maps each item to an iterable and flattens the results.
    pub fn select_many_indexed<U, I, F>(&self, selector: F) -> Seq<U>
    where
        U: 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
        F: Fn(T, usize) -> I + 'static,
    {
        let src = self.clone();
        let selector = Rc::new(selector);
        Seq::from_fn(move || {
            let selector = Rc::clone(&selector);
            src.iter()
                .enumerate()
                .flat_map(move |(i, item)| selector(item, i))
        })
    }

    /// Maps each item to an iterable and flattens the results.
    pub fn select_many<U, I, F>(&self, selector: F) -> Seq<U>
    where
        U: 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
        F: Fn(T) -> I + 'static,
    {
        self.select_many_indexed(move |item, _| selector(item))
    }

    // ========================================================================
    // Partitioning
    // ========================================================================

    /// Skips the first `count` items.
    pub fn skip(&self, count: usize) -> Seq<T> {
        let src = self.clone();
        Seq::from_fn(move || src.iter().skip(count))
    }

    /// Yields at most `count` items. Item `count + 1` is never pulled.
    pub fn take(&self, count: usize) -> Seq<T> {
        let src = self.clone();
        Seq::from_fn(move || src.iter().take(count))
    }

    /// Skips items while the predicate holds, then yields the rest.
    pub fn skip_while_indexed<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let src = self.clone();
        let predicate = Rc::new(predicate);
        Seq::from_fn(move || {
            let predicate = Rc::clone(&predicate);
            src.iter()
                .enumerate()
                .skip_while(move |(i, item)| predicate(item, *i))
                .map(|(_, item)| item)
        })
    }

    /// Skips items while the predicate holds, then yields the rest.
    pub fn skip_while<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.skip_while_indexed(move |item, _| predicate(item))
    }

    /// Yields items until the predicate first fails.
    pub fn take_while_indexed<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let src = self.clone();
        let predicate = Rc::new(predicate);
        Seq::from_fn(move || {
            let predicate = Rc::clone(&predicate);
            src.iter()
                .enumerate()
                .take_while(move |(i, item)| predicate(item, *i))
                .map(|(_, item)| item)
        })
    }

    /// Yields items until the predicate first fails.
    pub fn take_while<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.take_while_indexed(move |item, _| predicate(item))
    }

    // ========================================================================
    // Combining
    // ========================================================================

    /// Yields this sequence followed by `other`.
    pub fn concat(&self, other: impl Into<Seq<T>>) -> Seq<T> {
        let other: Seq<T> = other.into();
        self.concat_all([other])
    }

    /// Yields this sequence followed by each of `others` in turn.
    ///
    /// ```
    /// use sequin::seq;
    ///
    /// let all = seq(vec![1]).concat_all([vec![2, 3], vec![], vec![4]]);
    /// assert_eq!(all.to_vec(), vec![1, 2, 3, 4]);
    /// ```
    pub fn concat_all<I, S>(&self, others: I) -> Seq<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<Seq<T>>,
    {
        let parts: Vec<Seq<T>> = std::iter::once(self.clone())
            .chain(others.into_iter().map(Into::into))
            .collect();
        Seq::from_fn(move || parts.clone().into_iter().flat_map(|part| part.iter()))
    }

    /// Pairs items positionally and stops at the shorter sequence.
    pub fn zip<U, R, F>(&self, other: impl Into<Seq<U>>, selector: F) -> Seq<R>
    where
        U: 'static,
        R: 'static,
        F: Fn(T, U) -> R + 'static,
    {
        let left = self.clone();
        let right = other.into();
        let selector = Rc::new(selector);
        Seq::from_fn(move || {
            let selector = Rc::clone(&selector);
            left.iter()
                .zip(right.iter())
                .map(move |(a, b)| selector(a, b))
        })
    }

    /// Yields the items in reverse order.
    ///
    /// Each pass materializes the whole source before yielding anything.
    pub fn reverse(&self) -> Seq<T> {
        let src = self.clone();
        Seq::from_fn(move || {
            let mut items: Vec<T> = src.iter().collect();
            items.reverse();
            items
        })
    }
}

impl<T> Seq<T>
where
    T: Eq + Hash + Clone + 'static,
{
    /// Yields this sequence then `other`, dropping values already yielded.
    ///
    /// The membership set grows during the pass, so infinite sources stay
    /// usable as long as the consumer stops pulling.
    pub fn union(&self, other: impl Into<Seq<T>>) -> Seq<T> {
        let other: Seq<T> = other.into();
        self.union_all([other])
    }

    /// Like [`Seq::union`], over any number of further sequences.
    pub fn union_all<I, S>(&self, others: I) -> Seq<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<Seq<T>>,
    {
        let combined = self.concat_all(others);
        Seq::from_fn(move || {
            let mut seen = HashSet::new();
            combined.iter().filter(move |item| seen.insert(item.clone()))
        })
    }

    /// Yields the items not present in `other`.
    ///
    /// `other` is drained into a membership set on the first pull.
    pub fn except<I>(&self, other: I) -> Seq<T>
    where
        I: IntoIterator<Item = T> + 'static,
    {
        let excluded = deferred(move || membership(other));
        let src = self.clone();
        Seq::from_fn(move || {
            let excluded = Rc::clone(&excluded);
            src.iter().filter(move |item| !excluded.contains(item))
        })
    }

    /// Yields the items also present in `other`.
    ///
    /// `other` is drained into a membership set on the first pull.
    pub fn intersect<I>(&self, other: I) -> Seq<T>
    where
        I: IntoIterator<Item = T> + 'static,
    {
        let included = deferred(move || membership(other));
        let src = self.clone();
        Seq::from_fn(move || {
            let included = Rc::clone(&included);
            src.iter().filter(move |item| included.contains(item))
        })
    }
}

pub(crate) fn membership<T, I>(items: I) -> HashSet<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let set: HashSet<T> = items.into_iter().collect();
    #[cfg(feature = "tracing")]
    tracing::trace!(members = set.len(), "built membership set");
    set
}

impl<T: Clone + 'static> Seq<T> {
    /// Wraps an owned vector. Passes yield clones of its items.
    pub fn from_vec(items: Vec<T>) -> Self {
        let items: Rc<[T]> = items.into();
        Seq::from_fn(move || Shared {
            items: Rc::clone(&items),
            pos: 0,
        })
    }
}

impl<T: 'static> IntoIterator for Seq<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T: 'static> IntoIterator for &Seq<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Seq<T> {
    fn from(items: Vec<T>) -> Self {
        Seq::from_vec(items)
    }
}

impl<T: Clone + 'static, const N: usize> From<[T; N]> for Seq<T> {
    fn from(items: [T; N]) -> Self {
        Seq::from_vec(items.into())
    }
}

impl<T: Clone + 'static> From<&[T]> for Seq<T> {
    fn from(items: &[T]) -> Self {
        Seq::from_vec(items.to_vec())
    }
}

/// Serializes one pass as a sequence.
impl<T: Serialize + 'static> Serialize for Seq<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A source that counts how many items have been pulled from it.
    fn counted(items: Vec<i32>) -> (Seq<i32>, Rc<Cell<usize>>) {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let items: Rc<[i32]> = items.into();
        let seq = Seq::from_fn(move || {
            let counter = Rc::clone(&counter);
            let items = Rc::clone(&items);
            (0..items.len()).map(move |i| {
                counter.set(counter.get() + 1);
                items[i]
            })
        });
        (seq, pulls)
    }

    #[test]
    fn operators_do_not_pull_on_construction() {
        let (src, pulls) = counted(vec![1, 2, 3]);
        let chained = src
            .select(|n| n * 2)
            .filter(|n| *n > 2)
            .reverse()
            .except(vec![4]);
        assert_eq!(pulls.get(), 0);

        assert_eq!(chained.to_vec(), vec![6]);
        assert_eq!(pulls.get(), 3);
    }

    #[test]
    fn take_stops_pulling_at_the_limit() {
        let (src, pulls) = counted(vec![1, 2, 3, 4, 5]);
        assert_eq!(src.take(2).to_vec(), vec![1, 2]);
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn passes_are_independent() {
        let doubled = Seq::from_vec(vec![1, 2, 3]).select(|n| n * 2);
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);

        let mut a = doubled.iter();
        let mut b = doubled.iter();
        assert_eq!(a.next(), Some(2));
        assert_eq!(a.next(), Some(4));
        assert_eq!(b.next(), Some(2));
    }

    #[test]
    fn filter_index_counts_every_pulled_item() {
        let seen = Seq::from_vec(vec!['a', 'b', 'c', 'd'])
            .filter_indexed(|_, i| i % 2 == 1)
            .to_vec();
        assert_eq!(seen, vec!['b', 'd']);

        // The downstream select numbers its own pulls, not source positions.
        let positions = Seq::from_vec(vec![10, 11, 12, 13])
            .filter(|n| n % 2 == 1)
            .select_indexed(|_, i| i)
            .to_vec();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn select_many_flattens() {
        let flat = Seq::from_vec(vec![vec![1, 2], vec![3, 4]])
            .select_many(|v| v)
            .to_vec();
        assert_eq!(flat, vec![1, 2, 3, 4]);

        let tagged = Seq::from_vec(vec!["x", "y"])
            .select_many_indexed(|s, i| vec![(s, i); i + 1])
            .to_vec();
        assert_eq!(tagged, vec![("x", 0), ("y", 1), ("y", 1)]);
    }

    #[test]
    fn skip_and_take_while() {
        let src = Seq::from_vec(vec![1, 2, 3, 4, 5, 1]);
        assert_eq!(src.skip(2).to_vec(), vec![3, 4, 5, 1]);
        assert_eq!(src.skip(10).to_vec(), Vec::<i32>::new());
        assert_eq!(src.skip_while(|x| *x <= 2).to_vec(), vec![3, 4, 5, 1]);
        assert_eq!(src.take_while(|x| *x <= 3).to_vec(), vec![1, 2, 3]);
        assert_eq!(src.take_while_indexed(|_, i| i < 2).to_vec(), vec![1, 2]);
        assert_eq!(src.skip_while_indexed(|_, i| i < 4).to_vec(), vec![5, 1]);
    }

    #[test]
    fn concat_all_chains_every_part_in_order() {
        let head = Seq::from_vec(vec![1, 2]);
        let joined = head.concat_all(vec![vec![3], vec![], vec![4, 5]]);
        assert_eq!(joined.to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(joined.to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(head.concat_all(Vec::<Seq<i32>>::new()).to_vec(), vec![1, 2]);
    }

    #[test]
    fn union_all_drops_values_seen_in_any_earlier_part() {
        let merged = Seq::from_vec(vec![1, 2]).union_all([vec![2, 3], vec![3, 4], vec![1, 5]]);
        assert_eq!(merged.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn union_suppresses_repeats_lazily() {
        let merged = Seq::from_vec(vec![1, 2, 3])
            .union(vec![2, 3, 4])
            .union(vec![3, 4, 4, 5]);
        assert_eq!(merged.to_vec(), vec![1, 2, 3, 4, 5]);

        let naturals = Seq::from_fn(|| 0u64..);
        assert_eq!(naturals.union(vec![1]).take(3).to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn except_and_intersect_treat_argument_as_set() {
        let data = Seq::from_vec(vec![6, 3, 2, 1, 2, 3]);
        assert_eq!(data.except(vec![2, 3]).to_vec(), vec![6, 1]);

        let data = Seq::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(data.intersect(vec![2, 4, 6, 7]).to_vec(), vec![2, 4]);
    }

    #[test]
    fn zip_truncates_to_shorter() {
        let pairs = Seq::from_vec(vec![1, 2, 3])
            .zip(vec![2, 4, 6, 8], |a, b| a * 2 == b)
            .to_vec();
        assert_eq!(pairs, vec![true, true, true]);
    }

    #[test]
    fn reverse_yields_backwards() {
        let src = Seq::from_vec(vec![5, 4, 3, 2, 1, 100]);
        assert_eq!(src.reverse().to_vec(), vec![100, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn from_iterable_reiterates_clones() {
        let src = Seq::from_iterable(1..4);
        assert_eq!(src.to_vec(), vec![1, 2, 3]);
        assert_eq!(src.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn serializes_as_a_list() {
        let evens = Seq::from_vec(vec![1, 2, 3, 4]).filter(|n| n % 2 == 0);
        assert_eq!(serde_json::to_string(&evens).unwrap(), "[2,4]");
    }

    #[test]
    fn clones_share_the_production_step() {
        let a = Seq::from_vec(vec![1]);
        let b = a.clone();
        assert!(Seq::ptr_eq(&a, &b));
        assert!(!Seq::ptr_eq(&a, &a.select(|x| x)));
    }
}
