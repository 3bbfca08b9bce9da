//! Terminal operators.
//!
//! These run a pass immediately and return plain values. Each starts its own
//! pass, so calling two terminals on the same sequence iterates it twice.

use std::fmt::Debug;
use std::hash::Hash;
use std::iter::Sum;

use crate::error::{Result, SeqError};
use crate::number::Number;
use crate::seq::{membership, Seq};

impl<T: 'static> Seq<T> {
    /// Collects one pass into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Folds the items into an accumulator, starting from `seed`.
    ///
    /// ```
    /// use sequin::seq;
    ///
    /// let total = seq(vec![1, 2, 3, 4]).aggregate(0, |acc, n| acc + n);
    /// assert_eq!(total, 10);
    /// ```
    pub fn aggregate<A, F>(&self, seed: A, fold: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.iter().fold(seed, fold)
    }

    /// Adds the items. An empty sequence sums to zero.
    pub fn sum(&self) -> T
    where
        T: Sum<T>,
    {
        self.iter().sum()
    }

    /// The smallest item, or `None` when empty.
    ///
    /// The first of several equal minima wins. Incomparable items never
    /// replace the current candidate.
    pub fn min(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter().fold(None, |best, item| match best {
            Some(current) if item < current => Some(item),
            Some(current) => Some(current),
            None => Some(item),
        })
    }

    /// The largest item, or `None` when empty.
    pub fn max(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter().fold(None, |best, item| match best {
            Some(current) if item > current => Some(item),
            Some(current) => Some(current),
            None => Some(item),
        })
    }

    /// The arithmetic mean of the items.
    ///
    /// Fails with [`SeqError::EmptySequence`] when there is nothing to
    /// average.
    pub fn average(&self) -> Result<f64>
    where
        T: Into<Number>,
    {
        let (total, count) = self
            .iter()
            .fold((0.0, 0usize), |(total, count), item| {
                (total + Into::<Number>::into(item).to_f64(), count + 1)
            });
        if count == 0 {
            return Err(SeqError::EmptySequence);
        }
        Ok(total / count as f64)
    }

    /// Number of items in one pass.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Number of items the predicate accepts.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.iter().filter(|item| predicate(item)).count()
    }

    /// Returns `true` if any item matches. Stops at the first match.
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.iter().any(|item| predicate(&item))
    }

    /// Returns `true` if every item matches. Stops at the first miss.
    pub fn all<F>(&self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.iter().all(|item| predicate(&item))
    }

    /// Returns `true` if a pass yields nothing. Pulls at most one item.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// The first item, or [`SeqError::EmptySequence`].
    pub fn first(&self) -> Result<T> {
        self.iter().next().ok_or(SeqError::EmptySequence)
    }

    /// The first matching item, or [`SeqError::EmptySequence`].
    pub fn first_where<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        self.first_where_indexed(move |item, _| predicate(item))
    }

    /// Like [`Seq::first_where`], also passing each item's position.
    ///
    /// ```
    /// use sequin::seq;
    ///
    /// let letters = seq(vec!['a', 'b', 'a', 'c']);
    /// assert_eq!(letters.first_where_indexed(|c, i| *c == 'a' && i > 0).unwrap(), 'a');
    /// assert!(letters.first_where_indexed(|_, i| i > 10).is_err());
    /// ```
    pub fn first_where_indexed<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T, usize) -> bool,
    {
        self.first_or_default_where_indexed(predicate)
            .ok_or(SeqError::EmptySequence)
    }

    /// The first item, or `None` when empty.
    pub fn first_or_default(&self) -> Option<T> {
        self.iter().next()
    }

    /// The first matching item, or `None`.
    pub fn first_or_default_where<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.first_or_default_where_indexed(move |item, _| predicate(item))
    }

    /// Like [`Seq::first_or_default_where`], also passing each item's
    /// position.
    pub fn first_or_default_where_indexed<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T, usize) -> bool,
    {
        self.iter()
            .enumerate()
            .find(|(i, item)| predicate(item, *i))
            .map(|(_, item)| item)
    }

    /// The only item.
    ///
    /// Fails with [`SeqError::EmptySequence`] when there is none and with
    /// [`SeqError::MultipleMatches`] as soon as a second one is pulled.
    pub fn single(&self) -> Result<T> {
        self.single_where(|_| true)
    }

    /// The only matching item. Fails like [`Seq::single`].
    pub fn single_where<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        self.single_where_indexed(move |item, _| predicate(item))
    }

    /// Like [`Seq::single_where`], also passing each item's position.
    pub fn single_where_indexed<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T, usize) -> bool,
    {
        self.single_or_default_where_indexed(predicate)?
            .ok_or(SeqError::EmptySequence)
    }

    /// Like [`Seq::single`], but an empty sequence gives `Ok(None)`.
    pub fn single_or_default(&self) -> Result<Option<T>> {
        self.single_or_default_where(|_| true)
    }

    /// Like [`Seq::single_where`], but no match gives `Ok(None)`.
    pub fn single_or_default_where<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        self.single_or_default_where_indexed(move |item, _| predicate(item))
    }

    /// Like [`Seq::single_or_default_where`], also passing each item's
    /// position.
    pub fn single_or_default_where_indexed<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T, usize) -> bool,
    {
        let mut matches = self
            .iter()
            .enumerate()
            .filter(|(i, item)| predicate(item, *i))
            .map(|(_, item)| item);
        let found = matches.next();
        if found.is_some() && matches.next().is_some() {
            return Err(SeqError::MultipleMatches);
        }
        Ok(found)
    }

    /// The item at zero-based `index`.
    pub fn element_at(&self, index: usize) -> Result<T> {
        self.iter().nth(index).ok_or(SeqError::EmptySequence)
    }

    /// Returns `true` if both yield equal items in the same order and
    /// run out together.
    pub fn sequence_equal<I>(&self, other: I) -> bool
    where
        T: PartialEq,
        I: IntoIterator<Item = T>,
    {
        let mut left = self.iter();
        let mut right = other.into_iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => {}
                _ => return false,
            }
        }
    }

    /// Runs `action` on every item.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(action);
    }

    /// Prints every item to stderr, one per line.
    pub fn dump(&self)
    where
        T: Debug,
    {
        for item in self.iter() {
            eprintln!("{item:?}");
        }
    }
}

impl<T> Seq<T>
where
    T: Eq + Hash + 'static,
{
    /// Returns `true` if every item also occurs in `other`.
    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = membership(other);
        self.iter().all(|item| other.contains(&item))
    }

    /// Returns `true` if every item of `other` occurs in this sequence.
    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let own = membership(self.iter());
        other.into_iter().all(|item| own.contains(&item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn numbers() -> Seq<i32> {
        Seq::from_vec(vec![5, 4, 3, 2, 1, 100])
    }

    #[test]
    fn numeric_reductions() {
        assert_eq!(numbers().sum(), 115);
        assert_eq!(numbers().min(), Some(1));
        assert_eq!(numbers().max(), Some(100));
        assert_eq!(Seq::from_vec(Vec::<i32>::new()).sum(), 0);
        assert_eq!(Seq::from_vec(Vec::<i32>::new()).min(), None);
        assert_eq!(Seq::from_vec(vec![1, 2, 3, 4, 5]).average().unwrap(), 3.0);
    }

    #[test]
    fn average_of_nothing_fails() {
        let empty = Seq::from_vec(Vec::<u8>::new());
        assert!(matches!(empty.average(), Err(SeqError::EmptySequence)));
    }

    #[test]
    fn min_and_max_skip_incomparable_items() {
        assert_eq!(Seq::from_vec(vec![2.0, f64::NAN, 1.0]).min(), Some(1.0));
        assert_eq!(Seq::from_vec(vec![2.0, f64::NAN, 3.0]).max(), Some(3.0));
    }

    #[test]
    fn counting_and_quantifiers() {
        assert_eq!(numbers().count(), 6);
        assert_eq!(numbers().count_where(|n| *n > 3), 3);
        assert!(numbers().any(|n| *n == 100));
        assert!(!numbers().all(|n| *n < 100));
        assert!(Seq::from_vec(Vec::<i32>::new()).all(|_| false));
        assert!(Seq::from_vec(Vec::<i32>::new()).is_empty());
        assert!(!numbers().is_empty());
    }

    #[test]
    fn quantifiers_short_circuit() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let src = Seq::from_fn(move || {
            let counter = Rc::clone(&counter);
            (0..).map(move |n| {
                counter.set(counter.get() + 1);
                n
            })
        });
        assert!(src.any(|n| *n == 3));
        assert_eq!(pulls.get(), 4);
        assert!(!src.is_empty());
        assert_eq!(pulls.get(), 5);
    }

    #[test]
    fn first_variants() {
        assert_eq!(numbers().first().unwrap(), 5);
        assert_eq!(numbers().first_where(|n| n % 2 == 0).unwrap(), 4);
        assert!(matches!(
            numbers().first_where(|n| *n > 1000),
            Err(SeqError::EmptySequence)
        ));
        assert_eq!(numbers().first_or_default_where(|n| *n > 1000), None);
        assert_eq!(Seq::from_vec(Vec::<i32>::new()).first_or_default(), None);
    }

    #[test]
    fn single_variants() {
        assert_eq!(Seq::from_vec(vec![7]).single().unwrap(), 7);
        assert!(matches!(
            numbers().single(),
            Err(SeqError::MultipleMatches)
        ));
        assert!(matches!(
            Seq::from_vec(Vec::<i32>::new()).single(),
            Err(SeqError::EmptySequence)
        ));
        assert_eq!(numbers().single_where(|n| *n == 100).unwrap(), 100);
        assert_eq!(numbers().single_or_default_where(|n| *n > 100).unwrap(), None);
        assert!(numbers().single_or_default().is_err());
    }

    #[test]
    fn indexed_predicates_see_positions() {
        let words = Seq::from_vec(vec!["x", "y", "x", "z"]);
        assert_eq!(words.first_where_indexed(|w, i| *w == "x" && i > 0).unwrap(), "x");
        assert_eq!(words.first_or_default_where_indexed(|_, i| i == 3), Some("z"));
        assert_eq!(words.first_or_default_where_indexed(|_, i| i == 4), None);
        assert!(matches!(
            words.first_where_indexed(|w, i| *w == "y" && i > 1),
            Err(SeqError::EmptySequence)
        ));

        assert_eq!(words.single_where_indexed(|w, i| *w == "x" && i == 2).unwrap(), "x");
        assert!(matches!(
            words.single_where_indexed(|_, i| i % 2 == 0),
            Err(SeqError::MultipleMatches)
        ));
        assert_eq!(words.single_or_default_where_indexed(|_, i| i > 9).unwrap(), None);
        assert_eq!(
            words.single_or_default_where_indexed(|w, i| *w == "z" || i > 9).unwrap(),
            Some("z")
        );
    }

    #[test]
    fn single_fails_on_second_match_of_infinite_source() {
        let naturals = Seq::from_fn(|| 0u32..);
        assert!(matches!(
            naturals.single_where(|n| n % 2 == 0),
            Err(SeqError::MultipleMatches)
        ));
    }

    #[test]
    fn element_at_bounds() {
        assert_eq!(numbers().element_at(5).unwrap(), 100);
        assert!(matches!(
            numbers().element_at(6),
            Err(SeqError::EmptySequence)
        ));
    }

    #[test]
    fn sequence_equality() {
        assert!(numbers().sequence_equal(numbers()));
        assert!(!numbers().sequence_equal(vec![5, 4, 3]));
        assert!(!Seq::from_vec(vec![5, 4]).sequence_equal(numbers()));
        assert!(Seq::from_vec(Vec::<i32>::new()).sequence_equal(Vec::new()));
    }

    #[test]
    fn aggregate_and_for_each() {
        let joined = Seq::from_vec(vec!["a", "b", "c"])
            .aggregate(String::new(), |acc, s| acc + s);
        assert_eq!(joined, "abc");

        let mut seen = Vec::new();
        numbers().take(2).for_each(|n| seen.push(n));
        assert_eq!(seen, vec![5, 4]);
    }

    #[test]
    fn subset_and_superset() {
        let small = Seq::from_vec(vec![1, 2]);
        let big = Seq::from_vec(vec![3, 2, 1]);
        assert!(small.is_subset_of(big.clone()));
        assert!(!big.is_subset_of(small.clone()));
        assert!(big.is_superset_of(small.clone()));
        assert!(!small.is_superset_of(big));
    }
}
